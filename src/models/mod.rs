//! Database models shared across the CRM repository.

#[cfg(feature = "server")]
pub mod auth;
pub mod commission;
#[cfg(feature = "server")]
pub mod config;
pub mod guard_duty;
pub mod prospect;
pub mod prospect_event;
pub mod recording;
pub mod spcc;
pub mod tenancy;
pub mod training;
pub mod user;
pub mod vehicle;
#[cfg(feature = "server")]
pub mod zmq;
pub mod zone;
