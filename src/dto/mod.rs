//! Response shapes returned by services and serialized by the routes.

use serde::Serialize;

pub mod commissions;
pub mod guard_duty;
pub mod metrics;
pub mod prospects;
pub mod zones;

/// Plain `{"status": "..."}` acknowledgement.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const OK: StatusResponse = StatusResponse { status: "ok" };
}

/// Number of rows touched by a bulk operation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AffectedRows {
    pub affected: usize,
}
