//! JSON handlers under `/api/v1`. Every handler delegates to a service and
//! turns the result into a response with the helpers below.

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

use crate::services::{ServiceError, ServiceResult};

pub mod commissions;
pub mod guard_duty;
pub mod health;
pub mod metrics;
pub mod prospects;
pub mod recordings;
pub mod tenancy;
pub mod training;
pub mod users;
pub mod vehicles;
pub mod zones;

/// Maps a service failure to its HTTP status with an `{"error": ...}` body.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({ "error": "unauthorized" }))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(json!({ "error": message }))
        }
        ServiceError::Repository(err) => {
            log::error!("Repository failure: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
        ServiceError::Internal(message) => {
            log::error!("Internal failure: {message}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
    }
}

/// `200 OK` with the value as JSON.
pub fn ok<T: Serialize>(result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(err),
    }
}

/// `201 Created` with the stored value as JSON.
pub fn created<T: Serialize>(result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(err) => error_response(err),
    }
}
