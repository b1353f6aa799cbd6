use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::repository::DieselRepository;
use crate::services::health::check_health;

/// `{"status":"ok"}` while the database answers, `503` otherwise.
#[get("/health")]
pub async fn health(repo: web::Data<DieselRepository>) -> impl Responder {
    match check_health(repo.get_ref()) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(_) => HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" })),
    }
}
