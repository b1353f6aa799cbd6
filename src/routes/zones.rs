use actix_web::{Responder, delete, get, post, put, web};

use crate::dto::StatusResponse;
use crate::forms::zones::{ProximityForm, ZoneForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::zones;

#[get("/zones")]
pub async fn list_zones(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(zones::list_zones(&user, repo.get_ref()))
}

#[post("/zones")]
pub async fn create_zone(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ZoneForm>,
) -> impl Responder {
    created(zones::create_zone(form, &user, repo.get_ref()))
}

/// Position report from the mobile recorder; answers whether to start or stop.
#[post("/zones/proximity")]
pub async fn check_proximity(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProximityForm>,
) -> impl Responder {
    ok(zones::check_proximity(form, &user, repo.get_ref()))
}

#[put("/zones/{zone_id}")]
pub async fn update_zone(
    zone_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ZoneForm>,
) -> impl Responder {
    ok(zones::update_zone(zone_id.into_inner(), form, &user, repo.get_ref()))
}

#[delete("/zones/{zone_id}")]
pub async fn delete_zone(
    zone_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(zones::delete_zone(zone_id.into_inner(), &user, repo.get_ref()).map(|()| StatusResponse::OK))
}
