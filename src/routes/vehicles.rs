use actix_web::{Responder, get, post, put, web};

use crate::forms::users::SetActiveForm;
use crate::forms::vehicles::{VehicleForm, VehicleListParams};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::vehicles;

#[get("/vehicles")]
pub async fn list_vehicles(
    params: web::Query<VehicleListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(vehicles::list_vehicles(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[post("/vehicles")]
pub async fn create_vehicle(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<VehicleForm>,
) -> impl Responder {
    created(vehicles::create_vehicle(form, &user, repo.get_ref()))
}

#[get("/vehicles/{vehicle_id}")]
pub async fn show_vehicle(
    vehicle_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(vehicles::get_vehicle(
        vehicle_id.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[put("/vehicles/{vehicle_id}")]
pub async fn update_vehicle(
    vehicle_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<VehicleForm>,
) -> impl Responder {
    ok(vehicles::update_vehicle(
        vehicle_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
    ))
}

#[put("/vehicles/{vehicle_id}/active")]
pub async fn set_vehicle_active(
    vehicle_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SetActiveForm>,
) -> impl Responder {
    ok(vehicles::set_vehicle_active(
        vehicle_id.into_inner(),
        form.active,
        &user,
        repo.get_ref(),
    ))
}
