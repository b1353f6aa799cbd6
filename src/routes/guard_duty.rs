use actix_web::{Responder, get, post, put, web};

use crate::forms::guard_duty::{AutoAssignForm, RosterDateParams, RosterForm, TransferForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::ok;
use crate::services::guard_duty;

/// Roster of `?date=`, today when omitted.
#[get("/guard-duty")]
pub async fn show_roster(
    params: web::Query<RosterDateParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(guard_duty::get_roster(params.date, &user, repo.get_ref()))
}

#[put("/guard-duty")]
pub async fn set_roster(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RosterForm>,
) -> impl Responder {
    ok(guard_duty::set_roster(form, &user, repo.get_ref()))
}

#[get("/guard-duty/load")]
pub async fn load_report(
    params: web::Query<RosterDateParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(guard_duty::load_report(params.date, &user, repo.get_ref()))
}

#[post("/guard-duty/auto-assign")]
pub async fn auto_assign(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AutoAssignForm>,
) -> impl Responder {
    ok(guard_duty::auto_assign(form, &user, repo.get_ref()))
}

#[post("/guard-duty/transfer")]
pub async fn transfer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<TransferForm>,
) -> impl Responder {
    ok(guard_duty::transfer(form, &user, repo.get_ref()))
}
