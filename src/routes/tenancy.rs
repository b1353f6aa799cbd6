use actix_web::{Responder, get, post, web};

use crate::forms::tenancy::{AddAgencyForm, AddBrandForm, AddGroupForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::tenancy;

#[get("/agency")]
pub async fn current_agency(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(tenancy::current_agency(&user, repo.get_ref()))
}

#[get("/agencies")]
pub async fn list_agencies(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(tenancy::list_agencies(&user, repo.get_ref()))
}

#[post("/agencies")]
pub async fn create_agency(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddAgencyForm>,
) -> impl Responder {
    created(tenancy::create_agency(form, &user, repo.get_ref()))
}

#[get("/brands")]
pub async fn list_brands(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(tenancy::list_brands(&user, repo.get_ref()))
}

#[post("/brands")]
pub async fn create_brand(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddBrandForm>,
) -> impl Responder {
    created(tenancy::create_brand(form, &user, repo.get_ref()))
}

#[post("/groups")]
pub async fn create_group(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddGroupForm>,
) -> impl Responder {
    created(tenancy::create_group(form, &user, repo.get_ref()))
}
