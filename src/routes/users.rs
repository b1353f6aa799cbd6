use actix_web::{Responder, get, post, put, web};

use crate::forms::users::{AddUserForm, SetActiveForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::users;

#[get("/me")]
pub async fn current_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(users::current_user(&user, repo.get_ref()))
}

/// Salespeople with their open prospect counts.
#[get("/users")]
pub async fn list_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(users::list_users_with_load(&user, repo.get_ref()))
}

#[post("/users")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddUserForm>,
) -> impl Responder {
    created(users::add_user(form, &user, repo.get_ref()))
}

#[put("/users/{user_id}/active")]
pub async fn set_user_active(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SetActiveForm>,
) -> impl Responder {
    ok(users::set_user_active(
        user_id.into_inner(),
        form.active,
        &user,
        repo.get_ref(),
    ))
}
