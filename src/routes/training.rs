use actix_web::{Responder, get, post, put, web};

use crate::forms::training::{ScenarioForm, ScenarioListParams, TrainingSessionForm};
use crate::forms::users::SetActiveForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::training;

#[get("/training/scenarios")]
pub async fn list_scenarios(
    params: web::Query<ScenarioListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(training::list_scenarios(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[post("/training/scenarios")]
pub async fn create_scenario(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ScenarioForm>,
) -> impl Responder {
    created(training::create_scenario(form, &user, repo.get_ref()))
}

#[put("/training/scenarios/{scenario_id}")]
pub async fn update_scenario(
    scenario_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ScenarioForm>,
) -> impl Responder {
    ok(training::update_scenario(
        scenario_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
    ))
}

#[put("/training/scenarios/{scenario_id}/active")]
pub async fn set_scenario_active(
    scenario_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SetActiveForm>,
) -> impl Responder {
    ok(training::set_scenario_active(
        scenario_id.into_inner(),
        form.active,
        &user,
        repo.get_ref(),
    ))
}

#[post("/training/sessions")]
pub async fn record_session(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<TrainingSessionForm>,
) -> impl Responder {
    created(training::record_session(form, &user, repo.get_ref()))
}

#[get("/training/stats")]
pub async fn training_stats(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(training::get_training_stats(&user, repo.get_ref()))
}
