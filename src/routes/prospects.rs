use actix_multipart::form::MultipartForm;
use actix_web::{Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::dto::StatusResponse;
use crate::forms::prospects::{
    AddEventForm, AddProspectForm, AssignProspectsForm, ProspectListParams, UpdateProspectForm,
    UploadProspectsForm,
};
use crate::forms::spcc::SpccForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::{prospects, spcc};

#[derive(Deserialize)]
struct EventsPageParams {
    events_page: Option<usize>,
}

#[get("/prospects")]
pub async fn list_prospects(
    params: web::Query<ProspectListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(prospects::list_prospects(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[post("/prospects")]
pub async fn create_prospect(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddProspectForm>,
) -> impl Responder {
    created(prospects::create_prospect(form, &user, repo.get_ref()))
}

#[post("/prospects/import")]
pub async fn import_prospects(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadProspectsForm>,
) -> impl Responder {
    created(prospects::import_prospects(form, &user, repo.get_ref()))
}

#[post("/prospects/assign")]
pub async fn assign_prospects(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AssignProspectsForm>,
) -> impl Responder {
    ok(prospects::assign_prospects(form, &user, repo.get_ref()))
}

/// Prospect with its assignee, a page of the timeline and SPCC history.
#[get("/prospects/{prospect_id}")]
pub async fn show_prospect(
    prospect_id: web::Path<i32>,
    params: web::Query<EventsPageParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(prospects::get_prospect(
        prospect_id.into_inner(),
        params.events_page,
        &user,
        repo.get_ref(),
    ))
}

#[put("/prospects/{prospect_id}")]
pub async fn update_prospect(
    prospect_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateProspectForm>,
) -> impl Responder {
    ok(prospects::update_prospect(
        prospect_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
    ))
}

#[delete("/prospects/{prospect_id}")]
pub async fn delete_prospect(
    prospect_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        prospects::delete_prospect(prospect_id.into_inner(), &user, repo.get_ref())
            .map(|()| StatusResponse::OK),
    )
}

#[post("/prospects/{prospect_id}/events")]
pub async fn add_prospect_event(
    prospect_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddEventForm>,
) -> impl Responder {
    created(prospects::add_prospect_event(
        prospect_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
    ))
}

#[post("/prospects/{prospect_id}/spcc")]
pub async fn evaluate_prospect(
    prospect_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SpccForm>,
) -> impl Responder {
    created(spcc::evaluate_prospect(
        prospect_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
    ))
}

#[get("/prospects/{prospect_id}/spcc")]
pub async fn list_evaluations(
    prospect_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(spcc::list_evaluations(
        prospect_id.into_inner(),
        &user,
        repo.get_ref(),
    ))
}
