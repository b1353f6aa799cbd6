use actix_multipart::form::MultipartForm;
use actix_web::{Responder, delete, get, post, web};

use crate::dto::StatusResponse;
use crate::forms::recordings::{RecordingListParams, UploadRecordingForm};
use crate::messaging::JobPublisher;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{created, error_response, ok};
use crate::services::{ServiceError, recordings};
use crate::storage::RecordingStorage;

#[post("/recordings")]
pub async fn upload_recording(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    storage: web::Data<dyn RecordingStorage>,
    publisher: web::Data<dyn JobPublisher>,
    MultipartForm(form): MultipartForm<UploadRecordingForm>,
) -> impl Responder {
    let upload = match form.into_upload(config.max_recording_bytes as u64) {
        Ok(upload) => upload,
        Err(err) => return error_response(ServiceError::from(err)),
    };

    created(recordings::upload_recording(
        upload,
        &user,
        repo.get_ref(),
        storage.get_ref(),
        publisher.get_ref(),
    ))
}

#[get("/recordings")]
pub async fn list_recordings(
    params: web::Query<RecordingListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(recordings::list_recordings(
        params.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[get("/recordings/{recording_id}")]
pub async fn show_recording(
    recording_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(recordings::get_recording(
        recording_id.into_inner(),
        &user,
        repo.get_ref(),
    ))
}

#[delete("/recordings/{recording_id}")]
pub async fn delete_recording(
    recording_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<dyn RecordingStorage>,
) -> impl Responder {
    ok(recordings::delete_recording(
        recording_id.into_inner(),
        &user,
        repo.get_ref(),
        storage.get_ref(),
    )
    .map(|()| StatusResponse::OK))
}
