//! Recorded sales conversations: upload, listing, removal and the progress
//! reports coming back from the transcription pipeline.

use serde_json::json;

use crate::domain::prospect_event::{NewProspectEvent, ProspectEventType};
use crate::domain::recording::{NewRecording, Recording};
use crate::domain::types::{AgencyId, RecordingId, StorageKey};
use crate::forms::recordings::{RecordingListParams, RecordingUpload};
use crate::messaging::JobPublisher;
use crate::models::auth::AuthenticatedUser;
use crate::models::zmq::{ZmqRecordingJob, ZmqRecordingUpdate};
use crate::pagination::Paginated;
use crate::repository::{
    ProspectEventWriter, ProspectReader, RecordingListQuery, RecordingReader, RecordingWriter,
    UserReader, UserWriter, ZoneReader,
};
use crate::services::prospects::{
    ensure_visible, load_prospect, own_user_id, parse_prospect_id, record_event,
};
use crate::services::{
    DEFAULT_ITEMS_PER_PAGE, ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin,
    is_restricted_to_own, upsert_current_user,
};
use crate::storage::RecordingStorage;

fn parse_recording_id(id: i32) -> ServiceResult<RecordingId> {
    RecordingId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Stores the audio, registers the recording and queues it for transcription.
///
/// A failed publish is only logged: the row stays `Uploaded` and can be
/// picked up again by the pipeline.
pub fn upload_recording<R>(
    upload: RecordingUpload,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &dyn RecordingStorage,
    publisher: &dyn JobPublisher,
) -> ServiceResult<Recording>
where
    R: RecordingWriter
        + ProspectReader
        + ProspectEventWriter
        + ZoneReader
        + UserReader
        + UserWriter
        + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    if let Some(prospect_id) = upload.prospect_id {
        let prospect = load_prospect(repo, prospect_id, agency_id)?;
        ensure_visible(user, repo, &prospect)?;
    }
    if let Some(zone_id) = upload.zone_id
        && repo.get_zone_by_id(zone_id, agency_id)?.is_none()
    {
        return Err(ServiceError::Form(format!("unknown zone {zone_id}")));
    }

    let author = upsert_current_user(user, repo)?;
    let storage_key = StorageKey::generate(&upload.extension);

    storage.save(&storage_key, &upload.content).map_err(|err| {
        log::error!("Failed to store recording {storage_key}: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    let new_recording = NewRecording {
        agency_id,
        user_id: author.id,
        prospect_id: upload.prospect_id,
        zone_id: upload.zone_id,
        storage_key: storage_key.clone(),
        mime_type: upload.mime_type,
        size_bytes: upload.content.len() as i64,
        duration_seconds: upload.duration_seconds,
    };
    let recording = match repo.create_recording(&new_recording) {
        Ok(recording) => recording,
        Err(err) => {
            log::error!("Failed to register recording {storage_key}: {err}");
            if let Err(cleanup) = storage.delete(&storage_key) {
                log::error!("Failed to remove orphaned recording {storage_key}: {cleanup}");
            }
            return Err(err.into());
        }
    };

    // The row and file are committed; a missing timeline entry must not
    // keep the recording out of the transcription queue.
    if let Some(prospect_id) = recording.prospect_id
        && record_event(
            repo,
            NewProspectEvent::new(
                prospect_id,
                author.id,
                ProspectEventType::Recording,
                json!({
                    "recording_id": recording.id.get(),
                    "duration_seconds": recording.duration_seconds,
                }),
            ),
        )
        .is_err()
    {
        log::warn!("Recording {} has no timeline entry", recording.id);
    }

    let job = ZmqRecordingJob {
        recording_id: recording.id.get(),
        agency_id: agency_id.get(),
        storage_key: recording.storage_key.as_str().to_string(),
        mime_type: recording.mime_type.clone(),
        prospect_id: recording.prospect_id.map(|id| id.get()),
    };
    match publisher.publish_recording_job(&job) {
        Ok(()) => log::info!("Queued recording {} for transcription", recording.id),
        Err(err) => log::error!(
            "Failed to queue recording {} for transcription: {err}",
            recording.id
        ),
    }

    Ok(recording)
}

/// Paginated recordings. Salespeople only see their own uploads.
pub fn list_recordings<R>(
    params: RecordingListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Recording>>
where
    R: RecordingReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let page = params.page.unwrap_or(1).max(1);

    let mut query = RecordingListQuery::new(agency_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if is_restricted_to_own(user) {
        match own_user_id(user, repo)? {
            Some(own) => query = query.owned_by(own),
            None => return Ok(Paginated::new(Vec::new(), page, 0, DEFAULT_ITEMS_PER_PAGE)),
        }
    }
    if let Some(prospect_id) = params.prospect_id {
        query = query.prospect(parse_prospect_id(prospect_id)?);
    }
    if let Some(status) = params.status {
        query = query.status(status);
    }

    let (total, recordings) = repo.list_recordings(query).map_err(|err| {
        log::error!("Failed to list recordings: {err}");
        err
    })?;

    Ok(Paginated::new(recordings, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Recording with its transcript and analysis.
pub fn get_recording<R>(
    recording_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Recording>
where
    R: RecordingReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let recording = repo
        .get_recording_by_id(parse_recording_id(recording_id)?, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    if is_restricted_to_own(user) && own_user_id(user, repo)? != Some(recording.user_id) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(recording)
}

/// Removes the row first, then the stored file.
pub fn delete_recording<R>(
    recording_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &dyn RecordingStorage,
) -> ServiceResult<()>
where
    R: RecordingReader + RecordingWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let recording = repo
        .get_recording_by_id(parse_recording_id(recording_id)?, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_recording(recording.id, agency_id)
        .map_err(|err| {
            log::error!("Failed to delete recording {}: {err}", recording.id);
            err
        })?;

    if let Err(err) = storage.delete(&recording.storage_key) {
        log::error!(
            "Recording {} deleted but its file {} remains: {err}",
            recording.id,
            recording.storage_key
        );
    }

    Ok(())
}

/// Applies a pipeline report. Returns `None` for stale or backwards
/// updates, which leave the row untouched.
pub fn apply_progress<R>(update: &ZmqRecordingUpdate, repo: &R) -> ServiceResult<Option<Recording>>
where
    R: RecordingWriter + ?Sized,
{
    let recording_id = parse_recording_id(update.recording_id)?;
    let agency_id = AgencyId::new(update.agency_id)?;
    let next = update.progress.status();

    let applied = repo
        .apply_recording_progress(recording_id, agency_id, &update.progress)
        .map_err(|err| {
            log::error!("Failed to apply {next} to recording {recording_id}: {err}");
            err
        })?;

    match &applied {
        Some(recording) => log::info!("Recording {} is now {}", recording.id, recording.status),
        None => log::warn!("Ignored stale {next} update for recording {recording_id}"),
    }

    Ok(applied)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::prospect::ProspectStatus;
    use crate::domain::recording::{RecordingProgress, RecordingStatus};
    use crate::domain::types::{ProspectId, UserId};
    use crate::messaging::PublishError;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        admin, prospect, seller, stored_event, timestamp, user as build_user,
    };
    use crate::storage::StorageError;

    mock! {
        pub Storage {}
        impl RecordingStorage for Storage {
            fn save(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), StorageError>;
            fn delete(&self, key: &StorageKey) -> Result<(), StorageError>;
        }
    }

    mock! {
        pub Publisher {}
        impl JobPublisher for Publisher {
            fn publish_recording_job(&self, job: &ZmqRecordingJob) -> Result<(), PublishError>;
        }
    }

    fn upload(prospect_id: Option<i32>) -> RecordingUpload {
        RecordingUpload::new(
            vec![1, 2, 3, 4],
            "audio/ogg".into(),
            Some("visit.ogg"),
            prospect_id,
            None,
            Some(30),
            1024,
        )
        .unwrap()
    }

    fn stored(new_recording: &NewRecording) -> Recording {
        Recording {
            id: RecordingId::new(10).unwrap(),
            agency_id: new_recording.agency_id,
            user_id: new_recording.user_id,
            prospect_id: new_recording.prospect_id,
            zone_id: new_recording.zone_id,
            storage_key: new_recording.storage_key.clone(),
            mime_type: new_recording.mime_type.clone(),
            size_bytes: new_recording.size_bytes,
            duration_seconds: new_recording.duration_seconds,
            status: RecordingStatus::Uploaded,
            transcript: None,
            analysis: None,
            error: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn recording(id: i32, user_id: i32) -> Recording {
        let new_recording = NewRecording {
            agency_id: AgencyId::new(1).unwrap(),
            user_id: UserId::new(user_id).unwrap(),
            prospect_id: None,
            zone_id: None,
            storage_key: StorageKey::new("abc.ogg").unwrap(),
            mime_type: "audio/ogg".into(),
            size_bytes: 4,
            duration_seconds: None,
        };
        Recording {
            id: RecordingId::new(id).unwrap(),
            ..stored(&new_recording)
        }
    }

    #[test]
    fn upload_stores_registers_logs_and_publishes() {
        let mut repo = MockRepository::new();
        repo.expect_get_prospect_by_id()
            .returning(|id, _| Ok(Some(prospect(id.get(), None, ProspectStatus::New))));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(build_user(1, "Manager")));
        repo.expect_create_recording()
            .withf(|new_recording| {
                new_recording.size_bytes == 4
                    && new_recording.storage_key.as_str().ends_with(".ogg")
                    && new_recording.prospect_id.map(ProspectId::get) == Some(5)
            })
            .times(1)
            .returning(|new_recording| Ok(stored(new_recording)));
        repo.expect_create_prospect_event()
            .withf(|event| event.event_type == ProspectEventType::Recording)
            .times(1)
            .returning(|event| Ok(stored_event(event)));

        let mut storage = MockStorage::new();
        storage
            .expect_save()
            .withf(|_, bytes| bytes == &[1, 2, 3, 4][..])
            .times(1)
            .returning(|_, _| Ok(()));
        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish_recording_job()
            .withf(|job| job.recording_id == 10 && job.prospect_id == Some(5))
            .times(1)
            .returning(|_| Ok(()));

        let recording =
            upload_recording(upload(Some(5)), &admin(), &repo, &storage, &publisher).unwrap();

        assert_eq!(recording.status, RecordingStatus::Uploaded);
    }

    #[test]
    fn publish_failure_keeps_the_upload() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .returning(|_| Ok(build_user(1, "Manager")));
        repo.expect_create_recording()
            .returning(|new_recording| Ok(stored(new_recording)));
        repo.expect_create_prospect_event().times(0);

        let mut storage = MockStorage::new();
        storage.expect_save().returning(|_, _| Ok(()));
        storage.expect_delete().times(0);
        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish_recording_job()
            .returning(|_| Err(PublishError::Poisoned));

        let recording =
            upload_recording(upload(None), &admin(), &repo, &storage, &publisher).unwrap();

        assert_eq!(recording.status, RecordingStatus::Uploaded);
    }

    #[test]
    fn event_failure_still_queues_the_recording() {
        let mut repo = MockRepository::new();
        repo.expect_get_prospect_by_id()
            .returning(|id, _| Ok(Some(prospect(id.get(), None, ProspectStatus::New))));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(build_user(1, "Manager")));
        repo.expect_create_recording()
            .returning(|new_recording| Ok(stored(new_recording)));
        repo.expect_create_prospect_event()
            .times(1)
            .returning(|_| Err(RepositoryError::DatabaseError("locked".into())));

        let mut storage = MockStorage::new();
        storage.expect_save().returning(|_, _| Ok(()));
        storage.expect_delete().times(0);
        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish_recording_job()
            .withf(|job| job.recording_id == 10)
            .times(1)
            .returning(|_| Ok(()));

        let recording =
            upload_recording(upload(Some(5)), &admin(), &repo, &storage, &publisher).unwrap();

        assert_eq!(recording.id.get(), 10);
    }

    #[test]
    fn failed_insert_removes_stored_file() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .returning(|_| Ok(build_user(1, "Manager")));
        repo.expect_create_recording()
            .returning(|_| Err(RepositoryError::ConstraintViolation("fk".into())));

        let mut storage = MockStorage::new();
        storage.expect_save().returning(|_, _| Ok(()));
        storage.expect_delete().times(1).returning(|_| Ok(()));
        let mut publisher = MockPublisher::new();
        publisher.expect_publish_recording_job().times(0);

        let result = upload_recording(upload(None), &admin(), &repo, &storage, &publisher);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn seller_cannot_attach_to_foreign_prospect() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(build_user(7, "Seller"))));
        repo.expect_get_prospect_by_id()
            .returning(|id, _| Ok(Some(prospect(id.get(), Some(2), ProspectStatus::New))));
        repo.expect_create_recording().times(0);

        let mut storage = MockStorage::new();
        storage.expect_save().times(0);
        let publisher = MockPublisher::new();

        let result = upload_recording(upload(Some(5)), &seller(), &repo, &storage, &publisher);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn seller_lists_only_own_recordings() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(build_user(7, "Seller"))));
        repo.expect_list_recordings()
            .withf(|query| query.user_id.map(UserId::get) == Some(7))
            .times(1)
            .returning(|_| Ok((1, vec![recording(1, 7)])));

        let page = list_recordings(RecordingListParams::default(), &seller(), &repo).unwrap();

        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn seller_cannot_read_foreign_recording() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(build_user(7, "Seller"))));
        repo.expect_get_recording_by_id()
            .returning(|id, _| Ok(Some(recording(id.get(), 2))));

        assert!(matches!(
            get_recording(3, &seller(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn delete_removes_row_then_file() {
        let mut repo = MockRepository::new();
        repo.expect_get_recording_by_id()
            .returning(|id, _| Ok(Some(recording(id.get(), 2))));
        repo.expect_delete_recording().times(1).returning(|_, _| Ok(()));
        let mut storage = MockStorage::new();
        storage
            .expect_delete()
            .withf(|key| key.as_str() == "abc.ogg")
            .times(1)
            .returning(|_| Ok(()));

        delete_recording(3, &admin(), &repo, &storage).unwrap();
    }

    #[test]
    fn delete_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_recording().times(0);
        let storage = MockStorage::new();

        assert!(matches!(
            delete_recording(3, &seller(), &repo, &storage),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn stale_progress_is_ignored() {
        let mut repo = MockRepository::new();
        repo.expect_apply_recording_progress()
            .withf(|id, agency, progress| {
                id.get() == 4 && agency.get() == 1 && progress.status() == RecordingStatus::Transcribing
            })
            .times(1)
            .returning(|_, _, _| Ok(None));

        let update = ZmqRecordingUpdate {
            recording_id: 4,
            agency_id: 1,
            progress: RecordingProgress::Transcribing,
        };

        assert!(apply_progress(&update, &repo).unwrap().is_none());
    }

    #[test]
    fn progress_for_unknown_recording_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_apply_recording_progress()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let update = ZmqRecordingUpdate {
            recording_id: 4,
            agency_id: 1,
            progress: RecordingProgress::Failed {
                error: "codec".into(),
            },
        };

        assert!(matches!(
            apply_progress(&update, &repo),
            Err(ServiceError::NotFound)
        ));
    }
}
