//! Background worker applying transcription progress reported over ZeroMQ.

use std::env;

use config::Config;
use dotenvy::dotenv;

use dealer_crm::db::establish_connection_pool;
use dealer_crm::domain::recording::Recording;
use dealer_crm::models::config::ServerConfig;
use dealer_crm::models::zmq::ZmqRecordingUpdate;
use dealer_crm::repository::{DieselRepository, RecordingWriter};
use dealer_crm::services::recordings::apply_progress;

/// Returns the updated recording, or `None` when the payload was
/// malformed, stale or could not be stored.
fn process_update<R>(payload: &[u8], repo: &R) -> Option<Recording>
where
    R: RecordingWriter + ?Sized,
{
    let update = match serde_json::from_slice::<ZmqRecordingUpdate>(payload) {
        Ok(update) => update,
        Err(e) => {
            log::error!("Error parsing recording update: {e}");
            return None;
        }
    };

    match apply_progress(&update, repo) {
        Ok(applied) => applied,
        Err(e) => {
            log::error!(
                "Error applying progress to recording {} in agency#{}: {e}",
                update.recording_id,
                update.agency_id
            );
            None
        }
    }
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {}", err);
            std::process::exit(1);
        }
    };

    let context = zmq::Context::new();
    let updates = match context.socket(zmq::SUB) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("Cannot create zmq socket: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = updates
        .connect(&server_config.zmq_recordings_sub)
        .and_then(|()| updates.set_subscribe(b""))
    {
        log::error!(
            "Cannot subscribe to {}: {e}",
            server_config.zmq_recordings_sub
        );
        std::process::exit(1);
    }

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);

    log::info!("Starting recording worker");

    loop {
        match updates.recv_bytes(0) {
            Ok(msg) => {
                process_update(&msg, &repo);
            }
            Err(e) => log::error!("Error receiving recording update: {e}"),
        }
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use chrono::Utc;
    use dealer_crm::domain::recording::{RecordingProgress, RecordingStatus};
    use dealer_crm::domain::types::{AgencyId, RecordingId, StorageKey, UserId};
    use dealer_crm::repository::errors::RepositoryError;
    use dealer_crm::repository::mock::MockRepository;
    use serde_json::json;

    fn transcribed(id: RecordingId, agency_id: AgencyId, transcript: &str) -> Recording {
        let now = Utc::now().naive_utc();
        Recording {
            id,
            agency_id,
            user_id: UserId::new(3).expect("valid user id"),
            prospect_id: None,
            zone_id: None,
            storage_key: StorageKey::new("visit.ogg").expect("valid key"),
            mime_type: "audio/ogg".into(),
            size_bytes: 512,
            duration_seconds: Some(40),
            status: RecordingStatus::Transcribed,
            transcript: Some(transcript.to_string()),
            analysis: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn applies_transcription_results() {
        let mut repo = MockRepository::new();
        repo.expect_apply_recording_progress()
            .withf(|id, agency_id, progress| {
                id.get() == 5
                    && agency_id.get() == 2
                    && matches!(
                        progress,
                        RecordingProgress::Transcribed { transcript } if transcript == "Hola"
                    )
            })
            .times(1)
            .returning(|id, agency_id, _| Ok(Some(transcribed(id, agency_id, "Hola"))));

        let payload = json!({
            "recording_id": 5,
            "agency_id": 2,
            "progress": {"status": "Transcribed", "transcript": "Hola"},
        })
        .to_string();
        let recording = process_update(payload.as_bytes(), &repo).expect("applied");

        assert_eq!(recording.status, RecordingStatus::Transcribed);
        assert_eq!(recording.transcript.as_deref(), Some("Hola"));
    }

    #[test]
    fn skips_malformed_payloads() {
        let mut repo = MockRepository::new();
        repo.expect_apply_recording_progress().times(0);

        assert!(process_update(b"not json", &repo).is_none());
        assert!(process_update(br#"{"recording_id": 5, "agency_id": 2}"#, &repo).is_none());
        let unknown = json!({
            "recording_id": 5,
            "agency_id": 2,
            "progress": {"status": "Exploded"},
        })
        .to_string();
        assert!(process_update(unknown.as_bytes(), &repo).is_none());
    }

    #[test]
    fn stale_updates_leave_recording_untouched() {
        let mut repo = MockRepository::new();
        repo.expect_apply_recording_progress()
            .times(1)
            .returning(|_, _, _| Ok(None));

        let payload = json!({
            "recording_id": 5,
            "agency_id": 2,
            "progress": {"status": "Transcribing"},
        })
        .to_string();

        assert!(process_update(payload.as_bytes(), &repo).is_none());
    }

    #[test]
    fn invalid_ids_and_storage_errors_are_not_fatal() {
        let mut repo = MockRepository::new();
        repo.expect_apply_recording_progress()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::DatabaseError("locked".into())));

        let zero_id = json!({
            "recording_id": 0,
            "agency_id": 2,
            "progress": {"status": "Transcribing"},
        })
        .to_string();
        assert!(process_update(zero_id.as_bytes(), &repo).is_none());

        let payload = json!({
            "recording_id": 5,
            "agency_id": 2,
            "progress": {"status": "Failed", "error": "codec"},
        })
        .to_string();
        assert!(process_update(payload.as_bytes(), &repo).is_none());
    }
}
