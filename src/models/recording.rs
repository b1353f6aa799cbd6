//! Diesel models for recordings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::recording::{
    NewRecording as DomainNewRecording, Recording as DomainRecording, RecordingProgress,
};
use crate::domain::types::{
    AgencyId, ProspectId, RecordingId, StorageKey, TypeConstraintError, UserId, ZoneId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::recordings)]
pub struct Recording {
    pub id: i32,
    pub agency_id: i32,
    pub user_id: i32,
    pub prospect_id: Option<i32>,
    pub zone_id: Option<i32>,
    pub storage_key: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub duration_seconds: Option<i32>,
    pub status: String,
    pub transcript: Option<String>,
    pub analysis: Option<String>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recordings)]
pub struct NewRecording<'a> {
    pub agency_id: i32,
    pub user_id: i32,
    pub prospect_id: Option<i32>,
    pub zone_id: Option<i32>,
    pub storage_key: &'a str,
    pub mime_type: &'a str,
    pub size_bytes: i64,
    pub duration_seconds: Option<i32>,
}

/// Columns touched when the transcription pipeline reports progress.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recordings)]
pub struct RecordingProgressChangeset {
    pub status: String,
    pub transcript: Option<String>,
    pub analysis: Option<String>,
    pub error: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl RecordingProgressChangeset {
    pub fn from_progress(progress: &RecordingProgress, updated_at: NaiveDateTime) -> Self {
        let mut changeset = Self {
            status: progress.status().as_str().to_string(),
            transcript: None,
            analysis: None,
            error: None,
            updated_at,
        };
        match progress {
            RecordingProgress::Transcribing => {}
            RecordingProgress::Transcribed { transcript } => {
                changeset.transcript = Some(transcript.clone());
            }
            RecordingProgress::Analyzed { analysis } => {
                changeset.analysis = Some(analysis.to_string());
            }
            RecordingProgress::Failed { error } => {
                changeset.error = Some(error.clone());
            }
        }
        changeset
    }
}

impl TryFrom<Recording> for DomainRecording {
    type Error = TypeConstraintError;

    fn try_from(recording: Recording) -> Result<Self, Self::Error> {
        let analysis = recording
            .analysis
            .as_deref()
            .and_then(|text| serde_json::from_str(text).ok());

        Ok(Self {
            id: RecordingId::new(recording.id)?,
            agency_id: AgencyId::new(recording.agency_id)?,
            user_id: UserId::new(recording.user_id)?,
            prospect_id: recording.prospect_id.map(ProspectId::new).transpose()?,
            zone_id: recording.zone_id.map(ZoneId::new).transpose()?,
            storage_key: StorageKey::new(recording.storage_key)?,
            mime_type: recording.mime_type,
            size_bytes: recording.size_bytes,
            duration_seconds: recording.duration_seconds,
            status: recording.status.parse()?,
            transcript: recording.transcript,
            analysis,
            error: recording.error,
            created_at: recording.created_at,
            updated_at: recording.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewRecording> for NewRecording<'a> {
    fn from(recording: &'a DomainNewRecording) -> Self {
        Self {
            agency_id: recording.agency_id.get(),
            user_id: recording.user_id.get(),
            prospect_id: recording.prospect_id.map(ProspectId::get),
            zone_id: recording.zone_id.map(ZoneId::get),
            storage_key: recording.storage_key.as_str(),
            mime_type: recording.mime_type.as_str(),
            size_bytes: recording.size_bytes,
            duration_seconds: recording.duration_seconds,
        }
    }
}
