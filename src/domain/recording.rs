//! Recorded sales conversations and their processing lifecycle.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{AgencyId, ProspectId, RecordingId, StorageKey, UserId, ZoneId};

text_enum!(
    /// Processing stage of a recording.
    RecordingStatus,
    "recording status",
    { Uploaded, Transcribing, Transcribed, Analyzed, Failed }
);

impl RecordingStatus {
    fn rank(self) -> u8 {
        match self {
            RecordingStatus::Uploaded => 0,
            RecordingStatus::Transcribing => 1,
            RecordingStatus::Transcribed => 2,
            RecordingStatus::Analyzed => 3,
            RecordingStatus::Failed => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RecordingStatus::Analyzed | RecordingStatus::Failed)
    }

    /// Statuses only move forward; terminal statuses never change.
    pub fn can_transition_to(self, next: RecordingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == RecordingStatus::Failed || next.rank() > self.rank()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recording {
    pub id: RecordingId,
    pub agency_id: AgencyId,
    pub user_id: UserId,
    pub prospect_id: Option<ProspectId>,
    pub zone_id: Option<ZoneId>,
    pub storage_key: StorageKey,
    pub mime_type: String,
    pub size_bytes: i64,
    pub duration_seconds: Option<i32>,
    pub status: RecordingStatus,
    pub transcript: Option<String>,
    pub analysis: Option<Value>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewRecording {
    pub agency_id: AgencyId,
    pub user_id: UserId,
    pub prospect_id: Option<ProspectId>,
    pub zone_id: Option<ZoneId>,
    pub storage_key: StorageKey,
    pub mime_type: String,
    pub size_bytes: i64,
    pub duration_seconds: Option<i32>,
}

/// Progress reported by the transcription pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum RecordingProgress {
    Transcribing,
    Transcribed { transcript: String },
    Analyzed { analysis: Value },
    Failed { error: String },
}

impl RecordingProgress {
    pub fn status(&self) -> RecordingStatus {
        match self {
            RecordingProgress::Transcribing => RecordingStatus::Transcribing,
            RecordingProgress::Transcribed { .. } => RecordingStatus::Transcribed,
            RecordingProgress::Analyzed { .. } => RecordingStatus::Analyzed,
            RecordingProgress::Failed { .. } => RecordingStatus::Failed,
        }
    }
}

/// Returns true when the mime type describes an audio payload.
pub fn is_audio_mime(mime_type: &str) -> bool {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence
        .strip_prefix("audio/")
        .is_some_and(|subtype| !subtype.is_empty())
}
