//! Messages exchanged with the transcription pipeline over ZeroMQ.

use serde::{Deserialize, Serialize};

use crate::domain::recording::RecordingProgress;

/// Published after a recording has been stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZmqRecordingJob {
    pub recording_id: i32,
    pub agency_id: i32,
    pub storage_key: String,
    pub mime_type: String,
    pub prospect_id: Option<i32>,
}

/// Progress report received from the transcription pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZmqRecordingUpdate {
    pub recording_id: i32,
    pub agency_id: i32,
    pub progress: RecordingProgress,
}
