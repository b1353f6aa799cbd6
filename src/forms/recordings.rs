//! Multipart upload of recorded conversations.

use std::io::Read;

use actix_multipart::form::{MultipartForm, MultipartFormConfig, tempfile::TempFile, text::Text};
use serde::Deserialize;

use crate::domain::recording::{RecordingStatus, is_audio_mime};
use crate::domain::types::{ProspectId, ZoneId};
use crate::forms::{FormError, optional_id};

/// Room for the text fields and part headers sent alongside the audio.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Extractor limits that let a file of exactly `max_recording_bytes`
/// through, so the size check in [`UploadRecordingForm::into_upload`]
/// decides.
pub fn multipart_config(max_recording_bytes: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(max_recording_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
}

#[derive(MultipartForm)]
pub struct UploadRecordingForm {
    pub file: TempFile,
    pub prospect_id: Option<Text<i32>>,
    pub zone_id: Option<Text<i32>>,
    pub duration_seconds: Option<Text<i32>>,
}

/// Validated upload ready to be stored.
#[derive(Debug)]
pub struct RecordingUpload {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub extension: String,
    pub prospect_id: Option<ProspectId>,
    pub zone_id: Option<ZoneId>,
    pub duration_seconds: Option<i32>,
}

impl UploadRecordingForm {
    /// Reads the temporary file, enforcing the configured size limit.
    pub fn into_upload(mut self, max_bytes: u64) -> Result<RecordingUpload, FormError> {
        if self.file.size as u64 > max_bytes {
            return Err(FormError::Upload(format!(
                "file exceeds the {max_bytes} byte limit"
            )));
        }
        let mime_type = self
            .file
            .content_type
            .as_ref()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let mut content = Vec::with_capacity(self.file.size);
        self.file
            .file
            .read_to_end(&mut content)
            .map_err(|err| FormError::Upload(err.to_string()))?;

        RecordingUpload::new(
            content,
            mime_type,
            self.file.file_name.as_deref(),
            self.prospect_id.map(Text::into_inner),
            self.zone_id.map(Text::into_inner),
            self.duration_seconds.map(Text::into_inner),
            max_bytes,
        )
    }
}

impl RecordingUpload {
    pub fn new(
        content: Vec<u8>,
        mime_type: String,
        file_name: Option<&str>,
        prospect_id: Option<i32>,
        zone_id: Option<i32>,
        duration_seconds: Option<i32>,
        max_bytes: u64,
    ) -> Result<Self, FormError> {
        if !is_audio_mime(&mime_type) {
            return Err(FormError::Upload(format!(
                "unsupported content type '{mime_type}'"
            )));
        }
        if content.is_empty() {
            return Err(FormError::Upload("file is empty".to_string()));
        }
        if content.len() as u64 > max_bytes {
            return Err(FormError::Upload(format!(
                "file exceeds the {max_bytes} byte limit"
            )));
        }
        if duration_seconds.is_some_and(|seconds| seconds < 0) {
            return Err(FormError::InvalidValue(
                "duration cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            extension: extension_for(file_name, &mime_type),
            content,
            mime_type,
            prospect_id: optional_id(prospect_id, "prospect")?,
            zone_id: optional_id(zone_id, "zone")?,
            duration_seconds,
        })
    }
}

/// Extension from the file name, falling back to the mime subtype.
fn extension_for(file_name: Option<&str>, mime_type: &str) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_string())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .unwrap_or_else(|| {
            mime_type
                .split('/')
                .nth(1)
                .unwrap_or("bin")
                .to_string()
        })
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordingListParams {
    pub prospect_id: Option<i32>,
    pub status: Option<RecordingStatus>,
    pub page: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_upload_is_accepted() {
        let upload = RecordingUpload::new(
            vec![1, 2, 3],
            "audio/mpeg".into(),
            Some("call.mp3"),
            Some(5),
            None,
            Some(42),
            1024,
        )
        .unwrap();

        assert_eq!(upload.extension, "mp3");
        assert_eq!(upload.prospect_id.map(ProspectId::get), Some(5));
        assert!(upload.zone_id.is_none());
    }

    #[test]
    fn extension_falls_back_to_mime_subtype() {
        assert_eq!(extension_for(None, "audio/ogg"), "ogg");
        assert_eq!(extension_for(Some("noext"), "audio/webm"), "webm");
    }

    #[test]
    fn non_audio_and_oversized_files_are_rejected() {
        assert!(matches!(
            RecordingUpload::new(vec![1], "video/mp4".into(), None, None, None, None, 10),
            Err(FormError::Upload(_))
        ));
        assert!(matches!(
            RecordingUpload::new(vec![0; 11], "audio/wav".into(), None, None, None, None, 10),
            Err(FormError::Upload(_))
        ));
        assert!(matches!(
            RecordingUpload::new(Vec::new(), "audio/wav".into(), None, None, None, None, 10),
            Err(FormError::Upload(_))
        ));
    }
}
