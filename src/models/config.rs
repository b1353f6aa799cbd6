//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HMAC secret for session cookies and JWT validation.
    pub secret: String,
    /// Directory where uploaded recordings are stored.
    pub storage_dir: String,
    #[serde(default = "default_max_recording_bytes")]
    pub max_recording_bytes: usize,
    /// Endpoint the server publishes transcription jobs to.
    pub zmq_recordings_pub: String,
    /// Endpoint the worker reads transcription results from.
    pub zmq_recordings_sub: String,
}

fn default_max_recording_bytes() -> usize {
    50 * 1024 * 1024
}
