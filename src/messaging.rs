//! Outbound ZeroMQ messages for the transcription pipeline.

use std::sync::Mutex;

use thiserror::Error;

use crate::models::zmq::ZmqRecordingJob;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("zmq error: {0}")]
    Zmq(#[from] zmq::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("publisher is unavailable")]
    Poisoned,
}

/// Hands recordings over to the transcription service.
pub trait JobPublisher: Send + Sync {
    fn publish_recording_job(&self, job: &ZmqRecordingJob) -> Result<(), PublishError>;
}

/// PUB socket bound once at startup and shared by every worker thread.
pub struct ZmqSender {
    socket: Mutex<zmq::Socket>,
    _context: zmq::Context,
}

impl ZmqSender {
    pub fn start(endpoint: &str) -> Result<Self, PublishError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.bind(endpoint)?;
        log::info!("Publishing recording jobs on {endpoint}");

        Ok(Self {
            socket: Mutex::new(socket),
            _context: context,
        })
    }
}

impl JobPublisher for ZmqSender {
    fn publish_recording_job(&self, job: &ZmqRecordingJob) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(job)?;
        let socket = self.socket.lock().map_err(|_| PublishError::Poisoned)?;
        socket.send(payload, 0)?;
        Ok(())
    }
}
