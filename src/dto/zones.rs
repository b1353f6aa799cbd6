use serde::Serialize;

use crate::domain::zone::{RecorderAction, ZoneHit};

/// Answer to a device position update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProximityReport {
    pub zones: Vec<ZoneHit>,
    pub nearest: Option<ZoneHit>,
    pub action: RecorderAction,
}
