use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{ProspectEventId, ProspectId, UserId};

text_enum!(
    /// Kind of entry on a prospect timeline.
    ProspectEventType,
    "event type",
    { Comment, Call, StatusChange, Assignment, Evaluation, Recording, Sale, Other }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProspectEvent {
    pub id: ProspectEventId,
    pub prospect_id: ProspectId,
    pub user_id: UserId,
    pub event_type: ProspectEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewProspectEvent {
    pub prospect_id: ProspectId,
    pub user_id: UserId,
    pub event_type: ProspectEventType,
    pub event_data: Value,
}

impl NewProspectEvent {
    #[must_use]
    pub fn new(
        prospect_id: ProspectId,
        user_id: UserId,
        event_type: ProspectEventType,
        event_data: Value,
    ) -> Self {
        Self {
            prospect_id,
            user_id,
            event_type,
            event_data,
        }
    }
}
