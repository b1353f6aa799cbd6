//! Prospect detail and timeline views.

use serde::Serialize;

use crate::domain::prospect::Prospect;
use crate::domain::prospect_event::ProspectEvent;
use crate::domain::spcc::SpccEvaluation;
use crate::domain::user::User;

/// Timeline entry with the author's display name.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProspectEventView {
    #[serde(flatten)]
    pub event: ProspectEvent,
    pub author: String,
}

impl From<(ProspectEvent, User)> for ProspectEventView {
    fn from((event, user): (ProspectEvent, User)) -> Self {
        Self {
            event,
            author: user.name.into_inner(),
        }
    }
}

/// Everything the prospect page needs in one response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProspectDetail {
    pub prospect: Prospect,
    pub assignee: Option<User>,
    pub events: Vec<ProspectEventView>,
    pub total_events: usize,
    pub evaluations: Vec<SpccEvaluation>,
}

/// Result of creating a prospect, possibly routed through guard duty.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatedProspect {
    #[serde(flatten)]
    pub prospect: Prospect,
    pub auto_assigned: bool,
}
