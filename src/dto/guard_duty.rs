//! Guard duty views.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::guard_duty::{LoadStats, UserLoad};
use crate::domain::types::{ProspectId, UserId};

/// Open prospect load of a set of salespeople.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoadReport {
    pub date: Option<NaiveDate>,
    pub loads: Vec<UserLoad>,
    pub stats: LoadStats,
}

impl LoadReport {
    pub fn new(date: Option<NaiveDate>, loads: Vec<UserLoad>) -> Self {
        let stats = LoadStats::from_loads(&loads);
        Self { date, loads, stats }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub prospect_id: ProspectId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransferOutcome {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub moved: Vec<ProspectId>,
}
