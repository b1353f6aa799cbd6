//! Dashboard aggregates.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::prospect::ProspectStatus;
use crate::domain::spcc::SpccClassification;
use crate::domain::types::{MoneyCents, UserId};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: ProspectStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationCount {
    /// `None` for prospects that were never evaluated.
    pub classification: Option<SpccClassification>,
    pub label: &'static str,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// Manager dashboard over `[from, to)`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub total_prospects: i64,
    pub sold: i64,
    pub conversion_rate: f64,
    pub by_status: Vec<StatusCount>,
    pub by_classification: Vec<ClassificationCount>,
    pub by_source: Vec<SourceCount>,
    pub recordings: i64,
    pub commission_total: MoneyCents,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalespersonPerformance {
    pub user_id: UserId,
    pub name: String,
    pub open: i64,
    pub sold: i64,
    pub total: i64,
    pub conversion_rate: f64,
    pub commission: MoneyCents,
}

/// `sold / total`, zero for an empty period.
pub fn conversion_rate(sold: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        sold as f64 / total as f64
    }
}
