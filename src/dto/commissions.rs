use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::commission::CommissionSummary;
use crate::domain::types::MoneyCents;

/// Commission totals per salesperson over `[from, to)`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommissionReport {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub rows: Vec<CommissionSummary>,
    pub total_commission: MoneyCents,
}

impl CommissionReport {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime, rows: Vec<CommissionSummary>) -> Self {
        let total_commission = rows
            .iter()
            .fold(MoneyCents::ZERO, |acc, row| acc.saturating_add(row.total_commission));
        Self {
            from,
            to,
            rows,
            total_commission,
        }
    }
}
