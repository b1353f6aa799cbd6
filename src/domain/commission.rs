//! Commission rules, per-sale commissions and their aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AgencyId, BasisPoints, CommissionId, CommissionRuleId, MoneyCents, ProspectId, UserId,
    VehicleId,
};

text_enum!(
    /// Kind of sale a commission rule applies to.
    SaleType,
    "sale type",
    { New, Used, Financing, Accessories }
);

text_enum!(
    CommissionStatus,
    "commission status",
    { Pending, Approved, Paid, Rejected }
);

impl CommissionStatus {
    /// `Pending -> Approved -> Paid`; anything not yet paid may be rejected.
    pub fn can_transition_to(self, next: CommissionStatus) -> bool {
        use CommissionStatus::*;

        matches!(
            (self, next),
            (Pending, Approved) | (Approved, Paid) | (Pending, Rejected) | (Approved, Rejected)
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommissionRule {
    pub id: CommissionRuleId,
    pub agency_id: AgencyId,
    pub sale_type: SaleType,
    pub percent: BasisPoints,
    pub fixed_bonus: MoneyCents,
}

impl CommissionRule {
    pub fn commission_for(&self, amount: MoneyCents) -> MoneyCents {
        calculate_commission(amount, self.percent, self.fixed_bonus)
    }
}

#[derive(Clone, Debug)]
pub struct NewCommissionRule {
    pub agency_id: AgencyId,
    pub sale_type: SaleType,
    pub percent: BasisPoints,
    pub fixed_bonus: MoneyCents,
}

/// `amount * percent / 10_000 + bonus`, rounded down to the cent.
pub fn calculate_commission(
    amount: MoneyCents,
    percent: BasisPoints,
    fixed_bonus: MoneyCents,
) -> MoneyCents {
    let variable = i128::from(amount.get()) * i128::from(percent.get())
        / i128::from(BasisPoints::MAX);
    // variable <= amount because percent <= 100 %
    let variable = MoneyCents::new(variable as i64).unwrap_or(MoneyCents::ZERO);
    variable.saturating_add(fixed_bonus)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Commission {
    pub id: CommissionId,
    pub agency_id: AgencyId,
    pub user_id: UserId,
    pub prospect_id: Option<ProspectId>,
    pub vehicle_id: Option<VehicleId>,
    pub sale_type: SaleType,
    pub sale_amount: MoneyCents,
    pub commission: MoneyCents,
    pub status: CommissionStatus,
    pub sold_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewCommission {
    pub agency_id: AgencyId,
    pub user_id: UserId,
    pub prospect_id: Option<ProspectId>,
    pub vehicle_id: Option<VehicleId>,
    pub sale_type: SaleType,
    pub sale_amount: MoneyCents,
    pub commission: MoneyCents,
    pub sold_at: NaiveDateTime,
}

/// Per-salesperson totals over a period. Rejected commissions are skipped.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct CommissionSummary {
    pub user_id: Option<UserId>,
    pub units: usize,
    pub total_sales: MoneyCents,
    pub total_commission: MoneyCents,
    pub pending: MoneyCents,
    pub approved: MoneyCents,
    pub paid: MoneyCents,
}

pub fn summarize_commissions(commissions: &[Commission]) -> Vec<CommissionSummary> {
    let mut by_user: BTreeMap<UserId, CommissionSummary> = BTreeMap::new();

    for commission in commissions
        .iter()
        .filter(|c| c.status != CommissionStatus::Rejected)
    {
        let summary = by_user
            .entry(commission.user_id)
            .or_insert_with(|| CommissionSummary {
                user_id: Some(commission.user_id),
                ..CommissionSummary::default()
            });

        summary.units += 1;
        summary.total_sales = summary.total_sales.saturating_add(commission.sale_amount);
        summary.total_commission = summary.total_commission.saturating_add(commission.commission);
        match commission.status {
            CommissionStatus::Pending => {
                summary.pending = summary.pending.saturating_add(commission.commission)
            }
            CommissionStatus::Approved => {
                summary.approved = summary.approved.saturating_add(commission.commission)
            }
            CommissionStatus::Paid => {
                summary.paid = summary.paid.saturating_add(commission.commission)
            }
            CommissionStatus::Rejected => {}
        }
    }

    by_user.into_values().collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn money(value: i64) -> MoneyCents {
        MoneyCents::new(value).unwrap()
    }

    fn commission(id: i32, user: i32, amount: i64, value: i64, status: CommissionStatus) -> Commission {
        let now = Utc::now().naive_utc();
        Commission {
            id: CommissionId::new(id).unwrap(),
            agency_id: AgencyId::new(1).unwrap(),
            user_id: UserId::new(user).unwrap(),
            prospect_id: None,
            vehicle_id: None,
            sale_type: SaleType::New,
            sale_amount: money(amount),
            commission: money(value),
            status,
            sold_at: now,
            created_at: now,
        }
    }

    #[test]
    fn calculates_percentage_plus_bonus() {
        // 1.5 % of 450,000.00 + 1,000.00
        let value = calculate_commission(
            money(45_000_000),
            BasisPoints::new(150).unwrap(),
            money(100_000),
        );
        assert_eq!(value, money(775_000));
    }

    #[test]
    fn rounds_down_to_the_cent() {
        // 0.33 % of 0.99 = 0.003267 -> 0
        let value = calculate_commission(money(99), BasisPoints::new(33).unwrap(), MoneyCents::ZERO);
        assert_eq!(value, MoneyCents::ZERO);
        // 2.5 % of 10.01 = 0.25025 -> 0.25
        let value = calculate_commission(money(1001), BasisPoints::new(250).unwrap(), MoneyCents::ZERO);
        assert_eq!(value, money(25));
    }

    #[test]
    fn large_amounts_do_not_overflow() {
        let value = calculate_commission(
            money(i64::MAX),
            BasisPoints::new(10_000).unwrap(),
            money(1),
        );
        assert_eq!(value, money(i64::MAX));
    }

    #[test]
    fn status_transitions() {
        use CommissionStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
    }

    #[test]
    fn summary_groups_by_user_and_skips_rejected() {
        let commissions = vec![
            commission(1, 2, 1_000, 10, CommissionStatus::Pending),
            commission(2, 2, 2_000, 20, CommissionStatus::Paid),
            commission(3, 1, 5_000, 50, CommissionStatus::Approved),
            commission(4, 1, 9_000, 90, CommissionStatus::Rejected),
        ];

        let summary = summarize_commissions(&commissions);
        assert_eq!(summary.len(), 2);

        let first = &summary[0];
        assert_eq!(first.user_id, Some(UserId::new(1).unwrap()));
        assert_eq!(first.units, 1);
        assert_eq!(first.total_commission, money(50));
        assert_eq!(first.approved, money(50));

        let second = &summary[1];
        assert_eq!(second.units, 2);
        assert_eq!(second.total_sales, money(3_000));
        assert_eq!(second.pending, money(10));
        assert_eq!(second.paid, money(20));
    }
}
