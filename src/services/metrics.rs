//! Manager dashboard and salesperson performance reports.

use std::collections::HashMap;

use chrono::Utc;

use crate::domain::commission::{CommissionStatus, summarize_commissions};
use crate::domain::prospect::ProspectStatus;
use crate::domain::types::MoneyCents;
use crate::dto::metrics::{
    ClassificationCount, Dashboard, SalespersonPerformance, SourceCount, StatusCount,
    conversion_rate,
};
use crate::forms::commissions::DateRangeParams;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CommissionReader, MetricsReader, UserReader};
use crate::services::{ServiceResult, agency_of, ensure_admin};

/// Label of prospects without an SPCC evaluation.
pub const UNEVALUATED_LABEL: &str = "Sin evaluar";

pub fn dashboard<R>(
    params: DateRangeParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Dashboard>
where
    R: MetricsReader + CommissionReader + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let range = params.into_range(Utc::now().date_naive())?;

    let by_status = repo
        .count_prospects_by_status(agency_id, range)
        .map_err(|err| {
            log::error!("Failed to count prospects by status: {err}");
            err
        })?;
    let by_classification = repo.count_prospects_by_classification(agency_id, range)?;
    let by_source = repo.count_prospects_by_source(agency_id, range)?;
    let recordings = repo.count_recordings(agency_id, range)?;
    let commissions = repo
        .list_commissions(agency_id, range, None)
        .map_err(|err| {
            log::error!("Failed to load commissions for dashboard: {err}");
            err
        })?;

    let total_prospects = by_status.iter().map(|(_, count)| count).sum();
    let sold = by_status
        .iter()
        .filter(|(status, _)| *status == ProspectStatus::Sold)
        .map(|(_, count)| count)
        .sum();
    let commission_total = commissions
        .iter()
        .filter(|c| c.status != CommissionStatus::Rejected)
        .fold(MoneyCents::ZERO, |acc, c| acc.saturating_add(c.commission));

    Ok(Dashboard {
        from: range.from,
        to: range.to,
        total_prospects,
        sold,
        conversion_rate: conversion_rate(sold, total_prospects),
        by_status: by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        by_classification: by_classification
            .into_iter()
            .map(|(classification, count)| ClassificationCount {
                classification,
                label: classification.map_or(UNEVALUATED_LABEL, |c| c.label()),
                count,
            })
            .collect(),
        by_source: by_source
            .into_iter()
            .map(|(source, count)| SourceCount { source, count })
            .collect(),
        recordings,
        commission_total,
    })
}

/// Prospect counts, conversion and commission per salesperson, best sellers first.
pub fn salesperson_performance<R>(
    params: DateRangeParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<SalespersonPerformance>>
where
    R: MetricsReader + CommissionReader + UserReader + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let range = params.into_range(Utc::now().date_naive())?;

    let counts = repo
        .count_prospects_by_user(agency_id, range)
        .map_err(|err| {
            log::error!("Failed to count prospects by user: {err}");
            err
        })?;
    let users = repo.list_users(agency_id)?;
    let commissions = repo.list_commissions(agency_id, range, None)?;

    let counts: HashMap<_, _> = counts.into_iter().map(|c| (c.user_id, c)).collect();
    let earned: HashMap<_, _> = summarize_commissions(&commissions)
        .into_iter()
        .filter_map(|s| s.user_id.map(|id| (id, s.total_commission)))
        .collect();

    let mut report: Vec<SalespersonPerformance> = users
        .into_iter()
        .filter(|u| u.is_active || counts.contains_key(&u.id) || earned.contains_key(&u.id))
        .map(|u| {
            let (open, sold, total) = counts
                .get(&u.id)
                .map_or((0, 0, 0), |c| (c.open, c.sold, c.total));
            SalespersonPerformance {
                user_id: u.id,
                name: u.name.into_inner(),
                open,
                sold,
                total,
                conversion_rate: conversion_rate(sold, total),
                commission: earned.get(&u.id).copied().unwrap_or(MoneyCents::ZERO),
            }
        })
        .collect();

    report.sort_by(|a, b| {
        b.sold
            .cmp(&a.sold)
            .then(b.commission.cmp(&a.commission))
            .then(a.name.cmp(&b.name))
    });

    Ok(report)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::commission::{Commission, SaleType};
    use crate::domain::spcc::SpccClassification;
    use crate::domain::types::{AgencyId, CommissionId, UserId};
    use crate::repository::SalespersonCounts;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{admin, seller, timestamp, user as build_user};

    fn commission(user_id: i32, value: i64, status: CommissionStatus) -> Commission {
        Commission {
            id: CommissionId::new(1).unwrap(),
            agency_id: AgencyId::new(1).unwrap(),
            user_id: UserId::new(user_id).unwrap(),
            prospect_id: None,
            vehicle_id: None,
            sale_type: SaleType::Used,
            sale_amount: MoneyCents::new(value * 100).unwrap(),
            commission: MoneyCents::new(value).unwrap(),
            status,
            sold_at: timestamp(),
            created_at: timestamp(),
        }
    }

    #[test]
    fn dashboard_aggregates_period() {
        let mut repo = MockRepository::new();
        repo.expect_count_prospects_by_status().returning(|_, _| {
            Ok(vec![
                (ProspectStatus::New, 5),
                (ProspectStatus::Negotiation, 3),
                (ProspectStatus::Sold, 2),
            ])
        });
        repo.expect_count_prospects_by_classification().returning(|_, _| {
            Ok(vec![(None, 6), (Some(SpccClassification::Elite), 4)])
        });
        repo.expect_count_prospects_by_source()
            .returning(|_, _| Ok(vec![("walk-in".to_string(), 10)]));
        repo.expect_count_recordings().returning(|_, _| Ok(12));
        repo.expect_list_commissions().returning(|_, _, _| {
            Ok(vec![
                commission(2, 500, CommissionStatus::Paid),
                commission(2, 900, CommissionStatus::Rejected),
                commission(3, 300, CommissionStatus::Pending),
            ])
        });

        let dashboard = dashboard(DateRangeParams::default(), &admin(), &repo).unwrap();

        assert_eq!(dashboard.total_prospects, 10);
        assert_eq!(dashboard.sold, 2);
        assert!((dashboard.conversion_rate - 0.2).abs() < f64::EPSILON);
        assert_eq!(dashboard.by_classification[0].label, UNEVALUATED_LABEL);
        assert_eq!(dashboard.by_classification[1].label, "Elite");
        assert_eq!(dashboard.recordings, 12);
        assert_eq!(dashboard.commission_total.get(), 800);
    }

    #[test]
    fn dashboard_is_manager_only() {
        let repo = MockRepository::new();

        let result = dashboard(DateRangeParams::default(), &seller(), &repo);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn performance_ranks_by_sales() {
        let mut repo = MockRepository::new();
        repo.expect_count_prospects_by_user().returning(|_, _| {
            Ok(vec![
                SalespersonCounts {
                    user_id: UserId::new(2).unwrap(),
                    open: 4,
                    sold: 1,
                    total: 5,
                },
                SalespersonCounts {
                    user_id: UserId::new(3).unwrap(),
                    open: 1,
                    sold: 3,
                    total: 4,
                },
            ])
        });
        repo.expect_list_users().returning(|_| {
            let mut retired = build_user(4, "Retired");
            retired.is_active = false;
            Ok(vec![build_user(2, "Ana"), build_user(3, "Luis"), retired])
        });
        repo.expect_list_commissions()
            .returning(|_, _, _| Ok(vec![commission(3, 700, CommissionStatus::Approved)]));

        let report = salesperson_performance(DateRangeParams::default(), &admin(), &repo).unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Luis");
        assert_eq!(report[0].commission.get(), 700);
        assert!((report[0].conversion_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(report[1].name, "Ana");
        assert_eq!(report[1].commission, MoneyCents::ZERO);
    }
}
