//! Commission rules, sale registration and commission reporting.

use chrono::Utc;
use serde_json::json;

use crate::domain::commission::{
    Commission, CommissionRule, NewCommission, summarize_commissions,
};
use crate::domain::prospect::ProspectStatus;
use crate::domain::prospect_event::{NewProspectEvent, ProspectEventType};
use crate::domain::types::CommissionId;
use crate::dto::commissions::CommissionReport;
use crate::forms::commissions::{
    CommissionRuleForm, CommissionStatusForm, DateRangeParams, RegisterSaleForm,
    RegisterSalePayload,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    CommissionReader, CommissionWriter, DateRange, ProspectEventWriter, ProspectReader, ProspectWriter,
    UserReader, UserWriter, VehicleReader,
};
use crate::services::prospects::{ensure_visible, load_prospect, own_user_id, record_event};
use crate::services::{
    ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin, is_restricted_to_own,
    upsert_current_user,
};

fn parse_commission_id(id: i32) -> ServiceResult<CommissionId> {
    CommissionId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Creates or replaces the rule of a sale type.
pub fn set_commission_rule<R>(
    form: CommissionRuleForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CommissionRule>
where
    R: CommissionWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let rule = form.into_domain(agency_id)?;

    let stored = repo.upsert_commission_rule(&rule).map_err(|err| {
        log::error!("Failed to save {} commission rule: {err}", rule.sale_type);
        err
    })?;

    Ok(stored)
}

pub fn list_commission_rules<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<CommissionRule>>
where
    R: CommissionReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let rules = repo.list_commission_rules(agency_id).map_err(|err| {
        log::error!("Failed to list commission rules: {err}");
        err
    })?;

    Ok(rules)
}

/// Records a sale and its `Pending` commission. A linked prospect is closed
/// as `Sold`.
pub fn register_sale<R>(
    form: RegisterSaleForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Commission>
where
    R: CommissionReader
        + CommissionWriter
        + ProspectReader
        + ProspectWriter
        + ProspectEventWriter
        + UserReader
        + UserWriter
        + VehicleReader
        + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let payload = RegisterSalePayload::try_from(form)?;
    let author = upsert_current_user(user, repo)?;

    let seller_id = match payload.user_id {
        Some(seller_id) if seller_id != author.id => {
            if is_restricted_to_own(user) {
                return Err(ServiceError::Unauthorized);
            }
            repo.get_user_by_id(seller_id, agency_id)?
                .ok_or(ServiceError::NotFound)?
                .id
        }
        _ => author.id,
    };

    let prospect = match payload.prospect_id {
        Some(prospect_id) => {
            let prospect = load_prospect(repo, prospect_id, agency_id)?;
            ensure_visible(user, repo, &prospect)?;
            Some(prospect)
        }
        None => None,
    };
    if let Some(vehicle_id) = payload.vehicle_id
        && repo.get_vehicle_by_id(vehicle_id, agency_id)?.is_none()
    {
        return Err(ServiceError::Form(format!("unknown vehicle {vehicle_id}")));
    }

    let rule = repo
        .get_commission_rule(agency_id, payload.sale_type)?
        .ok_or_else(|| {
            ServiceError::Form(format!(
                "no commission rule for {} sales",
                payload.sale_type
            ))
        })?;

    let new_commission = NewCommission {
        agency_id,
        user_id: seller_id,
        prospect_id: payload.prospect_id,
        vehicle_id: payload.vehicle_id,
        sale_type: payload.sale_type,
        sale_amount: payload.sale_amount,
        commission: rule.commission_for(payload.sale_amount),
        sold_at: payload.sold_at,
    };
    let commission = repo.create_commission(&new_commission).map_err(|err| {
        log::error!("Failed to register sale for user {seller_id}: {err}");
        err
    })?;

    if let Some(prospect) = prospect
        && prospect.status != ProspectStatus::Sold
    {
        repo.set_prospect_status(prospect.id, agency_id, ProspectStatus::Sold)
            .map_err(|err| {
                log::error!("Failed to close prospect {}: {err}", prospect.id);
                err
            })?;
        record_event(
            repo,
            NewProspectEvent::new(
                prospect.id,
                author.id,
                ProspectEventType::StatusChange,
                json!({
                    "from": prospect.status,
                    "to": ProspectStatus::Sold,
                    "commission_id": commission.id.get(),
                }),
            ),
        )?;
    }

    Ok(commission)
}

/// Moves a commission through `Pending -> Approved -> Paid` or rejects it.
pub fn set_commission_status<R>(
    commission_id: i32,
    form: CommissionStatusForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Commission>
where
    R: CommissionReader + CommissionWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let current = repo
        .get_commission_by_id(parse_commission_id(commission_id)?, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    if !current.status.can_transition_to(form.status) {
        return Err(ServiceError::Form(format!(
            "commission cannot move from {} to {}",
            current.status, form.status
        )));
    }

    let updated = repo
        .set_commission_status(current.id, agency_id, form.status)
        .map_err(|err| {
            log::error!("Failed to set commission {} to {}: {err}", current.id, form.status);
            err
        })?;

    Ok(updated)
}

fn commissions_in_range<R>(
    range: DateRange,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Commission>>
where
    R: CommissionReader + UserReader + ?Sized,
{
    let agency_id = agency_of(user)?;
    let user_id = if is_restricted_to_own(user) {
        match own_user_id(user, repo)? {
            Some(own) => Some(own),
            None => return Ok(Vec::new()),
        }
    } else {
        None
    };

    let commissions = repo
        .list_commissions(agency_id, range, user_id)
        .map_err(|err| {
            log::error!("Failed to list commissions: {err}");
            err
        })?;

    Ok(commissions)
}

/// Commissions sold in the period. Salespeople only see their own.
pub fn list_commissions<R>(
    params: DateRangeParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Commission>>
where
    R: CommissionReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let range = params.into_range(Utc::now().date_naive())?;
    commissions_in_range(range, user, repo)
}

/// Per-salesperson totals over the period; rejected commissions are left out.
pub fn commission_summary<R>(
    params: DateRangeParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CommissionReport>
where
    R: CommissionReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let range = params.into_range(Utc::now().date_naive())?;
    let (from, to) = (range.from, range.to);
    let commissions = commissions_in_range(range, user, repo)?;

    Ok(CommissionReport::new(
        from,
        to,
        summarize_commissions(&commissions),
    ))
}
