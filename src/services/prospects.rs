//! Prospect (lead) management: listing, detail, edits, imports, timeline
//! entries and manual assignment.

use chrono::Utc;
use serde_json::json;

use crate::domain::prospect::{Prospect, UpdateProspect};
use crate::domain::prospect_event::{NewProspectEvent, ProspectEvent, ProspectEventType};
use crate::domain::types::{AgencyId, ProspectId, UserEmail, UserId, VehicleId};
use crate::dto::AffectedRows;
use crate::dto::prospects::{CreatedProspect, ProspectDetail, ProspectEventView};
use crate::forms::prospects::{
    AddEventForm, AddEventPayload, AddProspectForm, AssignProspectsForm, AssignProspectsPayload,
    ProspectListParams, UpdateProspectForm, UploadProspectsForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{
    GuardDutyReader, ProspectEventListQuery, ProspectEventReader, ProspectEventWriter,
    ProspectListQuery, ProspectReader, ProspectWriter, SpccReader, UserReader, UserWriter,
    VehicleReader,
};
use crate::services::guard_duty::pick_on_duty;
use crate::services::{
    DEFAULT_ITEMS_PER_PAGE, ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin,
    is_restricted_to_own, upsert_current_user,
};

/// Id of the caller in the agency user table, if they were ever registered.
pub(crate) fn own_user_id<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Option<UserId>>
where
    R: UserReader + ?Sized,
{
    let agency_id = agency_of(user)?;
    let email = UserEmail::new(user.email.as_str())
        .map_err(|_| ServiceError::Unauthorized)?;
    let own = repo.get_user_by_email(&email, agency_id).map_err(|err| {
        log::error!("Failed to look up user {}: {err}", user.email);
        err
    })?;
    Ok(own.map(|u| u.id))
}

/// Loads a prospect of the caller's agency.
pub(crate) fn load_prospect<R>(
    repo: &R,
    prospect_id: ProspectId,
    agency_id: AgencyId,
) -> ServiceResult<Prospect>
where
    R: ProspectReader + ?Sized,
{
    repo.get_prospect_by_id(prospect_id, agency_id)
        .map_err(|err| {
            log::error!("Failed to load prospect {prospect_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Salespeople may only touch prospects assigned to them.
pub(crate) fn ensure_visible<R>(
    user: &AuthenticatedUser,
    repo: &R,
    prospect: &Prospect,
) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
{
    if !is_restricted_to_own(user) {
        return Ok(());
    }
    match own_user_id(user, repo)? {
        Some(own) if prospect.user_id == Some(own) => Ok(()),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Appends a timeline entry.
pub(crate) fn record_event<R>(repo: &R, event: NewProspectEvent) -> ServiceResult<ProspectEvent>
where
    R: ProspectEventWriter + ?Sized,
{
    repo.create_prospect_event(&event)
        .map_err(|err| {
            log::error!(
                "Failed to add {} event to prospect {}: {err}",
                event.event_type,
                event.prospect_id
            );
            err
        })
        .map_err(ServiceError::from)
}

pub(crate) fn parse_prospect_id(id: i32) -> ServiceResult<ProspectId> {
    ProspectId::new(id).map_err(|_| ServiceError::NotFound)
}

fn ensure_vehicle<R>(repo: &R, vehicle_id: Option<VehicleId>, agency_id: AgencyId) -> ServiceResult<()>
where
    R: VehicleReader + ?Sized,
{
    let Some(vehicle_id) = vehicle_id else {
        return Ok(());
    };
    match repo.get_vehicle_by_id(vehicle_id, agency_id)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!("unknown vehicle {vehicle_id}"))),
    }
}

fn ensure_active_user<R>(repo: &R, user_id: UserId, agency_id: AgencyId) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
{
    match repo.get_user_by_id(user_id, agency_id)? {
        Some(found) if found.is_active => Ok(()),
        Some(_) => Err(ServiceError::Form(format!("user {user_id} is inactive"))),
        None => Err(ServiceError::NotFound),
    }
}

/// Paginated prospect listing. Salespeople only see their own prospects.
pub fn list_prospects<R>(
    params: ProspectListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Prospect>>
where
    R: ProspectReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let page = params.page.unwrap_or(1).max(1);

    let mut query = ProspectListQuery::new(agency_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if is_restricted_to_own(user) {
        match own_user_id(user, repo)? {
            Some(own) => query = query.assigned_to(own),
            None => return Ok(Paginated::new(Vec::new(), page, 0, DEFAULT_ITEMS_PER_PAGE)),
        }
    }
    if let Some(search) = params.search {
        query = query.search(search);
    }
    if let Some(status) = params.status {
        query = query.status(status);
    }
    if let Some(classification) = params.classification {
        query = query.classification(classification);
    }

    let (total, prospects) = repo.list_prospects(query).map_err(|err| {
        log::error!("Failed to list prospects: {err}");
        err
    })?;

    Ok(Paginated::new(prospects, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Prospect with its assignee, a page of its timeline and its SPCC history.
pub fn get_prospect<R>(
    prospect_id: i32,
    events_page: Option<usize>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProspectDetail>
where
    R: ProspectReader + UserReader + ProspectEventReader + SpccReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let prospect = load_prospect(repo, parse_prospect_id(prospect_id)?, agency_id)?;
    ensure_visible(user, repo, &prospect)?;

    let assignee = match prospect.user_id {
        Some(user_id) => repo.get_user_by_id(user_id, agency_id)?,
        None => None,
    };

    let page = events_page.unwrap_or(1).max(1);
    let (total_events, events) = repo
        .list_prospect_events(
            ProspectEventListQuery::new(prospect.id).paginate(page, DEFAULT_ITEMS_PER_PAGE),
        )
        .map_err(|err| {
            log::error!("Failed to list events of prospect {}: {err}", prospect.id);
            err
        })?;

    let evaluations = repo.list_spcc_evaluations(prospect.id).map_err(|err| {
        log::error!("Failed to list evaluations of prospect {}: {err}", prospect.id);
        err
    })?;

    Ok(ProspectDetail {
        prospect,
        assignee,
        events: events.into_iter().map(ProspectEventView::from).collect(),
        total_events,
        evaluations,
    })
}

/// Stores a new prospect. Salespeople always own what they create; managers
/// may name a salesperson or route the lead through today's guard roster.
pub fn create_prospect<R>(
    form: AddProspectForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CreatedProspect>
where
    R: ProspectWriter
        + ProspectEventWriter
        + UserReader
        + UserWriter
        + VehicleReader
        + GuardDutyReader
        + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let payload = form.into_payload(agency_id)?;
    let mut new_prospect = payload.prospect;
    ensure_vehicle(repo, new_prospect.vehicle_id, agency_id)?;

    let author = upsert_current_user(user, repo)?;

    let mut auto_assigned = false;
    if is_restricted_to_own(user) {
        new_prospect = new_prospect.assigned_to(Some(author.id));
    } else if let Some(user_id) = new_prospect.user_id {
        ensure_active_user(repo, user_id, agency_id)?;
    } else if payload.auto_assign {
        let today = Utc::now().date_naive();
        if let Some(user_id) = pick_on_duty(repo, agency_id, today)? {
            new_prospect = new_prospect.assigned_to(Some(user_id));
            auto_assigned = true;
        } else {
            log::warn!("No salesperson on duty on {today} for agency {agency_id}");
        }
    }

    let prospect = repo.create_prospect(&new_prospect).map_err(|err| {
        log::error!("Failed to create prospect {}: {err}", new_prospect.name);
        err
    })?;

    if let Some(assignee) = prospect.user_id {
        record_event(
            repo,
            NewProspectEvent::new(
                prospect.id,
                author.id,
                ProspectEventType::Assignment,
                json!({ "from": null, "to": assignee.get(), "auto": auto_assigned }),
            ),
        )?;
    }

    Ok(CreatedProspect {
        prospect,
        auto_assigned,
    })
}

/// Replaces the editable fields. A stage change is logged on the timeline.
pub fn update_prospect<R>(
    prospect_id: i32,
    form: UpdateProspectForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Prospect>
where
    R: ProspectReader
        + ProspectWriter
        + ProspectEventWriter
        + UserReader
        + UserWriter
        + VehicleReader
        + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let updates = UpdateProspect::try_from(form)?;
    let current = load_prospect(repo, parse_prospect_id(prospect_id)?, agency_id)?;
    ensure_visible(user, repo, &current)?;
    ensure_vehicle(repo, updates.vehicle_id, agency_id)?;

    let updated = repo
        .update_prospect(current.id, agency_id, &updates)
        .map_err(|err| {
            log::error!("Failed to update prospect {}: {err}", current.id);
            err
        })?;

    if current.status != updated.status {
        let author = upsert_current_user(user, repo)?;
        record_event(
            repo,
            NewProspectEvent::new(
                updated.id,
                author.id,
                ProspectEventType::StatusChange,
                json!({ "from": current.status, "to": updated.status }),
            ),
        )?;
    }

    Ok(updated)
}

pub fn delete_prospect<R>(prospect_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ProspectWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let prospect_id = parse_prospect_id(prospect_id)?;

    repo.delete_prospect(prospect_id, agency_id).map_err(|err| {
        log::error!("Failed to delete prospect {prospect_id}: {err}");
        err
    })?;

    Ok(())
}

/// Bulk import from CSV. Nothing is stored unless every row is valid.
pub fn import_prospects<R>(
    mut form: UploadProspectsForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AffectedRows>
where
    R: ProspectWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let prospects = form.parse(agency_id).map_err(|err| {
        log::warn!("Rejected prospect import: {err}");
        err
    })?;

    let affected = repo.create_prospects(&prospects).map_err(|err| {
        log::error!("Failed to import {} prospects: {err}", prospects.len());
        err
    })?;

    Ok(AffectedRows { affected })
}

/// Adds a comment, call or other manual entry to the timeline.
pub fn add_prospect_event<R>(
    prospect_id: i32,
    form: AddEventForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProspectEvent>
where
    R: ProspectReader + ProspectEventWriter + UserReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let payload = AddEventPayload::try_from(form)?;
    let prospect = load_prospect(repo, parse_prospect_id(prospect_id)?, agency_id)?;
    ensure_visible(user, repo, &prospect)?;

    let author = upsert_current_user(user, repo)?;
    record_event(
        repo,
        NewProspectEvent::new(
            prospect.id,
            author.id,
            payload.event_type,
            json!({ "text": payload.text.as_str() }),
        ),
    )
}

/// Reassigns prospects of the agency. Ids outside the agency are skipped.
pub fn assign_prospects<R>(
    form: AssignProspectsForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AffectedRows>
where
    R: ProspectReader + ProspectWriter + ProspectEventWriter + UserReader + UserWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let payload = AssignProspectsPayload::try_from(form)?;
    if let Some(user_id) = payload.user_id {
        ensure_active_user(repo, user_id, agency_id)?;
    }

    let mut previous = Vec::with_capacity(payload.prospect_ids.len());
    for prospect_id in &payload.prospect_ids {
        if let Some(prospect) = repo.get_prospect_by_id(*prospect_id, agency_id)? {
            previous.push((prospect.id, prospect.user_id));
        }
    }
    let ids: Vec<ProspectId> = previous.iter().map(|(id, _)| *id).collect();

    let affected = repo
        .assign_prospects(agency_id, payload.user_id, &ids)
        .map_err(|err| {
            log::error!("Failed to assign {} prospects: {err}", ids.len());
            err
        })?;

    let author = upsert_current_user(user, repo)?;
    for (prospect_id, from) in previous {
        record_event(
            repo,
            NewProspectEvent::new(
                prospect_id,
                author.id,
                ProspectEventType::Assignment,
                json!({
                    "from": from.map(UserId::get),
                    "to": payload.user_id.map(UserId::get),
                    "auto": false,
                }),
            ),
        )?;
    }

    Ok(AffectedRows { affected })
}
