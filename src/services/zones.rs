//! Proximity zones and the recorder trigger.

use crate::domain::types::ZoneId;
use crate::domain::zone::{
    UpdateZone, Zone, decide_recorder_action, nearest_zone, zones_containing,
};
use crate::dto::zones::ProximityReport;
use crate::forms::zones::{ProximityForm, ProximityPayload, ZoneForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ZoneReader, ZoneWriter};
use crate::services::{
    ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin, is_admin,
};

fn parse_zone_id(id: i32) -> ServiceResult<ZoneId> {
    ZoneId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Managers see every zone; everyone else only the active ones.
pub fn list_zones<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Zone>>
where
    R: ZoneReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let zones = repo
        .list_zones(agency_id, !is_admin(user))
        .map_err(|err| {
            log::error!("Failed to list zones: {err}");
            err
        })?;

    Ok(zones)
}

pub fn create_zone<R>(form: ZoneForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Zone>
where
    R: ZoneWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let new_zone = form.into_domain(agency_id)?;

    let zone = repo.create_zone(&new_zone).map_err(|err| {
        log::error!("Failed to create zone {}: {err}", new_zone.name);
        err
    })?;

    Ok(zone)
}

pub fn update_zone<R>(
    zone_id: i32,
    form: ZoneForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Zone>
where
    R: ZoneWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let zone_id = parse_zone_id(zone_id)?;
    let updates = UpdateZone::try_from(form)?;

    let zone = repo.update_zone(zone_id, agency_id, &updates).map_err(|err| {
        log::error!("Failed to update zone {zone_id}: {err}");
        err
    })?;

    Ok(zone)
}

pub fn delete_zone<R>(zone_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ZoneWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let zone_id = parse_zone_id(zone_id)?;

    repo.delete_zone(zone_id, agency_id).map_err(|err| {
        log::error!("Failed to delete zone {zone_id}: {err}");
        err
    })?;

    Ok(())
}

/// Matches a device position against the agency's active zones and tells the
/// recorder whether to start, stop or keep its current state.
pub fn check_proximity<R>(
    form: ProximityForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProximityReport>
where
    R: ZoneReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let payload = ProximityPayload::try_from(form)?;
    let zones = repo.list_zones(agency_id, true).map_err(|err| {
        log::error!("Failed to load zones for proximity check: {err}");
        err
    })?;

    let hits = zones_containing(payload.position, &zones);
    let action = decide_recorder_action(!hits.is_empty(), payload.recording_active);

    Ok(ProximityReport {
        nearest: nearest_zone(payload.position, &zones),
        zones: hits,
        action,
    })
}
