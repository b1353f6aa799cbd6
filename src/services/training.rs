//! Sales training scenarios and recorded practice sessions.

use crate::domain::training::{
    NewTrainingSession, Scenario, TrainingSession, TrainingStats, UpdateScenario, training_stats,
};
use crate::domain::types::ScenarioId;
use crate::forms::training::{
    ScenarioForm, ScenarioListParams, TrainingSessionForm, TrainingSessionPayload,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{TrainingReader, TrainingWriter, UserReader, UserWriter};
use crate::services::prospects::own_user_id;
use crate::services::{
    ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin, is_admin,
    is_restricted_to_own, upsert_current_user,
};

fn parse_scenario_id(id: i32) -> ServiceResult<ScenarioId> {
    ScenarioId::new(id).map_err(|_| ServiceError::NotFound)
}

pub fn list_scenarios<R>(
    params: ScenarioListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Scenario>>
where
    R: TrainingReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let include_inactive = params.include_inactive && is_admin(user);

    let scenarios = repo
        .list_scenarios(agency_id, include_inactive)
        .map_err(|err| {
            log::error!("Failed to list training scenarios: {err}");
            err
        })?;

    Ok(scenarios)
}

pub fn create_scenario<R>(
    form: ScenarioForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Scenario>
where
    R: TrainingWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let new_scenario = form.into_domain(agency_id)?;

    let scenario = repo.create_scenario(&new_scenario).map_err(|err| {
        log::error!("Failed to create scenario {}: {err}", new_scenario.title);
        err
    })?;

    Ok(scenario)
}

pub fn update_scenario<R>(
    scenario_id: i32,
    form: ScenarioForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Scenario>
where
    R: TrainingWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let scenario_id = parse_scenario_id(scenario_id)?;
    let updates = UpdateScenario::try_from(form)?;

    let scenario = repo
        .update_scenario(scenario_id, agency_id, &updates)
        .map_err(|err| {
            log::error!("Failed to update scenario {scenario_id}: {err}");
            err
        })?;

    Ok(scenario)
}

pub fn set_scenario_active<R>(
    scenario_id: i32,
    active: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Scenario>
where
    R: TrainingWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let scenario_id = parse_scenario_id(scenario_id)?;

    let scenario = repo
        .set_scenario_active(scenario_id, agency_id, active)
        .map_err(|err| {
            log::error!("Failed to set active={active} on scenario {scenario_id}: {err}");
            err
        })?;

    Ok(scenario)
}

/// Stores the caller's score on an active scenario.
pub fn record_session<R>(
    form: TrainingSessionForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<TrainingSession>
where
    R: TrainingReader + TrainingWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let payload = TrainingSessionPayload::try_from(form)?;

    let scenario = repo
        .get_scenario_by_id(payload.scenario_id, agency_id)?
        .ok_or(ServiceError::NotFound)?;
    if !scenario.is_active {
        return Err(ServiceError::Form(format!(
            "scenario {} is no longer active",
            scenario.id
        )));
    }

    let author = upsert_current_user(user, repo)?;
    let session = NewTrainingSession {
        scenario_id: scenario.id,
        user_id: author.id,
        score: payload.score,
        feedback: payload.feedback,
    };

    let stored = repo.create_training_session(&session).map_err(|err| {
        log::error!("Failed to record training session for {}: {err}", author.id);
        err
    })?;

    Ok(stored)
}

/// Session counts and scores per salesperson. Salespeople see their own line.
pub fn get_training_stats<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<TrainingStats>>
where
    R: TrainingReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let user_id = if is_restricted_to_own(user) {
        match own_user_id(user, repo)? {
            Some(own) => Some(own),
            None => return Ok(Vec::new()),
        }
    } else {
        None
    };

    let sessions = repo
        .list_training_sessions(agency_id, user_id)
        .map_err(|err| {
            log::error!("Failed to list training sessions: {err}");
            err
        })?;

    Ok(training_stats(&sessions))
}
