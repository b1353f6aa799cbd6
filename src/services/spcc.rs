//! SPCC lead scoring of prospects.

use serde_json::json;

use crate::domain::prospect_event::{NewProspectEvent, ProspectEventType};
use crate::domain::spcc::{NewSpccEvaluation, SpccEvaluation, SpccPillars};
use crate::forms::spcc::SpccForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ProspectEventWriter, ProspectReader, SpccReader, SpccWriter, UserReader, UserWriter,
};
use crate::services::prospects::{ensure_visible, load_prospect, parse_prospect_id, record_event};
use crate::services::{ServiceResult, agency_of, ensure_access, upsert_current_user};

/// Scores a prospect. The repository caches the total and classification on
/// the prospect; the timeline gets an `Evaluation` entry.
pub fn evaluate_prospect<R>(
    prospect_id: i32,
    form: SpccForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SpccEvaluation>
where
    R: ProspectReader + SpccWriter + ProspectEventWriter + UserReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let pillars = SpccPillars::try_from(form)?;
    let prospect = load_prospect(repo, parse_prospect_id(prospect_id)?, agency_id)?;
    ensure_visible(user, repo, &prospect)?;

    let author = upsert_current_user(user, repo)?;
    let evaluation = repo
        .create_spcc_evaluation(&NewSpccEvaluation::new(prospect.id, author.id, pillars))
        .map_err(|err| {
            log::error!("Failed to store evaluation of prospect {}: {err}", prospect.id);
            err
        })?;

    record_event(
        repo,
        NewProspectEvent::new(
            prospect.id,
            author.id,
            ProspectEventType::Evaluation,
            json!({
                "total": evaluation.total,
                "classification": evaluation.classification,
                "label": evaluation.classification.label(),
            }),
        ),
    )?;

    Ok(evaluation)
}

/// Evaluation history of a prospect, newest first.
pub fn list_evaluations<R>(
    prospect_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<SpccEvaluation>>
where
    R: ProspectReader + SpccReader + UserReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let prospect = load_prospect(repo, parse_prospect_id(prospect_id)?, agency_id)?;
    ensure_visible(user, repo, &prospect)?;

    let evaluations = repo.list_spcc_evaluations(prospect.id).map_err(|err| {
        log::error!("Failed to list evaluations of prospect {}: {err}", prospect.id);
        err
    })?;

    Ok(evaluations)
}
