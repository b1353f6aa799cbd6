//! Guard duty (guardia): daily roster, salesperson load and lead balancing.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::domain::guard_duty::{GuardDuty, pick_assignee};
use crate::domain::prospect_event::{NewProspectEvent, ProspectEventType};
use crate::domain::types::{AgencyId, ProspectId, UserId};
use crate::dto::guard_duty::{AssignmentOutcome, LoadReport, TransferOutcome};
use crate::forms::guard_duty::{
    AutoAssignForm, AutoAssignPayload, RosterForm, RosterPayload, TransferForm, TransferPayload,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    GuardDutyReader, GuardDutyWriter, ProspectEventWriter, ProspectReader, ProspectWriter,
    UserReader, UserWriter,
};
use crate::services::prospects::{load_prospect, record_event};
use crate::services::{
    ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin, upsert_current_user,
};

/// Least-loaded salesperson on the roster of `date`, if anyone is on duty.
pub(crate) fn pick_on_duty<R>(
    repo: &R,
    agency_id: AgencyId,
    date: NaiveDate,
) -> ServiceResult<Option<UserId>>
where
    R: GuardDutyReader + UserReader + ?Sized,
{
    let roster = repo.list_roster(agency_id, date).map_err(|err| {
        log::error!("Failed to load roster for {date}: {err}");
        err
    })?;
    if roster.is_empty() {
        return Ok(None);
    }

    let ids = roster.into_iter().map(|duty| duty.user_id).collect();
    let loads = repo.list_user_loads(agency_id, Some(ids))?;
    Ok(pick_assignee(&loads))
}

fn ensure_member<R>(repo: &R, user_id: UserId, agency_id: AgencyId, active: bool) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
{
    match repo.get_user_by_id(user_id, agency_id)? {
        Some(found) if found.is_active || !active => Ok(()),
        Some(_) => Err(ServiceError::Form(format!("user {user_id} is inactive"))),
        None => Err(ServiceError::NotFound),
    }
}

pub fn get_roster<R>(
    date: Option<NaiveDate>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<GuardDuty>>
where
    R: GuardDutyReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let roster = repo.list_roster(agency_id, date).map_err(|err| {
        log::error!("Failed to load roster for {date}: {err}");
        err
    })?;

    Ok(roster)
}

/// Replaces the roster of a date. Every listed user must be an active
/// member of the agency.
pub fn set_roster<R>(
    form: RosterForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<GuardDuty>>
where
    R: GuardDutyReader + GuardDutyWriter + UserReader + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let payload = RosterPayload::try_from(form)?;
    for user_id in &payload.user_ids {
        ensure_member(repo, *user_id, agency_id, true)?;
    }

    repo.replace_roster(agency_id, payload.date, &payload.user_ids)
        .map_err(|err| {
            log::error!("Failed to replace roster for {}: {err}", payload.date);
            err
        })?;

    let roster = repo.list_roster(agency_id, payload.date)?;
    Ok(roster)
}

/// Open prospect load of the salespeople on duty on `date`, or of the whole
/// agency when no date is given.
pub fn load_report<R>(
    date: Option<NaiveDate>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<LoadReport>
where
    R: GuardDutyReader + UserReader + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let user_ids = match date {
        Some(date) => {
            let roster = repo.list_roster(agency_id, date)?;
            if roster.is_empty() {
                return Ok(LoadReport::new(Some(date), Vec::new()));
            }
            Some(roster.into_iter().map(|duty| duty.user_id).collect())
        }
        None => None,
    };

    let loads = repo.list_user_loads(agency_id, user_ids).map_err(|err| {
        log::error!("Failed to compute salesperson load: {err}");
        err
    })?;

    Ok(LoadReport::new(date, loads))
}

/// Hands an unassigned prospect to the least-loaded salesperson on duty.
pub fn auto_assign<R>(
    form: AutoAssignForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AssignmentOutcome>
where
    R: GuardDutyReader
        + UserReader
        + UserWriter
        + ProspectReader
        + ProspectWriter
        + ProspectEventWriter
        + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let payload = AutoAssignPayload::try_from(form)?;
    let prospect = load_prospect(repo, payload.prospect_id, agency_id)?;
    if let Some(current) = prospect.user_id {
        return Err(ServiceError::Conflict(format!(
            "prospect {} is already assigned to user {current}",
            prospect.id
        )));
    }

    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    let assignee = pick_on_duty(repo, agency_id, date)?
        .ok_or_else(|| ServiceError::Conflict(format!("no salesperson on duty on {date}")))?;

    repo.assign_prospects(agency_id, Some(assignee), &[prospect.id])
        .map_err(|err| {
            log::error!("Failed to assign prospect {}: {err}", prospect.id);
            err
        })?;

    let author = upsert_current_user(user, repo)?;
    record_event(
        repo,
        NewProspectEvent::new(
            prospect.id,
            author.id,
            ProspectEventType::Assignment,
            json!({ "from": null, "to": assignee.get(), "auto": true }),
        ),
    )?;

    log::info!("Prospect {} assigned to user {assignee} from the {date} roster", prospect.id);

    Ok(AssignmentOutcome {
        prospect_id: prospect.id,
        user_id: assignee,
    })
}

/// Moves up to `count` of the most recent open prospects between salespeople.
pub fn transfer<R>(
    form: TransferForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<TransferOutcome>
where
    R: UserReader + UserWriter + ProspectReader + ProspectWriter + ProspectEventWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let payload = TransferPayload::try_from(form)?;
    ensure_member(repo, payload.from, agency_id, false)?;
    ensure_member(repo, payload.to, agency_id, true)?;

    let moved: Vec<ProspectId> = repo
        .list_recent_open_prospects(agency_id, payload.from, payload.count)
        .map_err(|err| {
            log::error!("Failed to list prospects of user {}: {err}", payload.from);
            err
        })?
        .into_iter()
        .map(|prospect| prospect.id)
        .collect();

    if !moved.is_empty() {
        repo.assign_prospects(agency_id, Some(payload.to), &moved)
            .map_err(|err| {
                log::error!("Failed to transfer prospects to user {}: {err}", payload.to);
                err
            })?;

        let author = upsert_current_user(user, repo)?;
        for prospect_id in &moved {
            record_event(
                repo,
                NewProspectEvent::new(
                    *prospect_id,
                    author.id,
                    ProspectEventType::Assignment,
                    json!({
                        "from": payload.from.get(),
                        "to": payload.to.get(),
                        "auto": false,
                    }),
                ),
            )?;
        }
    }

    Ok(TransferOutcome {
        from_user_id: payload.from,
        to_user_id: payload.to,
        moved,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::guard_duty::UserLoad;
    use crate::domain::prospect::ProspectStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin, prospect, seller, stored_event, user as build_user};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn duty(user_id: i32) -> GuardDuty {
        GuardDuty {
            agency_id: AgencyId::new(1).unwrap(),
            duty_date: date(),
            user_id: UserId::new(user_id).unwrap(),
        }
    }

    fn load(user_id: i32, open: i64) -> UserLoad {
        UserLoad {
            user: build_user(user_id, &format!("User{user_id}")),
            open_prospects: open,
        }
    }

    #[test]
    fn roster_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_replace_roster().times(0);

        let form = RosterForm {
            date: date(),
            user_ids: vec![2],
        };
        assert!(matches!(
            set_roster(form, &seller(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn roster_rejects_users_outside_agency() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_, _| Ok(None));
        repo.expect_replace_roster().times(0);

        let form = RosterForm {
            date: date(),
            user_ids: vec![2],
        };
        assert!(matches!(
            set_roster(form, &admin(), &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn roster_is_replaced() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id, _| Ok(Some(build_user(id.get(), "Vendedor"))));
        repo.expect_replace_roster()
            .withf(|_, day, ids| *day == date() && ids.len() == 2)
            .times(1)
            .returning(|_, _, ids| Ok(ids.len()));
        repo.expect_list_roster()
            .returning(|_, _| Ok(vec![duty(2), duty(3)]));

        let form = RosterForm {
            date: date(),
            user_ids: vec![3, 2],
        };
        let roster = set_roster(form, &admin(), &repo).unwrap();

        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn report_for_empty_roster_is_zero() {
        let mut repo = MockRepository::new();
        repo.expect_list_roster().returning(|_, _| Ok(Vec::new()));
        repo.expect_list_user_loads().times(0);

        let report = load_report(Some(date()), &admin(), &repo).unwrap();

        assert!(report.loads.is_empty());
        assert_eq!(report.stats.max, 0);
        assert_eq!(report.stats.average, 0.0);
    }

    #[test]
    fn report_summarizes_loads() {
        let mut repo = MockRepository::new();
        repo.expect_list_roster()
            .returning(|_, _| Ok(vec![duty(2), duty(3)]));
        repo.expect_list_user_loads()
            .withf(|_, ids| ids.as_ref().map(Vec::len) == Some(2))
            .returning(|_, _| Ok(vec![load(2, 1), load(3, 4)]));

        let report = load_report(Some(date()), &admin(), &repo).unwrap();

        assert_eq!(report.stats.min, 1);
        assert_eq!(report.stats.max, 4);
        assert_eq!(report.stats.average, 2.5);
    }

    #[test]
    fn auto_assign_ties_go_to_lowest_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_prospect_by_id()
            .returning(|id, _| Ok(Some(prospect(id.get(), None, ProspectStatus::New))));
        repo.expect_list_roster()
            .returning(|_, _| Ok(vec![duty(5), duty(3)]));
        repo.expect_list_user_loads()
            .returning(|_, _| Ok(vec![load(3, 2), load(5, 2)]));
        repo.expect_assign_prospects()
            .withf(|_, user_id, ids| user_id.map(UserId::get) == Some(3) && ids.len() == 1)
            .times(1)
            .returning(|_, _, _| Ok(1));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(build_user(1, "Manager")));
        repo.expect_create_prospect_event()
            .times(1)
            .returning(|event| Ok(stored_event(event)));

        let form = AutoAssignForm {
            prospect_id: 9,
            date: Some(date()),
        };
        let outcome = auto_assign(form, &admin(), &repo).unwrap();

        assert_eq!(outcome.user_id.get(), 3);
    }

    #[test]
    fn auto_assign_refuses_assigned_prospect() {
        let mut repo = MockRepository::new();
        repo.expect_get_prospect_by_id()
            .returning(|id, _| Ok(Some(prospect(id.get(), Some(2), ProspectStatus::New))));
        repo.expect_assign_prospects().times(0);

        let form = AutoAssignForm {
            prospect_id: 9,
            date: Some(date()),
        };
        assert!(matches!(
            auto_assign(form, &admin(), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn auto_assign_without_roster_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_prospect_by_id()
            .returning(|id, _| Ok(Some(prospect(id.get(), None, ProspectStatus::New))));
        repo.expect_list_roster().returning(|_, _| Ok(Vec::new()));
        repo.expect_assign_prospects().times(0);

        let form = AutoAssignForm {
            prospect_id: 9,
            date: Some(date()),
        };
        assert!(matches!(
            auto_assign(form, &admin(), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn transfer_moves_recent_open_prospects() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id, _| Ok(Some(build_user(id.get(), "Vendedor"))));
        repo.expect_list_recent_open_prospects()
            .withf(|_, from, limit| from.get() == 2 && *limit == 2)
            .returning(|_, _, _| {
                Ok(vec![
                    prospect(11, Some(2), ProspectStatus::New),
                    prospect(10, Some(2), ProspectStatus::Contacted),
                ])
            });
        repo.expect_assign_prospects()
            .withf(|_, to, ids| to.map(UserId::get) == Some(3) && ids.len() == 2)
            .times(1)
            .returning(|_, _, ids| Ok(ids.len()));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(build_user(1, "Manager")));
        repo.expect_create_prospect_event()
            .times(2)
            .returning(|event| Ok(stored_event(event)));

        let form = TransferForm {
            from_user_id: 2,
            to_user_id: 3,
            count: 2,
        };
        let outcome = transfer(form, &admin(), &repo).unwrap();

        let moved: Vec<i32> = outcome.moved.iter().map(|id| id.get()).collect();
        assert_eq!(moved, vec![11, 10]);
    }

    #[test]
    fn transfer_with_nothing_open_is_a_no_op() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id, _| Ok(Some(build_user(id.get(), "Vendedor"))));
        repo.expect_list_recent_open_prospects()
            .returning(|_, _, _| Ok(Vec::new()));
        repo.expect_assign_prospects().times(0);

        let form = TransferForm {
            from_user_id: 2,
            to_user_id: 3,
            count: 5,
        };
        let outcome = transfer(form, &admin(), &repo).unwrap();

        assert!(outcome.moved.is_empty());
    }
}
