//! Salespeople and managers of an agency.

use crate::domain::guard_duty::UserLoad;
use crate::domain::user::User;
use crate::forms::users::{AddUserForm, AddUserPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{UserReader, UserWriter};
use crate::services::{
    ServiceResult, agency_of, ensure_access, ensure_admin, parse_user_id, upsert_current_user,
};

/// Registers the caller and returns the stored user row.
pub fn current_user<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_access(user)?;
    upsert_current_user(user, repo)
}

/// Users of the agency with their number of open prospects.
pub fn list_users_with_load<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<UserLoad>>
where
    R: UserReader + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let loads = repo.list_user_loads(agency_id, None).map_err(|err| {
        log::error!("Failed to list users of agency {agency_id}: {err}");
        err
    })?;

    Ok(loads)
}

/// Creates a salesperson, or refreshes the name when the email is known.
pub fn add_user<R>(form: AddUserForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let new_user = AddUserPayload::try_from(form)?.into_domain(agency_id);

    let stored = repo.create_or_update_user(&new_user).map_err(|err| {
        log::error!("Failed to save user {}: {err}", new_user.email);
        err
    })?;

    Ok(stored)
}

pub fn set_user_active<R>(
    user_id: i32,
    active: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let user_id = parse_user_id(user_id)?;

    let updated = repo
        .set_user_active(user_id, agency_id, active)
        .map_err(|err| {
            log::error!("Failed to set active={active} on user {user_id}: {err}");
            err
        })?;

    Ok(updated)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{admin, identity, seller, user as build_user};

    #[test]
    fn current_user_upserts_identity() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .withf(|new_user| {
                new_user.email.as_str() == "seller@dealer.test" && new_user.agency_id.get() == 1
            })
            .times(1)
            .returning(|_| Ok(build_user(7, "Seller")));

        let stored = current_user(&seller(), &repo).unwrap();

        assert_eq!(stored.id.get(), 7);
    }

    #[test]
    fn current_user_requires_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user().times(0);

        let result = current_user(&identity(&["other"]), &repo);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn sellers_cannot_list_loads() {
        let mut repo = MockRepository::new();
        repo.expect_list_user_loads().times(0);

        assert!(matches!(
            list_users_with_load(&seller(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn loads_cover_the_whole_agency() {
        let mut repo = MockRepository::new();
        repo.expect_list_user_loads()
            .withf(|agency, ids| agency.get() == 1 && ids.is_none())
            .times(1)
            .returning(|_, _| {
                Ok(vec![UserLoad {
                    user: build_user(2, "Ana"),
                    open_prospects: 4,
                }])
            });

        let loads = list_users_with_load(&admin(), &repo).unwrap();

        assert_eq!(loads[0].open_prospects, 4);
    }

    #[test]
    fn add_user_stores_normalized_email() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .withf(|new_user| new_user.email.as_str() == "ana@dealer.test")
            .times(1)
            .returning(|_| Ok(build_user(3, "Ana")));

        let form = AddUserForm {
            name: "Ana".into(),
            email: "ANA@dealer.test".into(),
        };
        let stored = add_user(form, &admin(), &repo).unwrap();

        assert_eq!(stored.name.as_str(), "Ana");
    }

    #[test]
    fn deactivating_unknown_user_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_set_user_active()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let result = set_user_active(99, false, &admin(), &repo);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
