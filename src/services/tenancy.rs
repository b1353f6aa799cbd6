//! Dealership groups, brands and agencies.

use crate::domain::tenancy::{Agency, AgencyGroup, Brand};
use crate::domain::types::{BrandName, GroupName};
use crate::forms::tenancy::{AddAgencyForm, AddBrandForm, AddGroupForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{TenancyReader, TenancyWriter};
use crate::services::{ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin};

/// Loads the caller's own agency.
pub fn current_agency<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Agency>
where
    R: TenancyReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    repo.get_agency_by_id(agency_id)
        .map_err(|err| {
            log::error!("Failed to load agency {agency_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Lists every agency that belongs to the caller's group.
pub fn list_agencies<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Agency>>
where
    R: TenancyReader + ?Sized,
{
    ensure_admin(user)?;

    let agency = current_agency(user, repo)?;
    let agencies = repo
        .list_agencies_in_group(agency.group_id)
        .map_err(|err| {
            log::error!("Failed to list agencies of group {}: {err}", agency.group_id);
            err
        })?;

    Ok(agencies)
}

pub fn list_brands<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Brand>>
where
    R: TenancyReader + ?Sized,
{
    ensure_access(user)?;

    let brands = repo.list_brands().map_err(|err| {
        log::error!("Failed to list brands: {err}");
        err
    })?;

    Ok(brands)
}

pub fn create_brand<R>(form: AddBrandForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Brand>
where
    R: TenancyWriter + ?Sized,
{
    ensure_admin(user)?;

    let name = BrandName::try_from(form)?;
    let brand = repo.create_brand(&name).map_err(|err| {
        log::error!("Failed to create brand {name}: {err}");
        err
    })?;

    Ok(brand)
}

pub fn create_group<R>(
    form: AddGroupForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AgencyGroup>
where
    R: TenancyWriter + ?Sized,
{
    ensure_admin(user)?;

    let name = GroupName::try_from(form)?;
    let group = repo.create_group(&name).map_err(|err| {
        log::error!("Failed to create group {name}: {err}");
        err
    })?;

    Ok(group)
}

/// Opens a new agency inside the caller's group; the brand must exist.
pub fn create_agency<R>(
    form: AddAgencyForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Agency>
where
    R: TenancyReader + TenancyWriter + ?Sized,
{
    ensure_admin(user)?;

    let current = current_agency(user, repo)?;
    let new_agency = form.into_domain(current.group_id)?;

    if new_agency.group_id != current.group_id {
        log::warn!(
            "User {} tried to open an agency in group {}",
            user.email,
            new_agency.group_id
        );
        return Err(ServiceError::Unauthorized);
    }
    if repo.get_group_by_id(new_agency.group_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }
    if repo.get_brand_by_id(new_agency.brand_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let agency = repo.create_agency(&new_agency).map_err(|err| {
        log::error!("Failed to create agency {}: {err}", new_agency.name);
        err
    })?;

    Ok(agency)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::{AgencyId, AgencyName, BrandId, GroupId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin, seller, timestamp};

    fn agency(id: i32, group: i32) -> Agency {
        Agency {
            id: AgencyId::new(id).unwrap(),
            group_id: GroupId::new(group).unwrap(),
            brand_id: BrandId::new(1).unwrap(),
            name: AgencyName::new(format!("Agency {id}")).unwrap(),
            city: None,
            created_at: timestamp(),
        }
    }

    fn brand(id: i32, name: &str) -> Brand {
        Brand {
            id: BrandId::new(id).unwrap(),
            name: BrandName::new(name).unwrap(),
        }
    }

    #[test]
    fn list_agencies_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_list_agencies_in_group().times(0);

        let result = list_agencies(&seller(), &repo);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn list_agencies_uses_callers_group() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .withf(|id| id.get() == 1)
            .returning(|_| Ok(Some(agency(1, 5))));
        repo.expect_list_agencies_in_group()
            .withf(|group| group.get() == 5)
            .times(1)
            .returning(|_| Ok(vec![agency(1, 5), agency(2, 5)]));

        let agencies = list_agencies(&admin(), &repo).unwrap();

        assert_eq!(agencies.len(), 2);
    }

    #[test]
    fn duplicate_brand_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_create_brand()
            .times(1)
            .returning(|_| Err(RepositoryError::ConstraintViolation("brands.name".into())));

        let result = create_brand(AddBrandForm { name: "Toyota".into() }, &admin(), &repo);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn create_agency_checks_brand_exists() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(1, 5))));
        repo.expect_get_group_by_id().returning(|id| {
            Ok(Some(AgencyGroup {
                id,
                name: GroupName::new("Grupo").unwrap(),
                created_at: timestamp(),
            }))
        });
        repo.expect_get_brand_by_id().returning(|_| Ok(None));
        repo.expect_create_agency().times(0);

        let form = AddAgencyForm {
            group_id: None,
            brand_id: 9,
            name: "Nueva".into(),
            city: None,
        };
        let result = create_agency(form, &admin(), &repo);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_agency_rejects_foreign_group() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(1, 5))));
        repo.expect_get_group_by_id().times(0);
        repo.expect_create_agency().times(0);

        let form = AddAgencyForm {
            group_id: Some(6),
            brand_id: 2,
            name: "Intrusa".into(),
            city: None,
        };
        let result = create_agency(form, &admin(), &repo);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_agency_defaults_to_callers_group() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(1, 5))));
        repo.expect_get_group_by_id().returning(|id| {
            Ok(Some(AgencyGroup {
                id,
                name: GroupName::new("Grupo").unwrap(),
                created_at: timestamp(),
            }))
        });
        repo.expect_get_brand_by_id()
            .returning(|id| Ok(Some(brand(id.get(), "Mazda"))));
        repo.expect_create_agency()
            .withf(|new_agency| new_agency.group_id.get() == 5 && new_agency.brand_id.get() == 2)
            .times(1)
            .returning(|_| Ok(agency(3, 5)));

        let form = AddAgencyForm {
            group_id: None,
            brand_id: 2,
            name: "Mazda Sur".into(),
            city: Some("Puebla".into()),
        };
        let created = create_agency(form, &admin(), &repo).unwrap();

        assert_eq!(created.id.get(), 3);
    }
}
