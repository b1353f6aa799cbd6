//! Vehicle catalogue.

use crate::domain::types::VehicleId;
use crate::domain::vehicle::{UpdateVehicle, Vehicle};
use crate::forms::vehicles::{VehicleForm, VehicleListParams};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{VehicleReader, VehicleWriter};
use crate::services::{
    ServiceError, ServiceResult, agency_of, ensure_access, ensure_admin, is_admin,
};

fn parse_vehicle_id(id: i32) -> ServiceResult<VehicleId> {
    VehicleId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Catalogue search. Only managers can see retired vehicles.
pub fn list_vehicles<R>(
    params: VehicleListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Vehicle>>
where
    R: VehicleReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    let include_inactive = params.include_inactive && is_admin(user);

    let vehicles = repo
        .list_vehicles(agency_id, params.search, include_inactive)
        .map_err(|err| {
            log::error!("Failed to list vehicles: {err}");
            err
        })?;

    Ok(vehicles)
}

pub fn get_vehicle<R>(vehicle_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vehicle>
where
    R: VehicleReader + ?Sized,
{
    ensure_access(user)?;

    let agency_id = agency_of(user)?;
    repo.get_vehicle_by_id(parse_vehicle_id(vehicle_id)?, agency_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_vehicle<R>(form: VehicleForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vehicle>
where
    R: VehicleWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let new_vehicle = form.into_domain(agency_id)?;

    let vehicle = repo.create_vehicle(&new_vehicle).map_err(|err| {
        log::error!("Failed to create vehicle {}: {err}", new_vehicle.model);
        err
    })?;

    Ok(vehicle)
}

pub fn update_vehicle<R>(
    vehicle_id: i32,
    form: VehicleForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vehicle>
where
    R: VehicleWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let vehicle_id = parse_vehicle_id(vehicle_id)?;
    let updates = UpdateVehicle::try_from(form)?;

    let vehicle = repo
        .update_vehicle(vehicle_id, agency_id, &updates)
        .map_err(|err| {
            log::error!("Failed to update vehicle {vehicle_id}: {err}");
            err
        })?;

    Ok(vehicle)
}

pub fn set_vehicle_active<R>(
    vehicle_id: i32,
    active: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vehicle>
where
    R: VehicleWriter + ?Sized,
{
    ensure_admin(user)?;

    let agency_id = agency_of(user)?;
    let vehicle_id = parse_vehicle_id(vehicle_id)?;

    let vehicle = repo
        .set_vehicle_active(vehicle_id, agency_id, active)
        .map_err(|err| {
            log::error!("Failed to set active={active} on vehicle {vehicle_id}: {err}");
            err
        })?;

    Ok(vehicle)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::{AgencyId, MoneyCents, VehicleModel, VehicleYear};
    use crate::domain::vehicle::VehicleCondition;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin, seller, timestamp};

    fn vehicle(id: i32) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id).unwrap(),
            agency_id: AgencyId::new(1).unwrap(),
            model: VehicleModel::new("Corolla").unwrap(),
            version: None,
            year: VehicleYear::new(2025).unwrap(),
            condition: VehicleCondition::New,
            price: MoneyCents::new(40_000_000).unwrap(),
            is_active: true,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn form() -> VehicleForm {
        VehicleForm {
            model: "Corolla".into(),
            version: Some("LE".into()),
            year: 2025,
            condition: VehicleCondition::New,
            price: 40_000_000,
        }
    }

    #[test]
    fn sellers_never_see_inactive_vehicles() {
        let mut repo = MockRepository::new();
        repo.expect_list_vehicles()
            .withf(|_, search, include_inactive| {
                search.as_deref() == Some("cor") && !*include_inactive
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![vehicle(1)]));

        let params = VehicleListParams {
            search: Some("cor".into()),
            include_inactive: true,
        };
        let vehicles = list_vehicles(params, &seller(), &repo).unwrap();

        assert_eq!(vehicles.len(), 1);
    }

    #[test]
    fn create_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_create_vehicle().times(0);

        assert!(matches!(
            create_vehicle(form(), &seller(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn create_is_scoped_to_agency() {
        let mut repo = MockRepository::new();
        repo.expect_create_vehicle()
            .withf(|new_vehicle| {
                new_vehicle.agency_id.get() == 1 && new_vehicle.version.as_deref() == Some("LE")
            })
            .times(1)
            .returning(|_| Ok(vehicle(2)));

        let created = create_vehicle(form(), &admin(), &repo).unwrap();

        assert_eq!(created.id.get(), 2);
    }

    #[test]
    fn update_of_foreign_vehicle_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_update_vehicle()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            update_vehicle(3, form(), &admin(), &repo),
            Err(ServiceError::NotFound)
        ));
    }
}
