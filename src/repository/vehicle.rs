use chrono::Utc;
use diesel::prelude::*;

use crate::domain::types::{AgencyId, VehicleId};
use crate::domain::vehicle::{NewVehicle, UpdateVehicle, Vehicle};
use crate::models::vehicle::{
    NewVehicle as DbNewVehicle, UpdateVehicle as DbUpdateVehicle, Vehicle as DbVehicle,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, VehicleReader, VehicleWriter, like_pattern};

impl VehicleReader for DieselRepository {
    fn get_vehicle_by_id(
        &self,
        id: VehicleId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Vehicle>> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let db_vehicle = vehicles::table
            .filter(vehicles::id.eq(id.get()))
            .filter(vehicles::agency_id.eq(agency_id.get()))
            .first::<DbVehicle>(&mut conn)
            .optional()?;

        db_vehicle
            .map(|vehicle| Vehicle::try_from(vehicle).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_vehicles(
        &self,
        agency_id: AgencyId,
        search: Option<String>,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<Vehicle>> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let mut query = vehicles::table
            .filter(vehicles::agency_id.eq(agency_id.get()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !include_inactive {
            query = query.filter(vehicles::is_active.eq(true));
        }

        if let Some(search) = search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let pattern = like_pattern(search);
            query = query.filter(
                vehicles::model
                    .like(pattern.clone())
                    .escape('\\')
                    .or(vehicles::version.like(pattern).escape('\\')),
            );
        }

        let db_vehicles = query
            .order((vehicles::model.asc(), vehicles::year.desc()))
            .load::<DbVehicle>(&mut conn)?;

        db_vehicles
            .into_iter()
            .map(|vehicle| Vehicle::try_from(vehicle).map_err(RepositoryError::from))
            .collect()
    }
}

impl VehicleWriter for DieselRepository {
    fn create_vehicle(&self, new_vehicle: &NewVehicle) -> RepositoryResult<Vehicle> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let db_new_vehicle: DbNewVehicle = new_vehicle.into();

        let db_vehicle = diesel::insert_into(vehicles::table)
            .values(&db_new_vehicle)
            .get_result::<DbVehicle>(&mut conn)?;

        Ok(Vehicle::try_from(db_vehicle)?)
    }

    fn update_vehicle(
        &self,
        id: VehicleId,
        agency_id: AgencyId,
        updates: &UpdateVehicle,
    ) -> RepositoryResult<Vehicle> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateVehicle::from_domain(updates, Utc::now().naive_utc());

        let db_vehicle = diesel::update(
            vehicles::table
                .filter(vehicles::id.eq(id.get()))
                .filter(vehicles::agency_id.eq(agency_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbVehicle>(&mut conn)?;

        Ok(Vehicle::try_from(db_vehicle)?)
    }

    fn set_vehicle_active(
        &self,
        id: VehicleId,
        agency_id: AgencyId,
        is_active: bool,
    ) -> RepositoryResult<Vehicle> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let db_vehicle = diesel::update(
            vehicles::table
                .filter(vehicles::id.eq(id.get()))
                .filter(vehicles::agency_id.eq(agency_id.get())),
        )
        .set((
            vehicles::is_active.eq(is_active),
            vehicles::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbVehicle>(&mut conn)?;

        Ok(Vehicle::try_from(db_vehicle)?)
    }
}
