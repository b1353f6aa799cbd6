use diesel::prelude::*;

use crate::domain::types::{AgencyId, ZoneId};
use crate::domain::zone::{NewZone, UpdateZone, Zone};
use crate::models::zone::{NewZone as DbNewZone, UpdateZone as DbUpdateZone, Zone as DbZone};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ZoneReader, ZoneWriter};

impl ZoneReader for DieselRepository {
    fn get_zone_by_id(&self, id: ZoneId, agency_id: AgencyId) -> RepositoryResult<Option<Zone>> {
        use crate::schema::zones;

        let mut conn = self.conn()?;
        let db_zone = zones::table
            .filter(zones::id.eq(id.get()))
            .filter(zones::agency_id.eq(agency_id.get()))
            .first::<DbZone>(&mut conn)
            .optional()?;

        db_zone
            .map(|zone| Zone::try_from(zone).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_zones(&self, agency_id: AgencyId, only_active: bool) -> RepositoryResult<Vec<Zone>> {
        use crate::schema::zones;

        let mut conn = self.conn()?;
        let mut query = zones::table
            .filter(zones::agency_id.eq(agency_id.get()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if only_active {
            query = query.filter(zones::is_active.eq(true));
        }

        let db_zones = query.order(zones::name.asc()).load::<DbZone>(&mut conn)?;

        db_zones
            .into_iter()
            .map(|zone| Zone::try_from(zone).map_err(RepositoryError::from))
            .collect()
    }
}

impl ZoneWriter for DieselRepository {
    fn create_zone(&self, new_zone: &NewZone) -> RepositoryResult<Zone> {
        use crate::schema::zones;

        let mut conn = self.conn()?;
        let db_new_zone: DbNewZone = new_zone.into();

        let db_zone = diesel::insert_into(zones::table)
            .values(&db_new_zone)
            .get_result::<DbZone>(&mut conn)?;

        Ok(Zone::try_from(db_zone)?)
    }

    fn update_zone(
        &self,
        id: ZoneId,
        agency_id: AgencyId,
        updates: &UpdateZone,
    ) -> RepositoryResult<Zone> {
        use crate::schema::zones;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateZone = updates.into();

        let db_zone = diesel::update(
            zones::table
                .filter(zones::id.eq(id.get()))
                .filter(zones::agency_id.eq(agency_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbZone>(&mut conn)?;

        Ok(Zone::try_from(db_zone)?)
    }

    fn delete_zone(&self, id: ZoneId, agency_id: AgencyId) -> RepositoryResult<()> {
        use crate::schema::zones;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            zones::table
                .filter(zones::id.eq(id.get()))
                .filter(zones::agency_id.eq(agency_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
