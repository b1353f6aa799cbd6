//! Diesel models for proximity zones.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{
    AgencyId, Latitude, Longitude, RadiusMeters, TypeConstraintError, ZoneId, ZoneName,
};
use crate::domain::zone::{
    GeoPoint, NewZone as DomainNewZone, UpdateZone as DomainUpdateZone, Zone as DomainZone,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::zones)]
pub struct Zone {
    pub id: i32,
    pub agency_id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::zones)]
pub struct NewZone<'a> {
    pub agency_id: i32,
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::zones)]
pub struct UpdateZone<'a> {
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub is_active: bool,
}

impl TryFrom<Zone> for DomainZone {
    type Error = TypeConstraintError;

    fn try_from(zone: Zone) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ZoneId::new(zone.id)?,
            agency_id: AgencyId::new(zone.agency_id)?,
            name: ZoneName::new(zone.name)?,
            center: GeoPoint::new(Latitude::new(zone.latitude)?, Longitude::new(zone.longitude)?),
            radius: RadiusMeters::new(zone.radius_meters)?,
            is_active: zone.is_active,
            created_at: zone.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewZone> for NewZone<'a> {
    fn from(zone: &'a DomainNewZone) -> Self {
        Self {
            agency_id: zone.agency_id.get(),
            name: zone.name.as_str(),
            latitude: zone.center.latitude.get(),
            longitude: zone.center.longitude.get(),
            radius_meters: zone.radius.get(),
        }
    }
}

impl<'a> From<&'a DomainUpdateZone> for UpdateZone<'a> {
    fn from(zone: &'a DomainUpdateZone) -> Self {
        Self {
            name: zone.name.as_str(),
            latitude: zone.center.latitude.get(),
            longitude: zone.center.longitude.get(),
            radius_meters: zone.radius.get(),
            is_active: zone.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let db = Zone {
            id: 1,
            agency_id: 1,
            name: "Patio".into(),
            latitude: 95.0,
            longitude: 0.0,
            radius_meters: 50.0,
            is_active: true,
            created_at: Utc::now().naive_utc(),
        };
        assert_eq!(
            DomainZone::try_from(db),
            Err(TypeConstraintError::OutOfRange("latitude"))
        );
    }
}
