//! Diesel models for the vehicle catalogue.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{
    AgencyId, MoneyCents, TypeConstraintError, VehicleId, VehicleModel, VehicleYear,
};
use crate::domain::vehicle::{
    NewVehicle as DomainNewVehicle, UpdateVehicle as DomainUpdateVehicle,
    Vehicle as DomainVehicle,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::vehicles)]
pub struct Vehicle {
    pub id: i32,
    pub agency_id: i32,
    pub model: String,
    pub version: Option<String>,
    pub year: i32,
    pub vehicle_condition: String,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::vehicles)]
pub struct NewVehicle<'a> {
    pub agency_id: i32,
    pub model: &'a str,
    pub version: Option<&'a str>,
    pub year: i32,
    pub vehicle_condition: &'a str,
    pub price_cents: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::vehicles)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateVehicle<'a> {
    pub model: &'a str,
    pub version: Option<&'a str>,
    pub year: i32,
    pub vehicle_condition: &'a str,
    pub price_cents: i64,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Vehicle> for DomainVehicle {
    type Error = TypeConstraintError;

    fn try_from(vehicle: Vehicle) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VehicleId::new(vehicle.id)?,
            agency_id: AgencyId::new(vehicle.agency_id)?,
            model: VehicleModel::new(vehicle.model)?,
            version: vehicle.version,
            year: VehicleYear::new(vehicle.year)?,
            condition: vehicle.vehicle_condition.parse()?,
            price: MoneyCents::new(vehicle.price_cents)?,
            is_active: vehicle.is_active,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewVehicle> for NewVehicle<'a> {
    fn from(vehicle: &'a DomainNewVehicle) -> Self {
        Self {
            agency_id: vehicle.agency_id.get(),
            model: vehicle.model.as_str(),
            version: vehicle.version.as_deref(),
            year: vehicle.year.get(),
            vehicle_condition: vehicle.condition.as_str(),
            price_cents: vehicle.price.get(),
        }
    }
}

impl<'a> UpdateVehicle<'a> {
    pub fn from_domain(vehicle: &'a DomainUpdateVehicle, updated_at: NaiveDateTime) -> Self {
        Self {
            model: vehicle.model.as_str(),
            version: vehicle.version.as_deref(),
            year: vehicle.year.get(),
            vehicle_condition: vehicle.condition.as_str(),
            price_cents: vehicle.price.get(),
            updated_at,
        }
    }
}
