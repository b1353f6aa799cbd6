use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, MoneyCents, VehicleId, VehicleModel, VehicleYear};

text_enum!(
    VehicleCondition,
    "vehicle condition",
    { New, Used }
);

/// Catalogue entry offered by an agency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub agency_id: AgencyId,
    pub model: VehicleModel,
    pub version: Option<String>,
    pub year: VehicleYear,
    pub condition: VehicleCondition,
    pub price: MoneyCents,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewVehicle {
    pub agency_id: AgencyId,
    pub model: VehicleModel,
    pub version: Option<String>,
    pub year: VehicleYear,
    pub condition: VehicleCondition,
    pub price: MoneyCents,
}

#[derive(Clone, Debug)]
pub struct UpdateVehicle {
    pub model: VehicleModel,
    pub version: Option<String>,
    pub year: VehicleYear,
    pub condition: VehicleCondition,
    pub price: MoneyCents,
}
