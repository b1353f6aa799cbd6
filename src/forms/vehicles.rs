//! Vehicle catalogue forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{AgencyId, MoneyCents, VehicleModel, VehicleYear};
use crate::domain::vehicle::{NewVehicle, UpdateVehicle, VehicleCondition};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
/// Shared by create and update.
pub struct VehicleForm {
    #[validate(length(min = 1, max = 255))]
    pub model: String,
    pub version: Option<String>,
    pub year: i32,
    pub condition: VehicleCondition,
    /// Price in cents.
    pub price: i64,
}

impl TryFrom<VehicleForm> for UpdateVehicle {
    type Error = FormError;

    fn try_from(form: VehicleForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateVehicle {
            model: VehicleModel::new(form.model).map_err(|_| FormError::InvalidName)?,
            version: non_blank(form.version),
            year: VehicleYear::new(form.year)?,
            condition: form.condition,
            price: MoneyCents::new(form.price)?,
        })
    }
}

impl VehicleForm {
    pub fn into_domain(self, agency_id: AgencyId) -> Result<NewVehicle, FormError> {
        let vehicle = UpdateVehicle::try_from(self)?;
        Ok(NewVehicle {
            agency_id,
            model: vehicle.model,
            version: vehicle.version,
            year: vehicle.year,
            condition: vehicle.condition,
            price: vehicle.price,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(year: i32, price: i64) -> VehicleForm {
        VehicleForm {
            model: "Corolla".into(),
            version: Some(" ".into()),
            year,
            condition: VehicleCondition::New,
            price,
        }
    }

    #[test]
    fn valid_vehicle_is_accepted() {
        let vehicle = form(2025, 45_000_000)
            .into_domain(AgencyId::new(1).unwrap())
            .unwrap();
        assert_eq!(vehicle.model.as_str(), "Corolla");
        assert!(vehicle.version.is_none());
        assert_eq!(vehicle.price.get(), 45_000_000);
    }

    #[test]
    fn year_and_price_are_bounded() {
        assert!(UpdateVehicle::try_from(form(1949, 1)).is_err());
        assert!(UpdateVehicle::try_from(form(2101, 1)).is_err());
        assert!(UpdateVehicle::try_from(form(2020, -1)).is_err());
    }
}
