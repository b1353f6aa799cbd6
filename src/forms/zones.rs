//! Zone management and proximity check forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{AgencyId, Latitude, Longitude, RadiusMeters, ZoneName};
use crate::domain::zone::{GeoPoint, NewZone, UpdateZone};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct ZoneForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<ZoneForm> for UpdateZone {
    type Error = FormError;

    fn try_from(form: ZoneForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateZone {
            name: ZoneName::new(form.name).map_err(|_| FormError::InvalidName)?,
            center: point(form.latitude, form.longitude)?,
            radius: RadiusMeters::new(form.radius_meters)?,
            is_active: form.is_active,
        })
    }
}

impl ZoneForm {
    pub fn into_domain(self, agency_id: AgencyId) -> Result<NewZone, FormError> {
        let zone = UpdateZone::try_from(self)?;
        Ok(NewZone {
            agency_id,
            name: zone.name,
            center: zone.center,
            radius: zone.radius,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Device position reported by the mobile recorder.
pub struct ProximityForm {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub recording_active: bool,
}

pub struct ProximityPayload {
    pub position: GeoPoint,
    pub recording_active: bool,
}

impl TryFrom<ProximityForm> for ProximityPayload {
    type Error = FormError;

    fn try_from(form: ProximityForm) -> Result<Self, Self::Error> {
        Ok(Self {
            position: point(form.latitude, form.longitude)?,
            recording_active: form.recording_active,
        })
    }
}

fn point(latitude: f64, longitude: f64) -> Result<GeoPoint, FormError> {
    Ok(GeoPoint::new(
        Latitude::new(latitude)?,
        Longitude::new(longitude)?,
    ))
}
