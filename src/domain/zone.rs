//! Proximity zones and the geometry behind the recording trigger.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, Latitude, Longitude, RadiusMeters, ZoneId, ZoneName};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: Latitude,
    pub longitude: Longitude,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: Latitude, longitude: Longitude) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two points in metres.
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.get().to_radians();
    let lat2 = b.latitude.get().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude.get() - a.longitude.get()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub agency_id: AgencyId,
    pub name: ZoneName,
    pub center: GeoPoint,
    pub radius: RadiusMeters,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Zone {
    pub fn distance_to(&self, position: GeoPoint) -> f64 {
        haversine_distance_m(self.center, position)
    }

    pub fn contains(&self, position: GeoPoint) -> bool {
        self.distance_to(position) <= self.radius.get()
    }
}

#[derive(Clone, Debug)]
pub struct NewZone {
    pub agency_id: AgencyId,
    pub name: ZoneName,
    pub center: GeoPoint,
    pub radius: RadiusMeters,
}

#[derive(Clone, Debug)]
pub struct UpdateZone {
    pub name: ZoneName,
    pub center: GeoPoint,
    pub radius: RadiusMeters,
    pub is_active: bool,
}

/// A zone together with its distance from the queried position.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ZoneHit {
    pub zone: Zone,
    pub distance_meters: f64,
}

fn by_distance(a: &ZoneHit, b: &ZoneHit) -> Ordering {
    a.distance_meters
        .total_cmp(&b.distance_meters)
        .then_with(|| a.zone.id.cmp(&b.zone.id))
}

/// Active zones whose radius covers `position`, nearest first.
pub fn zones_containing(position: GeoPoint, zones: &[Zone]) -> Vec<ZoneHit> {
    let mut hits = zones
        .iter()
        .filter(|zone| zone.is_active)
        .map(|zone| ZoneHit {
            zone: zone.clone(),
            distance_meters: zone.distance_to(position),
        })
        .filter(|hit| hit.distance_meters <= hit.zone.radius.get())
        .collect::<Vec<_>>();
    hits.sort_by(by_distance);
    hits
}

/// Closest active zone regardless of its radius.
pub fn nearest_zone(position: GeoPoint, zones: &[Zone]) -> Option<ZoneHit> {
    zones
        .iter()
        .filter(|zone| zone.is_active)
        .map(|zone| ZoneHit {
            zone: zone.clone(),
            distance_meters: zone.distance_to(position),
        })
        .min_by(by_distance)
}

/// What the device recorder should do after a position update.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecorderAction {
    Start,
    Stop,
    Keep,
}

pub fn decide_recorder_action(inside_any_zone: bool, recording_active: bool) -> RecorderAction {
    match (inside_any_zone, recording_active) {
        (true, false) => RecorderAction::Start,
        (false, true) => RecorderAction::Stop,
        _ => RecorderAction::Keep,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(Latitude::new(lat).unwrap(), Longitude::new(lon).unwrap())
    }

    fn zone(id: i32, lat: f64, lon: f64, radius: f64, is_active: bool) -> Zone {
        Zone {
            id: ZoneId::new(id).unwrap(),
            agency_id: AgencyId::new(1).unwrap(),
            name: ZoneName::new(format!("Zona {id}")).unwrap(),
            center: point(lat, lon),
            radius: RadiusMeters::new(radius).unwrap(),
            is_active,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = point(19.4326, -99.1332);
        assert!(haversine_distance_m(p, p).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_distance_m(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(19.4326, -99.1332);
        let b = point(20.6597, -103.3496);
        let ab = haversine_distance_m(a, b);
        let ba = haversine_distance_m(b, a);
        assert!((ab - ba).abs() < 1e-6);
        // Mexico City to Guadalajara is roughly 460 km
        assert!((440_000.0..480_000.0).contains(&ab), "got {ab}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let d = haversine_distance_m(point(0.0, 0.0), point(0.0, 180.0));
        assert!(d.is_finite());
    }

    #[test]
    fn containing_filters_inactive_and_sorts_by_distance() {
        let zones = vec![
            zone(1, 0.0, 0.0, 500.0, true),
            zone(2, 0.001, 0.0, 500.0, true),
            zone(3, 0.0, 0.0, 500.0, false),
            zone(4, 1.0, 1.0, 500.0, true),
        ];
        let position = point(0.0009, 0.0);

        let hits = zones_containing(position, &zones);
        let ids = hits.iter().map(|h| h.zone.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn boundary_is_inside() {
        let z = zone(1, 0.0, 0.0, 1000.0, true);
        let d = z.distance_to(point(0.005, 0.0));
        let exact = zone(1, 0.0, 0.0, d, true);
        assert!(exact.contains(point(0.005, 0.0)));
    }

    #[test]
    fn nearest_zone_ignores_radius() {
        let zones = vec![zone(1, 0.0, 0.0, 10.0, true), zone(2, 5.0, 5.0, 10.0, true)];
        let nearest = nearest_zone(point(0.5, 0.5), &zones).unwrap();
        assert_eq!(nearest.zone.id.get(), 1);
        assert!(nearest_zone(point(0.5, 0.5), &[]).is_none());
    }

    #[test]
    fn recorder_decisions() {
        assert_eq!(decide_recorder_action(true, false), RecorderAction::Start);
        assert_eq!(decide_recorder_action(false, true), RecorderAction::Stop);
        assert_eq!(decide_recorder_action(true, true), RecorderAction::Keep);
        assert_eq!(decide_recorder_action(false, false), RecorderAction::Keep);
    }
}
