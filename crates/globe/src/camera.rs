use catalog::Place;
use foundation::bounds::GeoBounds;
use serde::Serialize;

use crate::config::CameraConfig;

/// Requested camera flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraMove {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
    pub duration_ms: u32,
}

/// Frame the locatable `places`: look at the bounds center from an altitude
/// proportional to the larger angular extent.
///
/// Returns `None` when no place has coordinates.
pub fn fit_camera(places: &[Place], config: &CameraConfig) -> Option<CameraMove> {
    let bounds = GeoBounds::from_points(places.iter().filter_map(Place::position))?;
    let center = bounds.center();
    let altitude = (bounds.span_deg() * config.altitude_per_degree)
        .clamp(config.min_altitude, config.max_altitude);
    Some(CameraMove {
        lat: center.lat,
        lng: center.lng,
        altitude,
        duration_ms: config.fly_duration_ms,
    })
}
