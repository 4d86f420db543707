// core/src/geo.rs
use crate::models::Fix;

/// Mean earth radius (km) used by the statistics path.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Mean earth radius (m) used by the live-tracking path.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[inline]
pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// True when latitude is in [-90, 90] and longitude in [-180, 180].
/// NaN fails both range checks.
#[inline]
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

#[inline]
fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius: f64) -> f64 {
    let d_lat = degrees_to_radians(lat2 - lat1);
    let d_lon = degrees_to_radians(lon2 - lon1);

    let a = (d_lat / 2.0).sin().powi(2)
        + degrees_to_radians(lat1).cos() * degrees_to_radians(lat2).cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Great-circle distance in kilometres.
///
/// Returns `f64::NAN` when any coordinate is out of range. Callers on the
/// statistics/validation path are expected to check with `is_nan()`.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if !is_valid_coordinate(lat1, lon1) || !is_valid_coordinate(lat2, lon2) {
        return f64::NAN;
    }
    haversine(lat1, lon1, lat2, lon2, EARTH_RADIUS_KM)
}

/// Great-circle distance in metres between two fixes.
///
/// No range validation: the live-tracking path must never reject a
/// sensor-reported fix mid-recording. Use [`distance_km`] where bad input
/// should be caught.
pub fn distance_meters(a: &Fix, b: &Fix) -> f64 {
    haversine(a.latitude, a.longitude, b.latitude, b.longitude, EARTH_RADIUS_M)
}

/// Linear interpolation between two fixes' lat/lon, `t` in [0, 1].
pub fn lerp_position(a: &Fix, b: &Fix, t: f64) -> (f64, f64) {
    let t = t.clamp(0.0, 1.0);
    (
        a.latitude + (b.latitude - a.latitude) * t,
        a.longitude + (b.longitude - a.longitude) * t,
    )
}
