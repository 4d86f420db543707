// tests/test_geo.rs
use ghostrun_core::geo::{is_valid_coordinate, EARTH_RADIUS_KM};
use ghostrun_core::{distance_km, distance_meters, Fix};

#[test]
fn same_point_is_exactly_zero() {
    for (lat, lon) in [(0.0, 0.0), (4.6097, -74.0817), (90.0, 180.0), (-90.0, -180.0)] {
        assert_eq!(distance_km(lat, lon, lat, lon), 0.0);
    }
}

#[test]
fn distance_is_symmetric() {
    let a = (40.7128, -74.0060);
    let b = (34.0522, -118.2437);
    let ab = distance_km(a.0, a.1, b.0, b.1);
    let ba = distance_km(b.0, b.1, a.0, a.1);
    assert!((ab - ba).abs() < 1e-9, "ab={ab} ba={ba}");
}

#[test]
fn new_york_to_los_angeles() {
    let d = distance_km(40.7128, -74.0060, 34.0522, -118.2437);
    assert!((d - 3935.75).abs() < 0.01, "got {d}");
}

#[test]
fn out_of_range_returns_nan() {
    assert!(distance_km(90.0001, 0.0, 0.0, 0.0).is_nan());
    assert!(distance_km(0.0, 0.0, -91.0, 0.0).is_nan());
    assert!(distance_km(0.0, 180.5, 0.0, 0.0).is_nan());
    assert!(distance_km(0.0, 0.0, 0.0, -181.0).is_nan());
    assert!(distance_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
}

#[test]
fn boundary_values_are_valid() {
    assert!(is_valid_coordinate(90.0, 180.0));
    assert!(is_valid_coordinate(-90.0, -180.0));

    let pole_to_pole = distance_km(90.0, 0.0, -90.0, 0.0);
    assert!((pole_to_pole - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);

    // same meridian written two ways
    let d = distance_km(0.0, 180.0, 0.0, -180.0);
    assert!(d.is_finite() && d < 1e-6, "got {d}");
}

#[test]
fn meters_variant_matches_km_variant() {
    let a = Fix::new(4.6097, -74.0817, 0);
    let b = Fix::new(4.6150, -74.0830, 1000);
    let m = distance_meters(&a, &b);
    let km = distance_km(a.latitude, a.longitude, b.latitude, b.longitude);
    assert!((m - km * 1000.0).abs() < 1e-6);
}

#[test]
fn meters_variant_does_not_validate() {
    // sensor glitch: still a number, never a sentinel
    let a = Fix::new(95.0, 0.0, 0);
    let b = Fix::new(0.0, 0.0, 1000);
    assert!(distance_meters(&a, &b).is_finite());
}
