use ghostrun_core::config::SaveRules;
use ghostrun_core::validation::validate_for_save;
use ghostrun_core::{Fix, TrainingStatistics, ValidationError};

fn route(n: i64) -> Vec<Fix> {
    (0..n).map(|i| Fix::new(0.0, i as f64 * 0.0001, i * 2_000)).collect()
}

fn stats(distance_km: f64, duration: &str) -> TrainingStatistics {
    TrainingStatistics { distance_km, duration: duration.to_string(), ..Default::default() }
}

#[test]
fn just_above_every_threshold_passes() {
    let rules = SaveRules::default();
    assert_eq!(validate_for_save(&stats(0.011, "00:00:11"), &route(6), &rules), Ok(()));
}

#[test]
fn thresholds_are_strict() {
    let rules = SaveRules::default();
    assert_eq!(
        validate_for_save(&stats(1.0, "00:10:00"), &route(5), &rules),
        Err(ValidationError::TooFewFixes { count: 5, min: 5 })
    );
    assert_eq!(
        validate_for_save(&stats(1.0, "00:00:10"), &route(6), &rules),
        Err(ValidationError::TooShort { secs: 10, min: 10 })
    );
    assert_eq!(
        validate_for_save(&stats(0.01, "00:10:00"), &route(6), &rules),
        Err(ValidationError::TooClose { meters: 10.0, min: 10.0 })
    );
}

#[test]
fn pause_markers_do_not_count_as_fixes() {
    let mut r = route(5);
    let marker = r[4].pause_marker();
    r.push(marker);
    assert!(matches!(
        validate_for_save(&stats(1.0, "00:10:00"), &r, &SaveRules::default()),
        Err(ValidationError::TooFewFixes { count: 5, .. })
    ));
}

#[test]
fn invalid_numbers_are_rejected() {
    let rules = SaveRules::default();
    let mut s = stats(1.0, "00:10:00");
    s.calories_kcal = f64::NAN;
    assert_eq!(
        validate_for_save(&s, &route(6), &rules),
        Err(ValidationError::InvalidStatistics { field: "calories_kcal" })
    );

    let mut s = stats(1.0, "00:10:00");
    s.max_speed_kmh = -1.0;
    assert_eq!(
        validate_for_save(&s, &route(6), &rules),
        Err(ValidationError::InvalidStatistics { field: "max_speed_kmh" })
    );
}

#[test]
fn malformed_duration_is_rejected() {
    assert_eq!(
        validate_for_save(&stats(1.0, "ten minutes"), &route(6), &SaveRules::default()),
        Err(ValidationError::MalformedDuration("ten minutes".to_string()))
    );
}

#[test]
fn custom_rules() {
    let rules = SaveRules { min_fixes: 1, min_duration_secs: 0, min_distance_m: 0.0 };
    assert_eq!(validate_for_save(&stats(0.001, "00:00:01"), &route(2), &rules), Ok(()));
}
