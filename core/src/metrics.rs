// core/src/metrics.rs
use ordered_float::OrderedFloat;

use crate::geo::distance_km;
use crate::models::Fix;
use crate::types::{KilometerSplit, TrainingStatistics};

pub const DEFAULT_WEIGHT_KG: f64 = 65.0;

// --- RoundTo trait (public, used for presentation rounding) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

/// Distance (km) of every consecutive pair. NaN for pairs with an invalid coordinate.
pub fn segment_distances_km(fixes: &[Fix]) -> Vec<f64> {
    fixes
        .windows(2)
        .map(|w| distance_km(w[0].latitude, w[0].longitude, w[1].latitude, w[1].longitude))
        .collect()
}

/// Speed (km/h) of every segment with positive duration. Zero-duration segments are skipped.
pub fn segment_speeds_kmh(fixes: &[Fix], distances: &[f64]) -> Vec<f64> {
    let mut speeds = Vec::with_capacity(distances.len());
    for (w, d) in fixes.windows(2).zip(distances.iter()) {
        let dt = w[1].timestamp_ms.saturating_sub(w[0].timestamp_ms) as f64 / 1000.0;
        if dt > 0.0 {
            speeds.push((d / dt) * 3600.0);
        }
    }
    speeds
}

pub fn total_distance_km(distances: &[f64]) -> f64 {
    distances.iter().sum()
}

/// Seconds → "HH:MM:SS" using floor division.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    let hrs = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hrs:02}:{mins:02}:{secs:02}")
}

/// "HH:MM:SS" → seconds. Minutes and seconds must be below 60.
pub fn parse_duration(s: &str) -> Option<u64> {
    let mut parts = s.trim().split(':');
    let hrs: u64 = parts.next()?.parse().ok()?;
    let mins: u64 = parts.next()?.parse().ok()?;
    let secs: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || mins >= 60 || secs >= 60 {
        return None;
    }
    Some(hrs * 3600 + mins * 60 + secs)
}

pub fn avg_speed_kmh(total_km: f64, total_seconds: f64) -> f64 {
    if total_seconds == 0.0 { return 0.0; }
    (total_km / total_seconds) * 3600.0
}

/// Max of the segment speeds, 0 when there are none. A NaN segment wins, so
/// an invalid coordinate surfaces in the result.
pub fn max_speed_kmh(speeds: &[f64]) -> f64 {
    speeds
        .iter()
        .copied()
        .map(OrderedFloat)
        .max()
        .map(|m| m.into_inner())
        .unwrap_or(0.0)
}

/// Minutes per km.
pub fn pace_min_per_km(avg_speed_kmh: f64) -> f64 {
    if avg_speed_kmh == 0.0 { return 0.0; }
    60.0 / avg_speed_kmh
}

/// MET step function keyed by average speed (km/h).
pub fn met_for_speed(avg_speed_kmh: f64) -> f64 {
    if avg_speed_kmh < 8.0 {
        8.0
    } else if avg_speed_kmh < 12.0 {
        10.0
    } else {
        12.0
    }
}

/// kcal = MET * weight * hours. NaN when speed < 0, weight <= 0 or hours < 0.
pub fn calculate_calories(avg_speed_kmh: f64, weight_kg: f64, hours: f64) -> f64 {
    if avg_speed_kmh < 0.0 || weight_kg <= 0.0 || hours < 0.0 {
        return f64::NAN;
    }
    met_for_speed(avg_speed_kmh) * weight_kg * hours
}

/// max - min altitude, never negative.
///
/// The range is seeded from the first fix (missing altitude counts as 0);
/// later fixes only contribute when they carry a non-zero altitude, since
/// hosts report 0 when the sensor has no reading.
pub fn elevation_gain_m(fixes: &[Fix]) -> f64 {
    let Some(first) = fixes.first() else { return 0.0 };
    let seed = first.altitude_m.unwrap_or(0.0);
    let (min, max) = fixes
        .iter()
        .filter_map(|f| f.altitude_m)
        .filter(|&a| a != 0.0)
        .fold((seed, seed), |(lo, hi), a| (lo.min(a), hi.max(a)));
    (max - min).max(0.0)
}

/// Pace as "M:SS" per km. "0:00" for non-positive speed.
pub fn format_pace(avg_speed_kmh: f64) -> String {
    if !(avg_speed_kmh > 0.0) {
        return "0:00".to_string();
    }
    let pace = 60.0 / avg_speed_kmh;
    let mins = pace.floor();
    let secs = ((pace - mins) * 60.0).floor();
    format!("{}:{:02}", mins as u64, secs as u64)
}

/// Full statistics for one route. Fewer than two fixes yields the neutral result.
pub fn compute_statistics(fixes: &[Fix], weight_kg: f64) -> TrainingStatistics {
    if fixes.len() < 2 {
        return TrainingStatistics::default();
    }

    let distances = segment_distances_km(fixes);
    let total_km = total_distance_km(&distances);
    let speeds = segment_speeds_kmh(fixes, &distances);

    let first = fixes[0].timestamp_ms;
    let last = fixes[fixes.len() - 1].timestamp_ms;
    let total_seconds = last.saturating_sub(first) as f64 / 1000.0;

    let avg = avg_speed_kmh(total_km, total_seconds);
    let max = max_speed_kmh(&speeds);
    let pace = pace_min_per_km(avg);
    let calories = calculate_calories(avg, weight_kg, total_seconds / 3600.0);
    let gain = elevation_gain_m(fixes);

    TrainingStatistics {
        distance_km: total_km.round_to(2),
        duration: format_duration(total_seconds),
        pace_min_per_km: pace.round_to(2),
        max_speed_kmh: max.round_to(2),
        avg_speed_kmh: avg.round_to(2),
        calories_kcal: calories.round_to(2),
        elevation_gain_m: gain.round_to(2),
    }
}

/// Time of each fully completed kilometre, interpolated inside the segment
/// where the kilometre mark is crossed. Segments with an invalid coordinate
/// are skipped.
pub fn kilometer_splits(fixes: &[Fix]) -> Vec<KilometerSplit> {
    let mut splits = Vec::new();
    let Some(first) = fixes.first() else { return splits };

    let mut covered_km = 0.0;
    let mut mark_ms = first.timestamp_ms as f64;

    for w in fixes.windows(2) {
        let d = distance_km(w[0].latitude, w[0].longitude, w[1].latitude, w[1].longitude);
        if !d.is_finite() || d <= 0.0 {
            continue;
        }
        let t0 = w[0].timestamp_ms as f64;
        let dt = w[1].timestamp_ms.saturating_sub(w[0].timestamp_ms) as f64;

        // a long segment can close several kilometres
        let mut next_km = (splits.len() + 1) as f64;
        while covered_km + d >= next_km {
            let frac = (next_km - covered_km) / d;
            let crossed_ms = t0 + frac * dt;
            splits.push(KilometerSplit {
                counter: splits.len() as u32 + 1,
                time: format_duration((crossed_ms - mark_ms) / 1000.0),
            });
            mark_ms = crossed_ms;
            next_km += 1.0;
        }
        covered_km += d;
    }
    splits
}
