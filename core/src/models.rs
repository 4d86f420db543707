use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One GPS sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    #[serde(alias = "timestamp", alias = "timestampMillis")]
    pub timestamp_ms: i64, // ms since epoch, non-decreasing within a session
    #[serde(default, alias = "altitude", alias = "altitudeMeters")]
    pub altitude_m: Option<f64>,
    /// Duplicate of the last fix, appended when the user pauses.
    #[serde(default, alias = "isPause", skip_serializing_if = "std::ops::Not::not")]
    pub is_pause: bool,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self { latitude, longitude, timestamp_ms, altitude_m: None, is_pause: false }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    /// Copy of this fix flagged as a pause marker.
    pub fn pause_marker(&self) -> Self {
        Self { is_pause: true, ..*self }
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Route without pause markers, in capture order.
pub fn strip_pause_markers(route: &[Fix]) -> Vec<Fix> {
    route.iter().filter(|f| !f.is_pause).copied().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrainingType {
    #[default]
    Running,
    Cycling,
}

/// A prior session replayed as the opponent of a live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub route: Vec<Fix>,
    pub distance_km: f64,
    pub duration_secs: f64,
}

impl Ghost {
    pub fn new(route: Vec<Fix>, distance_km: f64, duration_secs: f64) -> Self {
        Self { route, distance_km, duration_secs }
    }

    /// Average replay speed in m/s, `None` when distance or duration is not
    /// a positive finite number.
    pub fn speed_mps(&self) -> Option<f64> {
        let ok = |x: f64| x.is_finite() && x > 0.0;
        if ok(self.distance_km) && ok(self.duration_secs) {
            Some(self.distance_km * 1000.0 / self.duration_secs)
        } else {
            None
        }
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_km * 1000.0
    }
}
