use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Fix, TrainingType};

/// Derived snapshot of one completed session. Floats rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatistics {
    pub distance_km: f64,
    pub duration: String,        // "HH:MM:SS"
    pub pace_min_per_km: f64,    // 0 when avg speed is 0
    pub max_speed_kmh: f64,
    pub avg_speed_kmh: f64,
    pub calories_kcal: f64,      // NaN when weight/time/speed preconditions fail
    pub elevation_gain_m: f64,
}

impl Default for TrainingStatistics {
    fn default() -> Self {
        Self {
            distance_km: 0.0,
            duration: "00:00:00".to_string(),
            pace_min_per_km: 0.0,
            max_speed_kmh: 0.0,
            avg_speed_kmh: 0.0,
            calories_kcal: 0.0,
            elevation_gain_m: 0.0,
        }
    }
}

impl TrainingStatistics {
    /// Pace as "M:SS" for display.
    pub fn pace_formatted(&self) -> String {
        crate::metrics::format_pace(self.avg_speed_kmh)
    }

    /// First field carrying a NaN/negative sentinel, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let fields = [
            ("distance_km", self.distance_km),
            ("pace_min_per_km", self.pace_min_per_km),
            ("max_speed_kmh", self.max_speed_kmh),
            ("avg_speed_kmh", self.avg_speed_kmh),
            ("calories_kcal", self.calories_kcal),
            ("elevation_gain_m", self.elevation_gain_m),
        ];
        fields
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
            .map(|(name, _)| *name)
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_field().is_none()
    }
}

/// Elapsed time of one completed kilometre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KilometerSplit {
    pub counter: u32, // 1-based
    pub time: String, // "HH:MM:SS"
}

/// A completed session as handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTraining {
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub training_type: TrainingType,
    #[serde(default)]
    pub is_ghost: bool,
    pub created_at: DateTime<Utc>,
    pub statistics: TrainingStatistics,
    pub route: Vec<Fix>,
}

/// A persisted training, keyed by (user, counter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub user: String,
    pub counter: u64,
    pub name: Option<String>,
    pub image: Option<String>,
    pub training_type: TrainingType,
    pub is_ghost: bool,
    pub created_at: DateTime<Utc>,
    pub statistics: TrainingStatistics,
    #[serde(default)]
    pub splits: Vec<KilometerSplit>,
    pub route: Vec<Fix>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    pub start_date: NaiveDate,
    pub training_quantity: u32,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GoalProgress {
    pub trainings: u32,
    pub distance_km: f64,
    pub completed: bool,
}
