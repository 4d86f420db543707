// core/src/analyze_session.rs
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::{CoreError, ValidationError};
use crate::metrics::{compute_statistics, kilometer_splits};
use crate::models::{strip_pause_markers, Fix};
use crate::telemetry::CoreMetrics;
use crate::types::{KilometerSplit, TrainingStatistics};
use crate::validation::validate_for_save;

/// Body of a "calculate training" request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub coordinates: Vec<Fix>,
    #[serde(default)]
    pub user_weight: Option<f64>,
}

/// Statistics keys keep their snake_case names; `pace` and `splits` sit beside them.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub statistics: TrainingStatistics,
    pub pace: String,
    pub splits: Vec<KilometerSplit>,
}

/// Weight used by `analyze_json` when the request carries no usable
/// `userWeight` (missing, null, 0 or NaN).
pub const REQUEST_WEIGHT_KG: f64 = 70.0;

/// Statistics service: pause-marker stripping, computation and telemetry.
#[derive(Debug, Clone)]
pub struct TrainingAnalyzer {
    config: TrackerConfig,
    metrics: Option<CoreMetrics>,
}

impl TrainingAnalyzer {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: CoreMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Statistics of `route` (pause markers dropped). Weight defaults to the
    /// configured one.
    pub fn analyze(&self, route: &[Fix], weight_kg: Option<f64>) -> TrainingStatistics {
        let fixes = strip_pause_markers(route);
        let weight = weight_kg.unwrap_or(self.config.default_weight_kg);
        let stats = compute_statistics(&fixes, weight);

        if let Some(m) = &self.metrics {
            m.statistics_computed.inc();
            if !stats.is_valid() {
                m.statistics_invalid.inc();
            }
        }
        if let Some(field) = stats.invalid_field() {
            log::warn!("statistics carry an invalid `{}` ({} fixes, weight={}kg)", field, fixes.len(), weight);
        }
        stats
    }

    pub fn splits(&self, route: &[Fix]) -> Vec<KilometerSplit> {
        kilometer_splits(&strip_pause_markers(route))
    }

    /// Pre-save checks with the configured thresholds.
    pub fn check_for_save(&self, stats: &TrainingStatistics, route: &[Fix]) -> Result<(), ValidationError> {
        validate_for_save(stats, route, &self.config.save_rules)
    }

    /// JSON in, JSON out. Fewer than two coordinates is rejected here and a
/// missing or zero weight falls back to [`REQUEST_WEIGHT_KG`].
    pub fn analyze_json(&self, body: &str) -> Result<String, CoreError> {
        let de = &mut serde_json::Deserializer::from_str(body);
        let req: AnalyzeRequest = serde_path_to_error::deserialize(de).map_err(CoreError::json)?;

        let fixes = strip_pause_markers(&req.coordinates);
        if fixes.len() < 2 {
            return Err(CoreError::NotEnoughCoordinates(fixes.len()));
        }

        let weight = match req.user_weight {
            Some(w) if w != 0.0 && !w.is_nan() => w,
            _ => REQUEST_WEIGHT_KG,
        };
        let statistics = self.analyze(&fixes, Some(weight));
        let resp = AnalyzeResponse {
            pace: statistics.pace_formatted(),
            splits: kilometer_splits(&fixes),
            statistics,
        };
        Ok(serde_json::to_string(&resp)?)
    }
}
