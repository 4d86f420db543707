use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub default_weight_kg: f64,
    /// Period of the host timer driving `RaceSession::on_tick`.
    pub tick_seconds: f64,
    pub announcements: AnnouncementConfig,
    pub save_rules: SaveRules,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_weight_kg: crate::metrics::DEFAULT_WEIGHT_KG,
            tick_seconds: 1.0,
            announcements: AnnouncementConfig::default(),
            save_rules: SaveRules::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementConfig {
    pub min_interval_secs: f64,
    /// Upper bound of the distance step between announcements (m).
    pub max_step_m: f64,
    /// Share of the target distance used as step when it is smaller than `max_step_m`.
    pub target_fraction: f64,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self { min_interval_secs: 15.0, max_step_m: 100.0, target_fraction: 0.10 }
    }
}

/// Pre-save thresholds. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveRules {
    pub min_fixes: usize,
    pub min_duration_secs: u64,
    pub min_distance_m: f64,
}

impl Default for SaveRules {
    fn default() -> Self {
        Self { min_fixes: 5, min_duration_secs: 10, min_distance_m: 10.0 }
    }
}

/// Reads the tracker config from JSON.
/// A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<TrackerConfig, CoreError> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("config not found at {}, using defaults", path.display());
        return Ok(TrackerConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    let config: TrackerConfig = serde_path_to_error::deserialize(de).map_err(CoreError::json)?;
    log::info!("config loaded from {} (weight={}kg)", path.display(), config.default_weight_kg);
    Ok(config)
}

pub fn save_config(config: &TrackerConfig, path: impl AsRef<Path>) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path.as_ref(), json)?;
    log::info!("config saved to {}", path.as_ref().display());
    Ok(())
}
