use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::error::CoreError;

/// Counters for the statistics and race engines, in a registry owned by the
/// host. Cloning shares the underlying counters.
#[derive(Clone)]
pub struct CoreMetrics {
    registry: Registry,
    pub statistics_computed: IntCounter,
    pub statistics_invalid: IntCounter,
    pub race_announcements: IntCounter,
    pub race_auto_stops: IntCounter,
    pub races_finished: IntCounter,
    pub ghosts_disabled: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, CoreError> {
    let c = IntCounter::new(name, help)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl CoreMetrics {
    pub fn new() -> Result<Self, CoreError> {
        let registry = Registry::new_custom(Some("ghostrun".to_string()), None)?;
        Ok(Self {
            statistics_computed: counter(&registry, "statistics_computed_total", "Training statistics computed")?,
            statistics_invalid: counter(&registry, "statistics_invalid_total", "Statistics carrying a NaN sentinel")?,
            race_announcements: counter(&registry, "race_announcements_total", "Ghost progress announcements")?,
            race_auto_stops: counter(&registry, "race_auto_stops_total", "Sessions stopped at target distance")?,
            races_finished: counter(&registry, "races_finished_total", "Race sessions finished")?,
            ghosts_disabled: counter(&registry, "ghosts_disabled_total", "Ghosts with malformed distance/duration")?,
            registry,
        })
    }

    /// Prometheus text exposition of all counters.
    pub fn render(&self) -> Result<String, CoreError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl std::fmt::Debug for CoreMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreMetrics")
            .field("statistics_computed", &self.statistics_computed.get())
            .field("race_auto_stops", &self.race_auto_stops.get())
            .finish_non_exhaustive()
    }
}
