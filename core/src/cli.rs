use std::fmt::Write as _;

use crate::config::TrackerConfig;
use crate::models::{Fix, Ghost};
use crate::race::{RaceEvent, RaceOutcome, RaceSession, RaceState};
use crate::types::{KilometerSplit, TrainingStatistics};

pub fn render_training_report(stats: &TrainingStatistics, splits: &[KilometerSplit]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Training Report ---");
    let _ = writeln!(out, "Distance:       {:.2} km", stats.distance_km);
    let _ = writeln!(out, "Duration:       {}", stats.duration);
    let _ = writeln!(out, "Pace:           {} min/km", stats.pace_formatted());
    let _ = writeln!(out, "Avg speed:      {:.1} km/h", stats.avg_speed_kmh);
    let _ = writeln!(out, "Max speed:      {:.1} km/h", stats.max_speed_kmh);
    let _ = writeln!(out, "Calories:       {:.0} kcal", stats.calories_kcal);
    let _ = writeln!(out, "Elevation gain: {:.1} m", stats.elevation_gain_m);
    for s in splits {
        let _ = writeln!(out, "  km {:>3}: {}", s.counter, s.time);
    }
    out
}

/// Events of a replayed race, tagged with the elapsed seconds they fired at.
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub events: Vec<(f64, RaceEvent)>,
    pub state: RaceState,
    pub outcome: Option<RaceOutcome>,
}

/// Replays a recorded route against a ghost as a host would: one tick per
/// `tick_seconds` of wall time between fixes, then the fix itself. The
/// session is finished manually after the last fix if auto-stop did not fire.
pub fn replay_race(route: &[Fix], ghost: Ghost, config: &TrackerConfig) -> ReplaySummary {
    let mut session = RaceSession::new(config, Some(ghost), None);
    let mut events = Vec::new();
    let tick_ms = (config.tick_seconds * 1000.0).max(1.0) as i64;

    let mut next_tick_ms = route.first().map_or(0, |f| f.timestamp_ms + tick_ms);
    for fix in route {
        while next_tick_ms <= fix.timestamp_ms {
            for e in session.on_tick() {
                events.push((session.elapsed_secs(), e));
            }
            next_tick_ms += tick_ms;
        }
        for e in session.on_fix_received(*fix) {
            events.push((session.elapsed_secs(), e));
        }
        if session.finish_reason().is_some() {
            break;
        }
    }
    if let Some(e) = session.finish() {
        events.push((session.elapsed_secs(), e));
    }

    ReplaySummary { events, state: session.state(), outcome: session.outcome() }
}
