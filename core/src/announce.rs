use serde::Serialize;

use crate::config::AnnouncementConfig;

/// Spoken progress update, live runner vs ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Announcement {
    Ahead { meters: u64 },
    Behind { meters: u64 },
    Tied,
}

impl Announcement {
    /// Classifies the gap, rounded to whole metres.
    pub fn from_distances(live_m: f64, ghost_m: f64) -> Self {
        let delta = live_m - ghost_m;
        let meters = delta.abs().round() as u64;
        if meters == 0 {
            Announcement::Tied
        } else if delta > 0.0 {
            Announcement::Ahead { meters }
        } else {
            Announcement::Behind { meters }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Announcement::Ahead { meters } => format!("You are ahead of the ghost by {meters}m"),
            Announcement::Behind { meters } => format!("You are behind the ghost by {meters}m"),
            Announcement::Tied => "You are tied with the ghost".to_string(),
        }
    }
}

impl std::fmt::Display for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Decides when an announcement is due.
#[derive(Debug, Clone)]
pub struct AnnouncementPolicy {
    step_m: f64,
    min_interval_secs: f64,
    last: Option<Mark>,
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    at_secs: f64,
    live_m: f64,
    ghost_m: f64,
}

impl AnnouncementPolicy {
    /// Step is `min(max_step_m, target_fraction * target)`; without a
    /// positive target it is `max_step_m`.
    pub fn new(cfg: &AnnouncementConfig, target_m: Option<f64>) -> Self {
        let step_m = match target_m {
            Some(t) if t.is_finite() && t > 0.0 => cfg.max_step_m.min(t * cfg.target_fraction),
            _ => cfg.max_step_m,
        };
        Self { step_m, min_interval_secs: cfg.min_interval_secs, last: None }
    }

    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    /// Elapsed seconds of the last announcement, if any.
    pub fn last_announced_at(&self) -> Option<f64> {
        self.last.map(|m| m.at_secs)
    }

    /// Returns the announcement and records it when both the distance and
    /// the time conditions hold. Distances are measured from the last
    /// announcement (or from the start).
    pub fn check(&mut self, elapsed_secs: f64, live_m: f64, ghost_m: f64) -> Option<Announcement> {
        let (prev_live, prev_ghost) = self.last.map_or((0.0, 0.0), |m| (m.live_m, m.ghost_m));
        let moved = live_m - prev_live >= self.step_m || ghost_m - prev_ghost >= self.step_m;
        let waited = match self.last {
            Some(m) => elapsed_secs - m.at_secs >= self.min_interval_secs,
            None => true,
        };
        if !(moved && waited) {
            return None;
        }
        self.last = Some(Mark { at_secs: elapsed_secs, live_m, ghost_m });
        Some(Announcement::from_distances(live_m, ghost_m))
    }
}
