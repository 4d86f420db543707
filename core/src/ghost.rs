// core/src/ghost.rs
use serde::Serialize;

use crate::geo::{distance_meters, lerp_position};
use crate::models::{Fix, Ghost};

/// Where the ghost is on its original route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GhostPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// True once the ghost has covered its whole route (pinned to the last point).
    pub finished: bool,
}

/// Replays a ghost at its historical average speed along its recorded route.
#[derive(Debug, Clone)]
pub struct GhostTrack {
    ghost: Ghost,
    /// Cumulative distance (m) at each route point, `cumulative[0] == 0`.
    cumulative: Vec<f64>,
    speed_mps: Option<f64>,
    covered_m: f64,
}

impl GhostTrack {
    pub fn new(ghost: Ghost) -> Self {
        let mut cumulative = Vec::with_capacity(ghost.route.len());
        let mut acc = 0.0;
        for (i, fix) in ghost.route.iter().enumerate() {
            if i > 0 {
                acc += distance_meters(&ghost.route[i - 1], fix);
            }
            cumulative.push(acc);
        }
        let speed_mps = ghost.speed_mps();
        if speed_mps.is_none() {
            log::warn!(
                "ghost disabled: distance={}km duration={}s",
                ghost.distance_km,
                ghost.duration_secs
            );
        }
        Self { ghost, cumulative, speed_mps, covered_m: 0.0 }
    }

    /// False when the ghost's distance or duration is not positive.
    pub fn is_enabled(&self) -> bool {
        self.speed_mps.is_some()
    }

    pub fn ghost(&self) -> &Ghost {
        &self.ghost
    }

    pub fn speed_mps(&self) -> Option<f64> {
        self.speed_mps
    }

    pub fn covered_m(&self) -> f64 {
        self.covered_m
    }

    /// Length of the recorded route (m), from the fixes themselves.
    pub fn route_length_m(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Moves the ghost forward by `seconds` of replay. No-op when disabled.
    pub fn advance(&mut self, seconds: f64) {
        if let Some(v) = self.speed_mps {
            self.covered_m += v * seconds;
        }
    }

    pub fn position(&self) -> Option<GhostPosition> {
        position_along(&self.ghost.route, &self.cumulative, self.covered_m)
    }
}

/// Position at `distance_m` along `route`, interpolated inside the
/// straddling segment. `None` for an empty route.
pub fn position_along(route: &[Fix], cumulative: &[f64], distance_m: f64) -> Option<GhostPosition> {
    let last = route.last()?;
    let total = cumulative.last().copied().unwrap_or(0.0);

    if distance_m >= total {
        return Some(GhostPosition {
            latitude: last.latitude,
            longitude: last.longitude,
            finished: distance_m > total,
        });
    }
    if distance_m <= 0.0 {
        return Some(GhostPosition { latitude: route[0].latitude, longitude: route[0].longitude, finished: false });
    }

    // first point whose running total reaches the distance
    let i = cumulative.partition_point(|&c| c < distance_m);
    let (a, b) = (&route[i - 1], &route[i]);
    let seg = cumulative[i] - cumulative[i - 1];
    let (latitude, longitude) = if seg > 0.0 {
        lerp_position(a, b, (distance_m - cumulative[i - 1]) / seg)
    } else {
        (b.latitude, b.longitude)
    };
    Some(GhostPosition { latitude, longitude, finished: false })
}
