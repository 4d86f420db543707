// core/src/race.rs
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::announce::{Announcement, AnnouncementPolicy};
use crate::config::TrackerConfig;
use crate::error::CoreError;
use crate::geo::distance_meters;
use crate::ghost::{GhostPosition, GhostTrack};
use crate::models::{strip_pause_markers, Fix, Ghost};
use crate::telemetry::CoreMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Active,
    Paused,
    Finished,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinishReason {
    /// Live distance reached the target distance.
    TargetReached,
    /// Host called `finish()`.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RaceEvent {
    Announcement(Announcement),
    Finished(FinishReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaceOutcome {
    pub beat_ghost: bool,
    pub elapsed_secs: f64,
    pub ghost_duration_secs: f64,
}

/// Win condition: strictly faster than the ghost's recorded duration.
pub fn beat_ghost(live_elapsed_secs: f64, ghost_duration_secs: f64) -> bool {
    live_elapsed_secs < ghost_duration_secs
}

/// Snapshot of the in-memory race state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceState {
    pub status: SessionStatus,
    pub elapsed_secs: f64,
    pub live_distance_m: f64,
    pub ghost_distance_m: f64,
    pub ghost_position: Option<GhostPosition>,
    pub last_announcement_secs: Option<f64>,
}

/// Live tracking session, optionally raced against a ghost.
///
/// Driven by the host: `on_tick()` once per timer period and
/// `on_fix_received()` for every location update. Calls must be serialised
/// (single event loop, or [`SharedRaceSession`]). After finish or discard
/// every call is a no-op.
#[derive(Debug)]
pub struct RaceSession {
    tick_seconds: f64,
    ghost: Option<GhostTrack>,
    target_m: Option<f64>,
    policy: AnnouncementPolicy,
    status: SessionStatus,
    elapsed_secs: f64,
    live_m: f64,
    last_fix: Option<Fix>,
    route: Vec<Fix>,
    finished: OnceCell<FinishReason>,
    metrics: Option<CoreMetrics>,
}

impl RaceSession {
    /// Starts an active session.
    ///
    /// The auto-stop target is `target_distance_m` when given and positive,
    /// otherwise the distance of an enabled ghost. A ghost with non-positive
    /// distance or duration is kept for reference but never moves, announces
    /// or stops the session.
    pub fn new(config: &TrackerConfig, ghost: Option<Ghost>, target_distance_m: Option<f64>) -> Self {
        let ghost = ghost.map(GhostTrack::new);
        let explicit = target_distance_m.filter(|t| t.is_finite() && *t > 0.0);
        let from_ghost = ghost
            .as_ref()
            .filter(|g| g.is_enabled())
            .map(|g| g.ghost().distance_m());
        let target_m = explicit.or(from_ghost);
        log::debug!(
            "race session started (ghost={}, target={:?}m)",
            ghost.as_ref().map_or("none", |g| if g.is_enabled() { "enabled" } else { "disabled" }),
            target_m
        );

        Self {
            tick_seconds: config.tick_seconds,
            policy: AnnouncementPolicy::new(&config.announcements, target_m),
            ghost,
            target_m,
            status: SessionStatus::Active,
            elapsed_secs: 0.0,
            live_m: 0.0,
            last_fix: None,
            route: Vec::new(),
            finished: OnceCell::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: CoreMetrics) -> Self {
        if self.ghost.as_ref().is_some_and(|g| !g.is_enabled()) {
            metrics.ghosts_disabled.inc();
        }
        self.metrics = Some(metrics);
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn target_m(&self) -> Option<f64> {
        self.target_m
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn live_distance_m(&self) -> f64 {
        self.live_m
    }

    pub fn ghost_distance_m(&self) -> f64 {
        self.ghost.as_ref().map_or(0.0, |g| g.covered_m())
    }

    pub fn ghost_position(&self) -> Option<GhostPosition> {
        self.ghost.as_ref().and_then(|g| g.position())
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finished.get().copied()
    }

    fn racing(&self) -> bool {
        self.ghost.as_ref().is_some_and(|g| g.is_enabled())
    }

    pub fn state(&self) -> RaceState {
        RaceState {
            status: self.status,
            elapsed_secs: self.elapsed_secs,
            live_distance_m: self.live_m,
            ghost_distance_m: self.ghost_distance_m(),
            ghost_position: self.ghost_position(),
            last_announcement_secs: self.policy.last_announced_at(),
        }
    }

    /// Recorded route without pause markers.
    pub fn route(&self) -> Vec<Fix> {
        strip_pause_markers(&self.route)
    }

    /// Route including pause markers, as recorded.
    pub fn raw_route(&self) -> &[Fix] {
        &self.route
    }

    /// One timer period: advances elapsed time and the ghost.
    pub fn on_tick(&mut self) -> Vec<RaceEvent> {
        if self.status != SessionStatus::Active {
            return Vec::new();
        }
        self.elapsed_secs += self.tick_seconds;
        if let Some(g) = self.ghost.as_mut() {
            g.advance(self.tick_seconds);
        }
        self.maybe_announce().into_iter().collect()
    }

    /// New location update: extends the route and the live distance, then
    /// checks auto-stop and announcements.
    pub fn on_fix_received(&mut self, fix: Fix) -> Vec<RaceEvent> {
        if self.status != SessionStatus::Active {
            return Vec::new();
        }
        if let Some(prev) = self.last_fix.as_ref() {
            self.live_m += distance_meters(prev, &fix);
        }
        self.last_fix = Some(fix);
        self.route.push(fix);

        let mut events = Vec::new();
        if let Some(target) = self.target_m {
            if self.live_m >= target {
                if let Some(reason) = self.try_finish(FinishReason::TargetReached) {
                    log::info!("target {:.0}m reached at {:.0}s", target, self.elapsed_secs);
                    if let Some(m) = &self.metrics {
                        m.race_auto_stops.inc();
                    }
                    events.push(RaceEvent::Finished(reason));
                    return events;
                }
            }
        }
        events.extend(self.maybe_announce());
        events
    }

    /// Stops accumulation and ghost advancement; state is kept for `resume()`.
    pub fn pause(&mut self) {
        if self.status != SessionStatus::Active {
            return;
        }
        self.status = SessionStatus::Paused;
        if let Some(last) = self.route.last() {
            let marker = last.pause_marker();
            self.route.push(marker);
        }
    }

    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Active;
        }
    }

    /// Manual finish. Returns the event only for the call that actually
    /// finished the session.
    pub fn finish(&mut self) -> Option<RaceEvent> {
        if self.status == SessionStatus::Discarded {
            return None;
        }
        self.try_finish(FinishReason::Manual).map(RaceEvent::Finished)
    }

    /// Drops the recorded route. No further events are produced.
    pub fn discard(&mut self) {
        if self.status == SessionStatus::Finished {
            return;
        }
        self.status = SessionStatus::Discarded;
        self.route.clear();
        self.last_fix = None;
    }

    /// Win/lose against the ghost, once finished with an enabled ghost.
    pub fn outcome(&self) -> Option<RaceOutcome> {
        if self.status != SessionStatus::Finished || !self.racing() {
            return None;
        }
        let ghost_duration_secs = self.ghost.as_ref()?.ghost().duration_secs;
        Some(RaceOutcome {
            beat_ghost: beat_ghost(self.elapsed_secs, ghost_duration_secs),
            elapsed_secs: self.elapsed_secs,
            ghost_duration_secs,
        })
    }

    fn try_finish(&mut self, reason: FinishReason) -> Option<FinishReason> {
        self.finished.set(reason).ok()?;
        self.status = SessionStatus::Finished;
        if let Some(m) = &self.metrics {
            m.races_finished.inc();
        }
        Some(reason)
    }

    fn maybe_announce(&mut self) -> Option<RaceEvent> {
        if !self.racing() {
            return None;
        }
        let ghost_m = self.ghost_distance_m();
        let a = self.policy.check(self.elapsed_secs, self.live_m, ghost_m)?;
        log::debug!("announce at {:.0}s: {}", self.elapsed_secs, a);
        if let Some(m) = &self.metrics {
            m.race_announcements.inc();
        }
        Some(RaceEvent::Announcement(a))
    }
}

/// Race session behind a mutex, for hosts whose timer and location stream
/// run on different threads.
#[derive(Debug, Clone)]
pub struct SharedRaceSession {
    inner: Arc<Mutex<RaceSession>>,
}

impl SharedRaceSession {
    pub fn new(session: RaceSession) -> Self {
        Self { inner: Arc::new(Mutex::new(session)) }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut RaceSession) -> T) -> Result<T, CoreError> {
        let mut guard = self.inner.lock().map_err(|_| CoreError::SessionPoisoned)?;
        Ok(f(&mut guard))
    }

    pub fn on_tick(&self) -> Result<Vec<RaceEvent>, CoreError> {
        self.with(|s| s.on_tick())
    }

    pub fn on_fix_received(&self, fix: Fix) -> Result<Vec<RaceEvent>, CoreError> {
        self.with(|s| s.on_fix_received(fix))
    }

    pub fn state(&self) -> Result<RaceState, CoreError> {
        self.with(|s| s.state())
    }
}
