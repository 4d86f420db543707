// tests/test_race.rs
use std::thread;

use ghostrun_core::race::{FinishReason, RaceOutcome};
use ghostrun_core::{
    beat_ghost, Announcement, CoreMetrics, Fix, Ghost, RaceEvent, RaceSession, SessionStatus, SharedRaceSession,
    TrackerConfig,
};

/// Fix `north_m` metres north of the equator origin (1 deg ≈ 111 195 m).
fn fix_north(north_m: f64, t_ms: i64) -> Fix {
    Fix::new(north_m / 111_194.93, 0.0, t_ms)
}

/// 1.2 km ghost replayed at exactly 3 m/s.
fn ghost_3mps() -> Ghost {
    let route = (0..=12).map(|i| fix_north(i as f64 * 100.0, i * 33_000)).collect();
    Ghost::new(route, 1.2, 400.0)
}

fn announcements(events: &[RaceEvent]) -> Vec<Announcement> {
    events
        .iter()
        .filter_map(|e| match e {
            RaceEvent::Announcement(a) => Some(*a),
            _ => None,
        })
        .collect()
}

#[test]
fn beat_ghost_is_a_duration_comparison() {
    assert!(beat_ghost(1400.0, 1500.0));
    assert!(!beat_ghost(1600.0, 1500.0));
    assert!(!beat_ghost(1500.0, 1500.0));
}

#[test]
fn auto_stop_fires_exactly_once() {
    let cfg = TrackerConfig::default();
    let metrics = CoreMetrics::new().unwrap();
    let mut s = RaceSession::new(&cfg, None, Some(1000.0)).with_metrics(metrics.clone());

    assert!(s.on_fix_received(fix_north(0.0, 0)).is_empty());
    assert!(s.on_fix_received(fix_north(400.0, 120_000)).is_empty());

    // crosses the target in a single update
    let events = s.on_fix_received(fix_north(1100.0, 330_000));
    assert_eq!(events, vec![RaceEvent::Finished(FinishReason::TargetReached)]);
    assert_eq!(s.status(), SessionStatus::Finished);
    let at_finish = s.live_distance_m();

    // two more updates before the host reacts
    assert!(s.on_fix_received(fix_north(1200.0, 340_000)).is_empty());
    assert!(s.on_fix_received(fix_north(1300.0, 350_000)).is_empty());
    assert!(s.on_tick().is_empty());
    assert_eq!(s.finish(), None);

    assert_eq!(s.live_distance_m(), at_finish);
    assert_eq!(s.finish_reason(), Some(FinishReason::TargetReached));
    assert_eq!(metrics.race_auto_stops.get(), 1);
    assert_eq!(metrics.races_finished.get(), 1);
}

#[test]
fn ghost_distance_is_the_default_target() {
    let cfg = TrackerConfig::default();
    let s = RaceSession::new(&cfg, Some(ghost_3mps()), None);
    assert_eq!(s.target_m(), Some(1200.0));

    let s = RaceSession::new(&cfg, Some(ghost_3mps()), Some(500.0));
    assert_eq!(s.target_m(), Some(500.0));

    let s = RaceSession::new(&cfg, None, Some(0.0));
    assert_eq!(s.target_m(), None);
}

#[test]
fn ghost_advances_one_tick_at_a_time() {
    let cfg = TrackerConfig::default();
    let mut s = RaceSession::new(&cfg, Some(ghost_3mps()), None);
    for _ in 0..10 {
        s.on_tick();
    }
    assert_eq!(s.elapsed_secs(), 10.0);
    assert_eq!(s.ghost_distance_m(), 30.0);

    let p = s.ghost_position().unwrap();
    assert!(!p.finished);
    assert!((p.latitude - 30.0 / 111_194.93).abs() < 1e-6);
}

#[test]
fn announcements_need_distance_and_time() {
    let cfg = TrackerConfig::default();
    let mut s = RaceSession::new(&cfg, Some(ghost_3mps()), None);

    let mut fired = Vec::new();
    for _ in 0..68 {
        for a in announcements(&s.on_tick()) {
            fired.push((s.elapsed_secs(), a));
        }
    }
    // step = min(100 m, 10% of 1200 m); the ghost alone covers it at 34 s and 68 s
    assert_eq!(
        fired,
        vec![
            (34.0, Announcement::Behind { meters: 102 }),
            (68.0, Announcement::Behind { meters: 204 }),
        ]
    );
    assert_eq!(s.state().last_announcement_secs, Some(68.0));
}

#[test]
fn runner_progress_triggers_ahead_announcement() {
    let cfg = TrackerConfig::default();
    let mut s = RaceSession::new(&cfg, Some(ghost_3mps()), None);
    s.on_fix_received(fix_north(0.0, 0));
    for _ in 0..5 {
        assert!(s.on_tick().is_empty());
    }
    let events = s.on_fix_received(fix_north(150.0, 5_000));
    match announcements(&events).as_slice() {
        [Announcement::Ahead { meters }] => assert!((134..=136).contains(meters), "got {meters}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn outcome_after_finishing_against_ghost() {
    let cfg = TrackerConfig::default();
    let ghost = Ghost::new(ghost_3mps().route, 1.2, 1500.0);

    let mut s = RaceSession::new(&cfg, Some(ghost.clone()), None);
    for _ in 0..1400 {
        s.on_tick();
    }
    assert!(s.outcome().is_none()); // not finished yet
    assert_eq!(s.finish(), Some(RaceEvent::Finished(FinishReason::Manual)));
    assert_eq!(
        s.outcome(),
        Some(RaceOutcome { beat_ghost: true, elapsed_secs: 1400.0, ghost_duration_secs: 1500.0 })
    );

    let mut s = RaceSession::new(&cfg, Some(ghost), None);
    for _ in 0..1600 {
        s.on_tick();
    }
    s.finish();
    assert!(!s.outcome().unwrap().beat_ghost);
}

#[test]
fn malformed_ghost_races_as_solo_session() {
    let cfg = TrackerConfig::default();
    let metrics = CoreMetrics::new().unwrap();
    let ghost = Ghost::new(ghost_3mps().route, 1.2, 0.0);
    let mut s = RaceSession::new(&cfg, Some(ghost), None).with_metrics(metrics.clone());
    assert_eq!(metrics.ghosts_disabled.get(), 1);
    assert_eq!(s.target_m(), None);

    s.on_fix_received(fix_north(0.0, 0));
    let mut events = Vec::new();
    for i in 1..=300 {
        events.extend(s.on_tick());
        events.extend(s.on_fix_received(fix_north(i as f64 * 5.0, i * 1000)));
    }
    assert!(events.is_empty());
    assert_eq!(s.status(), SessionStatus::Active);
    assert_eq!(s.ghost_distance_m(), 0.0);
    let p = s.ghost_position().unwrap();
    assert!(p.latitude.is_finite() && p.longitude.is_finite());

    s.finish();
    assert!(s.outcome().is_none());
}

#[test]
fn pause_freezes_and_resume_continues() {
    let cfg = TrackerConfig::default();
    let mut s = RaceSession::new(&cfg, Some(ghost_3mps()), None);
    s.on_fix_received(fix_north(0.0, 0));
    for _ in 0..5 {
        s.on_tick();
    }
    s.on_fix_received(fix_north(20.0, 5_000));

    s.pause();
    assert_eq!(s.status(), SessionStatus::Paused);
    for _ in 0..30 {
        assert!(s.on_tick().is_empty());
    }
    assert!(s.on_fix_received(fix_north(500.0, 35_000)).is_empty());
    assert_eq!(s.elapsed_secs(), 5.0);
    assert_eq!(s.ghost_distance_m(), 15.0);
    assert!((s.live_distance_m() - 20.0).abs() < 1e-4);

    s.resume();
    s.on_tick();
    s.on_fix_received(fix_north(30.0, 40_000));
    assert_eq!(s.elapsed_secs(), 6.0);
    assert_eq!(s.ghost_distance_m(), 18.0);
    assert!((s.live_distance_m() - 30.0).abs() < 1e-4);

    assert_eq!(s.raw_route().len(), 4);
    assert!(s.raw_route()[2].is_pause);
    assert_eq!(s.route().len(), 3);
}

#[test]
fn discard_stops_everything() {
    let cfg = TrackerConfig::default();
    let mut s = RaceSession::new(&cfg, Some(ghost_3mps()), None);
    s.on_fix_received(fix_north(0.0, 0));
    s.on_tick();
    s.discard();

    assert_eq!(s.status(), SessionStatus::Discarded);
    assert!(s.route().is_empty());
    assert!(s.on_tick().is_empty());
    assert!(s.on_fix_received(fix_north(2000.0, 5_000)).is_empty());
    assert_eq!(s.finish(), None);
    assert_eq!(s.elapsed_secs(), 1.0);
    assert!(s.outcome().is_none());
}

#[test]
fn shared_session_serialises_tick_and_fix_threads() {
    let cfg = TrackerConfig::default();
    let shared = SharedRaceSession::new(RaceSession::new(&cfg, Some(ghost_3mps()), Some(10_000.0)));

    let ticker = {
        let shared = shared.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                shared.on_tick().unwrap();
            }
        })
    };
    for i in 0..100 {
        shared.on_fix_received(fix_north(i as f64 * 3.0, i * 1000)).unwrap();
    }
    ticker.join().unwrap();

    let state = shared.state().unwrap();
    assert_eq!(state.elapsed_secs, 100.0);
    assert_eq!(state.ghost_distance_m, 300.0);
    assert!((state.live_distance_m - 297.0).abs() < 1e-3);
    assert_eq!(shared.with(|s| s.route().len()).unwrap(), 100);
}
