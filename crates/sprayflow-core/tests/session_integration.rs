//! Integration tests for the session engine driven by manual time.

use sprayflow_core::{
    Category, CategorySet, CoreError, Event, ManualTime, RecordingOutput, SessionEngine,
    SessionError, SessionPlan, SessionState, Settings, SilentOutput,
};

fn footwork_only() -> CategorySet {
    [Category::Footwork].into_iter().collect()
}

fn cue_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::CueEmitted { .. }))
        .count()
}

fn new_engine(seed: u64) -> (SessionEngine<RecordingOutput, ManualTime>, ManualTime) {
    let time = ManualTime::new();
    let engine = SessionEngine::with_seed(RecordingOutput::new(), time.clone(), seed);
    (engine, time)
}

#[test]
fn test_short_footwork_session_runs_to_completion() {
    let (mut engine, time) = new_engine(1);
    let plan = SessionPlan::new(5, 10, footwork_only()).unwrap();

    // First cue is immediate
    let events = engine.start_plan(plan).unwrap();
    assert_eq!(cue_count(&events), 1);
    assert_eq!(engine.time_remaining_secs(), 10);

    // Nothing more before the first interval elapses
    time.advance_secs(4);
    assert_eq!(cue_count(&engine.tick()), 0);
    assert_eq!(engine.stats().unwrap().total_cues, 1);

    // Second cue at t=5
    time.advance_secs(1);
    assert_eq!(cue_count(&engine.tick()), 1);
    assert_eq!(engine.time_remaining_secs(), 5);

    // Countdown reaches zero at t=10 before the cue due at the same instant
    time.advance_secs(5);
    let events = engine.tick();
    assert_eq!(cue_count(&events), 0);
    assert!(matches!(events.last(), Some(Event::SessionCompleted { .. })));
    assert_eq!(engine.state(), SessionState::Completed);
    assert_eq!(engine.time_remaining_secs(), 0);
    assert!(engine.current_movement().is_none());

    let stats = engine.stats().unwrap();
    assert_eq!(stats.total_cues, 2);
    assert_eq!(stats.count(Category::Footwork), 2);
    for other in [
        Category::BodyPositions,
        Category::HandPositions,
        Category::Transitions,
        Category::Balance,
    ] {
        assert_eq!(stats.count(other), 0);
    }
    assert!(stats.is_consistent());
}

#[test]
fn test_completed_session_stays_silent() {
    let (mut engine, time) = new_engine(2);
    engine
        .start_plan(SessionPlan::new(5, 10, footwork_only()).unwrap())
        .unwrap();
    time.advance_secs(10);
    engine.tick();
    assert_eq!(engine.state(), SessionState::Completed);

    time.advance_secs(60);
    assert!(engine.tick().is_empty());
    assert_eq!(engine.stats().unwrap().total_cues, 2);
    assert!(engine.next_deadline().is_none());

    assert!(matches!(
        engine.acknowledge_completion(),
        Some(Event::SessionReset { .. })
    ));
    assert_eq!(engine.state(), SessionState::Idle);
    assert!(engine.stats().is_none());
}

#[test]
fn test_pause_preserves_remaining_time() {
    let (mut engine, time) = new_engine(3);
    engine
        .start_plan(SessionPlan::new(5, 10, footwork_only()).unwrap())
        .unwrap();

    time.advance_secs(3);
    engine.tick();
    assert!(engine.pause().is_some());
    assert_eq!(engine.time_remaining_secs(), 7);

    // Wall clock keeps moving while paused; nothing fires
    time.advance_secs(100);
    assert!(engine.tick().is_empty());
    assert_eq!(engine.time_remaining_secs(), 7);

    assert!(matches!(
        engine.resume(),
        Some(Event::SessionResumed { remaining_secs: 7, .. })
    ));

    // Cue cadence restarts from the resume point (t=103 -> next cue t=108)
    time.advance_secs(4);
    assert_eq!(cue_count(&engine.tick()), 0);
    assert_eq!(engine.time_remaining_secs(), 3);

    time.advance_secs(1);
    assert_eq!(cue_count(&engine.tick()), 1);

    time.advance_secs(2);
    engine.tick();
    assert_eq!(engine.state(), SessionState::Completed);
    assert_eq!(engine.stats().unwrap().total_cues, 2);
}

#[test]
fn test_pause_cancels_speech() {
    let (mut engine, _time) = new_engine(4);
    engine
        .start_plan(SessionPlan::new(5, 60, footwork_only()).unwrap())
        .unwrap();
    let cancels_before = engine.output().cancels();
    engine.pause();
    assert_eq!(engine.output().cancels(), cancels_before + 1);
}

#[test]
fn test_double_skip_counts_immediately() {
    let (mut engine, _time) = new_engine(5);
    engine
        .start_plan(SessionPlan::new(5, 60, footwork_only()).unwrap())
        .unwrap();

    let before = engine.stats().unwrap().total_cues;
    assert!(matches!(
        engine.skip(),
        Some(Event::CueEmitted { skipped: true, .. })
    ));
    assert!(engine.skip().is_some());
    assert_eq!(engine.stats().unwrap().total_cues, before + 2);
}

#[test]
fn test_skip_keeps_cue_phase() {
    let (mut engine, time) = new_engine(6);
    engine
        .start_plan(SessionPlan::new(5, 60, footwork_only()).unwrap())
        .unwrap();

    time.advance_secs(4);
    engine.tick();
    engine.skip();

    // Scheduled cue still lands at t=5, one second after the skip
    time.advance_secs(1);
    assert_eq!(cue_count(&engine.tick()), 1);
    assert_eq!(engine.stats().unwrap().total_cues, 3);
}

#[test]
fn test_stop_from_running_and_paused() {
    for pause_first in [false, true] {
        let (mut engine, time) = new_engine(7);
        engine
            .start_plan(SessionPlan::new(5, 60, footwork_only()).unwrap())
            .unwrap();
        time.advance_secs(6);
        engine.tick();
        if pause_first {
            engine.pause();
        }

        match engine.stop() {
            Some(Event::SessionStopped { stats, .. }) => assert_eq!(stats.total_cues, 2),
            other => panic!("Expected SessionStopped, got {other:?}"),
        }
        assert_eq!(engine.state(), SessionState::Idle);
        assert!(engine.current_movement().is_none());
        assert!(engine.stats().is_none());

        // Stale deadline after stop delivers nothing
        time.advance_secs(30);
        assert!(engine.tick().is_empty());
    }
}

#[test]
fn test_start_without_categories_is_rejected() {
    let (mut engine, _time) = new_engine(8);
    let mut settings = Settings::default();
    settings.enabled_categories.clear();

    let err = engine.start(&settings).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Session(SessionError::NoCategoriesEnabled)
    ));
    assert_eq!(engine.state(), SessionState::Idle);
    assert!(engine.stats().is_none());
    assert!(engine.output().calls.is_empty());
}

#[test]
fn test_start_from_settings_uses_minutes() {
    let (mut engine, _time) = new_engine(9);
    let mut settings = Settings::default();
    settings.duration = 2;
    engine.start(&settings).unwrap();
    assert_eq!(engine.time_remaining_secs(), 120);

    // Later settings changes do not reach the running session
    settings.enabled_categories.clear();
    settings.interval = 1;
    assert_eq!(engine.plan().unwrap().interval_secs(), 5);
}

#[test]
fn test_new_session_after_completion() {
    let (mut engine, time) = new_engine(10);
    engine
        .start_plan(SessionPlan::new(5, 3, footwork_only()).unwrap())
        .unwrap();
    time.advance_secs(3);
    engine.tick();
    assert_eq!(engine.state(), SessionState::Completed);

    // Must acknowledge before starting over
    assert!(engine
        .start_plan(SessionPlan::new(5, 3, footwork_only()).unwrap())
        .is_err());
    engine.acknowledge_completion();
    let events = engine
        .start_plan(SessionPlan::new(5, 3, footwork_only()).unwrap())
        .unwrap();
    assert_eq!(cue_count(&events), 1);
    assert_eq!(engine.stats().unwrap().total_cues, 1);
}

#[test]
fn test_stats_invariant_holds_throughout() {
    let all: CategorySet = Category::ALL.into_iter().collect();
    let (mut engine, time) = new_engine(11);
    engine
        .start_plan(SessionPlan::new(3, 90, all.clone()).unwrap())
        .unwrap();

    for step in 0..120u64 {
        time.advance_secs(1);
        for event in engine.tick() {
            if let Event::CueEmitted { movement, .. } = event {
                assert!(all.contains(&movement.category));
            }
        }
        if step % 7 == 0 {
            engine.skip();
        }
        if step % 20 == 0 {
            engine.pause();
            time.advance_secs(5);
            engine.resume();
        }
        if let Some(stats) = engine.stats() {
            assert!(stats.is_consistent());
        }
    }
    assert_eq!(engine.state(), SessionState::Completed);
    let stats = engine.stats().unwrap();
    assert!(stats.is_consistent());
    assert_eq!(
        stats.movements.len(),
        stats.summary().iter().map(|s| s.count as usize).sum::<usize>()
    );
}

#[test]
fn test_late_host_catches_up_in_order() {
    let (mut engine, time) = new_engine(12);
    engine
        .start_plan(SessionPlan::new(2, 30, footwork_only()).unwrap())
        .unwrap();

    time.advance_secs(7);
    let remaining: Vec<u64> = engine
        .tick()
        .into_iter()
        .filter_map(|e| match e {
            Event::CountdownTick { remaining_secs, .. } => Some(remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![29, 28, 27, 26, 25, 24, 23]);
    assert_eq!(engine.stats().unwrap().total_cues, 4);
}

#[test]
fn test_failing_outputs_do_not_disturb_session() {
    let time = ManualTime::new();
    let mut engine = SessionEngine::with_seed(RecordingOutput::failing(), time.clone(), 13);
    engine
        .start_plan(
            SessionPlan::new(5, 10, footwork_only())
                .unwrap()
                .with_beep(true),
        )
        .unwrap();
    assert_eq!(engine.state(), SessionState::Running);
    assert_eq!(engine.output().tones(), 1);

    engine.pause();
    engine.resume();
    time.advance_secs(10);
    engine.tick();
    assert_eq!(engine.state(), SessionState::Completed);
}

#[test]
fn test_same_seed_same_cues() {
    let run = |seed| {
        let time = ManualTime::new();
        let mut engine = SessionEngine::with_seed(SilentOutput, time.clone(), seed);
        let all: CategorySet = Category::ALL.into_iter().collect();
        engine
            .start_plan(SessionPlan::new(1, 20, all).unwrap())
            .unwrap();
        time.advance_secs(20);
        engine.tick();
        engine
            .stats()
            .unwrap()
            .movements
            .iter()
            .map(|m| m.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(99), run(99));
}
