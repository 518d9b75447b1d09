//! End-to-end walks through a default 25/5 cycle.

use pomotick_core::{Durations, Event, Phase, PhaseTimer, TimerObserver};
use std::sync::{Arc, Mutex};

fn run_ticks(timer: &mut PhaseTimer, n: usize) {
    for _ in 0..n {
        assert!(timer.tick().is_some(), "tick ignored before {n} ticks elapsed");
    }
}

#[test]
fn fresh_timer_starts_idle_in_work() {
    let timer = PhaseTimer::default();
    assert_eq!(timer.phase(), Phase::Work);
    assert_eq!(timer.remaining_secs(), 1500);
    assert_eq!(timer.completed_work_sessions(), 1);
    assert!(!timer.is_running());
}

#[test]
fn full_work_phase_moves_to_break() {
    let mut timer = PhaseTimer::default();
    timer.start();
    run_ticks(&mut timer, 1500);

    assert_eq!(timer.phase(), Phase::Break);
    assert_eq!(timer.remaining_secs(), 300);
    assert!(!timer.is_running());
    assert_eq!(timer.completed_work_sessions(), 1);
}

#[test]
fn full_cycle_counts_one_session() {
    let mut timer = PhaseTimer::default();
    timer.start();
    run_ticks(&mut timer, 1500);
    timer.start();
    run_ticks(&mut timer, 300);

    assert_eq!(timer.phase(), Phase::Work);
    assert_eq!(timer.remaining_secs(), 1500);
    assert!(!timer.is_running());
    assert_eq!(timer.completed_work_sessions(), 2);
}

#[test]
fn pause_then_reset_rewinds_work() {
    let mut timer = PhaseTimer::default();
    timer.start();
    run_ticks(&mut timer, 10);
    timer.pause();
    timer.reset();

    assert_eq!(timer.remaining_secs(), 1500);
    assert_eq!(timer.phase(), Phase::Work);
    assert!(!timer.is_running());
}

#[test]
fn quarter_of_work_phase_elapsed() {
    let mut timer = PhaseTimer::default();
    timer.start();
    run_ticks(&mut timer, 375);

    assert_eq!(timer.elapsed_fraction(), 0.25);
    assert_eq!(timer.snapshot().progress_pct(), 25.0);
    assert_eq!(timer.snapshot().clock(), "18:45");
}

#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<&'static str>>>);

impl TimerObserver for EventLog {
    fn on_tick(&mut self, _phase: Phase, _remaining_secs: u64, _elapsed_fraction: f64) {
        self.0.lock().unwrap().push("tick");
    }
    fn on_phase_complete(&mut self, ended: Phase) {
        self.0.lock().unwrap().push(match ended {
            Phase::Work => "work complete",
            Phase::Break => "break complete",
        });
    }
    fn on_phase_changed(&mut self, phase: Phase, _duration_secs: u64) {
        self.0.lock().unwrap().push(match phase {
            Phase::Work => "now work",
            Phase::Break => "now break",
        });
    }
    fn on_running_changed(&mut self, running: bool) {
        self.0.lock().unwrap().push(if running { "running" } else { "idle" });
    }
    fn on_reset(&mut self, _phase: Phase, _remaining_secs: u64) {
        self.0.lock().unwrap().push("reset");
    }
}

#[test]
fn observers_see_every_transition_in_order() {
    let mut timer = PhaseTimer::new(Durations::new(2, 1).unwrap());
    let log = EventLog::default();
    timer.subscribe(Box::new(log.clone()));
    let second = EventLog::default();
    timer.subscribe(Box::new(second.clone()));

    timer.start();
    timer.start();
    run_ticks(&mut timer, 2);
    timer.start();
    run_ticks(&mut timer, 1);
    timer.reset();

    let expected = vec![
        "running",
        "tick",
        "tick",
        "idle",
        "work complete",
        "now break",
        "running",
        "tick",
        "idle",
        "break complete",
        "now work",
        "reset",
    ];
    assert_eq!(*log.0.lock().unwrap(), expected);
    assert_eq!(*second.0.lock().unwrap(), expected);
}

#[test]
fn command_events_match_observed_state() {
    let mut timer = PhaseTimer::new(Durations::new(60, 30).unwrap());

    match timer.start() {
        Some(Event::RunningChanged { running, .. }) => assert!(running),
        other => panic!("expected RunningChanged, got {other:?}"),
    }
    assert_eq!(timer.pause().map(|e| matches!(e, Event::RunningChanged { running: false, .. })), Some(true));
    assert!(timer.pause().is_none());
}

#[test]
fn timer_can_be_shared_behind_a_mutex() {
    let timer = Arc::new(Mutex::new(PhaseTimer::new(Durations::new(5, 5).unwrap())));
    timer.lock().unwrap().start();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let timer = Arc::clone(&timer);
            std::thread::spawn(move || {
                timer.lock().unwrap().tick();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let timer = timer.lock().unwrap();
    assert_eq!(timer.phase(), Phase::Break);
    assert_eq!(timer.remaining_secs(), 5);
}
