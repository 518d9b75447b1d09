//! Phase timer implementation.
//!
//! The timer is a tick-driven state machine. It does not use internal
//! threads or read the clock - the host calls `tick()` once per second
//! while the timer is running and stops doing so as soon as it goes idle.
//!
//! ## State Transitions
//!
//! ```text
//! Idle x Work  --start-->  Active x Work  --last tick-->  Idle x Break
//! Idle x Break --start-->  Active x Break --last tick-->  Idle x Work (+1 session)
//! ```
//!
//! `pause()` and `reset()` return an active timer to idle in the same phase.
//!
//! ## Usage
//!
//! ```
//! use pomotick_core::timer::{PhaseTimer, Phase};
//!
//! let mut timer = PhaseTimer::default();
//! timer.start();
//! let snap = timer.tick().unwrap();
//! assert_eq!(snap.phase, Phase::Work);
//! assert_eq!(snap.remaining_secs, 1499);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::observer::TimerObserver;
use super::phase::{Durations, Phase};
use crate::events::Event;

/// Point-in-time view of the timer, everything a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub duration_secs: u64,
    pub running: bool,
    pub completed_work_sessions: u32,
    /// 0.0 .. 1.0 progress within the current phase.
    pub elapsed_fraction: f64,
}

impl Snapshot {
    pub fn minutes(&self) -> u64 {
        self.remaining_secs / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining_secs % 60
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    /// 0.0 .. 100.0 progress within the current phase.
    pub fn progress_pct(&self) -> f64 {
        self.elapsed_fraction * 100.0
    }
}

/// Work/break countdown state machine.
///
/// Owned by the host for the lifetime of the process. All fields change
/// only through `start`, `pause`, `reset` and `tick`.
pub struct PhaseTimer {
    durations: Durations,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    completed_work_sessions: u32,
    observers: Vec<Box<dyn TimerObserver + Send>>,
}

impl PhaseTimer {
    /// Create an idle timer at the start of a Work phase.
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            phase: Phase::Work,
            remaining_secs: durations.work_secs(),
            running: false,
            completed_work_sessions: 1,
            observers: Vec::new(),
        }
    }

    /// Register a collaborator. Observers are notified in subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn TimerObserver + Send>) {
        self.observers.push(observer);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Full length of the current phase.
    pub fn duration_secs(&self) -> u64 {
        self.durations.of(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn elapsed_fraction(&self) -> f64 {
        let total = self.duration_secs();
        (total - self.remaining_secs) as f64 / total as f64
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs(),
            running: self.running,
            completed_work_sessions: self.completed_work_sessions,
            elapsed_fraction: self.elapsed_fraction(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin consuming ticks. Returns `None` if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(target: "pomotick::timer", phase = %self.phase, remaining = self.remaining_secs, "start");
        Some(self.emit(Event::RunningChanged {
            running: true,
            at: Utc::now(),
        }))
    }

    /// Stop consuming ticks, keeping the remaining time. Returns `None` if
    /// already idle.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(target: "pomotick::timer", phase = %self.phase, remaining = self.remaining_secs, "pause");
        Some(self.emit(Event::RunningChanged {
            running: false,
            at: Utc::now(),
        }))
    }

    /// Pause, then rewind the current phase to its full length.
    /// Phase and session count are untouched.
    pub fn reset(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        self.remaining_secs = self.duration_secs();
        tracing::debug!(target: "pomotick::timer", phase = %self.phase, "reset");
        events.push(self.emit(Event::TimerReset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }));
        events
    }

    /// Consume one second.
    ///
    /// Ignored while idle and returns `None`. Otherwise returns the state
    /// after the tick, which is already the next (idle) phase if this tick
    /// finished the current one. Unlike the commands, the events a tick
    /// produces (`Tick`, then the completion sequence) only reach observers.
    pub fn tick(&mut self) -> Option<Snapshot> {
        if !self.running {
            tracing::trace!(target: "pomotick::timer", "tick ignored while idle");
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.emit(Event::Tick {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            elapsed_fraction: self.elapsed_fraction(),
        });
        if self.remaining_secs == 0 {
            self.complete_phase();
        }
        Some(self.snapshot())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) {
        self.pause();
        let ended = self.phase;
        tracing::debug!(target: "pomotick::timer", %ended, sessions = self.completed_work_sessions, "phase complete");
        self.emit(Event::PhaseCompleted {
            ended,
            completed_work_sessions: self.completed_work_sessions,
            at: Utc::now(),
        });

        self.phase = ended.next();
        self.remaining_secs = self.duration_secs();
        if ended == Phase::Break {
            self.completed_work_sessions += 1;
        }
        self.emit(Event::PhaseChanged {
            phase: self.phase,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        });
    }

    fn emit(&mut self, event: Event) -> Event {
        for observer in &mut self.observers {
            event.dispatch(&mut **observer);
        }
        event
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

impl std::fmt::Debug for PhaseTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseTimer")
            .field("durations", &self.durations)
            .field("phase", &self.phase)
            .field("remaining_secs", &self.remaining_secs)
            .field("running", &self.running)
            .field("completed_work_sessions", &self.completed_work_sessions)
            .field("observers", &self.observers.len())
            .finish()
    }
}
