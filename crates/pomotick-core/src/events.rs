use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerObserver};

/// Every state change of the timer produces an Event.
/// Commands return them in emission order; subscribed observers receive
/// the same sequence through [`Event::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Tick {
        phase: Phase,
        remaining_secs: u64,
        elapsed_fraction: f64,
    },
    /// Emitted before the phase switches, carrying the phase that ended.
    PhaseCompleted {
        ended: Phase,
        completed_work_sessions: u32,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    RunningChanged {
        running: bool,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Route this event to the matching observer callback.
    pub fn dispatch(&self, observer: &mut dyn TimerObserver) {
        observer.on_event(self);
        match *self {
            Event::Tick {
                phase,
                remaining_secs,
                elapsed_fraction,
            } => observer.on_tick(phase, remaining_secs, elapsed_fraction),
            Event::PhaseCompleted { ended, .. } => observer.on_phase_complete(ended),
            Event::PhaseChanged {
                phase,
                duration_secs,
                ..
            } => observer.on_phase_changed(phase, duration_secs),
            Event::RunningChanged { running, .. } => observer.on_running_changed(running),
            Event::TimerReset {
                phase,
                remaining_secs,
                ..
            } => observer.on_reset(phase, remaining_secs),
        }
    }
}
