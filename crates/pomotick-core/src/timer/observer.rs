//! Subscription interface for timer collaborators.
//!
//! Renderers, notifiers and history recorders implement [`TimerObserver`]
//! and are handed to [`PhaseTimer::subscribe`](super::PhaseTimer::subscribe).
//! They only ever see state; changing it goes through the timer's commands.

use super::Phase;
use crate::events::Event;

pub trait TimerObserver {
    /// Every event, before the specific callback below is invoked.
    fn on_event(&mut self, _event: &Event) {}

    /// One second elapsed in a running phase.
    fn on_tick(&mut self, _phase: Phase, _remaining_secs: u64, _elapsed_fraction: f64) {}

    /// A phase ran out. Called before the timer switches to the next phase,
    /// so this is where alerts and sounds belong.
    fn on_phase_complete(&mut self, _ended: Phase) {}

    /// The timer switched to `phase`, whose full length is `duration_secs`.
    fn on_phase_changed(&mut self, _phase: Phase, _duration_secs: u64) {}

    fn on_running_changed(&mut self, _running: bool) {}

    fn on_reset(&mut self, _phase: Phase, _remaining_secs: u64) {}
}
