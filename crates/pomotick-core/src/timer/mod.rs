mod engine;
mod observer;
mod phase;

pub use engine::{PhaseTimer, Snapshot};
pub use observer::TimerObserver;
pub use phase::{Durations, Phase, DEFAULT_BREAK_SECS, DEFAULT_WORK_SECS};
