//! # Pomotick Core Library
//!
//! This library provides the core logic for the pomotick work/break timer.
//! The state machine knows nothing about screens, sounds or clocks; a host
//! delivers one `tick()` per second and subscribes collaborators to the
//! events the timer emits.
//!
//! ## Architecture
//!
//! - **Phase Timer**: A tick-driven state machine cycling between Work and
//!   Break, counting completed work sessions
//! - **Events**: Serializable records of every state change, delivered to
//!   [`TimerObserver`] subscribers and returned from commands
//! - **Storage**: TOML-based configuration and a SQLite history of
//!   completed phases
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Core timer state machine
//! - [`TimerObserver`]: Subscription interface for renderers and notifiers
//! - [`Database`]: Completed phase history and statistics
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use storage::{Config, Database, Stats};
pub use timer::{Durations, Phase, PhaseTimer, Snapshot, TimerObserver};
