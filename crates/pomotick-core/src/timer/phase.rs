use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default Work phase length in seconds (25 minutes).
pub const DEFAULT_WORK_SECS: u64 = 25 * 60;
/// Default Break phase length in seconds (5 minutes).
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }

    /// Lowercase name, as stored in the session database.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "work" => Some(Phase::Work),
            "break" => Some(Phase::Break),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated phase lengths in seconds.
///
/// Both durations are non-zero, which keeps every timer operation total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    work_secs: u64,
    break_secs: u64,
}

impl Durations {
    /// # Errors
    /// Returns `ValidationError::InvalidValue` if either duration is zero.
    pub fn new(work_secs: u64, break_secs: u64) -> Result<Self, ValidationError> {
        if work_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "work_duration".into(),
                message: "must be at least one second".into(),
            });
        }
        if break_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "break_duration".into(),
                message: "must be at least one second".into(),
            });
        }
        Ok(Self {
            work_secs,
            break_secs,
        })
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    pub fn of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_secs: DEFAULT_WORK_SECS,
            break_secs: DEFAULT_BREAK_SECS,
        }
    }
}
