use chrono::Utc;
use pomotick_core::{Database, Durations, Phase, TimerObserver};

/// Writes every completed phase to the history database.
pub struct HistoryRecorder {
    db: Database,
    durations: Durations,
}

impl HistoryRecorder {
    pub fn new(db: Database, durations: Durations) -> Self {
        Self { db, durations }
    }
}

impl TimerObserver for HistoryRecorder {
    fn on_phase_complete(&mut self, ended: Phase) {
        let duration_secs = self.durations.of(ended);
        match self.db.record_phase(ended, duration_secs, Utc::now()) {
            Ok(id) => tracing::debug!(id, %ended, duration_secs, "phase recorded"),
            Err(e) => tracing::warn!(error = %e, %ended, "failed to record phase"),
        }
    }
}
