//! SQLite-based history of completed phases.
//!
//! Provides persistent storage for:
//! - Completed Work and Break phases
//! - Session statistics (daily and all-time)
//! - Per-day completed work session counts

use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::timer::Phase;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Stats {
    pub work_sessions: u64,
    pub work_secs: u64,
    pub break_sessions: u64,
    pub break_secs: u64,
}

/// Completed work sessions on one local calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub work_sessions: u64,
}

/// SQLite database for phase history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pomotick/pomotick.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("pomotick.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS phases (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                phase         TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                completed_at  TEXT NOT NULL,
                local_day     TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_phases_local_day ON phases(local_day);
            CREATE INDEX IF NOT EXISTS idx_phases_phase_day ON phases(phase, local_day);",
        )?;
        Ok(())
    }

    /// Record a completed phase.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_phase(
        &self,
        phase: Phase,
        duration_secs: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let local_day = completed_at.with_timezone(&Local).date_naive();
        self.conn.execute(
            "INSERT INTO phases (phase, duration_secs, completed_at, local_day)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                phase.as_str(),
                duration_secs,
                completed_at.to_rfc3339(),
                local_day.to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn stats_today(&self) -> Result<Stats, DatabaseError> {
        let today = Local::now().date_naive().to_string();
        let mut stmt = self.conn.prepare(
            "SELECT phase, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM phases
             WHERE local_day = ?1
             GROUP BY phase",
        )?;
        let rows = stmt.query_map(params![today], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;
        Self::fold_stats(rows)
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT phase, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM phases
             GROUP BY phase",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;
        Self::fold_stats(rows)
    }

    /// Completed work sessions per local day, newest first.
    pub fn daily_work_sessions(&self, limit: u32) -> Result<Vec<DailyCount>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT local_day, COUNT(*)
             FROM phases
             WHERE phase = 'work'
             GROUP BY local_day
             ORDER BY local_day DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        let mut days = Vec::new();
        for row in rows {
            let (day, work_sessions) = row?;
            let day = day
                .parse::<NaiveDate>()
                .map_err(|e| DatabaseError::QueryFailed(format!("bad day '{day}': {e}")))?;
            days.push(DailyCount { day, work_sessions });
        }
        Ok(days)
    }

    fn fold_stats(
        rows: impl Iterator<Item = rusqlite::Result<(String, u64, u64)>>,
    ) -> Result<Stats, DatabaseError> {
        let mut stats = Stats::default();
        for row in rows {
            let (phase, count, secs) = row?;
            match Phase::parse(&phase) {
                Some(Phase::Work) => {
                    stats.work_sessions += count;
                    stats.work_secs += secs;
                }
                Some(Phase::Break) => {
                    stats.break_sessions += count;
                    stats.break_secs += secs;
                }
                None => tracing::warn!(%phase, "skipping unknown phase in history"),
            }
        }
        Ok(stats)
    }
}
