//! SQLite-backed feedback log, durable across restarts.
//!
//! The log is append-only: `record` inserts one row, nothing ever
//! updates or deletes. Aggregation reads the rows for a fingerprint and
//! feeds them through the same pure decay function the in-memory
//! backend uses, so both backends agree bit for bit.

use std::sync::Mutex;

use rusqlite::{params, Connection};

use faultline_core::Fingerprint;

use crate::decay::decayed_weight;
use crate::error::FeedbackError;
use crate::store::{FeedbackStore, Outcome};

/// Durable feedback backend over a single SQLite connection.
pub struct SqliteFeedback {
    conn: Mutex<Connection>,
}

impl SqliteFeedback {
    /// Opens (or creates) the feedback database at `path`.
    pub fn open(path: &str) -> Result<Self, FeedbackError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteFeedback {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, FeedbackError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteFeedback {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // Connection access is short and never panics while held.
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl FeedbackStore for SqliteFeedback {
    fn record(
        &self,
        fingerprint: &Fingerprint,
        outcome: Outcome,
        timestamp_ms: u64,
    ) -> Result<(), FeedbackError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO outcomes (fingerprint, outcome, timestamp_ms) VALUES (?1, ?2, ?3)",
            params![fingerprint.0, outcome.tag(), timestamp_ms as i64],
        )?;
        Ok(())
    }

    fn weight_for(
        &self,
        fingerprint: &Fingerprint,
        now_ms: u64,
        half_life_ms: u64,
    ) -> Result<f64, FeedbackError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT outcome, timestamp_ms FROM outcomes WHERE fingerprint = ?1",
        )?;
        let rows = stmt.query_map(params![fingerprint.0], |row| {
            let tag: String = row.get(0)?;
            let timestamp: i64 = row.get(1)?;
            Ok((Outcome::from_tag(&tag), timestamp as u64))
        })?;
        let observations: Vec<(Outcome, u64)> = rows.collect::<Result<_, _>>()?;
        Ok(decayed_weight(observations, now_ms, half_life_ms))
    }
}
