//! Error type for feedback store operations.

use thiserror::Error;

/// Errors from recording or aggregating feedback.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// SQLite error from the durable backend.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Schema migration failed while opening the database.
    #[error("migration error: {0}")]
    Migration(String),
}
