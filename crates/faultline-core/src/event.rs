//! Inbound event types: commit events from version control and build
//! events from CI job completions.
//!
//! Both streams are append-only with at-least-once delivery; consumers
//! dedupe by event id. Events are immutable once recorded.

use serde::{Deserialize, Serialize};

use crate::id::{CommitId, EventId};

/// A touched line range within a file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// How a path changed in a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed {
        /// Previous path of the file.
        from: String,
    },
}

/// One path touched by a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    /// Repository-relative path after the change.
    pub path: String,
    /// What happened to the path.
    pub change: ChangeKind,
    /// Line ranges touched, when the VCS provides them.
    #[serde(default)]
    pub lines: Vec<LineRange>,
}

/// A commit observed on the repository, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitEvent {
    /// Commit identity; redeliveries carry the same id.
    pub id: CommitId,
    /// Parent commit ids.
    #[serde(default)]
    pub parents: Vec<CommitId>,
    /// Commit author.
    pub author: String,
    /// Commit timestamp, epoch milliseconds.
    pub timestamp_ms: u64,
    /// Ordered list of touched paths.
    pub changes: Vec<FileChange>,
}

impl CommitEvent {
    /// Returns the paths touched by this commit, in change order.
    pub fn touched_paths(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.path.as_str())
    }
}

/// Severity attached to a normalized failure signal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// A CI job completion carrying raw failure evidence.
///
/// This is the raw input to the signal normalizer: the log text plus
/// whatever structured hints the CI system provides (failing test ids,
/// changed files). At-least-once delivery is tolerated because
/// normalization is idempotent and a newer event for the same job key
/// supersedes in-flight work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildEvent {
    /// Failure event identity; redeliveries carry the same id.
    pub event_id: EventId,
    /// Stable key of the CI job (repo + workflow + job). Retries of the
    /// same job share this key and supersede each other.
    pub job_key: String,
    /// Head commit of the failed build, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitId>,
    /// Raw log payload of the failed job.
    pub raw_log: String,
    /// Failing test identifiers reported by the CI system.
    #[serde(default)]
    pub failing_tests: Vec<String>,
    /// Changed files reported alongside the failure.
    #[serde(default)]
    pub changed_files: Vec<String>,
    /// Event timestamp, epoch milliseconds.
    pub timestamp_ms: u64,
}
