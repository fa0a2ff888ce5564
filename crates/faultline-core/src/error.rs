//! Error types for the core crate.
//!
//! [`GraphError`] covers graph store failure modes. Per-file structural
//! analysis failures are deliberately absent: they are recovered locally
//! inside `apply_commit` as degraded-node markers and never abort an
//! update.

use thiserror::Error;

use crate::id::{CodeNodeId, GraphVersion};

/// Errors produced by the dependency graph store.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The requested version number was never produced by this store.
    #[error("unknown graph version: {0}")]
    UnknownVersion(GraphVersion),

    /// The requested version existed but has been garbage-collected.
    /// Callers retry once against the latest version, then fail the task.
    #[error("stale graph snapshot: version {0} has been collected")]
    StaleSnapshot(GraphVersion),

    /// A node id was not present in the queried snapshot.
    #[error("node not found: {0}")]
    NodeNotFound(CodeNodeId),
}

/// Errors produced by configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A channel weight was negative or non-finite.
    #[error("channel weights must be finite and non-negative")]
    NegativeWeight,

    /// Channel weights do not sum to 1.0.
    #[error("channel weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    /// The evidence floor is outside [0, 1].
    #[error("evidence floor must be in [0, 1], got {floor}")]
    FloorOutOfRange { floor: f64 },

    /// top_k of zero would suppress all output.
    #[error("top_k must be at least 1")]
    ZeroTopK,

    /// A zero half-life makes every decay weight collapse.
    #[error("decay half-life must be non-zero")]
    ZeroHalfLife,

    /// A zero horizon would collect the latest version.
    #[error("version horizon must be at least 1")]
    ZeroHorizon,
}
