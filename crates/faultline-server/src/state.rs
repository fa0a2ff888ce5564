//! Shared application state for the HTTP server.
//!
//! The graph store sits behind `Arc<tokio::sync::RwLock<>>`: commit
//! ingestion takes the write lock briefly to produce a new snapshot,
//! while correlation workers only ever take the read lock long enough
//! to clone an `Arc<GraphSnapshot>` handle. Everything a worker touches
//! after that is immutable or internally synchronized, so concurrent
//! correlations proceed without blocking each other or the writer.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, RwLock};

use faultline_core::graph::DependencyGraphStore;
use faultline_core::{CommitEvent, Diagnosis, EngineConfig};
use faultline_correlate::{TextScorer, TokenOverlap};
use faultline_feedback::{FeedbackStore, MemoryFeedback, SqliteFeedback};
use faultline_signal::LogPatterns;

use crate::error::ApiError;
use crate::schema::GraphChanged;

/// Shared state handed to every handler and worker.
#[derive(Clone)]
pub struct AppState {
    /// Versioned graph store; single writer, snapshot-handle readers.
    pub graph: Arc<RwLock<DependencyGraphStore>>,
    /// Recent commits, newest last, bounded by the version horizon.
    pub commits: Arc<RwLock<VecDeque<CommitEvent>>>,
    /// Outcome feedback log.
    pub feedback: Arc<dyn FeedbackStore>,
    /// Runtime-settable engine configuration.
    pub config: Arc<RwLock<EngineConfig>>,
    /// Compiled log pattern tables, shared by all workers.
    pub patterns: Arc<LogPatterns>,
    /// Text similarity backend.
    pub scorer: Arc<dyn TextScorer>,
    /// Latest correlation generation per CI job key.
    pub generations: Arc<DashMap<String, u64>>,
    /// Latest published diagnosis per failure event id.
    pub diagnoses: Arc<DashMap<String, Diagnosis>>,
    /// Graph change notifications for interested subscribers.
    pub graph_events: broadcast::Sender<GraphChanged>,
}

impl AppState {
    /// Creates state with feedback persisted at the given SQLite path.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let feedback = SqliteFeedback::open(db_path)?;
        Ok(Self::with_feedback(Arc::new(feedback)))
    }

    /// Creates state with an in-memory feedback log (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        Ok(Self::with_feedback(Arc::new(MemoryFeedback::new())))
    }

    fn with_feedback(feedback: Arc<dyn FeedbackStore>) -> Self {
        let config = EngineConfig::default();
        let (graph_events, _) = broadcast::channel(64);
        AppState {
            graph: Arc::new(RwLock::new(DependencyGraphStore::new(
                config.version_horizon,
            ))),
            commits: Arc::new(RwLock::new(VecDeque::new())),
            feedback,
            config: Arc::new(RwLock::new(config)),
            patterns: Arc::new(LogPatterns::new()),
            scorer: Arc::new(TokenOverlap),
            generations: Arc::new(DashMap::new()),
            diagnoses: Arc::new(DashMap::new()),
            graph_events,
        }
    }
}
