//! Request and response bodies for the HTTP API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use faultline_core::{CommitEvent, CommitId, EventId, GraphVersion};
use faultline_feedback::Outcome;

/// `POST /events/commit` body: the commit plus the post-change contents
/// of its touched files. Files missing from `sources` degrade locally.
#[derive(Debug, Deserialize)]
pub struct CommitIngest {
    pub commit: CommitEvent,
    #[serde(default)]
    pub sources: HashMap<String, String>,
}

/// `POST /events/commit` response.
#[derive(Debug, Serialize)]
pub struct CommitApplied {
    pub version: GraphVersion,
    pub node_count: usize,
    pub degraded_nodes: usize,
}

/// `POST /events/build` response: the event was accepted and a worker
/// spawned. `generation` identifies the run; a retry of the same job key
/// gets a higher generation and supersedes this one.
#[derive(Debug, Serialize)]
pub struct BuildAccepted {
    pub event_id: EventId,
    pub generation: u64,
}

/// One outcome observation in a `POST /feedback` body.
#[derive(Debug, Deserialize)]
pub struct FeedbackItem {
    pub fingerprint: String,
    pub outcome: Outcome,
    /// Defaults to the server clock when omitted.
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
}

/// `POST /feedback` body. Feedback may arrive with arbitrary delay.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub items: Vec<FeedbackItem>,
}

/// `POST /feedback` response.
#[derive(Debug, Serialize)]
pub struct FeedbackRecorded {
    pub recorded: usize,
}

/// `GET /graph/version` response.
#[derive(Debug, Serialize)]
pub struct GraphVersionInfo {
    pub version: GraphVersion,
    pub node_count: usize,
    pub degraded_nodes: usize,
}

/// Broadcast on the graph-events channel after each applied commit.
#[derive(Debug, Clone, Serialize)]
pub struct GraphChanged {
    pub version: GraphVersion,
    pub commit_id: CommitId,
}
