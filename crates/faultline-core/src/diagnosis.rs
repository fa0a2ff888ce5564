//! Ranked diagnosis output of the correlation engine.
//!
//! A [`Diagnosis`] is the engine's answer for one failure event: an
//! ordered list of candidate fault nodes with confidences and the evidence
//! that produced them. Diagnoses are immutable once emitted; a newer one
//! for the same event supersedes rather than overwrites.

use serde::{Deserialize, Serialize};

use crate::id::{CodeNodeId, CommitId, EventId, GraphVersion, SignalId};

/// An independent evidence channel that contributed to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Structural,
    Temporal,
    Textual,
    Feedback,
}

/// Evidence references attached to a diagnosis entry for explainability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Evidence {
    /// Signals that matched this candidate.
    #[serde(default)]
    pub signals: Vec<SignalId>,
    /// Commits in the window that touched this candidate.
    #[serde(default)]
    pub commits: Vec<CommitId>,
    /// Structural distance from the nearest anchored signal, when reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hops: Option<u32>,
    /// Channels that contributed a non-zero score.
    #[serde(default)]
    pub channels: Vec<ChannelKind>,
}

/// One ranked candidate fault location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    /// Candidate node.
    pub node: CodeNodeId,
    /// Combined confidence in [0, 1].
    pub confidence: f64,
    /// Supporting evidence references.
    pub evidence: Evidence,
}

/// Why a diagnosis carries no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosisReason {
    /// No anchors resolved and the commit window was empty. The engine
    /// refuses to guess.
    InsufficientEvidence,
}

/// The ranked output for one failure event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// The failure event this diagnosis answers.
    pub event_id: EventId,
    /// Graph version the correlation ran against.
    pub graph_version: GraphVersion,
    /// Ranked candidates, best first. May be empty.
    pub entries: Vec<DiagnosisEntry>,
    /// Set when the diagnosis is intentionally empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DiagnosisReason>,
    /// True when the correlation deadline expired and only fully-scored
    /// candidates are included.
    #[serde(default)]
    pub partial: bool,
    /// True when a scoring channel was unavailable and the remaining
    /// channel weights were renormalized.
    #[serde(default)]
    pub degraded: bool,
    /// Emission timestamp, epoch milliseconds.
    pub created_at_ms: u64,
}

impl Diagnosis {
    /// Builds the explicit empty diagnosis for insufficient evidence.
    pub fn insufficient_evidence(
        event_id: EventId,
        graph_version: GraphVersion,
        created_at_ms: u64,
    ) -> Self {
        Diagnosis {
            event_id,
            graph_version,
            entries: Vec::new(),
            reason: Some(DiagnosisReason::InsufficientEvidence),
            partial: false,
            degraded: false,
            created_at_ms,
        }
    }

    /// Returns the top-ranked candidate, if any.
    pub fn top(&self) -> Option<&DiagnosisEntry> {
        self.entries.first()
    }
}
