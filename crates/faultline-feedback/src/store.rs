//! The feedback store contract and outcome type.

use faultline_core::Fingerprint;
use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;

/// Developer verdict on an emitted diagnosis entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    /// Tag stored in the durable backend.
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
        }
    }

    /// Parses a stored tag; unknown tags count as rejections rather than
    /// corrupting the aggregate upward.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "accepted" => Outcome::Accepted,
            _ => Outcome::Rejected,
        }
    }
}

/// Append-only outcome log keyed by failure fingerprint.
///
/// `record` never overwrites: every call appends one observation.
/// `weight_for` is a pure function of the log contents, the clock, and
/// the half-life; with no history it returns the neutral weight 0.5.
pub trait FeedbackStore: Send + Sync {
    /// Appends one outcome observation for a fingerprint.
    fn record(
        &self,
        fingerprint: &Fingerprint,
        outcome: Outcome,
        timestamp_ms: u64,
    ) -> Result<(), FeedbackError>;

    /// Returns the decayed acceptance weight in [0, 1] for a fingerprint.
    fn weight_for(
        &self,
        fingerprint: &Fingerprint,
        now_ms: u64,
        half_life_ms: u64,
    ) -> Result<f64, FeedbackError>;
}
