//! In-memory feedback backend for tests and single-process runs.

use dashmap::DashMap;
use faultline_core::Fingerprint;

use crate::decay::decayed_weight;
use crate::error::FeedbackError;
use crate::store::{FeedbackStore, Outcome};

/// Append-only outcome log held in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryFeedback {
    records: DashMap<Fingerprint, Vec<(Outcome, u64)>>,
}

impl MemoryFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of observations recorded for a fingerprint.
    pub fn observation_count(&self, fingerprint: &Fingerprint) -> usize {
        self.records.get(fingerprint).map_or(0, |r| r.len())
    }
}

impl FeedbackStore for MemoryFeedback {
    fn record(
        &self,
        fingerprint: &Fingerprint,
        outcome: Outcome,
        timestamp_ms: u64,
    ) -> Result<(), FeedbackError> {
        self.records
            .entry(fingerprint.clone())
            .or_default()
            .push((outcome, timestamp_ms));
        Ok(())
    }

    fn weight_for(
        &self,
        fingerprint: &Fingerprint,
        now_ms: u64,
        half_life_ms: u64,
    ) -> Result<f64, FeedbackError> {
        let observations = self
            .records
            .get(fingerprint)
            .map(|r| r.clone())
            .unwrap_or_default();
        Ok(decayed_weight(observations, now_ms, half_life_ms))
    }
}
