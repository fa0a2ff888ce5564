//! Engine configuration: scoring weights and traversal/runtime limits.
//!
//! Everything here is externally settable without code change: binaries
//! read overrides from the environment and the HTTP server exposes the
//! whole struct through its config endpoints. Validation happens once at
//! the boundary; the correlation engine assumes a validated config.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Relative weights of the four evidence channels. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub structural: f64,
    pub temporal: f64,
    pub text: f64,
    pub feedback: f64,
}

impl ScoreWeights {
    /// Validates that weights are non-negative and sum to 1.0 (within a
    /// small tolerance for decimal literals).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parts = [self.structural, self.temporal, self.text, self.feedback];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::NegativeWeight);
        }
        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            structural: 0.3,
            temporal: 0.3,
            text: 0.25,
            feedback: 0.15,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evidence channel weights.
    pub weights: ScoreWeights,
    /// Neighborhood expansion bound around anchored signals.
    pub max_hops: u32,
    /// Maximum number of diagnosis entries emitted.
    pub top_k: usize,
    /// Minimum combined score for a candidate to appear in output.
    pub evidence_floor: f64,
    /// Half-life of temporal recency and feedback decay, milliseconds.
    pub decay_half_life_ms: u64,
    /// Wall-clock budget of one correlation task, milliseconds.
    pub correlation_timeout_ms: u64,
    /// How many graph versions the store retains before collection.
    pub version_horizon: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            weights: ScoreWeights::default(),
            max_hops: 2,
            top_k: 5,
            evidence_floor: 0.05,
            decay_half_life_ms: 14 * 24 * 60 * 60 * 1000,
            correlation_timeout_ms: 5_000,
            version_horizon: 64,
        }
    }
}

impl EngineConfig {
    /// Validates weights and limit fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if !(0.0..=1.0).contains(&self.evidence_floor) {
            return Err(ConfigError::FloorOutOfRange {
                floor: self.evidence_floor,
            });
        }
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.decay_half_life_ms == 0 {
            return Err(ConfigError::ZeroHalfLife);
        }
        if self.version_horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        Ok(())
    }
}
