//! Per-channel scoring math and weight renormalization.

use faultline_core::ScoreWeights;

/// Structural proximity: 1 at the anchor, halving-like falloff per hop.
pub fn structural(hops: u32) -> f64 {
    1.0 / (1.0 + hops as f64)
}

/// Temporal recency: exponential decay with the configured half-life.
/// A commit exactly one half-life old scores 0.5.
pub fn recency(age_ms: u64, half_life_ms: u64) -> f64 {
    0.5_f64.powf(age_ms as f64 / half_life_ms as f64)
}

/// Proximity factor of a commit-touched path to a candidate's path:
/// the exact file counts fully, a sibling in the same directory half.
pub fn touch_factor(touched: &str, candidate: &str) -> f64 {
    if touched == candidate {
        1.0
    } else if parent_dir(touched) == parent_dir(candidate) {
        0.5
    } else {
        0.0
    }
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

/// Which evidence channels can score at all in this run.
#[derive(Debug, Clone, Copy)]
pub struct ChannelAvailability {
    pub structural: bool,
    pub temporal: bool,
    pub text: bool,
    pub feedback: bool,
}

impl ChannelAvailability {
    /// Renormalizes the configured weights over the available channels
    /// so they still sum to 1.0. Unavailable channels get weight 0; if
    /// nothing is available every weight is 0.
    pub fn effective_weights(&self, weights: &ScoreWeights) -> ScoreWeights {
        let masked = ScoreWeights {
            structural: if self.structural { weights.structural } else { 0.0 },
            temporal: if self.temporal { weights.temporal } else { 0.0 },
            text: if self.text { weights.text } else { 0.0 },
            feedback: if self.feedback { weights.feedback } else { 0.0 },
        };
        let sum = masked.structural + masked.temporal + masked.text + masked.feedback;
        if sum <= 0.0 {
            return ScoreWeights {
                structural: 0.0,
                temporal: 0.0,
                text: 0.0,
                feedback: 0.0,
            };
        }
        ScoreWeights {
            structural: masked.structural / sum,
            temporal: masked.temporal / sum,
            text: masked.text / sum,
            feedback: masked.feedback / sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_falls_off_with_hops() {
        assert_eq!(structural(0), 1.0);
        assert_eq!(structural(1), 0.5);
        assert!((structural(2) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn recency_halves_per_half_life() {
        assert_eq!(recency(0, 1_000), 1.0);
        assert!((recency(1_000, 1_000) - 0.5).abs() < 1e-9);
        assert!((recency(2_000, 1_000) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn touch_factor_exact_sibling_unrelated() {
        assert_eq!(touch_factor("pay/a.py", "pay/a.py"), 1.0);
        assert_eq!(touch_factor("pay/a.py", "pay/b.py"), 0.5);
        assert_eq!(touch_factor("pay/a.py", "web/b.py"), 0.0);
        assert_eq!(touch_factor("root.py", "other.py"), 0.5);
    }

    #[test]
    fn renormalization_preserves_unit_sum() {
        let availability = ChannelAvailability {
            structural: false,
            temporal: true,
            text: true,
            feedback: true,
        };
        let w = availability.effective_weights(&ScoreWeights::default());
        assert_eq!(w.structural, 0.0);
        let sum = w.temporal + w.text + w.feedback;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((w.temporal - 0.3 / 0.7).abs() < 1e-9);
    }

    #[test]
    fn all_channels_out_means_zero_weights() {
        let availability = ChannelAvailability {
            structural: false,
            temporal: false,
            text: false,
            feedback: false,
        };
        let w = availability.effective_weights(&ScoreWeights::default());
        assert_eq!(w.structural + w.temporal + w.text + w.feedback, 0.0);
    }
}
