//! Pure time-decayed aggregation of outcome observations.
//!
//! Each observation contributes `0.5 ^ (age / half_life)`: a fresh
//! observation counts fully, one exactly one half-life old counts half.
//! The aggregate is a smoothed acceptance ratio anchored at a neutral
//! prior, so a single early acceptance cannot swing the weight to 1.0
//! and an empty history sits exactly at 0.5.

use crate::store::Outcome;

/// Strength of the neutral prior, in pseudo-observations.
pub const PRIOR_STRENGTH: f64 = 2.0;

/// Weight returned when no history exists.
pub const NEUTRAL_WEIGHT: f64 = 0.5;

/// Aggregates `(outcome, timestamp_ms)` observations into a weight in
/// [0, 1] as seen at `now_ms`.
pub fn decayed_weight<I>(observations: I, now_ms: u64, half_life_ms: u64) -> f64
where
    I: IntoIterator<Item = (Outcome, u64)>,
{
    let mut accepted = 0.0_f64;
    let mut total = 0.0_f64;
    for (outcome, timestamp_ms) in observations {
        let age = now_ms.saturating_sub(timestamp_ms) as f64;
        let decay = 0.5_f64.powf(age / half_life_ms as f64);
        total += decay;
        if outcome == Outcome::Accepted {
            accepted += decay;
        }
    }
    (PRIOR_STRENGTH * NEUTRAL_WEIGHT + accepted) / (PRIOR_STRENGTH + total)
}
