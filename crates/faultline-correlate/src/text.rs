//! Text similarity as a capability interface.
//!
//! The engine depends on [`TextScorer`] abstractly: any backend that
//! maps two strings to a similarity in [0, 1] satisfies it, from the
//! built-in token overlap to an external embedding service. Backends
//! signal outage through [`TextUnavailable`]; the engine then drops the
//! text channel for the run instead of failing the diagnosis.

use std::collections::BTreeSet;

use thiserror::Error;

/// The text similarity backend cannot serve scores right now.
#[derive(Debug, Error)]
#[error("text similarity backend unavailable")]
pub struct TextUnavailable;

/// Scores how similar two strings are, in [0, 1].
pub trait TextScorer: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, TextUnavailable>;
}

/// Built-in scorer: overlap coefficient over lowercase alphanumeric
/// tokens. `|A ∩ B| / min(|A|, |B|)`, so a short identifier fully
/// contained in a long excerpt scores 1.0.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenOverlap;

impl TokenOverlap {
    fn tokens(text: &str) -> BTreeSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }
}

impl TextScorer for TokenOverlap {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, TextUnavailable> {
        let a = Self::tokens(a);
        let b = Self::tokens(b);
        let smaller = a.len().min(b.len());
        if smaller == 0 {
            return Ok(0.0);
        }
        let shared = a.intersection(&b).count();
        Ok(shared as f64 / smaller as f64)
    }
}
