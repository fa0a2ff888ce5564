//! The correlation engine: failure signals plus a commit window in,
//! ranked fault hypotheses out.
//!
//! Scoring runs four independent evidence channels (structural
//! proximity, temporal recency, text similarity, historical feedback)
//! against a candidate set seeded from signal anchors and the commit
//! window, then combines them under configured weights. The engine is a
//! pure function of its inputs and the clock value it is handed: the
//! same snapshot, signals, window, and config always produce the same
//! diagnosis.

pub mod engine;
pub mod error;
pub mod score;
pub mod text;

pub use engine::{correlate, CorrelationRequest};
pub use error::CorrelateError;
pub use text::{TextScorer, TextUnavailable, TokenOverlap};
