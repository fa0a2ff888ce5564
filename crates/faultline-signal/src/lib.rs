//! Signal normalization: raw CI failure evidence in, uniform
//! [`FailureSignal`](faultline_core::FailureSignal) records out.
//!
//! The normalizer is deterministic and side-effect free: the same raw
//! evidence always produces the same signals with the same ids, so
//! re-processing a redelivered or crash-recovered event cannot duplicate
//! evidence. Anchor resolution against the graph snapshot is best-effort;
//! unresolved signals are kept (they still feed text-based scoring).

pub mod normalize;
pub mod patterns;

pub use normalize::{failure_summary, normalize};
pub use patterns::{ErrorKind, LogPatterns};
