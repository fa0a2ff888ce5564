//! Outcome feedback: an append-only log of accepted/rejected diagnoses
//! plus a pure, time-decayed aggregation into a prior weight.
//!
//! Learning lives entirely in the log and the aggregation function.
//! Nothing in the graph or the correlation engine mutates in place when
//! feedback arrives; `weight_for` recomputes the decayed weight from the
//! records on every call, so results are reproducible from the log alone.
//!
//! Two backends implement [`FeedbackStore`]: [`MemoryFeedback`] for tests
//! and single-process use, and [`SqliteFeedback`] for durability across
//! restarts.

pub mod decay;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use error::FeedbackError;
pub use memory::MemoryFeedback;
pub use sqlite::SqliteFeedback;
pub use store::{FeedbackStore, Outcome};
