//! HTTP/JSON service for the faultline correlation engine.
//!
//! The server owns the shared dependency graph store, the feedback log,
//! and the runtime configuration. Commit events mutate the graph behind
//! a single async write lock; build events each get their own tokio
//! worker that normalizes, correlates against an immutable snapshot,
//! and publishes a diagnosis. Workers never block each other and a
//! retried CI job supersedes the in-flight run for the same job key.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
pub mod worker;
