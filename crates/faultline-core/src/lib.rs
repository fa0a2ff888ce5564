//! Core data model and dependency graph store for the faultline
//! root-cause correlation engine.
//!
//! This crate owns the shared vocabulary of the system: stable identifiers,
//! code nodes and structural edges, commit and build events, failure
//! signals, diagnoses, feedback fingerprints, and the engine configuration.
//! It also contains the [`graph::DependencyGraphStore`], the versioned
//! single-writer store of the repository's dependency graph.

pub mod config;
pub mod diagnosis;
pub mod edge;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod graph;
pub mod id;
pub mod node;
pub mod scan;
pub mod signal;

pub use config::{EngineConfig, ScoreWeights};
pub use diagnosis::{ChannelKind, Diagnosis, DiagnosisEntry, DiagnosisReason, Evidence};
pub use edge::{DepEdge, EdgeKind};
pub use error::{ConfigError, GraphError};
pub use event::{BuildEvent, ChangeKind, CommitEvent, FileChange, LineRange, Severity};
pub use fingerprint::Fingerprint;
pub use graph::{DependencyGraphStore, GraphSnapshot, MapSourceProvider, SourceProvider};
pub use id::{CodeNodeId, CommitId, EventId, GraphVersion, SignalId};
pub use node::{CodeNode, LanguageTag, NodeKind};
pub use signal::{FailureSignal, SignalKind};
