//! Stable identifier newtypes for graph entities and events.
//!
//! All IDs are distinct newtype wrappers, providing type safety so that a
//! `CommitId` cannot be accidentally used where a `SignalId` is expected.
//! `CodeNodeId` is the only identity that carries structure: it encodes the
//! node kind, path, and (for symbols) the symbol name, which is what keeps
//! it stable across versions for unchanged files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// Stable identifier for a code entity in the dependency graph.
///
/// Shaped as `"{kind}:{path}"` for file and module nodes and
/// `"{kind}:{path}::{symbol}"` for symbol nodes. Identifiers are stable
/// under non-structural edits; a rename mints a new id linked to the old
/// one by a `RenamedFrom` edge, never reusing the bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeNodeId(pub String);

impl CodeNodeId {
    /// Builds the id for a file-level node.
    pub fn file(path: &str) -> Self {
        CodeNodeId(format!("file:{path}"))
    }

    /// Builds the id for a module-level node.
    pub fn module(path: &str) -> Self {
        CodeNodeId(format!("module:{path}"))
    }

    /// Builds the id for a symbol defined in a file.
    pub fn symbol(kind: NodeKind, path: &str, symbol: &str) -> Self {
        CodeNodeId(format!("{}:{path}::{symbol}", kind.tag()))
    }

    /// Returns the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commit identity from the version control system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub String);

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an inbound CI failure event. Redeliveries carry the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic identity of a normalized failure signal.
///
/// Derived from the originating event, the signal kind, and the normalized
/// excerpt, so re-normalizing the same raw evidence yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(pub String);

impl SignalId {
    /// Derives the deterministic signal id for (event, kind tag, excerpt).
    pub fn derive(event: &EventId, kind_tag: &str, excerpt: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(event.0.as_bytes());
        hasher.update(b"|");
        hasher.update(kind_tag.as_bytes());
        hasher.update(b"|");
        hasher.update(excerpt.as_bytes());
        SignalId(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic version number of a graph snapshot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GraphVersion(pub u64);

impl fmt::Display for GraphVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
