//! Code entity nodes stored in the dependency graph.
//!
//! A [`CodeNode`] represents one trackable entity: a file, a function, a
//! module, or an API endpoint. Nodes carry a blake3 content hash so the
//! store can detect non-structural edits, and a degraded flag marking
//! subtrees whose last structural analysis failed (the prior structure is
//! retained, coverage is reduced).

use serde::{Deserialize, Serialize};

use crate::id::CodeNodeId;

/// The kind of code entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    File,
    Function,
    Module,
    ApiEndpoint,
}

impl NodeKind {
    /// Short tag used inside [`CodeNodeId`] strings and fingerprints.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Function => "fn",
            NodeKind::Module => "module",
            NodeKind::ApiEndpoint => "endpoint",
        }
    }
}

/// Source language of a file, used to pick the structural scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Unknown,
}

impl LanguageTag {
    /// Infers the language from a path's extension.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit('.').next() {
            Some("py") => LanguageTag::Python,
            Some("js") | Some("jsx") | Some("mjs") => LanguageTag::JavaScript,
            Some("ts") | Some("tsx") => LanguageTag::TypeScript,
            Some("rs") => LanguageTag::Rust,
            Some("go") => LanguageTag::Go,
            _ => LanguageTag::Unknown,
        }
    }
}

/// One entity in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeNode {
    /// Stable identifier, see [`CodeNodeId`] for the shape.
    pub id: CodeNodeId,
    /// Entity kind.
    pub kind: NodeKind,
    /// Repository-relative path of the backing file.
    pub path: String,
    /// Source language of the backing file.
    pub language: LanguageTag,
    /// Blake3 hash of the content this node was derived from (hex).
    pub content_hash: String,
    /// True when the last structural analysis of the backing file failed
    /// and this node reflects stale structure.
    pub degraded: bool,
}

impl CodeNode {
    /// Creates a file-level node for `path` with the given content hash.
    pub fn file(path: &str, content_hash: String) -> Self {
        CodeNode {
            id: CodeNodeId::file(path),
            kind: NodeKind::File,
            path: path.to_string(),
            language: LanguageTag::from_path(path),
            content_hash,
            degraded: false,
        }
    }

    /// Creates a function node for `symbol` defined in `path`.
    pub fn function(path: &str, symbol: &str, content_hash: String) -> Self {
        CodeNode {
            id: CodeNodeId::symbol(NodeKind::Function, path, symbol),
            kind: NodeKind::Function,
            path: path.to_string(),
            language: LanguageTag::from_path(path),
            content_hash,
            degraded: false,
        }
    }

    /// Returns the symbol name for symbol-level nodes, `None` for files.
    pub fn symbol(&self) -> Option<&str> {
        self.id.as_str().split("::").nth(1)
    }
}

/// Hashes file content with blake3, returned as a hex string.
pub fn content_hash(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}
