//! Structural edges of the dependency graph.
//!
//! The graph is a directed multigraph: several edge kinds may coexist
//! between the same pair of nodes (a file can both import and test another
//! file). Edges may carry a weight (call frequency) when the analyzer can
//! provide one.

use serde::{Deserialize, Serialize};

/// The structural relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Source file imports the target file/module.
    Imports,
    /// Source function calls the target function.
    Calls,
    /// Source file defines the target symbol.
    Defines,
    /// Source (test) file exercises the target file.
    Tests,
    /// Source node is the rename successor of the target node.
    RenamedFrom,
}

impl EdgeKind {
    /// Returns `true` for edges that carry structural fault propagation.
    ///
    /// `RenamedFrom` is lineage metadata, not a dependency, so default
    /// neighborhood traversals exclude it.
    pub fn is_structural(&self) -> bool {
        !matches!(self, EdgeKind::RenamedFrom)
    }

    /// The default kinds used by correlation neighborhood queries.
    pub fn structural_kinds() -> [EdgeKind; 4] {
        [
            EdgeKind::Imports,
            EdgeKind::Calls,
            EdgeKind::Defines,
            EdgeKind::Tests,
        ]
    }
}

/// Edge payload: a kind plus an optional observed weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepEdge {
    /// Relationship kind.
    pub kind: EdgeKind,
    /// Optional weight (e.g. call frequency), when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl DepEdge {
    /// Creates an unweighted edge of the given kind.
    pub fn new(kind: EdgeKind) -> Self {
        DepEdge { kind, weight: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_from_is_not_structural() {
        assert!(!EdgeKind::RenamedFrom.is_structural());
        assert!(EdgeKind::Imports.is_structural());
        assert!(EdgeKind::Calls.is_structural());
    }

    #[test]
    fn structural_kinds_excludes_lineage() {
        assert!(!EdgeKind::structural_kinds().contains(&EdgeKind::RenamedFrom));
        assert_eq!(EdgeKind::structural_kinds().len(), 4);
    }

    #[test]
    fn serde_roundtrip() {
        let edge = DepEdge {
            kind: EdgeKind::Calls,
            weight: Some(3.0),
        };
        let json = serde_json::to_string(&edge).unwrap();
        let back: DepEdge = serde_json::from_str(&json).unwrap();
        assert_eq!(edge, back);
    }

    #[test]
    fn weightless_edge_omits_field() {
        let json = serde_json::to_string(&DepEdge::new(EdgeKind::Imports)).unwrap();
        assert!(!json.contains("weight"));
    }
}
