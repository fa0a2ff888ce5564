//! Feedback fingerprints: stable hashes of (signal pattern, candidate
//! shape) pairs.
//!
//! A fingerprint identifies a recurring failure shape independent of the
//! incidental details of one occurrence: literal numbers, hex ids, and
//! exact file basenames are normalized away so that "the payment test
//! failing against a charge handler" aggregates across runs.
//!
//! Determinism rules match the content hashing in the graph store: fixed
//! field order, explicit separators, blake3.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// A stable feedback aggregation key (blake3 hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// Derives the fingerprint for a normalized signal pattern and a
    /// candidate node's kind and path shape.
    pub fn derive(pattern: &str, node_kind: NodeKind, path_shape: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(pattern.as_bytes());
        hasher.update(b"|");
        hasher.update(node_kind.tag().as_bytes());
        hasher.update(b"|");
        hasher.update(path_shape.as_bytes());
        Fingerprint(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a signal excerpt into a reusable pattern.
///
/// Lowercases, collapses whitespace, and masks volatile tokens: decimal
/// runs become `#`, long hex runs become `@`. Two occurrences of the same
/// failure differing only in line numbers or object ids normalize to the
/// same pattern.
pub fn normalize_pattern(excerpt: &str) -> String {
    static HEX_RE: OnceLock<Regex> = OnceLock::new();
    static NUM_RE: OnceLock<Regex> = OnceLock::new();
    static WS_RE: OnceLock<Regex> = OnceLock::new();

    let hex = HEX_RE.get_or_init(|| {
        Regex::new(r"0x[0-9a-f]+|\b[0-9a-f]{8,}\b").expect("invalid hex pattern")
    });
    let num = NUM_RE.get_or_init(|| Regex::new(r"\d+").expect("invalid digit pattern"));
    let ws = WS_RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));

    let lowered = excerpt.to_lowercase();
    let mut current = ws.replace_all(&lowered, " ").trim().to_string();
    // Masking digits can expose a fresh hex run at a new word boundary,
    // so iterate to a fixpoint. Converges fast: every pass only shrinks.
    loop {
        let masked = hex.replace_all(&current, "@");
        let masked = num.replace_all(&masked, "#");
        if masked == current {
            return current;
        }
        current = masked.into_owned();
    }
}

/// Reduces a path to its shape: directory components plus the extension,
/// with the basename stemmed to `*`.
///
/// `payments/charge.go` and `payments/refund.go` share the shape
/// `payments/*.go`, so feedback learned on one transfers to siblings with
/// the same role.
pub fn path_shape(path: &str) -> String {
    let (dir, base) = match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    };
    let ext = base.rfind('.').map(|i| &base[i..]).unwrap_or("");
    if dir.is_empty() {
        format!("*{ext}")
    } else {
        format!("{dir}/*{ext}")
    }
}
