//! Normalized failure signals.
//!
//! A [`FailureSignal`] is one piece of evidence extracted from raw CI
//! output: a stack frame, a matched log pattern, a failing test id, or a
//! lint error. Signals are produced once per failure event and never
//! mutated. Their ids are content-derived, so re-normalizing the same raw
//! evidence after a crash yields identical signals instead of duplicates.

use serde::{Deserialize, Serialize};

use crate::event::Severity;
use crate::id::{CodeNodeId, EventId, SignalId};

/// The kind of evidence a signal carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    StackFrame,
    LogPattern,
    FailingTest,
    LintError,
}

impl SignalKind {
    /// Short tag used in signal id derivation and fingerprints.
    pub fn tag(&self) -> &'static str {
        match self {
            SignalKind::StackFrame => "stack-frame",
            SignalKind::LogPattern => "log-pattern",
            SignalKind::FailingTest => "failing-test",
            SignalKind::LintError => "lint-error",
        }
    }
}

/// One normalized piece of failure evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureSignal {
    /// Deterministic identity, derived from event id, kind, and excerpt.
    pub id: SignalId,
    /// Evidence kind.
    pub kind: SignalKind,
    /// Resolved graph anchor, when path/symbol matching succeeded.
    /// Unresolved signals keep `None` and still contribute to
    /// pattern-based scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<CodeNodeId>,
    /// Raw text excerpt the signal was extracted from.
    pub excerpt: String,
    /// Severity assigned by the normalizer.
    pub severity: Severity,
}

impl FailureSignal {
    /// Builds a signal with its deterministic id.
    pub fn new(
        event: &EventId,
        kind: SignalKind,
        anchor: Option<CodeNodeId>,
        excerpt: String,
        severity: Severity,
    ) -> Self {
        let id = SignalId::derive(event, kind.tag(), &excerpt);
        FailureSignal {
            id,
            kind,
            anchor,
            excerpt,
            severity,
        }
    }

    /// Returns `true` when the signal resolved to a graph node.
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }
}
