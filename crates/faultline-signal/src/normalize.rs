//! The normalization pass: raw build evidence to failure signals.

use indexmap::IndexMap;

use faultline_core::graph::GraphSnapshot;
use faultline_core::{
    BuildEvent, CodeNodeId, FailureSignal, Severity, SignalId, SignalKind,
};

use crate::patterns::LogPatterns;

/// How far past an error line we look for its stack trace.
const FRAME_LOOKAHEAD: usize = 20;

/// Converts raw build evidence into a deterministic, deduplicated set of
/// failure signals, anchored to graph nodes where resolution succeeds.
///
/// Idempotent: normalizing the same event twice yields identical signals
/// in identical order, because signal ids are content-derived and
/// deduplication keeps first-discovery order.
pub fn normalize(
    patterns: &LogPatterns,
    event: &BuildEvent,
    view: &GraphSnapshot,
) -> Vec<FailureSignal> {
    let mut signals: IndexMap<SignalId, FailureSignal> = IndexMap::new();
    let mut push = |signal: FailureSignal| {
        signals.entry(signal.id.clone()).or_insert(signal);
    };

    let lines: Vec<&str> = event.raw_log.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let Some(kind) = patterns.match_error(line) else {
            continue;
        };

        // A FAILED line is a failing-test signal, anchored to the test.
        if let Some((path, test)) = patterns.match_failed_test(line) {
            push(failing_test_signal(event, view, path, test));
            continue;
        }

        let signal_kind = if kind.is_lint() {
            SignalKind::LintError
        } else {
            SignalKind::LogPattern
        };
        push(FailureSignal::new(
            &event.event_id,
            signal_kind,
            None,
            line.trim().to_string(),
            kind.severity(),
        ));

        // Look ahead for the stack trace under this error line.
        for follow in lines.iter().skip(i + 1).take(FRAME_LOOKAHEAD) {
            if follow.trim().is_empty() || patterns.match_error(follow).is_some() {
                break;
            }
            let Some(frame) = patterns.match_frame(follow) else {
                continue;
            };
            let anchor = resolve_frame_anchor(view, &frame.file, frame.symbol.as_deref());
            push(FailureSignal::new(
                &event.event_id,
                SignalKind::StackFrame,
                anchor,
                follow.trim().to_string(),
                kind.severity(),
            ));
        }
    }

    // Structured failing-test ids reported by the CI system.
    for test_id in &event.failing_tests {
        let (path, test) = match test_id.split_once("::") {
            Some((path, test)) => (path, test),
            None => ("", test_id.as_str()),
        };
        push(failing_test_signal(event, view, path, test));
    }

    // Changed-file hints arrive as low-severity anchored evidence.
    for path in &event.changed_files {
        let anchor = view.resolve_path(path);
        push(FailureSignal::new(
            &event.event_id,
            SignalKind::LogPattern,
            anchor,
            format!("changed file: {path}"),
            Severity::Info,
        ));
    }

    signals.into_values().collect()
}

fn failing_test_signal(
    event: &BuildEvent,
    view: &GraphSnapshot,
    path: &str,
    test: &str,
) -> FailureSignal {
    // Prefer the test function node, fall back to the test file.
    let anchor = unique_symbol(view, test)
        .or_else(|| (!path.is_empty()).then(|| view.resolve_path(path)).flatten());
    let excerpt = if path.is_empty() {
        test.to_string()
    } else {
        format!("{path}::{test}")
    };
    FailureSignal::new(
        &event.event_id,
        SignalKind::FailingTest,
        anchor,
        excerpt,
        Severity::Critical,
    )
}

/// Resolves a stack frame to a node: the file path first, then a unique
/// symbol match. Ambiguous or unknown locations stay unanchored.
fn resolve_frame_anchor(
    view: &GraphSnapshot,
    file: &str,
    symbol: Option<&str>,
) -> Option<CodeNodeId> {
    if let Some(anchor) = view.resolve_path(file) {
        return Some(anchor);
    }
    let symbol = symbol?;
    let short = symbol.rsplit('.').next().unwrap_or(symbol);
    unique_symbol(view, short)
}

fn unique_symbol(view: &GraphSnapshot, name: &str) -> Option<CodeNodeId> {
    match view.resolve_symbol(name) {
        [only] => Some(only.clone()),
        _ => None,
    }
}

/// One-line digest of what failed, for humans and notifications: the most
/// severe signal wins, earliest first on ties.
pub fn failure_summary(signals: &[FailureSignal]) -> String {
    let Some(worst) = signals
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.severity.cmp(&b.severity).then(ib.cmp(ia)))
        .map(|(_, s)| s)
    else {
        return "failure with no recognizable error output".to_string();
    };
    match &worst.anchor {
        Some(anchor) => format!("{} ({anchor})", worst.excerpt),
        None => worst.excerpt.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::event::{ChangeKind, CommitEvent, FileChange};
    use faultline_core::graph::{DependencyGraphStore, MapSourceProvider};
    use faultline_core::{CommitId, EventId, NodeKind};

    fn seeded_view() -> std::sync::Arc<GraphSnapshot> {
        let mut store = DependencyGraphStore::new(8);
        let mut sources = MapSourceProvider::new();
        sources.insert(
            "payments/charge.py",
            "def charge(amount):\n    return amount\n",
        );
        sources.insert(
            "tests/test_charge.py",
            "from payments.charge import charge\n\ndef test_charge():\n    assert charge(1)\n",
        );
        let commit = CommitEvent {
            id: CommitId("c1".into()),
            parents: vec![],
            author: "dev".into(),
            timestamp_ms: 1,
            changes: vec![
                FileChange {
                    path: "payments/charge.py".into(),
                    change: ChangeKind::Added,
                    lines: vec![],
                },
                FileChange {
                    path: "tests/test_charge.py".into(),
                    change: ChangeKind::Added,
                    lines: vec![],
                },
            ],
        };
        store.apply_commit(&commit, &sources).unwrap();
        store.latest()
    }

    fn event(raw_log: &str) -> BuildEvent {
        BuildEvent {
            event_id: EventId("run-1".into()),
            job_key: "repo/ci/test".into(),
            commit: None,
            raw_log: raw_log.into(),
            failing_tests: vec![],
            changed_files: vec![],
            timestamp_ms: 10,
        }
    }

    #[test]
    fn extracts_error_and_anchored_stack_frame() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "TypeError: unsupported operand\n  File \"payments/charge.py\", line 2\n";
        let signals = normalize(&patterns, &event(log), &view);

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].kind, SignalKind::LogPattern);
        assert_eq!(signals[1].kind, SignalKind::StackFrame);
        assert_eq!(
            signals[1].anchor,
            Some(CodeNodeId::file("payments/charge.py"))
        );
    }

    #[test]
    fn unknown_frame_path_stays_unanchored() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "Error: boom\n  File \"vendor/thing.py\", line 9\n";
        let signals = normalize(&patterns, &event(log), &view);
        let frame = signals
            .iter()
            .find(|s| s.kind == SignalKind::StackFrame)
            .unwrap();
        assert_eq!(frame.anchor, None);
    }

    #[test]
    fn js_frame_falls_back_to_unique_symbol() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        // Path does not resolve, but the symbol "charge" is unique.
        let log = "Error: declined\n    at charge (dist/bundle.js:4:2)\n";
        let signals = normalize(&patterns, &event(log), &view);
        let frame = signals
            .iter()
            .find(|s| s.kind == SignalKind::StackFrame)
            .unwrap();
        assert_eq!(
            frame.anchor,
            Some(CodeNodeId::symbol(
                NodeKind::Function,
                "payments/charge.py",
                "charge"
            ))
        );
    }

    #[test]
    fn failed_line_becomes_failing_test_signal() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "FAILED tests/test_charge.py::test_charge\n";
        let signals = normalize(&patterns, &event(log), &view);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::FailingTest);
        assert_eq!(signals[0].severity, Severity::Critical);
        assert!(signals[0].is_anchored());
    }

    #[test]
    fn structured_failing_tests_are_signals() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let mut build = event("no recognizable errors here");
        build.failing_tests = vec!["tests/test_charge.py::test_charge".into()];
        let signals = normalize(&patterns, &build, &view);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::FailingTest);
    }

    #[test]
    fn changed_files_become_info_signals() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let mut build = event("");
        build.changed_files = vec!["payments/charge.py".into()];
        let signals = normalize(&patterns, &build, &view);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].severity, Severity::Info);
        assert!(signals[0].is_anchored());
    }

    #[test]
    fn normalize_is_idempotent() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "TypeError: bad\n  File \"payments/charge.py\", line 2\nFAILED tests/test_charge.py::test_charge\n";
        let build = event(log);
        let first = normalize(&patterns, &build, &view);
        let second = normalize(&patterns, &build, &view);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_error_lines_dedupe_to_one_signal() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "Error: flaky network\nError: flaky network\n";
        let signals = normalize(&patterns, &event(log), &view);
        assert_eq!(signals.len(), 1);
    }

    #[test]
    fn lookahead_stops_at_blank_line() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "Error: boom\n\n  File \"payments/charge.py\", line 2\n";
        let signals = normalize(&patterns, &event(log), &view);
        assert!(signals.iter().all(|s| s.kind != SignalKind::StackFrame));
    }

    #[test]
    fn summary_prefers_most_severe_signal() {
        let patterns = LogPatterns::new();
        let view = seeded_view();
        let log = "warning: unused variable x\nFAILED tests/test_charge.py::test_charge\n";
        let signals = normalize(&patterns, &event(log), &view);
        let summary = failure_summary(&signals);
        assert!(summary.contains("test_charge"));
    }

    #[test]
    fn summary_of_nothing_is_explicit() {
        assert!(failure_summary(&[]).contains("no recognizable"));
    }

    proptest::proptest! {
        /// Re-normalizing any raw log yields the same signals in the
        /// same order.
        #[test]
        fn normalization_is_idempotent_for_any_log(raw in "\\PC{0,200}") {
            let patterns = LogPatterns::new();
            let view = seeded_view();
            let build = event(&raw);
            let first = normalize(&patterns, &build, &view);
            let second = normalize(&patterns, &build, &view);
            proptest::prop_assert_eq!(first, second);
        }
    }
}
