//! Candidate seeding, channel scoring, and ranking.
//!
//! A correlation run is deterministic: candidates live in a `BTreeMap`
//! keyed by node id, every channel is a pure function of the inputs and
//! the caller-supplied clock, and ties break by recency, then hop
//! distance, then node id. Reordering the commit window or re-running
//! the same request yields an identical diagnosis.

use std::collections::BTreeMap;
use std::time::Instant;

use faultline_core::fingerprint::{normalize_pattern, path_shape};
use faultline_core::graph::GraphSnapshot;
use faultline_core::{
    ChannelKind, CommitEvent, CommitId, Diagnosis, DiagnosisEntry, EdgeKind, EngineConfig,
    EventId, Evidence, FailureSignal, Fingerprint, NodeKind, SignalId,
};
use faultline_feedback::FeedbackStore;

use crate::error::CorrelateError;
use crate::score::{self, ChannelAvailability};
use crate::text::TextScorer;

/// Everything one correlation run needs, borrowed from the caller.
///
/// `now_ms` is passed in rather than read from the system clock so runs
/// are reproducible; `deadline` bounds wall-clock work and turns an
/// overrun into a partial diagnosis instead of an error.
pub struct CorrelationRequest<'a> {
    pub event_id: EventId,
    pub signals: &'a [FailureSignal],
    pub commit_window: &'a [CommitEvent],
    pub snapshot: &'a GraphSnapshot,
    pub config: &'a EngineConfig,
    pub now_ms: u64,
    pub deadline: Option<Instant>,
}

#[derive(Default)]
struct Candidate {
    /// Minimum structural distance from any anchored signal.
    hops: Option<u32>,
    /// Signals whose anchor neighborhood reached this node.
    signals: Vec<SignalId>,
}

struct Scored {
    entry: DiagnosisEntry,
    latest_touch_ms: u64,
    hops: Option<u32>,
}

/// Runs one correlation and returns the ranked diagnosis.
///
/// Channel outages (text scorer or feedback store erroring) do not fail
/// the run: the affected channel is dropped, the remaining weights are
/// renormalized, and the diagnosis is marked degraded. Only an invalid
/// configuration is an error.
pub fn correlate(
    request: &CorrelationRequest<'_>,
    scorer: &dyn TextScorer,
    feedback: &dyn FeedbackStore,
) -> Result<Diagnosis, CorrelateError> {
    let config = request.config;
    config.validate()?;

    let now = request.now_ms;
    let half_life = config.decay_half_life_ms;
    let has_anchors = request.signals.iter().any(|s| s.is_anchored());

    // No resolvable starting point at all: refuse to guess.
    if !has_anchors && request.commit_window.is_empty() {
        return Ok(Diagnosis::insufficient_evidence(
            request.event_id.clone(),
            request.snapshot.version(),
            now,
        ));
    }

    let mut degraded = false;
    let mut availability = ChannelAvailability {
        structural: has_anchors,
        temporal: !request.commit_window.is_empty(),
        text: !request.signals.is_empty(),
        feedback: true,
    };

    // Probe optional backends once so the whole run scores under one
    // consistent set of channel weights.
    if availability.text && scorer.similarity("probe", "probe").is_err() {
        availability.text = false;
        degraded = true;
    }
    let probe = Fingerprint::derive("probe", NodeKind::File, "*");
    if feedback.weight_for(&probe, now, half_life).is_err() {
        availability.feedback = false;
        degraded = true;
    }

    // Seed candidates: the structural neighborhood of every anchored
    // signal, plus every file the commit window touched.
    let mut candidates: BTreeMap<_, Candidate> = BTreeMap::new();
    let kinds = EdgeKind::structural_kinds();
    for signal in request.signals {
        let Some(anchor) = &signal.anchor else {
            continue;
        };
        let Ok(reachable) = request.snapshot.neighborhood(anchor, config.max_hops, &kinds)
        else {
            continue;
        };
        for (node_id, hops) in reachable {
            let candidate = candidates.entry(node_id).or_default();
            candidate.hops = Some(candidate.hops.map_or(hops, |h| h.min(hops)));
            if !candidate.signals.contains(&signal.id) {
                candidate.signals.push(signal.id.clone());
            }
        }
    }
    for commit in request.commit_window {
        for path in commit.touched_paths() {
            if let Some(node_id) = request.snapshot.resolve_path(path) {
                candidates.entry(node_id).or_default();
            }
        }
    }

    let weights = availability.effective_weights(&config.weights);
    let mut partial = false;
    let mut scored: Vec<Scored> = Vec::new();

    for (node_id, candidate) in &candidates {
        if request.deadline.is_some_and(|d| Instant::now() >= d) {
            partial = true;
            break;
        }
        let Some(node) = request.snapshot.node(node_id) else {
            continue;
        };

        // Temporal: the best recency among commits that touched this
        // file (or a directory sibling, at half strength).
        let mut temporal = 0.0_f64;
        let mut latest_touch_ms = 0_u64;
        let mut commit_refs: Vec<(u64, CommitId)> = Vec::new();
        for commit in request.commit_window {
            let factor = commit
                .touched_paths()
                .map(|p| score::touch_factor(p, &node.path))
                .fold(0.0, f64::max);
            if factor > 0.0 {
                let age = now.saturating_sub(commit.timestamp_ms);
                temporal = temporal.max(factor * score::recency(age, half_life));
                latest_touch_ms = latest_touch_ms.max(commit.timestamp_ms);
                commit_refs.push((commit.timestamp_ms, commit.id.clone()));
            }
        }
        commit_refs.sort();
        commit_refs.dedup_by(|a, b| a.1 == b.1);

        // Textual: the best similarity between any signal excerpt and
        // the candidate's path plus symbol.
        let candidate_text = match node.symbol() {
            Some(symbol) => format!("{} {}", node.path, symbol),
            None => node.path.clone(),
        };
        let mut text = 0.0_f64;
        let mut best_text_signal: Option<&SignalId> = None;
        if availability.text {
            for signal in request.signals {
                match scorer.similarity(&signal.excerpt, &candidate_text) {
                    Ok(s) if s > text => {
                        text = s;
                        best_text_signal = Some(&signal.id);
                    }
                    Ok(_) => {}
                    Err(_) => degraded = true,
                }
            }
        }

        // Feedback: the historical weight deviating furthest from the
        // neutral prior across this event's signal fingerprints.
        let mut fb = 0.5_f64;
        if availability.feedback {
            for signal in request.signals {
                let fingerprint = Fingerprint::derive(
                    &normalize_pattern(&signal.excerpt),
                    node.kind,
                    &path_shape(&node.path),
                );
                match feedback.weight_for(&fingerprint, now, half_life) {
                    Ok(w) if (w - 0.5).abs() > (fb - 0.5).abs() => fb = w,
                    Ok(_) => {}
                    Err(_) => degraded = true,
                }
            }
        }

        let confidence = weights.structural * candidate.hops.map_or(0.0, score::structural)
            + weights.temporal * temporal
            + weights.text * text
            + weights.feedback * fb;
        if confidence < config.evidence_floor {
            continue;
        }

        let mut channels = Vec::new();
        if availability.structural && candidate.hops.is_some() {
            channels.push(ChannelKind::Structural);
        }
        if availability.temporal && temporal > 0.0 {
            channels.push(ChannelKind::Temporal);
        }
        if availability.text && text > 0.0 {
            channels.push(ChannelKind::Textual);
        }
        if availability.feedback && (fb - 0.5).abs() > f64::EPSILON {
            channels.push(ChannelKind::Feedback);
        }

        let mut evidence_signals = candidate.signals.clone();
        if let Some(id) = best_text_signal {
            if text > 0.0 && !evidence_signals.contains(id) {
                evidence_signals.push(id.clone());
            }
        }

        scored.push(Scored {
            entry: DiagnosisEntry {
                node: node_id.clone(),
                confidence,
                evidence: Evidence {
                    signals: evidence_signals,
                    commits: commit_refs.into_iter().map(|(_, id)| id).collect(),
                    hops: candidate.hops,
                    channels,
                },
            },
            latest_touch_ms,
            hops: candidate.hops,
        });
    }

    // Rank: confidence, then most recent touch, then closest, then id.
    scored.sort_by(|a, b| {
        b.entry
            .confidence
            .total_cmp(&a.entry.confidence)
            .then_with(|| b.latest_touch_ms.cmp(&a.latest_touch_ms))
            .then_with(|| {
                a.hops
                    .unwrap_or(u32::MAX)
                    .cmp(&b.hops.unwrap_or(u32::MAX))
            })
            .then_with(|| a.entry.node.cmp(&b.entry.node))
    });
    scored.truncate(config.top_k);

    Ok(Diagnosis {
        event_id: request.event_id.clone(),
        graph_version: request.snapshot.version(),
        entries: scored.into_iter().map(|s| s.entry).collect(),
        reason: None,
        partial,
        degraded,
        created_at_ms: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use faultline_core::event::{ChangeKind, FileChange};
    use faultline_core::graph::{DependencyGraphStore, MapSourceProvider};
    use faultline_core::{CodeNodeId, ScoreWeights, Severity, SignalKind};
    use faultline_feedback::{MemoryFeedback, Outcome};

    use crate::text::{TextUnavailable, TokenOverlap};

    const NOW: u64 = 1_700_000_000_000;

    fn snapshot_with(files: &[(&str, &str)]) -> Arc<GraphSnapshot> {
        let mut store = DependencyGraphStore::new(8);
        let mut sources = MapSourceProvider::new();
        let mut changes = Vec::new();
        for (path, content) in files {
            sources.insert(*path, *content);
            changes.push(FileChange {
                path: (*path).to_string(),
                change: ChangeKind::Added,
                lines: vec![],
            });
        }
        let commit = CommitEvent {
            id: CommitId("seed".into()),
            parents: vec![],
            author: "dev".into(),
            timestamp_ms: 1,
            changes,
        };
        store.apply_commit(&commit, &sources).unwrap();
        store.latest()
    }

    fn touching(id: &str, timestamp_ms: u64, paths: &[&str]) -> CommitEvent {
        CommitEvent {
            id: CommitId(id.into()),
            parents: vec![],
            author: "dev".into(),
            timestamp_ms,
            changes: paths
                .iter()
                .map(|p| FileChange {
                    path: (*p).to_string(),
                    change: ChangeKind::Modified,
                    lines: vec![],
                })
                .collect(),
        }
    }

    fn log_signal(excerpt: &str) -> FailureSignal {
        FailureSignal::new(
            &EventId("run-1".into()),
            SignalKind::LogPattern,
            None,
            excerpt.into(),
            Severity::Error,
        )
    }

    struct BrokenScorer;

    impl TextScorer for BrokenScorer {
        fn similarity(&self, _: &str, _: &str) -> Result<f64, TextUnavailable> {
            Err(TextUnavailable)
        }
    }

    #[test]
    fn recent_touch_plus_matching_text_ranks_the_touched_file_first() {
        let snapshot = snapshot_with(&[(
            "payments/charge.py",
            "def charge(amount):\n    return amount\n",
        )]);
        let signal = FailureSignal::new(
            &EventId("run-1".into()),
            SignalKind::StackFrame,
            None,
            "at charge (dist/bundle.js:4:2)".into(),
            Severity::Error,
        );
        let window = vec![touching("c9", NOW - 60_000, &["payments/charge.py"])];
        let config = EngineConfig::default();
        let request = CorrelationRequest {
            event_id: EventId("run-1".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();

        let top = diagnosis.top().unwrap();
        assert_eq!(top.node, CodeNodeId::file("payments/charge.py"));
        assert!(top.confidence > 0.6, "confidence {}", top.confidence);
        assert!(top.evidence.channels.contains(&ChannelKind::Temporal));
        assert!(top.evidence.channels.contains(&ChannelKind::Textual));
        assert_eq!(top.evidence.commits, vec![CommitId("c9".into())]);
        assert!(!diagnosis.degraded);
        assert!(!diagnosis.partial);
    }

    #[test]
    fn no_anchors_and_empty_window_is_insufficient_evidence() {
        let snapshot = snapshot_with(&[("pay/a.py", "def a(): pass\n")]);
        let signal = log_signal("Error: boom");
        let config = EngineConfig::default();
        let request = CorrelationRequest {
            event_id: EventId("run-2".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &[],
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();
        assert!(diagnosis.entries.is_empty());
        assert_eq!(
            diagnosis.reason,
            Some(faultline_core::DiagnosisReason::InsufficientEvidence)
        );
    }

    #[test]
    fn equal_scores_break_toward_the_more_recent_touch() {
        let snapshot = snapshot_with(&[
            ("pay/a.py", "def handle_a(): pass\n"),
            ("web/b.py", "def handle_b(): pass\n"),
        ]);
        let signal = log_signal("Error: boom");
        let window = vec![
            touching("c1", 1_000, &["pay/a.py"]),
            touching("c2", 2_000, &["web/b.py"]),
        ];
        // Temporal weight zero keeps the combined scores identical while
        // the touch timestamps differ.
        let config = EngineConfig {
            weights: ScoreWeights {
                structural: 0.5,
                temporal: 0.0,
                text: 0.3,
                feedback: 0.2,
            },
            ..EngineConfig::default()
        };
        let request = CorrelationRequest {
            event_id: EventId("run-3".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();

        assert_eq!(diagnosis.entries.len(), 2);
        assert_eq!(
            diagnosis.entries[0].confidence,
            diagnosis.entries[1].confidence
        );
        assert_eq!(diagnosis.entries[0].node, CodeNodeId::file("web/b.py"));
        assert_eq!(diagnosis.entries[1].node, CodeNodeId::file("pay/a.py"));
    }

    #[test]
    fn accepted_history_outranks_an_otherwise_equal_candidate() {
        let snapshot = snapshot_with(&[
            ("pay/a.py", "def handle_a(): pass\n"),
            ("web/b.py", "def handle_b(): pass\n"),
        ]);
        let signal = log_signal("Error: payment declined");
        let window = vec![touching("c1", NOW - 1_000, &["pay/a.py", "web/b.py"])];
        let config = EngineConfig::default();

        let feedback = MemoryFeedback::new();
        let fingerprint = Fingerprint::derive(
            &normalize_pattern("Error: payment declined"),
            NodeKind::File,
            &path_shape("pay/a.py"),
        );
        for _ in 0..10 {
            feedback.record(&fingerprint, Outcome::Accepted, NOW).unwrap();
        }

        let request = CorrelationRequest {
            event_id: EventId("run-4".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &feedback).unwrap();

        assert_eq!(diagnosis.entries[0].node, CodeNodeId::file("pay/a.py"));
        assert!(diagnosis.entries[0].confidence > diagnosis.entries[1].confidence);
        assert!(diagnosis.entries[0]
            .evidence
            .channels
            .contains(&ChannelKind::Feedback));
    }

    #[test]
    fn expired_deadline_yields_partial_not_error() {
        let snapshot = snapshot_with(&[("pay/a.py", "def a(): pass\n")]);
        let signal = log_signal("Error: boom");
        let window = vec![touching("c1", NOW - 1_000, &["pay/a.py"])];
        let config = EngineConfig::default();
        let request = CorrelationRequest {
            event_id: EventId("run-5".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: Some(Instant::now()),
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();
        assert!(diagnosis.partial);
        assert!(diagnosis.entries.is_empty());
        assert!(diagnosis.reason.is_none());
    }

    #[test]
    fn broken_text_backend_degrades_instead_of_failing() {
        let snapshot = snapshot_with(&[("pay/a.py", "def a(): pass\n")]);
        let signal = log_signal("Error: boom");
        let window = vec![touching("c1", NOW - 1_000, &["pay/a.py"])];
        let config = EngineConfig::default();
        let request = CorrelationRequest {
            event_id: EventId("run-6".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &BrokenScorer, &MemoryFeedback::new()).unwrap();
        assert!(diagnosis.degraded);
        let top = diagnosis.top().unwrap();
        assert!(!top.evidence.channels.contains(&ChannelKind::Textual));
        // Remaining weights renormalize: temporal alone carries
        // 0.3 / 0.45 of a near-1.0 recency plus the neutral feedback.
        assert!(top.confidence > 0.5);
    }

    #[test]
    fn evidence_floor_drops_weak_candidates() {
        let snapshot = snapshot_with(&[("pay/a.py", "def a(): pass\n")]);
        let signal = log_signal("Error: boom");
        let window = vec![touching("c1", NOW - 1_000, &["pay/a.py"])];
        let config = EngineConfig {
            evidence_floor: 0.99,
            ..EngineConfig::default()
        };
        let request = CorrelationRequest {
            event_id: EventId("run-7".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();
        assert!(diagnosis.entries.is_empty());
        assert!(diagnosis.reason.is_none());
    }

    #[test]
    fn top_k_truncates_the_ranking() {
        let snapshot = snapshot_with(&[
            ("a/x.py", "def x(): pass\n"),
            ("b/y.py", "def y(): pass\n"),
            ("c/z.py", "def z(): pass\n"),
        ]);
        let signal = log_signal("Error: boom");
        let window = vec![touching("c1", NOW - 1_000, &["a/x.py", "b/y.py", "c/z.py"])];
        let config = EngineConfig {
            top_k: 2,
            ..EngineConfig::default()
        };
        let request = CorrelationRequest {
            event_id: EventId("run-8".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &window,
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();
        assert_eq!(diagnosis.entries.len(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let snapshot = snapshot_with(&[("pay/a.py", "def a(): pass\n")]);
        let config = EngineConfig {
            top_k: 0,
            ..EngineConfig::default()
        };
        let request = CorrelationRequest {
            event_id: EventId("run-9".into()),
            signals: &[],
            commit_window: &[],
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let result = correlate(&request, &TokenOverlap, &MemoryFeedback::new());
        assert!(matches!(result, Err(CorrelateError::Config(_))));
    }

    #[test]
    fn anchored_signal_seeds_its_neighborhood() {
        let snapshot = snapshot_with(&[
            ("payments/charge.py", "def charge(a):\n    return a\n"),
            (
                "tests/test_charge.py",
                "from payments.charge import charge\n\ndef test_charge():\n    assert charge(1)\n",
            ),
        ]);
        let anchor = CodeNodeId::file("tests/test_charge.py");
        let signal = FailureSignal::new(
            &EventId("run-10".into()),
            SignalKind::FailingTest,
            Some(anchor),
            "tests/test_charge.py::test_charge".into(),
            Severity::Critical,
        );
        let config = EngineConfig::default();
        let request = CorrelationRequest {
            event_id: EventId("run-10".into()),
            signals: std::slice::from_ref(&signal),
            commit_window: &[],
            snapshot: &snapshot,
            config: &config,
            now_ms: NOW,
            deadline: None,
        };
        let diagnosis = correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();

        // The imported implementation file is reachable from the test
        // anchor and scores through the structural channel.
        let imported = CodeNodeId::file("payments/charge.py");
        let entry = diagnosis
            .entries
            .iter()
            .find(|e| e.node == imported)
            .expect("imported file among candidates");
        assert!(entry.evidence.channels.contains(&ChannelKind::Structural));
        assert_eq!(entry.evidence.signals, vec![signal.id.clone()]);
        assert!(entry.evidence.hops.is_some());
    }

    #[test]
    fn commit_window_order_does_not_change_the_diagnosis() {
        let snapshot = snapshot_with(&[
            ("pay/a.py", "def a(): pass\n"),
            ("web/b.py", "def b(): pass\n"),
        ]);
        let signal = log_signal("Error: boom");
        let mut window = vec![
            touching("c1", NOW - 5_000, &["pay/a.py"]),
            touching("c2", NOW - 3_000, &["web/b.py"]),
            touching("c3", NOW - 1_000, &["pay/a.py"]),
        ];
        let config = EngineConfig::default();
        let run = |window: &[CommitEvent]| {
            let request = CorrelationRequest {
                event_id: EventId("run-11".into()),
                signals: std::slice::from_ref(&signal),
                commit_window: window,
                snapshot: &snapshot,
                config: &config,
                now_ms: NOW,
                deadline: None,
            };
            correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap()
        };
        let forward = run(&window);
        window.reverse();
        let reversed = run(&window);
        assert_eq!(forward, reversed);
    }

    proptest::proptest! {
        /// Same request twice is bit-for-bit the same diagnosis.
        #[test]
        fn correlation_is_deterministic(excerpt in "\\PC{0,80}") {
            let snapshot = snapshot_with(&[("pay/a.py", "def a(): pass\n")]);
            let signal = log_signal(&excerpt);
            let window = vec![touching("c1", NOW - 1_000, &["pay/a.py"])];
            let config = EngineConfig::default();
            let request = CorrelationRequest {
                event_id: EventId("run-12".into()),
                signals: std::slice::from_ref(&signal),
                commit_window: &window,
                snapshot: &snapshot,
                config: &config,
                now_ms: NOW,
                deadline: None,
            };
            let feedback = MemoryFeedback::new();
            let first = correlate(&request, &TokenOverlap, &feedback).unwrap();
            let second = correlate(&request, &TokenOverlap, &feedback).unwrap();
            proptest::prop_assert_eq!(first, second);
        }

        /// Whatever the signals and window look like, every ranked entry
        /// stays inside the unit interval and above the evidence floor.
        #[test]
        fn combined_scores_stay_in_bounds(
            excerpts in proptest::collection::vec("\\PC{0,40}", 0..4),
            touches in proptest::collection::vec((0u64..2_000_000, 0usize..3), 0..4),
        ) {
            let snapshot = snapshot_with(&[
                ("pay/a.py", "def a(): pass\n"),
                ("web/b.py", "def b(): pass\n"),
                ("lib/c.py", "def c(): pass\n"),
            ]);
            let paths = ["pay/a.py", "web/b.py", "lib/c.py"];
            let signals: Vec<FailureSignal> =
                excerpts.iter().map(|e| log_signal(e)).collect();
            let window: Vec<CommitEvent> = touches
                .iter()
                .enumerate()
                .map(|(i, (age, p))| touching(&format!("c{i}"), NOW - age, &[paths[*p]]))
                .collect();
            let config = EngineConfig::default();
            let request = CorrelationRequest {
                event_id: EventId("run-13".into()),
                signals: &signals,
                commit_window: &window,
                snapshot: &snapshot,
                config: &config,
                now_ms: NOW,
                deadline: None,
            };
            let diagnosis =
                correlate(&request, &TokenOverlap, &MemoryFeedback::new()).unwrap();
            for entry in &diagnosis.entries {
                proptest::prop_assert!((0.0..=1.0).contains(&entry.confidence));
                proptest::prop_assert!(entry.confidence >= config.evidence_floor);
            }
        }
    }
}
