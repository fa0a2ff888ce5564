//! Per-event correlation workers.
//!
//! Every build event gets its own tokio task: normalize the raw
//! evidence against the latest graph snapshot, correlate under a
//! wall-clock deadline, and publish the diagnosis. Generation numbers
//! per job key implement supersession: a retried CI job bumps the
//! generation, and a worker whose generation is stale at publish time
//! finishes its work and discards the result. A failing worker is
//! logged and isolated; nothing else is affected.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dashmap::mapref::entry::Entry;

use faultline_core::{BuildEvent, CommitEvent};
use faultline_correlate::{correlate, CorrelateError, CorrelationRequest};
use faultline_signal::normalize;

use crate::state::AppState;

/// Current wall clock as epoch milliseconds.
pub fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bumps the generation for the event's job key and spawns the worker.
/// Returns the generation assigned to this run.
pub fn spawn_correlation(state: &AppState, event: BuildEvent) -> u64 {
    let generation = {
        let mut entry = state.generations.entry(event.job_key.clone()).or_insert(0);
        *entry += 1;
        *entry
    };
    let run_id = uuid::Uuid::new_v4();
    let state = state.clone();
    tokio::spawn(async move {
        let event_id = event.event_id.clone();
        if let Err(err) = run_correlation(state, event, generation).await {
            tracing::error!(%run_id, event = %event_id, error = %err, "correlation worker failed");
        }
    });
    generation
}

async fn run_correlation(
    state: AppState,
    event: BuildEvent,
    generation: u64,
) -> Result<(), CorrelateError> {
    let snapshot = state.graph.read().await.latest();
    let config = state.config.read().await.clone();
    let window: Vec<CommitEvent> = state.commits.read().await.iter().cloned().collect();

    let signals = normalize(&state.patterns, &event, &snapshot);
    tracing::debug!(
        event = %event.event_id,
        signals = signals.len(),
        graph_version = snapshot.version().0,
        "normalized build event"
    );

    let deadline = Instant::now() + Duration::from_millis(config.correlation_timeout_ms);
    let request = CorrelationRequest {
        event_id: event.event_id.clone(),
        signals: &signals,
        commit_window: &window,
        snapshot: &snapshot,
        config: &config,
        now_ms: now_epoch_ms(),
        deadline: Some(deadline),
    };
    let diagnosis = correlate(&request, state.scorer.as_ref(), state.feedback.as_ref())?;

    if publish(&state, &event, generation, diagnosis) {
        tracing::info!(event = %event.event_id, "diagnosis published");
    } else {
        tracing::debug!(
            job_key = %event.job_key,
            generation,
            "superseded correlation discarded"
        );
    }
    Ok(())
}

/// Publishes a diagnosis unless the run was superseded. The generation
/// check and the insert happen under the job key's map entry, so a
/// stale worker can never overwrite a newer result that raced it.
fn publish(
    state: &AppState,
    event: &BuildEvent,
    generation: u64,
    diagnosis: faultline_core::Diagnosis,
) -> bool {
    match state.generations.entry(event.job_key.clone()) {
        Entry::Occupied(entry) if *entry.get() == generation => {
            state.diagnoses.insert(event.event_id.0.clone(), diagnosis);
            true
        }
        _ => false,
    }
}
