//! HTTP handlers: event intake, diagnosis lookup, feedback, config.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use faultline_core::graph::MapSourceProvider;
use faultline_core::{BuildEvent, Diagnosis, EngineConfig, Fingerprint};

use crate::error::ApiError;
use crate::schema::{
    BuildAccepted, CommitApplied, CommitIngest, FeedbackRecorded, FeedbackRequest,
    GraphChanged, GraphVersionInfo,
};
use crate::state::AppState;
use crate::worker;

/// `POST /events/commit`: applies a commit to the graph store.
///
/// Idempotent under redelivery: a known commit id returns the version it
/// originally produced and is not re-added to the correlation window.
pub async fn ingest_commit(
    State(state): State<AppState>,
    Json(request): Json<CommitIngest>,
) -> Result<Json<CommitApplied>, ApiError> {
    let sources = MapSourceProvider::from(request.sources);
    let (version, node_count, degraded_nodes) = {
        let mut store = state.graph.write().await;
        let version = store.apply_commit(&request.commit, &sources)?;
        let snapshot = store.latest();
        (version, snapshot.node_count(), snapshot.degraded_count())
    };

    let horizon = state.config.read().await.version_horizon;
    {
        let mut window = state.commits.write().await;
        if !window.iter().any(|c| c.id == request.commit.id) {
            window.push_back(request.commit.clone());
            while window.len() > horizon {
                window.pop_front();
            }
        }
    }

    // Nobody listening is fine.
    let _ = state.graph_events.send(GraphChanged {
        version,
        commit_id: request.commit.id.clone(),
    });

    tracing::info!(commit = %request.commit.id, version = version.0, "commit applied");
    Ok(Json(CommitApplied {
        version,
        node_count,
        degraded_nodes,
    }))
}

/// `POST /events/build`: accepts a failure event and spawns its worker.
pub async fn ingest_build(
    State(state): State<AppState>,
    Json(event): Json<BuildEvent>,
) -> Result<(StatusCode, Json<BuildAccepted>), ApiError> {
    let event_id = event.event_id.clone();
    let generation = worker::spawn_correlation(&state, event);
    Ok((
        StatusCode::ACCEPTED,
        Json(BuildAccepted {
            event_id,
            generation,
        }),
    ))
}

/// `GET /diagnosis/{event_id}`: latest diagnosis for a failure event.
pub async fn get_diagnosis(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Diagnosis>, ApiError> {
    state
        .diagnoses
        .get(&event_id)
        .map(|d| Json(d.clone()))
        .ok_or_else(|| ApiError::NotFound(format!("no diagnosis for event {event_id}")))
}

/// `POST /feedback`: records accepted/rejected outcomes, any delay.
pub async fn post_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackRecorded>, ApiError> {
    let now = worker::now_epoch_ms();
    for item in &request.items {
        let fingerprint = Fingerprint(item.fingerprint.clone());
        let timestamp = item.timestamp_ms.unwrap_or(now);
        state.feedback.record(&fingerprint, item.outcome, timestamp)?;
    }
    Ok(Json(FeedbackRecorded {
        recorded: request.items.len(),
    }))
}

/// `GET /config`: current engine configuration.
pub async fn get_config(State(state): State<AppState>) -> Json<EngineConfig> {
    Json(state.config.read().await.clone())
}

/// `PUT /config`: replaces the engine configuration after validation.
/// The new version horizon is pushed into the graph store, so lowering
/// it releases out-of-window snapshots right away.
pub async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<EngineConfig>,
) -> Result<Json<EngineConfig>, ApiError> {
    config.validate()?;
    state.graph.write().await.set_horizon(config.version_horizon);
    *state.config.write().await = config.clone();
    tracing::info!("engine configuration replaced");
    Ok(Json(config))
}

/// `GET /graph/version`: current graph version and degraded coverage.
pub async fn graph_version(State(state): State<AppState>) -> Json<GraphVersionInfo> {
    let store = state.graph.read().await;
    let snapshot = store.latest();
    Json(GraphVersionInfo {
        version: snapshot.version(),
        node_count: snapshot.node_count(),
        degraded_nodes: snapshot.degraded_count(),
    })
}
