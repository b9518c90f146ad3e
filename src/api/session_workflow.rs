//! Session workflow API handlers
//!
//! POST /session/start, GET /session/status, POST /session/submit,
//! POST /session/flush
//!
//! Every state transition of a listening test session happens through one of
//! these endpoints; pages render from the status view and never mutate state
//! implicitly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{EvalSession, Rating, RatingRecord, SessionState},
    services, AppState,
};

/// POST /session/start request
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub base_dir: String,
}

/// POST /session/start response
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub total_files: usize,
    pub methods: Vec<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// One method's availability in the current round
#[derive(Debug, Serialize)]
pub struct MethodVariant {
    pub name: String,
    /// False when the method folder lacks the current file; that method is
    /// skipped for this round and takes no rating
    pub present: bool,
}

/// GET /session/status response: the round view model
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    /// 0-based index of the current round
    pub position: usize,
    pub total: usize,
    pub current_file: Option<String>,
    /// Methods of the current round; empty once complete
    pub methods: Vec<MethodVariant>,
    /// Ratings collected but not yet written to the result file
    pub pending_count: usize,
    /// The fixed ordinal scale, for building the selection widgets
    pub rating_options: Vec<&'static str>,
}

/// POST /session/submit request: one rating per present method
#[derive(Debug, Deserialize)]
pub struct SubmitRatingsRequest {
    pub ratings: HashMap<String, Rating>,
}

/// Outcome of a result file write attempt
#[derive(Debug, Serialize)]
pub struct FlushOutcome {
    pub flushed: bool,
    pub rows_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /session/submit response
#[derive(Debug, Serialize)]
pub struct SubmitRatingsResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub position: usize,
    pub total: usize,
    /// Present when this submission completed the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flush: Option<FlushOutcome>,
}

/// POST /session/flush response
#[derive(Debug, Serialize)]
pub struct FlushSessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub flush: FlushOutcome,
}

/// Build session workflow routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session/start", post(start_session))
        .route("/session/status/:session_id", get(session_status))
        .route("/session/submit/:session_id", post(submit_ratings))
        .route("/session/flush/:session_id", post(flush_session))
}

/// POST /session/start
///
/// Scan the given base directory and open a fresh session over it.
/// Returns 201 Created, or 400 when the directory does not hold a library.
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> ApiResult<(StatusCode, Json<StartSessionResponse>)> {
    let base_dir = PathBuf::from(request.base_dir.trim());

    let library = tokio::task::spawn_blocking(move || services::scan(&base_dir))
        .await
        .map_err(|e| ApiError::Internal(format!("Scan task failed: {}", e)))??;

    let mut session = EvalSession::new();
    session.reset(library);

    let response = StartSessionResponse {
        session_id: session.session_id,
        state: session.state,
        total_files: session.total(),
        methods: session.method_dirs.clone(),
        started_at: session.started_at,
    };

    tracing::info!(
        session_id = %session.session_id,
        base_dir = %session.base_dir.display(),
        files = session.total(),
        methods = session.method_dirs.len(),
        "Listening test session started"
    );

    state
        .sessions
        .write()
        .await
        .insert(session.session_id, session);

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /session/status/{session_id}
///
/// The current round's view model: file under evaluation and per-method
/// variant availability. Read-only.
pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionStatusResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;

    let methods = match session.current_file() {
        Some(file) => present_methods(session, file),
        None => Vec::new(),
    };

    Ok(Json(SessionStatusResponse {
        session_id: session.session_id,
        state: session.state,
        position: session.index,
        total: session.total(),
        current_file: session.current_file().map(str::to_string),
        methods,
        pending_count: session.pending_results.len(),
        rating_options: Rating::labels(),
    }))
}

/// POST /session/submit/{session_id}
///
/// Finalize all ratings for the current round at once and advance. On the
/// final round the accumulated results are written out; a deferred write is
/// reported in the `flush` field with the pending ratings retained.
pub async fn submit_ratings(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitRatingsRequest>,
) -> ApiResult<Json<SubmitRatingsResponse>> {
    // Validate and record under the write lock, but never write files there
    let (flush_input, session_state, position, total) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;

        let current_file = match session.current_file() {
            Some(file) => file.to_string(),
            None => {
                return Err(ApiError::Conflict(format!(
                    "Session already complete: {}",
                    session_id
                )))
            }
        };

        let methods = present_methods(session, &current_file);

        // Reject anything aimed at an unknown or absent method before
        // touching session state
        for method in request.ratings.keys() {
            let Some(variant) = methods.iter().find(|m| &m.name == method) else {
                return Err(ApiError::BadRequest(format!(
                    "Unknown method for this library: {}",
                    method
                )));
            };
            if !variant.present {
                return Err(ApiError::BadRequest(format!(
                    "Method '{}' has no variant of '{}'; it is skipped this round",
                    method, current_file
                )));
            }
        }

        // Every present method needs its rating: submission is all-at-once
        for variant in methods.iter().filter(|m| m.present) {
            if !request.ratings.contains_key(&variant.name) {
                return Err(ApiError::BadRequest(format!(
                    "Missing rating for method: {}",
                    variant.name
                )));
            }
        }

        // Record in method order so rows land deterministically
        for variant in methods.iter().filter(|m| m.present) {
            let rating = request.ratings[&variant.name];
            session.record(RatingRecord::new(
                current_file.clone(),
                variant.name.clone(),
                rating,
            ));
        }
        session.advance();

        tracing::info!(
            session_id = %session_id,
            file = %current_file,
            ratings = request.ratings.len(),
            position = session.index,
            total = session.total(),
            "Round submitted"
        );

        let flush_input = session
            .is_complete()
            .then(|| (session.base_dir.clone(), session.take_pending()));

        (flush_input, session.state, session.index, session.total())
    };

    let flush = match flush_input {
        Some((base_dir, records)) => Some(flush_records(&state, session_id, base_dir, records).await),
        None => None,
    };

    Ok(Json(SubmitRatingsResponse {
        session_id,
        state: session_state,
        position,
        total,
        flush,
    }))
}

/// POST /session/flush/{session_id}
///
/// Retry a deferred result write. Idempotent: once everything is written,
/// further calls report zero rows.
pub async fn flush_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<FlushSessionResponse>> {
    let (base_dir, records, session_state) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;

        if !session.is_complete() {
            return Err(ApiError::Conflict(format!(
                "Session still rating, nothing to flush: {}",
                session_id
            )));
        }

        (
            session.base_dir.clone(),
            session.take_pending(),
            session.state,
        )
    };

    let flush = flush_records(&state, session_id, base_dir, records).await;

    Ok(Json(FlushSessionResponse {
        session_id,
        state: session_state,
        flush,
    }))
}

/// Per-method availability of `file` in this session's library
fn present_methods(session: &EvalSession, file: &str) -> Vec<MethodVariant> {
    session
        .method_dirs
        .iter()
        .map(|method| {
            let present = session.base_dir.join(method).join(file).is_file();
            if !present {
                tracing::warn!(
                    session_id = %session.session_id,
                    method = %method,
                    file = %file,
                    "Variant missing, method skipped for this round"
                );
            }
            MethodVariant {
                name: method.clone(),
                present,
            }
        })
        .collect()
}

/// Write `records` to the shared result file, restoring them to the session
/// on any failure so a later user-driven attempt can retry
async fn flush_records(
    state: &AppState,
    session_id: Uuid,
    base_dir: PathBuf,
    records: Vec<RatingRecord>,
) -> FlushOutcome {
    if records.is_empty() {
        return FlushOutcome {
            flushed: true,
            rows_written: 0,
            warning: None,
        };
    }

    let store = state.store.clone();
    let write_base = base_dir.clone();
    let to_write = records.clone();
    let result =
        tokio::task::spawn_blocking(move || store.append(&write_base, &to_write)).await;

    let error_message = match result {
        Ok(Ok(rows)) => {
            tracing::info!(session_id = %session_id, rows, "Session results flushed");
            return FlushOutcome {
                flushed: true,
                rows_written: rows,
                warning: None,
            };
        }
        Ok(Err(e)) => {
            if e.is_contention() {
                tracing::warn!(session_id = %session_id, error = %e, "Result write deferred");
            } else {
                tracing::error!(session_id = %session_id, error = %e, "Result write failed");
            }
            e.to_string()
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Result write task failed");
            format!("Write task failed: {}", e)
        }
    };

    // Hand the records back; the session keeps them until a retry succeeds
    let mut sessions = state.sessions.write().await;
    if let Some(session) = sessions.get_mut(&session_id) {
        session.restore_pending(records);
    }

    FlushOutcome {
        flushed: false,
        rows_written: 0,
        warning: Some(error_message),
    }
}
