//! Audio delivery for the browser players
//!
//! Serves the original and per-method variant files of a live session. Only
//! files the session's scan actually listed are reachable, so arbitrary
//! paths can never be requested through this route.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    services::library_scanner::ORIGINAL_DIR,
    AppState,
};

/// Build audio delivery routes
pub fn audio_routes() -> Router<AppState> {
    Router::new().route("/audio/:session_id/:method/:file", get(serve_audio))
}

/// GET /audio/{session_id}/{method}/{file}
///
/// `method` is either `original` or one of the session's method folders.
pub async fn serve_audio(
    State(state): State<AppState>,
    Path((session_id, method, file)): Path<(Uuid, String, String)>,
) -> ApiResult<Response> {
    let path = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;

        // Both components must come from the scanned lists
        if !session.audio_files.iter().any(|f| f == &file) {
            return Err(ApiError::NotFound(format!(
                "File not part of this session: {}",
                file
            )));
        }

        if method == ORIGINAL_DIR {
            session.original_dir.join(&file)
        } else if session.method_dirs.iter().any(|m| m == &method) {
            session.base_dir.join(&method).join(&file)
        } else {
            return Err(ApiError::NotFound(format!(
                "Method not part of this session: {}",
                method
            )));
        }
    };

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Audio file unavailable");
        ApiError::NotFound(format!("Audio file not available: {}/{}", method, file))
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&file)),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes,
    )
        .into_response())
}

/// Content type by file extension; the scanner only admits wav and flac
fn content_type_for(file: &str) -> &'static str {
    let lower = file.to_ascii_lowercase();
    if lower.ends_with(".wav") {
        "audio/wav"
    } else if lower.ends_with(".flac") {
        "audio/flac"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("a.wav"), "audio/wav");
        assert_eq!(content_type_for("A.WAV"), "audio/wav");
        assert_eq!(content_type_for("b.flac"), "audio/flac");
        assert_eq!(content_type_for("odd.bin"), "application/octet-stream");
    }
}
