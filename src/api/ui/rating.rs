//! Rating page handler - one round of the listening test

use axum::{
    extract::Path,
    response::{Html, IntoResponse},
};
use uuid::Uuid;

/// GET /rate/{session_id}
///
/// Page shell for the current round; /static/rating.js renders the round
/// from GET /session/status and submits through POST /session/submit.
pub async fn rating_page(Path(session_id): Path<Uuid>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Earmark Listening Test - Rating</title>
    <link rel="stylesheet" href="/static/earmark.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>Rating round</h1>
                <p class="subtitle" id="round-subtitle">Loading session...</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">earmark v{version}</div>
            </div>
        </div>
    </header>
    <div class="content">
        <div id="error" class="error" style="display: none;"></div>

        <div class="panel" id="original-panel" style="display: none;">
            <h2>Original</h2>
            <audio id="original-audio" controls preload="none"></audio>
        </div>

        <div id="methods-container"></div>

        <button class="button" id="submit-btn" style="display: none;"
                onclick="submitRound()">Submit and continue</button>

        <p><a href="/">&larr; Back to library selection</a></p>
    </div>
    <script>
        const SESSION_ID = '{session_id}';
    </script>
    <script src="/static/rating.js"></script>
</body>
</html>"#,
        version = version,
        session_id = session_id,
    );

    Html(html)
}
