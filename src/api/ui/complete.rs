//! Completion page handler - final flush and thank-you message

use axum::{
    extract::Path,
    response::{Html, IntoResponse},
};
use uuid::Uuid;

/// GET /complete/{session_id}
///
/// Rendering this page attempts the result write; a deferred write keeps the
/// ratings pending and offers a retry action.
pub async fn complete_page(Path(session_id): Path<Uuid>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Earmark Listening Test - Complete</title>
    <link rel="stylesheet" href="/static/earmark.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>Evaluation complete</h1>
                <p class="subtitle">All audio pairs have been rated</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">earmark v{version}</div>
            </div>
        </div>
    </header>
    <div class="content">
        <div class="panel">
            <div id="status" class="success" style="display: none;"></div>
            <div id="warning" class="warning" style="display: none;"></div>
            <button class="button" id="retry-btn" style="display: none;"
                    onclick="flushResults()">Retry saving results</button>
        </div>
        <p><a href="/">Start another session</a></p>
    </div>
    <script>
        const SESSION_ID = '{session_id}';

        async function flushResults() {{
            const statusEl = document.getElementById('status');
            const warningEl = document.getElementById('warning');
            const retryBtn = document.getElementById('retry-btn');
            statusEl.style.display = 'none';
            warningEl.style.display = 'none';
            retryBtn.style.display = 'none';

            try {{
                const resp = await fetch('/session/flush/' + SESSION_ID, {{ method: 'POST' }});
                const data = await resp.json();
                if (!resp.ok) {{
                    warningEl.textContent = data.error ? data.error.message : 'Flush failed.';
                    warningEl.style.display = 'block';
                    retryBtn.style.display = 'inline-block';
                    return;
                }}
                if (data.flush.flushed) {{
                    statusEl.textContent = 'All audio pairs evaluated - thank you for participating! '
                        + (data.flush.rows_written > 0
                            ? data.flush.rows_written + ' ratings saved to results.csv.'
                            : 'Results were already saved.');
                    statusEl.style.display = 'block';
                }} else {{
                    warningEl.textContent = 'Results not saved yet: ' + (data.flush.warning || 'write deferred')
                        + ' Your ratings are kept - try again shortly.';
                    warningEl.style.display = 'block';
                    retryBtn.style.display = 'inline-block';
                }}
            }} catch (e) {{
                warningEl.textContent = 'Request failed: ' + e;
                warningEl.style.display = 'block';
                retryBtn.style.display = 'inline-block';
            }}
        }}

        flushResults();
    </script>
</body>
</html>"#,
        version = version,
        session_id = session_id,
    );

    Html(html)
}
