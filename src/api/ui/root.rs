//! Root page handler - listening test landing page

use axum::response::{Html, IntoResponse};

/// GET /
///
/// Landing page with library path selection
pub async fn root_page() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_profile = env!("BUILD_PROFILE");
    let build_timestamp = env!("BUILD_TIMESTAMP");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Earmark Listening Test</title>
    <link rel="stylesheet" href="/static/earmark.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>Earmark Listening Test</h1>
                <p class="subtitle">Compare original audio against watermarked variants</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">earmark v{version}</div>
                <div class="build-info-line">{git_short} ({build_profile})</div>
                <div class="build-info-line">{build_timestamp}</div>
            </div>
        </div>
    </header>
    <div class="content">
        <div class="panel" id="setup">
            <div class="form-group">
                <label for="base-dir">Library folder (contains <code>original</code> and one folder per watermark method):</label>
                <input type="text" id="base-dir" placeholder="/path/to/library"
                       onkeypress="if(event.key==='Enter') startSession()">
            </div>
            <button class="button" id="load-btn" onclick="startSession()">Load audio library</button>
            <div id="error" class="error" style="display: none;"></div>
            <div id="summary" class="success" style="display: none;"></div>
        </div>

        <div class="panel">
            <h2>How it works</h2>
            <ul>
                <li>Each round plays one original file and every method's processed version of it.</li>
                <li>Pick one of five similarity grades per method, then submit to move on.</li>
                <li>Methods missing the current file are skipped for that round.</li>
                <li>Your ratings are appended to <code>results.csv</code> in the library folder when you finish.</li>
            </ul>
        </div>
    </div>
    <script>
        async function startSession() {{
            const baseDir = document.getElementById('base-dir').value.trim();
            const errorEl = document.getElementById('error');
            const summaryEl = document.getElementById('summary');
            errorEl.style.display = 'none';
            summaryEl.style.display = 'none';

            if (!baseDir) {{
                errorEl.textContent = 'Please enter a library folder path.';
                errorEl.style.display = 'block';
                return;
            }}

            try {{
                const resp = await fetch('/session/start', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify({{ base_dir: baseDir }}),
                }});
                const data = await resp.json();
                if (!resp.ok) {{
                    errorEl.textContent = data.error ? data.error.message : 'Failed to load library.';
                    errorEl.style.display = 'block';
                    return;
                }}
                summaryEl.textContent = 'Loaded ' + data.total_files + ' audio files and '
                    + data.methods.length + ' watermark methods.';
                summaryEl.style.display = 'block';
                const target = data.state === 'COMPLETE' ? '/complete/' : '/rate/';
                window.location.href = target + data.session_id;
            }} catch (e) {{
                errorEl.textContent = 'Request failed: ' + e;
                errorEl.style.display = 'block';
            }}
        }}
    </script>
</body>
</html>"#,
        version = version,
        git_short = &git_hash[..git_hash.len().min(8)],
        build_profile = build_profile,
        build_timestamp = build_timestamp,
    );

    Html(html)
}
