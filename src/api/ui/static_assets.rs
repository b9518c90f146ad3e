//! Static asset handlers for the earmark UI
//!
//! Embeds and serves CSS/JS files at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

// Embed static files at compile time
const EARMARK_CSS: &str = include_str!("../../../static/earmark.css");
const RATING_JS: &str = include_str!("../../../static/rating.js");

/// GET /static/earmark.css
///
/// Serves the shared UI styles
pub async fn serve_earmark_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        EARMARK_CSS,
    )
        .into_response()
}

/// GET /static/rating.js
///
/// Serves the rating page JavaScript
pub async fn serve_rating_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        RATING_JS,
    )
        .into_response()
}
