//! UI Routes - HTML pages for the earmark listening test wizard
//!
//! Plain HTML/CSS/JS (vanilla ES6+, no frameworks). The pages render from
//! the session workflow API; every state change is an explicit POST.
//!
//! # Structure
//! - **Static Assets** (`static_assets`): CSS/JS file serving
//! - **Root Page** (`root`): landing page with library path selection
//! - **Rating Page** (`rating`): one round - original vs each method variant
//! - **Complete Page** (`complete`): flush trigger and final status

use axum::{routing::get, Router};

use crate::AppState;

mod complete;
mod rating;
mod root;
mod static_assets;

use complete::complete_page;
use rating::rating_page;
use root::root_page;
use static_assets::{serve_earmark_css, serve_rating_js};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        // Page routes
        .route("/", get(root_page))
        .route("/rate/:session_id", get(rating_page))
        .route("/complete/:session_id", get(complete_page))
        // Static assets
        .route("/static/earmark.css", get(serve_earmark_css))
        .route("/static/rating.js", get(serve_rating_js))
}
