//! earmark library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::Config;
use crate::models::EvalSession;
use crate::services::ResultStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Live listening test sessions, one per listener pass
    pub sessions: Arc<RwLock<HashMap<Uuid, EvalSession>>>,
    /// Shared result file writer
    pub store: ResultStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store: ResultStore::new(config.lock_timeout),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages + static assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::session_routes())
        .merge(api::audio_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
