//! earmark - Subjective audio watermark listening test service
//!
//! Serves a browser wizard that walks a listener through a library of
//! original audio files and their watermarked variants, collecting one
//! similarity rating per (file, method) pair into a shared CSV.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use earmark::config::Config;
use earmark::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting earmark listening test service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    info!(
        bind = %config.listen_addr(),
        lock_timeout_secs = config.lock_timeout.as_secs(),
        "Configuration resolved"
    );

    let state = AppState::new(&config);
    let app = earmark::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!("Listening on http://{}", config.listen_addr());
    info!("Health check: http://{}/health", config.listen_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
