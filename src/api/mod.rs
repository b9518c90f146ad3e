//! HTTP API handlers for earmark

pub mod audio;
pub mod health;
pub mod session_workflow;
pub mod ui;

pub use audio::audio_routes;
pub use health::health_routes;
pub use session_workflow::session_routes;
pub use ui::ui_routes;
