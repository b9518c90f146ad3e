//! Configuration loading for earmark
//!
//! Each setting resolves in priority order:
//! 1. Environment variable (`EARMARK_*`)
//! 2. TOML config file (`~/.config/earmark/config.toml`)
//! 3. Compiled default

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5740;

/// Default bounded wait for the result file lock, in seconds
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 10;

/// Raw TOML config file contents; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub lock_timeout_secs: Option<u64>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub bind: String,
    /// Listen port
    pub port: u16,
    /// Bounded wait for the result file lock
    pub lock_timeout: Duration,
}

impl Config {
    /// Resolve configuration from environment, TOML file, and defaults
    ///
    /// A missing or unparseable config file degrades to the remaining tiers
    /// with a warning; configuration problems never stop the service.
    pub fn load() -> Self {
        let toml_config = load_toml_config();
        Self::resolve(&toml_config)
    }

    /// Apply the per-field priority order against an already-loaded TOML tier
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let bind = std::env::var("EARMARK_BIND")
            .ok()
            .or_else(|| toml_config.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let port = env_parsed("EARMARK_PORT")
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let lock_timeout_secs = env_parsed("EARMARK_LOCK_TIMEOUT_SECS")
            .or(toml_config.lock_timeout_secs)
            .unwrap_or(DEFAULT_LOCK_TIMEOUT_SECS);

        Self {
            bind,
            port,
            lock_timeout: Duration::from_secs(lock_timeout_secs),
        }
    }

    /// Socket address string the listener binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            lock_timeout: Duration::from_secs(DEFAULT_LOCK_TIMEOUT_SECS),
        }
    }
}

/// Platform config file path (`~/.config/earmark/config.toml`)
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("earmark").join("config.toml"))
}

/// Read the TOML tier, degrading to empty on any problem
fn load_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        return TomlConfig::default();
    };
    if !path.exists() {
        return TomlConfig::default();
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config file unreadable, using defaults");
            return TomlConfig::default();
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config file unparseable, using defaults");
            TomlConfig::default()
        }
    }
}

/// Parse an environment variable, warning (not failing) on bad values
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(var = name, value = %value, "Ignoring unparseable environment variable");
            None
        }
    }
}
