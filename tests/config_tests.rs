//! Unit tests for configuration resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate EARMARK_* variables are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use serial_test::serial;
use std::time::Duration;

use earmark::config::{Config, TomlConfig, DEFAULT_BIND, DEFAULT_PORT};

fn clear_env() {
    std::env::remove_var("EARMARK_BIND");
    std::env::remove_var("EARMARK_PORT");
    std::env::remove_var("EARMARK_LOCK_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_env_overrides_toml_and_default() {
    clear_env();
    std::env::set_var("EARMARK_PORT", "6001");
    std::env::set_var("EARMARK_BIND", "0.0.0.0");

    let toml_config = TomlConfig {
        bind: Some("10.0.0.1".to_string()),
        port: Some(7000),
        lock_timeout_secs: None,
    };

    let config = Config::resolve(&toml_config);
    assert_eq!(config.port, 6001);
    assert_eq!(config.bind, "0.0.0.0");

    clear_env();
}

#[test]
#[serial]
fn test_toml_fallback_when_env_unset() {
    clear_env();

    let toml_config = TomlConfig {
        bind: None,
        port: Some(7000),
        lock_timeout_secs: Some(4),
    };

    let config = Config::resolve(&toml_config);
    assert_eq!(config.bind, DEFAULT_BIND);
    assert_eq!(config.port, 7000);
    assert_eq!(config.lock_timeout, Duration::from_secs(4));
}

#[test]
#[serial]
fn test_compiled_defaults_as_last_tier() {
    clear_env();

    let config = Config::resolve(&TomlConfig::default());
    assert_eq!(config.bind, DEFAULT_BIND);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.lock_timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_unparseable_env_value_is_ignored() {
    clear_env();
    std::env::set_var("EARMARK_PORT", "not-a-port");

    let toml_config = TomlConfig {
        bind: None,
        port: Some(7000),
        lock_timeout_secs: None,
    };

    // Bad ENV value falls through to the TOML tier instead of failing
    let config = Config::resolve(&toml_config);
    assert_eq!(config.port, 7000);

    clear_env();
}

#[test]
#[serial]
fn test_lock_timeout_from_env() {
    clear_env();
    std::env::set_var("EARMARK_LOCK_TIMEOUT_SECS", "2");

    let config = Config::resolve(&TomlConfig::default());
    assert_eq!(config.lock_timeout, Duration::from_secs(2));

    clear_env();
}
