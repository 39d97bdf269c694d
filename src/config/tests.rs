//! Configuration tests
//!
//! The round-trip tests guard the template in `serialization.rs`: when a
//! field is added to `Config` but not to `to_toml()`, they fail.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(toml_str: &str) -> FileConfig {
    toml::from_str(toml_str).expect("config should parse")
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let reloaded = Config::from_sources(parsed.unwrap(), no_env);
    assert_eq!(reloaded, config);
}

#[test]
fn test_config_roundtrip_custom_values() {
    let mut config = Config::default();
    config.theme = "Deck Light".to_string();
    config.api.base_url = "http://localhost:4000/dash".to_string();
    config.api.timeout_secs = 3;
    config.palette.debounce_ms = 150;
    config.palette.min_query_len = 3;
    config.palette.result_limit = 25;
    config.ui.sidebar_collapsed = true;
    config.ui.export_dir = std::path::PathBuf::from("/tmp/exports");
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let reloaded = Config::from_sources(parse(&config.to_toml()), no_env);
    assert_eq!(reloaded, config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::from_sources(parse(""), no_env);
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_sources(parse("[palette]\ndebounce_ms = 500\n"), no_env);
    assert_eq!(config.palette.debounce_ms, 500);
    assert_eq!(config.palette.min_query_len, 2);
    assert_eq!(config.api, ApiConfig::default());
}

#[test]
fn test_env_overrides_file() {
    let env: HashMap<&str, &str> = [
        ("SPECDECK_API_URL", "http://10.0.0.2:9000"),
        ("SPECDECK_THEME", "Deck Light"),
    ]
    .into_iter()
    .collect();

    let file = parse("theme = \"Deck Dark\"\n[api]\nbase_url = \"http://file:1\"\n");
    let config = Config::from_sources(file, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
    assert_eq!(config.theme, "Deck Light");
}

#[test]
fn test_zero_values_fall_back_to_defaults() {
    let file = parse("[api]\ntimeout_secs = 0\n[palette]\nmin_query_len = 0\nresult_limit = 0\n");
    let config = Config::from_sources(file, no_env);

    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.palette.min_query_len, 2);
    assert_eq!(config.palette.result_limit, 10);
}

#[test]
fn test_unknown_rotation_means_daily() {
    let config = Config::from_sources(parse("[logging]\nfile_rotation = \"weekly\"\n"), no_env);
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_invalid_type_is_a_parse_error() {
    let parsed: Result<FileConfig, _> = toml::from_str("[ui]\nsidebar_collapsed = \"yes\"\n");
    assert!(parsed.is_err());
}
