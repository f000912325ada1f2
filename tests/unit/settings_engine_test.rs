//! Unit tests for the settings engine: load, save, dot-notation updates.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use skillportal::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use skillportal::types::errors::SettingsError;
use skillportal::types::settings::PortalSettings;

fn setup() -> (SettingsEngine, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("nested").join("settings.json");
    let engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    (engine, tmp)
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let (mut engine, _tmp) = setup();
    let settings = engine.load().unwrap();
    assert_eq!(settings, PortalSettings::default());
    assert_eq!(settings.filter.show_delay_ms, 50);
    assert_eq!(settings.reveal.root_margin_px, 40.0);
    assert_eq!(settings.reveal.threshold, 0.1);
    assert!(settings.sync.remote_url.is_none());
    assert!(settings.sync.timeout_ms.is_none());
}

#[test]
fn test_save_creates_parent_dirs_and_reloads() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();
    engine
        .set_value("sync.remote_url", json!("https://api.example.com/v1"))
        .unwrap();

    let mut reloaded = SettingsEngine::new(Some(engine.get_config_path().to_string()));
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.sync.remote_url.as_deref(), Some("https://api.example.com/v1"));
}

#[test]
fn test_malformed_file_is_error() {
    let (mut engine, tmp) = setup();
    std::fs::create_dir_all(tmp.path().join("nested")).unwrap();
    std::fs::write(engine.get_config_path(), "{ broken").unwrap();

    let result = engine.load();
    assert!(matches!(result, Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_set_value_updates_derived_configs() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();

    engine.set_value("filter.show_delay_ms", json!(120)).unwrap();
    engine.set_value("sync.timeout_ms", json!(5000)).unwrap();

    assert_eq!(engine.show_delay(), Duration::from_millis(120));
    assert_eq!(engine.sync_engine_config().timeout, Some(Duration::from_millis(5000)));
}

#[test]
fn test_set_value_unknown_key() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();
    let result = engine.set_value("theme.mode", json!("dark"));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_invalid_type_leaves_settings_unchanged() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();
    let result = engine.set_value("reveal.threshold", json!("high"));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().reveal.threshold, 0.1);
}

#[test]
fn test_reset_restores_defaults() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();
    engine.set_value("logging.filter", json!("debug")).unwrap();

    engine.reset().unwrap();
    assert_eq!(engine.get_settings(), &PortalSettings::default());

    let mut reloaded = SettingsEngine::new(Some(engine.get_config_path().to_string()));
    assert_eq!(reloaded.load().unwrap().logging.filter, "info");
}
