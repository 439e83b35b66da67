//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use modelbox::config::AppConfig;
use serial_test::serial;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("modelbox_config_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("MODELBOX_VIEWER__MODEL_URL", "from_env.glb");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("MODELBOX_VIEWER__MODEL_URL");
    assert_eq!(config.viewer.model_url.as_deref(), Some("from_env.glb"));
}

#[test]
#[serial]
fn test_default_file_loading() {
    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    assert_eq!(config.xr.session_mode, "immersive-vr");
    assert_eq!(config.markers.opacity, 0.8);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user");
    fs::write(dir.join("default.toml"), "[viewer]\nsettle_delay_ms = 500\nwidth = 800\n").unwrap();
    fs::write(dir.join("user.toml"), "[viewer]\nsettle_delay_ms = 100\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.viewer.settle_delay_ms, 100);
    assert_eq!(config.viewer.width, 800);
}

#[test]
#[serial]
fn test_env_overrides_files() {
    let dir = scratch_dir("env");
    fs::write(dir.join("default.toml"), "[input]\ndouble_click_ms = 300\n").unwrap();

    std::env::set_var("MODELBOX_INPUT__DOUBLE_CLICK_MS", "450");
    let config = AppConfig::load_from(&dir);
    std::env::remove_var("MODELBOX_INPUT__DOUBLE_CLICK_MS");
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.unwrap().input.double_click_ms, 450);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.viewer.settle_delay_ms, 500);
    assert_eq!(config.camera.radius, 20.0);
}

#[test]
#[serial]
fn test_invalid_value_is_config_error() {
    std::env::set_var("MODELBOX_VIEWER__WIDTH", "wide");
    let result = AppConfig::load_from("does/not/exist");
    std::env::remove_var("MODELBOX_VIEWER__WIDTH");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
