use serde_json::json;
use crate::error::Error;
use super::*;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_full_document() {
    let config = EngineConfig::from_json_str(r#"{
        "Application": {
            "App Name": "Editor",
            "Org Name": "Studio",
            "Max FPS": 60,
            "VSYNC": true,
            "Time Scale": 0.5,
            "Scene File": "scene.json"
        },
        "Camera": { "Speed": 12.0 },
        "Renderer": { "Culling": false }
    }"#).unwrap();

    assert_eq!(config.application.app_name, "Editor");
    assert_eq!(config.application.max_fps, 60);
    assert!(config.application.vsync);
    assert_eq!(config.application.time_scale, 0.5);
    assert_eq!(config.application.scene_file.as_deref(), Some("scene.json"));
    assert_eq!(config.module_section("Camera"), Some(&json!({ "Speed": 12.0 })));
    assert_eq!(config.modules.len(), 2);
}

#[test]
fn test_missing_fields_use_defaults() {
    let config = EngineConfig::from_json_str(r#"{ "Application": { "Max FPS": 30 } }"#).unwrap();

    assert_eq!(config.application.max_fps, 30);
    assert_eq!(config.application.time_scale, 1.0);
    assert_eq!(config.application.app_name, "Nimbus3D");

    let empty = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(empty, EngineConfig::default());
}

#[test]
fn test_malformed_document_is_config_error() {
    assert!(matches!(EngineConfig::from_json_str("[1, 2"), Err(Error::ConfigError(_))));
    assert!(matches!(
        EngineConfig::from_json_str(r#"{ "Application": { "Max FPS": "fast" } }"#),
        Err(Error::ConfigError(_))
    ));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = EngineConfig::default();
    config.application.max_fps = 144;
    config.set_module_section("Camera", json!({ "Speed": 3.0 }));
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"Max FPS\": 144"));
    assert!(!text.contains("Scene File"));
}

#[test]
fn test_load_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(EngineConfig::load(dir.path().join("absent.json")), Err(Error::ConfigError(_))));
}

#[test]
fn test_log_level_parsed_by_name() {
    let config = EngineConfig::from_json_str(r#"{ "Application": { "Log Level": "Warn" } }"#).unwrap();
    assert_eq!(config.application.log_level, crate::log::LogSeverity::Warn);
    assert_eq!(EngineConfig::default().application.log_level, crate::log::LogSeverity::Trace);
    assert!(EngineConfig::from_json_str(r#"{ "Application": { "Log Level": "Loud" } }"#).is_err());
}
