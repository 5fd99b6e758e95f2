//! Config tests - JSON tuning files and validation

use std::fs;

use quadtris::core::{ConfigError, LevelEntry, Session, SessionConfig};
use quadtris::types::{LOCK_DELAY_MS, TICK_MS};

#[test]
fn test_empty_object_is_default() {
    let config = SessionConfig::from_json_str("{}").unwrap();
    assert_eq!(config, SessionConfig::default());
}

#[test]
fn test_partial_override() {
    let config = SessionConfig::from_json_str(r#"{ "lock_delay_ms": 250, "preview_len": 3 }"#)
        .unwrap();
    assert_eq!(config.lock_delay_ms, 250);
    assert_eq!(config.preview_len, 3);
    assert_eq!(config.frame_ms, TICK_MS);
    assert_eq!(config.levels.len(), 12);
}

#[test]
fn test_custom_level_table() {
    let json = serde_json::json!({
        "levels": [
            { "level": 1, "ticks_per_fall": 30, "lines_required": 0 },
            { "level": 2, "ticks_per_fall": 10, "lines_required": 5 }
        ]
    });
    let config = SessionConfig::from_json_str(&json.to_string()).unwrap();
    assert_eq!(
        config.levels,
        vec![LevelEntry::new(1, 30, 0), LevelEntry::new(2, 10, 5)]
    );
    assert_eq!(config.lock_delay_ms, LOCK_DELAY_MS);

    let session = Session::with_config(config, 1).unwrap();
    assert_eq!(session.ticks_per_fall(), 30);
}

#[test]
fn test_invalid_tables_are_rejected() {
    let cases = [
        (r#"{ "levels": [] }"#, "empty"),
        (
            r#"{ "levels": [{ "level": 1, "ticks_per_fall": 30, "lines_required": 3 }] }"#,
            "first",
        ),
        (
            r#"{ "levels": [{ "level": 1, "ticks_per_fall": 0, "lines_required": 0 }] }"#,
            "zero",
        ),
        (r#"{ "preview_len": 9 }"#, "preview"),
    ];
    for (json, name) in cases {
        let err = SessionConfig::from_json_str(json).unwrap_err();
        let ok = match name {
            "empty" => matches!(err, ConfigError::EmptyLevels),
            "first" => matches!(err, ConfigError::FirstLevelRequiresLines(3)),
            "zero" => matches!(err, ConfigError::ZeroTicksPerFall { level: 1 }),
            _ => matches!(err, ConfigError::PreviewLen { got: 9, .. }),
        };
        assert!(ok, "{name}: {err}");
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = SessionConfig::from_json_str("{ lock_delay_ms: }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("quadtris-config-{}.json", std::process::id()));
    let config = SessionConfig {
        frame_ms: 20,
        ..SessionConfig::default()
    };
    fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

    let loaded = SessionConfig::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SessionConfig::load("/nonexistent/quadtris.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
