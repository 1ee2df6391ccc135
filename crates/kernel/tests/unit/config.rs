//! # Configuration Tests
//!
//! Defaults, partial JSON deserialization, and file loading.

use std::io::Write;

use vpisim_core::SimError;
use vpisim_core::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.debug, 0);
    assert!(!config.general.internals_dump);
    assert_eq!(config.general.max_steps, None);
    assert!(!config.general.system_tasks);
    assert_eq!(config.design.kind, DesignKind::Counter);
    assert_eq!(config.clock.signal, None);
    assert_eq!(config.clock.half_period, 1);
}

#[test]
fn test_design_config_defaults() {
    let design = DesignConfig::default();
    assert_eq!(design.counter.width, 32);
    assert_eq!(design.counter.finish_at, None);
    assert_eq!(design.matrix.data_width, 8);
    assert_eq!(design.matrix.a_rows, 4);
    assert_eq!(design.matrix.b_columns, 4);
    assert_eq!(design.matrix.a_columns_b_rows, 4);
}

#[test]
fn test_empty_json_is_default() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.general.debug, 0);
    assert_eq!(config.design.kind, DesignKind::Counter);
    assert_eq!(config.clock.half_period, 1);
}

#[test]
fn test_partial_sections_keep_field_defaults() {
    let json = r#"{
        "general": { "max_steps": 500 },
        "design": { "counter": { "finish_at": 10 } },
        "clock": { "signal": "TOP.counter.clk" }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.general.max_steps, Some(500));
    assert_eq!(config.general.debug, 0);
    assert_eq!(config.design.counter.width, 32);
    assert_eq!(config.design.counter.finish_at, Some(10));
    assert_eq!(config.clock.signal.as_deref(), Some("TOP.counter.clk"));
    assert_eq!(config.clock.half_period, 1);
}

#[test]
fn test_design_kind_accepts_matrix_alias() {
    let config: Config = serde_json::from_str(r#"{ "design": { "kind": "matrix" } }"#).unwrap();
    assert_eq!(config.design.kind, DesignKind::MatrixMultiplier);
}

#[test]
fn test_unknown_design_kind_is_rejected() {
    let result: Result<Config, _> = serde_json::from_str(r#"{ "design": { "kind": "cpu" } }"#);
    assert!(result.is_err());
}

#[test]
fn test_from_file_reads_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "general": {{ "debug": 3, "system_tasks": true }}, "clock": {{ "half_period": 4 }} }}"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.general.debug, 3);
    assert!(config.general.system_tasks);
    assert_eq!(config.clock.half_period, 4);
}

#[test]
fn test_from_file_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, SimError::Config { path: p, .. } if p.ends_with("absent.json")));
}

#[test]
fn test_from_file_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ \"general\": ").unwrap();
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, SimError::Config { .. }));
}
