//! # Error Tests
//!
//! Display formatting and classification of `SimError`.

use vpisim_core::SimError;

#[test]
fn test_handle_not_found_display_includes_location_and_name() {
    let err = SimError::HandleNotFound {
        name: "TOP.dut.missing".to_string(),
        file: "client.rs",
        line: 42,
    };
    assert_eq!(
        err.to_string(),
        "client.rs:42: no handle found for `TOP.dut.missing`"
    );
}

#[test]
fn test_wrong_object_kind_display() {
    let err = SimError::WrongObjectKind {
        name: "TOP.counter".to_string(),
        found: "vpiModule",
        expected: "signal",
    };
    assert_eq!(err.to_string(), "`TOP.counter` is a vpiModule, expected a signal");
}

#[test]
fn test_invalid_handle_display() {
    let err = SimError::InvalidHandle {
        handle: "signal#99".to_string(),
    };
    assert_eq!(err.to_string(), "unknown handle signal#99");
    assert!(!err.is_fatal_wiring());
}

#[test]
fn test_invalid_value_display() {
    let err = SimError::InvalidValue {
        signal: "TOP.counter.count".to_string(),
        reason: "empty value string".to_string(),
    };
    assert!(err.to_string().contains("TOP.counter.count"));
    assert!(err.to_string().contains("empty value string"));
}

#[test]
fn test_invalid_callback_display_names_reason() {
    let err = SimError::InvalidCallback {
        reason: "cbValueChange",
        detail: "no object to watch".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "cannot register cbValueChange callback: no object to watch"
    );
}

#[test]
fn test_config_display_names_path() {
    let err = SimError::Config {
        path: "run.json".to_string(),
        reason: "expected value".to_string(),
    };
    assert!(err.to_string().contains("`run.json`"));
}

#[test]
fn test_only_missing_handles_are_wiring_errors() {
    let missing = SimError::HandleNotFound {
        name: "x".to_string(),
        file: "f.rs",
        line: 1,
    };
    let design = SimError::InvalidDesign {
        design: "counter".to_string(),
        reason: "width 0".to_string(),
    };
    assert!(missing.is_fatal_wiring());
    assert!(!design.is_fatal_wiring());
}
