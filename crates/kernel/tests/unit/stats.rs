//! # Dispatch Statistics Tests

use vpisim_core::stats::DispatchStats;
use vpisim_core::vpi::CbReason;

#[test]
fn test_default_is_zeroed() {
    let stats = DispatchStats::default();
    assert_eq!(stats.steps, 0);
    assert_eq!(stats.total_callbacks(), 0);
    assert_eq!(stats.startup_invoked, 0);
    assert_eq!(stats.startup_skipped, 0);
}

#[test]
fn test_record_routes_to_reason_counter() {
    let mut stats = DispatchStats::default();
    stats.record(CbReason::StartOfSimulation, 1);
    stats.record(CbReason::ValueChange, 3);
    stats.record(CbReason::ValueChange, 2);
    stats.record(CbReason::AfterDelay, 4);
    stats.record(CbReason::ReadWriteSynch, 0);
    stats.record(CbReason::EndOfSimulation, 1);

    assert_eq!(stats.callbacks(CbReason::StartOfSimulation), 1);
    assert_eq!(stats.callbacks(CbReason::ValueChange), 5);
    assert_eq!(stats.value_change, 5);
    assert_eq!(stats.callbacks(CbReason::AfterDelay), 4);
    assert_eq!(stats.callbacks(CbReason::ReadWriteSynch), 0);
    assert_eq!(stats.callbacks(CbReason::EndOfSimulation), 1);
    assert_eq!(stats.total_callbacks(), 11);
}

#[test]
fn test_host_seconds_is_non_negative() {
    let stats = DispatchStats::default();
    assert!(stats.host_seconds() >= 0.0);
}

#[test]
fn test_print_does_not_panic() {
    let mut stats = DispatchStats::default();
    stats.steps = 10;
    stats.record(CbReason::AfterDelay, 9);
    stats.print();
}
