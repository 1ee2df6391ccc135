//! # Clock Generator Tests

use pretty_assertions::assert_eq;

use vpisim_core::SimError;
use vpisim_core::common::SimTime;
use vpisim_core::sim::clock::{self, clock_routine};
use vpisim_core::vpi::{
    CbReason, CbRequest, Handle, RoutineKind, StartupRoutine, StartupTable, ValueFormat,
    VpiValue,
};

use crate::common::harness::{driver, kernel};
use crate::common::mocks::design::{EventLog, MockDesign, event_log, events, record};

/// Records `<value>@<time>` whenever `TOP.mock.clk` changes.
fn watch_clk(log: &EventLog) -> StartupRoutine {
    let log = log.clone();
    StartupRoutine::new("watch clk", RoutineKind::CallbackRegistration, move |vpi| {
        let clk = vpi.handle_by_name("TOP.mock.clk", None)?;
        let _ = vpi.register_cb(CbRequest::value_change(
            clk,
            ValueFormat::Scalar,
            move |vpi, data| {
                let level = data.value.as_ref().map(ToString::to_string);
                record(&log, format!("{}@{}", level.unwrap_or_default(), vpi.time()));
                Ok(())
            },
        ))?;
        Ok(())
    })
}

#[test]
fn test_start_clears_clock_and_schedules_first_toggle() {
    let mut k = kernel(MockDesign::new(event_log()));
    let clk = Handle::Signal(MockDesign::CLK);
    {
        let mut vpi = k.vpi();
        vpi.put_value(clk, &VpiValue::Scalar(true)).unwrap();
        let _ = clock::start(&mut vpi, clk, 3).unwrap();
    }
    assert_eq!(k.design().peek(MockDesign::CLK), 0);
    assert_eq!(k.registry().pending(CbReason::AfterDelay), 1);
    assert_eq!(k.registry().next_due(), Some(SimTime(3)));
}

#[test]
fn test_toggles_every_half_period() {
    let log = event_log();
    let table = StartupTable::new()
        .with(clock_routine("TOP.mock.clk", 2))
        .with(watch_clk(&log));
    let log_without_evals = |log: &EventLog| -> Vec<String> {
        events(log)
            .into_iter()
            .filter(|e| !e.starts_with("eval"))
            .collect()
    };

    let summary = driver(MockDesign::new(log.clone()), Some(9))
        .run(table)
        .unwrap();

    // Toggles land in the timed phase at 2, 4, 6, 8 and are observed by the
    // value-change phase of the following step.
    assert_eq!(log_without_evals(&log), vec!["1@3", "0@5", "1@7"]);
    assert_eq!(summary.stats.after_delay, 4);
}

#[test]
fn test_zero_half_period_is_rejected() {
    let err = driver(MockDesign::new(event_log()), Some(1))
        .run(StartupTable::new().with(clock_routine("TOP.mock.clk", 0)))
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidCallback {
            reason: "cbAfterDelay",
            ..
        }
    ));
}

#[test]
fn test_missing_clock_signal_is_fatal() {
    let log = event_log();
    let err = driver(MockDesign::new(log.clone()), Some(1))
        .run(StartupTable::new().with(clock_routine("TOP.mock.nope", 1)))
        .unwrap_err();
    assert!(matches!(err, SimError::HandleNotFound { name, .. } if name == "TOP.mock.nope"));
    assert!(events(&log).is_empty());
}

#[test]
fn test_clock_on_scope_is_rejected() {
    let err = driver(MockDesign::new(event_log()), Some(1))
        .run(StartupTable::new().with(clock_routine("TOP.mock", 1)))
        .unwrap_err();
    assert!(matches!(err, SimError::WrongObjectKind { .. }));
}

#[test]
fn test_routine_name_mentions_signal() {
    let routine = clock_routine("TOP.mock.clk", 1);
    assert_eq!(routine.name(), "clock(TOP.mock.clk)");
    assert_eq!(routine.kind(), RoutineKind::CallbackRegistration);
}
