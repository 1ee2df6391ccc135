//! Clock generator.
//!
//! Drives a 1-bit signal the way a verification client would: the signal is
//! cleared at startup, then each `cbAfterDelay` callback inverts it and
//! schedules the next toggle `half_period` ticks later. With a half period of
//! `h`, rising edges land at `h`, `3h`, `5h`, ...

use crate::common::{Result, SimError};
use crate::vpi::{
    CbId, CbReason, CbRequest, Handle, RoutineKind, StartupRoutine, ValueFormat, Vpi, VpiValue,
};

/// Startup routine that drives `signal` with the given half period.
///
/// The routine fails with `SimError::HandleNotFound` if `signal` does not
/// exist, and with `SimError::InvalidCallback` if `half_period` is zero.
pub fn clock_routine(signal: impl Into<String>, half_period: u64) -> StartupRoutine {
    let signal = signal.into();
    StartupRoutine::new(
        format!("clock({signal})"),
        RoutineKind::CallbackRegistration,
        move |vpi| {
            let clk = vpi.handle_by_name(&signal, None)?;
            start(vpi, clk, half_period).map(|_| ())
        },
    )
}

/// Clears `clk` and schedules its first toggle. Returns the pending
/// callback's id.
///
/// # Errors
///
/// Returns `SimError::InvalidCallback` if `half_period` is zero, or
/// `SimError::WrongObjectKind` if `clk` is a scope.
pub fn start(vpi: &mut Vpi<'_>, clk: Handle, half_period: u64) -> Result<CbId> {
    if half_period == 0 {
        return Err(SimError::InvalidCallback {
            reason: CbReason::AfterDelay.vpi_name(),
            detail: "clock half period must be non-zero".to_string(),
        });
    }
    vpi.put_value(clk, &VpiValue::Scalar(false))?;
    schedule_toggle(vpi, clk, half_period)
}

fn schedule_toggle(vpi: &mut Vpi<'_>, clk: Handle, half_period: u64) -> Result<CbId> {
    vpi.register_cb(CbRequest::after_delay(half_period, move |vpi, _| {
        let high = matches!(
            vpi.get_value(clk, ValueFormat::Scalar)?,
            VpiValue::Scalar(true)
        );
        vpi.put_value(clk, &VpiValue::Scalar(!high))?;
        schedule_toggle(vpi, clk, half_period).map(|_| ())
    }))
}
