//! Diagnostics.
//!
//! `internals_dump` renders the scope tree with current signal values.
//! `read_and_check` resolves a signal by name and reads it; a name that does
//! not resolve is reported as `SimError::HandleNotFound`, which the driver
//! treats as fatal. `probe_routine` wraps it as a startup routine.

use std::fmt::Write as _;

use tracing::info;

use super::kernel::Kernel;
use crate::common::Result;
use crate::vpi::{
    CbRequest, Handle, ObjectTable, RoutineKind, StartupRoutine, ValueFormat, Vpi, VpiValue,
};

/// Renders every scope and signal, indented by depth.
///
/// # Errors
///
/// Returns `SimError::InvalidHandle` if the object table and the design
/// disagree about the hierarchy.
pub fn internals_dump(kernel: &Kernel) -> Result<String> {
    let mut out = String::new();
    let objects = kernel.objects();
    for root in objects.children(None)? {
        dump_object(kernel, objects, root, 0, &mut out)?;
    }
    Ok(out)
}

fn dump_object(
    kernel: &Kernel,
    objects: &ObjectTable,
    handle: Handle,
    depth: usize,
    out: &mut String,
) -> Result<()> {
    let indent = "  ".repeat(depth);
    match handle {
        Handle::Scope(_) => {
            let _ = writeln!(out, "{indent}scope {}", objects.full_name(handle)?);
            for child in objects.children(Some(handle))? {
                dump_object(kernel, objects, child, depth + 1, out)?;
            }
        }
        Handle::Signal(index) => {
            let decl = objects.signal(index)?;
            let bits = kernel.design().peek(index);
            let value = VpiValue::from_bits(bits, decl.width, ValueFormat::HexStr);
            let _ = writeln!(
                out,
                "{indent}{} {} [{}] = {value}",
                objects.kind(handle)?,
                objects.name(handle)?,
                decl.width,
            );
        }
    }
    Ok(())
}

/// What `read_and_check` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Short name of the signal.
    pub name: String,
    /// Full hierarchical name.
    pub full_name: String,
    /// Current value as an integer.
    pub value: i32,
}

/// Resolves `path` and reads its integer value.
///
/// # Errors
///
/// Returns `SimError::HandleNotFound` if `path` does not resolve, or
/// `SimError::WrongObjectKind` if it names a scope.
#[track_caller]
pub fn read_and_check(vpi: &Vpi<'_>, path: &str) -> Result<ProbeReport> {
    let handle = vpi.handle_by_name(path, None)?;
    let value = vpi
        .get_value(handle, ValueFormat::Int)?
        .as_int()
        .unwrap_or_default();
    Ok(ProbeReport {
        name: vpi.name(handle)?.to_string(),
        full_name: vpi.full_name(handle)?.to_string(),
        value,
    })
}

/// Startup routine that probes `paths` at start of simulation.
pub fn probe_routine(paths: Vec<String>) -> StartupRoutine {
    StartupRoutine::new("probe", RoutineKind::CallbackRegistration, move |vpi| {
        let _ = vpi.register_cb(CbRequest::start_of_simulation(move |vpi, _| {
            for path in &paths {
                let report = read_and_check(vpi, path)?;
                info!(
                    module = %report.name,
                    full_name = %report.full_name,
                    value = report.value,
                    "probe"
                );
            }
            Ok(())
        }))?;
        Ok(())
    })
}
