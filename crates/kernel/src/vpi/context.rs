//! The `Vpi` context.
//!
//! A `Vpi` borrows the kernel's design, object table, callback registry,
//! clock and command arguments for the duration of one client call. It is
//! the only way client routines touch the simulation.

use std::fmt;
use std::panic::Location;

use super::callback::{CallbackRegistry, CbId, CbReason, CbRequest};
use super::handle::{Handle, ObjectKind};
use super::object::ObjectTable;
use super::value::{ValueFormat, VpiValue};
use crate::common::constants::{PRODUCT, SCOPE_SEPARATOR, VERSION};
use crate::common::{Result, SimClock, SimError, SimTime};
use crate::design::Design;
use crate::sim::args::CommandArgs;

/// Simulator identification returned by `Vpi::vlog_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlogInfo<'a> {
    /// Product name.
    pub product: &'static str,
    /// Product version.
    pub version: &'static str,
    /// Process arguments as given to the kernel.
    pub argv: &'a [String],
}

/// Interface context for one client call.
pub struct Vpi<'a> {
    design: &'a mut dyn Design,
    objects: &'a ObjectTable,
    registry: &'a mut CallbackRegistry,
    clock: &'a SimClock,
    args: &'a CommandArgs,
    finish: &'a mut bool,
}

impl fmt::Debug for Vpi<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vpi")
            .field("design", &self.design.name())
            .field("time", &self.clock.now())
            .field("finish", &*self.finish)
            .finish_non_exhaustive()
    }
}

impl<'a> Vpi<'a> {
    pub(crate) fn new(
        design: &'a mut dyn Design,
        objects: &'a ObjectTable,
        registry: &'a mut CallbackRegistry,
        clock: &'a SimClock,
        args: &'a CommandArgs,
        finish: &'a mut bool,
    ) -> Self {
        Self {
            design,
            objects,
            registry,
            clock,
            args,
            finish,
        }
    }

    /// Current simulated time (`vpi_get_time`).
    pub fn time(&self) -> SimTime {
        self.clock.now()
    }

    /// Resolves a hierarchical name (`vpi_handle_by_name`).
    ///
    /// With a `scope`, `name` is relative to it; otherwise it is absolute.
    ///
    /// # Errors
    ///
    /// Returns `SimError::HandleNotFound` carrying the caller's location if
    /// nothing has that name, or `SimError::InvalidHandle` if `scope` is not
    /// an object of this kernel.
    #[track_caller]
    pub fn handle_by_name(&self, name: &str, scope: Option<Handle>) -> Result<Handle> {
        let caller = Location::caller();
        let full = match scope {
            Some(scope) => format!("{}{SCOPE_SEPARATOR}{name}", self.objects.full_name(scope)?),
            None => name.to_string(),
        };
        self.objects
            .lookup(&full)
            .ok_or_else(|| SimError::HandleNotFound {
                name: full,
                file: caller.file(),
                line: caller.line(),
            })
    }

    /// Short name of an object (`vpiName`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for a handle this kernel did not issue.
    pub fn name(&self, handle: Handle) -> Result<&str> {
        self.objects.name(handle)
    }

    /// Full hierarchical name of an object (`vpiFullName`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for a handle this kernel did not issue.
    pub fn full_name(&self, handle: Handle) -> Result<&str> {
        self.objects.full_name(handle)
    }

    /// Object type (`vpiType`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for a handle this kernel did not issue.
    pub fn kind(&self, handle: Handle) -> Result<ObjectKind> {
        self.objects.kind(handle)
    }

    /// Bit width (`vpiSize`); zero for scopes.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for a handle this kernel did not issue.
    pub fn size(&self, handle: Handle) -> Result<u32> {
        self.objects.size(handle)
    }

    /// Enclosing scope (`vpiScope`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for a handle this kernel did not issue.
    pub fn parent(&self, handle: Handle) -> Result<Option<Handle>> {
        self.objects.parent(handle)
    }

    /// Direct children of a scope, or top-level objects for `None` (`vpi_iterate`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for a handle this kernel did not issue.
    pub fn iterate(&self, scope: Option<Handle>) -> Result<Vec<Handle>> {
        self.objects.children(scope)
    }

    /// Validates `handle` and returns its signal index.
    fn signal_index(&self, handle: Handle) -> Result<usize> {
        let handle = self.objects.check(handle)?;
        match handle.signal_index() {
            Some(index) => Ok(index),
            None => Err(SimError::WrongObjectKind {
                name: self.objects.full_name(handle)?.to_string(),
                found: self.objects.kind(handle)?.vpi_name(),
                expected: "signal",
            }),
        }
    }

    /// Reads a signal in the requested format (`vpi_get_value`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::WrongObjectKind` if `handle` is a scope, or
    /// `SimError::InvalidHandle` if this kernel did not issue it.
    pub fn get_value(&self, handle: Handle, format: ValueFormat) -> Result<VpiValue> {
        let index = self.signal_index(handle)?;
        let width = self.objects.signal(index)?.width;
        Ok(VpiValue::from_bits(self.design.peek(index), width, format))
    }

    /// Writes a signal immediately (`vpi_put_value` with `vpiNoDelay`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::WrongObjectKind` if `handle` is a scope,
    /// `SimError::InvalidHandle` if this kernel did not issue it, or
    /// `SimError::InvalidValue` if the value cannot be parsed.
    pub fn put_value(&mut self, handle: Handle, value: &VpiValue) -> Result<()> {
        let index = self.signal_index(handle)?;
        let decl = self.objects.signal(index)?;
        let bits = value
            .to_bits(decl.width)
            .map_err(|reason| SimError::InvalidValue {
                signal: decl.name.clone(),
                reason,
            })?;
        self.design.poke(index, bits);
        Ok(())
    }

    /// Registers a callback (`vpi_register_cb`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidCallback` if a value-change request has no
    /// object or watches a scope, or `SimError::InvalidHandle` if its object
    /// was not issued by this kernel.
    pub fn register_cb(&mut self, request: CbRequest) -> Result<CbId> {
        if let Some(obj) = request.obj {
            let _ = self.objects.check(obj)?;
        }
        let initial = if request.reason == CbReason::ValueChange {
            let Some(obj) = request.obj else {
                return Err(SimError::InvalidCallback {
                    reason: request.reason.vpi_name(),
                    detail: "no object to watch".to_string(),
                });
            };
            let Some(index) = obj.signal_index() else {
                return Err(SimError::InvalidCallback {
                    reason: request.reason.vpi_name(),
                    detail: format!("`{}` is not a signal", self.objects.full_name(obj)?),
                });
            };
            self.design.peek(index)
        } else {
            0
        };
        let reason = request.reason;
        let id = self.registry.insert(request, self.clock.now(), initial);
        tracing::trace!(%id, %reason, time = %self.clock.now(), "registered callback");
        Ok(id)
    }

    /// Removes a callback (`vpi_remove_cb`). Returns `false` if it was
    /// unknown or already consumed.
    pub fn remove_cb(&mut self, id: CbId) -> bool {
        self.registry.remove(id)
    }

    /// Requests the end of simulation (`vpi_control(vpiFinish)`).
    ///
    /// The driver observes the request at the top of the next loop iteration.
    pub fn finish(&mut self) {
        *self.finish = true;
    }

    /// Whether finish has been requested.
    pub fn got_finish(&self) -> bool {
        *self.finish
    }

    /// Simulator identification and arguments (`vpi_get_vlog_info`).
    pub fn vlog_info(&self) -> VlogInfo<'_> {
        VlogInfo {
            product: PRODUCT,
            version: VERSION,
            argv: self.args.argv(),
        }
    }

    /// Parsed process arguments.
    pub fn args(&self) -> &CommandArgs {
        self.args
    }
}
