//! Startup routines.
//!
//! Client libraries hook into the simulator through a table of routines run
//! once before simulation starts. Each routine is tagged with what it does;
//! routines the backend cannot support are skipped instead of invoked:
//! 1. **Callback registration:** Always supported.
//! 2. **System-task registration:** Requires `Capabilities::system_tasks`.
//! 3. **General:** Always supported.
//!
//! Tables written against the classic `vlog_startup_routines` convention can
//! be imported with `StartupTable::from_legacy`, which tags the well-known
//! system-task slot explicitly.

use std::fmt;

use super::context::Vpi;
use crate::common::Result;
use crate::common::constants::LEGACY_SYSTF_SLOT;

/// What a startup routine registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    /// Registers simulation callbacks.
    CallbackRegistration,
    /// Registers user system tasks and functions (`vpi_register_systf`).
    SystemTaskRegistration,
    /// Anything else.
    General,
}

/// Features offered by the simulator backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Whether user system tasks can be registered.
    pub system_tasks: bool,
}

impl Capabilities {
    /// Whether a routine of `kind` can run on this backend.
    pub const fn supports(&self, kind: RoutineKind) -> bool {
        match kind {
            RoutineKind::SystemTaskRegistration => self.system_tasks,
            RoutineKind::CallbackRegistration | RoutineKind::General => true,
        }
    }
}

/// Body of a startup routine.
pub type StartupFn = Box<dyn FnOnce(&mut Vpi<'_>) -> Result<()>>;

/// A named, tagged startup routine.
pub struct StartupRoutine {
    name: String,
    kind: RoutineKind,
    routine: StartupFn,
}

impl fmt::Debug for StartupRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartupRoutine")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl StartupRoutine {
    /// Creates a routine.
    pub fn new<F>(name: impl Into<String>, kind: RoutineKind, routine: F) -> Self
    where
        F: FnOnce(&mut Vpi<'_>) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            kind,
            routine: Box::new(routine),
        }
    }

    /// Name used in logs and reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag of the routine.
    pub const fn kind(&self) -> RoutineKind {
        self.kind
    }

    /// Runs the routine.
    pub(crate) fn invoke(self, vpi: &mut Vpi<'_>) -> Result<()> {
        (self.routine)(vpi)
    }
}

/// Ordered list of startup routines.
#[derive(Debug, Default)]
pub struct StartupTable {
    routines: Vec<StartupRoutine>,
}

impl StartupTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports a sentinel-terminated routine list.
    ///
    /// Reading stops at the first `None`. The routine at
    /// [`LEGACY_SYSTF_SLOT`] is tagged as system-task registration, every
    /// other one as callback registration.
    pub fn from_legacy<I, F>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<F>>,
        F: FnOnce(&mut Vpi<'_>) -> Result<()> + 'static,
    {
        let routines = slots
            .into_iter()
            .map_while(|slot| slot)
            .enumerate()
            .map(|(index, routine)| {
                let kind = if index == LEGACY_SYSTF_SLOT {
                    RoutineKind::SystemTaskRegistration
                } else {
                    RoutineKind::CallbackRegistration
                };
                StartupRoutine::new(format!("vlog_startup_routines[{index}]"), kind, routine)
            })
            .collect();
        Self { routines }
    }

    /// Appends a routine.
    pub fn push(&mut self, routine: StartupRoutine) {
        self.routines.push(routine);
    }

    /// Appends a routine, builder style.
    #[must_use]
    pub fn with(mut self, routine: StartupRoutine) -> Self {
        self.push(routine);
        self
    }

    /// Number of routines.
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    /// Kinds of the routines, in order.
    pub fn kinds(&self) -> Vec<RoutineKind> {
        self.routines.iter().map(StartupRoutine::kind).collect()
    }

    pub(crate) fn into_routines(self) -> Vec<StartupRoutine> {
        self.routines
    }
}

/// Outcome of bootstrapping a startup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Indices of routines that ran, in order.
    pub invoked: Vec<usize>,
    /// Indices of routines skipped for lack of backend support.
    pub skipped: Vec<usize>,
}
