//! Simulation kernel.
//!
//! The kernel owns everything a simulation needs side by side: the design
//! instance, its object table, the callback registry, the clock and the
//! process arguments. It offers the primitives the driver sequences:
//! 1. **Bootstrap:** Run supported startup routines, skip the rest.
//! 2. **Dispatch:** Fire callbacks for one reason, value changes, or due timers.
//! 3. **Evaluate:** Run one design step and latch any finish request.
//! 4. **Time:** Advance the clock by one tick (driver only).
//!
//! An error returned by any routine stops the pass immediately; callbacks
//! after it in the same pass are not invoked.

use std::fmt;

use tracing::{debug, trace, warn};

use super::args::CommandArgs;
use crate::common::{Result, SimClock, SimTime};
use crate::design::{Design, EvalContext};
use crate::stats::DispatchStats;
use crate::vpi::callback::{CallbackRegistry, CbReason, Entry};
use crate::vpi::startup::{BootstrapReport, Capabilities, StartupTable};
use crate::vpi::{Handle, ObjectTable, Vpi, VpiValue};

/// Kernel state for one simulation.
pub struct Kernel {
    design: Box<dyn Design>,
    objects: ObjectTable,
    registry: CallbackRegistry,
    clock: SimClock,
    args: CommandArgs,
    finished: bool,
    stats: DispatchStats,
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("design", &self.design.name())
            .field("objects", &self.objects)
            .field("registry", &self.registry)
            .field("clock", &self.clock)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Kernel {
    /// Takes ownership of `design` and indexes its signals.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidDesign` if the design's names do not form a
    /// valid hierarchy.
    pub fn new(design: Box<dyn Design>, args: CommandArgs) -> Result<Self> {
        let objects = ObjectTable::build(design.signals())?;
        debug!(
            design = design.name(),
            scopes = objects.scope_count(),
            signals = objects.signal_count(),
            "design indexed"
        );
        Ok(Self {
            design,
            objects,
            registry: CallbackRegistry::new(),
            clock: SimClock::new(),
            args,
            finished: false,
            stats: DispatchStats::default(),
        })
    }

    /// Interface context for host-side access between steps.
    pub fn vpi(&mut self) -> Vpi<'_> {
        Vpi::new(
            self.design.as_mut(),
            &self.objects,
            &mut self.registry,
            &self.clock,
            &self.args,
            &mut self.finished,
        )
    }

    /// Current simulated time.
    pub const fn time(&self) -> SimTime {
        self.clock.now()
    }

    /// Whether finish has been requested by the design or a client.
    pub const fn got_finish(&self) -> bool {
        self.finished
    }

    /// The design under simulation.
    pub fn design(&self) -> &dyn Design {
        self.design.as_ref()
    }

    /// Object table of the design.
    pub const fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    /// Callback registry.
    pub const fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Process arguments.
    pub const fn args(&self) -> &CommandArgs {
        &self.args
    }

    /// Counters collected so far.
    pub const fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Runs every routine `capabilities` supports, in table order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a routine; later routines do not run.
    pub fn bootstrap(
        &mut self,
        table: StartupTable,
        capabilities: Capabilities,
    ) -> Result<BootstrapReport> {
        let mut report = BootstrapReport::default();
        for (index, routine) in table.into_routines().into_iter().enumerate() {
            if !capabilities.supports(routine.kind()) {
                warn!(
                    index,
                    routine = routine.name(),
                    kind = ?routine.kind(),
                    "skipping startup routine unsupported by this backend"
                );
                report.skipped.push(index);
                self.stats.startup_skipped += 1;
                continue;
            }
            trace!(index, routine = routine.name(), "invoking startup routine");
            routine.invoke(&mut self.vpi())?;
            report.invoked.push(index);
            self.stats.startup_invoked += 1;
        }
        Ok(report)
    }

    /// Invokes one callback entry.
    fn fire(&mut self, entry: &mut Entry, value: Option<VpiValue>) -> Result<()> {
        let data = entry.data(self.clock.now(), value);
        trace!(id = %data.id, reason = %data.reason, time = %data.time, "callback");
        let mut vpi = self.vpi();
        (entry.routine)(&mut vpi, &data)
    }

    /// Ends a dispatch pass and records how many callbacks fired.
    fn settle(&mut self, reason: CbReason, fired: usize, outcome: Result<()>) -> Result<usize> {
        self.registry.end_dispatch();
        self.stats.record(reason, fired);
        if fired > 0 {
            debug!(%reason, fired, time = %self.clock.now(), "dispatched");
        }
        outcome.map(|()| fired)
    }

    /// Fires every callback registered for `reason` (`callCbs`).
    ///
    /// Start-of-simulation, end-of-simulation and read-write-synch callbacks
    /// are consumed. `ValueChange` and `AfterDelay` are forwarded to
    /// [`Kernel::call_value_cbs`] and [`Kernel::call_timed_cbs`].
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback.
    pub fn call_cbs(&mut self, reason: CbReason) -> Result<usize> {
        match reason {
            CbReason::ValueChange => return self.call_value_cbs(),
            CbReason::AfterDelay => return self.call_timed_cbs(),
            CbReason::StartOfSimulation | CbReason::EndOfSimulation | CbReason::ReadWriteSynch => {}
        }

        let batch = self.registry.take(reason);
        let mut fired = 0;
        let mut outcome = Ok(());
        for mut entry in batch {
            if self.registry.is_cancelled(entry.id) {
                continue;
            }
            fired += 1;
            outcome = self.fire(&mut entry, None);
            if outcome.is_err() {
                break;
            }
        }
        self.settle(reason, fired, outcome)
    }

    /// Fires value-change callbacks whose signal differs from the value
    /// last reported (`callValueCbs`). The callbacks stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback.
    pub fn call_value_cbs(&mut self) -> Result<usize> {
        let reason = CbReason::ValueChange;
        let mut batch = self.registry.take(reason).into_iter();
        let mut kept = Vec::with_capacity(batch.len());
        let mut fired = 0;
        let mut outcome = Ok(());

        for mut entry in batch.by_ref() {
            if self.registry.is_cancelled(entry.id) {
                continue;
            }
            if let Some(Handle::Signal(index)) = entry.obj {
                let bits = self.design.peek(index);
                if bits != entry.last {
                    entry.last = bits;
                    let format = entry.format;
                    outcome = match self.objects.signal(index) {
                        Ok(decl) => {
                            let value = VpiValue::from_bits(bits, decl.width, format);
                            fired += 1;
                            self.fire(&mut entry, Some(value))
                        }
                        Err(e) => Err(e),
                    };
                }
            }
            kept.push(entry);
            if outcome.is_err() {
                break;
            }
        }

        kept.extend(batch);
        self.registry.restore(reason, kept);
        self.settle(reason, fired, outcome)
    }

    /// Fires timed callbacks due at or before the current time
    /// (`callTimedCbs`). Each fires once.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback.
    pub fn call_timed_cbs(&mut self) -> Result<usize> {
        let batch = self.registry.take_due(self.clock.now());
        let mut fired = 0;
        let mut outcome = Ok(());
        for mut entry in batch {
            if self.registry.is_cancelled(entry.id) {
                continue;
            }
            fired += 1;
            outcome = self.fire(&mut entry, None);
            if outcome.is_err() {
                break;
            }
        }
        self.settle(CbReason::AfterDelay, fired, outcome)
    }

    /// Evaluates one step of the design at the current time.
    pub fn eval(&mut self) {
        let mut ctx = EvalContext::new(self.clock.now());
        self.design.eval(&mut ctx);
        if ctx.finish_requested() && !self.finished {
            debug!(time = %self.clock.now(), "design requested finish");
            self.finished = true;
        }
    }

    /// Advances simulated time by one tick and counts the completed step.
    pub(crate) const fn advance_time(&mut self) -> SimTime {
        self.stats.steps += 1;
        self.clock.advance()
    }

    /// Releases the kernel and returns the design instance.
    pub fn into_design(self) -> Box<dyn Design> {
        self.design
    }
}
