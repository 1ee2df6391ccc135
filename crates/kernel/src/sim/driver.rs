//! Simulation driver.
//!
//! Sequences a complete run on top of the kernel:
//!
//! 1. **Initialize:** Resolve the debug level, index the design, optionally dump internals.
//! 2. **Bootstrap:** Run the startup table, skipping unsupported routines.
//! 3. **Start:** Fire start-of-simulation callbacks once.
//! 4. **Loop:** Until finish is observed, per step: value-change callbacks,
//!    timed callbacks, read-write-synch callbacks, design evaluation, time
//!    advance. The order never changes.
//! 5. **Terminate:** Fire end-of-simulation callbacks once and release the design.
//!
//! Finish is polled only at the top of each iteration, so a finish requested
//! by a callback still lets that iteration's evaluation and time advance run.

use tracing::{debug, error, info};

use super::args::CommandArgs;
use super::diag;
use super::kernel::Kernel;
use crate::common::{Result, SimTime};
use crate::config::GeneralConfig;
use crate::design::Design;
use crate::stats::DispatchStats;
use crate::vpi::{BootstrapReport, Capabilities, CbReason, StartupTable, Vpi};

/// Why the evaluation loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The design or a client requested finish.
    Finished,
    /// The configured step limit was reached first.
    StepLimit,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Evaluation steps completed.
    pub steps: u64,
    /// Simulated time when the loop stopped.
    pub final_time: SimTime,
    /// Why the loop stopped.
    pub stop: StopReason,
    /// Startup routines invoked and skipped.
    pub bootstrap: BootstrapReport,
    /// Dispatch counters.
    pub stats: DispatchStats,
}

/// Fixed-order driver around a `Kernel`.
#[derive(Debug)]
pub struct SimulationDriver {
    kernel: Kernel,
    debug_level: u8,
    max_steps: Option<u64>,
    capabilities: Capabilities,
}

impl SimulationDriver {
    /// Initializes a run: takes ownership of `design` and forwards `args`
    /// verbatim to the kernel.
    ///
    /// The debug level comes from `config` unless a kernel plusarg overrides
    /// it. With `internals_dump` set, every scope and signal is logged.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidDesign` if the design's names do not form a
    /// valid hierarchy.
    pub fn new(design: Box<dyn Design>, args: CommandArgs, config: &GeneralConfig) -> Result<Self> {
        let debug_level = args.debug_level().unwrap_or(config.debug);
        let kernel = Kernel::new(design, args)?;
        info!(
            design = kernel.design().name(),
            debug_level,
            max_steps = ?config.max_steps,
            "simulation initialized"
        );
        if config.internals_dump {
            info!("internals dump:\n{}", diag::internals_dump(&kernel)?);
        }
        Ok(Self {
            kernel,
            debug_level,
            max_steps: config.max_steps,
            capabilities: Capabilities {
                system_tasks: config.system_tasks,
            },
        })
    }

    /// Effective debug verbosity.
    pub const fn debug_level(&self) -> u8 {
        self.debug_level
    }

    /// Backend capabilities used to filter startup routines.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The kernel, for inspection before the run.
    pub const fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Interface context for host-side setup before the run.
    pub fn vpi(&mut self) -> Vpi<'_> {
        self.kernel.vpi()
    }

    /// Runs the simulation to completion and releases the design.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a startup routine or callback. The
    /// run stops there: no further callbacks are dispatched, including
    /// end-of-simulation callbacks.
    pub fn run(mut self, table: StartupTable) -> Result<RunSummary> {
        let outcome = self.drive(table);
        if let Err(e) = &outcome {
            error!(time = %self.kernel.time(), "simulation aborted: {e}");
        }
        drop(self.kernel.into_design());
        outcome
    }

    fn drive(&mut self, table: StartupTable) -> Result<RunSummary> {
        let bootstrap = self.kernel.bootstrap(table, self.capabilities)?;
        debug!(
            invoked = bootstrap.invoked.len(),
            skipped = bootstrap.skipped.len(),
            "startup routines bootstrapped"
        );

        let _ = self.kernel.call_cbs(CbReason::StartOfSimulation)?;

        let mut steps = 0u64;
        let stop = loop {
            if self.kernel.got_finish() {
                break StopReason::Finished;
            }
            if self.max_steps.is_some_and(|max| steps >= max) {
                info!(steps, "step limit reached");
                break StopReason::StepLimit;
            }
            self.step()?;
            steps += 1;
        };

        let final_time = self.kernel.time();
        info!(steps, time = %final_time, ?stop, "simulation finished");
        let _ = self.kernel.call_cbs(CbReason::EndOfSimulation)?;

        Ok(RunSummary {
            steps,
            final_time,
            stop,
            bootstrap,
            stats: self.kernel.stats().clone(),
        })
    }

    /// One loop iteration in the fixed phase order.
    fn step(&mut self) -> Result<()> {
        let _ = self.kernel.call_value_cbs()?;
        let _ = self.kernel.call_timed_cbs()?;
        let _ = self.kernel.call_cbs(CbReason::ReadWriteSynch)?;
        self.kernel.eval();
        let _ = self.kernel.advance_time();
        Ok(())
    }
}
