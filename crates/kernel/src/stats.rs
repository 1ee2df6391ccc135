//! Dispatch statistics collection and reporting.
//!
//! This module tracks what the kernel did during a run. It provides:
//! 1. **Steps:** Evaluation steps completed and host time spent.
//! 2. **Callbacks:** Invocation counts per callback reason.
//! 3. **Startup:** Routines invoked and skipped during bootstrap.

use std::time::Instant;

use crate::vpi::CbReason;

/// Counters collected by the kernel over one run.
#[derive(Debug, Clone)]
pub struct DispatchStats {
    start_time: Instant,
    /// Evaluation steps completed.
    pub steps: u64,
    /// `cbStartOfSimulation` invocations.
    pub start_of_simulation: u64,
    /// `cbValueChange` invocations.
    pub value_change: u64,
    /// `cbAfterDelay` invocations.
    pub after_delay: u64,
    /// `cbReadWriteSynch` invocations.
    pub read_write_synch: u64,
    /// `cbEndOfSimulation` invocations.
    pub end_of_simulation: u64,
    /// Startup routines that ran.
    pub startup_invoked: u64,
    /// Startup routines skipped as unsupported.
    pub startup_skipped: u64,
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            start_of_simulation: 0,
            value_change: 0,
            after_delay: 0,
            read_write_synch: 0,
            end_of_simulation: 0,
            startup_invoked: 0,
            startup_skipped: 0,
        }
    }
}

impl DispatchStats {
    /// Adds `fired` invocations to the counter for `reason`.
    pub fn record(&mut self, reason: CbReason, fired: usize) {
        *self.counter_mut(reason) += fired as u64;
    }

    const fn counter_mut(&mut self, reason: CbReason) -> &mut u64 {
        match reason {
            CbReason::StartOfSimulation => &mut self.start_of_simulation,
            CbReason::EndOfSimulation => &mut self.end_of_simulation,
            CbReason::ValueChange => &mut self.value_change,
            CbReason::AfterDelay => &mut self.after_delay,
            CbReason::ReadWriteSynch => &mut self.read_write_synch,
        }
    }

    /// Invocations recorded for `reason`.
    pub const fn callbacks(&self, reason: CbReason) -> u64 {
        match reason {
            CbReason::StartOfSimulation => self.start_of_simulation,
            CbReason::EndOfSimulation => self.end_of_simulation,
            CbReason::ValueChange => self.value_change,
            CbReason::AfterDelay => self.after_delay,
            CbReason::ReadWriteSynch => self.read_write_synch,
        }
    }

    /// Invocations across all reasons.
    pub const fn total_callbacks(&self) -> u64 {
        self.start_of_simulation
            + self.value_change
            + self.after_delay
            + self.read_write_synch
            + self.end_of_simulation
    }

    /// Wall-clock seconds since the counters were created.
    pub fn host_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        let seconds = self.host_seconds();
        let rate = if seconds > 0.0 {
            self.steps as f64 / seconds / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("SIMULATION DISPATCH STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_steps                {}", self.steps);
        println!("sim_rate                 {rate:.2} ksteps/s");
        println!("----------------------------------------------------------");
        println!("CALLBACKS");
        println!("  start_of_simulation    {}", self.start_of_simulation);
        println!("  value_change           {}", self.value_change);
        println!("  after_delay            {}", self.after_delay);
        println!("  read_write_synch       {}", self.read_write_synch);
        println!("  end_of_simulation      {}", self.end_of_simulation);
        println!("  total                  {}", self.total_callbacks());
        println!("----------------------------------------------------------");
        println!("STARTUP");
        println!("  invoked                {}", self.startup_invoked);
        println!("  skipped                {}", self.startup_skipped);
        println!("==========================================================");
    }
}
