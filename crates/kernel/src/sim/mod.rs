//! Simulation kernel and driver.
//!
//! This module runs designs. It provides:
//! 1. **Kernel:** Owns the design, clock and callback registry; exposes the
//!    dispatch primitives (`call_cbs`, `call_value_cbs`, `call_timed_cbs`, `eval`).
//! 2. **Driver:** The fixed-order loop from bootstrap to end of simulation.
//! 3. **Arguments:** Process arguments and plusargs.
//! 4. **Client routines:** A clock generator and diagnostic probes.

/// Process arguments and plusargs.
pub mod args;
/// Clock generator client routine.
pub mod clock;
/// Internals dump and signal probes.
pub mod diag;
/// Fixed-order simulation driver.
pub mod driver;
/// Kernel state and dispatch primitives.
pub mod kernel;

pub use args::CommandArgs;
pub use driver::{RunSummary, SimulationDriver, StopReason};
pub use kernel::Kernel;
