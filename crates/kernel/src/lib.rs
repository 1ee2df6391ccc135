//! VPI-style simulation kernel library.
//!
//! This crate implements a single-threaded simulation kernel that exposes a
//! procedural verification interface to client code:
//! 1. **Designs:** The `Design` trait plus built-in counter and matrix-multiplier models.
//! 2. **VPI:** Object handles, value formats, the callback registry, and startup routines.
//! 3. **Simulation:** The kernel (dispatch primitives), the fixed-order driver loop,
//!    command arguments, and bundled client routines (clock generator, probes).
//! 4. **Support:** Configuration, error types, simulated time, and dispatch statistics.

/// Common types (errors, simulated time, constants).
pub mod common;
/// Driver configuration (defaults, design selection, clock and general settings).
pub mod config;
/// Simulated designs (trait, signal storage, built-in models).
pub mod design;
/// Kernel, driver loop, command arguments, and bundled client routines.
pub mod sim;
/// Callback dispatch statistics collection and reporting.
pub mod stats;
/// Verification procedural interface (handles, values, callbacks, startup table).
pub mod vpi;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Error type returned by every fallible kernel operation.
pub use crate::common::SimError;
/// Fixed-order simulation driver; construct with `SimulationDriver::new`.
pub use crate::sim::SimulationDriver;
