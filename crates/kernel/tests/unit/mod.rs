//! # Unit Components
//!
//! Tests for each kernel component, grouped by module.

/// Errors and simulated time.
pub mod common;

/// Configuration defaults and JSON loading.
pub mod config;


/// Kernel dispatch, the driver loop, arguments and bundled client routines.
pub mod sim;

/// Dispatch statistics.
pub mod stats;

/// Handles, values, callbacks and startup routines.
pub mod vpi;
