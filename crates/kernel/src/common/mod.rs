//! Common utilities and types used throughout the simulation kernel.
//!
//! This module provides the building blocks shared by the VPI layer, the
//! designs, and the driver:
//! 1. **Error Handling:** The `SimError` enum and its `Result` alias.
//! 2. **Time:** The `SimTime` value type and the `SimClock` that owns the counter.
//! 3. **Constants:** Product identification and well-known startup slots.

/// Kernel-wide constants.
pub mod constants;

/// Error types.
pub mod error;

/// Simulated time and the clock that advances it.
pub mod time;

pub use error::{Result, SimError};
pub use time::{SimClock, SimTime};
