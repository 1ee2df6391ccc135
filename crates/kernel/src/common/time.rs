//! Simulated time.
//!
//! `SimTime` is the logical clock value; it is distinct from wall-clock time
//! and only ever moves forward. `SimClock` owns the counter: the driver
//! advances it once per evaluation step, every other component reads it.

use std::fmt;

/// A point in simulated time, measured in kernel steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(pub u64);

impl SimTime {
    /// Time zero, where every simulation starts.
    pub const ZERO: Self = Self(0);

    /// Builds a time from the 32-bit halves used by `s_vpi_time`.
    pub const fn from_parts(high: u32, low: u32) -> Self {
        Self(((high as u64) << 32) | low as u64)
    }

    /// Raw tick count.
    #[inline]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Upper 32 bits of the tick count.
    #[inline]
    pub const fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Lower 32 bits of the tick count.
    #[inline]
    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    /// Returns the time `delay` ticks later, saturating at the end of time.
    #[inline]
    pub const fn after(self, delay: u64) -> Self {
        Self(self.0.saturating_add(delay))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SimTime {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

/// Owner of the simulated-time counter.
///
/// Only the kernel holds a mutable `SimClock`; `advance` is crate-private so
/// time cannot be moved by client code.
#[derive(Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    /// Creates a clock at time zero.
    pub const fn new() -> Self {
        Self { now: SimTime::ZERO }
    }

    /// Current simulated time.
    #[inline]
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Advances time by exactly one tick and returns the new time.
    #[inline]
    pub(crate) const fn advance(&mut self) -> SimTime {
        self.now = self.now.after(1);
        self.now
    }
}
