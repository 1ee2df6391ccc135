//! Configuration system for the simulation driver.
//!
//! This module defines all configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline values for verbosity, step limits, and design parameters.
//! 2. **Structures:** Hierarchical config for general, design, and clock settings.
//! 3. **Enums:** Design selection.
//!
//! Configuration is read from a JSON file (`Config::from_file`) or built with
//! `Config::default()`; the CLI layers its flags on top.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{Result, SimError};

/// Default configuration constants for the driver.
mod defaults {
    /// Debug verbosity (0 = quiet).
    pub const DEBUG_LEVEL: u8 = 0;

    /// Counter width in bits.
    pub const COUNTER_WIDTH: u32 = 32;

    /// Matrix element width in bits.
    pub const DATA_WIDTH: u32 = 8;

    /// Rows of matrix A (and C).
    pub const A_ROWS: usize = 4;

    /// Columns of matrix B (and C).
    pub const B_COLUMNS: usize = 4;

    /// Columns of A, equal to the rows of B.
    pub const A_COLUMNS_B_ROWS: usize = 4;

    /// Clock half period in simulation ticks.
    pub const HALF_PERIOD: u64 = 1;
}

/// Built-in designs the driver can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignKind {
    /// Free-running counter with optional finish threshold.
    #[default]
    Counter,
    /// Registered matrix multiplier.
    #[serde(alias = "matrix")]
    MatrixMultiplier,
}

/// Root configuration for a simulation run.
///
/// # Example
///
/// ```
/// use vpisim_core::config::{Config, DesignKind};
///
/// let json = r#"{
///     "general": { "debug": 2, "max_steps": 1000 },
///     "design": {
///         "kind": "matrix_multiplier",
///         "matrix": { "data_width": 4, "a_rows": 2, "b_columns": 2, "a_columns_b_rows": 2 }
///     },
///     "clock": { "signal": "TOP.matrix_multiplier.clk", "half_period": 5 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.general.debug, 2);
/// assert_eq!(config.design.kind, DesignKind::MatrixMultiplier);
/// assert_eq!(config.design.matrix.a_rows, 2);
/// assert_eq!(config.clock.half_period, 5);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General run settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Design selection and parameters.
    #[serde(default)]
    pub design: DesignConfig,
    /// Clock generator settings.
    #[serde(default)]
    pub clock: ClockConfig,
}

impl Config {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SimError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| SimError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// General run settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Kernel debug verbosity; plusargs may raise it at startup.
    #[serde(default = "GeneralConfig::default_debug")]
    pub debug: u8,

    /// Log a dump of every scope and signal before bootstrapping.
    #[serde(default)]
    pub internals_dump: bool,

    /// Stop after this many evaluation steps even if the design never finishes.
    #[serde(default)]
    pub max_steps: Option<u64>,

    /// Whether the backend supports system-task registration routines.
    /// When false, those startup routines are skipped.
    ///
    /// The default matches a backend without system-task support, where the
    /// legacy system-task slot is never invoked. Setting this to `true`
    /// departs from that behaviour and runs every slot of a legacy table.
    #[serde(default)]
    pub system_tasks: bool,
}

impl GeneralConfig {
    /// Returns the default debug level.
    const fn default_debug() -> u8 {
        defaults::DEBUG_LEVEL
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            debug: defaults::DEBUG_LEVEL,
            internals_dump: false,
            max_steps: None,
            system_tasks: false,
        }
    }
}

/// Design selection and per-design parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignConfig {
    /// Which built-in design to instantiate.
    #[serde(default)]
    pub kind: DesignKind,
    /// Counter parameters (used when `kind` is `Counter`).
    #[serde(default)]
    pub counter: CounterConfig,
    /// Matrix multiplier parameters (used when `kind` is `MatrixMultiplier`).
    #[serde(default)]
    pub matrix: MatrixConfig,
}

/// Counter design parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterConfig {
    /// Width of the `count` register in bits.
    #[serde(default = "CounterConfig::default_width")]
    pub width: u32,
    /// Request finish once `count` reaches this value.
    #[serde(default)]
    pub finish_at: Option<u64>,
}

impl CounterConfig {
    /// Returns the default counter width.
    const fn default_width() -> u32 {
        defaults::COUNTER_WIDTH
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            width: defaults::COUNTER_WIDTH,
            finish_at: None,
        }
    }
}

/// Matrix multiplier parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixConfig {
    /// Width of each input element in bits.
    #[serde(default = "MatrixConfig::default_data_width")]
    pub data_width: u32,
    /// Rows of A.
    #[serde(default = "MatrixConfig::default_a_rows")]
    pub a_rows: usize,
    /// Columns of B.
    #[serde(default = "MatrixConfig::default_b_columns")]
    pub b_columns: usize,
    /// Columns of A / rows of B.
    #[serde(default = "MatrixConfig::default_a_columns_b_rows")]
    pub a_columns_b_rows: usize,
}

impl MatrixConfig {
    const fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    const fn default_a_rows() -> usize {
        defaults::A_ROWS
    }

    const fn default_b_columns() -> usize {
        defaults::B_COLUMNS
    }

    const fn default_a_columns_b_rows() -> usize {
        defaults::A_COLUMNS_B_ROWS
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            data_width: defaults::DATA_WIDTH,
            a_rows: defaults::A_ROWS,
            b_columns: defaults::B_COLUMNS,
            a_columns_b_rows: defaults::A_COLUMNS_B_ROWS,
        }
    }
}

/// Clock generator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Full name of the signal to toggle; no clock is driven when unset.
    #[serde(default)]
    pub signal: Option<String>,
    /// Ticks between toggles.
    #[serde(default = "ClockConfig::default_half_period")]
    pub half_period: u64,
}

impl ClockConfig {
    /// Returns the default half period.
    const fn default_half_period() -> u64 {
        defaults::HALF_PERIOD
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            signal: None,
            half_period: defaults::HALF_PERIOD,
        }
    }
}
