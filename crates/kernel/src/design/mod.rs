//! Simulated designs.
//!
//! A design is the root object of the hardware under simulation. The kernel
//! only sees it through the `Design` trait:
//! 1. **Declarations:** A flat list of signals with hierarchical full names.
//! 2. **Access:** Raw bit reads and writes by declaration index.
//! 3. **Evaluation:** One `eval` per kernel step, which may request finish.
//!
//! Built-in designs live in the submodules and are selected with `build`.

use crate::common::{Result, SimTime};
use crate::config::{DesignConfig, DesignKind};

/// Free-running counter design.
pub mod counter;
/// Registered matrix multiplier design.
pub mod matrix;
/// Masked signal storage shared by the built-in designs.
pub mod signals;

pub use counter::Counter;
pub use matrix::MatrixMultiplier;
pub use signals::{SignalBank, mask};

/// How a signal is stored in the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Continuously driven wire (`vpiNet`).
    Net,
    /// State-holding register (`vpiReg`).
    Reg,
}

impl SignalKind {
    /// VPI type name of this kind.
    pub const fn vpi_name(self) -> &'static str {
        match self {
            Self::Net => "vpiNet",
            Self::Reg => "vpiReg",
        }
    }
}

/// Port direction of a signal on its enclosing module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Driven from outside the module.
    Input,
    /// Driven by the module.
    Output,
    /// Not a port.
    Internal,
}

/// Declaration of one signal in a design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDecl {
    /// Full hierarchical name, e.g. `TOP.counter.clk`.
    pub name: String,
    /// Width in bits (1..=64).
    pub width: u32,
    /// Storage kind.
    pub kind: SignalKind,
    /// Port direction.
    pub direction: Direction,
}

impl SignalDecl {
    /// Creates a declaration.
    pub fn new(name: impl Into<String>, width: u32, kind: SignalKind, direction: Direction) -> Self {
        Self {
            name: name.into(),
            width,
            kind,
            direction,
        }
    }
}

/// State handed to `Design::eval` for one step.
#[derive(Debug)]
pub struct EvalContext {
    time: SimTime,
    finish: bool,
}

impl EvalContext {
    /// Creates a context for an evaluation at `time`.
    pub const fn new(time: SimTime) -> Self {
        Self {
            time,
            finish: false,
        }
    }

    /// Simulated time of this evaluation.
    pub const fn time(&self) -> SimTime {
        self.time
    }

    /// Requests the end of simulation (the design's `$finish`).
    pub const fn finish(&mut self) {
        self.finish = true;
    }

    /// Whether `finish` was called during this evaluation.
    pub const fn finish_requested(&self) -> bool {
        self.finish
    }
}

/// A simulated top-level design instance.
///
/// Signal indices are positions in the slice returned by `signals`; the
/// kernel never passes an index outside it.
pub trait Design {
    /// Short name of the design, used in logs.
    fn name(&self) -> &str;
    /// All signals declared by the design, in declaration order.
    fn signals(&self) -> &[SignalDecl];
    /// Reads the current bits of a signal.
    fn peek(&self, index: usize) -> u64;
    /// Writes bits to a signal; bits above its width are discarded.
    fn poke(&mut self, index: usize, bits: u64);
    /// Evaluates one step of the design.
    fn eval(&mut self, ctx: &mut EvalContext);
}

/// Instantiates the built-in design selected by `config`.
///
/// # Errors
///
/// Returns `SimError::InvalidDesign` if the design parameters are out of range.
pub fn build(config: &DesignConfig) -> Result<Box<dyn Design>> {
    Ok(match config.kind {
        DesignKind::Counter => Box::new(Counter::new(&config.counter)?),
        DesignKind::MatrixMultiplier => Box::new(MatrixMultiplier::new(&config.matrix)?),
    })
}
