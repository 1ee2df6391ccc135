//! Registered matrix multiplier.
//!
//! Module `TOP.matrix_multiplier` computes `C = A x B` for row-major matrices
//! presented on flattened element ports:
//!
//! ```text
//! i_A[r * a_columns_b_rows + n]   A is a_rows x a_columns_b_rows
//! i_B[n * b_columns + c]          B is a_columns_b_rows x b_columns
//! o_C[r * b_columns + c]          C is a_rows x b_columns
//! ```
//!
//! On a rising `clk` edge, `reset` clears `o_valid` and every `o_C` element;
//! otherwise `o_valid` takes `i_valid` and, when `i_valid` is high, `o_C`
//! takes the product. Results appear one cycle after the inputs.

use super::{Design, Direction, EvalContext, SignalBank, SignalDecl, SignalKind};
use crate::common::constants::{MAX_SIGNAL_WIDTH, TOP_SCOPE};
use crate::common::{Result, SimError};
use crate::config::MatrixConfig;

/// Bits needed to index `n` values (`ceil(log2(n))`, zero for `n <= 1`).
const fn clog2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// Matrix multiplier design instance.
#[derive(Debug)]
pub struct MatrixMultiplier {
    bank: SignalBank,
    a_rows: usize,
    b_columns: usize,
    inner: usize,
    clk: usize,
    reset: usize,
    i_valid: usize,
    o_valid: usize,
    i_a: Vec<usize>,
    i_b: Vec<usize>,
    o_c: Vec<usize>,
    prev_clk: u64,
}

impl MatrixMultiplier {
    /// Scope the multiplier's signals are declared under.
    pub const SCOPE: &'static str = "matrix_multiplier";

    /// Width of each `o_C` element for the given parameters.
    pub const fn result_width(config: &MatrixConfig) -> u32 {
        config.data_width * 2 + clog2(config.a_columns_b_rows)
    }

    /// Builds a multiplier from its parameters.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidDesign` if a dimension is zero or the result
    /// width exceeds 64 bits.
    pub fn new(config: &MatrixConfig) -> Result<Self> {
        let scope = format!("{TOP_SCOPE}.{}", Self::SCOPE);
        let invalid = |reason: String| SimError::InvalidDesign {
            design: scope.clone(),
            reason,
        };

        if config.a_rows == 0 || config.b_columns == 0 || config.a_columns_b_rows == 0 {
            return Err(invalid("matrix dimensions must be non-zero".to_string()));
        }
        if config.data_width == 0 || config.data_width > MAX_SIGNAL_WIDTH / 2 {
            return Err(invalid(format!(
                "data width {} outside 1..={}",
                config.data_width,
                MAX_SIGNAL_WIDTH / 2
            )));
        }
        let result_width = Self::result_width(config);
        if result_width > MAX_SIGNAL_WIDTH {
            return Err(invalid(format!(
                "result width {result_width} exceeds {MAX_SIGNAL_WIDTH} bits"
            )));
        }

        let mut bank = SignalBank::new();
        let mut port = |name: String, width: u32, kind: SignalKind, direction: Direction| {
            bank.declare(SignalDecl::new(format!("{scope}.{name}"), width, kind, direction))
        };

        let clk = port("clk".into(), 1, SignalKind::Net, Direction::Input)?;
        let reset = port("reset".into(), 1, SignalKind::Net, Direction::Input)?;
        let i_valid = port("i_valid".into(), 1, SignalKind::Net, Direction::Input)?;
        let i_a = (0..config.a_rows * config.a_columns_b_rows)
            .map(|k| port(format!("i_A[{k}]"), config.data_width, SignalKind::Net, Direction::Input))
            .collect::<Result<Vec<_>>>()?;
        let i_b = (0..config.a_columns_b_rows * config.b_columns)
            .map(|k| port(format!("i_B[{k}]"), config.data_width, SignalKind::Net, Direction::Input))
            .collect::<Result<Vec<_>>>()?;
        let o_valid = port("o_valid".into(), 1, SignalKind::Reg, Direction::Output)?;
        let o_c = (0..config.a_rows * config.b_columns)
            .map(|k| port(format!("o_C[{k}]"), result_width, SignalKind::Reg, Direction::Output))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bank,
            a_rows: config.a_rows,
            b_columns: config.b_columns,
            inner: config.a_columns_b_rows,
            clk,
            reset,
            i_valid,
            o_valid,
            i_a,
            i_b,
            o_c,
            prev_clk: 0,
        })
    }

    /// Computes `A x B` from the current input ports, row-major.
    fn product(&self) -> Vec<u64> {
        let mut c = Vec::with_capacity(self.a_rows * self.b_columns);
        for r in 0..self.a_rows {
            for col in 0..self.b_columns {
                let sum = (0..self.inner).fold(0u64, |acc, n| {
                    let a = self.bank.get(self.i_a[r * self.inner + n]);
                    let b = self.bank.get(self.i_b[n * self.b_columns + col]);
                    acc.wrapping_add(a.wrapping_mul(b))
                });
                c.push(sum);
            }
        }
        c
    }

    /// Current `o_C` contents, row-major.
    pub fn result(&self) -> Vec<u64> {
        self.o_c.iter().map(|&i| self.bank.get(i)).collect()
    }
}

impl Design for MatrixMultiplier {
    fn name(&self) -> &str {
        Self::SCOPE
    }

    fn signals(&self) -> &[SignalDecl] {
        self.bank.decls()
    }

    fn peek(&self, index: usize) -> u64 {
        self.bank.get(index)
    }

    fn poke(&mut self, index: usize, bits: u64) {
        self.bank.set(index, bits);
    }

    fn eval(&mut self, _ctx: &mut EvalContext) {
        let clk = self.bank.get(self.clk);
        let rising = clk == 1 && self.prev_clk == 0;
        self.prev_clk = clk;
        if !rising {
            return;
        }

        if self.bank.get(self.reset) == 1 {
            self.bank.set(self.o_valid, 0);
            for &index in &self.o_c {
                self.bank.set(index, 0);
            }
            return;
        }

        let valid = self.bank.get(self.i_valid);
        self.bank.set(self.o_valid, valid);
        if valid == 1 {
            for (k, value) in self.product().into_iter().enumerate() {
                self.bank.set(self.o_c[k], value);
            }
        }
    }
}
