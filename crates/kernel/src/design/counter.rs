//! Free-running counter.
//!
//! Module `TOP.counter` with ports `clk`, `rst` and a `count` register. On
//! each rising edge of `clk` the counter is cleared while `rst` is high and
//! incremented (wrapping at its width) otherwise. When `finish_at` is set the
//! design requests finish on the edge where `count` reaches it.

use super::{Design, Direction, EvalContext, SignalBank, SignalDecl, SignalKind, mask};
use crate::common::constants::TOP_SCOPE;
use crate::common::{Result, SimError};
use crate::config::CounterConfig;

/// Counter design instance.
#[derive(Debug)]
pub struct Counter {
    bank: SignalBank,
    clk: usize,
    rst: usize,
    count: usize,
    width: u32,
    finish_at: Option<u64>,
    prev_clk: u64,
}

impl Counter {
    /// Scope the counter's signals are declared under.
    pub const SCOPE: &'static str = "counter";

    /// Builds a counter from its parameters.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidDesign` if the width is outside 1..=64 or
    /// `finish_at` cannot be represented in that width.
    pub fn new(config: &CounterConfig) -> Result<Self> {
        let scope = format!("{TOP_SCOPE}.{}", Self::SCOPE);
        let mut bank = SignalBank::new();
        let clk = bank.declare(SignalDecl::new(
            format!("{scope}.clk"),
            1,
            SignalKind::Net,
            Direction::Input,
        ))?;
        let rst = bank.declare(SignalDecl::new(
            format!("{scope}.rst"),
            1,
            SignalKind::Net,
            Direction::Input,
        ))?;
        let count = bank.declare(SignalDecl::new(
            format!("{scope}.count"),
            config.width,
            SignalKind::Reg,
            Direction::Output,
        ))?;

        if let Some(limit) = config.finish_at {
            if limit & !mask(config.width) != 0 {
                return Err(SimError::InvalidDesign {
                    design: scope,
                    reason: format!("finish_at {limit} does not fit in {} bits", config.width),
                });
            }
        }

        Ok(Self {
            bank,
            clk,
            rst,
            count,
            width: config.width,
            finish_at: config.finish_at,
            prev_clk: 0,
        })
    }

    /// Current value of the `count` register.
    pub fn count(&self) -> u64 {
        self.bank.get(self.count)
    }
}

impl Design for Counter {
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

    fn eval(&mut self, ctx: &mut EvalContext) {
        let clk = self.bank.get(self.clk);
        let rising = clk == 1 && self.prev_clk == 0;
        self.prev_clk = clk;
        if !rising {
            return;
        }

        let next = if self.bank.get(self.rst) == 1 {
            0
        } else {
            self.count().wrapping_add(1) & mask(self.width)
        };
        self.bank.set(self.count, next);

        if self.finish_at == Some(next) {
            ctx.finish();
        }
    }
}
