//! Signal storage.
//!
//! `SignalBank` keeps the declarations and current bits of every signal in a
//! design. Writes are masked to the declared width so readers never see
//! bits outside it.

use std::collections::HashSet;

use super::SignalDecl;
use crate::common::constants::MAX_SIGNAL_WIDTH;
use crate::common::{Result, SimError};

/// Returns a mask covering the low `width` bits.
#[inline]
pub const fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Declarations plus current values for a design's signals.
#[derive(Debug, Default)]
pub struct SignalBank {
    decls: Vec<SignalDecl>,
    values: Vec<u64>,
    names: HashSet<String>,
}

impl SignalBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a signal initialised to zero and returns its index.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidDesign` if the width is zero or wider than
    /// 64 bits, or the name is already declared.
    pub fn declare(&mut self, decl: SignalDecl) -> Result<usize> {
        if decl.width == 0 || decl.width > MAX_SIGNAL_WIDTH {
            return Err(SimError::InvalidDesign {
                design: decl.name,
                reason: format!("width {} outside 1..={MAX_SIGNAL_WIDTH}", decl.width),
            });
        }
        if !self.names.insert(decl.name.clone()) {
            return Err(SimError::InvalidDesign {
                design: decl.name,
                reason: "signal declared twice".to_string(),
            });
        }
        self.decls.push(decl);
        self.values.push(0);
        Ok(self.decls.len() - 1)
    }

    /// All declarations, in declaration order.
    pub fn decls(&self) -> &[SignalDecl] {
        &self.decls
    }

    /// Current bits of signal `index`.
    #[inline]
    pub fn get(&self, index: usize) -> u64 {
        self.values[index]
    }

    /// Stores `bits` into signal `index`, masked to its width.
    #[inline]
    pub fn set(&mut self, index: usize, bits: u64) {
        self.values[index] = bits & mask(self.decls[index].width);
    }
}
