//! Value formats and conversions.
//!
//! Signals hold raw two-state bits. `VpiValue` is the formatted view client
//! code reads and writes:
//! 1. **Int:** The low 32 bits as a signed integer (`vpiIntVal`).
//! 2. **Scalar:** Bit 0 (`vpiScalarVal`).
//! 3. **Strings:** Binary, hexadecimal, or decimal text (`vpiBinStrVal`,
//!    `vpiHexStrVal`, `vpiDecStrVal`). Binary and hex strings are zero-padded
//!    to the signal width; `_` separators are accepted on input.

use std::fmt;

use crate::design::mask;

/// Requested representation of a signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueFormat {
    /// Signed 32-bit integer.
    #[default]
    Int,
    /// Single bit.
    Scalar,
    /// Binary string, MSB first.
    BinStr,
    /// Lower-case hexadecimal string, MSB first.
    HexStr,
    /// Unsigned decimal string.
    DecStr,
}

/// A formatted signal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VpiValue {
    /// `vpiIntVal`.
    Int(i32),
    /// `vpiScalarVal`.
    Scalar(bool),
    /// `vpiBinStrVal`.
    BinStr(String),
    /// `vpiHexStrVal`.
    HexStr(String),
    /// `vpiDecStrVal`.
    DecStr(String),
}

impl VpiValue {
    /// Format of this value.
    pub const fn format(&self) -> ValueFormat {
        match self {
            Self::Int(_) => ValueFormat::Int,
            Self::Scalar(_) => ValueFormat::Scalar,
            Self::BinStr(_) => ValueFormat::BinStr,
            Self::HexStr(_) => ValueFormat::HexStr,
            Self::DecStr(_) => ValueFormat::DecStr,
        }
    }

    /// The integer, if this is an `Int` value.
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Renders `bits` of a `width`-bit signal in `format`.
    pub fn from_bits(bits: u64, width: u32, format: ValueFormat) -> Self {
        let bits = bits & mask(width);
        match format {
            ValueFormat::Int => Self::Int(bits as u32 as i32),
            ValueFormat::Scalar => Self::Scalar(bits & 1 == 1),
            ValueFormat::BinStr => Self::BinStr(format!("{bits:0w$b}", w = width as usize)),
            ValueFormat::HexStr => {
                Self::HexStr(format!("{bits:0w$x}", w = width.div_ceil(4) as usize))
            }
            ValueFormat::DecStr => Self::DecStr(bits.to_string()),
        }
    }

    /// Converts this value to the bits of a `width`-bit signal.
    ///
    /// Integers are sign-extended before masking; bits above `width` are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a string is empty, contains a
    /// digit invalid for its radix, or does not fit in 64 bits.
    pub fn to_bits(&self, width: u32) -> Result<u64, String> {
        let bits = match self {
            Self::Int(v) => i64::from(*v) as u64,
            Self::Scalar(b) => u64::from(*b),
            Self::BinStr(s) => parse_radix(s, 2)?,
            Self::HexStr(s) => parse_radix(s, 16)?,
            Self::DecStr(s) => parse_radix(s, 10)?,
        };
        Ok(bits & mask(width))
    }
}

impl fmt::Display for VpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Scalar(b) => write!(f, "{}", u8::from(*b)),
            Self::BinStr(s) => write!(f, "'b{s}"),
            Self::HexStr(s) => write!(f, "'h{s}"),
            Self::DecStr(s) => write!(f, "'d{s}"),
        }
    }
}

fn parse_radix(text: &str, radix: u32) -> Result<u64, String> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() {
        return Err("empty value string".to_string());
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("`{text}`: invalid digit for radix {radix}"));
    }
    u64::from_str_radix(&digits, radix).map_err(|e| format!("`{text}`: {e}"))
}
