//! Object handles.

use std::fmt;

/// Reference to an object in the design hierarchy.
///
/// Handles index into the `ObjectTable` of the kernel that produced them and
/// are only meaningful there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handle {
    /// A module scope.
    Scope(usize),
    /// A signal, by declaration index.
    Signal(usize),
}

impl Handle {
    /// Returns the declaration index if this handle is a signal.
    pub const fn signal_index(self) -> Option<usize> {
        match self {
            Self::Signal(index) => Some(index),
            Self::Scope(_) => None,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scope(id) => write!(f, "scope#{id}"),
            Self::Signal(id) => write!(f, "signal#{id}"),
        }
    }
}

/// Object type reported for a handle (`vpiType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Module instance (`vpiModule`).
    Module,
    /// Net (`vpiNet`).
    Net,
    /// Register (`vpiReg`).
    Reg,
}

impl ObjectKind {
    /// VPI type name.
    pub const fn vpi_name(self) -> &'static str {
        match self {
            Self::Module => "vpiModule",
            Self::Net => "vpiNet",
            Self::Reg => "vpiReg",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vpi_name())
    }
}
