//! Error definitions.
//!
//! This module defines the error handling for the kernel. It provides:
//! 1. **Fatal wiring errors:** A hierarchical name that does not resolve to an object.
//! 2. **Interface misuse:** Bad values, bad handles, and invalid callback registrations.
//! 3. **Setup errors:** Invalid design parameters and unreadable configuration files.
//!
//! Every kernel operation returns these through `Result`; the host decides
//! whether an error ends the process.

use thiserror::Error;

/// Convenience alias used across the kernel.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised by the kernel, the VPI layer, and the built-in designs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A hierarchical name lookup found no object.
    ///
    /// `file` and `line` identify the call site that performed the lookup.
    /// A missing handle is a wiring defect between the client code and the
    /// design, so the driver treats it as fatal.
    #[error("{file}:{line}: no handle found for `{name}`")]
    HandleNotFound {
        /// The name that failed to resolve.
        name: String,
        /// Source file of the lookup.
        file: &'static str,
        /// Source line of the lookup.
        line: u32,
    },

    /// A handle was used where a different object kind was required.
    #[error("`{name}` is a {found}, expected a {expected}")]
    WrongObjectKind {
        /// Full name of the object behind the handle.
        name: String,
        /// Kind of object the handle refers to.
        found: &'static str,
        /// Kind of object the operation needs.
        expected: &'static str,
    },

    /// A handle does not refer to any object of this kernel.
    ///
    /// Raised for stale handles and handles built by hand with an
    /// out-of-range index.
    #[error("unknown handle {handle}")]
    InvalidHandle {
        /// Display form of the rejected handle.
        handle: String,
    },

    /// A value could not be converted to or from a signal's bits.
    #[error("invalid value for `{signal}`: {reason}")]
    InvalidValue {
        /// Full name of the target signal.
        signal: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// A callback registration request was rejected.
    #[error("cannot register {reason} callback: {detail}")]
    InvalidCallback {
        /// Callback reason that was requested.
        reason: &'static str,
        /// Why the request is invalid.
        detail: String,
    },

    /// Design parameters are out of range or inconsistent.
    #[error("invalid design `{design}`: {reason}")]
    InvalidDesign {
        /// Design being constructed.
        design: String,
        /// What is wrong with its parameters or declarations.
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("failed to load configuration `{path}`: {reason}")]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O or parse failure.
        reason: String,
    },
}

impl SimError {
    /// Returns `true` for errors that indicate broken wiring between client
    /// code and the design rather than a bad argument.
    pub const fn is_fatal_wiring(&self) -> bool {
        matches!(self, Self::HandleNotFound { .. })
    }
}
