//! Verification procedural interface.
//!
//! This module is the surface client code programs against. It provides:
//! 1. **Objects:** Handles to scopes and signals, resolved by hierarchical name.
//! 2. **Values:** Formatted reads and immediate writes of signal bits.
//! 3. **Callbacks:** Registration and removal of routines keyed by callback reason.
//! 4. **Startup:** The table of client routines run before simulation starts.
//!
//! Every call goes through a `Vpi` context borrowed from the kernel, either
//! inside a callback or from the host between steps.

/// Callback reasons, requests, and the registry.
pub mod callback;
/// The `Vpi` context handed to client routines.
pub mod context;
/// Object handles and kinds.
pub mod handle;
/// Name resolution and hierarchy built from a design's declarations.
pub mod object;
/// Startup routine table and capability filtering.
pub mod startup;
/// Value formats and conversions.
pub mod value;

pub use callback::{CallbackRegistry, CbData, CbId, CbReason, CbRequest};
pub use context::{VlogInfo, Vpi};
pub use handle::{Handle, ObjectKind};
pub use object::ObjectTable;
pub use startup::{BootstrapReport, Capabilities, RoutineKind, StartupRoutine, StartupTable};
pub use value::{ValueFormat, VpiValue};
