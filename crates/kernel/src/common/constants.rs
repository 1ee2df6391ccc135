//! Kernel-wide constants.
//!
//! Values reported through `vlog_info`, the plusarg namespace understood by
//! the kernel, and the legacy startup-table slot reserved for system tasks.

/// Product name reported by `Vpi::vlog_info`.
pub const PRODUCT: &str = "vpisim";

/// Product version reported by `Vpi::vlog_info`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the root scope every built-in design lives under.
pub const TOP_SCOPE: &str = "TOP";

/// Hierarchy separator in full signal names.
pub const SCOPE_SEPARATOR: char = '.';

/// Prefix of kernel plusargs (`+vpisim+debug`, `+vpisim+debugi+<n>`).
pub const PLUSARG_PREFIX: &str = "vpisim+";

/// Debug level selected by the bare `+vpisim+debug` plusarg.
pub const PLUSARG_DEBUG_LEVEL: u8 = 4;

/// Index of the system-task registration routine in a legacy
/// `vlog_startup_routines` table.
pub const LEGACY_SYSTF_SLOT: usize = 1;

/// Widest signal the kernel can store, in bits.
pub const MAX_SIGNAL_WIDTH: u32 = 64;
