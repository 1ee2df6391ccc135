//! Process arguments.
//!
//! The kernel receives the process arguments verbatim. Arguments starting
//! with `+` are plusargs, visible to client code through `plusarg` and
//! `test_plusarg`. The kernel itself understands two of them:
//!
//! - `+vpisim+debug` sets the debug level to 4.
//! - `+vpisim+debugi+<n>` sets the debug level to `n`.

use crate::common::constants::{PLUSARG_DEBUG_LEVEL, PLUSARG_PREFIX};

/// Process arguments as passed to the kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    argv: Vec<String>,
}

impl CommandArgs {
    /// Stores `args` verbatim.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: args.into_iter().map(Into::into).collect(),
        }
    }

    /// All arguments, in order.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Plusargs with the leading `+` removed, in order.
    pub fn plusargs(&self) -> impl Iterator<Item = &str> {
        self.argv.iter().filter_map(|arg| arg.strip_prefix('+'))
    }

    /// Text following `prefix` in the first plusarg that starts with it
    /// (`$value$plusargs`).
    pub fn plusarg(&self, prefix: &str) -> Option<&str> {
        self.plusargs().find_map(|arg| arg.strip_prefix(prefix))
    }

    /// Whether any plusarg starts with `name` (`$test$plusargs`).
    pub fn test_plusarg(&self, name: &str) -> bool {
        self.plusarg(name).is_some()
    }

    /// Debug level requested by kernel plusargs; the last one wins.
    pub fn debug_level(&self) -> Option<u8> {
        let mut level = None;
        for arg in self.plusargs() {
            let Some(rest) = arg.strip_prefix(PLUSARG_PREFIX) else {
                continue;
            };
            if rest == "debug" {
                level = Some(PLUSARG_DEBUG_LEVEL);
            } else if let Some(n) = rest.strip_prefix("debugi+") {
                match n.parse() {
                    Ok(n) => level = Some(n),
                    Err(_) => tracing::warn!(plusarg = arg, "ignoring malformed debug level"),
                }
            }
        }
        level
    }
}
