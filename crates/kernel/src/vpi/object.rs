//! Object table.
//!
//! Built once from a design's signal declarations. Every dotted prefix of a
//! signal name becomes a module scope, so `TOP.counter.clk` yields the scopes
//! `TOP` and `TOP.counter` and the signal `clk` inside the latter.

use std::collections::HashMap;

use super::handle::{Handle, ObjectKind};
use crate::common::constants::SCOPE_SEPARATOR;
use crate::common::{Result, SimError};
use crate::design::{SignalDecl, SignalKind};

#[derive(Debug)]
struct ScopeEntry {
    full_name: String,
    parent: Option<usize>,
    scopes: Vec<usize>,
    signals: Vec<usize>,
}

#[derive(Debug)]
struct SignalEntry {
    decl: SignalDecl,
    parent: Option<usize>,
}

/// Hierarchy and name index for one design.
#[derive(Debug, Default)]
pub struct ObjectTable {
    scopes: Vec<ScopeEntry>,
    signals: Vec<SignalEntry>,
    roots: Vec<Handle>,
    by_name: HashMap<String, Handle>,
}

/// Last segment of a hierarchical name.
fn leaf(full_name: &str) -> &str {
    full_name
        .rsplit_once(SCOPE_SEPARATOR)
        .map_or(full_name, |(_, leaf)| leaf)
}

impl ObjectTable {
    /// Builds the table from declarations in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidDesign` if a name is empty or is used both as
    /// a scope and as a signal.
    pub fn build(decls: &[SignalDecl]) -> Result<Self> {
        let mut table = Self::default();
        for (index, decl) in decls.iter().enumerate() {
            if decl.name.is_empty() || decl.name.split(SCOPE_SEPARATOR).any(str::is_empty) {
                return Err(SimError::InvalidDesign {
                    design: decl.name.clone(),
                    reason: "malformed hierarchical name".to_string(),
                });
            }

            let parent = match decl.name.rsplit_once(SCOPE_SEPARATOR) {
                Some((scope, _)) => Some(table.ensure_scope(scope)?),
                None => None,
            };

            let handle = Handle::Signal(index);
            if table.by_name.insert(decl.name.clone(), handle).is_some() {
                return Err(SimError::InvalidDesign {
                    design: decl.name.clone(),
                    reason: "name used by more than one object".to_string(),
                });
            }
            match parent {
                Some(scope) => table.scopes[scope].signals.push(index),
                None => table.roots.push(handle),
            }
            table.signals.push(SignalEntry {
                decl: decl.clone(),
                parent,
            });
        }
        Ok(table)
    }

    /// Returns the scope id for `full_name`, creating it and its ancestors.
    fn ensure_scope(&mut self, full_name: &str) -> Result<usize> {
        match self.by_name.get(full_name) {
            Some(Handle::Scope(id)) => return Ok(*id),
            Some(Handle::Signal(_)) => {
                return Err(SimError::InvalidDesign {
                    design: full_name.to_string(),
                    reason: "signal name reused as a scope".to_string(),
                });
            }
            None => {}
        }

        let parent = match full_name.rsplit_once(SCOPE_SEPARATOR) {
            Some((outer, _)) => Some(self.ensure_scope(outer)?),
            None => None,
        };
        let id = self.scopes.len();
        self.scopes.push(ScopeEntry {
            full_name: full_name.to_string(),
            parent,
            scopes: Vec::new(),
            signals: Vec::new(),
        });
        let _ = self.by_name.insert(full_name.to_string(), Handle::Scope(id));
        match parent {
            Some(outer) => self.scopes[outer].scopes.push(id),
            None => self.roots.push(Handle::Scope(id)),
        }
        Ok(id)
    }

    /// Resolves an absolute hierarchical name.
    pub fn lookup(&self, full_name: &str) -> Option<Handle> {
        self.by_name.get(full_name).copied()
    }

    fn scope_entry(&self, id: usize) -> Result<&ScopeEntry> {
        self.scopes.get(id).ok_or_else(|| SimError::InvalidHandle {
            handle: Handle::Scope(id).to_string(),
        })
    }

    fn signal_entry(&self, index: usize) -> Result<&SignalEntry> {
        self.signals.get(index).ok_or_else(|| SimError::InvalidHandle {
            handle: Handle::Signal(index).to_string(),
        })
    }

    /// Returns `handle` unchanged if it refers to an object of this table.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` for an out-of-range id.
    pub fn check(&self, handle: Handle) -> Result<Handle> {
        match handle {
            Handle::Scope(id) => self.scope_entry(id).map(|_| handle),
            Handle::Signal(index) => self.signal_entry(index).map(|_| handle),
        }
    }

    /// Full hierarchical name of an object.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if the handle is not in this table.
    pub fn full_name(&self, handle: Handle) -> Result<&str> {
        match handle {
            Handle::Scope(id) => Ok(&self.scope_entry(id)?.full_name),
            Handle::Signal(index) => Ok(&self.signal_entry(index)?.decl.name),
        }
    }

    /// Last segment of an object's name (`vpiName`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if the handle is not in this table.
    pub fn name(&self, handle: Handle) -> Result<&str> {
        self.full_name(handle).map(leaf)
    }

    /// Object type of a handle.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if the handle is not in this table.
    pub fn kind(&self, handle: Handle) -> Result<ObjectKind> {
        match handle {
            Handle::Scope(id) => self.scope_entry(id).map(|_| ObjectKind::Module),
            Handle::Signal(index) => Ok(match self.signal_entry(index)?.decl.kind {
                SignalKind::Net => ObjectKind::Net,
                SignalKind::Reg => ObjectKind::Reg,
            }),
        }
    }

    /// Bit width of a signal; scopes report zero.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if the handle is not in this table.
    pub fn size(&self, handle: Handle) -> Result<u32> {
        match handle {
            Handle::Scope(id) => self.scope_entry(id).map(|_| 0),
            Handle::Signal(index) => Ok(self.signal_entry(index)?.decl.width),
        }
    }

    /// Enclosing scope of an object, if any.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if the handle is not in this table.
    pub fn parent(&self, handle: Handle) -> Result<Option<Handle>> {
        let parent = match handle {
            Handle::Scope(id) => self.scope_entry(id)?.parent,
            Handle::Signal(index) => self.signal_entry(index)?.parent,
        };
        Ok(parent.map(Handle::Scope))
    }

    /// Declaration of signal `index`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if `index` is out of range.
    pub fn signal(&self, index: usize) -> Result<&SignalDecl> {
        Ok(&self.signal_entry(index)?.decl)
    }

    /// Direct children of a scope (sub-scopes first, then signals), or the
    /// top-level objects when `scope` is `None`. Signals have no children.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidHandle` if `scope` is not in this table.
    pub fn children(&self, scope: Option<Handle>) -> Result<Vec<Handle>> {
        match scope {
            None => Ok(self.roots.clone()),
            Some(Handle::Signal(index)) => self.signal_entry(index).map(|_| Vec::new()),
            Some(Handle::Scope(id)) => {
                let entry = self.scope_entry(id)?;
                Ok(entry
                    .scopes
                    .iter()
                    .map(|&s| Handle::Scope(s))
                    .chain(entry.signals.iter().map(|&s| Handle::Signal(s)))
                    .collect())
            }
        }
    }

    /// Number of scopes.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Number of signals.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }
}
