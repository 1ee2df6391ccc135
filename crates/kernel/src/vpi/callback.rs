//! Callback registry.
//!
//! Client routines are registered against a `CbReason` and dispatched by the
//! kernel at the matching point of the step cycle:
//! 1. **One-shot reasons:** Start/end of simulation and read-write synch are
//!    consumed when they fire.
//! 2. **Value change:** Persistent; fires whenever the watched signal differs
//!    from the value last reported.
//! 3. **After delay:** Fires once, in the first timed phase at or after its
//!    due time; ordered by due time, then registration.
//!
//! During a dispatch pass the fired entries are taken out of the registry, so
//! routines may register or remove callbacks freely. New registrations never
//! fire in the pass that created them.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::mem;

use super::context::Vpi;
use super::handle::Handle;
use super::value::{ValueFormat, VpiValue};
use crate::common::{Result, SimTime};

/// Point in the step cycle at which a callback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CbReason {
    /// Once, before the first evaluation step.
    StartOfSimulation,
    /// Once, after the last evaluation step.
    EndOfSimulation,
    /// Whenever a watched signal changes.
    ValueChange,
    /// Once, after a delay in simulated time.
    AfterDelay,
    /// Once, in the next read-write synchronisation phase.
    ReadWriteSynch,
}

impl CbReason {
    /// VPI constant name of the reason.
    pub const fn vpi_name(self) -> &'static str {
        match self {
            Self::StartOfSimulation => "cbStartOfSimulation",
            Self::EndOfSimulation => "cbEndOfSimulation",
            Self::ValueChange => "cbValueChange",
            Self::AfterDelay => "cbAfterDelay",
            Self::ReadWriteSynch => "cbReadWriteSynch",
        }
    }
}

impl fmt::Display for CbReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vpi_name())
    }
}

/// Identifier returned by a registration; used to remove the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CbId(u64);

impl CbId {
    /// Raw identifier value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb#{}", self.0)
    }
}

/// Information passed to a routine when its callback fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CbData {
    /// Callback that fired.
    pub id: CbId,
    /// Reason it was registered for.
    pub reason: CbReason,
    /// Simulated time of the dispatch.
    pub time: SimTime,
    /// Watched object, if any.
    pub obj: Option<Handle>,
    /// New value of the watched signal (value-change callbacks only).
    pub value: Option<VpiValue>,
    /// Opaque value supplied at registration.
    pub user_data: u64,
}

/// Routine invoked when a callback fires.
pub type CbRoutine = Box<dyn FnMut(&mut Vpi<'_>, &CbData) -> Result<()>>;

/// A callback registration request.
pub struct CbRequest {
    pub(crate) reason: CbReason,
    pub(crate) obj: Option<Handle>,
    pub(crate) delay: u64,
    pub(crate) format: ValueFormat,
    pub(crate) user_data: u64,
    pub(crate) routine: CbRoutine,
}

impl fmt::Debug for CbRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CbRequest")
            .field("reason", &self.reason)
            .field("obj", &self.obj)
            .field("delay", &self.delay)
            .field("format", &self.format)
            .field("user_data", &self.user_data)
            .finish_non_exhaustive()
    }
}

impl CbRequest {
    /// Creates a request for `reason` with no object, no delay and user data 0.
    pub fn new<F>(reason: CbReason, routine: F) -> Self
    where
        F: FnMut(&mut Vpi<'_>, &CbData) -> Result<()> + 'static,
    {
        Self {
            reason,
            obj: None,
            delay: 0,
            format: ValueFormat::default(),
            user_data: 0,
            routine: Box::new(routine),
        }
    }

    /// `cbStartOfSimulation` request.
    pub fn start_of_simulation<F>(routine: F) -> Self
    where
        F: FnMut(&mut Vpi<'_>, &CbData) -> Result<()> + 'static,
    {
        Self::new(CbReason::StartOfSimulation, routine)
    }

    /// `cbEndOfSimulation` request.
    pub fn end_of_simulation<F>(routine: F) -> Self
    where
        F: FnMut(&mut Vpi<'_>, &CbData) -> Result<()> + 'static,
    {
        Self::new(CbReason::EndOfSimulation, routine)
    }

    /// `cbReadWriteSynch` request.
    pub fn read_write_synch<F>(routine: F) -> Self
    where
        F: FnMut(&mut Vpi<'_>, &CbData) -> Result<()> + 'static,
    {
        Self::new(CbReason::ReadWriteSynch, routine)
    }

    /// `cbAfterDelay` request firing `delay` ticks after registration.
    pub fn after_delay<F>(delay: u64, routine: F) -> Self
    where
        F: FnMut(&mut Vpi<'_>, &CbData) -> Result<()> + 'static,
    {
        Self::new(CbReason::AfterDelay, routine).with_delay(delay)
    }

    /// `cbValueChange` request on `signal`, reporting values in `format`.
    pub fn value_change<F>(signal: Handle, format: ValueFormat, routine: F) -> Self
    where
        F: FnMut(&mut Vpi<'_>, &CbData) -> Result<()> + 'static,
    {
        Self::new(CbReason::ValueChange, routine)
            .with_object(signal)
            .with_format(format)
    }

    /// Sets the watched object.
    #[must_use]
    pub const fn with_object(mut self, obj: Handle) -> Self {
        self.obj = Some(obj);
        self
    }

    /// Sets the delay for `AfterDelay` requests.
    #[must_use]
    pub const fn with_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the value format for `ValueChange` requests.
    #[must_use]
    pub const fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    /// Attaches opaque user data.
    #[must_use]
    pub const fn with_user_data(mut self, user_data: u64) -> Self {
        self.user_data = user_data;
        self
    }

    /// Reason of this request.
    pub const fn reason(&self) -> CbReason {
        self.reason
    }
}

/// A registered callback.
pub(crate) struct Entry {
    pub(crate) id: CbId,
    pub(crate) reason: CbReason,
    pub(crate) obj: Option<Handle>,
    pub(crate) format: ValueFormat,
    pub(crate) user_data: u64,
    /// Last bits reported for value-change callbacks.
    pub(crate) last: u64,
    pub(crate) routine: CbRoutine,
}

impl Entry {
    /// Builds the data passed to the routine for a dispatch at `time`.
    pub(crate) fn data(&self, time: SimTime, value: Option<VpiValue>) -> CbData {
        CbData {
            id: self.id,
            reason: self.reason,
            time,
            obj: self.obj,
            value,
            user_data: self.user_data,
        }
    }
}

/// Storage for every registered callback.
#[derive(Default)]
pub struct CallbackRegistry {
    next_id: u64,
    phased: BTreeMap<CbReason, Vec<Entry>>,
    timed: BTreeMap<(SimTime, CbId), Entry>,
    in_flight: HashSet<CbId>,
    cancelled: HashSet<CbId>,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("next_id", &self.next_id)
            .field("pending", &self.len())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl CallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a validated request registered at `now`.
    ///
    /// `initial` is the current bits of the watched signal for value-change
    /// requests and is ignored otherwise.
    pub(crate) fn insert(&mut self, request: CbRequest, now: SimTime, initial: u64) -> CbId {
        let id = CbId(self.next_id);
        self.next_id += 1;
        let entry = Entry {
            id,
            reason: request.reason,
            obj: request.obj,
            format: request.format,
            user_data: request.user_data,
            last: initial,
            routine: request.routine,
        };
        if request.reason == CbReason::AfterDelay {
            let _ = self.timed.insert((now.after(request.delay), id), entry);
        } else {
            self.phased.entry(request.reason).or_default().push(entry);
        }
        id
    }

    /// Removes a callback so it never fires again.
    ///
    /// Returns `false` if `id` is unknown or has already been consumed.
    pub fn remove(&mut self, id: CbId) -> bool {
        for entries in self.phased.values_mut() {
            if let Some(pos) = entries.iter().position(|e| e.id == id) {
                let _ = entries.remove(pos);
                return true;
            }
        }
        let key = self
            .timed
            .iter()
            .find(|(_, e)| e.id == id)
            .map(|(key, _)| *key);
        if let Some(key) = key {
            let _ = self.timed.remove(&key);
            return true;
        }
        if self.in_flight.contains(&id) {
            return self.cancelled.insert(id);
        }
        false
    }

    /// Number of callbacks waiting for `reason`.
    pub fn pending(&self, reason: CbReason) -> usize {
        if reason == CbReason::AfterDelay {
            self.timed.len()
        } else {
            self.phased.get(&reason).map_or(0, Vec::len)
        }
    }

    /// Total number of registered callbacks.
    pub fn len(&self) -> usize {
        self.timed.len() + self.phased.values().map(Vec::len).sum::<usize>()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Earliest due time among pending timed callbacks.
    pub fn next_due(&self) -> Option<SimTime> {
        self.timed.keys().next().map(|(due, _)| *due)
    }

    /// Takes every callback for a phased reason out for dispatch.
    pub(crate) fn take(&mut self, reason: CbReason) -> Vec<Entry> {
        let batch = self.phased.remove(&reason).unwrap_or_default();
        self.in_flight.extend(batch.iter().map(|e| e.id));
        batch
    }

    /// Takes every timed callback due at or before `now`, in firing order.
    pub(crate) fn take_due(&mut self, now: SimTime) -> Vec<Entry> {
        let later = self.timed.split_off(&(now.after(1), CbId(0)));
        let due = mem::replace(&mut self.timed, later);
        let batch: Vec<Entry> = due.into_values().collect();
        self.in_flight.extend(batch.iter().map(|e| e.id));
        batch
    }

    /// Returns persistent callbacks after a dispatch pass, ahead of any
    /// registered during it. Callbacks removed in flight are dropped.
    pub(crate) fn restore(&mut self, reason: CbReason, mut kept: Vec<Entry>) {
        kept.retain(|e| !self.cancelled.contains(&e.id));
        let slot = self.phased.entry(reason).or_default();
        kept.append(slot);
        *slot = kept;
    }

    /// Whether a taken callback was removed during the current pass.
    pub(crate) fn is_cancelled(&self, id: CbId) -> bool {
        self.cancelled.contains(&id)
    }

    /// Ends a dispatch pass.
    pub(crate) fn end_dispatch(&mut self) {
        self.in_flight.clear();
        self.cancelled.clear();
    }
}
