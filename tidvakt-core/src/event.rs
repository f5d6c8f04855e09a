//! Events, their ordering keys and the handles returned to callers.
//!
//! An [`Event`] owns its callback and lives inside an event store until it
//! is extracted. The caller only ever holds an [`EventHandle`], which shares
//! a small status cell with the event but never the callback itself, so a
//! handle can outlive its event and still answer "did this fire?" in O(1).

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::SimulationError;
use crate::simulator::Simulator;
use crate::time::VirtualTime;

/// Identifier of the simulated entity (node, device) an event belongs to.
pub type Context = u32;

/// Context of events scheduled outside of any entity.
pub const NO_CONTEXT: Context = u32::MAX;

pub type EventResult = Result<(), SimulationError>;

/// A deferred invocation. Arguments are bound by capture.
pub type EventFn = Box<dyn FnOnce(&mut Simulator) -> EventResult>;

/// Total order of pending events: fire time first, insertion sequence second.
///
/// `uid` grows monotonically per simulator, so equal fire times pop in
/// the order they were scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    pub time: VirtualTime,
    pub uid: u64,
}

impl EventKey {
    #[inline]
    pub const fn new(time: VirtualTime, uid: u64) -> Self {
        Self { time, uid }
    }
}

/// Lifecycle of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Handle that never referred to an event.
    Unscheduled,
    Scheduled,
    /// Callback is executing right now.
    Running,
    /// Fired, or discarded during teardown.
    Expired,
    Cancelled,
}

type StatusCell = Rc<Cell<EventStatus>>;

/// A scheduled callback, exclusively owned by the event store.
pub struct Event {
    key: EventKey,
    context: Context,
    teardown: bool,
    callback: EventFn,
    status: StatusCell,
}

impl Event {
    pub fn new(key: EventKey, context: Context, callback: EventFn) -> Self {
        Self {
            key,
            context,
            teardown: false,
            callback,
            status: Rc::new(Cell::new(EventStatus::Scheduled)),
        }
    }

    /// An event that runs during the destroy phase instead of at a time.
    pub(crate) fn teardown(key: EventKey, callback: EventFn) -> Self {
        Self {
            teardown: true,
            ..Self::new(key, NO_CONTEXT, callback)
        }
    }

    #[inline]
    pub fn key(&self) -> EventKey {
        self.key
    }

    #[inline]
    pub fn time(&self) -> VirtualTime {
        self.key.time
    }

    #[inline]
    pub fn uid(&self) -> u64 {
        self.key.uid
    }

    #[inline]
    pub fn context(&self) -> Context {
        self.context
    }

    #[inline]
    pub fn status(&self) -> EventStatus {
        self.status.get()
    }

    /// Tombstoned events stay in the store until they are reached.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status.get() == EventStatus::Cancelled
    }

    pub fn handle(&self) -> EventHandle {
        EventHandle {
            key: self.key,
            context: self.context,
            teardown: self.teardown,
            owner: 0,
            status: Some(Rc::clone(&self.status)),
        }
    }

    /// Runs the callback. The event must already be detached from its store.
    pub(crate) fn invoke(self, sim: &mut Simulator) -> EventResult {
        let Event {
            callback, status, ..
        } = self;
        status.set(EventStatus::Running);
        let result = callback(sim);
        status.set(EventStatus::Expired);
        result
    }

    /// Drops the event without running it.
    pub(crate) fn discard(self) {
        if self.status.get() == EventStatus::Scheduled {
            self.status.set(EventStatus::Expired);
        }
    }

    pub(crate) fn mark_cancelled(&self) {
        self.status.set(EventStatus::Cancelled);
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("key", &self.key)
            .field("context", &self.context)
            .field("teardown", &self.teardown)
            .field("status", &self.status.get())
            .finish_non_exhaustive()
    }
}

/// Non-owning reference to a scheduled event.
///
/// Cloning a handle is cheap. A default handle refers to nothing and
/// reports itself as expired.
#[derive(Clone)]
pub struct EventHandle {
    key: EventKey,
    context: Context,
    teardown: bool,
    /// Id of the scheduler that issued the handle, 0 if none did.
    owner: u64,
    status: Option<StatusCell>,
}

impl EventHandle {
    pub(crate) fn issued_by(mut self, owner: u64) -> Self {
        self.owner = owner;
        self
    }

    #[inline]
    pub fn key(&self) -> EventKey {
        self.key
    }

    /// Absolute fire time the event was scheduled for.
    #[inline]
    pub fn time(&self) -> VirtualTime {
        self.key.time
    }

    #[inline]
    pub fn uid(&self) -> u64 {
        self.key.uid
    }

    #[inline]
    pub fn context(&self) -> Context {
        self.context
    }

    /// Id of the issuing scheduler. Only that scheduler accepts the handle.
    #[inline]
    pub fn owner(&self) -> u64 {
        self.owner
    }

    /// Whether this handle refers to a destroy-phase callback.
    #[inline]
    pub fn is_teardown(&self) -> bool {
        self.teardown
    }

    pub fn status(&self) -> EventStatus {
        self.status
            .as_ref()
            .map_or(EventStatus::Unscheduled, |cell| cell.get())
    }

    /// The event is still waiting in the store (or the destroy registry).
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status() == EventStatus::Scheduled
    }

    /// The event has fired, is firing, was cancelled or never existed.
    #[inline]
    pub fn is_expired(&self) -> bool {
        !self.is_pending()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status() == EventStatus::Cancelled
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status() == EventStatus::Running
    }

    pub(crate) fn mark_cancelled(&self) {
        if let Some(cell) = &self.status {
            cell.set(EventStatus::Cancelled);
        }
    }
}

impl Default for EventHandle {
    fn default() -> Self {
        Self {
            key: EventKey::default(),
            context: NO_CONTEXT,
            teardown: false,
            owner: 0,
            status: None,
        }
    }
}

impl fmt::Debug for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandle")
            .field("key", &self.key)
            .field("context", &self.context)
            .field("owner", &self.owner)
            .field("status", &self.status())
            .finish()
    }
}

impl PartialEq for EventHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for EventHandle {}

impl Hash for EventHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
