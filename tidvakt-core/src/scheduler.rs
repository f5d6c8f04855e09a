//! ## tidvakt-core::scheduler
//! **Insertion, cancellation and extraction against the active store**
//!
//! The scheduler hands out insertion sequence numbers, tracks tombstones
//! left behind by lazy cancellation and keeps the registry of destroy-phase
//! callbacks. It knows nothing about the current time; the
//! [`Simulator`](crate::Simulator) decides when an event is due.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::SimulationError;
use crate::event::{Context, Event, EventFn, EventHandle, EventKey};
use crate::store::{build_store, CalendarParams, EventStore, SchedulerKind};
use crate::time::VirtualTime;

/// Source of scheduler ids. 0 is reserved for handles no scheduler issued.
static NEXT_SCHEDULER_ID: AtomicU64 = AtomicU64::new(1);

/// Counters describing what happened to scheduled events so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Timed events inserted into the store.
    pub scheduled: u64,
    /// Callbacks invoked by the run loop.
    pub executed: u64,
    /// Events cancelled through a handle (tombstoned).
    pub cancelled: u64,
    /// Events eagerly removed from the store.
    pub removed: u64,
    /// Tombstones consumed by extraction.
    pub tombstones_skipped: u64,
    /// Pending events thrown away by destroy.
    pub discarded: u64,
    /// Destroy-phase callbacks invoked.
    pub teardown_executed: u64,
}

pub struct Scheduler {
    id: u64,
    kind: SchedulerKind,
    store: Option<Box<dyn EventStore>>,
    teardown: Vec<Event>,
    next_uid: u64,
    tombstones: usize,
    stats: RunStats,
}

impl Scheduler {
    pub fn new(kind: SchedulerKind, calendar: &CalendarParams) -> Self {
        Self {
            id: NEXT_SCHEDULER_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            store: Some(build_store(kind, calendar)),
            teardown: Vec::new(),
            next_uid: 1,
            tombstones: 0,
            stats: RunStats::default(),
        }
    }

    /// Process-unique id stamped into every handle this scheduler issues.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> SchedulerKind {
        self.kind
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Whether the store has been released by destroy.
    pub fn is_released(&self) -> bool {
        self.store.is_none()
    }

    /// Live (non-tombstoned) events waiting in the store.
    pub fn pending_count(&self) -> usize {
        self.store
            .as_ref()
            .map_or(0, |store| store.len().saturating_sub(self.tombstones))
    }

    /// Store occupancy including tombstones not yet reached.
    pub fn stored_count(&self) -> usize {
        self.store.as_ref().map_or(0, |store| store.len())
    }

    pub fn teardown_count(&self) -> usize {
        self.teardown.iter().filter(|event| !event.is_cancelled()).count()
    }

    fn next_key(&mut self, time: VirtualTime) -> EventKey {
        let key = EventKey::new(time, self.next_uid);
        self.next_uid += 1;
        key
    }

    pub(crate) fn insert(
        &mut self,
        time: VirtualTime,
        context: Context,
        callback: EventFn,
    ) -> Result<EventHandle, SimulationError> {
        let Some(store) = self.store.as_mut() else {
            return Err(SimulationError::Destroyed);
        };
        let key = EventKey::new(time, self.next_uid);
        self.next_uid += 1;
        let event = Event::new(key, context, callback);
        let handle = event.handle().issued_by(self.id);
        store.insert(event);
        self.stats.scheduled += 1;
        trace!(uid = key.uid, time = %time, context, "Event scheduled");
        Ok(handle)
    }

    pub(crate) fn insert_teardown(
        &mut self,
        now: VirtualTime,
        callback: EventFn,
    ) -> Result<EventHandle, SimulationError> {
        if self.store.is_none() {
            return Err(SimulationError::Destroyed);
        }
        let event = Event::teardown(self.next_key(now), callback);
        let handle = event.handle().issued_by(self.id);
        self.teardown.push(event);
        debug!(uid = handle.uid(), "Destroy callback registered");
        Ok(handle)
    }

    fn owns(&self, handle: &EventHandle) -> bool {
        if handle.owner() == self.id {
            return true;
        }
        warn!(
            uid = handle.uid(),
            owner = handle.owner(),
            scheduler = self.id,
            "Ignoring handle issued by another simulator"
        );
        false
    }

    /// Tombstones the event. O(1); the slot is reclaimed on extraction.
    pub fn cancel(&mut self, handle: &EventHandle) -> bool {
        if !handle.is_pending() || !self.owns(handle) {
            return false;
        }
        handle.mark_cancelled();
        if !handle.is_teardown() {
            self.tombstones += 1;
        }
        self.stats.cancelled += 1;
        trace!(uid = handle.uid(), "Event cancelled");
        true
    }

    /// Deletes the event from the store right away. Cost depends on the backend.
    pub fn remove(&mut self, handle: &EventHandle) -> bool {
        if !handle.is_pending() || !self.owns(handle) {
            return false;
        }
        let removed = if handle.is_teardown() {
            self.teardown
                .iter()
                .position(|event| event.uid() == handle.uid())
                .map(|pos| self.teardown.remove(pos))
        } else {
            self.store
                .as_mut()
                .and_then(|store| store.remove(&handle.key()))
        };
        match removed {
            Some(event) => {
                event.mark_cancelled();
                self.stats.removed += 1;
                trace!(uid = handle.uid(), "Event removed");
                true
            }
            None => false,
        }
    }

    /// Time of the earliest live event, dropping any tombstones in front of it.
    pub(crate) fn next_time(&mut self) -> Option<VirtualTime> {
        let store = self.store.as_mut()?;
        loop {
            let front = store.peek_min()?;
            if !front.is_cancelled() {
                return Some(front.time());
            }
            store.extract_min();
            self.tombstones = self.tombstones.saturating_sub(1);
            self.stats.tombstones_skipped += 1;
        }
    }

    /// Detaches the earliest live event from the store.
    pub(crate) fn next_event(&mut self) -> Option<Event> {
        let store = self.store.as_mut()?;
        loop {
            let event = store.extract_min()?;
            if !event.is_cancelled() {
                return Some(event);
            }
            self.tombstones = self.tombstones.saturating_sub(1);
            self.stats.tombstones_skipped += 1;
        }
    }

    pub(crate) fn record_executed(&mut self) {
        self.stats.executed += 1;
    }

    /// Throws away every timed event without invoking it.
    pub(crate) fn discard_pending(&mut self) -> usize {
        let Some(store) = self.store.as_mut() else {
            return 0;
        };
        let mut discarded = 0;
        for event in store.drain() {
            if !event.is_cancelled() {
                discarded += 1;
            }
            event.discard();
        }
        self.tombstones = 0;
        self.stats.discarded += discarded as u64;
        discarded
    }

    /// Most recently registered live destroy callback.
    pub(crate) fn pop_teardown(&mut self) -> Option<Event> {
        while let Some(event) = self.teardown.pop() {
            if !event.is_cancelled() {
                self.stats.teardown_executed += 1;
                return Some(event);
            }
        }
        None
    }

    pub(crate) fn release_store(&mut self) {
        self.store = None;
    }
}
