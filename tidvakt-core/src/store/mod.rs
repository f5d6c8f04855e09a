//! ## tidvakt-core::store
//! **Pluggable containers of pending events**
//!
//! Every backend keeps events ordered by [`EventKey`] (fire time, then
//! insertion sequence) and must yield exactly the same extraction order.
//! They differ only in where they pay: on insert, on extract or on
//! arbitrary removal.
//!
//! ### Backends:
//! - `heap`: indexed binary min-heap, O(log n) everything
//! - `map`: `BTreeMap` keyed by `EventKey`, O(log n) everything
//! - `list`: unsorted vector, O(1) insert, O(n) extract; the reference baseline
//! - `calendar`: bucketed calendar queue, O(1) amortized for uniform loads

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::event::{Event, EventKey};

mod calendar;
mod heap;
mod list;
mod map;

pub use calendar::{CalendarParams, CalendarStore};
pub use heap::HeapStore;
pub use list::ListStore;
pub use map::MapStore;

/// Ordered container of scheduled events.
///
/// Implementations own their events outright; callers address them only
/// through keys. Cancellation state is carried by the events themselves, so
/// a store never needs to know about tombstones.
pub trait EventStore {
    /// Which backend this is.
    fn kind(&self) -> SchedulerKind;

    fn insert(&mut self, event: Event);

    /// The minimum event, left in place.
    fn peek_min(&self) -> Option<&Event>;

    /// Removes and returns the minimum event.
    fn extract_min(&mut self) -> Option<Event>;

    /// Removes an arbitrary event. Returns `None` if the key is not stored.
    fn remove(&mut self, key: &EventKey) -> Option<Event>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the store, returning events in extraction order.
    fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.len());
        while let Some(event) = self.extract_min() {
            events.push(event);
        }
        events
    }
}

/// Backend selection, fixed when a simulator is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    #[default]
    Heap,
    #[serde(alias = "orderedmap")]
    Map,
    #[serde(alias = "unsortedlist")]
    List,
    Calendar,
}

impl SchedulerKind {
    pub const ALL: [SchedulerKind; 4] = [
        SchedulerKind::Heap,
        SchedulerKind::Map,
        SchedulerKind::List,
        SchedulerKind::Calendar,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SchedulerKind::Heap => "heap",
            SchedulerKind::Map => "map",
            SchedulerKind::List => "list",
            SchedulerKind::Calendar => "calendar",
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulerKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heap" => Ok(SchedulerKind::Heap),
            "map" | "orderedmap" => Ok(SchedulerKind::Map),
            "list" | "unsortedlist" => Ok(SchedulerKind::List),
            "calendar" => Ok(SchedulerKind::Calendar),
            _ => Err(SimulationError::UnknownScheduler(s.to_string())),
        }
    }
}

/// Instantiates the backend for `kind`.
pub fn build_store(kind: SchedulerKind, calendar: &CalendarParams) -> Box<dyn EventStore> {
    match kind {
        SchedulerKind::Heap => Box::new(HeapStore::new()),
        SchedulerKind::Map => Box::new(MapStore::new()),
        SchedulerKind::List => Box::new(ListStore::new()),
        SchedulerKind::Calendar => Box::new(CalendarStore::with_params(calendar.clone())),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::event::{Event, EventKey, NO_CONTEXT};
    use crate::time::VirtualTime;

    use super::EventStore;

    pub fn event(time: i64, uid: u64) -> Event {
        Event::new(
            EventKey::new(VirtualTime::from_ticks(time), uid),
            NO_CONTEXT,
            Box::new(|_| Ok(())),
        )
    }

    /// Drains `store`, returning `(time, uid)` pairs.
    pub fn drain_keys(store: &mut dyn EventStore) -> Vec<(i64, u64)> {
        let mut keys = Vec::new();
        while let Some(event) = store.extract_min() {
            keys.push((event.time().ticks(), event.uid()));
        }
        keys
    }

    /// Shared contract every backend must satisfy.
    pub fn exercise_contract(store: &mut dyn EventStore) {
        assert!(store.is_empty());
        assert!(store.peek_min().is_none());
        assert!(store.extract_min().is_none());

        let times = [50, 10, 30, 10, 20, 50, 0, 30];
        for (uid, time) in times.iter().enumerate() {
            store.insert(event(*time, uid as u64 + 1));
        }
        assert_eq!(store.len(), times.len());
        assert_eq!(store.peek_min().map(|e| e.uid()), Some(7));

        let removed = store.remove(&EventKey::new(VirtualTime::from_ticks(30), 3));
        assert_eq!(removed.map(|e| e.uid()), Some(3));
        assert!(store
            .remove(&EventKey::new(VirtualTime::from_ticks(30), 3))
            .is_none());
        assert!(store
            .remove(&EventKey::new(VirtualTime::from_ticks(31), 8))
            .is_none());

        assert_eq!(
            drain_keys(store),
            vec![(0, 7), (10, 2), (10, 4), (20, 5), (30, 8), (50, 1), (50, 6)]
        );
        assert!(store.is_empty());
    }
}
