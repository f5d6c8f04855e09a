//! Ordered-map backend.
//!
//! The `BTreeMap` key is the event key itself, so tree order is extraction
//! order and arbitrary removal is a plain keyed delete.

use std::collections::BTreeMap;

use super::{EventStore, SchedulerKind};
use crate::event::{Event, EventKey};

#[derive(Debug, Default)]
pub struct MapStore {
    events: BTreeMap<EventKey, Event>,
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MapStore {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::Map
    }

    fn insert(&mut self, event: Event) {
        self.events.insert(event.key(), event);
    }

    fn peek_min(&self) -> Option<&Event> {
        self.events.first_key_value().map(|(_, event)| event)
    }

    fn extract_min(&mut self) -> Option<Event> {
        self.events.pop_first().map(|(_, event)| event)
    }

    fn remove(&mut self, key: &EventKey) -> Option<Event> {
        self.events.remove(key)
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{drain_keys, event, exercise_contract};

    #[test]
    fn satisfies_store_contract() {
        exercise_contract(&mut MapStore::new());
    }

    #[test]
    fn equal_times_pop_in_insertion_order() {
        let mut store = MapStore::new();
        for uid in [4, 1, 3, 2] {
            store.insert(event(7, uid));
        }
        assert_eq!(drain_keys(&mut store), vec![(7, 1), (7, 2), (7, 3), (7, 4)]);
    }
}
