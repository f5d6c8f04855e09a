//! Unsorted-list backend.
//!
//! Appends on insert and scans on extract. Too slow for large populations,
//! but short enough to be obviously right, which makes it the reference the
//! other backends are checked against.

use super::{EventStore, SchedulerKind};
use crate::event::{Event, EventKey};

#[derive(Debug, Default)]
pub struct ListStore {
    events: Vec<Event>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn min_position(&self) -> Option<usize> {
        self.events
            .iter()
            .enumerate()
            .min_by_key(|(_, event)| event.key())
            .map(|(pos, _)| pos)
    }
}

impl EventStore for ListStore {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::List
    }

    fn insert(&mut self, event: Event) {
        self.events.push(event);
    }

    fn peek_min(&self) -> Option<&Event> {
        self.min_position().map(|pos| &self.events[pos])
    }

    fn extract_min(&mut self) -> Option<Event> {
        let pos = self.min_position()?;
        Some(self.events.swap_remove(pos))
    }

    fn remove(&mut self, key: &EventKey) -> Option<Event> {
        let pos = self.events.iter().position(|event| event.key() == *key)?;
        Some(self.events.swap_remove(pos))
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}
