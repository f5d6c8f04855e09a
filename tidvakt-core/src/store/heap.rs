//! Indexed binary min-heap.
//!
//! `std::collections::BinaryHeap` cannot remove arbitrary entries, so the
//! heap is kept by hand alongside a uid → slot index. Every swap updates
//! the index, which makes `remove` O(log n) instead of a linear scan.

use std::collections::HashMap;

use super::{EventStore, SchedulerKind};
use crate::event::{Event, EventKey};

#[derive(Debug, Default)]
pub struct HeapStore {
    heap: Vec<Event>,
    slots: HashMap<u64, usize>,
}

impl HeapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].key() < self.heap[b].key()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].uid(), a);
        self.slots.insert(self.heap[b].uid(), b);
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, pos) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }

    /// Detaches the entry at `pos`, restoring the heap property around it.
    fn take(&mut self, pos: usize) -> Option<Event> {
        let last = self.heap.len().checked_sub(1)?;
        if pos != last {
            self.swap(pos, last);
        }
        let event = self.heap.pop()?;
        self.slots.remove(&event.uid());
        if pos < self.heap.len() {
            let settled = self.sift_up(pos);
            if settled == pos {
                self.sift_down(pos);
            }
        }
        Some(event)
    }
}

impl EventStore for HeapStore {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::Heap
    }

    fn insert(&mut self, event: Event) {
        let pos = self.heap.len();
        self.slots.insert(event.uid(), pos);
        self.heap.push(event);
        self.sift_up(pos);
    }

    fn peek_min(&self) -> Option<&Event> {
        self.heap.first()
    }

    fn extract_min(&mut self) -> Option<Event> {
        self.take(0)
    }

    fn remove(&mut self, key: &EventKey) -> Option<Event> {
        let pos = *self.slots.get(&key.uid)?;
        if self.heap[pos].key() != *key {
            return None;
        }
        self.take(pos)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{drain_keys, event, exercise_contract};
    use crate::time::VirtualTime;

    #[test]
    fn satisfies_store_contract() {
        exercise_contract(&mut HeapStore::new());
    }

    #[test]
    fn slot_index_follows_every_swap() {
        let mut store = HeapStore::with_capacity(64);
        for uid in 0..64u64 {
            store.insert(event(((uid * 37) % 17) as i64, uid));
        }
        for (uid, pos) in &store.slots {
            assert_eq!(store.heap[*pos].uid(), *uid);
        }
        assert_eq!(store.slots.len(), store.heap.len());
    }

    #[test]
    fn removes_interior_entries() {
        let mut store = HeapStore::new();
        for uid in 0..20u64 {
            store.insert(event((20 - uid) as i64, uid));
        }
        for uid in (0..20u64).step_by(3) {
            let key = EventKey::new(VirtualTime::from_ticks((20 - uid) as i64), uid);
            assert!(store.remove(&key).is_some());
        }
        let drained = drain_keys(&mut store);
        let times: Vec<i64> = drained.iter().map(|(t, _)| *t).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
        assert_eq!(drained.len(), 13);
    }
}
