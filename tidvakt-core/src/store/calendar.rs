//! Calendar queue backend.
//!
//! Events hash into `buckets.len()` buckets by `(time / width) % buckets`,
//! like days of a year on a desk calendar. Each bucket is kept sorted, and
//! extraction walks the buckets of the current "year" starting at the last
//! dequeued position. When the population doubles or halves relative to
//! the bucket count, the calendar is rebuilt with a bucket width derived
//! from the spacing of the earliest pending events.
//!
//! Invariant: every stored event has `time >= last_time`, which is the
//! time of the last extraction (or of an earlier insert that moved the
//! cursor back). The year walk relies on it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{EventStore, SchedulerKind};
use crate::event::{Event, EventKey};

/// Tuning knobs for the calendar queue. None of them affect ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarParams {
    /// Bucket count before the first resize.
    pub initial_buckets: usize,
    /// Bucket width in ticks before the first resize.
    pub initial_width: i64,
    /// The calendar never shrinks below this many buckets.
    pub min_buckets: usize,
    /// Upper bound on events sampled when recomputing the width.
    pub max_samples: usize,
}

impl Default for CalendarParams {
    fn default() -> Self {
        Self {
            initial_buckets: 2,
            initial_width: 1,
            min_buckets: 2,
            max_samples: 25,
        }
    }
}

#[derive(Debug)]
pub struct CalendarStore {
    buckets: Vec<VecDeque<Event>>,
    width: i64,
    len: usize,
    last_bucket: usize,
    /// Exclusive upper time bound of `last_bucket` in the current year.
    bucket_top: i64,
    last_time: i64,
    resizes: u64,
    params: CalendarParams,
}

impl Default for CalendarStore {
    fn default() -> Self {
        Self::with_params(CalendarParams::default())
    }
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: CalendarParams) -> Self {
        let min_buckets = params.min_buckets.max(1);
        let buckets = params.initial_buckets.max(min_buckets);
        let width = params.initial_width.max(1);
        let mut store = Self {
            buckets: (0..buckets).map(|_| VecDeque::new()).collect(),
            width,
            len: 0,
            last_bucket: 0,
            bucket_top: 0,
            last_time: 0,
            resizes: 0,
            params: CalendarParams {
                min_buckets,
                ..params
            },
        };
        store.set_cursor(0);
        store
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    /// How many times the calendar has been rebuilt.
    pub fn resize_count(&self) -> u64 {
        self.resizes
    }

    #[inline]
    fn bucket_of(&self, time: i64) -> usize {
        time.div_euclid(self.width)
            .rem_euclid(self.buckets.len() as i64) as usize
    }

    /// Points the year walk at the bucket holding `time`.
    fn set_cursor(&mut self, time: i64) {
        self.last_time = time;
        self.last_bucket = self.bucket_of(time);
        self.bucket_top = time
            .div_euclid(self.width)
            .saturating_add(1)
            .saturating_mul(self.width);
    }

    /// Bucket whose front is the global minimum.
    fn min_bucket(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let count = self.buckets.len();
        let mut bucket = self.last_bucket;
        let mut top = self.bucket_top;
        for _ in 0..count {
            if let Some(front) = self.buckets[bucket].front() {
                if front.time().ticks() < top {
                    return Some(bucket);
                }
            }
            bucket = (bucket + 1) % count;
            top = top.saturating_add(self.width);
        }

        // Nothing due within a year: the queue is sparse, search directly.
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(bucket, events)| events.front().map(|front| (front.key(), bucket)))
            .min()
            .map(|(_, bucket)| bucket)
    }

    fn place(&mut self, event: Event) {
        let bucket = self.bucket_of(event.time().ticks());
        let events = &mut self.buckets[bucket];
        let key = event.key();
        if events.back().map_or(true, |last| last.key() < key) {
            events.push_back(event);
        } else {
            let pos = events.partition_point(|queued| queued.key() < key);
            events.insert(pos, event);
        }
    }

    /// Width estimate: three times the mean gap between the earliest
    /// pending events, ignoring gaps more than twice the raw mean.
    fn estimate_width(&self, times: &[i64]) -> i64 {
        let samples = if times.len() <= 5 {
            times.len()
        } else {
            (5 + times.len() / 10).min(self.params.max_samples.max(2))
        };
        if samples < 2 {
            return self.width;
        }
        let gaps: Vec<i128> = times[..samples]
            .windows(2)
            .map(|pair| i128::from(pair[1]) - i128::from(pair[0]))
            .collect();
        let mean = gaps.iter().sum::<i128>() / gaps.len() as i128;
        let (sum, count) = gaps
            .iter()
            .filter(|gap| **gap <= 2 * mean)
            .fold((0i128, 0i128), |(sum, count), gap| (sum + gap, count + 1));
        let refined = if count > 0 { sum / count } else { mean };
        i64::try_from(3 * refined).unwrap_or(i64::MAX).max(1)
    }

    fn resize(&mut self, buckets: usize) {
        let mut events: Vec<Event> = self.buckets.iter_mut().flat_map(|b| b.drain(..)).collect();
        events.sort_by_key(|event| event.key());
        let times: Vec<i64> = events.iter().map(|event| event.time().ticks()).collect();

        self.width = self.estimate_width(&times);
        self.buckets = (0..buckets).map(|_| VecDeque::new()).collect();
        for event in events {
            // Sorted input, so every placement is an append.
            let bucket = self.bucket_of(event.time().ticks());
            self.buckets[bucket].push_back(event);
        }
        self.set_cursor(self.last_time);
        self.resizes += 1;
        trace!(
            buckets,
            width = self.width,
            len = self.len,
            "Calendar queue resized"
        );
    }

    fn shrink_if_sparse(&mut self) {
        let count = self.buckets.len();
        if count > self.params.min_buckets && self.len < count / 2 {
            self.resize((count / 2).max(self.params.min_buckets));
        }
    }
}

impl EventStore for CalendarStore {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::Calendar
    }

    fn insert(&mut self, event: Event) {
        let time = event.time().ticks();
        if self.len == 0 || time < self.last_time {
            self.set_cursor(time);
        }
        self.place(event);
        self.len += 1;
        if self.len > 2 * self.buckets.len() {
            self.resize(self.buckets.len() * 2);
        }
    }

    fn peek_min(&self) -> Option<&Event> {
        let bucket = self.min_bucket()?;
        self.buckets[bucket].front()
    }

    fn extract_min(&mut self) -> Option<Event> {
        let bucket = self.min_bucket()?;
        let event = self.buckets[bucket].pop_front()?;
        self.len -= 1;
        self.set_cursor(event.time().ticks());
        self.shrink_if_sparse();
        Some(event)
    }

    fn remove(&mut self, key: &EventKey) -> Option<Event> {
        let bucket = self.bucket_of(key.time.ticks());
        let events = &mut self.buckets[bucket];
        let pos = events.partition_point(|queued| queued.key() < *key);
        if events.get(pos).map(|event| event.key()) != Some(*key) {
            return None;
        }
        let event = events.remove(pos)?;
        self.len -= 1;
        self.shrink_if_sparse();
        Some(event)
    }

    fn len(&self) -> usize {
        self.len
    }
}
