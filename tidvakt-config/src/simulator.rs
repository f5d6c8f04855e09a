//! Simulator construction parameters.
//!
//! Everything here is consumed once, when a [`Simulator`] is built. The
//! backend of an existing simulator cannot be changed.
//!
//! [`Simulator`]: tidvakt_core::Simulator

use serde::{Deserialize, Serialize};
use validator::Validate;

use tidvakt_core::{CalendarParams, SchedulerKind, SimulatorOptions, TimeUnit, VirtualTime};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default, PartialEq)]
pub struct SimulatorConfig {
    /// Event store backend: heap, map, list or calendar.
    #[serde(default)]
    pub scheduler: SchedulerKind,

    /// Length of one tick: s, ms, us, ns, ps or fs.
    #[serde(default)]
    pub resolution: TimeUnit,

    /// Absolute stop time in ticks. Runs until the store drains when unset.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stop_at: Option<i64>,

    #[serde(default)]
    #[validate(nested)]
    pub calendar: CalendarConfig,
}

impl SimulatorConfig {
    pub fn options(&self) -> SimulatorOptions {
        SimulatorOptions {
            scheduler: self.scheduler,
            resolution: self.resolution,
            calendar: CalendarParams::from(&self.calendar),
        }
    }

    pub fn stop_time(&self) -> Option<VirtualTime> {
        self.stop_at.map(VirtualTime::from_ticks)
    }
}

/// Calendar queue tuning. Only affects performance, never ordering.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = validation::validate_calendar))]
pub struct CalendarConfig {
    #[serde(default = "default_buckets")]
    #[validate(range(min = 2, max = 1_048_576))]
    pub initial_buckets: usize,

    /// Initial bucket width in ticks.
    #[serde(default = "default_width")]
    #[validate(range(min = 1))]
    pub initial_width: i64,

    #[serde(default = "default_buckets")]
    #[validate(range(min = 2, max = 1_048_576))]
    pub min_buckets: usize,

    /// Events sampled when the bucket width is recomputed.
    #[serde(default = "default_max_samples")]
    #[validate(range(min = 2, max = 1024))]
    pub max_samples: usize,
}

fn default_buckets() -> usize {
    CalendarParams::default().initial_buckets
}

fn default_width() -> i64 {
    CalendarParams::default().initial_width
}

fn default_max_samples() -> usize {
    CalendarParams::default().max_samples
}

impl Default for CalendarConfig {
    fn default() -> Self {
        let params = CalendarParams::default();
        Self {
            initial_buckets: params.initial_buckets,
            initial_width: params.initial_width,
            min_buckets: params.min_buckets,
            max_samples: params.max_samples,
        }
    }
}

impl From<&CalendarConfig> for CalendarParams {
    fn from(config: &CalendarConfig) -> Self {
        CalendarParams {
            initial_buckets: config.initial_buckets,
            initial_width: config.initial_width,
            min_buckets: config.min_buckets,
            max_samples: config.max_samples,
        }
    }
}
