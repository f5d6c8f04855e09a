//! ## tidvakt-telemetry::metrics
//! **Prometheus counters and run-time histogram**
//!
//! Counters are labelled by backend so one registry can hold the results of
//! several runs side by side.

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use tidvakt_core::{RunStats, SchedulerKind};

use crate::TelemetryError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub events_scheduled: IntCounterVec,
    pub events_executed: IntCounterVec,
    pub events_cancelled: IntCounterVec,
    pub events_removed: IntCounterVec,
    pub run_wall_seconds: HistogramVec,
}

fn counter(name: &str, help: &str) -> Result<IntCounterVec, TelemetryError> {
    Ok(IntCounterVec::new(Opts::new(name, help), &["scheduler"])?)
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();
        let events_scheduled = counter(
            "tidvakt_events_scheduled_total",
            "Timed events inserted into the event store",
        )?;
        let events_executed =
            counter("tidvakt_events_executed_total", "Event callbacks invoked")?;
        let events_cancelled = counter(
            "tidvakt_events_cancelled_total",
            "Events cancelled before they fired",
        )?;
        let events_removed = counter(
            "tidvakt_events_removed_total",
            "Events eagerly removed from the event store",
        )?;
        let run_wall_seconds = HistogramVec::new(
            HistogramOpts::new("tidvakt_run_wall_seconds", "Wall-clock time spent in run()")
                .buckets(vec![0.000_1, 0.001, 0.01, 0.1, 1.0, 10.0]),
            &["scheduler"],
        )?;

        registry.register(Box::new(events_scheduled.clone()))?;
        registry.register(Box::new(events_executed.clone()))?;
        registry.register(Box::new(events_cancelled.clone()))?;
        registry.register(Box::new(events_removed.clone()))?;
        registry.register(Box::new(run_wall_seconds.clone()))?;

        Ok(Self {
            registry,
            events_scheduled,
            events_executed,
            events_cancelled,
            events_removed,
            run_wall_seconds,
        })
    }

    /// Adds the counters of one finished run.
    pub fn record_run(&self, scheduler: SchedulerKind, stats: &RunStats, wall: Duration) {
        let label = [scheduler.as_str()];
        self.events_scheduled
            .with_label_values(&label)
            .inc_by(stats.scheduled);
        self.events_executed
            .with_label_values(&label)
            .inc_by(stats.executed);
        self.events_cancelled
            .with_label_values(&label)
            .inc_by(stats.cancelled);
        self.events_removed
            .with_label_values(&label)
            .inc_by(stats.removed);
        self.run_wall_seconds
            .with_label_values(&label)
            .observe(wall.as_secs_f64());
    }

    /// Text exposition format of everything recorded so far.
    pub fn gather_metrics(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
