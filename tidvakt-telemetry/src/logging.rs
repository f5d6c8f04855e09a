//! ## tidvakt-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` always wins over the configured default level, so a single
//! noisy module can be turned up without touching the config file.

use std::time::Duration;

use tidvakt_core::{RunStats, SchedulerKind};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::TelemetryError;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber. Fails if one is already set.
    pub fn init(default_level: &str) -> Result<(), TelemetryError> {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|err| TelemetryError::Subscriber(err.to_string()))
    }

    /// One summary line per finished run.
    pub fn log_run(scheduler: SchedulerKind, stats: &RunStats, wall: Duration, digest: &str) {
        info!(
            %scheduler,
            scheduled = stats.scheduled,
            executed = stats.executed,
            cancelled = stats.cancelled,
            removed = stats.removed,
            discarded = stats.discarded,
            teardown = stats.teardown_executed,
            wall_ms = wall.as_secs_f64() * 1_000.0,
            digest,
            "Run summary"
        );
    }
}
