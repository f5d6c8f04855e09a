use thiserror::Error;

use crate::time::{TimeError, VirtualTime};

/// Errors that abort a simulation run.
///
/// Every variant describes a programming error in a calling model or a
/// misuse of the simulator lifecycle. None of them is recovered from
/// inside the core; they propagate out of [`crate::Simulator::run`].
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("cannot schedule an event with negative delay {delay}")]
    NegativeDelay { delay: VirtualTime },

    #[error("cannot schedule an event at {at}, current time is {now}")]
    ScheduleInPast { at: VirtualTime, now: VirtualTime },

    #[error("Virtual time error: {0}")]
    Time(#[from] TimeError),

    #[error("simulator has been destroyed")]
    Destroyed,

    #[error("simulator is already running")]
    AlreadyRunning,

    #[error("cannot destroy the simulator from inside a running event")]
    DestroyWhileRunning,

    #[error("unknown scheduler '{0}' (expected heap, map, list or calendar)")]
    UnknownScheduler(String),

    #[error("Event callback failed: {0}")]
    Callback(String),
}

impl SimulationError {
    /// Wraps a model-level failure raised from inside an event callback.
    pub fn callback(message: impl Into<String>) -> Self {
        SimulationError::Callback(message.into())
    }
}
