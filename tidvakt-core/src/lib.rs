//! # tidvakt-core
//!
//! Deterministic discrete-event simulation kernel.
//!
//! Callbacks are scheduled at points in virtual time and executed strictly in
//! `(time, insertion order)` order. Time only moves when the run loop jumps
//! to the next event; nothing here touches the wall clock.
//!
//! ### Key Submodules:
//! - `time`: `VirtualTime` ticks and unit conversion
//! - `event`: events, handles and their status
//! - `store`: pluggable event stores (heap, ordered map, unsorted list, calendar queue)
//! - `scheduler`: sequence numbers, tombstones and the destroy registry
//! - `simulator`: the Run / Stop / Destroy driver
//!
//! ### Guarantees:
//! - Same inputs, same backend or not, same execution order
//! - Virtual time never decreases during a run
//! - Cancelled events never run; destroy callbacks run newest first

pub mod error;
pub mod event;
pub mod scheduler;
pub mod simulator;
pub mod store;
pub mod time;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::event::{Context, EventHandle, EventResult, EventStatus, NO_CONTEXT};
    pub use crate::simulator::{Simulator, SimulatorOptions, SimulatorState};
    pub use crate::store::{CalendarParams, SchedulerKind};
    pub use crate::time::{TimeUnit, VirtualTime};
}

pub use error::SimulationError;
pub use event::{Context, EventHandle, EventResult, EventStatus, NO_CONTEXT};
pub use scheduler::RunStats;
pub use simulator::{Simulator, SimulatorOptions, SimulatorState};
pub use store::{CalendarParams, SchedulerKind};
pub use time::{TimeError, TimeUnit, VirtualTime};
