//! ## tidvakt-core::simulator
//! **Run / Stop / Destroy driver over virtual time**
//!
//! The simulator ties together the virtual clock, the scheduler and its
//! event store. Its loop extracts the earliest live event, advances `now`
//! to the event's fire time and invokes the callback with `&mut Simulator`,
//! so callbacks can schedule, cancel and stop re-entrantly. Exactly one
//! callback runs at a time and always to completion.
//!
//! ### Lifecycle:
//! - `Idle` → `run()` → `Running` → (store empty | `stop()`) → `Idle`
//! - `Idle` → `destroy()` → `Destroyed` (terminal)

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::SimulationError;
use crate::event::{Context, EventHandle, EventResult, NO_CONTEXT};
use crate::scheduler::{RunStats, Scheduler};
use crate::store::{CalendarParams, SchedulerKind};
use crate::time::{TimeError, TimeUnit, VirtualTime};

/// Driver state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulatorState {
    Idle,
    Running,
    /// `stop()` was called; the loop exits once the current callback returns.
    StopRequested,
    Destroyed,
}

impl fmt::Display for SimulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulatorState::Idle => "idle",
            SimulatorState::Running => "running",
            SimulatorState::StopRequested => "stop-requested",
            SimulatorState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Construction-time options. The backend cannot be changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorOptions {
    pub scheduler: SchedulerKind,
    /// What one tick means.
    pub resolution: TimeUnit,
    pub calendar: CalendarParams,
}

/// Discrete-event simulator.
///
/// # Examples
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use tidvakt_core::{Simulator, SchedulerKind, VirtualTime};
///
/// let mut sim = Simulator::with_scheduler(SchedulerKind::Calendar);
/// let fired = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&fired);
/// sim.schedule(VirtualTime::from_ticks(10), move |sim| {
///     log.borrow_mut().push(sim.now());
///     Ok(())
/// })
/// .unwrap();
/// sim.run().unwrap();
/// assert_eq!(*fired.borrow(), vec![VirtualTime::from_ticks(10)]);
/// ```
pub struct Simulator {
    scheduler: Scheduler,
    now: VirtualTime,
    context: Context,
    state: SimulatorState,
    resolution: TimeUnit,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorOptions::default())
    }
}

impl Simulator {
    pub fn new(options: SimulatorOptions) -> Self {
        debug!(
            scheduler = %options.scheduler,
            resolution = %options.resolution,
            "Creating simulator"
        );
        Self {
            scheduler: Scheduler::new(options.scheduler, &options.calendar),
            now: VirtualTime::ZERO,
            context: NO_CONTEXT,
            state: SimulatorState::Idle,
            resolution: options.resolution,
        }
    }

    /// Simulator with default options and the given backend.
    pub fn with_scheduler(kind: SchedulerKind) -> Self {
        Self::new(SimulatorOptions {
            scheduler: kind,
            ..SimulatorOptions::default()
        })
    }

    /// Current virtual time. Inside a callback this is the event's fire time.
    #[inline]
    pub fn now(&self) -> VirtualTime {
        self.now
    }

    /// Context of the event being executed, `NO_CONTEXT` outside of events.
    #[inline]
    pub fn context(&self) -> Context {
        self.context
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn resolution(&self) -> TimeUnit {
        self.resolution
    }

    pub fn scheduler_kind(&self) -> SchedulerKind {
        self.scheduler.kind()
    }

    pub fn stats(&self) -> RunStats {
        self.scheduler.stats()
    }

    /// Number of callbacks executed so far.
    ///
    /// The event scheduled by [`stop_at`](Self::stop_at) is an ordinary
    /// callback and is counted once it fires.
    pub fn event_count(&self) -> u64 {
        self.scheduler.stats().executed
    }

    /// Live timed events still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// No live timed events remain.
    ///
    /// A pending [`stop_at`](Self::stop_at) event counts as live, so this is
    /// `false` until it fires or its handle is cancelled.
    pub fn is_finished(&self) -> bool {
        self.scheduler.pending_count() == 0
    }

    /// Converts a human quantity into ticks of this simulator's resolution.
    pub fn time(&self, value: i64, unit: TimeUnit) -> Result<VirtualTime, TimeError> {
        VirtualTime::from_unit(value, unit, self.resolution)
    }

    fn ensure_alive(&self) -> Result<(), SimulationError> {
        if self.state == SimulatorState::Destroyed {
            return Err(SimulationError::Destroyed);
        }
        Ok(())
    }

    /// Schedules `f` to run `delay` after `now()`, in the current context.
    pub fn schedule<F>(&mut self, delay: VirtualTime, f: F) -> Result<EventHandle, SimulationError>
    where
        F: FnOnce(&mut Simulator) -> EventResult + 'static,
    {
        self.schedule_with_context(self.context, delay, f)
    }

    /// Schedules `f` to run `delay` after `now()` on behalf of `context`.
    pub fn schedule_with_context<F>(
        &mut self,
        context: Context,
        delay: VirtualTime,
        f: F,
    ) -> Result<EventHandle, SimulationError>
    where
        F: FnOnce(&mut Simulator) -> EventResult + 'static,
    {
        self.ensure_alive()?;
        if delay.is_negative() {
            error!(delay = %delay, now = %self.now, "Negative scheduling delay");
            return Err(SimulationError::NegativeDelay { delay });
        }
        let at = self
            .now
            .checked_add(delay)
            .ok_or(TimeError::ArithmeticOverflow)?;
        self.scheduler.insert(at, context, Box::new(f))
    }

    /// Runs `f` at the current time, after everything already due now.
    pub fn schedule_now<F>(&mut self, f: F) -> Result<EventHandle, SimulationError>
    where
        F: FnOnce(&mut Simulator) -> EventResult + 'static,
    {
        self.schedule(VirtualTime::ZERO, f)
    }

    /// Schedules `f` at the absolute time `at`, which must not be in the past.
    pub fn schedule_at<F>(&mut self, at: VirtualTime, f: F) -> Result<EventHandle, SimulationError>
    where
        F: FnOnce(&mut Simulator) -> EventResult + 'static,
    {
        self.ensure_alive()?;
        if at < self.now {
            error!(at = %at, now = %self.now, "Scheduling in the past");
            return Err(SimulationError::ScheduleInPast { at, now: self.now });
        }
        self.scheduler.insert(at, self.context, Box::new(f))
    }

    /// Registers `f` to run during `destroy()`, after pending events are
    /// discarded. Destroy callbacks run last-registered first.
    pub fn schedule_destroy<F>(&mut self, f: F) -> Result<EventHandle, SimulationError>
    where
        F: FnOnce(&mut Simulator) -> EventResult + 'static,
    {
        self.ensure_alive()?;
        self.scheduler.insert_teardown(self.now, Box::new(f))
    }

    /// Tombstones a pending event. Returns `false` for stale handles and for
    /// handles issued by another simulator.
    pub fn cancel(&mut self, handle: &EventHandle) -> bool {
        self.scheduler.cancel(handle)
    }

    /// Removes a pending event from the store now. Returns `false` for stale
    /// handles and for handles issued by another simulator.
    pub fn remove(&mut self, handle: &EventHandle) -> bool {
        self.scheduler.remove(handle)
    }

    pub fn is_pending(&self, handle: &EventHandle) -> bool {
        handle.is_pending()
    }

    pub fn is_expired(&self, handle: &EventHandle) -> bool {
        handle.is_expired()
    }

    /// Time until `handle` fires; zero for stale handles and destroy callbacks.
    pub fn delay_left(&self, handle: &EventHandle) -> VirtualTime {
        if !handle.is_pending() || handle.is_teardown() {
            return VirtualTime::ZERO;
        }
        handle.time().saturating_sub(self.now)
    }

    /// Processes events until the store is empty or a stop is observed.
    ///
    /// The first error returned by a callback aborts the run and is
    /// returned here; the simulator goes back to `Idle`.
    #[instrument(skip(self), fields(scheduler = %self.scheduler.kind()))]
    pub fn run(&mut self) -> Result<(), SimulationError> {
        match self.state {
            SimulatorState::Idle => {}
            SimulatorState::Destroyed => {
                error!("Run requested on a destroyed simulator");
                return Err(SimulationError::Destroyed);
            }
            SimulatorState::Running | SimulatorState::StopRequested => {
                error!("Run requested while already running");
                return Err(SimulationError::AlreadyRunning);
            }
        }

        info!(
            now = %self.now,
            pending = self.pending_count(),
            "Simulation run started"
        );
        self.state = SimulatorState::Running;
        let outcome = self.drive();
        self.state = SimulatorState::Idle;
        self.context = NO_CONTEXT;

        match &outcome {
            Ok(()) => info!(
                now = %self.now,
                executed = self.event_count(),
                pending = self.pending_count(),
                "Simulation run finished"
            ),
            Err(err) => error!(now = %self.now, %err, "Simulation run aborted"),
        }
        outcome
    }

    fn drive(&mut self) -> Result<(), SimulationError> {
        while self.state == SimulatorState::Running {
            let Some(event) = self.scheduler.next_event() else {
                break;
            };
            debug_assert!(event.time() >= self.now, "virtual time went backwards");
            self.now = event.time();
            self.context = event.context();
            self.scheduler.record_executed();
            trace!(uid = event.uid(), time = %self.now, context = self.context, "Invoking event");
            event.invoke(self)?;
        }
        Ok(())
    }

    /// Requests the run loop to exit once the current callback returns.
    ///
    /// Returns `false` (and does nothing) when the simulator is not running.
    pub fn stop(&mut self) -> bool {
        if self.state != SimulatorState::Running {
            warn!(state = %self.state, "Stop requested while not running");
            return false;
        }
        debug!(now = %self.now, "Stop requested");
        self.state = SimulatorState::StopRequested;
        true
    }

    /// Stops the run when virtual time reaches `at`.
    ///
    /// Events due at or before `at` that were scheduled earlier still run.
    /// The stop is a regular event: it shows up in `pending_count` and
    /// `event_count`, and cancelling the returned handle withdraws it.
    pub fn stop_at(&mut self, at: VirtualTime) -> Result<EventHandle, SimulationError> {
        debug!(at = %at, "Stop scheduled");
        self.schedule_at(at, |sim| {
            sim.stop();
            Ok(())
        })
    }

    /// Stops the run `delay` after the current time.
    pub fn stop_after(&mut self, delay: VirtualTime) -> Result<EventHandle, SimulationError> {
        if delay.is_negative() {
            return Err(SimulationError::NegativeDelay { delay });
        }
        let at = self
            .now
            .checked_add(delay)
            .ok_or(TimeError::ArithmeticOverflow)?;
        self.stop_at(at)
    }

    /// Tears the simulator down.
    ///
    /// Pending events are discarded without running, then destroy callbacks
    /// run newest first, then the event store is released. Calling it again
    /// is a no-op. All destroy callbacks run even if one fails; the first
    /// failure is returned.
    #[instrument(skip(self), fields(scheduler = %self.scheduler.kind()))]
    pub fn destroy(&mut self) -> Result<(), SimulationError> {
        match self.state {
            SimulatorState::Idle => {}
            SimulatorState::Destroyed => {
                debug!("Simulator already destroyed");
                return Ok(());
            }
            SimulatorState::Running | SimulatorState::StopRequested => {
                error!("Destroy requested from inside a running event");
                return Err(SimulationError::DestroyWhileRunning);
            }
        }

        self.state = SimulatorState::Destroyed;
        let discarded = self.scheduler.discard_pending();
        debug!(discarded, "Discarded pending events");

        let mut first_failure = None;
        while let Some(event) = self.scheduler.pop_teardown() {
            self.context = NO_CONTEXT;
            trace!(uid = event.uid(), "Invoking destroy callback");
            if let Err(err) = event.invoke(self) {
                error!(%err, "Destroy callback failed");
                first_failure.get_or_insert(err);
            }
        }
        self.scheduler.release_store();
        info!(now = %self.now, discarded, "Simulator destroyed");

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if self.state == SimulatorState::Idle {
            if let Err(err) = self.destroy() {
                error!(%err, "Destroy on drop failed");
            }
        }
    }
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("scheduler", &self.scheduler.kind())
            .field("now", &self.now)
            .field("state", &self.state)
            .field("pending", &self.scheduler.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing_test::traced_test;

    use super::*;

    fn ticks(t: i64) -> VirtualTime {
        VirtualTime::from_ticks(t)
    }

    type Log = Rc<RefCell<Vec<(i64, &'static str)>>>;

    fn record(log: &Log, label: &'static str) -> impl FnOnce(&mut Simulator) -> EventResult {
        let log = Rc::clone(log);
        move |sim| {
            log.borrow_mut().push((sim.now().ticks(), label));
            Ok(())
        }
    }

    #[test]
    fn runs_events_in_time_order() {
        let mut sim = Simulator::default();
        let log = Log::default();
        sim.schedule(ticks(30), record(&log, "c")).unwrap();
        sim.schedule(ticks(10), record(&log, "a")).unwrap();
        sim.schedule(ticks(20), record(&log, "b")).unwrap();
        sim.run().unwrap();

        assert_eq!(*log.borrow(), vec![(10, "a"), (20, "b"), (30, "c")]);
        assert_eq!(sim.now(), ticks(30));
        assert_eq!(sim.event_count(), 3);
        assert!(sim.is_finished());
        assert_eq!(sim.state(), SimulatorState::Idle);
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut sim = Simulator::default();
        let err = sim.schedule(ticks(-1), |_| Ok(())).unwrap_err();
        assert!(matches!(err, SimulationError::NegativeDelay { .. }));
        assert_eq!(sim.pending_count(), 0);
    }

    #[test]
    fn scheduling_in_the_past_is_rejected() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(50), |sim| {
            let err = sim.schedule_at(ticks(10), |_| Ok(())).unwrap_err();
            assert!(matches!(err, SimulationError::ScheduleInPast { .. }));
            sim.schedule_at(ticks(50), |_| Ok(()))?;
            Ok(())
        })
        .unwrap();
        sim.run().unwrap();
        assert_eq!(sim.event_count(), 2);
    }

    #[test]
    fn delay_overflow_is_reported() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(5), |sim| {
            sim.schedule(VirtualTime::MAX, |_| Ok(()))?;
            Ok(())
        })
        .unwrap();
        let err = sim.run().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Time(TimeError::ArithmeticOverflow)
        ));
    }

    #[test]
    fn callback_error_aborts_the_run() {
        let mut sim = Simulator::default();
        let log = Log::default();
        sim.schedule(ticks(1), record(&log, "first")).unwrap();
        sim.schedule(ticks(2), |_| Err(SimulationError::callback("link down")))
            .unwrap();
        sim.schedule(ticks(3), record(&log, "never")).unwrap();

        let err = sim.run().unwrap_err();
        assert!(matches!(err, SimulationError::Callback(ref msg) if msg == "link down"));
        assert_eq!(*log.borrow(), vec![(1, "first")]);
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert_eq!(sim.pending_count(), 1);
    }

    #[test]
    fn nested_run_is_rejected() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(1), |sim| {
            assert!(matches!(sim.run(), Err(SimulationError::AlreadyRunning)));
            Ok(())
        })
        .unwrap();
        sim.run().unwrap();
    }

    #[test]
    fn stop_from_callback_takes_effect_after_it_returns() {
        let mut sim = Simulator::default();
        let log = Log::default();
        let inner = Rc::clone(&log);
        sim.schedule(ticks(1), move |sim| {
            assert!(sim.stop());
            inner.borrow_mut().push((sim.now().ticks(), "stopper"));
            Ok(())
        })
        .unwrap();
        sim.schedule(ticks(1), record(&log, "same-tick")).unwrap();
        sim.run().unwrap();

        assert_eq!(*log.borrow(), vec![(1, "stopper")]);
        assert_eq!(sim.pending_count(), 1);

        // A stopped simulator can be resumed.
        sim.run().unwrap();
        assert_eq!(log.borrow().last(), Some(&(1, "same-tick")));
    }

    #[traced_test]
    #[test]
    fn stop_while_idle_is_a_noop() {
        let mut sim = Simulator::default();
        assert!(!sim.stop());
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert!(logs_contain("Stop requested while not running"));
    }

    #[traced_test]
    #[test]
    fn run_and_destroy_are_logged() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(1), |_| Ok(())).unwrap();
        sim.run().unwrap();
        sim.destroy().unwrap();

        assert!(logs_contain("Simulation run started"));
        assert!(logs_contain("Simulation run finished"));
        assert!(logs_contain("Simulator destroyed"));
    }

    #[traced_test]
    #[test]
    fn failing_callback_is_logged() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(1), |_| Err(SimulationError::callback("queue overflow")))
            .unwrap();
        assert!(sim.run().is_err());
        assert!(logs_contain("Simulation run aborted"));
        assert!(logs_contain("queue overflow"));
    }

    #[test]
    fn stop_after_is_relative_to_now() {
        let mut sim = Simulator::default();
        let log = Log::default();
        sim.schedule(ticks(10), |sim| {
            sim.stop_after(ticks(5))?;
            Ok(())
        })
        .unwrap();
        sim.schedule(ticks(15), record(&log, "at-15")).unwrap();
        sim.schedule(ticks(16), record(&log, "at-16")).unwrap();
        sim.run().unwrap();

        assert_eq!(*log.borrow(), vec![(15, "at-15")]);
        assert_eq!(sim.now(), ticks(15));
    }

    #[test]
    fn stop_event_is_counted_like_any_other() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(2), |_| Ok(())).unwrap();
        let stop = sim.stop_at(ticks(5)).unwrap();
        sim.schedule(ticks(8), |_| Ok(())).unwrap();
        sim.run().unwrap();

        assert!(stop.is_expired());
        assert_eq!(sim.event_count(), 2);
        assert_eq!(sim.stats().executed, 2);
        assert_eq!(sim.pending_count(), 1);

        let second = sim.stop_at(ticks(20)).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.now(), ticks(20));
        assert_eq!(sim.event_count(), 4);
        assert!(sim.is_finished());

        let idle = sim.stop_at(ticks(30)).unwrap();
        assert!(!sim.is_finished());
        assert_eq!(sim.pending_count(), 1);
        assert!(sim.cancel(&idle));
        assert!(sim.is_finished());
        assert!(second.is_expired());
    }

    #[test]
    fn context_is_inherited_and_overridable() {
        let mut sim = Simulator::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let outer = Rc::clone(&seen);
        sim.schedule_with_context(7, ticks(1), move |sim| {
            outer.borrow_mut().push(sim.context());
            let inherited = Rc::clone(&outer);
            sim.schedule(ticks(1), move |sim| {
                inherited.borrow_mut().push(sim.context());
                Ok(())
            })?;
            let other = Rc::clone(&outer);
            sim.schedule_with_context(9, ticks(2), move |sim| {
                other.borrow_mut().push(sim.context());
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
        assert_eq!(sim.context(), NO_CONTEXT);
        sim.run().unwrap();
        assert_eq!(*seen.borrow(), vec![7, 7, 9]);
        assert_eq!(sim.context(), NO_CONTEXT);
    }

    #[test]
    fn delay_left_counts_down() {
        let mut sim = Simulator::default();
        let target = sim.schedule(ticks(100), |_| Ok(())).unwrap();
        let probe = target.clone();
        sim.schedule(ticks(40), move |sim| {
            assert_eq!(sim.delay_left(&probe), ticks(60));
            Ok(())
        })
        .unwrap();
        assert_eq!(sim.delay_left(&target), ticks(100));
        sim.run().unwrap();
        assert_eq!(sim.delay_left(&target), VirtualTime::ZERO);
    }

    #[test]
    fn running_event_sees_itself_as_expired() {
        let mut sim = Simulator::default();
        let slot: Rc<RefCell<Option<EventHandle>>> = Rc::default();
        let inner = Rc::clone(&slot);
        let handle = sim
            .schedule(ticks(3), move |sim| {
                let own = inner.borrow().clone().unwrap();
                assert!(own.is_running());
                assert!(sim.is_expired(&own));
                assert!(!sim.cancel(&own));
                Ok(())
            })
            .unwrap();
        *slot.borrow_mut() = Some(handle.clone());
        sim.run().unwrap();
        assert!(handle.is_expired());
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn destroy_rejected_while_running() {
        let mut sim = Simulator::default();
        sim.schedule(ticks(1), |sim| {
            assert!(matches!(
                sim.destroy(),
                Err(SimulationError::DestroyWhileRunning)
            ));
            Ok(())
        })
        .unwrap();
        sim.run().unwrap();
        sim.destroy().unwrap();
        assert_eq!(sim.state(), SimulatorState::Destroyed);
    }

    #[test]
    fn destroyed_simulator_refuses_work() {
        let mut sim = Simulator::default();
        sim.destroy().unwrap();
        sim.destroy().unwrap();
        assert!(matches!(sim.run(), Err(SimulationError::Destroyed)));
        assert!(matches!(
            sim.schedule(ticks(1), |_| Ok(())),
            Err(SimulationError::Destroyed)
        ));
        assert!(matches!(
            sim.schedule_destroy(|_| Ok(())),
            Err(SimulationError::Destroyed)
        ));
    }

    #[test]
    fn destroy_callbacks_cannot_schedule_timed_events() {
        let mut sim = Simulator::default();
        sim.schedule_destroy(|sim| {
            assert!(matches!(
                sim.schedule_now(|_| Ok(())),
                Err(SimulationError::Destroyed)
            ));
            Ok(())
        })
        .unwrap();
        sim.destroy().unwrap();
    }

    #[test]
    fn destroy_reports_first_failure_but_runs_everything() {
        let mut sim = Simulator::default();
        let log = Log::default();
        sim.schedule_destroy(record(&log, "a")).unwrap();
        sim.schedule_destroy(|_| Err(SimulationError::callback("b failed")))
            .unwrap();
        sim.schedule_destroy(|_| Err(SimulationError::callback("c failed")))
            .unwrap();

        let err = sim.destroy().unwrap_err();
        assert!(matches!(err, SimulationError::Callback(ref msg) if msg == "c failed"));
        assert_eq!(*log.borrow(), vec![(0, "a")]);
    }

    #[test]
    fn drop_runs_destroy_callbacks() {
        let log = Log::default();
        {
            let mut sim = Simulator::default();
            sim.schedule_destroy(record(&log, "cleanup")).unwrap();
        }
        assert_eq!(*log.borrow(), vec![(0, "cleanup")]);
    }

    #[test]
    fn time_helper_uses_resolution() {
        let sim = Simulator::new(SimulatorOptions {
            resolution: TimeUnit::Us,
            ..SimulatorOptions::default()
        });
        assert_eq!(sim.time(3, TimeUnit::Ms).unwrap(), ticks(3_000));
        assert!(sim.time(i64::MAX, TimeUnit::S).is_err());
    }
}
