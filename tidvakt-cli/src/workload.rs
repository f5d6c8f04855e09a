//! Seeded synthetic workload.
//!
//! Root events are scheduled at random delays. When one fires it may spawn
//! a zero-delay follow-up, a delayed child, and cancel or remove a random
//! earlier event. Every invocation `(now, id)` is folded into a BLAKE3
//! digest, so two runs agree on the digest only if they executed the same
//! events at the same times in the same order.
//!
//! All randomness is drawn inside callbacks, in invocation order, so the
//! workload itself is identical across backends as long as the ordering is.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use tidvakt_config::WorkloadConfig;
use tidvakt_core::{
    EventHandle, EventResult, RunStats, SchedulerKind, SimulationError, Simulator,
    SimulatorOptions, VirtualTime,
};

/// Spawned events stop spawning beyond this depth.
const MAX_GENERATION: u32 = 3;
/// Chance that an executed event schedules a delayed child.
const CHILD_PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    pub scheduler: SchedulerKind,
    pub seed: u64,
    pub digest: String,
    /// Timed callbacks executed, destroy callbacks excluded.
    pub invocations: u64,
    /// Virtual time when the run loop returned, in ticks.
    pub final_time: i64,
    /// Live events left behind by a stop, discarded by destroy.
    pub left_pending: usize,
    pub stats: RunStats,
    pub wall_ms: f64,
}

impl WorkloadReport {
    /// Fields that must match between backends.
    pub fn fingerprint(&self) -> (&str, u64, i64, usize) {
        (
            &self.digest,
            self.invocations,
            self.final_time,
            self.left_pending,
        )
    }

    pub fn wall(&self) -> Duration {
        Duration::from_secs_f64(self.wall_ms / 1_000.0)
    }
}

struct Workload {
    rng: StdRng,
    hasher: blake3::Hasher,
    config: WorkloadConfig,
    /// Handles that may still be cancelled; stale entries are harmless.
    targets: Vec<EventHandle>,
    next_id: u64,
    invocations: u64,
}

type Shared = Rc<RefCell<Workload>>;

impl Workload {
    fn new(config: &WorkloadConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            hasher: blake3::Hasher::new(),
            config: config.clone(),
            targets: Vec::new(),
            next_id: 0,
            invocations: 0,
        }
    }

    fn record(&mut self, now: VirtualTime, id: u64) {
        self.hasher.update(&now.ticks().to_le_bytes());
        self.hasher.update(&id.to_le_bytes());
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn spawn(
    sim: &mut Simulator,
    state: &Shared,
    delay: VirtualTime,
    generation: u32,
) -> Result<(), SimulationError> {
    let id = state.borrow_mut().allocate_id();
    let shared = Rc::clone(state);
    let handle = sim.schedule(delay, move |sim| on_event(sim, &shared, id, generation))?;
    state.borrow_mut().targets.push(handle);
    Ok(())
}

fn on_event(sim: &mut Simulator, state: &Shared, id: u64, generation: u32) -> EventResult {
    let (chain, child_delay, victim) = {
        let mut guard = state.borrow_mut();
        let work = &mut *guard;
        work.record(sim.now(), id);
        work.invocations += 1;

        let can_spawn = generation < MAX_GENERATION;
        let chain = can_spawn && work.rng.random_bool(work.config.chain_probability);
        let child_delay = (can_spawn && work.rng.random_bool(CHILD_PROBABILITY))
            .then(|| work.rng.random_range(0..work.config.max_delay));
        let victim = (!work.targets.is_empty()
            && work.rng.random_bool(work.config.cancel_probability))
        .then(|| {
            let index = work.rng.random_range(0..work.targets.len());
            let eager = work.rng.random_bool(0.5);
            (work.targets.swap_remove(index), eager)
        });
        (chain, child_delay, victim)
    };

    if chain {
        spawn(sim, state, VirtualTime::ZERO, generation + 1)?;
    }
    if let Some(delay) = child_delay {
        spawn(sim, state, VirtualTime::from_ticks(delay), generation + 1)?;
    }
    if let Some((handle, eager)) = victim {
        let hit = if eager {
            sim.remove(&handle)
        } else {
            sim.cancel(&handle)
        };
        // Whether the victim was still pending is part of the observable trace.
        state.borrow_mut().hasher.update(&[u8::from(hit)]);
    }
    Ok(())
}

/// Runs the workload once on the backend described by `options`.
pub fn run_workload(
    config: &WorkloadConfig,
    options: SimulatorOptions,
    stop_at: Option<VirtualTime>,
) -> Result<WorkloadReport, SimulationError> {
    let scheduler = options.scheduler;
    let state: Shared = Rc::new(RefCell::new(Workload::new(config)));
    let mut sim = Simulator::new(options);

    for index in 0..config.destroy_callbacks as u64 {
        let shared = Rc::clone(&state);
        sim.schedule_destroy(move |sim| {
            shared.borrow_mut().record(sim.now(), u64::MAX - index);
            Ok(())
        })?;
    }

    for _ in 0..config.events {
        let delay = {
            let mut work = state.borrow_mut();
            let max_delay = work.config.max_delay;
            work.rng.random_range(0..max_delay)
        };
        spawn(&mut sim, &state, VirtualTime::from_ticks(delay), 0)?;
    }
    if let Some(at) = stop_at {
        sim.stop_at(at)?;
    }

    let started = Instant::now();
    sim.run()?;
    let wall = started.elapsed();
    let final_time = sim.now().ticks();
    let left_pending = sim.pending_count();
    debug!(%scheduler, left_pending, "Workload run complete, destroying simulator");
    sim.destroy()?;

    let stats = sim.stats();
    let work = state.borrow();
    Ok(WorkloadReport {
        scheduler,
        seed: config.seed,
        digest: hex::encode(work.hasher.finalize().as_bytes()),
        invocations: work.invocations,
        final_time,
        left_pending,
        stats,
        wall_ms: wall.as_secs_f64() * 1_000.0,
    })
}
