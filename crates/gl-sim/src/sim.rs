//! The `Sim` struct and its tick loop.

use std::io::Read;
use std::path::Path;

use gl_core::{SimConfig, SimRng, Tick};
use gl_mobility::{Agent, AgentFactory, Trip};
use gl_population::{LoadReport, PopulationLoader};

use crate::builder::AGENT_ORDERING;
use crate::{AgentStep, Repeat, Schedule, SimObserver, SimResult, World};

/// The main simulation runner.
///
/// Owns the [`World`] and the [`Schedule`] that drives it.  Agents are added
/// with [`populate_path`](Self::populate_path) /
/// [`populate_reader`](Self::populate_reader) or [`admit`](Self::admit); each
/// admitted agent is scheduled to step every tick from the current tick on.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<A: Agent + 'static> {
    pub config:   SimConfig,
    /// The next tick to run.
    pub clock:    Tick,
    pub world:    World<A>,
    pub schedule: Schedule<World<A>>,
    /// Seeded RNG for setup draws (goal assignment).
    pub rng:      SimRng,
}

impl<A: Agent + 'static> Sim<A> {
    // ── Population ────────────────────────────────────────────────────────

    /// Start one agent and schedule it.  Returns `false` when it could not
    /// start; it is then dropped and nothing is registered.
    pub fn admit<F: AgentFactory<A>>(&mut self, factory: &mut F, trip: &Trip) -> bool {
        admit(&mut self.world, &mut self.schedule, factory, trip, self.clock)
    }

    /// Load the population table at `path` through `loader`.
    pub fn populate_path<F: AgentFactory<A>>(
        &mut self,
        loader:  &PopulationLoader<'_>,
        path:    &Path,
        factory: &mut F,
    ) -> LoadReport {
        let (world, schedule, now) = (&mut self.world, &mut self.schedule, self.clock);
        loader.load_path(path, &mut self.rng, |trip| admit(world, schedule, factory, &trip, now))
    }

    /// Load a population table from any `Read` source through `loader`.
    pub fn populate_reader<R: Read, F: AgentFactory<A>>(
        &mut self,
        loader:  &PopulationLoader<'_>,
        reader:  R,
        factory: &mut F,
    ) -> LoadReport {
        let (world, schedule, now) = (&mut self.world, &mut self.schedule, self.clock);
        loader.load_reader(reader, &mut self.rng, |trip| admit(world, schedule, factory, &trip, now))
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run until `config.end_tick()`, or indefinitely when unbounded.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick();
        log::info!(
            "running {} agents until {}",
            self.world.agent_count(),
            end.map_or_else(|| "stopped".to_string(), |t| t.to_string())
        );
        while end.is_none_or(|end| self.clock < end) {
            self.process_tick(observer);
        }
        observer.on_sim_end(self.clock);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.process_tick(observer);
        }
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock;
        observer.on_tick_start(now);

        let before = self.world.state().reversals;
        let stepped = self.schedule.step(&mut self.world, now);
        let state = self.world.state();
        if state.reversals != before {
            observer.on_reversal(now, state.direction, self.world.agent_count());
        }
        observer.on_tick_end(now, stepped);

        let every = self.config.progress_interval_ticks;
        if every > 0 && now.0 > 0 && now.0.is_multiple_of(every) {
            log::info!(
                "{now}: {}/{} arrived, heading {}, {} reversals",
                self.world.arrived_count(),
                self.world.agent_count(),
                state.direction,
                state.reversals
            );
        }
        self.clock = now.offset(1);
    }
}

/// Create, start and schedule one agent for `trip`.
fn admit<A, F>(
    world:    &mut World<A>,
    schedule: &mut Schedule<World<A>>,
    factory:  &mut F,
    trip:     &Trip,
    now:      Tick,
) -> bool
where
    A: Agent + 'static,
    F: AgentFactory<A>,
{
    let Some(next) = world.next_agent_id() else {
        log::warn!("agent id space exhausted; rejecting trip from {}", trip.start_road);
        return false;
    };
    let agent = factory.create(next, trip, world.state().direction);
    let Some(id) = world.admit(agent, now) else { return false };
    // Interval 1 is never rejected.
    schedule
        .schedule_repeating(Box::new(AgentStep(id)), Repeat::every(1).starting(now).ordering(AGENT_ORDERING))
        .is_ok()
}
