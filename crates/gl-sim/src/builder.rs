//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use gl_core::{Extent, SimConfig, SimRng, Tick};
use gl_mobility::Agent;
use gl_network::RoadNetwork;

use crate::{IndexRefresh, Repeat, ReversalBarrier, Schedule, Sim, SimResult, World};

/// Schedule ordering of agent steps.
pub const AGENT_ORDERING: i32 = 0;
/// Schedule ordering of the reversal barrier.
pub const BARRIER_ORDERING: i32 = 1;
/// Schedule ordering of the agent index refresh.
pub const REFRESH_ORDERING: i32 = 2;

/// Fluent builder for [`Sim<A>`].
///
/// | Method         | Default                              |
/// |----------------|--------------------------------------|
/// | `.extent(e)`   | the network's own extent             |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network)
///     .extent(areas.extent())
///     .build::<Commuter>()?;
/// sim.populate_path(&loader, path, &mut CommuterFactory::default());
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:  SimConfig,
    network: Arc<RoadNetwork>,
    extent:  Extent,
}

impl SimBuilder {
    pub fn new(config: SimConfig, network: impl Into<Arc<RoadNetwork>>) -> Self {
        Self { config, network: network.into(), extent: Extent::EMPTY }
    }

    /// Widen the shared model rectangle, e.g. with the area layer.
    pub fn extent(mut self, extent: Extent) -> Self {
        self.extent.expand_to_include(&extent);
        self
    }

    /// Validate the configuration, install the barrier and refresh tasks and
    /// return a ready [`Sim`] with an empty roster.
    pub fn build<A: Agent + 'static>(self) -> SimResult<Sim<A>> {
        let config = self.config;
        config.validate()?;

        let world = World::new(self.network, self.extent);
        log::info!("model extent {}", world.field().extent());

        let mut schedule: Schedule<World<A>> = Schedule::new();
        schedule.schedule_repeating(
            Box::new(ReversalBarrier),
            Repeat::every(config.barrier_interval_ticks)
                .starting(Tick(config.barrier_interval_ticks))
                .ordering(BARRIER_ORDERING),
        )?;
        schedule.schedule_repeating(
            Box::new(IndexRefresh),
            Repeat::every(config.index_refresh_interval_ticks).ordering(REFRESH_ORDERING),
        )?;

        Ok(Sim {
            rng: SimRng::new(config.seed),
            clock: Tick::ZERO,
            config,
            world,
            schedule,
        })
    }
}
