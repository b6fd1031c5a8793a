//! gridlock — headless commuter traffic simulation.
//!
//! Builds the road network from a road shapefile, loads commuters from the
//! population table and runs them back and forth between home and work.
//!
//! ```text
//! gridlock --config gridlock.toml [--ticks N] [--seed S]
//! ```
//!
//! Without `--ticks` (or `sim.total_ticks`) the run continues until the
//! process is stopped.  Log verbosity follows `RUST_LOG` (default `info`).

mod config;


use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use gl_core::{Direction, Extent, Tick};
use gl_mobility::{Commuter, CommuterFactory};
use gl_network::{shp, DijkstraRouter, RoadNetworkBuilder};
use gl_population::{GoalSet, LoadReport, PopulationLoader};
use gl_sim::{Sim, SimBuilder, SimObserver};

use config::GridlockConfig;

/// Headless commuter traffic simulation over a road shapefile.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run configuration (.toml or .json).
    #[arg(short, long)]
    config: PathBuf,

    /// Ticks to run; overrides `sim.total_ticks`.
    #[arg(long)]
    ticks: Option<u64>,

    /// RNG seed; overrides `sim.seed`.
    #[arg(long)]
    seed: Option<u64>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs every reversal and keeps a count for the summary.
#[derive(Default)]
struct ReversalLog {
    reversals: u64,
}

impl SimObserver for ReversalLog {
    fn on_reversal(&mut self, tick: Tick, direction: Direction, agents: usize) {
        self.reversals += 1;
        log::info!("{tick}: reversal #{} sends {agents} agents {direction}", self.reversals);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        log::info!("stopped at {final_tick} after {} reversals", self.reversals);
    }
}

// ── Model setup ───────────────────────────────────────────────────────────────

/// Read the data, build the network and admit the population.
fn build_model(config: &GridlockConfig) -> Result<(Sim<Commuter>, LoadReport)> {
    let data = &config.data;
    let roads = shp::read_roads(&data.roads, &[data.road_id_field.as_str()])
        .with_context(|| format!("failure reading roads layer {}", data.roads.display()))?;

    let mut extent = roads.extent();
    if let Some(areas_path) = &data.areas {
        let areas = shp::read_areas(areas_path)?;
        log::info!("read {} tract polygons", areas.len());
        extent.expand_to_include(&areas.extent());
    }

    let network = RoadNetworkBuilder::from_layer(&roads, &data.road_id_field)?;
    drop(roads);

    let goals = GoalSet::resolve(&config.goals, network.registry())
        .context("goal set does not match the road network")?;

    let mut sim = SimBuilder::new(config.sim.clone(), network)
        .extent(extent)
        .build::<Commuter>()?;

    let net = sim.world.network_arc();
    let loader = PopulationLoader::new(net.registry(), &goals)
        .with_columns(config.population.columns)
        .with_replication(config.population.replication);
    let mut factory = CommuterFactory::new(DijkstraRouter, config.agent.move_rate);
    let report = sim.populate_path(&loader, &data.population, &mut factory);

    Ok((sim, report))
}

fn summarize(sim: &Sim<Commuter>) {
    let world = &sim.world;
    println!("ticks run      : {}", sim.clock.0);
    println!("agents         : {}", world.agent_count());
    println!("arrived        : {}", world.arrived_count());
    println!("on the network : {}", world.ledger().total());
    println!("heading        : {}", world.state().direction);
    println!("reversals      : {}", world.state().reversals);
    if let Some((edge, n)) = world.ledger().busiest() {
        println!("busiest road   : {} ({n} agents)", world.network().edge(edge).road_id);
    }
    let extent: Extent = world.field().extent();
    println!("model extent   : {extent}");
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = GridlockConfig::from_file(&cli.config)?;
    config.apply_overrides(cli.ticks, cli.seed);
    config.validate()?;

    let (mut sim, report) = build_model(&config)?;
    if let Some(e) = &report.aborted {
        log::warn!("continuing with partial population after: {e}");
    }
    if sim.world.agent_count() == 0 {
        log::warn!("no agents admitted; the barrier will alternate with nothing to move");
    }

    let t0 = Instant::now();
    let mut observer = ReversalLog::default();
    sim.run(&mut observer)?;
    log::info!("simulation complete in {:.3} s", t0.elapsed().as_secs_f64());

    summarize(&sim);
    Ok(())
}
