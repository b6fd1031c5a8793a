//! Integration tests for gl-sim.

use std::io::Cursor;

use gl_core::{AgentId, Coord, Direction, EdgeId, RoadId, SimConfig, Tick};
use gl_mobility::{Agent, CommuterFactory, MoveContext, Trip};
use gl_network::{RoadNetwork, RoadNetworkBuilder};
use gl_population::{GoalSet, PopulationColumns, PopulationLoader};

use crate::{NoopObserver, Sim, SimBuilder, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn c(x: f64, y: f64) -> Coord {
    Coord { x, y }
}

fn test_config() -> SimConfig {
    SimConfig { progress_interval_ticks: 0, ..SimConfig::default() }
}

/// Roads 1, 2, 3 of 100 units in a line, plus detached road 9.
fn corridor() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    b.add_road(RoadId(1), vec![c(0.0, 0.0), c(100.0, 0.0)]).unwrap();
    b.add_road(RoadId(2), vec![c(100.0, 0.0), c(200.0, 0.0)]).unwrap();
    b.add_road(RoadId(3), vec![c(200.0, 0.0), c(300.0, 0.0)]).unwrap();
    b.add_road(RoadId(9), vec![c(0.0, 5000.0), c(10.0, 5000.0)]).unwrap();
    b.build()
}

fn trip(net: &RoadNetwork, start: i64, goal: i64) -> Trip {
    Trip {
        home_tract: "H".into(),
        work_tract: "W".into(),
        start_road: RoadId(start),
        start_edge: net.edge_by_road(RoadId(start)).unwrap(),
        goal_road:  RoadId(goal),
        goal_edge:  net.edge_by_road(RoadId(goal)).unwrap(),
    }
}

/// Agent that arrives once the tick reaches `arrive_at`, then again
/// `period` ticks after every reversal.
struct Scripted {
    arrive_at: u64,
    period:    u64,
    start_ok:  bool,
    edge:      EdgeId,
    arrived:   bool,
    steps:     u32,
    reversals: u32,
    created:   Direction,
}

impl Scripted {
    fn new(arrive_at: u64, period: u64) -> Self {
        Self {
            arrive_at,
            period,
            start_ok: true,
            edge: EdgeId(0),
            arrived: false,
            steps: 0,
            reversals: 0,
            created: Direction::ToWork,
        }
    }
}

impl Agent for Scripted {
    fn start(&mut self, ctx: &mut MoveContext<'_>) -> bool {
        if self.start_ok {
            ctx.ledger.enter(ctx.agent, self.edge);
        }
        self.start_ok
    }

    fn step(&mut self, ctx: &mut MoveContext<'_>) {
        self.steps += 1;
        if ctx.tick.0 >= self.arrive_at {
            self.arrived = true;
        }
    }

    fn has_arrived(&self) -> bool {
        self.arrived
    }

    fn reverse(&mut self, ctx: &mut MoveContext<'_>) {
        self.arrived = false;
        self.reversals += 1;
        self.arrive_at = ctx.tick.0 + self.period;
    }

    fn position(&self) -> Coord {
        c(self.steps as f64, 0.0)
    }
}

fn scripted_sim(config: SimConfig, agents: Vec<Scripted>) -> Sim<Scripted> {
    let net = corridor();
    let t = trip(&net, 1, 3);
    let mut sim = SimBuilder::new(config, net).build::<Scripted>().unwrap();
    for agent in agents {
        let mut slot = Some(agent);
        let mut factory = |_: AgentId, _: &Trip, dir: Direction| {
            let mut a = slot.take().unwrap();
            a.created = dir;
            a
        };
        sim.admit(&mut factory, &t);
    }
    sim
}

#[derive(Default)]
struct Recorder {
    ticks:     u64,
    reversals: Vec<(Tick, Direction, usize)>,
    ended:     Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_end(&mut self, _tick: Tick, _stepped: usize) {
        self.ticks += 1;
    }
    fn on_reversal(&mut self, tick: Tick, direction: Direction, agents: usize) {
        self.reversals.push((tick, direction, agents));
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use gl_core::Tick;

    use crate::{Repeat, Schedule, SimError, Steppable};

    type Log = Vec<(u64, &'static str)>;

    struct Push(&'static str);

    impl Steppable<Log> for Push {
        fn step(&mut self, log: &mut Log, tick: Tick) {
            log.push((tick.0, self.0));
        }
    }

    #[test]
    fn orders_by_ordering_then_insertion() {
        let mut s: Schedule<Log> = Schedule::new();
        s.schedule_repeating(Box::new(Push("late")), Repeat::every(1).ordering(5)).unwrap();
        s.schedule_repeating(Box::new(Push("a")), Repeat::every(1)).unwrap();
        s.schedule_repeating(Box::new(Push("b")), Repeat::every(1)).unwrap();
        let mut log = Log::new();
        assert_eq!(s.step(&mut log, Tick(0)), 3);
        assert_eq!(log, vec![(0, "a"), (0, "b"), (0, "late")]);
    }

    #[test]
    fn start_and_interval_respected() {
        let mut s: Schedule<Log> = Schedule::new();
        s.schedule_repeating(Box::new(Push("x")), Repeat::every(10).starting(Tick(10))).unwrap();
        let mut log = Log::new();
        for t in 0..=30 {
            s.step(&mut log, Tick(t));
        }
        assert_eq!(log, vec![(10, "x"), (20, "x"), (30, "x")]);
        assert_eq!(s.next_tick(), Some(Tick(40)));
    }

    #[test]
    fn max_interval_runs_once() {
        let mut s: Schedule<Log> = Schedule::new();
        s.schedule_repeating(Box::new(Push("once")), Repeat::every(u64::MAX)).unwrap();
        let mut log = Log::new();
        for t in 0..100 {
            s.step(&mut log, Tick(t));
        }
        assert_eq!(log, vec![(0, "once")]);
    }

    #[test]
    fn zero_interval_rejected() {
        let mut s: Schedule<Log> = Schedule::new();
        let err = s.schedule_repeating(Box::new(Push("x")), Repeat::every(0)).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
        assert!(s.is_empty());
    }
}

// ── Barrier ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod barrier {
    use super::*;
    use crate::barrier::{evaluate, BarrierOutcome};
    use crate::SimState;

    fn arrived(flags: &[bool]) -> Vec<Scripted> {
        flags
            .iter()
            .map(|&f| {
                let mut a = Scripted::new(0, 0);
                a.arrived = f;
                a
            })
            .collect()
    }

    #[test]
    fn waits_while_anyone_travels() {
        let state = SimState::default();
        let (next, outcome) = evaluate(state, &arrived(&[true, false, true]), Tick(10));
        assert_eq!(next, state);
        assert_eq!(outcome, BarrierOutcome::Waiting { pending: 1 });
    }

    #[test]
    fn flips_when_all_arrived() {
        let (next, outcome) = evaluate(SimState::default(), &arrived(&[true, true]), Tick(20));
        assert_eq!(next.direction, Direction::ToHome);
        assert_eq!(next.reversals, 1);
        assert_eq!(next.last_reversal, Some(Tick(20)));
        assert_eq!(outcome, BarrierOutcome::Reversed { direction: Direction::ToHome });

        let (back, _) = evaluate(next, &arrived(&[true]), Tick(30));
        assert_eq!(back.direction, Direction::ToWork);
        assert_eq!(back.reversals, 2);
    }

    #[test]
    fn two_agent_scenario() {
        // Both still travelling at tick 10, both arrived by tick 20.
        let mut sim = scripted_sim(test_config(), vec![Scripted::new(15, 100), Scripted::new(12, 100)]);
        sim.run_ticks(11, &mut NoopObserver).unwrap();
        assert_eq!(sim.world.state().direction, Direction::ToWork);
        assert_eq!(sim.world.state().reversals, 0);
        assert!(sim.world.roster().iter().all(|a| a.reversals == 0));

        let mut rec = Recorder::default();
        sim.run_ticks(10, &mut rec).unwrap();
        let state = sim.world.state();
        assert_eq!(state.direction, Direction::ToHome);
        assert_eq!(state.reversals, 1);
        assert_eq!(rec.reversals, vec![(Tick(20), Direction::ToHome, 2)]);
        for a in sim.world.roster() {
            assert!(!a.has_arrived());
            assert_eq!(a.reversals, 1);
        }
    }

    #[test]
    fn barrier_sees_steps_of_same_tick() {
        // Arrives exactly on the barrier tick; agents run before the barrier.
        let mut sim = scripted_sim(test_config(), vec![Scripted::new(10, 100)]);
        sim.run_ticks(11, &mut NoopObserver).unwrap();
        assert_eq!(sim.world.state().reversals, 1);
    }

    #[test]
    fn empty_roster_alternates() {
        let mut sim = scripted_sim(test_config(), vec![]);
        sim.run_ticks(21, &mut NoopObserver).unwrap();
        assert_eq!(sim.world.state().reversals, 2);
        assert_eq!(sim.world.state().direction, Direction::ToWork);
    }

    #[test]
    fn stalled_agent_blocks_forever() {
        let mut sim = scripted_sim(test_config(), vec![Scripted::new(0, 0), Scripted::new(u64::MAX, 0)]);
        sim.run_ticks(200, &mut NoopObserver).unwrap();
        assert_eq!(sim.world.state().reversals, 0);
    }
}

// ── Admission ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod admission {
    use super::*;

    #[test]
    fn failed_start_is_not_registered() {
        let mut bad = Scripted::new(0, 0);
        bad.start_ok = false;
        let sim = scripted_sim(test_config(), vec![Scripted::new(0, 0), bad, Scripted::new(0, 0)]);
        assert_eq!(sim.world.agent_count(), 2);
        assert_eq!(sim.world.field().len(), 2);
        assert_eq!(sim.world.ledger().total(), 2);
        // barrier + refresh + two agents
        assert_eq!(sim.schedule.len(), 4);
    }

    #[test]
    fn every_agent_steps_once_per_tick() {
        let mut sim = scripted_sim(test_config(), vec![Scripted::new(99, 0), Scripted::new(99, 0)]);
        sim.run_ticks(7, &mut NoopObserver).unwrap();
        assert!(sim.world.roster().iter().all(|a| a.steps == 7));
        assert_eq!(sim.world.field().position(AgentId(1)), c(7.0, 0.0));
    }

    #[test]
    fn direction_applies_to_new_agents_only() {
        let mut sim = scripted_sim(test_config(), vec![Scripted::new(0, 1000)]);
        sim.run_ticks(11, &mut NoopObserver).unwrap();
        assert_eq!(sim.world.state().direction, Direction::ToHome);

        let net = sim.world.network_arc();
        let mut slot = Some(Scripted::new(0, 1000));
        let mut factory = |_: AgentId, _: &Trip, dir: Direction| {
            let mut a = slot.take().unwrap();
            a.created = dir;
            a
        };
        assert!(sim.admit(&mut factory, &trip(&net, 1, 3)));
        let roster = sim.world.roster();
        assert_eq!(roster[0].created, Direction::ToWork);
        assert_eq!(roster[1].created, Direction::ToHome);
    }

    #[test]
    fn ids_follow_roster_order() {
        let mut bad = Scripted::new(0, 0);
        bad.start_ok = false;
        let sim = scripted_sim(test_config(), vec![Scripted::new(0, 0), bad, Scripted::new(0, 0)]);
        // The rejected agent does not consume an id.
        assert_eq!(sim.world.next_agent_id(), Some(AgentId(2)));
        assert_eq!(sim.world.agent_count(), 2);
    }
}

// ── Agent field ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod field {
    use gl_core::Extent;

    use super::*;
    use crate::AgentField;

    fn field_of(points: &[Coord]) -> AgentField {
        let mut f = AgentField::new(Extent::from_coords(points.iter().copied()));
        for (i, &p) in points.iter().enumerate() {
            f.insert(AgentId(i as u32), p);
        }
        f
    }

    #[test]
    fn within_returns_sorted_ids_in_radius() {
        let f = field_of(&[c(0.0, 0.0), c(500.0, 0.0), c(3.0, 4.0), c(0.0, 6.0)]);
        assert_eq!(f.within(c(0.0, 0.0), 5.5), vec![AgentId(0), AgentId(2)]);
        assert!(f.within(c(250.0, 250.0), 1.0).is_empty());
    }

    #[test]
    fn queries_see_moves_only_after_refresh() {
        let mut f = field_of(&[c(0.0, 0.0), c(500.0, 0.0)]);
        f.refresh(Tick::ZERO);

        f.set_position(AgentId(1), c(2.0, 0.0));
        assert_eq!(f.position(AgentId(1)), c(2.0, 0.0));
        assert_eq!(f.within(c(0.0, 0.0), 10.0), vec![AgentId(0)]);
        assert_eq!(f.nearest(c(3.0, 0.0)), Some(AgentId(0)));

        f.refresh(Tick(5));
        assert_eq!(f.last_refresh(), Some(Tick(5)));
        assert_eq!(f.within(c(0.0, 0.0), 10.0), vec![AgentId(0), AgentId(1)]);
        assert_eq!(f.nearest(c(3.0, 0.0)), Some(AgentId(1)));
    }
}

// ── Population + commuters ────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use gl_mobility::Commuter;

    use super::*;

    const COLUMNS: PopulationColumns =
        PopulationColumns { population: 0, start_road: 1, work_tract: 2, home_tract: 3 };

    fn commuter_sim(csv: &str, goals: &[i64]) -> (Sim<Commuter>, gl_population::LoadReport) {
        let mut sim = SimBuilder::new(test_config(), corridor()).build::<Commuter>().unwrap();
        let net = sim.world.network_arc();
        let roads: Vec<RoadId> = goals.iter().map(|&g| RoadId(g)).collect();
        let goals = GoalSet::resolve(&roads, net.registry()).unwrap();
        let loader = PopulationLoader::new(net.registry(), &goals).with_columns(COLUMNS);
        let report = sim.populate_reader(&loader, Cursor::new(csv.to_string()), &mut CommuterFactory::default());
        (sim, report)
    }

    #[test]
    fn registry_scenario() {
        let (sim, report) = commuter_sim("pop,road,work,home\n1,1,W,H\n", &[3]);
        assert_eq!(report.loaded, 1);
        assert_eq!(sim.world.agent_count(), 1);
        assert_eq!(sim.world.roster()[0].trip().goal_road, RoadId(3));
    }

    #[test]
    fn rejection_isolation() {
        let csv = "pop,road,work,home\n1,77,W,H\n1,9,W,H\n1,2,W,H\n";
        let (sim, report) = commuter_sim(csv, &[3]);
        assert_eq!(report.rows, 3);
        assert_eq!(report.unknown_start_edge, 1);
        assert_eq!(report.failed_start, 1);
        assert_eq!(report.loaded, 1);
        assert_eq!(sim.world.agent_count(), 1);
        assert_eq!(sim.world.roster()[0].trip().start_road, RoadId(2));
        assert_eq!(sim.schedule.len(), 3);
    }

    #[test]
    fn commute_cycle_keeps_ledger_consistent() {
        let csv = "pop,road,work,home\n1,1,W,H\n1,1,W,H\n1,2,W,H\n";
        let (mut sim, report) = commuter_sim(csv, &[3]);
        assert_eq!(report.loaded, 3);

        let mut rec = Recorder::default();
        for _ in 0..41 {
            sim.run_ticks(1, &mut rec).unwrap();
            assert!(sim.world.ledger().is_consistent());
            assert!(sim.world.ledger().total() <= sim.world.agent_count());
        }
        // Out by tick 4, barrier at 10; back by tick 15, barrier at 20; ...
        let ticks: Vec<Tick> = rec.reversals.iter().map(|r| r.0).collect();
        assert_eq!(ticks, vec![Tick(10), Tick(20), Tick(30), Tick(40)]);
        assert_eq!(sim.world.field().last_refresh(), Some(Tick::ZERO));
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runner {
    use super::*;
    use crate::SimError;

    #[test]
    fn bounded_run_stops_at_end_tick() {
        let config = SimConfig { total_ticks: Some(25), ..test_config() };
        let mut sim = scripted_sim(config, vec![Scripted::new(0, 3)]);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(sim.clock, Tick(25));
        assert_eq!(rec.ticks, 25);
        assert_eq!(rec.ended, Some(Tick(25)));
        assert_eq!(rec.reversals.len(), 2);
    }

    #[test]
    fn refresh_interval_configurable() {
        let config = SimConfig { index_refresh_interval_ticks: 5, ..test_config() };
        let mut sim = scripted_sim(config, vec![Scripted::new(99, 0)]);
        sim.run_ticks(12, &mut NoopObserver).unwrap();
        assert_eq!(sim.world.field().last_refresh(), Some(Tick(10)));
        assert_eq!(sim.world.field().nearest(c(100.0, 0.0)), Some(AgentId(0)));
    }

    #[test]
    fn zero_barrier_interval_rejected() {
        let config = SimConfig { barrier_interval_ticks: 0, ..test_config() };
        let err = SimBuilder::new(config, corridor()).build::<Scripted>().err().unwrap();
        assert!(matches!(err, SimError::Core(gl_core::GlError::Config(_))));
    }

    #[test]
    fn extent_includes_areas() {
        let far = gl_core::Extent::from_coords([c(-50.0, -50.0), c(10.0, 10.0)]);
        let sim = SimBuilder::new(test_config(), corridor()).extent(far).build::<Scripted>().unwrap();
        let e = sim.world.field().extent();
        assert_eq!(e.min, c(-50.0, -50.0));
        assert_eq!(e.max, c(300.0, 5000.0));
    }
}
