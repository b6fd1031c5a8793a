//! Unit tests for gl-population.

use gl_core::{Coord, RoadId, SimRng};
use gl_network::{RoadNetwork, RoadNetworkBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn c(x: f64, y: f64) -> Coord {
    Coord { x, y }
}

/// Roads 10, 20, 30 in a line.
fn network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    b.add_road(RoadId(10), vec![c(0.0, 0.0), c(1.0, 0.0)]).unwrap();
    b.add_road(RoadId(20), vec![c(1.0, 0.0), c(2.0, 0.0)]).unwrap();
    b.add_road(RoadId(30), vec![c(2.0, 0.0), c(3.0, 0.0)]).unwrap();
    b.build()
}

/// A 24-column row with the fields at the default positions.
fn row(population: &str, start_road: &str, work: &str, home: &str) -> String {
    let mut cols: Vec<String> = (0..24).map(|i| format!("c{i}")).collect();
    cols[12] = population.to_string();
    cols[21] = start_road.to_string();
    cols[22] = work.to_string();
    cols[23] = home.to_string();
    cols.join(",")
}

fn table(rows: &[String]) -> String {
    let header: Vec<String> = (0..24).map(|i| format!("H{i}")).collect();
    let mut s = header.join(",");
    for r in rows {
        s.push('\n');
        s.push_str(r);
    }
    s.push('\n');
    s
}

// ── Records ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod record {
    use std::io::Cursor;

    use super::*;
    use crate::{PopulationColumns, PopulationError, RecordReader};

    #[test]
    fn header_skipped_fields_extracted() {
        let csv = table(&[row("12", "10", "W1", "H1"), row(" 3 ", "20", "W2", "H2")]);
        let records: Vec<_> = RecordReader::new(Cursor::new(csv), PopulationColumns::default())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].population, 12);
        assert_eq!(records[0].start_road, RoadId(10));
        assert_eq!(records[0].work_tract, "W1");
        assert_eq!(records[0].home_tract, "H1");
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].population, 3);
    }

    #[test]
    fn custom_columns() {
        let csv = "pop,road,work,home\n4,30,A,B\n";
        let cols = PopulationColumns { population: 0, start_road: 1, work_tract: 2, home_tract: 3 };
        let r = RecordReader::new(Cursor::new(csv), cols).next().unwrap().unwrap();
        assert_eq!(r.start_road, RoadId(30));
        assert_eq!((r.work_tract.as_str(), r.home_tract.as_str()), ("A", "B"));
    }

    #[test]
    fn short_row_is_missing_column() {
        let csv = table(&["1,2,3".to_string()]);
        let err = RecordReader::new(Cursor::new(csv), PopulationColumns::default())
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, PopulationError::MissingColumn { line: 2, column: 12 }));
    }

    #[test]
    fn bad_number_is_invalid() {
        let csv = table(&[row("many", "10", "W", "H")]);
        let err = RecordReader::new(Cursor::new(csv), PopulationColumns::default())
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, PopulationError::InvalidNumber { column: 12, .. }));
    }
}

// ── Goal set ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod goals {
    use super::*;
    use crate::{GoalSet, PopulationError};

    #[test]
    fn resolves_in_order() {
        let net = network();
        let goals = GoalSet::resolve(&[RoadId(30), RoadId(10)], net.registry()).unwrap();
        let roads: Vec<RoadId> = goals.iter().map(|(r, _)| r).collect();
        assert_eq!(roads, vec![RoadId(30), RoadId(10)]);
        assert_eq!(goals.len(), 2);
    }

    #[test]
    fn empty_is_fatal() {
        let net = network();
        assert!(matches!(GoalSet::resolve(&[], net.registry()), Err(PopulationError::EmptyGoalSet)));
    }

    #[test]
    fn unknown_goal_is_fatal() {
        let net = network();
        let err = GoalSet::resolve(&[RoadId(10), RoadId(21399)], net.registry()).unwrap_err();
        assert!(matches!(err, PopulationError::UnknownGoal(RoadId(21399))));
    }

    #[test]
    fn choose_stays_in_set_and_is_seeded() {
        let net = network();
        let goals = GoalSet::resolve(&[RoadId(10), RoadId(20), RoadId(30)], net.registry()).unwrap();
        let draw = |seed| {
            let mut rng = SimRng::new(seed);
            (0..20).map(|_| goals.choose(&mut rng).0).collect::<Vec<_>>()
        };
        let a = draw(7);
        assert_eq!(a, draw(7));
        assert!(a.iter().all(|r| [RoadId(10), RoadId(20), RoadId(30)].contains(r)));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use gl_mobility::Trip;

    use super::*;
    use crate::{GoalSet, PopulationError, PopulationLoader, Replication};

    fn load(csv: String, goals: &[i64], replication: Replication, accept: bool) -> (Vec<Trip>, crate::LoadReport) {
        let net = network();
        let roads: Vec<RoadId> = goals.iter().map(|&g| RoadId(g)).collect();
        let goals = GoalSet::resolve(&roads, net.registry()).unwrap();
        let mut trips = Vec::new();
        let report = PopulationLoader::new(net.registry(), &goals)
            .with_replication(replication)
            .load_reader(Cursor::new(csv), &mut SimRng::new(1), |t| {
                trips.push(t);
                accept
            });
        (trips, report)
    }

    #[test]
    fn single_record_yields_one_trip_to_goal() {
        let (trips, report) = load(table(&[row("1", "10", "W", "H")]), &[30], Replication::Single, true);
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].start_road, RoadId(10));
        assert_eq!(trips[0].goal_road, RoadId(30));
        assert_eq!(report.loaded, 1);
        assert!(report.is_complete());
    }

    #[test]
    fn unknown_start_skips_row_and_continues() {
        let csv = table(&[row("1", "11", "W", "H"), row("1", "20", "W", "H")]);
        let (trips, report) = load(csv, &[30], Replication::Single, true);
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].start_road, RoadId(20));
        assert_eq!(report.rows, 2);
        assert_eq!(report.unknown_start_edge, 1);
        assert_eq!(report.loaded, 1);
        assert!(report.is_complete());
    }

    #[test]
    fn failed_start_counted_not_loaded() {
        let (trips, report) = load(table(&[row("1", "10", "W", "H")]), &[30], Replication::Single, false);
        assert_eq!(trips.len(), 1);
        assert_eq!(report.loaded, 0);
        assert_eq!(report.failed_start, 1);
        assert_eq!(report.rejected(), 1);
    }

    #[test]
    fn single_ignores_population() {
        let (trips, _) = load(table(&[row("5", "10", "W", "H")]), &[30], Replication::Single, true);
        assert_eq!(trips.len(), 1);
    }

    #[test]
    fn by_population_replicates_with_shared_goal() {
        let csv = table(&[row("3", "10", "W", "H"), row("0", "20", "W", "H")]);
        let (trips, report) = load(csv, &[20, 30], Replication::ByPopulation, true);
        assert_eq!(trips.len(), 3);
        assert!(trips.iter().all(|t| t.goal_road == trips[0].goal_road));
        assert_eq!(report.rows, 2);
        assert_eq!(report.loaded, 3);
    }

    #[test]
    fn negative_population_is_not_malformed() {
        let csv = table(&[row("-1", "10", "W", "H"), row("1", "20", "W", "H")]);

        let (trips, report) = load(csv.clone(), &[30], Replication::Single, true);
        assert_eq!(trips.len(), 2);
        assert_eq!(report.rows, 2);
        assert!(report.is_complete());

        let (trips, report) = load(csv, &[30], Replication::ByPopulation, true);
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].start_road, RoadId(20));
        assert_eq!(report.rows, 2);
        assert!(report.is_complete());
    }

    #[test]
    fn malformed_row_aborts_keeping_earlier_agents() {
        let csv = table(&[
            row("1", "10", "W", "H"),
            row("1", "abc", "W", "H"),
            row("1", "20", "W", "H"),
        ]);
        let (trips, report) = load(csv, &[30], Replication::Single, true);
        assert_eq!(trips.len(), 1);
        assert_eq!(report.loaded, 1);
        assert!(matches!(report.aborted, Some(PopulationError::InvalidNumber { line: 3, column: 21, .. })));
    }

    #[test]
    fn missing_file_aborts() {
        let net = network();
        let goals = GoalSet::resolve(&[RoadId(30)], net.registry()).unwrap();
        let report = PopulationLoader::new(net.registry(), &goals).load_path(
            std::path::Path::new("/nonexistent/population.csv"),
            &mut SimRng::new(0),
            |_| true,
        );
        assert!(matches!(report.aborted, Some(PopulationError::Io(_))));
        assert_eq!(report.loaded, 0);
    }
}
