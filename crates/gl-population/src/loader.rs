//! Population admission: records → trips → started agents.

use std::io::Read;
use std::path::Path;

use gl_core::SimRng;
use gl_mobility::Trip;
use gl_network::EdgeRegistry;

use crate::{CommuterRecord, GoalSet, PopulationColumns, PopulationError, RecordReader};

// ── Replication ───────────────────────────────────────────────────────────────

/// How many agents one table row produces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Replication {
    /// Exactly one agent per row; the population count is ignored.
    #[default]
    Single,
    /// One agent per unit of the row's population count.
    ByPopulation,
}

impl Replication {
    #[inline]
    pub fn copies(self, record: &CommuterRecord) -> u64 {
        match self {
            Replication::Single       => 1,
            Replication::ByPopulation => record.population.max(0) as u64,
        }
    }
}

// ── LoadReport ────────────────────────────────────────────────────────────────

/// Outcome of one population load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Rows parsed successfully.
    pub rows: u64,
    /// Agents admitted.
    pub loaded: u64,
    /// Rows skipped because their start road is not in the network.
    pub unknown_start_edge: u64,
    /// Agents discarded because they could not start.
    pub failed_start: u64,
    /// The error that stopped the load early, if any.  Agents admitted
    /// before it remain.
    pub aborted: Option<PopulationError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    pub fn rejected(&self) -> u64 {
        self.unknown_start_edge + self.failed_start
    }
}

// ── PopulationLoader ──────────────────────────────────────────────────────────

/// Reads commuter records and offers each resulting trip to an admission
/// callback.
///
/// The callback builds and starts the agent; it returns `false` when the
/// agent could not start, and the loader counts it as rejected.
pub struct PopulationLoader<'a> {
    registry:    &'a EdgeRegistry,
    goals:       &'a GoalSet,
    columns:     PopulationColumns,
    replication: Replication,
}

impl<'a> PopulationLoader<'a> {
    pub fn new(registry: &'a EdgeRegistry, goals: &'a GoalSet) -> Self {
        Self {
            registry,
            goals,
            columns:     PopulationColumns::default(),
            replication: Replication::default(),
        }
    }

    pub fn with_columns(mut self, columns: PopulationColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_replication(mut self, replication: Replication) -> Self {
        self.replication = replication;
        self
    }

    /// Load from a file.  An unreadable file aborts the load.
    pub fn load_path<F>(&self, path: &Path, rng: &mut SimRng, admit: F) -> LoadReport
    where
        F: FnMut(Trip) -> bool,
    {
        log::info!("populating model from {}...", path.display());
        match RecordReader::open(path, self.columns) {
            Ok(records) => self.load_records(records, rng, admit),
            Err(e) => finish(LoadReport { aborted: Some(e), ..LoadReport::default() }),
        }
    }

    /// Load from any `Read` source.
    pub fn load_reader<R, F>(&self, reader: R, rng: &mut SimRng, admit: F) -> LoadReport
    where
        R: Read,
        F: FnMut(Trip) -> bool,
    {
        self.load_records(RecordReader::new(reader, self.columns), rng, admit)
    }

    /// Admit every record produced by `records` until the first error.
    pub fn load_records<I, F>(&self, records: I, rng: &mut SimRng, mut admit: F) -> LoadReport
    where
        I: IntoIterator<Item = Result<CommuterRecord, PopulationError>>,
        F: FnMut(Trip) -> bool,
    {
        let mut report = LoadReport::default();

        for result in records {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    report.aborted = Some(e);
                    break;
                }
            };
            report.rows += 1;

            let Some(start_edge) = self.registry.get(record.start_road) else {
                log::debug!("line {}: start road {} not in network", record.line, record.start_road);
                report.unknown_start_edge += 1;
                continue;
            };
            let (goal_road, goal_edge) = self.goals.choose(rng);

            for _ in 0..self.replication.copies(&record) {
                let trip = Trip {
                    home_tract: record.home_tract.clone(),
                    work_tract: record.work_tract.clone(),
                    start_road: record.start_road,
                    start_edge,
                    goal_road,
                    goal_edge,
                };
                if admit(trip) {
                    report.loaded += 1;
                } else {
                    log::debug!("line {}: agent failed to start on {}", record.line, record.start_road);
                    report.failed_start += 1;
                }
            }
        }

        finish(report)
    }
}

fn finish(report: LoadReport) -> LoadReport {
    if let Some(e) = &report.aborted {
        log::error!("issue with population file: {e}; keeping {} agents", report.loaded);
    }
    if report.rejected() > 0 {
        log::warn!(
            "rejected {} rows with unknown start road, {} agents that failed to start",
            report.unknown_start_edge,
            report.failed_start
        );
    }
    log::info!("finished populating model: {} agents from {} rows", report.loaded, report.rows);
    report
}
