//! Commuter table rows.
//!
//! # Table format
//!
//! A comma-delimited file whose first line is a header (ignored).  Only four
//! positional columns are read; their indices depend on the dataset and are
//! set through [`PopulationColumns`].
//!
//! | Field        | Default column | Parsed as         |
//! |--------------|----------------|-------------------|
//! | `population` | 12             | `u32`             |
//! | `start_road` | 21             | `i64` (`RoadId`)  |
//! | `work_tract` | 22             | text              |
//! | `home_tract` | 23             | text              |
//!
//! Rows may have any number of other columns.  A row too short for one of
//! the configured indices, or with an unparsable number, is an error.

use std::io::Read;

use gl_core::RoadId;

use crate::{PopulationError, PopulationResult};

// ── PopulationColumns ─────────────────────────────────────────────────────────

/// Zero-based column positions of the fields read from each row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopulationColumns {
    pub population: usize,
    pub start_road: usize,
    pub work_tract: usize,
    pub home_tract: usize,
}

impl Default for PopulationColumns {
    fn default() -> Self {
        Self { population: 12, start_road: 21, work_tract: 22, home_tract: 23 }
    }
}

// ── CommuterRecord ────────────────────────────────────────────────────────────

/// The fields of one table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommuterRecord {
    /// 1-based line number in the source file.
    pub line:       u64,
    /// Raw count; negative values are kept and replicate to zero agents.
    pub population: i64,
    pub start_road: RoadId,
    pub work_tract: String,
    pub home_tract: String,
}

impl CommuterRecord {
    /// Extract the configured fields from a raw row.
    pub fn parse(
        row:     &csv::StringRecord,
        line:    u64,
        columns: &PopulationColumns,
    ) -> PopulationResult<Self> {
        let field = |column: usize| {
            row.get(column).ok_or(PopulationError::MissingColumn { line, column })
        };

        let population = parse_number::<i64>(field(columns.population)?, line, columns.population)?;
        let start_road = parse_number::<i64>(field(columns.start_road)?, line, columns.start_road)?;

        Ok(Self {
            line,
            population,
            start_road: RoadId(start_road),
            work_tract: field(columns.work_tract)?.trim().to_string(),
            home_tract: field(columns.home_tract)?.trim().to_string(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(s: &str, line: u64, column: usize) -> PopulationResult<T> {
    s.trim().parse::<T>().map_err(|_| PopulationError::InvalidNumber {
        line,
        column,
        value: s.to_string(),
    })
}

// ── RecordReader ──────────────────────────────────────────────────────────────

/// Streams [`CommuterRecord`]s from any `Read` source, header skipped.
///
/// Pass a `std::io::Cursor` in tests or a `File` in production.
pub struct RecordReader<R: Read> {
    inner:   csv::Reader<R>,
    columns: PopulationColumns,
    row:     csv::StringRecord,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R, columns: PopulationColumns) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { inner, columns, row: csv::StringRecord::new() }
    }
}

impl RecordReader<std::fs::File> {
    pub fn open(path: &std::path::Path, columns: PopulationColumns) -> PopulationResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(file, columns))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = PopulationResult<CommuterRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.row.position().map_or(0, |p| p.line());
                Some(CommuterRecord::parse(&self.row, line, &self.columns))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
