use gl_core::RoadId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("population file: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: missing column {column}")]
    MissingColumn { line: u64, column: usize },

    #[error("line {line}, column {column}: {value:?} is not a valid number")]
    InvalidNumber { line: u64, column: usize, value: String },

    #[error("goal set is empty")]
    EmptyGoalSet,

    #[error("goal road {0} is not in the network")]
    UnknownGoal(RoadId),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
