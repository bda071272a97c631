use std::fmt;

/// Structurally invalid input handed to the engine.
///
/// Numeric degeneracies (zero variance, zero denominators, sparse
/// neighborhoods) never produce this error; they resolve to sentinel values
/// inside the analysis modules instead.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    /// The iteration table has no records
    EmptyTable,
    /// A prefix of zero iterations was requested
    EmptySlice,
    /// A required column is absent from the header
    MissingColumn(&'static str),
    /// A required column appears more than once in the header
    DuplicateColumn(&'static str),
    /// A data row does not have one cell per header column
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A parameter or target value is NaN or infinite
    NonFiniteValue { iteration: u32, column: &'static str },
    /// Iteration numbers must start at 1 and increase by exactly one
    IterationOrder {
        position: usize,
        expected: u32,
        found: u32,
    },
    /// A threshold is negative or not finite
    InvalidThreshold { name: &'static str, value: f64 },
    /// The surrogate curve needs at least two sample points
    TooFewSamplePoints(usize),
    /// A name that is not one of the fixed parameter columns
    UnknownParameter(String),
    /// A name that is not one of the fixed target columns
    UnknownTarget(String),
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInputError::EmptyTable => write!(f, "iteration table is empty"),
            InvalidInputError::EmptySlice => {
                write!(f, "active slice must include at least one iteration")
            }
            InvalidInputError::MissingColumn(name) => write!(f, "missing required column {name}"),
            InvalidInputError::DuplicateColumn(name) => {
                write!(f, "column {name} appears more than once")
            }
            InvalidInputError::RowLength {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            InvalidInputError::NonFiniteValue { iteration, column } => {
                write!(f, "iteration {iteration} has a non-finite {column} value")
            }
            InvalidInputError::IterationOrder {
                position,
                expected,
                found,
            } => write!(
                f,
                "record at position {position} has iteration {found}, expected {expected}"
            ),
            InvalidInputError::InvalidThreshold { name, value } => {
                write!(f, "invalid {name} threshold {value}: must be finite and >= 0")
            }
            InvalidInputError::TooFewSamplePoints(n) => {
                write!(f, "surrogate curve needs at least 2 sample points, got {n}")
            }
            InvalidInputError::UnknownParameter(name) => write!(f, "unknown parameter {name:?}"),
            InvalidInputError::UnknownTarget(name) => write!(f, "unknown target {name:?}"),
        }
    }
}

impl std::error::Error for InvalidInputError {}

pub type Result<T> = std::result::Result<T, InvalidInputError>;
