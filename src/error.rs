use thiserror::Error;

use crate::collections::square::Coord;
use crate::puzzle::Value;

/// Errors raised by puzzle construction and cell writes
///
/// Failed operations are atomic: a `set` that returns an error leaves the
/// grid and its candidate sets exactly as they were.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{value} is out of range [{min}:{max}]")]
    OutOfRange { value: Value, min: Value, max: Value },
    #[error("value {value} not allowed at {coord:?}")]
    ConstraintViolation { coord: Coord, value: Value },
    #[error("malformed grid: {0}")]
    MalformedGrid(String),
    #[error("invalid cage configuration: {0}")]
    InvalidCageConfiguration(String),
}

impl Error {
    pub(crate) fn size_out_of_range(size: usize) -> Self {
        Error::OutOfRange {
            value: size as Value,
            min: crate::puzzle::MIN_GRID_SIZE as Value,
            max: crate::puzzle::MAX_GRID_SIZE as Value,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::ConstraintViolation { .. })
    }
}
