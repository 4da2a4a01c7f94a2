//! Layout errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("table needs at least one column")]
    NoColumns,

    #[error("table row {row} has {found} cells, expected {expected}")]
    Arity {
        row: usize,
        expected: usize,
        found: usize,
    },
}
