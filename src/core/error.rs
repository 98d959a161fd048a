use thiserror::Error;

/// Problems building or editing a [`Matrix`](crate::core::matrix::Matrix).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Unsupported matrix size {0}: choose 2, 3 or 4")]
    UnsupportedSize(usize),
    #[error("Matrix must be square: row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },
    #[error("Row {row} has {len} cells but the matrix is {size}x{size}")]
    RowTooLong { row: usize, len: usize, size: usize },
    #[error("Cell ({row}, {col}) is outside a {size}x{size} matrix")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("Cell ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
    #[error("Matrix input is empty")]
    Empty,
}

/// Failures of an eigendecomposition request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("Cannot decompose a {rows}x{cols} matrix: input must be square with size 2 to 4")]
    Shape { rows: usize, cols: usize },
    #[error("Matrix entry ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
    #[error("Eigen decomposition failed: {0}")]
    Decomposition(String),
    #[error("Solver returned malformed output: {0}")]
    MalformedOutput(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Cannot format non-finite value {0}")]
    NonFinite(f64),
}
