//! The lab's single current matrix and its calculation state.
//!
//! `Idle → Calculating → {Ready, Failed}`. Any edit of the matrix (resize,
//! reset, example load, cell edit) drops the previous result or error and
//! returns to `Idle`.

use tracing::{debug, info, warn};

use crate::core::eigen::{compute_with, EigenResult, EigenSolver};
use crate::core::error::MatrixError;
use crate::core::matrix::{Matrix, MatrixSize};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LabState {
    #[default]
    Idle,
    Calculating,
    Ready(EigenResult),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Lab {
    matrix: Matrix,
    state: LabState,
}

impl Lab {
    pub fn new(size: MatrixSize) -> Self {
        Self { matrix: Matrix::zeros(size), state: LabState::Idle }
    }

    pub fn with_matrix(matrix: Matrix) -> Self {
        Self { matrix, state: LabState::Idle }
    }

    pub fn size(&self) -> MatrixSize {
        self.matrix.size()
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn state(&self) -> &LabState {
        &self.state
    }

    pub fn result(&self) -> Option<&EigenResult> {
        match &self.state {
            LabState::Ready(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LabState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Fresh zero matrix of `size`.
    pub fn resize(&mut self, size: MatrixSize) {
        debug!(%size, "resize");
        self.matrix = Matrix::zeros(size);
        self.state = LabState::Idle;
    }

    pub fn reset(&mut self) {
        self.resize(self.size());
    }

    pub fn load_example(&mut self) {
        self.matrix = Matrix::example(self.size());
        self.state = LabState::Idle;
    }

    /// Replace the whole matrix; the size follows the new matrix.
    pub fn replace(&mut self, matrix: Matrix) {
        self.matrix = matrix;
        self.state = LabState::Idle;
    }

    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> Result<(), MatrixError> {
        self.matrix.set_text(row, col, text)?;
        self.state = LabState::Idle;
        Ok(())
    }

    pub fn calculate<S: EigenSolver + ?Sized>(&mut self, solver: &S) -> &LabState {
        self.state = LabState::Calculating;
        self.state = match compute_with(solver, self.matrix.as_dmatrix()) {
            Ok(result) => {
                info!(count = result.len(), "calculation complete");
                LabState::Ready(result)
            }
            Err(e) => {
                warn!(error = %e, "calculation failed");
                LabState::Failed(e.to_string())
            }
        };
        &self.state
    }
}
