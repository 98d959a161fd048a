//! Square input matrix for the lab.
//!
//! A [`Matrix`] is always exactly n×n with n ∈ {2, 3, 4} and every cell a
//! finite `f64`. Cell text that is empty or not a number reads as 0, the same
//! way a blank input box does.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use nalgebra::DMatrix;

use crate::core::error::MatrixError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixSize {
    Two,
    Three,
    Four,
}

impl MatrixSize {
    pub const ALL: [MatrixSize; 3] = [MatrixSize::Two, MatrixSize::Three, MatrixSize::Four];

    pub fn dim(self) -> usize {
        match self {
            MatrixSize::Two => 2,
            MatrixSize::Three => 3,
            MatrixSize::Four => 4,
        }
    }
}

impl TryFrom<usize> for MatrixSize {
    type Error = MatrixError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(MatrixSize::Two),
            3 => Ok(MatrixSize::Three),
            4 => Ok(MatrixSize::Four),
            other => Err(MatrixError::UnsupportedSize(other)),
        }
    }
}

impl From<MatrixSize> for usize {
    fn from(size: MatrixSize) -> usize {
        size.dim()
    }
}

impl FromStr for MatrixSize {
    type Err = MatrixError;

    /// Accepts `3`, `3x3` or `3×3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let head = s.split(['x', 'X', '×']).next().unwrap_or(s).trim();
        let n: usize = head.parse().map_err(|_| MatrixError::UnsupportedSize(0))?;
        MatrixSize::try_from(n)
    }
}

impl fmt::Display for MatrixSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.dim();
        write!(f, "{n}×{n}")
    }
}

const EXAMPLE_2: [[f64; 2]; 2] = [[4.0, 2.0], [1.0, 3.0]];
const EXAMPLE_3: [[f64; 3]; 3] = [[2.0, 0.0, 0.0], [0.0, 3.0, 4.0], [0.0, 4.0, 9.0]];
const EXAMPLE_4: [[f64; 4]; 4] = [
    [4.0, 1.0, 0.0, 0.0],
    [1.0, 4.0, 1.0, 0.0],
    [0.0, 1.0, 4.0, 1.0],
    [0.0, 0.0, 1.0, 4.0],
];

/// Parse one cell of user input. Empty, unparsable and non-finite text is 0.
pub fn parse_cell(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    size: MatrixSize,
    cells: DMatrix<f64>,
}

impl Matrix {
    pub fn zeros(size: MatrixSize) -> Self {
        let n = size.dim();
        Self { size, cells: DMatrix::zeros(n, n) }
    }

    /// The fixed preset for `size`.
    pub fn example(size: MatrixSize) -> Self {
        let n = size.dim();
        let cells = match size {
            MatrixSize::Two => DMatrix::from_fn(n, n, |r, c| EXAMPLE_2[r][c]),
            MatrixSize::Three => DMatrix::from_fn(n, n, |r, c| EXAMPLE_3[r][c]),
            MatrixSize::Four => DMatrix::from_fn(n, n, |r, c| EXAMPLE_4[r][c]),
        };
        Self { size, cells }
    }

    /// Strict constructor: rows must form a finite square matrix of size 2 to 4.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        if rows.is_empty() {
            return Err(MatrixError::Empty);
        }
        let size = MatrixSize::try_from(rows.len())?;
        let n = size.dim();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::NotSquare { row: r, len: row.len(), expected: n });
            }
            if let Some(c) = row.iter().position(|v| !v.is_finite()) {
                return Err(MatrixError::NonFinite { row: r, col: c });
            }
        }
        Ok(Self { size, cells: DMatrix::from_fn(n, n, |r, c| rows[r][c]) })
    }

    /// Lenient text form: rows split by `;` or newlines, cells by `,` or
    /// whitespace. Brackets are ignored, so `[[4,2],[1,3]]` works too.
    /// Short rows are padded with zeros.
    pub fn parse(text: &str) -> Result<Self, MatrixError> {
        let normalized = text.replace('[', "").replace(']', ";");
        let rows: Vec<Vec<f64>> = normalized
            .split([';', '\n'])
            .map(|row| row.trim().trim_matches(',').trim())
            .filter(|row| !row.is_empty())
            .map(|row| {
                if row.contains(',') {
                    row.split(',').map(parse_cell).collect()
                } else {
                    row.split_whitespace().map(parse_cell).collect()
                }
            })
            .collect();

        if rows.is_empty() {
            return Err(MatrixError::Empty);
        }
        let size = MatrixSize::try_from(rows.len())?;
        let n = size.dim();
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() > n) {
            return Err(MatrixError::RowTooLong { row: r, len: row.len(), size: n });
        }
        let cells = DMatrix::from_fn(n, n, |r, c| rows[r].get(c).copied().unwrap_or(0.0));
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> MatrixSize {
        self.size
    }

    pub fn dim(&self) -> usize {
        self.size.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get((row, col)).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatrixError> {
        let n = self.dim();
        if row >= n || col >= n {
            return Err(MatrixError::OutOfBounds { row, col, size: n });
        }
        if !value.is_finite() {
            return Err(MatrixError::NonFinite { row, col });
        }
        self.cells[(row, col)] = value;
        Ok(())
    }

    /// Edit one cell from raw input text.
    pub fn set_text(&mut self, row: usize, col: usize, text: &str) -> Result<(), MatrixError> {
        self.set(row, col, parse_cell(text))
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.cells.row_iter().map(|r| r.iter().copied().collect()).collect()
    }

    pub fn trace(&self) -> f64 {
        self.cells.trace()
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.cells
    }

    /// `A - shift·I`.
    pub fn shifted(&self, shift: f64) -> Matrix {
        let n = self.dim();
        let cells = DMatrix::from_fn(n, n, |r, c| {
            let v = self.cells[(r, c)];
            if r == c { v - shift } else { v }
        });
        Matrix { size: self.size, cells }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, idx: (usize, usize)) -> &f64 {
        &self.cells[idx]
    }
}
