//! Characteristic polynomial derivation for display.
//!
//! Everything here is a function of the input matrix alone; the eigenvalues
//! themselves come from [`crate::core::eigen`]. Sign tokens in the final
//! equation are chosen from the raw coefficient before its magnitude is
//! rounded, so a coefficient of `-0.00001` still renders with a `+`.

use crate::core::eigen::ComplexScalar;
use crate::core::error::FormatError;
use crate::core::matrix::{Matrix, MatrixSize};
use crate::core::number_format::NumberFormat;

pub const QUADRATIC_SYMBOLIC: &str = "λ² - (a + d)λ + (ad - bc) = 0";
pub const CUBIC_SYMBOLIC: &str = "λ³ - (trace)λ² + (sum of 2×2 minors)λ - det(A) = 0";
pub const QUARTIC_SYMBOLIC: &str = "λ⁴ - (trace)λ³ + ... = 0";
pub const QUARTIC_NOTE: &str = "For 4×4 matrices, the characteristic polynomial involves computing \
4th degree terms. The numerical solver handles this automatically.";
pub const QUADRATIC_FORMULA: &str = "λ = (trace ± √(trace² - 4·det)) / 2";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolynomialSummary {
    Quadratic { trace: f64, det: f64 },
    Cubic { trace: f64, minor_sum: f64, det: f64 },
    Unsupported,
}

impl PolynomialSummary {
    pub fn of(matrix: &Matrix) -> Self {
        let m = |r: usize, c: usize| matrix[(r, c)];
        match matrix.size() {
            MatrixSize::Two => {
                let (a, b, c, d) = (m(0, 0), m(0, 1), m(1, 0), m(1, 1));
                PolynomialSummary::Quadratic { trace: a + d, det: a * d - b * c }
            }
            MatrixSize::Three => {
                let (a, b, c) = (m(0, 0), m(0, 1), m(0, 2));
                let (d, e, f) = (m(1, 0), m(1, 1), m(1, 2));
                let (g, h, i) = (m(2, 0), m(2, 1), m(2, 2));
                PolynomialSummary::Cubic {
                    trace: a + e + i,
                    minor_sum: (a * e - b * d) + (a * i - c * g) + (e * i - f * h),
                    det: a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g),
                }
            }
            MatrixSize::Four => PolynomialSummary::Unsupported,
        }
    }

    pub fn symbolic(&self) -> &'static str {
        match self {
            PolynomialSummary::Quadratic { .. } => QUADRATIC_SYMBOLIC,
            PolynomialSummary::Cubic { .. } => CUBIC_SYMBOLIC,
            PolynomialSummary::Unsupported => QUARTIC_SYMBOLIC,
        }
    }

    /// Final equation with numbers substituted, e.g. `λ² - 7λ + 10 = 0`.
    /// `None` for sizes without a symbolic derivation.
    pub fn equation(&self, fmt: &NumberFormat) -> Result<Option<String>, FormatError> {
        let term = |x: f64, nonneg: char, neg: char| -> Result<String, FormatError> {
            let sign = if x >= 0.0 { nonneg } else { neg };
            Ok(format!("{sign} {}", fmt.real(x.abs())?))
        };
        Ok(match *self {
            PolynomialSummary::Quadratic { trace, det } => Some(format!(
                "λ² {}λ {} = 0",
                term(trace, '-', '+')?,
                term(det, '+', '-')?
            )),
            PolynomialSummary::Cubic { trace, minor_sum, det } => Some(format!(
                "λ³ {}λ² {}λ {} = 0",
                term(trace, '-', '+')?,
                term(minor_sum, '+', '-')?,
                term(det, '-', '+')?
            )),
            PolynomialSummary::Unsupported => None,
        })
    }
}

/// The worked derivation shown in the "substituting values" step.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub summary: PolynomialSummary,
    /// Named cell values, e.g. `a=4, b=2, c=1, d=3`.
    pub legend: Option<String>,
    pub lines: Vec<String>,
    pub equation: Option<String>,
    pub note: Option<String>,
}

pub fn derive(matrix: &Matrix, fmt: &NumberFormat) -> Result<Derivation, FormatError> {
    let summary = PolynomialSummary::of(matrix);
    let equation = summary.equation(fmt)?;
    let f = |x: f64| fmt.real(x);
    let m = |r: usize, c: usize| matrix[(r, c)];

    let derivation = match summary {
        PolynomialSummary::Quadratic { trace, .. } => {
            let (a, b, c, d) = (m(0, 0), m(0, 1), m(1, 0), m(1, 1));
            Derivation {
                summary,
                legend: Some(format!("a={}, b={}, c={}, d={}", f(a)?, f(b)?, f(c)?, f(d)?)),
                lines: vec![
                    QUADRATIC_SYMBOLIC.to_string(),
                    format!(
                        "λ² - ({} + {})λ + ({}×{} - {}×{}) = 0",
                        f(a)?, f(d)?, f(a)?, f(d)?, f(b)?, f(c)?
                    ),
                    format!("λ² - ({})λ + ({} - {}) = 0", f(trace)?, f(a * d)?, f(b * c)?),
                ],
                equation,
                note: Some(QUADRATIC_FORMULA.to_string()),
            }
        }
        PolynomialSummary::Cubic { trace, minor_sum, det } => Derivation {
            summary,
            legend: None,
            lines: vec![
                format!("trace = {} + {} + {} = {}", f(m(0, 0))?, f(m(1, 1))?, f(m(2, 2))?, f(trace)?),
                format!("sum of 2×2 minors = {}", f(minor_sum)?),
                format!("det(A) = {}", f(det)?),
            ],
            equation,
            note: None,
        },
        PolynomialSummary::Unsupported => Derivation {
            summary,
            legend: None,
            lines: Vec::new(),
            equation,
            note: Some(QUARTIC_NOTE.to_string()),
        },
    };
    Ok(derivation)
}

/// `A − λI` with λ left symbolic on the diagonal.
pub fn characteristic_matrix(matrix: &Matrix, fmt: &NumberFormat) -> Result<Vec<Vec<String>>, FormatError> {
    matrix
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .enumerate()
                .map(|(j, v)| {
                    if i != j {
                        fmt.real(v)
                    } else if v == 0.0 {
                        Ok("-λ".to_string())
                    } else {
                        Ok(format!("{} - λ", fmt.real(v)?))
                    }
                })
                .collect()
        })
        .collect()
}

/// `A − λI` for a concrete eigenvalue. Only the real part is subtracted.
pub fn shifted_matrix(matrix: &Matrix, eigenvalue: &ComplexScalar) -> Matrix {
    matrix.shifted(eigenvalue.real)
}
