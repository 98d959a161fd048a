//! Text and JSON rendering of a finished calculation.
//!
//! The result panel uses 6 decimals, the numbered derivation steps use 4.

use colored::Colorize;
use serde::Serialize;

use crate::core::eigen::{ComplexScalar, EigenResult, Eigenvector};
use crate::core::error::FormatError;
use crate::core::matrix::Matrix;
use crate::core::number_format::NumberFormat;
use crate::core::polynomial::{self, PolynomialSummary};

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub result_format: NumberFormat,
    pub steps_format: NumberFormat,
    pub steps: bool,
    pub color: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            result_format: NumberFormat::RESULT,
            steps_format: NumberFormat::STEPS,
            steps: false,
            color: false,
        }
    }
}

impl ReportOptions {
    fn heading(&self, s: &str) -> String {
        if self.color {
            s.bold().truecolor(225, 0, 180).to_string()
        } else {
            s.to_string()
        }
    }

    fn accent(&self, s: &str) -> String {
        if self.color {
            s.truecolor(255, 240, 0).to_string()
        } else {
            s.to_string()
        }
    }
}

/// Bracketed rows with left-aligned, equal-width columns.
pub fn matrix_lines(cells: &[Vec<String>]) -> Vec<String> {
    let cols = cells.first().map(|r| r.len()).unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|c| cells.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();
    cells
        .iter()
        .map(|row| {
            let body: Vec<String> = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, w)| format!("{cell:<w$}", w = *w))
                .collect();
            format!("[ {} ]", body.join("  "))
        })
        .collect()
}

fn numeric_cells(matrix: &Matrix, fmt: &NumberFormat) -> Result<Vec<Vec<String>>, FormatError> {
    matrix
        .rows()
        .into_iter()
        .map(|row| row.into_iter().map(|v| fmt.real(v)).collect())
        .collect()
}

fn vector_text(v: &Eigenvector, fmt: &NumberFormat) -> Result<String, FormatError> {
    Ok(format!("[{}]", fmt.vector(&v.real, &v.imag)?.join(", ")))
}

fn value_text(z: &ComplexScalar, fmt: &NumberFormat) -> Result<String, FormatError> {
    fmt.complex(z.real, z.imag)
}

/// One newline-terminated block.
fn to_text(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Eigenvalue list and eigenvector panels.
pub fn render_result(result: &EigenResult, opts: &ReportOptions) -> Result<String, FormatError> {
    let fmt = &opts.result_format;
    let mut out = Vec::new();
    out.push(opts.heading("Eigenvalues"));
    for (i, z) in result.eigenvalues.iter().enumerate() {
        out.push(format!("  λ{} = {}", i + 1, opts.accent(&value_text(z, fmt)?)));
    }
    out.push(String::new());
    out.push(opts.heading("Eigenvectors"));
    for (i, (z, v)) in result.pairs().enumerate() {
        out.push(format!("  For λ{} = {}", i + 1, value_text(z, fmt)?));
        out.push(format!("    v{} = {}", i + 1, vector_text(v, fmt)?));
    }
    Ok(to_text(out))
}

/// The seven numbered derivation steps.
pub fn render_steps(matrix: &Matrix, result: &EigenResult, opts: &ReportOptions) -> Result<String, FormatError> {
    let fmt = &opts.steps_format;
    let n = matrix.dim();
    let derivation = polynomial::derive(matrix, fmt)?;
    let mut out = Vec::new();

    out.push(opts.heading("Step-by-Step Calculation"));
    out.push(String::new());

    out.push(opts.heading("1. Input Matrix A"));
    for line in matrix_lines(&numeric_cells(matrix, fmt)?) {
        out.push(format!("   {line}"));
    }
    out.push(format!("   This is your {n}×{n} input matrix."));
    out.push(String::new());

    out.push(opts.heading("2. Characteristic Equation Setup"));
    out.push("   To find eigenvalues, we solve the characteristic equation:".to_string());
    out.push("     det(A - λI) = 0".to_string());
    out.push(format!("   Where I is the {n}×{n} identity matrix and λ represents eigenvalues."));
    out.push("   A - λI =".to_string());
    for line in matrix_lines(&polynomial::characteristic_matrix(matrix, fmt)?) {
        out.push(format!("   {line}"));
    }
    out.push(String::new());

    out.push(opts.heading("3. Characteristic Polynomial"));
    out.push("   Computing the determinant of (A - λI) gives us the characteristic polynomial:".to_string());
    let headline = match derivation.summary {
        PolynomialSummary::Quadratic { .. } => derivation.equation.clone(),
        _ => None,
    }
    .unwrap_or_else(|| derivation.summary.symbolic().to_string());
    out.push(format!("     {headline}"));
    if let Some(legend) = &derivation.legend {
        out.push("   For a 2×2 matrix, the characteristic polynomial is:".to_string());
        out.push(format!("     {}", polynomial::QUADRATIC_SYMBOLIC));
        out.push(format!("   Where {legend}"));
    }
    out.push(String::new());

    out.push(opts.heading("4. Substituting Matrix Values"));
    match &derivation.equation {
        Some(eq) => {
            out.push("   Substituting the actual matrix values into the characteristic polynomial:".to_string());
            if n == 3 {
                out.push("   For 3×3 matrix:".to_string());
            }
            for line in &derivation.lines {
                out.push(format!("     {line}"));
            }
            out.push(format!("   => {}", opts.accent(eq)));
        }
        None => {
            if let Some(note) = &derivation.note {
                out.push(format!("   {note}"));
            }
        }
    }
    out.push(String::new());

    out.push(opts.heading("5. Eigenvalues (Solutions)"));
    out.push("   Solving the characteristic polynomial, we get the eigenvalues:".to_string());
    for (i, z) in result.eigenvalues.iter().enumerate() {
        out.push(format!("     λ{} = {}", i + 1, value_text(z, fmt)?));
    }
    if matches!(derivation.summary, PolynomialSummary::Quadratic { .. }) {
        out.push(format!("   Using the quadratic formula: {}", polynomial::QUADRATIC_FORMULA));
    }
    out.push(String::new());

    out.push(opts.heading("6. Eigenvector Calculation"));
    out.push("   For each eigenvalue λ, we find the eigenvector v by solving:".to_string());
    out.push("     (A - λI)v = 0".to_string());
    for (i, (z, v)) in result.pairs().enumerate() {
        let lambda = value_text(z, fmt)?;
        out.push(format!("   For λ{} = {lambda}:", i + 1));
        out.push(format!("     A - {lambda}·I ="));
        let shifted = polynomial::shifted_matrix(matrix, z);
        for line in matrix_lines(&numeric_cells(&shifted, fmt)?) {
            out.push(format!("     {line}"));
        }
        out.push(format!("     Solving (A - λI)v = 0 gives: v{} = {}", i + 1, vector_text(v, fmt)?));
    }
    out.push(String::new());

    out.push(opts.heading("7. Verification"));
    out.push("   We can verify each eigenpair by checking that Av = λv".to_string());
    let residuals = result.residuals(matrix);
    let worst = residuals.iter().copied().fold(0.0, f64::max);
    if result.verified(matrix) {
        out.push(format!("   ✓ All {} eigenpairs have been verified (max residual {worst:.1e})", result.len()));
    } else {
        out.push(format!("   ✗ Verification failed (max residual {worst:.1e})"));
    }
    out.push("   Note: Eigenvectors are normalized and may differ by a scalar multiple from hand calculations.".to_string());
    Ok(to_text(out))
}

/// Result panel, followed by the derivation when `opts.steps` is set.
pub fn render_text(matrix: &Matrix, result: &EigenResult, opts: &ReportOptions) -> Result<String, FormatError> {
    let mut out = render_result(result, opts)?;
    if opts.steps {
        out.push('\n');
        out.push_str(&render_steps(matrix, result, opts)?);
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub size: usize,
    pub matrix: Vec<Vec<f64>>,
    #[serde(flatten)]
    pub result: &'a EigenResult,
    pub formatted: FormattedResult,
    pub polynomial: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct FormattedResult {
    pub eigenvalues: Vec<String>,
    pub eigenvectors: Vec<Vec<String>>,
}

pub fn json_report<'a>(
    matrix: &Matrix,
    result: &'a EigenResult,
    opts: &ReportOptions,
) -> Result<JsonReport<'a>, FormatError> {
    let fmt = &opts.result_format;
    let formatted = FormattedResult {
        eigenvalues: result.eigenvalues.iter().map(|z| value_text(z, fmt)).collect::<Result<_, _>>()?,
        eigenvectors: result
            .eigenvectors
            .iter()
            .map(|v| fmt.vector(&v.real, &v.imag))
            .collect::<Result<_, _>>()?,
    };
    Ok(JsonReport {
        size: matrix.dim(),
        matrix: matrix.rows(),
        result,
        formatted,
        polynomial: PolynomialSummary::of(matrix).equation(&opts.steps_format)?,
        verified: result.verified(matrix),
    })
}
