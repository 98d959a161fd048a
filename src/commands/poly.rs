//! src/commands/poly.rs
//! Characteristic polynomial only; no solver involved.

use anyhow::Result;
use colored::Colorize;

use crate::cli::MatrixSource;
use crate::config::LabConfig;
use crate::core::matrix::Matrix;
use crate::core::number_format::NumberFormat;
use crate::core::polynomial::{characteristic_matrix, derive};
use crate::core::report::matrix_lines;

pub fn main(source: MatrixSource, cfg: &LabConfig) -> Result<()> {
    let matrix = super::resolve_matrix(&source, cfg)?;
    print!("{}", render(&matrix, &cfg.report_options().steps_format, cfg.color)?);
    Ok(())
}

pub fn render(matrix: &Matrix, fmt: &NumberFormat, color: bool) -> Result<String> {
    let d = derive(matrix, fmt)?;
    let mut out = String::new();
    out.push_str("A - λI =\n");
    for line in matrix_lines(&characteristic_matrix(matrix, fmt)?) {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str(&format!("{}\n", d.summary.symbolic()));
    if let Some(legend) = &d.legend {
        out.push_str(&format!("  where {legend}\n"));
    }
    for line in d.lines.iter().skip_while(|l| l.as_str() == d.summary.symbolic()) {
        out.push_str(&format!("  {line}\n"));
    }
    match (&d.equation, &d.note) {
        (Some(eq), _) => {
            let eq = if color { eq.bold().to_string() } else { eq.clone() };
            out.push_str(&format!("{eq}\n"));
        }
        (None, Some(note)) => out.push_str(&format!("{note}\n")),
        (None, None) => {}
    }
    Ok(out)
}
