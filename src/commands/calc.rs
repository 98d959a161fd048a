//! src/commands/calc.rs
//! One-shot calculation: result panel, optional steps, text or JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{MatrixSource, OutputFormat};
use crate::config::LabConfig;
use crate::core::eigen::NalgebraSolver;
use crate::core::matrix::Matrix;
use crate::core::report::{self, ReportOptions};
use crate::core::session::{Lab, LabState};
use crate::io::atomic::atomic_write;

pub fn main(
    source: MatrixSource,
    steps: bool,
    format: OutputFormat,
    out: Option<PathBuf>,
    cfg: &LabConfig,
) -> Result<()> {
    let matrix = super::resolve_matrix(&source, cfg)?;
    let mut opts = cfg.report_options();
    opts.steps |= steps;
    if out.is_some() {
        opts.color = false;
    }

    let text = render(matrix, format, &opts)?;
    match out {
        Some(path) => {
            atomic_write(&path, text.as_bytes())
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
            println!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Run the calculation and render it; a solver failure is an error.
pub fn render(matrix: Matrix, format: OutputFormat, opts: &ReportOptions) -> Result<String> {
    let mut lab = Lab::with_matrix(matrix);
    let result = match lab.calculate(&NalgebraSolver::default()) {
        LabState::Ready(r) => r.clone(),
        LabState::Failed(e) => anyhow::bail!("Calculation failed: {e}"),
        other => anyhow::bail!("unexpected lab state {other:?}"),
    };
    let matrix = lab.matrix();
    Ok(match format {
        OutputFormat::Text => report::render_text(matrix, &result, opts)?,
        OutputFormat::Json => {
            let report = report::json_report(matrix, &result, opts)?;
            let mut s = serde_json::to_string_pretty(&report)?;
            s.push('\n');
            s
        }
    })
}
