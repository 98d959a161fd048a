pub mod calc;
pub mod example;
pub mod poly;

use anyhow::{Context, Result};

use crate::cli::MatrixSource;
use crate::config::LabConfig;
use crate::core::matrix::Matrix;

/// Matrix named by `--matrix`, `--example` or `--size` (a zero matrix).
pub fn resolve_matrix(source: &MatrixSource, cfg: &LabConfig) -> Result<Matrix> {
    if let Some(text) = &source.matrix {
        let m = Matrix::parse(text).with_context(|| format!("invalid --matrix {text:?}"))?;
        if let Some(size) = source.size {
            if size != m.size() {
                anyhow::bail!("--size {size} does not match the {} matrix given", m.size());
            }
        }
        return Ok(m);
    }
    let size = source.size.unwrap_or_else(|| cfg.size());
    Ok(if source.example { Matrix::example(size) } else { Matrix::zeros(size) })
}
