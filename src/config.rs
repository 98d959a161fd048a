//! Lab settings: built-in defaults + optional TOML config.
//!
//! - `LabConfig::default()` → 3×3 start, 4/6 decimals, 1e-10 zero snap
//! - `LabConfig::from_toml_file(path)` → load user settings
//! - `LabConfig::load(path)` → explicit path, else ~/.eigenlab/config.toml if present

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::matrix::MatrixSize;
use crate::core::number_format::{NumberFormat, ZERO_TOLERANCE};
use crate::core::report::ReportOptions;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub default_size: usize,
    pub steps_decimals: usize,
    pub result_decimals: usize,
    pub zero_tolerance: f64,
    pub color: bool,
    pub show_steps: bool,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            default_size: 3,
            steps_decimals: 4,
            result_decimals: 6,
            zero_tolerance: ZERO_TOLERANCE,
            color: true,
            show_steps: false,
        }
    }
}

impl LabConfig {
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let cfg: LabConfig = toml::from_str(txt)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&txt).with_context(|| format!("parsing {}", path.display()))
    }

    /// An explicit path must exist. The default path is optional.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(p) = cli_path {
            return Self::from_toml_file(p);
        }
        match default_config_path() {
            Some(p) if p.exists() => Self::from_toml_file(&p),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        MatrixSize::try_from(self.default_size).context("default_size")?;
        if self.steps_decimals > 15 || self.result_decimals > 15 {
            bail!("decimals must be at most 15");
        }
        if !(self.zero_tolerance.is_finite() && self.zero_tolerance >= 0.0) {
            bail!("zero_tolerance must be a non-negative number");
        }
        Ok(())
    }

    pub fn size(&self) -> MatrixSize {
        MatrixSize::try_from(self.default_size).unwrap_or(MatrixSize::Three)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            result_format: NumberFormat::new(self.result_decimals, self.zero_tolerance),
            steps_format: NumberFormat::new(self.steps_decimals, self.zero_tolerance),
            steps: self.show_steps,
            color: self.color,
        }
    }
}

/// ~/.eigenlab/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".eigenlab").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(LabConfig::from_toml_str("").unwrap(), LabConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = LabConfig::from_toml_str("default_size = 2\nresult_decimals = 3\n").unwrap();
        assert_eq!(cfg.size(), MatrixSize::Two);
        assert_eq!(cfg.report_options().result_format.decimals, 3);
        assert_eq!(cfg.report_options().steps_format.decimals, 4);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(LabConfig::from_toml_str("default_size = 5").is_err());
        assert!(LabConfig::from_toml_str("zero_tolerance = -1.0").is_err());
        assert!(LabConfig::from_toml_str("colour = false").is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(LabConfig::load(Some(missing.as_path())).is_err());

        let present = dir.path().join("lab.toml");
        fs::write(&present, "show_steps = true").unwrap();
        assert!(LabConfig::load(Some(present.as_path())).unwrap().show_steps);
    }
}
