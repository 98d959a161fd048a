use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::matrix::MatrixSize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "eigenlab",
    about = "Eigenvalue lab: eigenvalues, eigenvectors and the characteristic polynomial of 2×2 to 4×4 matrices",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct EigenlabCli {
    /// Global: path to config (TOML); default: ~/.eigenlab/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: plain output without colors
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,

    /// Global: debug logging on stderr (EIGENLAB_LOG overrides)
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

/// Where the matrix comes from.
#[derive(Debug, Clone, Args)]
pub struct MatrixSource {
    /// Matrix text: rows split by ';', cells by ',' or spaces (e.g. "4,2;1,3")
    #[arg(short = 'm', long = "matrix", value_name = "TEXT", conflicts_with = "example")]
    pub matrix: Option<String>,

    /// Use the preset example for --size
    #[arg(short = 'e', long = "example", action = ArgAction::SetTrue)]
    pub example: bool,

    /// Matrix size for --example or a zero matrix (2, 3 or 4)
    #[arg(short = 's', long = "size", value_name = "N")]
    pub size: Option<MatrixSize>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute eigenvalues and eigenvectors
    ///
    /// Examples:
    ///   eigenlab calc --matrix "4,2;1,3" --steps
    ///   eigenlab calc --example --size 4 --format json -o result.json
    Calc {
        #[command(flatten)]
        source: MatrixSource,

        /// Include the step-by-step derivation
        #[arg(long = "steps", action = ArgAction::SetTrue)]
        steps: bool,

        /// Output format
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report to FILE instead of stdout
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Show only the characteristic polynomial derivation
    Poly {
        #[command(flatten)]
        source: MatrixSource,
    },

    /// Print the preset example matrix
    Example {
        #[arg(short = 's', long = "size", value_name = "N")]
        size: Option<MatrixSize>,
    },

    /// Interactive lab (default when no subcommand is given)
    Lab,
}
