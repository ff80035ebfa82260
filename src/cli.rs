use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::output;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Terminal,
    /// The full JSON report document
    Json,
    /// Markdown tables for CI artifacts
    Markdown,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => output::OutputFormat::Terminal,
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Markdown => output::OutputFormat::Markdown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "docmap")]
#[command(about = "API documentation coverage and method mapping analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the unified method mapping and coverage report
    Map {
        /// Documentation repository root
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Report destination (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to docmap.toml under the root)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ground-truth method list, overriding the configured path
        #[arg(long = "ground-truth")]
        ground_truth: Option<PathBuf>,

        /// Fuzzy match acceptance threshold, overriding the configured value
        #[arg(long = "fuzzy-threshold")]
        fuzzy_threshold: Option<f64>,

        /// Mapping artifact destination, overriding the configured path
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Create a default docmap.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
