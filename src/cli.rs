use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean CSV datasets interactively or from a plan", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview the first few rows of a CSV file in a formatted table
    Preview(PreviewArgs),
    /// List columns with their declared classifications and empty-cell report
    Columns(ColumnsArgs),
    /// List the distinct values of one or more columns
    Uniques(UniquesArgs),
    /// Apply a cleaning plan and write the cleaned dataset
    Apply(ApplyArgs),
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Optional cleaning plan whose classifications should be applied first
    #[arg(short = 'p', long = "plan")]
    pub plan: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UniquesArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Columns to list distinct values for
    #[arg(short = 'C', long = "columns", value_delimiter = ',', required = true)]
    pub columns: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Input CSV file to clean
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Cleaning plan (YAML) describing classifications and steps
    #[arg(short = 'p', long = "plan")]
    pub plan: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Print the per-column failure report as JSON on stderr
    #[arg(long = "report-json")]
    pub report_json: bool,
}
