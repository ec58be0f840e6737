use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hermes hierarchical demand forecasting pipeline.
#[derive(Parser)]
#[command(
    name = "hermes",
    version,
    about = "Hierarchical retail demand forecasting and reconciliation"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit base forecasts per item and reconcile them across the hierarchy.
    Forecast(ForecastArgs),
    /// Score reconciled forecasts against the held-out test window.
    Evaluate(EvaluateArgs),
}

/// Arguments for the `forecast` subcommand.
#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hermes.toml")]
    pub config: PathBuf,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run with a single bootstrap seed, overriding the config seed list.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Restrict the run to a comma-separated list of item ids.
    #[arg(long, value_delimiter = ',')]
    pub items: Option<Vec<String>>,

    /// Recompute items whose cached or final outputs already exist.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the `evaluate` subcommand.
#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hermes.toml")]
    pub config: PathBuf,

    /// Directory holding the per-item reconciled CSVs (defaults to the
    /// configured output directory).
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Path for the diagnostics JSON (defaults to diagnostics.json in the
    /// results directory).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
