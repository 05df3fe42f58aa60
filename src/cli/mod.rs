pub mod estimate;
pub mod plan;
pub mod risks;
pub mod schema;

use crate::config::Config;
use crate::error::WavesmithError;
use crate::issue::PlanInput;
use crate::output::write_report;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "wavesmith")]
#[command(
    author,
    version,
    about = "Organize issues into execution waves with token estimates and risk analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Organize issues into waves and analyse risks
    Plan(PlanArgs),

    /// Estimate token cost per issue and for the whole set
    Estimate(EstimateArgs),

    /// Analyse risks only
    Risks(RisksArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Flags shared by every command that reads planning input
#[derive(clap::Args, Clone)]
pub struct InputArgs {
    /// JSON file with issues and their codebase contexts
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to config file
    #[arg(short, long, default_value = "wavesmith.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Override max issues per wave
    #[arg(long)]
    pub max_issues: Option<usize>,

    /// Override token budget per wave
    #[arg(long)]
    pub token_budget: Option<u64>,

    /// Override similarity threshold for clustering
    #[arg(long)]
    pub similarity: Option<f64>,

    /// Ignore parent links when ordering waves
    #[arg(long)]
    pub no_dependencies: bool,
}

#[derive(Parser, Clone)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub common: InputArgs,
}

#[derive(Parser, Clone)]
pub struct RisksArgs {
    #[command(flatten)]
    pub common: InputArgs,
}

/// Load config (defaults when the file is absent) and planning input
pub fn load_config(path: &Path) -> Result<Config, WavesmithError> {
    let config = if path.exists() {
        info!("Loading config from {:?}", path);
        Config::load(path)?
    } else {
        info!("No config found at {:?}, using defaults", path);
        Config::default()
    };
    Ok(config)
}

pub fn load_input(path: &Path) -> Result<PlanInput, WavesmithError> {
    Ok(PlanInput::load(path)?)
}

/// Print to stdout or write to `--output`
pub fn emit(args: &InputArgs, rendered: String) -> Result<(), WavesmithError> {
    match &args.output {
        Some(path) => write_report(path, &rendered)?,
        None => println!("{}", rendered),
    }
    Ok(())
}
