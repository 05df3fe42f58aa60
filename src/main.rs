use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use wavesmith::cli::{self, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("wavesmith=debug")
    } else {
        EnvFilter::new("wavesmith=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Plan(args) => cli::plan::execute(args),
        Commands::Estimate(args) => cli::estimate::execute(args),
        Commands::Risks(args) => cli::risks::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}
