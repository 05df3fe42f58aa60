//! CLI handler for the `plan` subcommand
//!
//! Clusters issues into waves, estimates each wave and attaches the risk analysis.

use crate::cli::{emit, load_config, load_input, OutputFormat, PlanArgs};
use crate::config::Config;
use crate::output::{render_plan, to_json, PlanReport};
use tracing::{debug, info};

pub fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.common.config)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let input = load_input(&args.common.input)?;
    info!(
        "Planning {} issues ({} with context)",
        input.issues.len(),
        input.contexts.len()
    );

    let report = PlanReport::build(&config, &input);

    let rendered = match args.common.format {
        OutputFormat::Json => to_json(&report)?,
        OutputFormat::Text => render_plan(&report),
    };
    emit(&args.common, rendered)?;

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &PlanArgs) {
    let organizer = &mut config.organizer;

    if let Some(max) = args.max_issues {
        debug!("Overriding max issues per wave: {}", max);
        organizer.max_issues_per_wave = max;
    }
    if let Some(budget) = args.token_budget {
        debug!("Overriding token budget per wave: {}", budget);
        organizer.token_budget_per_wave = budget;
    }
    if let Some(threshold) = args.similarity {
        debug!("Overriding similarity threshold: {}", threshold);
        organizer.similarity_threshold = threshold;
    }
    if args.no_dependencies {
        organizer.respect_dependencies = false;
    }
}
