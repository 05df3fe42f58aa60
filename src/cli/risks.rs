//! CLI handler for the `risks` subcommand

use crate::cli::{emit, load_config, load_input, OutputFormat, RisksArgs};
use crate::output::{render_risks, to_json};
use crate::risk::RiskPredictor;
use tracing::info;

pub fn execute(args: RisksArgs) -> anyhow::Result<()> {
    // Config is only checked here; risk rules are not configurable.
    load_config(&args.common.config)?.validate()?;
    let input = load_input(&args.common.input)?;

    let result = RiskPredictor::new().analyze(&input.issues, &input.contexts);
    info!(
        "Found {} risks ({} high impact)",
        result.risks.len(),
        result.high_impact_risks.len()
    );

    let rendered = match args.common.format {
        OutputFormat::Json => to_json(&result)?,
        OutputFormat::Text => render_risks(&result),
    };
    emit(&args.common, rendered)?;

    Ok(())
}
