//! CLI handler for the `estimate` subcommand

use crate::cli::{emit, load_config, load_input, EstimateArgs, OutputFormat};
use crate::estimator::{TokenEstimate, TokenEstimator};
use crate::output::{render_estimates, to_json};
use serde::Serialize;

/// Per-issue estimates plus the shared-context estimate for the whole set
#[derive(Debug, Serialize)]
pub struct EstimateReport {
    pub estimates: Vec<IssueEstimate>,
    pub combined: TokenEstimate,
}

#[derive(Debug, Serialize)]
pub struct IssueEstimate {
    pub issue_id: String,
    pub identifier: String,
    pub estimate: TokenEstimate,
}

pub fn execute(args: EstimateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.common.config)?;
    config.validate()?;
    let input = load_input(&args.common.input)?;

    let estimator = TokenEstimator::new(config.estimation);
    let estimates: Vec<TokenEstimate> = input
        .issues
        .iter()
        .map(|issue| estimator.estimate(issue, input.contexts.get(&issue.id)))
        .collect();

    let refs: Vec<_> = input.issues.iter().collect();
    let combined = estimator.estimate_wave(&refs, &input.contexts);

    let rendered = match args.common.format {
        OutputFormat::Json => {
            let report = EstimateReport {
                estimates: input
                    .issues
                    .iter()
                    .zip(estimates)
                    .map(|(issue, estimate)| IssueEstimate {
                        issue_id: issue.id.clone(),
                        identifier: issue.identifier.clone(),
                        estimate,
                    })
                    .collect(),
                combined,
            };
            to_json(&report)?
        }
        OutputFormat::Text => render_estimates(&input.issues, &estimates, &combined),
    };
    emit(&args.common, rendered)?;

    Ok(())
}
