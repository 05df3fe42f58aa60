use crate::estimator::TokenEstimate;
use crate::issue::Issue;
use crate::risk::RiskAnalysisResult;

use super::report::PlanReport;

/// Human-readable plan for the console
pub fn render_plan(report: &PlanReport) -> String {
    let mut out = String::new();

    out.push_str("=== Wave Plan ===\n\n");
    out.push_str(&format!("Generated: {}\n", report.timestamp));
    out.push_str(&format!(
        "Issues: {}  Waves: {}  Tokens: {}\n\n",
        report.totals.issues, report.totals.waves, report.totals.total_tokens
    ));

    for wave in &report.waves {
        let deps = if wave.dependencies.is_empty() {
            "none".to_string()
        } else {
            wave.dependencies
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        out.push_str(&format!(
            "Wave {}: {} ({} tokens, {} confidence)\n",
            wave.number, wave.name, wave.estimate.total, wave.estimate.confidence
        ));
        out.push_str(&format!(
            "  depends on: {}  parallel: {}\n",
            deps,
            if wave.parallelizable { "yes" } else { "no" }
        ));
        for (issue, agent) in wave.issues.iter().zip(&wave.agents) {
            out.push_str(&format!(
                "  - {} [{}] {} -> {}\n",
                issue.identifier, issue.priority, issue.title, agent.agent_type
            ));
        }
        out.push('\n');
    }

    out.push_str(&render_risks(&report.risk_analysis));
    out
}

pub fn render_risks(result: &RiskAnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Risks (score {:.1}/100) ===\n\n",
        result.total_risk_score
    ));
    out.push_str(&format!("{}\n", result.summary));

    if !result.high_impact_risks.is_empty() {
        out.push('\n');
        for risk in &result.high_impact_risks {
            out.push_str(&format!(
                "  ! [{}] {} ({} likelihood, {} impact)\n",
                risk.category, risk.description, risk.likelihood, risk.impact
            ));
        }
    }

    if !result.wave_adjustments.is_empty() {
        out.push_str("\nSuggested adjustments:\n");
        for adjustment in &result.wave_adjustments {
            out.push_str(&format!("  - {}\n", adjustment.reason));
        }
    }

    out
}

pub fn render_estimates(
    issues: &[Issue],
    estimates: &[TokenEstimate],
    combined: &TokenEstimate,
) -> String {
    let mut out = String::new();

    out.push_str("| Issue | Total | Context | Impl | Tests | Review | Docs | Confidence |\n");
    out.push_str("|-------|-------|---------|------|-------|--------|------|------------|\n");
    for (issue, est) in issues.iter().zip(estimates) {
        let b = &est.breakdown;
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            issue.identifier,
            est.total,
            b.context,
            b.implementation,
            b.tests,
            b.review,
            b.documentation,
            est.confidence
        ));
    }

    out.push_str(&format!(
        "\nCombined: {} tokens ({} confidence, {} files)\n",
        combined.total, combined.confidence, combined.files_analyzed
    ));
    out
}
