use crate::issue::Issue;
use std::collections::{BTreeSet, HashMap};

use super::types::{AdjustmentAction, Risk, RiskCategory, WaveAdjustment};

/// Raw score of ten critical-impact, high-likelihood risks; maps to 100
const SCORE_CEILING: f64 = 240.0;

/// Aggregate score above which the plan gets a token buffer
const BUFFER_THRESHOLD: f64 = 50.0;

/// Weighted risk total as a percentage of the ceiling, clamped to 100
pub fn total_risk_score(risks: &[Risk]) -> f64 {
    let raw: u32 = risks.iter().map(Risk::score).sum();
    (f64::from(raw) / SCORE_CEILING * 100.0).min(100.0)
}

/// Turn per-issue risks into wave reordering suggestions, in issue order
pub fn suggest_adjustments(issues: &[Issue], risks: &[Risk], score: f64) -> Vec<WaveAdjustment> {
    let identifiers: HashMap<&str, &str> = issues
        .iter()
        .map(|i| (i.id.as_str(), i.identifier.as_str()))
        .collect();

    let mut by_issue: HashMap<&str, Vec<&Risk>> = HashMap::new();
    for risk in risks {
        by_issue.entry(risk.issue_id.as_str()).or_default().push(risk);
    }

    let mut adjustments = Vec::new();
    for issue in issues {
        let Some(issue_risks) = by_issue.get(issue.id.as_str()) else {
            continue;
        };

        if issue_risks
            .iter()
            .any(|r| r.category == RiskCategory::BreakingChange)
        {
            adjustments.push(WaveAdjustment {
                action: AdjustmentAction::Reorder,
                issue_id: Some(issue.id.clone()),
                depends_on: Vec::new(),
                reason: format!(
                    "Schedule {} in an early wave so downstream work builds on the changed interface",
                    issue.identifier
                ),
            });
        }

        let integration: Vec<&&Risk> = issue_risks
            .iter()
            .filter(|r| r.category == RiskCategory::Integration)
            .collect();
        if !integration.is_empty() {
            let depends_on: Vec<String> = integration
                .iter()
                .flat_map(|r| r.affected_issues.iter())
                .filter(|id| id.as_str() != issue.id)
                .filter_map(|id| identifiers.get(id.as_str()))
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let reason = if depends_on.is_empty() {
                format!(
                    "{} touches integration points; confirm its upstream dependencies",
                    issue.identifier
                )
            } else {
                format!(
                    "{} must run after {}",
                    issue.identifier,
                    depends_on.join(", ")
                )
            };

            adjustments.push(WaveAdjustment {
                action: AdjustmentAction::AddDependency,
                issue_id: Some(issue.id.clone()),
                depends_on,
                reason,
            });
        }
    }

    if score > BUFFER_THRESHOLD {
        adjustments.push(WaveAdjustment {
            action: AdjustmentAction::AddBuffer,
            issue_id: None,
            depends_on: Vec::new(),
            reason: format!(
                "Aggregate risk score {:.0} exceeds {:.0}; add a 20% token buffer to every wave",
                score, BUFFER_THRESHOLD
            ),
        });
    }

    adjustments
}

pub fn build_summary(risks: &[Risk], high_impact: usize, adjustments: usize) -> String {
    if risks.is_empty() {
        return "No risks identified.".to_string();
    }

    let tally: Vec<String> = RiskCategory::ALL
        .iter()
        .filter_map(|category| {
            let count = risks.iter().filter(|r| r.category == *category).count();
            (count > 0).then(|| format!("{}: {}", category, count))
        })
        .collect();

    format!(
        "Identified {} risk(s), {} with high or critical impact. {} wave adjustment(s) suggested. By category: {}",
        risks.len(),
        high_impact,
        adjustments,
        tally.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::types::{Impact, Likelihood};

    fn risk(
        issue_id: &str,
        category: RiskCategory,
        impact: Impact,
        likelihood: Likelihood,
    ) -> Risk {
        Risk {
            id: format!("{}-{}", issue_id, category),
            category,
            issue_id: issue_id.to_string(),
            issue_identifier: issue_id.to_uppercase(),
            description: String::new(),
            likelihood,
            impact,
            mitigation: String::new(),
            affected_issues: Vec::new(),
            suggested_wave_adjustment: None,
        }
    }

    #[test]
    fn test_score_normalised_and_clamped() {
        let one = vec![risk("a", RiskCategory::Security, Impact::Critical, Likelihood::High)];
        assert!((total_risk_score(&one) - 10.0).abs() < 1e-9);

        let many: Vec<Risk> = (0..15)
            .map(|_| risk("a", RiskCategory::Security, Impact::Critical, Likelihood::High))
            .collect();
        assert_eq!(total_risk_score(&many), 100.0);
        assert_eq!(total_risk_score(&[]), 0.0);
    }

    #[test]
    fn test_score_monotonic() {
        let mut risks = Vec::new();
        let mut last = total_risk_score(&risks);
        for _ in 0..12 {
            risks.push(risk("a", RiskCategory::Timeline, Impact::High, Likelihood::High));
            let next = total_risk_score(&risks);
            assert!(next >= last);
            assert!(next <= 100.0);
            last = next;
        }
    }

    #[test]
    fn test_adjustments_per_category() {
        let issues = vec![Issue::new("a", "ENG-1", "A"), Issue::new("b", "ENG-2", "B")];
        let mut integration = risk("b", RiskCategory::Integration, Impact::High, Likelihood::High);
        integration.affected_issues = vec!["b".into(), "a".into()];
        let risks = vec![
            risk("a", RiskCategory::BreakingChange, Impact::High, Likelihood::Medium),
            integration,
        ];

        let adjustments = suggest_adjustments(&issues, &risks, 10.0);

        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].action, AdjustmentAction::Reorder);
        assert_eq!(adjustments[0].issue_id.as_deref(), Some("a"));
        assert_eq!(adjustments[1].action, AdjustmentAction::AddDependency);
        assert_eq!(adjustments[1].depends_on, vec!["ENG-1".to_string()]);
    }

    #[test]
    fn test_buffer_suggested_above_threshold() {
        let adjustments = suggest_adjustments(&[], &[], 50.5);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].action, AdjustmentAction::AddBuffer);
        assert!(adjustments[0].issue_id.is_none());

        assert!(suggest_adjustments(&[], &[], 50.0).is_empty());
    }

    #[test]
    fn test_summary_tallies_in_table_order() {
        let risks = vec![
            risk("a", RiskCategory::Timeline, Impact::Medium, Likelihood::Low),
            risk("a", RiskCategory::Security, Impact::Critical, Likelihood::Low),
            risk("b", RiskCategory::Security, Impact::High, Likelihood::Low),
        ];
        let summary = build_summary(&risks, 2, 1);
        assert!(summary.starts_with("Identified 3 risk(s), 2 with high or critical impact."));
        assert!(summary.ends_with("By category: security: 2, timeline: 1"));
    }
}
