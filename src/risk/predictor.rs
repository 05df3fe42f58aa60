use crate::issue::{ContextMap, Issue};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, info};

use super::assessment::{build_summary, suggest_adjustments, total_risk_score};
use super::patterns::{is_test_path, risk_patterns, RiskPattern, Signals};
use super::types::{Impact, Likelihood, Risk, RiskAnalysisResult, RiskCategory};

/// Pattern-based risk analysis over a set of issues
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskPredictor;

impl RiskPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Analyse every issue against the pattern table plus cross-issue dependencies
    pub fn analyze(&self, issues: &[Issue], contexts: &ContextMap) -> RiskAnalysisResult {
        let mut collector = RiskCollector::default();

        for issue in issues {
            self.match_patterns(issue, contexts, &mut collector);
        }
        self.scan_dependencies(issues, &mut collector);

        let risks = collector.risks;
        let total_risk_score = total_risk_score(&risks);
        let high_impact_risks: Vec<Risk> = risks
            .iter()
            .filter(|r| r.impact.is_severe())
            .cloned()
            .collect();
        let wave_adjustments = suggest_adjustments(issues, &risks, total_risk_score);
        let summary = build_summary(&risks, high_impact_risks.len(), wave_adjustments.len());

        info!(
            "Risk analysis: {} risks, score {:.1}, {} adjustments",
            risks.len(),
            total_risk_score,
            wave_adjustments.len()
        );

        RiskAnalysisResult {
            risks,
            total_risk_score,
            high_impact_risks,
            wave_adjustments,
            summary,
        }
    }

    fn match_patterns(&self, issue: &Issue, contexts: &ContextMap, collector: &mut RiskCollector) {
        let haystack = issue.haystack();
        let paths: Vec<&str> = contexts
            .get(&issue.id)
            .map(|ctx| ctx.all_files().map(|f| f.path.as_str()).collect())
            .unwrap_or_default();
        let has_tests = paths.iter().any(|p| is_test_path(p));

        for pattern in risk_patterns() {
            let signals = pattern.signals(&haystack, &paths);
            if !signals.any() {
                continue;
            }

            debug!(
                "{} matched {} via {}",
                issue.identifier,
                pattern.category,
                signals.names().join(", ")
            );

            let impact = if issue.priority.is_urgent() {
                pattern.impact.escalate()
            } else {
                pattern.impact
            };

            collector.push(
                "pattern",
                Risk {
                    id: String::new(),
                    category: pattern.category,
                    issue_id: issue.id.clone(),
                    issue_identifier: issue.identifier.clone(),
                    description: describe(pattern, issue, signals),
                    likelihood: pattern.likelihood_for(signals),
                    impact,
                    mitigation: mitigation(pattern, issue, has_tests),
                    affected_issues: Vec::new(),
                    suggested_wave_adjustment: None,
                },
            );
        }
    }

    /// Parent links and `depends:<identifier>` labels become integration risks
    fn scan_dependencies(&self, issues: &[Issue], collector: &mut RiskCollector) {
        let by_id: HashMap<&str, &Issue> = issues.iter().map(|i| (i.id.as_str(), i)).collect();
        let by_identifier: HashMap<String, &Issue> = issues
            .iter()
            .map(|i| (i.identifier.to_lowercase(), i))
            .collect();

        for issue in issues {
            if let Some(parent_id) = &issue.parent {
                let parent_name = by_id
                    .get(parent_id.as_str())
                    .map(|p| p.identifier.as_str())
                    .unwrap_or(parent_id.as_str());

                collector.push(
                    &format!("parent:{}", parent_id),
                    dependency_risk(
                        issue,
                        parent_id,
                        format!(
                            "{} is a sub-issue of {}; the parent must land first",
                            issue.identifier, parent_name
                        ),
                        format!(
                            "Schedule {} in an earlier wave than {}",
                            parent_name, issue.identifier
                        ),
                    ),
                );
            }

            for label in issue.label_names() {
                let Some(target) = depends_label_target(label) else {
                    continue;
                };
                let Some(dependency) = by_identifier.get(&target.to_lowercase()) else {
                    debug!(
                        "{} depends on {}, which is not part of this plan",
                        issue.identifier, target
                    );
                    continue;
                };
                if dependency.id == issue.id {
                    continue;
                }

                collector.push(
                    &format!("depends:{}", dependency.id),
                    dependency_risk(
                        issue,
                        &dependency.id,
                        format!(
                            "{} explicitly depends on {}",
                            issue.identifier, dependency.identifier
                        ),
                        format!(
                            "Move {} to a wave after {}",
                            issue.identifier, dependency.identifier
                        ),
                    ),
                );
            }
        }
    }
}

fn dependency_risk(
    issue: &Issue,
    dependency_id: &str,
    description: String,
    adjustment: String,
) -> Risk {
    Risk {
        id: String::new(),
        category: RiskCategory::Integration,
        issue_id: issue.id.clone(),
        issue_identifier: issue.identifier.clone(),
        description,
        likelihood: Likelihood::High,
        impact: Impact::High,
        mitigation: "Complete and verify the predecessor before starting, and agree on the interface between them."
            .to_string(),
        affected_issues: vec![issue.id.clone(), dependency_id.to_string()],
        suggested_wave_adjustment: Some(adjustment),
    }
}

/// Extract `<identifier>` from a `depends:<identifier>` label
fn depends_label_target(label: &str) -> Option<&str> {
    static DEPENDS: OnceLock<Regex> = OnceLock::new();
    DEPENDS
        .get_or_init(|| Regex::new(r"(?i)^\s*depends:\s*(\S+)\s*$").expect("valid regex"))
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn describe(pattern: &RiskPattern, issue: &Issue, signals: Signals) -> String {
    format!(
        "{}: {} (matched {})",
        issue.identifier,
        pattern.summary,
        signals.names().join(", ")
    )
}

fn mitigation(pattern: &RiskPattern, issue: &Issue, has_tests: bool) -> String {
    let mut text = pattern.mitigation.to_string();
    if !has_tests {
        text.push_str(" No tests cover the affected files yet; add coverage before changing them.");
    }
    if issue.priority.is_urgent() {
        text.push_str(" Given the urgency, consider a time-boxed spike first.");
    }
    text
}

/// Assigns fingerprint ids and drops exact repeats
#[derive(Default)]
struct RiskCollector {
    risks: Vec<Risk>,
    seen: HashSet<String>,
}

impl RiskCollector {
    fn push(&mut self, source: &str, mut risk: Risk) {
        let id = fingerprint(&risk.issue_id, risk.category, source);
        if !self.seen.insert(id.clone()) {
            debug!("Skipping repeated risk {} on {}", id, risk.issue_identifier);
            return;
        }
        risk.id = id;
        self.risks.push(risk);
    }
}

/// Deterministic risk id: issue id | category | source
fn fingerprint(issue_id: &str, category: RiskCategory, source: &str) -> String {
    let input = format!("{}|{}|{}", issue_id, category, source);
    let hash = Sha256::digest(input.as_bytes());
    format!("RISK-{}", &format!("{:x}", hash)[..12])
}
