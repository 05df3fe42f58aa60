//! Specialist agent inference.
//!
//! Rules are checked in a fixed precedence order and the first rule whose labels or
//! text patterns match wins. A security-flavoured frontend issue is therefore always
//! a security issue.

use crate::issue::Issue;
use regex::Regex;
use std::sync::OnceLock;

use super::types::{AgentAssignment, AgentType};

struct AgentRule {
    agent: AgentType,
    labels: &'static [&'static str],
    patterns: Vec<Regex>,
}

fn rule(agent: AgentType, labels: &'static [&'static str], patterns: &[&str]) -> AgentRule {
    AgentRule {
        agent,
        labels,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("valid regex"))
            .collect(),
    }
}

fn rules() -> &'static [AgentRule] {
    static RULES: OnceLock<Vec<AgentRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            rule(
                AgentType::Security,
                &["security", "auth", "authentication", "vulnerability"],
                &[r"(?i)\b(auth(entication|orization)?|oauth|security|vulnerab\w*|encrypt\w*|csrf|xss|secrets?)\b"],
            ),
            rule(
                AgentType::Frontend,
                &["frontend", "ui", "ux", "design", "css"],
                &[
                    r"(?i)\b(ui|ux|frontend|component|react|vue|css|layout|button|modal|page)\b",
                    r"(?i)\.(tsx|jsx|vue|scss|css)\b",
                ],
            ),
            rule(
                AgentType::Backend,
                &["backend", "api", "server", "database"],
                &[r"(?i)\b(api|endpoint|server|database|query|backend|service|migration)\b"],
            ),
            rule(
                AgentType::Devops,
                &["devops", "infrastructure", "infra", "ci", "deployment"],
                &[r"(?i)(\b(deploy\w*|pipeline|docker\w*|kubernetes|k8s|terraform|infrastructure|helm)\b|\bci/cd\b)"],
            ),
            rule(
                AgentType::Test,
                &["test", "testing", "qa"],
                &[r"(?i)\b(tests?|testing|coverage|e2e|flaky|qa)\b"],
            ),
            rule(
                AgentType::Documentation,
                &["documentation", "docs"],
                &[r"(?i)\b(docs?|documentation|readme|guide|tutorial|changelog)\b"],
            ),
            rule(
                AgentType::Research,
                &["research", "spike", "investigation"],
                &[r"(?i)\b(research|investigate|spike|explore|evaluate|prototype|poc)\b"],
            ),
        ]
    })
}

/// Pick the specialist for an issue
pub fn infer_agent(issue: &Issue) -> AgentAssignment {
    let text = format!("{} {}", issue.title, issue.description);

    for rule in rules() {
        if let Some(label) = rule.labels.iter().find(|l| issue.has_label(l)) {
            return assign(
                issue,
                rule.agent,
                format!("Label '{}' maps to the {} specialist", label, rule.agent),
            );
        }
        if let Some(m) = rule.patterns.iter().find_map(|re| re.find(&text)) {
            return assign(
                issue,
                rule.agent,
                format!(
                    "Issue text mentions '{}', routed to the {} specialist",
                    m.as_str(),
                    rule.agent
                ),
            );
        }
    }

    assign(
        issue,
        AgentType::GeneralPurpose,
        "No specialist signals found".to_string(),
    )
}

fn assign(issue: &Issue, agent_type: AgentType, rationale: String) -> AgentAssignment {
    AgentAssignment {
        issue_id: issue.id.clone(),
        issue_identifier: issue.identifier.clone(),
        agent_type,
        rationale,
    }
}
