use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    ExternalDependency,
    BreakingChange,
    Integration,
    Performance,
    Security,
    DataIntegrity,
    ResourceConstraint,
    Timeline,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 8] = [
        RiskCategory::ExternalDependency,
        RiskCategory::BreakingChange,
        RiskCategory::Integration,
        RiskCategory::Performance,
        RiskCategory::Security,
        RiskCategory::DataIntegrity,
        RiskCategory::ResourceConstraint,
        RiskCategory::Timeline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::ExternalDependency => "external_dependency",
            RiskCategory::BreakingChange => "breaking_change",
            RiskCategory::Integration => "integration",
            RiskCategory::Performance => "performance",
            RiskCategory::Security => "security",
            RiskCategory::DataIntegrity => "data_integrity",
            RiskCategory::ResourceConstraint => "resource_constraint",
            RiskCategory::Timeline => "timeline",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    Low,
    Medium,
    High,
}

impl Likelihood {
    pub fn weight(self) -> u32 {
        match self {
            Likelihood::Low => 1,
            Likelihood::Medium => 2,
            Likelihood::High => 3,
        }
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Likelihood::Low => write!(f, "low"),
            Likelihood::Medium => write!(f, "medium"),
            Likelihood::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

impl Impact {
    pub fn weight(self) -> u32 {
        match self {
            Impact::Low => 1,
            Impact::Medium => 2,
            Impact::High => 4,
            Impact::Critical => 8,
        }
    }

    /// One step up for urgent work; low and critical stay put
    pub fn escalate(self) -> Self {
        match self {
            Impact::Medium => Impact::High,
            Impact::High => Impact::Critical,
            other => other,
        }
    }

    pub fn is_severe(self) -> bool {
        matches!(self, Impact::High | Impact::Critical)
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
            Impact::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Risk {
    /// Unique within one analysis run
    pub id: String,

    pub category: RiskCategory,

    /// Id of the issue the risk was raised on
    pub issue_id: String,

    pub issue_identifier: String,

    pub description: String,

    pub likelihood: Likelihood,

    pub impact: Impact,

    pub mitigation: String,

    /// Other issue ids involved (cross-issue risks only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_issues: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_wave_adjustment: Option<String>,
}

impl Risk {
    pub fn score(&self) -> u32 {
        self.impact.weight() * self.likelihood.weight()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentAction {
    /// Schedule the issue in an earlier wave
    Reorder,
    AddDependency,
    /// Reserve extra token headroom across the plan
    AddBuffer,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WaveAdjustment {
    pub action: AdjustmentAction,

    /// Issue the adjustment applies to; `None` for plan-wide suggestions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,

    /// Identifiers of issues that should complete first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RiskAnalysisResult {
    pub risks: Vec<Risk>,

    /// Normalised aggregate in [0, 100]
    pub total_risk_score: f64,

    /// Risks with high or critical impact
    pub high_impact_risks: Vec<Risk>,

    pub wave_adjustments: Vec<WaveAdjustment>,

    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_escalation() {
        assert_eq!(Impact::Low.escalate(), Impact::Low);
        assert_eq!(Impact::Medium.escalate(), Impact::High);
        assert_eq!(Impact::High.escalate(), Impact::Critical);
        assert_eq!(Impact::Critical.escalate(), Impact::Critical);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&RiskCategory::DataIntegrity).unwrap();
        assert_eq!(json, "\"data_integrity\"");
        assert_eq!(RiskCategory::ALL.len(), 8);
    }
}
