use crate::estimator::TokenEstimate;
use crate::issue::Issue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentType {
    Security,
    Frontend,
    Backend,
    Devops,
    Test,
    Documentation,
    Research,
    GeneralPurpose,
}

impl AgentType {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentType::Security => "security",
            AgentType::Frontend => "frontend",
            AgentType::Backend => "backend",
            AgentType::Devops => "devops",
            AgentType::Test => "test",
            AgentType::Documentation => "documentation",
            AgentType::Research => "research",
            AgentType::GeneralPurpose => "general-purpose",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AgentAssignment {
    pub issue_id: String,

    pub issue_identifier: String,

    pub agent_type: AgentType,

    pub rationale: String,
}

/// One execution batch
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Wave {
    /// 1-based, contiguous in emission order
    pub number: usize,

    pub name: String,

    pub description: String,

    pub issues: Vec<Issue>,

    pub estimate: TokenEstimate,

    pub agents: Vec<AgentAssignment>,

    /// Numbers of earlier waves holding a parent of one of this wave's issues
    #[serde(default)]
    pub dependencies: Vec<usize>,

    /// False when one issue in the wave is the parent of another
    pub parallelizable: bool,
}

impl Wave {
    pub fn issue_ids(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|i| i.id.as_str())
    }

    pub fn contains(&self, issue_id: &str) -> bool {
        self.issues.iter().any(|i| i.id == issue_id)
    }
}
