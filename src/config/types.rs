use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::issue::{Complexity, Priority};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub estimation: EstimationConfig,

    #[serde(default)]
    pub organizer: OrganizerConfig,
}

/// Knobs of the layered token cost model
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct EstimationConfig {
    /// Flat system/tooling overhead, charged once per estimate
    #[serde(default = "default_base_overhead")]
    pub base_overhead: u64,

    #[serde(default = "default_tokens_per_line")]
    pub tokens_per_line: f64,

    /// Multiplier for reading related (non-touched) files
    #[serde(default = "default_context_expansion")]
    pub context_expansion: f64,

    /// Cost of writing a line relative to reading one
    #[serde(default = "default_implementation_factor")]
    pub implementation_factor: f64,

    #[serde(default = "default_test_overhead")]
    pub test_overhead: f64,

    #[serde(default = "default_review_overhead")]
    pub review_overhead: f64,

    #[serde(default = "default_review_cycles")]
    pub review_cycles: u32,

    #[serde(default = "default_documentation")]
    pub documentation: f64,

    #[serde(default)]
    pub complexity_weights: ComplexityWeights,

    #[serde(default)]
    pub priority_weights: PriorityWeights,

    /// Discount per unit of file overlap when aggregating a wave
    #[serde(default = "default_shared_context_factor")]
    pub shared_context_factor: f64,

    #[serde(default = "default_max_shared_context_discount")]
    pub max_shared_context_discount: f64,

    /// Lines assumed when an issue has no context
    #[serde(default = "default_context_lines")]
    pub default_context_lines: u64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            base_overhead: default_base_overhead(),
            tokens_per_line: default_tokens_per_line(),
            context_expansion: default_context_expansion(),
            implementation_factor: default_implementation_factor(),
            test_overhead: default_test_overhead(),
            review_overhead: default_review_overhead(),
            review_cycles: default_review_cycles(),
            documentation: default_documentation(),
            complexity_weights: ComplexityWeights::default(),
            priority_weights: PriorityWeights::default(),
            shared_context_factor: default_shared_context_factor(),
            max_shared_context_discount: default_max_shared_context_discount(),
            default_context_lines: default_context_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ComplexityWeights {
    #[serde(default = "default_complexity_low")]
    pub low: f64,

    #[serde(default = "default_complexity_medium")]
    pub medium: f64,

    #[serde(default = "default_complexity_high")]
    pub high: f64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            low: default_complexity_low(),
            medium: default_complexity_medium(),
            high: default_complexity_high(),
        }
    }
}

impl ComplexityWeights {
    pub fn get(&self, complexity: Complexity) -> f64 {
        match complexity {
            Complexity::Low => self.low,
            Complexity::Medium => self.medium,
            Complexity::High => self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct PriorityWeights {
    #[serde(default = "default_priority_p0")]
    pub p0: f64,

    #[serde(default = "default_priority_p1")]
    pub p1: f64,

    #[serde(default = "default_priority_p2")]
    pub p2: f64,

    #[serde(default = "default_priority_p3")]
    pub p3: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            p0: default_priority_p0(),
            p1: default_priority_p1(),
            p2: default_priority_p2(),
            p3: default_priority_p3(),
        }
    }
}

impl PriorityWeights {
    pub fn get(&self, priority: Priority) -> f64 {
        match priority {
            Priority::P0Critical => self.p0,
            Priority::P1High => self.p1,
            Priority::P2Medium => self.p2,
            Priority::P3Low => self.p3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct OrganizerConfig {
    /// Minimum Jaccard similarity for two issues to share a cluster
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    #[serde(default = "default_max_issues_per_wave")]
    pub max_issues_per_wave: usize,

    #[serde(default = "default_token_budget_per_wave")]
    pub token_budget_per_wave: u64,

    /// Order clusters so parents land in earlier waves
    #[serde(default = "default_true")]
    pub respect_dependencies: bool,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_issues_per_wave: default_max_issues_per_wave(),
            token_budget_per_wave: default_token_budget_per_wave(),
            respect_dependencies: default_true(),
        }
    }
}
