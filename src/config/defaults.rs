/// Lines assumed for an issue with no codebase context
pub const DEFAULT_CONTEXT_LINES: u64 = 50;

pub fn default_version() -> u32 {
    1
}

pub fn default_base_overhead() -> u64 {
    5_000
}

pub fn default_tokens_per_line() -> f64 {
    100.0
}

pub fn default_context_expansion() -> f64 {
    1.5
}

pub fn default_implementation_factor() -> f64 {
    2.0
}

pub fn default_test_overhead() -> f64 {
    0.6
}

pub fn default_review_overhead() -> f64 {
    0.3
}

pub fn default_review_cycles() -> u32 {
    2
}

pub fn default_documentation() -> f64 {
    0.1
}

pub fn default_shared_context_factor() -> f64 {
    0.7
}

pub fn default_max_shared_context_discount() -> f64 {
    0.5
}

pub fn default_context_lines() -> u64 {
    DEFAULT_CONTEXT_LINES
}

pub fn default_complexity_low() -> f64 {
    1.0
}

pub fn default_complexity_medium() -> f64 {
    1.5
}

pub fn default_complexity_high() -> f64 {
    2.5
}

pub fn default_priority_p0() -> f64 {
    1.5
}

pub fn default_priority_p1() -> f64 {
    1.2
}

pub fn default_priority_p2() -> f64 {
    1.0
}

pub fn default_priority_p3() -> f64 {
    0.8
}

pub fn default_similarity_threshold() -> f64 {
    0.3
}

pub fn default_max_issues_per_wave() -> usize {
    5
}

pub fn default_token_budget_per_wave() -> u64 {
    150_000
}

pub fn default_true() -> bool {
    true
}
