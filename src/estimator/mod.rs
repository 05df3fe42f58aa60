//! Token cost estimation for single issues and whole waves.

mod cost;
mod types;

pub use cost::{overlap_ratio, TokenEstimator};
pub use types::{Confidence, TokenBreakdown, TokenEstimate};
