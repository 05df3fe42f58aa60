//! Risk prediction: pattern-weighted per-issue risks, cross-issue dependency
//! risks, an aggregate score and wave reordering suggestions.

mod assessment;
mod patterns;
mod predictor;
mod types;

pub use assessment::total_risk_score;
pub use patterns::{is_test_path, risk_patterns, RiskPattern, Signals};
pub use predictor::RiskPredictor;
pub use types::{
    AdjustmentAction, Impact, Likelihood, Risk, RiskAnalysisResult, RiskCategory, WaveAdjustment,
};
