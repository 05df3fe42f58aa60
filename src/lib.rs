//! Wave planning for issue backlogs: token cost estimation, risk prediction
//! and grouping of issues into ordered execution waves.

pub mod cli;
pub mod config;
pub mod error;
pub mod estimator;
pub mod issue;
pub mod organizer;
pub mod output;
pub mod risk;

pub use config::Config;
pub use error::WavesmithError;
pub use estimator::{TokenEstimate, TokenEstimator};
pub use issue::{CodebaseContext, Issue, PlanInput};
pub use organizer::{Wave, WaveOrganizer};
pub use risk::{RiskAnalysisResult, RiskPredictor};
