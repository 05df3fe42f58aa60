use crate::config::Config;
use crate::error::OutputError;
use crate::estimator::TokenEstimator;
use crate::issue::PlanInput;
use crate::organizer::{Wave, WaveOrganizer};
use crate::risk::{RiskAnalysisResult, RiskPredictor};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything one planning run produces, ready for downstream artifact generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub timestamp: String,
    pub config: Config,
    pub totals: PlanTotals,
    pub waves: Vec<Wave>,
    pub risk_analysis: RiskAnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTotals {
    pub issues: usize,
    pub waves: usize,
    pub total_tokens: u64,
    pub risk_score: f64,
}

impl PlanReport {
    /// Run the organizer and the risk predictor over the same input
    pub fn build(config: &Config, input: &PlanInput) -> Self {
        let estimator = TokenEstimator::new(config.estimation.clone());
        let organizer = WaveOrganizer::new(config.organizer.clone(), estimator);

        let waves = organizer.organize(&input.issues, &input.contexts);
        let risk_analysis = RiskPredictor::new().analyze(&input.issues, &input.contexts);

        let totals = PlanTotals {
            issues: input.issues.len(),
            waves: waves.len(),
            total_tokens: waves
                .iter()
                .fold(0, |acc: u64, w| acc.saturating_add(w.estimate.total)),
            risk_score: risk_analysis.total_risk_score,
        };

        info!(
            "Plan: {} issues in {} waves, {} tokens, risk score {:.1}",
            totals.issues, totals.waves, totals.total_tokens, totals.risk_score
        );

        Self {
            timestamp: Utc::now().to_rfc3339(),
            config: config.clone(),
            totals,
            waves,
            risk_analysis,
        }
    }
}

/// Serialize any report value as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write rendered output to a file, creating the parent directory
pub fn write_report(output_path: &Path, content: &str) -> Result<(), OutputError> {
    let parent = output_path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(OutputError::CreateDir)?;
    fs::write(output_path, content).map_err(OutputError::WriteReport)?;

    info!("Wrote report to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Issue;

    #[test]
    fn test_build_report_totals() {
        let input = PlanInput {
            issues: vec![
                Issue::new("a", "ENG-1", "Fix auth bug"),
                Issue::new("b", "ENG-2", "Write docs").with_parent("a"),
            ],
            contexts: Default::default(),
        };

        let report = PlanReport::build(&Config::default(), &input);

        assert_eq!(report.totals.issues, 2);
        assert_eq!(report.totals.waves, report.waves.len());
        let sum: u64 = report.waves.iter().map(|w| w.estimate.total).sum();
        assert_eq!(report.totals.total_tokens, sum);
        assert!(!report.risk_analysis.risks.is_empty());
    }

    #[test]
    fn test_write_report_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/plan.json");

        write_report(&path, &to_json(&vec![1, 2, 3]).unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('2'));
    }
}
