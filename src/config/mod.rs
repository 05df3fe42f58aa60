mod defaults;
mod types;

pub use defaults::DEFAULT_CONTEXT_LINES;
pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            estimation: EstimationConfig::default(),
            organizer: OrganizerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let organizer = &self.organizer;
        if organizer.max_issues_per_wave == 0 {
            return Err(ConfigError::Invalid(
                "organizer.max_issues_per_wave must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&organizer.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "organizer.similarity_threshold must be within [0, 1], got {}",
                organizer.similarity_threshold
            )));
        }

        let est = &self.estimation;
        let multipliers = [
            ("tokens_per_line", est.tokens_per_line),
            ("context_expansion", est.context_expansion),
            ("implementation_factor", est.implementation_factor),
            ("test_overhead", est.test_overhead),
            ("review_overhead", est.review_overhead),
            ("documentation", est.documentation),
            ("shared_context_factor", est.shared_context_factor),
            ("max_shared_context_discount", est.max_shared_context_discount),
            ("complexity_weights.low", est.complexity_weights.low),
            ("complexity_weights.medium", est.complexity_weights.medium),
            ("complexity_weights.high", est.complexity_weights.high),
            ("priority_weights.p0", est.priority_weights.p0),
            ("priority_weights.p1", est.priority_weights.p1),
            ("priority_weights.p2", est.priority_weights.p2),
            ("priority_weights.p3", est.priority_weights.p3),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "estimation.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_merges_over_defaults() {
        let yaml = r#"
estimation:
  review_cycles: 3
  priority_weights:
    p0: 2.0
organizer:
  max_issues_per_wave: 8
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.estimation.review_cycles, 3);
        assert_eq!(config.estimation.priority_weights.p0, 2.0);
        assert_eq!(config.estimation.priority_weights.p1, 1.2);
        assert_eq!(config.estimation.base_overhead, 5_000);
        assert_eq!(config.organizer.max_issues_per_wave, 8);
        assert_eq!(config.organizer.similarity_threshold, 0.3);
        assert!(config.organizer.respect_dependencies);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.estimation, EstimationConfig::default());
        assert_eq!(config.organizer, OrganizerConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_wave_size() {
        let mut config = Config::default();
        config.organizer.max_issues_per_wave = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_negative_multiplier() {
        let mut config = Config::default();
        config.estimation.complexity_weights.high = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("complexity_weights.high"));
    }
}
