use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Bucket a 0-6 evidence score
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 5 => Confidence::High,
            s if s >= 3 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Confidence::Low => 1.0,
            Confidence::Medium => 2.0,
            Confidence::High => 3.0,
        }
    }

    /// Bucket an averaged weight back into a level
    pub fn from_average(avg: f64) -> Self {
        if avg >= 2.5 {
            Confidence::High
        } else if avg >= 1.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Token cost per activity; the base overhead is not part of the breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenBreakdown {
    pub context: u64,
    pub implementation: u64,
    pub tests: u64,
    pub review: u64,
    pub documentation: u64,
}

impl TokenBreakdown {
    /// Saturating sum of the five components
    pub fn sum(&self) -> u64 {
        [self.implementation, self.tests, self.review, self.documentation]
            .into_iter()
            .fold(self.context, u64::saturating_add)
    }

    pub fn add(&mut self, other: &TokenBreakdown) {
        self.context = self.context.saturating_add(other.context);
        self.implementation = self.implementation.saturating_add(other.implementation);
        self.tests = self.tests.saturating_add(other.tests);
        self.review = self.review.saturating_add(other.review);
        self.documentation = self.documentation.saturating_add(other.documentation);
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenEstimate {
    /// Base overhead plus every breakdown component
    pub total: u64,

    pub breakdown: TokenBreakdown,

    pub confidence: Confidence,

    /// Human-readable notes on how the number was reached
    #[serde(default)]
    pub assumptions: Vec<String>,

    pub files_analyzed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(Confidence::from_score(6), Confidence::High);
        assert_eq!(Confidence::from_score(5), Confidence::High);
        assert_eq!(Confidence::from_score(4), Confidence::Medium);
        assert_eq!(Confidence::from_score(3), Confidence::Medium);
        assert_eq!(Confidence::from_score(2), Confidence::Low);
        assert_eq!(Confidence::from_score(0), Confidence::Low);
    }

    #[test]
    fn test_confidence_average_thresholds() {
        assert_eq!(Confidence::from_average(2.5), Confidence::High);
        assert_eq!(Confidence::from_average(2.0), Confidence::Medium);
        assert_eq!(Confidence::from_average(1.5), Confidence::Medium);
        assert_eq!(Confidence::from_average(1.49), Confidence::Low);
    }

    #[test]
    fn test_breakdown_arithmetic_saturates() {
        let mut a = TokenBreakdown {
            context: u64::MAX,
            implementation: 1,
            ..TokenBreakdown::default()
        };
        assert_eq!(a.sum(), u64::MAX);

        a.add(&TokenBreakdown {
            context: 5,
            implementation: 2,
            ..TokenBreakdown::default()
        });
        assert_eq!(a.context, u64::MAX);
        assert_eq!(a.implementation, 3);
    }
}
