//! The fixed risk pattern table.
//!
//! Patterns are evaluated in table order. Each pattern fires on up to three
//! independent signals: a keyword contained in the issue text, a context file path
//! matching one of its path regexes, or the issue text matching one of its
//! description regexes.

use regex::Regex;
use std::sync::OnceLock;

use super::types::{Impact, Likelihood, RiskCategory};

pub struct RiskPattern {
    pub category: RiskCategory,
    pub keywords: &'static [&'static str],
    pub file_patterns: Vec<Regex>,
    pub description_patterns: Vec<Regex>,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub summary: &'static str,
    pub mitigation: &'static str,
}

/// Which of a pattern's signals fired for one issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub keyword: bool,
    pub file: bool,
    pub description: bool,
}

impl Signals {
    pub fn count(self) -> usize {
        [self.keyword, self.file, self.description]
            .iter()
            .filter(|&&s| s)
            .count()
    }

    pub fn any(self) -> bool {
        self.count() > 0
    }

    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.keyword {
            names.push("keyword");
        }
        if self.file {
            names.push("file path");
        }
        if self.description {
            names.push("description");
        }
        names
    }
}

impl RiskPattern {
    /// Evaluate all three signals against a lowercased haystack and the issue's file paths
    pub fn signals(&self, haystack: &str, paths: &[&str]) -> Signals {
        Signals {
            keyword: self.keywords.iter().any(|k| haystack.contains(k)),
            file: paths
                .iter()
                .any(|p| self.file_patterns.iter().any(|re| re.is_match(p))),
            description: self.description_patterns.iter().any(|re| re.is_match(haystack)),
        }
    }

    /// Likelihood after signal-strength adjustment
    pub fn likelihood_for(&self, signals: Signals) -> Likelihood {
        match signals.count() {
            3 => Likelihood::High,
            1 if self.likelihood == Likelihood::High => Likelihood::Medium,
            _ => self.likelihood,
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// The pattern table, compiled once
pub fn risk_patterns() -> &'static [RiskPattern] {
    static PATTERNS: OnceLock<Vec<RiskPattern>> = OnceLock::new();
    PATTERNS.get_or_init(build_patterns)
}

fn build_patterns() -> Vec<RiskPattern> {
    vec![
        RiskPattern {
            category: RiskCategory::ExternalDependency,
            keywords: &[
                "third-party",
                "third party",
                "external api",
                "webhook",
                "oauth",
                "sdk",
                "vendor",
                "upstream",
            ],
            file_patterns: compile(&[
                r"(?i)(^|/)(vendor|third_party|external)/",
                r"(?i)(^|/)(package\.json|cargo\.toml|requirements\.txt|go\.mod|gemfile)$",
            ]),
            description_patterns: compile(&[
                r"(?i)\b(stripe|twilio|sendgrid|aws|gcp|azure|slack|github|salesforce|auth0)\b",
                r"(?i)\b(rest|graphql|grpc)\s+(api|endpoint|client)\b",
            ]),
            likelihood: Likelihood::Medium,
            impact: Impact::High,
            summary: "Relies on services or packages outside the team's control",
            mitigation: "Isolate the external service behind an interface, mock it in tests, and add timeouts and retries around every call.",
        },
        RiskPattern {
            category: RiskCategory::BreakingChange,
            keywords: &[
                "breaking",
                "deprecat",
                "rename",
                "remove",
                "migrate",
                "backward",
                "api change",
            ],
            file_patterns: compile(&[
                r"(?i)(^|/)migrations?/",
                r"(?i)\.(proto|graphql|avsc)$",
                r"(?i)(^|/)(openapi|swagger)\.(ya?ml|json)$",
            ]),
            description_patterns: compile(&[
                r"(?i)\bbreaking\s+changes?\b",
                r"(?i)\b(remove|drop|rename)\s+(the\s+)?(column|field|endpoint|table|parameter)\b",
                r"(?i)\bv\d+\s+(api|schema)\b",
            ]),
            likelihood: Likelihood::Medium,
            impact: Impact::High,
            summary: "May break existing consumers of changed interfaces",
            mitigation: "Ship behind a feature flag or versioned interface, announce the change to consumers, and keep a rollback path.",
        },
        RiskPattern {
            category: RiskCategory::Integration,
            keywords: &[
                "integrat",
                "wire up",
                "end-to-end",
                "e2e",
                "cross-service",
                "handoff",
            ],
            file_patterns: compile(&[
                r"(?i)(^|/)(integrations?|adapters?|clients?|connectors?)/",
                r"(?i)(^|/)(routes?|handlers?|gateway)/",
            ]),
            description_patterns: compile(&[
                r"(?i)\bdepends\s+on\b",
                r"(?i)\b(blocked\s+by|requires)\s+#?[a-z]+-\d+\b",
            ]),
            likelihood: Likelihood::Medium,
            impact: Impact::Medium,
            summary: "Touches the seam between components developed separately",
            mitigation: "Agree on the contract up front and add an integration test that exercises both sides.",
        },
        RiskPattern {
            category: RiskCategory::Performance,
            keywords: &[
                "performance",
                "slow",
                "latency",
                "optimiz",
                "throughput",
                "cache",
                "scalab",
            ],
            file_patterns: compile(&[r"(?i)(^|/)(cache|perf|benches|benchmarks?)/"]),
            description_patterns: compile(&[
                r"(?i)\b\d+\s*(ms|milliseconds|rps|qps)\b",
                r"(?i)\b(n\+1|bottleneck|p9[59])\b",
            ]),
            likelihood: Likelihood::Medium,
            impact: Impact::Medium,
            summary: "May regress latency, throughput or memory use",
            mitigation: "Capture a baseline benchmark before the change and compare after.",
        },
        RiskPattern {
            category: RiskCategory::Security,
            keywords: &[
                "auth",
                "security",
                "password",
                "secret",
                "encrypt",
                "permission",
                "vulnerab",
                "xss",
                "csrf",
            ],
            file_patterns: compile(&[
                r"(?i)(^|/)(auth|security|crypto|permissions?)/",
                r"(?i)(secret|credential|\.env$)",
            ]),
            description_patterns: compile(&[
                r"(?i)\bcve-\d{4}-\d+\b",
                r"(?i)\b(sql\s+injection|privilege\s+escalation|access\s+control)\b",
            ]),
            likelihood: Likelihood::Medium,
            impact: Impact::Critical,
            summary: "Affects authentication, authorization or sensitive data",
            mitigation: "Request a security review and add negative tests for unauthorized access.",
        },
        RiskPattern {
            category: RiskCategory::DataIntegrity,
            keywords: &[
                "database",
                "data loss",
                "corrupt",
                "transaction",
                "consistency",
                "backfill",
                "migration",
            ],
            file_patterns: compile(&[
                r"(?i)(^|/)(db|database|models?|repositor(y|ies)|schema)/",
                r"(?i)\.sql$",
            ]),
            description_patterns: compile(&[
                r"(?i)\b(data\s+loss|race\s+condition|deadlock|duplicate\s+records?)\b",
            ]),
            likelihood: Likelihood::Medium,
            impact: Impact::High,
            summary: "Could lose or corrupt persisted data",
            mitigation: "Back up affected data, make the change idempotent, and verify with a dry run on a copy.",
        },
        RiskPattern {
            category: RiskCategory::ResourceConstraint,
            keywords: &["bulk", "batch", "quota", "rate limit", "memory", "large file"],
            file_patterns: compile(&[r"(?i)(^|/)(jobs?|workers?|queues?)/"]),
            description_patterns: compile(&[
                r"(?i)\b(rate[-\s]limit(s|ed|ing)?|out\s+of\s+memory|oom)\b",
                r"(?i)\b\d+\s*(gb|tb|million)\b",
            ]),
            likelihood: Likelihood::Low,
            impact: Impact::Medium,
            summary: "May exhaust quotas, memory or worker capacity",
            mitigation: "Process in bounded batches and monitor quota and memory headroom.",
        },
        RiskPattern {
            category: RiskCategory::Timeline,
            keywords: &["urgent", "asap", "deadline", "blocker", "hotfix"],
            file_patterns: Vec::new(),
            description_patterns: compile(&[
                r"(?i)\b(by|before)\s+(end\s+of\s+)?(monday|tuesday|wednesday|thursday|friday|eod|eow|sprint|release)\b",
                r"(?i)\bdue\s+(date|by)\b",
            ]),
            likelihood: Likelihood::High,
            impact: Impact::Medium,
            summary: "Has schedule pressure that may force shortcuts",
            mitigation: "Cut scope to the smallest shippable slice and flag the date risk to stakeholders early.",
        },
    ]
}

/// Whether a path looks like a test file
pub fn is_test_path(path: &str) -> bool {
    static TEST_PATH: OnceLock<Regex> = OnceLock::new();
    TEST_PATH
        .get_or_init(|| {
            Regex::new(r"(?i)((^|/)(tests?|__tests__|specs?)/|[._-](test|spec)s?\.[a-z0-9]+$)")
                .expect("valid regex")
        })
        .is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(category: RiskCategory) -> &'static RiskPattern {
        risk_patterns()
            .iter()
            .find(|p| p.category == category)
            .unwrap()
    }

    #[test]
    fn test_table_order_covers_every_category() {
        let categories: Vec<_> = risk_patterns().iter().map(|p| p.category).collect();
        assert_eq!(categories, RiskCategory::ALL.to_vec());
    }

    #[test]
    fn test_oauth_stripe_fires_two_signals() {
        let p = pattern(RiskCategory::ExternalDependency);
        let haystack = "oauth integration with stripe webhook";

        let signals = p.signals(haystack, &[]);
        assert!(signals.keyword);
        assert!(signals.description);
        assert!(!signals.file);
        assert_eq!(p.likelihood_for(signals), Likelihood::Medium);
    }

    #[test]
    fn test_all_signals_force_high() {
        let p = pattern(RiskCategory::Security);
        let signals = p.signals("fix sql injection in auth", &["src/auth/login.rs"]);
        assert_eq!(signals.count(), 3);
        assert_eq!(p.likelihood_for(signals), Likelihood::High);
    }

    #[test]
    fn test_single_signal_downgrades_high_default() {
        let p = pattern(RiskCategory::Timeline);
        let signals = p.signals("hotfix for login", &[]);
        assert_eq!(signals.count(), 1);
        assert_eq!(p.likelihood_for(signals), Likelihood::Medium);
    }

    #[test]
    fn test_file_signal() {
        let p = pattern(RiskCategory::DataIntegrity);
        let signals = p.signals("tidy up", &["migrations/0004_users.sql"]);
        assert!(signals.file);
        assert!(!signals.keyword);
    }

    #[test]
    fn test_is_test_path() {
        assert!(is_test_path("tests/cli_tests.rs"));
        assert!(is_test_path("src/app/__tests__/button.tsx"));
        assert!(is_test_path("pkg/handler_test.go"));
        assert!(is_test_path("web/login.spec.ts"));
        assert!(!is_test_path("src/contest.rs"));
        assert!(!is_test_path("src/auth/login.rs"));
    }
}
