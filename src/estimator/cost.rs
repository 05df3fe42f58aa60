use crate::config::EstimationConfig;
use crate::issue::{CodebaseContext, ContextMap, Issue};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use super::types::{Confidence, TokenBreakdown, TokenEstimate};

/// Layered token cost model.
///
/// Each estimate is `base + context + implementation + tests + review + documentation`,
/// where every later layer is derived from the implementation volume. Estimation is
/// total: an issue without codebase context is priced against a fabricated default.
#[derive(Debug, Clone, Default)]
pub struct TokenEstimator {
    config: EstimationConfig,
}

impl TokenEstimator {
    pub fn new(config: EstimationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    /// Estimate the token cost of a single issue
    pub fn estimate(&self, issue: &Issue, context: Option<&CodebaseContext>) -> TokenEstimate {
        let cfg = &self.config;
        let mut assumptions = Vec::new();

        let fallback;
        let ctx = match context {
            Some(ctx) => ctx,
            None => {
                fallback = CodebaseContext::fallback(cfg.default_context_lines);
                assumptions.push(format!(
                    "No codebase context found; assumed {} lines of medium complexity",
                    cfg.default_context_lines
                ));
                &fallback
            }
        };

        let breakdown = self.breakdown(issue, ctx);

        if !ctx.related_files.is_empty() {
            assumptions.push(format!(
                "Related files read at {}x context expansion",
                cfg.context_expansion
            ));
        }
        assumptions.push(format!(
            "{} complexity: {}x implementation multiplier",
            ctx.avg_complexity,
            cfg.complexity_weights.get(ctx.avg_complexity)
        ));
        assumptions.push(format!(
            "{} priority: {}x implementation multiplier",
            issue.priority,
            cfg.priority_weights.get(issue.priority)
        ));
        assumptions.push(format!(
            "Tests at {:.0}% of implementation, {} review cycle(s) at {:.0}% of changed code",
            cfg.test_overhead * 100.0,
            cfg.review_cycles,
            cfg.review_overhead * 100.0
        ));

        let confidence = confidence_for(issue, ctx);
        let total = cfg.base_overhead.saturating_add(breakdown.sum());

        debug!(
            "Estimated {} at {} tokens ({} confidence)",
            issue.identifier, total, confidence
        );

        TokenEstimate {
            total,
            breakdown,
            confidence,
            assumptions,
            files_analyzed: ctx.all_paths().len(),
        }
    }

    fn breakdown(&self, issue: &Issue, ctx: &CodebaseContext) -> TokenBreakdown {
        let cfg = &self.config;

        let direct_lines: f64 = ctx.files_likely_touched.iter().map(|f| f.lines as f64).sum();
        let related_lines: f64 = ctx.related_files.iter().map(|f| f.lines as f64).sum();
        let context = direct_lines * cfg.tokens_per_line
            + related_lines * cfg.tokens_per_line * cfg.context_expansion;

        let implementation = tokens(
            ctx.total_lines as f64
                * cfg.implementation_factor
                * cfg.tokens_per_line
                * cfg.complexity_weights.get(ctx.avg_complexity)
                * cfg.priority_weights.get(issue.priority),
        );
        let tests = tokens(implementation as f64 * cfg.test_overhead);
        let review = tokens(
            (implementation as f64 + tests as f64)
                * cfg.review_overhead
                * f64::from(cfg.review_cycles),
        );
        let documentation = tokens(implementation as f64 * cfg.documentation);

        TokenBreakdown {
            context: tokens(context),
            implementation,
            tests,
            review,
            documentation,
        }
    }

    /// Estimate a batch of issues executed together.
    ///
    /// Component totals are summed per issue, the base overhead is charged once, and the
    /// combined context cost is discounted by how much the issues' files overlap.
    pub fn estimate_wave(&self, issues: &[&Issue], contexts: &ContextMap) -> TokenEstimate {
        let cfg = &self.config;
        let mut breakdown = TokenBreakdown::default();
        let mut assumptions = Vec::new();
        let mut confidence_sum = 0.0;

        for issue in issues {
            let estimate = self.estimate(issue, contexts.get(&issue.id));
            breakdown.add(&estimate.breakdown);
            confidence_sum += estimate.confidence.weight();
            assumptions.extend(estimate.assumptions);
        }

        let discount = self.shared_context_discount(issues, contexts);
        if discount > 0.0 {
            breakdown.context = tokens(breakdown.context as f64 * (1.0 - discount));
            assumptions.push(format!(
                "Shared context across {} issues: {:.0}% context discount",
                issues.len(),
                discount * 100.0
            ));
        }

        let confidence = if issues.is_empty() {
            Confidence::Low
        } else {
            Confidence::from_average(confidence_sum / issues.len() as f64)
        };

        let files: BTreeSet<&str> = issues
            .iter()
            .filter_map(|i| contexts.get(&i.id))
            .flat_map(|ctx| ctx.all_paths())
            .collect();

        TokenEstimate {
            total: cfg.base_overhead.saturating_add(breakdown.sum()),
            breakdown,
            confidence,
            assumptions: dedupe(assumptions),
            files_analyzed: files.len(),
        }
    }

    /// Fraction by which combined context tokens shrink for this batch
    pub fn shared_context_discount(&self, issues: &[&Issue], contexts: &ContextMap) -> f64 {
        if issues.len() < 2 {
            return 0.0;
        }
        let ratio = overlap_ratio(issues, contexts);
        (ratio * self.config.shared_context_factor).min(self.config.max_shared_context_discount)
    }
}

/// Share of distinct files that appear in at least two issues' contexts
pub fn overlap_ratio(issues: &[&Issue], contexts: &ContextMap) -> f64 {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for issue in issues {
        if let Some(ctx) = contexts.get(&issue.id) {
            for path in ctx.all_paths() {
                *counts.entry(path).or_default() += 1;
            }
        }
    }

    if counts.is_empty() {
        return 0.0;
    }
    let shared = counts.values().filter(|&&n| n >= 2).count();
    shared as f64 / counts.len() as f64
}

/// Score 0-6 from how much evidence backs the estimate
fn confidence_for(issue: &Issue, ctx: &CodebaseContext) -> Confidence {
    let mut score = 0;

    score += match ctx.files_likely_touched.len() {
        n if n >= 3 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };

    score += match issue.description.chars().count() {
        n if n > 200 => 2,
        n if n > 50 => 1,
        _ => 0,
    };

    if issue.labels.len() >= 2 {
        score += 1;
    }
    if issue.estimate.is_some() {
        score += 1;
    }

    Confidence::from_score(score)
}

fn tokens(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Complexity, FileInfo, Priority};

    fn context(
        touched: &[(&str, u64)],
        related: &[(&str, u64)],
        complexity: Complexity,
    ) -> CodebaseContext {
        CodebaseContext::new(
            touched.iter().map(|(p, l)| FileInfo::new(*p, *l)).collect(),
            related.iter().map(|(p, l)| FileInfo::new(*p, *l)).collect(),
            complexity,
        )
    }

    #[test]
    fn test_p1_medium_scenario() {
        let estimator = TokenEstimator::default();
        let issue = Issue::new("1", "ENG-1", "Scenario").with_priority(Priority::P1High);
        let ctx = CodebaseContext {
            files_likely_touched: vec![],
            related_files: vec![],
            total_lines: 200,
            avg_complexity: Complexity::Medium,
        };

        let est = estimator.estimate(&issue, Some(&ctx));

        assert_eq!(est.breakdown.context, 0);
        assert_eq!(est.breakdown.implementation, 72_000);
        assert_eq!(est.breakdown.tests, 43_200);
        assert_eq!(est.breakdown.review, 69_120);
        assert_eq!(est.breakdown.documentation, 7_200);
        assert_eq!(est.total, 196_520);
    }

    #[test]
    fn test_context_tokens_weight_related_files() {
        let estimator = TokenEstimator::default();
        let issue = Issue::new("1", "ENG-1", "Ctx");
        let ctx = context(&[("a.rs", 10)], &[("b.rs", 20)], Complexity::Low);

        let est = estimator.estimate(&issue, Some(&ctx));

        // 10 * 100 + 20 * 100 * 1.5
        assert_eq!(est.breakdown.context, 4_000);
        assert_eq!(est.files_analyzed, 2);
        assert_eq!(est.total, 5_000 + est.breakdown.sum());
    }

    #[test]
    fn test_missing_context_uses_fallback() {
        let estimator = TokenEstimator::default();
        let issue = Issue::new("1", "ENG-1", "Nothing known");

        let est = estimator.estimate(&issue, None);

        // 50 * 2 * 100 * 1.5 * 1.0
        assert_eq!(est.breakdown.implementation, 15_000);
        assert_eq!(est.breakdown.context, 0);
        assert!(est.assumptions[0].contains("No codebase context"));
        assert_eq!(est.confidence, Confidence::Low);
    }

    #[test]
    fn test_confidence_high_with_full_evidence() {
        let issue = Issue::new("1", "ENG-1", "Well described")
            .with_description("x".repeat(201))
            .with_labels(&["backend", "api"])
            .with_estimate(3.0);
        let ctx = context(&[("a", 1), ("b", 1), ("c", 1)], &[], Complexity::Low);

        assert_eq!(confidence_for(&issue, &ctx), Confidence::High);
    }

    #[test]
    fn test_confidence_medium() {
        let issue = Issue::new("1", "ENG-1", "Some detail").with_description("y".repeat(60));
        let ctx = context(&[("a", 1)], &[], Complexity::Low);
        // 1 file + >50 chars = 2
        assert_eq!(confidence_for(&issue, &ctx), Confidence::Low);

        let issue = issue.with_estimate(2.0);
        assert_eq!(confidence_for(&issue, &ctx), Confidence::Medium);
    }

    #[test]
    fn test_overlap_discount_scenario() {
        let estimator = TokenEstimator::default();
        let a = Issue::new("a", "ENG-1", "A");
        let b = Issue::new("b", "ENG-2", "B");
        let mut contexts = ContextMap::new();
        contexts.insert("a".into(), context(&[("shared.rs", 100)], &[], Complexity::Low));
        contexts.insert(
            "b".into(),
            context(&[("shared.rs", 100), ("other.rs", 100)], &[], Complexity::Low),
        );

        let issues = [&a, &b];
        assert_eq!(overlap_ratio(&issues, &contexts), 0.5);
        let discount = estimator.shared_context_discount(&issues, &contexts);
        assert!((discount - 0.35).abs() < 1e-9);

        let wave = estimator.estimate_wave(&issues, &contexts);
        // (10_000 + 20_000) * 0.65
        assert_eq!(wave.breakdown.context, 19_500);
        assert_eq!(wave.total, 5_000 + wave.breakdown.sum());
        assert_eq!(wave.files_analyzed, 2);
    }

    #[test]
    fn test_discount_capped() {
        let estimator = TokenEstimator::default();
        let a = Issue::new("a", "ENG-1", "A");
        let b = Issue::new("b", "ENG-2", "B");
        let mut contexts = ContextMap::new();
        contexts.insert("a".into(), context(&[("same.rs", 10)], &[], Complexity::Low));
        contexts.insert("b".into(), context(&[("same.rs", 10)], &[], Complexity::Low));

        let discount = estimator.shared_context_discount(&[&a, &b], &contexts);
        assert_eq!(discount, 0.5);
    }

    #[test]
    fn test_wave_of_one_equals_single_estimate() {
        let estimator = TokenEstimator::default();
        let issue = Issue::new("a", "ENG-1", "Solo").with_priority(Priority::P0Critical);
        let mut contexts = ContextMap::new();
        contexts.insert(
            "a".into(),
            context(&[("x.rs", 120)], &[("y.rs", 30)], Complexity::High),
        );

        let single = estimator.estimate(&issue, contexts.get("a"));
        let wave = estimator.estimate_wave(&[&issue], &contexts);

        assert_eq!(single, wave);
    }

    #[test]
    fn test_wave_base_overhead_charged_once() {
        let estimator = TokenEstimator::default();
        let a = Issue::new("a", "ENG-1", "A");
        let b = Issue::new("b", "ENG-2", "B");
        let contexts = ContextMap::new();

        let ea = estimator.estimate(&a, None);
        let eb = estimator.estimate(&b, None);
        let wave = estimator.estimate_wave(&[&a, &b], &contexts);

        assert_eq!(wave.total, ea.total + eb.total - 5_000);
        // identical assumptions collapse in the aggregate
        assert_eq!(wave.assumptions, ea.assumptions);
    }

    #[test]
    fn test_wave_confidence_averaged() {
        let estimator = TokenEstimator::default();
        let strong = Issue::new("a", "ENG-1", "A")
            .with_description("z".repeat(250))
            .with_labels(&["x", "y"])
            .with_estimate(1.0);
        let weak = Issue::new("b", "ENG-2", "B");
        let mut contexts = ContextMap::new();
        contexts.insert("a".into(), context(&[("1", 1), ("2", 1), ("3", 1)], &[], Complexity::Low));

        // high (3) + low (1) averages to 2 -> medium
        let wave = estimator.estimate_wave(&[&strong, &weak], &contexts);
        assert_eq!(wave.confidence, Confidence::Medium);
    }

    #[test]
    fn test_huge_contexts_saturate() {
        let estimator = TokenEstimator::default();
        let issue = Issue::new("a", "ENG-1", "A").with_priority(Priority::P0Critical);
        let big = CodebaseContext {
            files_likely_touched: Vec::new(),
            related_files: Vec::new(),
            total_lines: 40_000_000_000_000_000,
            avg_complexity: Complexity::High,
        };
        assert_eq!(estimator.estimate(&issue, Some(&big)).total, u64::MAX);

        let other = Issue::new("b", "ENG-2", "B");
        let half = u64::MAX / 2 + 1;
        let mut contexts = ContextMap::new();
        contexts.insert("a".into(), big);
        contexts.insert(
            "b".into(),
            context(&[("x.rs", half), ("y.rs", half)], &[], Complexity::Low),
        );

        let single = estimator.estimate(&other, contexts.get("b"));
        assert_eq!(single.breakdown.context, u64::MAX);
        let wave = estimator.estimate_wave(&[&issue, &other], &contexts);
        assert_eq!(wave.total, u64::MAX);
    }
}
