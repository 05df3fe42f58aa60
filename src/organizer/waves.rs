use crate::config::OrganizerConfig;
use crate::estimator::TokenEstimator;
use crate::issue::{ContextMap, Issue};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use super::agent::infer_agent;
use super::cluster::{greedy_clusters, order_by_dependencies, split_by_budget};
use super::similarity::OverlapMatrix;
use super::types::Wave;

/// Names handed out by wave number when no label dominates a wave
const DEFAULT_WAVE_NAMES: [&str; 6] = [
    "Foundation",
    "Core Features",
    "Integration",
    "Enhancement",
    "Polish",
    "Finalization",
];

/// Partitions issues into ordered, budget-bounded waves
#[derive(Debug, Clone, Default)]
pub struct WaveOrganizer {
    config: OrganizerConfig,
    estimator: TokenEstimator,
}

impl WaveOrganizer {
    pub fn new(config: OrganizerConfig, estimator: TokenEstimator) -> Self {
        Self { config, estimator }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Organize issues into waves.
    ///
    /// Every issue lands in exactly one wave and waves are numbered 1..=N in the
    /// order they should run.
    pub fn organize(&self, issues: &[Issue], contexts: &ContextMap) -> Vec<Wave> {
        if issues.is_empty() {
            return Vec::new();
        }

        let matrix = OverlapMatrix::build(issues, contexts);
        let mut groups = greedy_clusters(issues, &matrix, self.config.similarity_threshold);
        if self.config.respect_dependencies {
            order_by_dependencies(issues, &mut groups);
        }

        let mut waves: Vec<Wave> = Vec::new();
        for group in &groups {
            for chunk in self.split_group(issues, group, contexts) {
                let wave = self.build_wave(waves.len() + 1, issues, &chunk, contexts, &waves);
                debug!(
                    "Wave {} '{}': {} issues, {} tokens",
                    wave.number,
                    wave.name,
                    wave.issues.len(),
                    wave.estimate.total
                );
                waves.push(wave);
            }
        }

        info!(
            "Organized {} issues into {} waves ({} clusters)",
            issues.len(),
            waves.len(),
            groups.len()
        );
        waves
    }

    fn split_group(
        &self,
        issues: &[Issue],
        group: &[usize],
        contexts: &ContextMap,
    ) -> Vec<Vec<usize>> {
        let members: Vec<&Issue> = group.iter().map(|&i| &issues[i]).collect();
        let combined = self.estimator.estimate_wave(&members, contexts).total;

        if group.len() <= self.config.max_issues_per_wave
            && combined <= self.config.token_budget_per_wave
        {
            return vec![group.to_vec()];
        }

        let costs: Vec<u64> = members
            .iter()
            .map(|issue| self.estimator.estimate(issue, contexts.get(&issue.id)).total)
            .collect();
        let chunks = split_by_budget(
            group,
            &costs,
            self.config.max_issues_per_wave,
            self.config.token_budget_per_wave,
        );

        debug!(
            "Split cluster of {} issues ({} tokens) into {} waves",
            group.len(),
            combined,
            chunks.len()
        );
        chunks
    }

    fn build_wave(
        &self,
        number: usize,
        issues: &[Issue],
        chunk: &[usize],
        contexts: &ContextMap,
        earlier: &[Wave],
    ) -> Wave {
        let members: Vec<&Issue> = chunk.iter().map(|&i| &issues[i]).collect();
        let member_ids: HashSet<&str> = members.iter().map(|i| i.id.as_str()).collect();

        let estimate = self.estimator.estimate_wave(&members, contexts);
        let agents = members.iter().map(|issue| infer_agent(issue)).collect();

        let mut dependencies = BTreeSet::new();
        for issue in &members {
            let Some(parent) = issue.parent.as_deref() else {
                continue;
            };
            if let Some(wave) = earlier.iter().find(|w| w.contains(parent)) {
                dependencies.insert(wave.number);
            }
        }

        let parallelizable = !members.iter().any(|issue| {
            issue
                .parent
                .as_deref()
                .is_some_and(|parent| member_ids.contains(parent))
        });

        let identifiers: Vec<&str> = members.iter().map(|i| i.identifier.as_str()).collect();
        let description = format!(
            "{} issue(s), ~{} tokens: {}",
            members.len(),
            estimate.total,
            identifiers.join(", ")
        );

        Wave {
            number,
            name: wave_name(number, &members),
            description,
            issues: members.into_iter().cloned().collect(),
            estimate,
            agents,
            dependencies: dependencies.into_iter().collect(),
            parallelizable,
        }
    }
}

/// Dominant label (covering at least half the wave), else a default by position
fn wave_name(number: usize, members: &[&Issue]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for issue in members {
        let mut seen = HashSet::new();
        for name in issue.label_names() {
            if !seen.insert(name) {
                continue;
            }
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name, 1)),
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(name, count) in &counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((name, count));
        }
    }

    if let Some((name, count)) = best {
        if count * 2 >= members.len() {
            return capitalize(name);
        }
    }

    DEFAULT_WAVE_NAMES
        .get(number.saturating_sub(1))
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Wave {}", number))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
