//! Grouping issues into clusters and ordering the clusters.
//!
//! Clusters are index lists into the caller's issue slice; the slice itself is
//! never reordered or mutated.

use crate::issue::Issue;
use std::collections::HashMap;
use tracing::debug;

use super::similarity::OverlapMatrix;

/// Single-pass greedy cover, seeds taken in priority order (P0 first).
///
/// Each unassigned seed absorbs every other unassigned issue whose similarity to
/// the seed reaches the threshold. Membership is decided against the seed only, so
/// two members need not be similar to each other.
pub fn greedy_clusters(
    issues: &[Issue],
    matrix: &OverlapMatrix,
    threshold: f64,
) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..issues.len()).collect();
    order.sort_by_key(|&i| issues[i].priority.rank());

    let mut assigned = vec![false; issues.len()];
    let mut groups = Vec::new();

    for (pos, &seed) in order.iter().enumerate() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut group = vec![seed];

        for &other in &order[pos + 1..] {
            if !assigned[other] && matrix.get(seed, other) >= threshold {
                assigned[other] = true;
                group.push(other);
            }
        }

        groups.push(group);
    }

    debug!("Clustered {} issues into {} groups", issues.len(), groups.len());
    groups
}

/// Stable reorder so a group lands after any group holding a parent of one of its issues.
///
/// The comparison is pairwise and not a topological sort: chains that cross unrelated
/// groups, and cycles, keep whatever order the stable insertion pass leaves them in.
pub fn order_by_dependencies(issues: &[Issue], groups: &mut [Vec<usize>]) {
    let index_of: HashMap<&str, usize> = issues
        .iter()
        .enumerate()
        .map(|(i, issue)| (issue.id.as_str(), i))
        .collect();
    let parent_of: HashMap<usize, usize> = issues
        .iter()
        .enumerate()
        .filter_map(|(i, issue)| {
            let parent = issue.parent.as_deref()?;
            index_of.get(parent).map(|&p| (i, p))
        })
        .collect();

    let must_follow = |later: &[usize], earlier: &[usize]| {
        later.iter().any(|i| {
            parent_of
                .get(i)
                .is_some_and(|parent| earlier.contains(parent))
        })
    };

    for i in 1..groups.len() {
        let mut j = i;
        while j > 0
            && must_follow(&groups[j - 1], &groups[j])
            && !must_follow(&groups[j], &groups[j - 1])
        {
            groups.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Split one cluster against the per-wave count cap and token budget.
///
/// `costs` are the individual estimate totals of the cluster's issues, in cluster order.
pub fn split_by_budget(
    group: &[usize],
    costs: &[u64],
    max_issues: usize,
    budget: u64,
) -> Vec<Vec<usize>> {
    let mut chunks = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut running: u64 = 0;

    for (&idx, &cost) in group.iter().zip(costs) {
        let over_count = current.len() + 1 > max_issues;
        let over_budget = running.saturating_add(cost) > budget;
        if !current.is_empty() && (over_count || over_budget) {
            chunks.push(std::mem::take(&mut current));
            running = 0;
        }
        current.push(idx);
        running = running.saturating_add(cost);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{CodebaseContext, Complexity, ContextMap, FileInfo, Priority};

    fn with_files(contexts: &mut ContextMap, id: &str, files: &[&str]) {
        contexts.insert(
            id.to_string(),
            CodebaseContext::new(
                files.iter().map(|f| FileInfo::new(*f, 10)).collect(),
                vec![],
                Complexity::Low,
            ),
        );
    }

    #[test]
    fn test_greedy_groups_around_seed() {
        let issues = vec![
            Issue::new("a", "ENG-1", "A"),
            Issue::new("b", "ENG-2", "B"),
            Issue::new("c", "ENG-3", "C"),
            Issue::new("d", "ENG-4", "D"),
        ];
        let mut contexts = ContextMap::new();
        with_files(&mut contexts, "a", &["x", "y"]);
        with_files(&mut contexts, "b", &["x"]);
        with_files(&mut contexts, "c", &["y"]);
        with_files(&mut contexts, "d", &["z"]);

        let matrix = OverlapMatrix::build(&issues, &contexts);
        let groups = greedy_clusters(&issues, &matrix, 0.3);

        // b and c share nothing but both overlap the seed a
        assert_eq!(groups, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn test_seeds_taken_by_priority() {
        let issues = vec![
            Issue::new("low", "ENG-1", "Low").with_priority(Priority::P3Low),
            Issue::new("hot", "ENG-2", "Hot").with_priority(Priority::P0Critical),
        ];
        let matrix = OverlapMatrix::build(&issues, &ContextMap::new());

        let groups = greedy_clusters(&issues, &matrix, 0.3);

        assert_eq!(groups, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_no_context_issues_stay_apart() {
        let issues = vec![Issue::new("a", "ENG-1", "A"), Issue::new("b", "ENG-2", "B")];
        let matrix = OverlapMatrix::build(&issues, &ContextMap::new());
        assert_eq!(greedy_clusters(&issues, &matrix, 0.3).len(), 2);
    }

    #[test]
    fn test_parent_group_moves_first() {
        let issues = vec![
            Issue::new("child", "ENG-2", "Child").with_parent("parent"),
            Issue::new("parent", "ENG-1", "Parent"),
        ];
        let mut groups = vec![vec![0], vec![1]];

        order_by_dependencies(&issues, &mut groups);

        assert_eq!(groups, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_unrelated_groups_keep_order() {
        let issues = vec![
            Issue::new("a", "ENG-1", "A"),
            Issue::new("b", "ENG-2", "B"),
            Issue::new("c", "ENG-3", "C"),
        ];
        let mut groups = vec![vec![2], vec![0], vec![1]];
        order_by_dependencies(&issues, &mut groups);
        assert_eq!(groups, vec![vec![2], vec![0], vec![1]]);
    }

    #[test]
    fn test_mutual_dependency_left_alone() {
        let issues = vec![
            Issue::new("a", "ENG-1", "A").with_parent("b"),
            Issue::new("b", "ENG-2", "B").with_parent("a"),
        ];
        let mut groups = vec![vec![0], vec![1]];
        order_by_dependencies(&issues, &mut groups);
        assert_eq!(groups, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_split_by_count() {
        let group: Vec<usize> = (0..7).collect();
        let costs = vec![1; 7];
        let chunks = split_by_budget(&group, &costs, 3, 1_000);
        assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    }

    #[test]
    fn test_split_by_budget() {
        let group = vec![4, 5, 6, 7];
        let costs = vec![60, 50, 200, 10];
        let chunks = split_by_budget(&group, &costs, 10, 100);
        // an oversized issue still gets a chunk of its own
        assert_eq!(chunks, vec![vec![4], vec![5], vec![6], vec![7]]);

        let chunks = split_by_budget(&group, &[40, 50, 30, 20], 10, 100);
        assert_eq!(chunks, vec![vec![4, 5], vec![6, 7]]);
    }

    #[test]
    fn test_split_with_saturated_costs() {
        let chunks = split_by_budget(&[0, 1, 2], &[u64::MAX, u64::MAX, 1], 10, 100);
        assert_eq!(chunks, vec![vec![0], vec![1], vec![2]]);
    }
}
