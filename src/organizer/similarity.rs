use crate::issue::{ContextMap, Issue};
use std::collections::BTreeSet;

/// |A ∩ B| / |A ∪ B| over file paths.
///
/// Two empty sets score 0: issues with no known files show no overlap.
pub fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Pairwise file-overlap similarity for a slice of issues
#[derive(Debug, Clone)]
pub struct OverlapMatrix {
    values: Vec<Vec<f64>>,
}

impl OverlapMatrix {
    pub fn build(issues: &[Issue], contexts: &ContextMap) -> Self {
        let files: Vec<BTreeSet<&str>> = issues
            .iter()
            .map(|issue| {
                contexts
                    .get(&issue.id)
                    .map(|ctx| ctx.all_paths())
                    .unwrap_or_default()
            })
            .collect();

        let n = issues.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let sim = jaccard(&files[i], &files[j]);
                values[i][j] = sim;
                values[j][i] = sim;
            }
        }

        Self { values }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{CodebaseContext, Complexity, FileInfo};

    fn set<'a>(paths: &[&'a str]) -> BTreeSet<&'a str> {
        paths.iter().copied().collect()
    }

    #[test]
    fn test_jaccard_basic() {
        let a = set(&["a", "b"]);
        let b = set(&["b", "c"]);
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_jaccard_empty_sets_score_zero() {
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["a"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let issues = vec![
            Issue::new("a", "ENG-1", "A"),
            Issue::new("b", "ENG-2", "B"),
            Issue::new("c", "ENG-3", "C"),
        ];
        let mut contexts = ContextMap::new();
        contexts.insert(
            "a".into(),
            CodebaseContext::new(
                vec![FileInfo::new("x.rs", 1)],
                vec![FileInfo::new("y.rs", 1)],
                Complexity::Low,
            ),
        );
        contexts.insert(
            "b".into(),
            CodebaseContext::new(vec![FileInfo::new("y.rs", 1)], vec![], Complexity::Low),
        );

        let matrix = OverlapMatrix::build(&issues, &contexts);

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
                assert!((0.0..=1.0).contains(&matrix.get(i, j)));
            }
        }
        assert_eq!(matrix.get(0, 1), 0.5);
        assert_eq!(matrix.get(0, 2), 0.0);
    }
}
