use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Low => write!(f, "low"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FileInfo {
    pub path: String,

    #[serde(default)]
    pub lines: u64,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub complexity: Complexity,
}

impl FileInfo {
    pub fn new(path: impl Into<String>, lines: u64) -> Self {
        Self {
            path: path.into(),
            lines,
            language: String::new(),
            complexity: Complexity::default(),
        }
    }
}

/// Files an issue is expected to touch, as discovered by the codebase search.
///
/// Deserialized contexts go through [`CodebaseContext::new`], so loaded data keeps
/// related files disjoint from touched ones and derives a missing `total_lines`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawContext")]
pub struct CodebaseContext {
    pub files_likely_touched: Vec<FileInfo>,

    pub related_files: Vec<FileInfo>,

    /// Sum of touched file lines unless given explicitly
    pub total_lines: u64,

    pub avg_complexity: Complexity,
}

/// Wire form of a context before normalization
#[derive(Deserialize)]
struct RawContext {
    #[serde(default)]
    files_likely_touched: Vec<FileInfo>,

    #[serde(default)]
    related_files: Vec<FileInfo>,

    #[serde(default)]
    total_lines: Option<u64>,

    #[serde(default)]
    avg_complexity: Complexity,
}

impl From<RawContext> for CodebaseContext {
    fn from(raw: RawContext) -> Self {
        let mut ctx = Self::new(raw.files_likely_touched, raw.related_files, raw.avg_complexity);
        if let Some(lines) = raw.total_lines {
            ctx.total_lines = lines;
        }
        ctx
    }
}

fn touched_lines(files: &[FileInfo]) -> u64 {
    files.iter().fold(0, |acc, f| acc.saturating_add(f.lines))
}

impl CodebaseContext {
    /// Build a context, dropping related files that are also touched and
    /// summing `total_lines` over the touched files.
    pub fn new(touched: Vec<FileInfo>, related: Vec<FileInfo>, avg_complexity: Complexity) -> Self {
        let touched_paths: BTreeSet<&str> = touched.iter().map(|f| f.path.as_str()).collect();
        let related: Vec<FileInfo> = related
            .into_iter()
            .filter(|f| !touched_paths.contains(f.path.as_str()))
            .collect();
        let total_lines = touched_lines(&touched);

        Self {
            files_likely_touched: touched,
            related_files: related,
            total_lines,
            avg_complexity,
        }
    }

    /// Context assumed for an issue the search found nothing for
    pub fn fallback(default_lines: u64) -> Self {
        Self {
            files_likely_touched: Vec::new(),
            related_files: Vec::new(),
            total_lines: default_lines,
            avg_complexity: Complexity::Medium,
        }
    }

    /// Every file path the issue references, touched or related
    pub fn all_paths(&self) -> BTreeSet<&str> {
        self.files_likely_touched
            .iter()
            .chain(self.related_files.iter())
            .map(|f| f.path.as_str())
            .collect()
    }

    pub fn all_files(&self) -> impl Iterator<Item = &FileInfo> {
        self.files_likely_touched.iter().chain(self.related_files.iter())
    }
}

impl Default for CodebaseContext {
    fn default() -> Self {
        Self::fallback(crate::config::DEFAULT_CONTEXT_LINES)
    }
}
