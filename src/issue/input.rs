use super::{CodebaseContext, Issue};
use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Per-issue codebase context, keyed by issue id
pub type ContextMap = HashMap<String, CodebaseContext>;

/// The document handed over by the tracker adapter and codebase search
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlanInput {
    pub issues: Vec<Issue>,

    #[serde(default)]
    pub contexts: ContextMap,
}

impl PlanInput {
    /// Load planning input from a JSON file
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|e| InputError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let input = Self::from_json(&content)?;
        debug!(
            "Loaded {} issues and {} contexts from {}",
            input.issues.len(),
            input.contexts.len(),
            path.display()
        );
        Ok(input)
    }

    /// Parse and check planning input. Contexts are normalized as they deserialize.
    pub fn from_json(content: &str) -> Result<Self, InputError> {
        let mut input: PlanInput = serde_json::from_str(content)?;
        input.validate()?;
        input.drop_orphan_contexts();
        Ok(input)
    }

    fn validate(&self) -> Result<(), InputError> {
        let mut seen = HashSet::new();
        for issue in &self.issues {
            if !seen.insert(issue.id.as_str()) {
                return Err(InputError::DuplicateIssue(issue.id.clone()));
            }
        }
        Ok(())
    }

    fn drop_orphan_contexts(&mut self) {
        let ids: HashSet<&str> = self.issues.iter().map(|i| i.id.as_str()).collect();
        let orphans: Vec<String> = self
            .contexts
            .keys()
            .filter(|k| !ids.contains(k.as_str()))
            .cloned()
            .collect();

        for id in orphans {
            warn!("Ignoring context for unknown issue '{}'", id);
            self.contexts.remove(&id);
        }
    }
}
