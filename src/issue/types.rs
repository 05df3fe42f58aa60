use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work fetched from the project tracker.
///
/// `parent` and `children` hold issue ids, never embedded issues: the planning
/// run treats the issue list as an arena indexed by id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Issue {
    /// Tracker-internal id (key of the context map)
    pub id: String,

    /// Human identifier, e.g. "ENG-142"
    pub identifier: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub labels: Vec<Label>,

    /// Id of the parent issue, if any
    #[serde(default)]
    pub parent: Option<String>,

    /// Ids of child issues
    #[serde(default)]
    pub children: Vec<String>,

    /// Story points
    #[serde(default)]
    pub estimate: Option<f64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Minimal issue, mostly useful for callers building issues in code
    pub fn new(
        id: impl Into<String>,
        identifier: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            identifier: identifier.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            labels: Vec::new(),
            parent: None,
            children: Vec::new(),
            estimate: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|name| Label::new(*name)).collect();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_estimate(mut self, points: f64) -> Self {
        self.estimate = Some(points);
        self
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.name.as_str())
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Lowercased title + description + label names, the text every matcher scans
    pub fn haystack(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for name in self.label_names() {
            text.push(' ');
            text.push_str(name);
        }
        text.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    P0Critical,
    P1High,
    #[default]
    P2Medium,
    P3Low,
}

impl Priority {
    /// Sort rank, P0 first
    pub fn rank(self) -> u8 {
        match self {
            Priority::P0Critical => 0,
            Priority::P1High => 1,
            Priority::P2Medium => 2,
            Priority::P3Low => 3,
        }
    }

    pub fn is_urgent(self) -> bool {
        self == Priority::P0Critical
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P0Critical => "P0-Critical",
            Priority::P1High => "P1-High",
            Priority::P2Medium => "P2-Medium",
            Priority::P3Low => "P3-Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p0" | "p0-critical" | "urgent" | "critical" => Ok(Priority::P0Critical),
            "p1" | "p1-high" | "high" => Ok(Priority::P1High),
            "p2" | "p2-medium" | "medium" => Ok(Priority::P2Medium),
            "p3" | "p3-low" | "low" => Ok(Priority::P3Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

// Unknown tracker priorities fall back to the neutral P2-Medium
impl From<String> for Priority {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}
