//! Issue arena and codebase context: the inputs every planning engine reads.

mod context;
mod input;
mod types;

pub use context::{CodebaseContext, Complexity, FileInfo};
pub use input::{ContextMap, PlanInput};
pub use types::{Issue, Label, Priority};

