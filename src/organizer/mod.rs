//! Wave organization: file-overlap clustering, dependency ordering,
//! budget-aware splitting and specialist agent inference.

mod agent;
mod cluster;
mod similarity;
mod types;
mod waves;

pub use agent::infer_agent;
pub use similarity::{jaccard, OverlapMatrix};
pub use types::{AgentAssignment, AgentType, Wave};
pub use waves::WaveOrganizer;
