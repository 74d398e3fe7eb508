pub mod agent;
pub mod human;
pub mod rollout;
pub mod terminal;

pub use agent::AgentMode;
pub use human::HumanMode;
pub use rollout::{RolloutMode, RolloutSummary};
