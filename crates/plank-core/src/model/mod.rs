pub mod item;
pub mod priority;

pub use item::{AgentSession, AgentState, PrState, PullRequest, WorkItem};
pub use priority::{ParseEnumError, Priority};
