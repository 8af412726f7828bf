pub mod action_select;
pub mod context;

pub use action_select::{BehaviorDecision, BehaviorSelector, ScoredAction, SelectionContext};
pub use context::{EnvironmentContext, Location, Structure, Weather};
