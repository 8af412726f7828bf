pub mod growth;
pub mod mood;
pub mod needs;
pub mod personality;

pub use growth::{GrowthStage, GrowthStageMachine, LifeEvent, LifeEventKind, StageTransition};
pub use mood::{MoodEvaluator, MoodSnapshot, MoodTier, MoodTrend};
pub use needs::{AppliedDeltas, InteractionKind, NeedKind, NeedsState, NeedsTracker, UrgentNeed, Urgency};
pub use personality::{Effect, PersonalityProfile, TraitAxis};
