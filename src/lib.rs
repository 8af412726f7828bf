//! Duck Life - simulation core for a virtual pet duck
//!
//! Needs decay continuously, mood is classified from the needs, a seeded
//! personality modulates almost everything, growth only ever moves forward,
//! and the duck picks its own activities when nobody is playing with it.

pub mod actions;
pub mod core;
pub mod creature;
pub mod entity;
pub mod persistence;
pub mod simulation;

pub use crate::core::config::CreatureConfig;
pub use crate::core::error::{DuckError, Result};
pub use creature::{Creature, CreatureSummary, SharedCreature};
pub use persistence::CreatureSnapshot;
