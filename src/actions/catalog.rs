//! Autonomous action definitions and catalog
//!
//! Every action is described declaratively by an `ActionDescriptor`; the
//! selector runs one generic scorer over those descriptors. Adding an action
//! means adding a variant and a descriptor, never new branching logic.

use serde::{Deserialize, Serialize};

use crate::entity::needs::NeedKind;
use crate::entity::personality::Effect;
use crate::simulation::context::Structure;

/// Unique action identifier
///
/// Declaration order is the tie-break priority: earlier variants win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionId {
    Nap,
    Forage,
    Preen,
    Socialize,
    Play,
    Swim,
    Explore,
    PracticeTrick,
    Wander,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Survival,
    Care,
    Social,
    Leisure,
    Learning,
    Idle,
}

/// Mood capability an action depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    None,
    Play,
    Learn,
}

/// Declarative description of an autonomous action
#[derive(Debug, Clone, Copy)]
pub struct ActionDescriptor {
    pub base_score: f64,
    /// Need whose deficit makes this action more attractive
    pub need: Option<NeedKind>,
    /// Bonus at a fully depleted need (scales linearly with the deficit)
    pub need_sensitivity: f64,
    pub effect: Effect,
    pub requires: Capability,
    pub structure: Option<Structure>,
    /// Outdoor actions are skipped during storms unless the duck is indoors
    pub outdoor: bool,
    pub duration_minutes: u32,
    pub side_effects: &'static [(NeedKind, f64)],
}

impl ActionId {
    /// All actions in priority order
    pub const ALL: [ActionId; 9] = [
        ActionId::Nap,
        ActionId::Forage,
        ActionId::Preen,
        ActionId::Socialize,
        ActionId::Play,
        ActionId::Swim,
        ActionId::Explore,
        ActionId::PracticeTrick,
        ActionId::Wander,
    ];

    pub fn descriptor(self) -> ActionDescriptor {
        match self {
            ActionId::Nap => ActionDescriptor {
                base_score: 0.1,
                need: Some(NeedKind::Energy),
                need_sensitivity: 1.2,
                effect: Effect::Restfulness,
                requires: Capability::None,
                structure: None,
                outdoor: false,
                duration_minutes: 45,
                side_effects: &[(NeedKind::Energy, 15.0)],
            },
            ActionId::Forage => ActionDescriptor {
                base_score: 0.1,
                need: Some(NeedKind::Hunger),
                need_sensitivity: 1.2,
                effect: Effect::Appetite,
                requires: Capability::None,
                structure: None,
                outdoor: true,
                duration_minutes: 20,
                side_effects: &[(NeedKind::Hunger, 10.0), (NeedKind::Cleanliness, -3.0)],
            },
            ActionId::Preen => ActionDescriptor {
                base_score: 0.15,
                need: Some(NeedKind::Cleanliness),
                need_sensitivity: 1.0,
                effect: Effect::Grooming,
                requires: Capability::None,
                structure: None,
                outdoor: false,
                duration_minutes: 10,
                side_effects: &[(NeedKind::Cleanliness, 8.0)],
            },
            ActionId::Socialize => ActionDescriptor {
                base_score: 0.15,
                need: Some(NeedKind::Social),
                need_sensitivity: 1.0,
                effect: Effect::Affection,
                requires: Capability::None,
                structure: None,
                outdoor: false,
                duration_minutes: 15,
                side_effects: &[(NeedKind::Social, 8.0)],
            },
            ActionId::Play => ActionDescriptor {
                base_score: 0.2,
                need: Some(NeedKind::Fun),
                need_sensitivity: 1.0,
                effect: Effect::Playfulness,
                requires: Capability::Play,
                structure: None,
                outdoor: false,
                duration_minutes: 20,
                side_effects: &[(NeedKind::Fun, 10.0), (NeedKind::Energy, -4.0)],
            },
            ActionId::Swim => ActionDescriptor {
                base_score: 0.2,
                need: Some(NeedKind::Cleanliness),
                need_sensitivity: 0.6,
                effect: Effect::Swimming,
                requires: Capability::Play,
                structure: Some(Structure::Pond),
                outdoor: true,
                duration_minutes: 30,
                side_effects: &[
                    (NeedKind::Cleanliness, 10.0),
                    (NeedKind::Fun, 8.0),
                    (NeedKind::Energy, -5.0),
                ],
            },
            ActionId::Explore => ActionDescriptor {
                base_score: 0.2,
                need: Some(NeedKind::Fun),
                need_sensitivity: 0.5,
                effect: Effect::Exploration,
                requires: Capability::None,
                structure: None,
                outdoor: true,
                duration_minutes: 25,
                side_effects: &[(NeedKind::Fun, 6.0), (NeedKind::Energy, -3.0)],
            },
            ActionId::PracticeTrick => ActionDescriptor {
                base_score: 0.15,
                need: None,
                need_sensitivity: 0.0,
                effect: Effect::Learning,
                requires: Capability::Learn,
                structure: None,
                outdoor: false,
                duration_minutes: 15,
                side_effects: &[(NeedKind::Fun, 3.0), (NeedKind::Energy, -2.0)],
            },
            ActionId::Wander => ActionDescriptor {
                base_score: 0.15,
                need: None,
                need_sensitivity: 0.0,
                effect: Effect::Wandering,
                requires: Capability::None,
                structure: None,
                outdoor: false,
                duration_minutes: 10,
                side_effects: &[],
            },
        }
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            ActionId::Nap | ActionId::Forage => ActionCategory::Survival,
            ActionId::Preen => ActionCategory::Care,
            ActionId::Socialize => ActionCategory::Social,
            ActionId::Play | ActionId::Swim | ActionId::Explore => ActionCategory::Leisure,
            ActionId::PracticeTrick => ActionCategory::Learning,
            ActionId::Wander => ActionCategory::Idle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionId::Nap => "nap",
            ActionId::Forage => "forage",
            ActionId::Preen => "preen",
            ActionId::Socialize => "socialize",
            ActionId::Play => "play",
            ActionId::Swim => "swim",
            ActionId::Explore => "explore",
            ActionId::PracticeTrick => "practice_trick",
            ActionId::Wander => "wander",
        }
    }
}
