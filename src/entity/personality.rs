//! Personality: five bipolar trait axes and their weighted effects
//!
//! Every axis is an integer in [-100, 100]. Negative values lean toward the
//! axis' low name ("lazy"), positive values toward its high name ("energetic").
//! Each axis contributes `(value / 100) * weight` to any effect its row in the
//! effect table defines; other subsystems read those sums as additive modifiers.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TRAIT_MIN: i32 = -100;
pub const TRAIT_MAX: i32 = 100;

/// Traits weaker than this are left out of the summary phrase
const SUMMARY_THRESHOLD: i32 = 20;

/// A bipolar personality axis
///
/// Declaration order is the tie-break order for `dominant_traits`. It is
/// deterministic but otherwise arbitrary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TraitAxis {
    Curiosity,
    Sociability,
    Activity,
    Tidiness,
    Temperament,
}

pub const AXIS_COUNT: usize = 5;

impl TraitAxis {
    pub const ALL: [TraitAxis; AXIS_COUNT] = [
        TraitAxis::Curiosity,
        TraitAxis::Sociability,
        TraitAxis::Activity,
        TraitAxis::Tidiness,
        TraitAxis::Temperament,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase key used in snapshots
    pub fn key(self) -> &'static str {
        match self {
            TraitAxis::Curiosity => "curiosity",
            TraitAxis::Sociability => "sociability",
            TraitAxis::Activity => "activity",
            TraitAxis::Tidiness => "tidiness",
            TraitAxis::Temperament => "temperament",
        }
    }

    pub fn low_name(self) -> &'static str {
        match self {
            TraitAxis::Curiosity => "cautious",
            TraitAxis::Sociability => "shy",
            TraitAxis::Activity => "lazy",
            TraitAxis::Tidiness => "messy",
            TraitAxis::Temperament => "calm",
        }
    }

    pub fn high_name(self) -> &'static str {
        match self {
            TraitAxis::Curiosity => "curious",
            TraitAxis::Sociability => "friendly",
            TraitAxis::Activity => "energetic",
            TraitAxis::Tidiness => "tidy",
            TraitAxis::Temperament => "excitable",
        }
    }
}

/// Named effects a personality can modulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Multiplier offset on energy decay
    EnergyDecay,
    /// Multiplier offset on social decay
    SocialDecay,
    /// Multiplier offset on cleanliness decay
    CleanlinessDecay,
    Exploration,
    Playfulness,
    Restfulness,
    Appetite,
    Affection,
    Grooming,
    Swimming,
    Learning,
    Wandering,
}

pub const EFFECT_COUNT: usize = 12;

impl Effect {
    pub const ALL: [Effect; EFFECT_COUNT] = [
        Effect::EnergyDecay,
        Effect::SocialDecay,
        Effect::CleanlinessDecay,
        Effect::Exploration,
        Effect::Playfulness,
        Effect::Restfulness,
        Effect::Appetite,
        Effect::Affection,
        Effect::Grooming,
        Effect::Swimming,
        Effect::Learning,
        Effect::Wandering,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Sparse declaration of the effect weights: (axis, effect, weight)
const EFFECT_ENTRIES: &[(TraitAxis, Effect, f64)] = &[
    (TraitAxis::Curiosity, Effect::Exploration, 0.4),
    (TraitAxis::Curiosity, Effect::Learning, 0.3),
    (TraitAxis::Curiosity, Effect::Wandering, 0.2),
    (TraitAxis::Curiosity, Effect::Swimming, 0.1),
    (TraitAxis::Curiosity, Effect::Restfulness, -0.1),
    (TraitAxis::Sociability, Effect::SocialDecay, 0.5),
    (TraitAxis::Sociability, Effect::Affection, 0.4),
    (TraitAxis::Sociability, Effect::Playfulness, 0.1),
    (TraitAxis::Activity, Effect::EnergyDecay, 0.5),
    (TraitAxis::Activity, Effect::Playfulness, 0.3),
    (TraitAxis::Activity, Effect::Swimming, 0.2),
    (TraitAxis::Activity, Effect::Exploration, 0.1),
    (TraitAxis::Activity, Effect::Wandering, 0.1),
    (TraitAxis::Activity, Effect::Restfulness, -0.3),
    // Tidy ducks get dirty more slowly, so the decay weight is negative
    (TraitAxis::Tidiness, Effect::CleanlinessDecay, -0.5),
    (TraitAxis::Tidiness, Effect::Grooming, 0.4),
    (TraitAxis::Tidiness, Effect::Swimming, 0.1),
    (TraitAxis::Temperament, Effect::Playfulness, 0.2),
    (TraitAxis::Temperament, Effect::Appetite, 0.1),
    (TraitAxis::Temperament, Effect::Wandering, 0.1),
    (TraitAxis::Temperament, Effect::Restfulness, -0.2),
];

const fn build_effect_table() -> [[f64; EFFECT_COUNT]; AXIS_COUNT] {
    let mut table = [[0.0; EFFECT_COUNT]; AXIS_COUNT];
    let mut i = 0;
    while i < EFFECT_ENTRIES.len() {
        let (axis, effect, weight) = EFFECT_ENTRIES[i];
        table[axis as usize][effect as usize] = weight;
        i += 1;
    }
    table
}

/// Flat effect table indexed by `[axis][effect]`, resolved at compile time
pub static EFFECT_TABLE: [[f64; EFFECT_COUNT]; AXIS_COUNT] = build_effect_table();

/// A creature's personality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalityProfile {
    values: [i32; AXIS_COUNT],
}

impl PersonalityProfile {
    /// A perfectly neutral personality (all axes at 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Birth personality with a random bias in [-range, range] on every axis
    pub fn randomized<R: Rng>(rng: &mut R, range: i32) -> Self {
        let range = range.clamp(0, TRAIT_MAX);
        let mut profile = Self::new();
        for axis in TraitAxis::ALL {
            profile.set_trait(axis, rng.gen_range(-range..=range));
        }
        profile
    }

    pub fn get(&self, axis: TraitAxis) -> i32 {
        self.values[axis.index()]
    }

    pub fn set_trait(&mut self, axis: TraitAxis, value: i32) {
        self.values[axis.index()] = value.clamp(TRAIT_MIN, TRAIT_MAX);
    }

    pub fn adjust_trait(&mut self, axis: TraitAxis, delta: i32) {
        let value = self.get(axis).saturating_add(delta);
        self.set_trait(axis, value);
    }

    /// Sum of every axis' weighted contribution to `effect`
    pub fn get_effect(&self, effect: Effect) -> f64 {
        TraitAxis::ALL
            .iter()
            .map(|axis| {
                let weight = EFFECT_TABLE[axis.index()][effect.index()];
                (self.get(*axis) as f64 / 100.0) * weight
            })
            .sum()
    }

    /// Axes sorted by magnitude, strongest first; ties keep declaration order
    pub fn dominant_traits(&self, n: usize) -> Vec<(TraitAxis, i32)> {
        let mut axes: Vec<(TraitAxis, i32)> =
            TraitAxis::ALL.iter().map(|a| (*a, self.get(*a))).collect();
        // sort_by is stable, so equal magnitudes stay in declaration order
        axes.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()));
        axes.truncate(n);
        axes
    }

    /// The pole name this axis currently leans toward
    pub fn label(&self, axis: TraitAxis) -> &'static str {
        if self.get(axis) < 0 {
            axis.low_name()
        } else {
            axis.high_name()
        }
    }

    pub fn is_extreme(&self, axis: TraitAxis, threshold: i32) -> bool {
        self.get(axis) >= threshold
    }

    /// Short phrase describing the two strongest traits, e.g. "very curious and lazy"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .dominant_traits(2)
            .into_iter()
            .filter(|(_, value)| value.abs() > SUMMARY_THRESHOLD)
            .map(|(axis, value)| {
                let intensity = match value.abs() {
                    71..=100 => "very ",
                    41..=70 => "",
                    _ => "somewhat ",
                };
                format!("{}{}", intensity, self.label(axis))
            })
            .collect();

        if parts.is_empty() {
            "well-balanced".to_string()
        } else {
            parts.join(" and ")
        }
    }
}
