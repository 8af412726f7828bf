//! Continuous needs that decay over time and are restored by care

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::config::CreatureConfig;
use crate::core::types::{clamp_percent, sanitize_minutes, Minutes};
use crate::entity::personality::{Effect, PersonalityProfile};

/// The five care dimensions, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeedKind {
    Hunger,
    Energy,
    Fun,
    Cleanliness,
    Social,
}

impl NeedKind {
    pub const ALL: [NeedKind; 5] = [
        NeedKind::Hunger,
        NeedKind::Energy,
        NeedKind::Fun,
        NeedKind::Cleanliness,
        NeedKind::Social,
    ];

    pub fn key(self) -> &'static str {
        match self {
            NeedKind::Hunger => "hunger",
            NeedKind::Energy => "energy",
            NeedKind::Fun => "fun",
            NeedKind::Cleanliness => "cleanliness",
            NeedKind::Social => "social",
        }
    }
}

/// Need values, each in [0, 100] where 100 is fully satisfied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedsState {
    pub hunger: f64,
    pub energy: f64,
    pub fun: f64,
    pub cleanliness: f64,
    pub social: f64,
}

impl Default for NeedsState {
    fn default() -> Self {
        Self {
            hunger: 100.0,
            energy: 100.0,
            fun: 100.0,
            cleanliness: 100.0,
            social: 100.0,
        }
    }
}

impl NeedsState {
    /// Build a state from raw values, clamping each into range
    pub fn new(hunger: f64, energy: f64, fun: f64, cleanliness: f64, social: f64) -> Self {
        Self {
            hunger: clamp_percent(hunger),
            energy: clamp_percent(energy),
            fun: clamp_percent(fun),
            cleanliness: clamp_percent(cleanliness),
            social: clamp_percent(social),
        }
    }

    pub fn get(&self, need: NeedKind) -> f64 {
        match need {
            NeedKind::Hunger => self.hunger,
            NeedKind::Energy => self.energy,
            NeedKind::Fun => self.fun,
            NeedKind::Cleanliness => self.cleanliness,
            NeedKind::Social => self.social,
        }
    }

    pub fn set(&mut self, need: NeedKind, value: f64) {
        let value = clamp_percent(value);
        match need {
            NeedKind::Hunger => self.hunger = value,
            NeedKind::Energy => self.energy = value,
            NeedKind::Fun => self.fun = value,
            NeedKind::Cleanliness => self.cleanliness = value,
            NeedKind::Social => self.social = value,
        }
    }
}

/// Player-issued care actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Feed,
    Play,
    Clean,
    Pet,
    Sleep,
    Talk,
    Treat,
    Swim,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 8] = [
        InteractionKind::Feed,
        InteractionKind::Play,
        InteractionKind::Clean,
        InteractionKind::Pet,
        InteractionKind::Sleep,
        InteractionKind::Talk,
        InteractionKind::Treat,
        InteractionKind::Swim,
    ];

    /// Nominal per-need deltas; the applied amounts may be smaller near the bounds
    pub fn deltas(self) -> &'static [(NeedKind, f64)] {
        match self {
            InteractionKind::Feed => &[(NeedKind::Hunger, 30.0), (NeedKind::Cleanliness, -5.0)],
            InteractionKind::Play => &[
                (NeedKind::Fun, 25.0),
                (NeedKind::Energy, -10.0),
                (NeedKind::Hunger, -5.0),
            ],
            InteractionKind::Clean => &[(NeedKind::Cleanliness, 40.0), (NeedKind::Fun, -5.0)],
            InteractionKind::Pet => &[(NeedKind::Social, 20.0), (NeedKind::Fun, 5.0)],
            InteractionKind::Sleep => &[(NeedKind::Energy, 25.0), (NeedKind::Hunger, -3.0)],
            InteractionKind::Talk => &[(NeedKind::Social, 15.0), (NeedKind::Fun, 3.0)],
            InteractionKind::Treat => &[(NeedKind::Hunger, 10.0), (NeedKind::Fun, 10.0)],
            InteractionKind::Swim => &[
                (NeedKind::Cleanliness, 15.0),
                (NeedKind::Fun, 15.0),
                (NeedKind::Energy, -8.0),
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InteractionKind::Feed => "feed",
            InteractionKind::Play => "play",
            InteractionKind::Clean => "clean",
            InteractionKind::Pet => "pet",
            InteractionKind::Sleep => "sleep",
            InteractionKind::Talk => "talk",
            InteractionKind::Treat => "treat",
            InteractionKind::Swim => "swim",
        }
    }
}

impl FromStr for InteractionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        InteractionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or(())
    }
}

/// The need changes that actually happened, after clamping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedDeltas {
    entries: Vec<(NeedKind, f64)>,
}

impl AppliedDeltas {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, need: NeedKind) -> Option<f64> {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == need)
            .map(|(_, delta)| *delta)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NeedKind, f64)> {
        self.entries.iter()
    }

    fn push(&mut self, need: NeedKind, delta: f64) {
        match self.entries.iter_mut().find(|(kind, _)| *kind == need) {
            Some(entry) => entry.1 += delta,
            None => self.entries.push((need, delta)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Below the critical threshold
    Critical,
    /// Below the low threshold
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgentNeed {
    pub need: NeedKind,
    pub value: f64,
    pub urgency: Urgency,
}

/// Owns the need values and applies decay and care to them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeedsTracker {
    state: NeedsState,
}

impl NeedsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: NeedsState) -> Self {
        // Route through the clamping constructor
        Self {
            state: NeedsState::new(
                state.hunger,
                state.energy,
                state.fun,
                state.cleanliness,
                state.social,
            ),
        }
    }

    pub fn state(&self) -> &NeedsState {
        &self.state
    }

    pub fn get(&self, need: NeedKind) -> f64 {
        self.state.get(need)
    }

    pub fn set(&mut self, need: NeedKind, value: f64) {
        self.state.set(need, value);
    }

    /// Per-minute decay rate for a need under the given personality
    pub fn decay_rate(
        need: NeedKind,
        personality: &PersonalityProfile,
        config: &CreatureConfig,
    ) -> f64 {
        let (base, modifier) = match need {
            NeedKind::Hunger => (config.hunger_decay_rate, 1.0),
            NeedKind::Energy => (
                config.energy_decay_rate,
                1.0 + personality.get_effect(Effect::EnergyDecay),
            ),
            NeedKind::Fun => (config.fun_decay_rate, 1.0),
            NeedKind::Cleanliness => (
                config.cleanliness_decay_rate,
                1.0 + personality.get_effect(Effect::CleanlinessDecay),
            ),
            NeedKind::Social => (
                config.social_decay_rate,
                1.0 + personality.get_effect(Effect::SocialDecay),
            ),
        };
        base * modifier.max(config.min_decay_modifier)
    }

    /// Decay every need by `rate * delta_minutes`, then clamp
    ///
    /// Decay is purely subtractive with a floor at zero, so splitting an
    /// interval into several calls lands on the same values as one call.
    pub fn update(
        &mut self,
        delta_minutes: Minutes,
        personality: &PersonalityProfile,
        config: &CreatureConfig,
    ) {
        let delta = sanitize_minutes(delta_minutes);
        if delta == 0.0 {
            return;
        }
        for need in NeedKind::ALL {
            let rate = Self::decay_rate(need, personality, config);
            let value = self.state.get(need) - rate * delta;
            self.state.set(need, value);
        }
    }

    /// Need values `elapsed` minutes from now if nothing else happens
    ///
    /// Closed form of `update`; the tracker itself is left untouched.
    pub fn projected(
        &self,
        elapsed: Minutes,
        personality: &PersonalityProfile,
        config: &CreatureConfig,
    ) -> NeedsState {
        let mut ahead = self.clone();
        ahead.update(elapsed, personality, config);
        ahead.state
    }

    /// Apply an interaction's table of deltas and report what actually changed
    pub fn apply_interaction(&mut self, kind: InteractionKind) -> AppliedDeltas {
        self.apply_deltas(kind.deltas())
    }

    /// Apply arbitrary need deltas with the same clamping contract
    pub fn apply_deltas(&mut self, deltas: &[(NeedKind, f64)]) -> AppliedDeltas {
        let mut applied = AppliedDeltas::empty();
        for &(need, requested) in deltas {
            let before = self.state.get(need);
            self.state.set(need, before + requested);
            applied.push(need, self.state.get(need) - before);
        }
        applied
    }

    /// Lowest critical need, else lowest low need, else None
    pub fn urgent_need(&self, config: &CreatureConfig) -> Option<UrgentNeed> {
        self.lowest_below(config.critical_need_threshold)
            .map(|(need, value)| UrgentNeed {
                need,
                value,
                urgency: Urgency::Critical,
            })
            .or_else(|| {
                self.lowest_below(config.low_need_threshold)
                    .map(|(need, value)| UrgentNeed {
                        need,
                        value,
                        urgency: Urgency::Low,
                    })
            })
    }

    fn lowest_below(&self, threshold: f64) -> Option<(NeedKind, f64)> {
        let mut lowest: Option<(NeedKind, f64)> = None;
        for need in NeedKind::ALL {
            let value = self.state.get(need);
            if value >= threshold {
                continue;
            }
            // Strict comparison keeps the earlier need on ties
            if lowest.map_or(true, |(_, best)| value < best) {
                lowest = Some((need, value));
            }
        }
        lowest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::personality::TraitAxis;

    fn tracker(hunger: f64, energy: f64, fun: f64, cleanliness: f64, social: f64) -> NeedsTracker {
        NeedsTracker::from_state(NeedsState::new(hunger, energy, fun, cleanliness, social))
    }

    #[test]
    fn test_decay_with_neutral_personality() {
        let config = CreatureConfig::default();
        let mut needs = NeedsTracker::new();
        needs.update(100.0, &PersonalityProfile::new(), &config);

        assert!((needs.get(NeedKind::Hunger) - 92.0).abs() < 1e-9);
        assert!((needs.get(NeedKind::Energy) - 95.0).abs() < 1e-9);
        assert!((needs.get(NeedKind::Fun) - 94.0).abs() < 1e-9);
        assert!((needs.get(NeedKind::Cleanliness) - 97.0).abs() < 1e-9);
        assert!((needs.get(NeedKind::Social) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let config = CreatureConfig::default();
        let mut needs = NeedsTracker::new();
        needs.update(1_000_000.0, &PersonalityProfile::new(), &config);
        for need in NeedKind::ALL {
            assert_eq!(needs.get(need), 0.0);
        }
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let config = CreatureConfig::default();
        let mut needs = tracker(50.0, 50.0, 50.0, 50.0, 50.0);
        needs.update(-500.0, &PersonalityProfile::new(), &config);
        assert_eq!(needs.get(NeedKind::Hunger), 50.0);
    }

    #[test]
    fn test_personality_modifies_decay() {
        let config = CreatureConfig::default();
        let mut energetic = PersonalityProfile::new();
        energetic.set_trait(TraitAxis::Activity, 100);
        let mut tidy = PersonalityProfile::new();
        tidy.set_trait(TraitAxis::Tidiness, 100);
        let neutral = PersonalityProfile::new();

        let neutral_energy = NeedsTracker::decay_rate(NeedKind::Energy, &neutral, &config);
        let fast_energy = NeedsTracker::decay_rate(NeedKind::Energy, &energetic, &config);
        assert!((fast_energy - neutral_energy * 1.5).abs() < 1e-12);

        let neutral_clean = NeedsTracker::decay_rate(NeedKind::Cleanliness, &neutral, &config);
        let tidy_clean = NeedsTracker::decay_rate(NeedKind::Cleanliness, &tidy, &config);
        assert!(tidy_clean < neutral_clean);
    }

    #[test]
    fn test_split_update_matches_single_update() {
        let config = CreatureConfig::default();
        let mut personality = PersonalityProfile::new();
        personality.set_trait(TraitAxis::Sociability, -70);

        let mut split = tracker(80.0, 60.0, 40.0, 20.0, 10.0);
        let mut single = split.clone();

        split.update(37.5, &personality, &config);
        split.update(412.25, &personality, &config);
        single.update(449.75, &personality, &config);

        for need in NeedKind::ALL {
            assert!((split.get(need) - single.get(need)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_projection_leaves_tracker_untouched() {
        let config = CreatureConfig::default();
        let personality = PersonalityProfile::new();
        let tracker = NeedsTracker::new();

        let ahead = tracker.projected(100.0, &personality, &config);
        assert!((ahead.hunger - 92.0).abs() < 1e-9);
        assert_eq!(tracker.get(NeedKind::Hunger), 100.0);
    }

    #[test]
    fn test_feed_near_full_reports_clamped_delta() {
        let mut needs = tracker(95.0, 100.0, 100.0, 100.0, 100.0);
        let applied = needs.apply_interaction(InteractionKind::Feed);
        assert_eq!(needs.get(NeedKind::Hunger), 100.0);
        assert_eq!(applied.get(NeedKind::Hunger), Some(5.0));
        assert_eq!(applied.get(NeedKind::Cleanliness), Some(-5.0));
    }

    #[test]
    fn test_sleep_scenario() {
        let mut needs = tracker(80.0, 100.0, 70.0, 100.0, 60.0);
        let applied = needs.apply_interaction(InteractionKind::Sleep);
        assert_eq!(needs.get(NeedKind::Hunger), 77.0);
        assert_eq!(needs.get(NeedKind::Energy), 100.0);
        assert_eq!(applied.get(NeedKind::Energy), Some(0.0));
        assert_eq!(applied.get(NeedKind::Hunger), Some(-3.0));
    }

    #[test]
    fn test_interaction_parsing() {
        assert_eq!("feed".parse::<InteractionKind>(), Ok(InteractionKind::Feed));
        assert_eq!(" Sleep ".parse::<InteractionKind>(), Ok(InteractionKind::Sleep));
        assert!("juggle".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn test_urgent_need_none_when_all_ok() {
        let config = CreatureConfig::default();
        let needs = tracker(40.0, 40.0, 99.0, 40.0, 41.0);
        assert_eq!(needs.urgent_need(&config), None);
    }

    #[test]
    fn test_urgent_need_prefers_critical() {
        let config = CreatureConfig::default();
        let needs = tracker(15.0, 30.0, 5.0, 90.0, 90.0);
        let urgent = needs.urgent_need(&config).unwrap();
        assert_eq!(urgent.need, NeedKind::Fun);
        assert_eq!(urgent.urgency, Urgency::Critical);
    }

    #[test]
    fn test_urgent_need_low_tier_and_ties() {
        let config = CreatureConfig::default();
        let needs = tracker(90.0, 35.0, 90.0, 35.0, 90.0);
        let urgent = needs.urgent_need(&config).unwrap();
        // Energy and cleanliness tie; energy comes first in enumeration order
        assert_eq!(urgent.need, NeedKind::Energy);
        assert_eq!(urgent.urgency, Urgency::Low);
    }
}
