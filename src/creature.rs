//! The creature aggregate - one duck with everything it owns
//!
//! `Creature` is the composition root: it owns a personality, needs tracker,
//! mood evaluator, growth machine, behavior selector and a seeded RNG, and it
//! is the unit that gets serialized. Hosts drive it with `update` and
//! `interact`; everything else is a read.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

use crate::core::config::CreatureConfig;
use crate::core::types::{sanitize_minutes, CreatureId, Minutes, MINUTES_PER_DAY};
use crate::entity::growth::{age_string, GrowthStage, GrowthStageMachine, StageTransition};
use crate::entity::mood::{calculate_score, MoodEvaluator, MoodSnapshot, MoodTier};
use crate::entity::needs::{AppliedDeltas, InteractionKind, NeedKind, NeedsState, NeedsTracker, UrgentNeed};
use crate::entity::personality::{PersonalityProfile, TraitAxis};
use crate::simulation::action_select::{BehaviorDecision, BehaviorSelector, SelectionContext};
use crate::simulation::context::EnvironmentContext;

/// A creature shared across threads; reads and mutators go through one lock
pub type SharedCreature = Arc<Mutex<Creature>>;

/// Read-only view for presentation and dialogue layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSummary {
    pub name: String,
    pub stage: String,
    pub age: String,
    pub mood: MoodTier,
    pub mood_description: String,
    pub personality: String,
    pub urgent_need: Option<NeedKind>,
}

#[derive(Debug, Clone)]
pub struct Creature {
    pub(crate) id: CreatureId,
    pub(crate) name: String,
    pub(crate) seed: u64,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) config: CreatureConfig,
    pub(crate) personality: PersonalityProfile,
    pub(crate) needs: NeedsTracker,
    pub(crate) mood: MoodEvaluator,
    pub(crate) growth: GrowthStageMachine,
    pub(crate) selector: BehaviorSelector,
    pub(crate) age_minutes: Minutes,
    /// Snapshot keys this version does not understand, written back untouched
    pub(crate) extra: Map<String, Value>,
}

impl Creature {
    /// Hatch a new duck now, with default tuning
    pub fn create_new(name: impl Into<String>, seed: u64) -> Self {
        Self::create_with(name, seed, Utc::now(), CreatureConfig::default())
    }

    /// Hatch a new duck at a given birth time and config
    ///
    /// The personality bias is drawn from the seeded RNG, so the same seed
    /// always hatches the same duck.
    pub fn create_with(
        name: impl Into<String>,
        seed: u64,
        birth_time: DateTime<Utc>,
        config: CreatureConfig,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let personality = PersonalityProfile::randomized(&mut rng, config.personality_bias_range);
        let name = name.into();
        tracing::info!("Hatched {} ({}) with seed {}", name, personality.summary(), seed);

        Self {
            id: CreatureId::new(),
            name,
            seed,
            rng,
            mood: MoodEvaluator::new(config.mood_history_len, config.trend_delta),
            selector: BehaviorSelector::new(&config),
            config,
            personality,
            needs: NeedsTracker::new(),
            growth: GrowthStageMachine::new(birth_time),
            age_minutes: 0.0,
            extra: Map::new(),
        }
    }

    /// Advance simulated time by `delta_minutes`
    ///
    /// Negative or non-finite deltas are ignored. Returns the stage change,
    /// if any; large offline gaps may jump several stages at once.
    pub fn update(&mut self, delta_minutes: Minutes) -> Option<StageTransition> {
        let delta = sanitize_minutes(delta_minutes);
        if delta == 0.0 {
            return None;
        }

        self.record_mood_samples(delta);
        self.needs.update(delta, &self.personality, &self.config);
        self.age_minutes += delta;

        let transition = self.growth.update_stage(self.age_days());
        if let Some(t) = transition {
            tracing::info!("{} grew from {:?} to {:?}", self.name, t.from, t.to);
        }

        tracing::debug!(
            "{} advanced {:.1} min (age {:.2} days)",
            self.name,
            delta,
            self.age_days()
        );
        transition
    }

    /// Apply an elapsed wall-clock gap, e.g. while the app was closed
    pub fn catch_up(&mut self, elapsed: Duration) -> Option<StageTransition> {
        let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
        self.update(minutes)
    }

    /// Apply a named interaction; unknown names are a silent no-op
    pub fn interact(&mut self, action: &str) -> AppliedDeltas {
        match action.parse::<InteractionKind>() {
            Ok(kind) => self.interact_with(kind),
            Err(()) => {
                tracing::debug!("Ignoring unknown interaction {:?}", action);
                AppliedDeltas::empty()
            }
        }
    }

    pub fn interact_with(&mut self, kind: InteractionKind) -> AppliedDeltas {
        let applied = self.needs.apply_interaction(kind);
        tracing::debug!("{} received {}: {:?}", self.name, kind.name(), applied);
        applied
    }

    pub fn mood(&self) -> MoodSnapshot {
        self.mood.evaluate(self.needs.state())
    }

    pub fn urgent_need(&self) -> Option<UrgentNeed> {
        self.needs.urgent_need(&self.config)
    }

    /// Ask the duck what it wants to do on its own
    ///
    /// Returns None until the idle interval has elapsed since the previous
    /// proposal. The decision is not applied; see `apply_decision`.
    pub fn select_autonomous_action(
        &mut self,
        environment: &EnvironmentContext,
    ) -> Option<BehaviorDecision> {
        let mood = self.mood();
        let ctx = SelectionContext {
            needs: self.needs.state(),
            personality: &self.personality,
            mood: &mood,
            stage: self.growth.stat_modifiers(&self.personality),
            environment,
        };
        self.selector.select(self.age_minutes, &ctx, &mut self.rng)
    }

    /// Apply a decision's immediate side effects to the needs
    pub fn apply_decision(&mut self, decision: &BehaviorDecision) -> AppliedDeltas {
        self.needs.apply_deltas(&decision.side_effects)
    }

    /// Check (and record) a birthday for the given calendar day
    pub fn check_birthday(&mut self, today: NaiveDate) -> Option<u32> {
        self.growth.check_birthday(today)
    }

    pub fn pause_growth(&mut self) {
        self.growth.pause();
    }

    /// Resume growth and immediately catch the stage up to the current age
    pub fn resume_growth(&mut self) -> Option<StageTransition> {
        self.growth.resume();
        self.growth.update_stage(self.age_days())
    }

    /// Personality drift event, clamped like any other trait change
    pub fn adjust_trait(&mut self, axis: TraitAxis, delta: i32) {
        let before = self.personality.get(axis);
        self.personality.adjust_trait(axis, delta);
        tracing::debug!(
            "{} personality drift on {:?}: {} -> {}",
            self.name,
            axis,
            before,
            self.personality.get(axis)
        );
    }

    pub fn summary(&self) -> CreatureSummary {
        let mood = self.mood();
        CreatureSummary {
            name: self.name.clone(),
            stage: self.growth.stage().display_name().to_string(),
            age: self.age_string(),
            mood: mood.tier,
            mood_description: mood.description,
            personality: self.personality.summary(),
            urgent_need: self.urgent_need().map(|u| u.need),
        }
    }

    pub fn id(&self) -> CreatureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &CreatureConfig {
        &self.config
    }

    pub fn personality(&self) -> &PersonalityProfile {
        &self.personality
    }

    pub fn personality_summary(&self) -> String {
        self.personality.summary()
    }

    pub fn dominant_traits(&self, n: usize) -> Vec<(TraitAxis, i32)> {
        self.personality.dominant_traits(n)
    }

    pub fn needs(&self) -> &NeedsState {
        self.needs.state()
    }

    pub fn growth(&self) -> &GrowthStageMachine {
        &self.growth
    }

    pub fn stage(&self) -> GrowthStage {
        self.growth.stage()
    }

    pub fn age_minutes(&self) -> Minutes {
        self.age_minutes
    }

    pub fn age_days(&self) -> f64 {
        self.age_minutes / MINUTES_PER_DAY
    }

    pub fn age_string(&self) -> String {
        age_string(self.age_days())
    }

    pub fn mood_history(&self) -> Vec<f64> {
        self.mood.history().collect()
    }

    /// Record a mood sample at every sampling boundary in the next `delta`
    /// minutes, using the needs projected to that boundary
    ///
    /// Only the newest samples that fit in the history are computed.
    fn record_mood_samples(&mut self, delta: Minutes) {
        let interval = self.config.mood_sample_minutes;
        if !interval.is_finite() || interval <= 0.0 {
            return;
        }
        let start = self.age_minutes;
        let end = start + delta;
        let last = (end / interval).floor();
        let first = ((start / interval).floor() + 1.0)
            .max(last + 1.0 - self.config.mood_history_len as f64);
        if first > last {
            return;
        }

        let count = (last - first) as u64 + 1;
        for i in 0..count {
            let boundary = (first + i as f64) * interval;
            let needs = self
                .needs
                .projected(boundary - start, &self.personality, &self.config);
            self.mood.record(calculate_score(&needs));
        }
    }
}
