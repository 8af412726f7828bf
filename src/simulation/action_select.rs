//! Utility-based action selection - how the duck entertains itself
//!
//! Each eligible action is scored as
//! `base + stage affinity + need bonus + personality effect + jitter`
//! and the best score wins. Eligibility is decided before scoring:
//! mood capabilities, reachable structures and the weather can rule an
//! action out entirely.

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::actions::catalog::{ActionCategory, ActionId, Capability};
use crate::core::config::CreatureConfig;
use crate::core::types::Minutes;
use crate::entity::growth::StageModifiers;
use crate::entity::mood::MoodSnapshot;
use crate::entity::needs::{NeedKind, NeedsState};
use crate::entity::personality::{PersonalityProfile, TraitAxis};
use crate::simulation::context::EnvironmentContext;

/// Context provided to the action selection algorithm
pub struct SelectionContext<'a> {
    pub needs: &'a NeedsState,
    pub personality: &'a PersonalityProfile,
    pub mood: &'a MoodSnapshot,
    pub stage: StageModifiers,
    pub environment: &'a EnvironmentContext,
}

/// A proposed autonomous action; callers apply the side effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorDecision {
    pub action: ActionId,
    pub score: f64,
    pub duration_minutes: u32,
    pub side_effects: Vec<(NeedKind, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredAction {
    pub action: ActionId,
    pub score: f64,
}

/// Per-creature selector; only remembers when it last proposed something
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorSelector {
    randomness_factor: f64,
    extreme_trait_threshold: i32,
    extreme_jitter_multiplier: f64,
    idle_interval: Minutes,
    last_proposal: Option<Minutes>,
}

impl BehaviorSelector {
    pub fn new(config: &CreatureConfig) -> Self {
        Self {
            randomness_factor: config.randomness_factor,
            extreme_trait_threshold: config.extreme_trait_threshold,
            extreme_jitter_multiplier: config.extreme_jitter_multiplier,
            idle_interval: config.idle_interval_minutes,
            last_proposal: None,
        }
    }

    pub fn with_last_proposal(mut self, last_proposal: Option<Minutes>) -> Self {
        self.last_proposal = last_proposal.filter(|m| m.is_finite());
        self
    }

    pub fn last_proposal(&self) -> Option<Minutes> {
        self.last_proposal
    }

    /// Whether the idle interval has elapsed since the last proposal
    pub fn is_ready(&self, now: Minutes) -> bool {
        match self.last_proposal {
            None => true,
            Some(last) => now - last >= self.idle_interval,
        }
    }

    /// Propose the best action, or None while still idling
    ///
    /// The RNG is only consumed when a proposal is actually evaluated.
    pub fn select<R: Rng>(
        &mut self,
        now: Minutes,
        ctx: &SelectionContext,
        rng: &mut R,
    ) -> Option<BehaviorDecision> {
        if !self.is_ready(now) {
            return None;
        }

        let scored = self.score_candidates(ctx, rng);
        let best = pick_best(&scored)?;
        self.last_proposal = Some(now);

        let descriptor = best.action.descriptor();
        tracing::debug!(
            "Selected {} (score {:.3}) from {} candidates",
            best.action.name(),
            best.score,
            scored.len()
        );

        Some(BehaviorDecision {
            action: best.action,
            score: best.score,
            duration_minutes: descriptor.duration_minutes,
            side_effects: descriptor.side_effects.to_vec(),
        })
    }

    /// Score every eligible action in priority order
    pub fn score_candidates<R: Rng>(&self, ctx: &SelectionContext, rng: &mut R) -> Vec<ScoredAction> {
        let jitter_scale = self.jitter_scale(ctx.personality);
        ActionId::ALL
            .into_iter()
            .filter(|action| is_eligible(*action, ctx))
            .map(|action| {
                let jitter = rng.gen_range(-1.0..=1.0) * jitter_scale;
                ScoredAction {
                    action,
                    score: utility(action, ctx) + jitter,
                }
            })
            .collect()
    }

    fn jitter_scale(&self, personality: &PersonalityProfile) -> f64 {
        if personality.is_extreme(TraitAxis::Temperament, self.extreme_trait_threshold) {
            self.randomness_factor * self.extreme_jitter_multiplier
        } else {
            self.randomness_factor
        }
    }
}

/// Whether an action may be considered at all in this context
pub fn is_eligible(action: ActionId, ctx: &SelectionContext) -> bool {
    let descriptor = action.descriptor();
    let capable = match descriptor.requires {
        Capability::None => true,
        Capability::Play => ctx.mood.can_play,
        Capability::Learn => ctx.mood.can_learn,
    };
    let reachable = descriptor
        .structure
        .map_or(true, |structure| ctx.environment.can_reach(structure));
    let weather_ok = !(descriptor.outdoor && ctx.environment.blocks_outdoor());
    capable && reachable && weather_ok
}

/// Deterministic part of the score (everything except jitter)
pub fn utility(action: ActionId, ctx: &SelectionContext) -> f64 {
    let descriptor = action.descriptor();
    let need_bonus = descriptor.need.map_or(0.0, |need| {
        descriptor.need_sensitivity * (100.0 - ctx.needs.get(need)) / 100.0
    });
    let stage_affinity = match action.category() {
        ActionCategory::Leisure => ctx.stage.play_affinity,
        ActionCategory::Learning => ctx.stage.learn_affinity,
        _ if action == ActionId::Nap => ctx.stage.rest_affinity,
        _ => 0.0,
    };
    descriptor.base_score
        + stage_affinity
        + need_bonus
        + ctx.personality.get_effect(descriptor.effect)
}

/// Highest score wins; ties go to the action declared first
pub fn pick_best(scored: &[ScoredAction]) -> Option<ScoredAction> {
    scored
        .iter()
        .copied()
        .min_by_key(|s| (Reverse(OrderedFloat(s.score)), s.action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::mood::MoodEvaluator;
    use crate::simulation::context::{Location, Structure, Weather};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn calm_config() -> CreatureConfig {
        CreatureConfig {
            randomness_factor: 0.0,
            ..CreatureConfig::default()
        }
    }

    fn decide(
        needs: NeedsState,
        personality: PersonalityProfile,
        environment: &EnvironmentContext,
        config: &CreatureConfig,
        seed: u64,
    ) -> Option<BehaviorDecision> {
        let mood = MoodEvaluator::default().evaluate(&needs);
        let ctx = SelectionContext {
            needs: &needs,
            personality: &personality,
            mood: &mood,
            stage: StageModifiers::default(),
            environment,
        };
        let mut selector = BehaviorSelector::new(config);
        selector.select(0.0, &ctx, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_exhausted_duck_naps() {
        let needs = NeedsState::new(90.0, 5.0, 80.0, 90.0, 90.0);
        let decision = decide(
            needs,
            PersonalityProfile::new(),
            &EnvironmentContext::default(),
            &calm_config(),
            1,
        )
        .unwrap();
        assert_eq!(decision.action, ActionId::Nap);
        assert_eq!(decision.duration_minutes, 45);
        assert_eq!(decision.side_effects, vec![(NeedKind::Energy, 15.0)]);
    }

    #[test]
    fn test_hungry_duck_forages() {
        let needs = NeedsState::new(5.0, 90.0, 80.0, 90.0, 90.0);
        let decision = decide(
            needs,
            PersonalityProfile::new(),
            &EnvironmentContext::default(),
            &calm_config(),
            1,
        )
        .unwrap();
        assert_eq!(decision.action, ActionId::Forage);
    }

    #[test]
    fn test_storm_rules_out_foraging() {
        let needs = NeedsState::new(5.0, 90.0, 80.0, 90.0, 90.0);
        let environment = EnvironmentContext::new(Weather::Stormy, Location::Garden);
        let decision = decide(needs, PersonalityProfile::new(), &environment, &calm_config(), 1)
            .unwrap();
        assert_ne!(decision.action, ActionId::Forage);
    }

    #[test]
    fn test_sad_duck_cannot_play_or_learn() {
        let needs = NeedsState::new(10.0, 10.0, 0.0, 10.0, 10.0);
        let mood = MoodEvaluator::default().evaluate(&needs);
        assert!(!mood.can_play && !mood.can_learn);

        let mut playful = PersonalityProfile::new();
        playful.set_trait(TraitAxis::Activity, 100);
        playful.set_trait(TraitAxis::Temperament, 100);
        let environment = EnvironmentContext::default().with_structure(Structure::Pond);
        let ctx = SelectionContext {
            needs: &needs,
            personality: &playful,
            mood: &mood,
            stage: StageModifiers::default(),
            environment: &environment,
        };
        let selector = BehaviorSelector::new(&CreatureConfig::default());
        let scored = selector.score_candidates(&ctx, &mut ChaCha8Rng::seed_from_u64(3));
        for s in &scored {
            assert!(
                !matches!(s.action, ActionId::Play | ActionId::Swim | ActionId::PracticeTrick),
                "{:?} should be excluded",
                s.action
            );
        }
    }

    #[test]
    fn test_swim_needs_a_pond() {
        let needs = NeedsState::new(90.0, 90.0, 90.0, 90.0, 90.0);
        let mood = MoodEvaluator::default().evaluate(&needs);
        let personality = PersonalityProfile::new();
        let indoors = EnvironmentContext::default();
        let ctx = SelectionContext {
            needs: &needs,
            personality: &personality,
            mood: &mood,
            stage: StageModifiers::default(),
            environment: &indoors,
        };
        assert!(!is_eligible(ActionId::Swim, &ctx));

        let with_pond = EnvironmentContext::default().with_structure(Structure::Pond);
        let ctx = SelectionContext {
            environment: &with_pond,
            ..ctx
        };
        assert!(is_eligible(ActionId::Swim, &ctx));
    }

    #[test]
    fn test_personality_shifts_choice() {
        let needs = NeedsState::new(100.0, 100.0, 100.0, 100.0, 100.0);
        let mut curious = PersonalityProfile::new();
        curious.set_trait(TraitAxis::Curiosity, 100);
        let decision = decide(
            needs,
            curious,
            &EnvironmentContext::default(),
            &calm_config(),
            1,
        )
        .unwrap();
        assert_eq!(decision.action, ActionId::Explore);
    }

    #[test]
    fn test_same_seed_same_decision() {
        let needs = NeedsState::new(60.0, 55.0, 50.0, 65.0, 45.0);
        let config = CreatureConfig {
            randomness_factor: 0.5,
            ..CreatureConfig::default()
        };
        let env = EnvironmentContext::default().with_structure(Structure::Pond);
        let a = decide(needs, PersonalityProfile::new(), &env, &config, 99);
        let b = decide(needs, PersonalityProfile::new(), &env, &config, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ties_go_to_priority_order() {
        let scored = [
            ScoredAction { action: ActionId::Wander, score: 0.5 },
            ScoredAction { action: ActionId::Preen, score: 0.5 },
            ScoredAction { action: ActionId::Play, score: 0.5 },
        ];
        assert_eq!(pick_best(&scored).unwrap().action, ActionId::Preen);
        assert_eq!(pick_best(&[]), None);
    }

    #[test]
    fn test_idle_interval_gates_proposals() {
        let needs = NeedsState::default();
        let mood = MoodEvaluator::default().evaluate(&needs);
        let personality = PersonalityProfile::new();
        let environment = EnvironmentContext::default();
        let ctx = SelectionContext {
            needs: &needs,
            personality: &personality,
            mood: &mood,
            stage: StageModifiers::default(),
            environment: &environment,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut selector = BehaviorSelector::new(&CreatureConfig::default());

        assert!(selector.select(100.0, &ctx, &mut rng).is_some());
        assert!(selector.select(110.0, &ctx, &mut rng).is_none());
        assert!(selector.select(115.0, &ctx, &mut rng).is_some());
        assert_eq!(selector.last_proposal(), Some(115.0));
    }

    #[test]
    fn test_excitable_duck_gets_more_jitter() {
        let selector = BehaviorSelector::new(&CreatureConfig::default());
        let mut excitable = PersonalityProfile::new();
        excitable.set_trait(TraitAxis::Temperament, 90);
        assert_eq!(selector.jitter_scale(&PersonalityProfile::new()), 0.1);
        assert_eq!(selector.jitter_scale(&excitable), 0.2);
    }
}
