//! Mood classification derived from needs, plus a short score history
//!
//! The score is a fixed weighted average of the needs, so mood never carries
//! hidden state of its own. Only the rolling history (used for trends) is kept.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::entity::needs::NeedsState;

const HUNGER_WEIGHT: f64 = 0.25;
const ENERGY_WEIGHT: f64 = 0.25;
const FUN_WEIGHT: f64 = 0.20;
const CLEANLINESS_WEIGHT: f64 = 0.15;
const SOCIAL_WEIGHT: f64 = 0.15;

/// Samples needed before a trend is reported
const TREND_WINDOW: usize = 3;

/// Mood tiers, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoodTier {
    Ecstatic,
    Happy,
    Content,
    Grumpy,
    Sad,
    Miserable,
}

impl MoodTier {
    /// Inclusive lower bound of the tier's score range
    pub fn min_score(self) -> f64 {
        match self {
            MoodTier::Ecstatic => 90.0,
            MoodTier::Happy => 70.0,
            MoodTier::Content => 50.0,
            MoodTier::Grumpy => 30.0,
            MoodTier::Sad => 10.0,
            MoodTier::Miserable => f64::NEG_INFINITY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MoodTier::Ecstatic => "ecstatic",
            MoodTier::Happy => "happy",
            MoodTier::Content => "content",
            MoodTier::Grumpy => "grumpy",
            MoodTier::Sad => "sad",
            MoodTier::Miserable => "miserable",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MoodTier::Ecstatic => "Bursting with joy and quacking happily",
            MoodTier::Happy => "Cheerful and ready for anything",
            MoodTier::Content => "Doing fine, nothing to complain about",
            MoodTier::Grumpy => "A bit ruffled and not in the mood to learn",
            MoodTier::Sad => "Feeling down and needs some care",
            MoodTier::Miserable => "Deeply unhappy and neglected",
        }
    }

    pub fn can_play(self) -> bool {
        !matches!(self, MoodTier::Sad | MoodTier::Miserable)
    }

    pub fn can_learn(self) -> bool {
        matches!(self, MoodTier::Ecstatic | MoodTier::Happy | MoodTier::Content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodTrend {
    Improving,
    Stable,
    Declining,
}

/// Point-in-time view of the creature's mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSnapshot {
    pub tier: MoodTier,
    pub score: f64,
    pub description: String,
    pub can_play: bool,
    pub can_learn: bool,
    pub trend: MoodTrend,
}

/// Weighted need average, rounded to one decimal place
pub fn calculate_score(needs: &NeedsState) -> f64 {
    let raw = needs.hunger * HUNGER_WEIGHT
        + needs.energy * ENERGY_WEIGHT
        + needs.fun * FUN_WEIGHT
        + needs.cleanliness * CLEANLINESS_WEIGHT
        + needs.social * SOCIAL_WEIGHT;
    (raw * 10.0).round() / 10.0
}

/// Classify a score, evaluating tiers from the top down
pub fn state_for(score: f64) -> MoodTier {
    [
        MoodTier::Ecstatic,
        MoodTier::Happy,
        MoodTier::Content,
        MoodTier::Grumpy,
        MoodTier::Sad,
    ]
    .into_iter()
    .find(|tier| score >= tier.min_score())
    .unwrap_or(MoodTier::Miserable)
}

/// Per-creature mood evaluator holding the bounded score history
#[derive(Debug, Clone, PartialEq)]
pub struct MoodEvaluator {
    history: VecDeque<f64>,
    capacity: usize,
    trend_delta: f64,
}

impl MoodEvaluator {
    pub fn new(capacity: usize, trend_delta: f64) -> Self {
        let capacity = capacity.max(TREND_WINDOW);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            trend_delta,
        }
    }

    /// Restore from persisted scores, keeping only the newest `capacity`
    pub fn with_history(capacity: usize, trend_delta: f64, scores: &[f64]) -> Self {
        let mut evaluator = Self::new(capacity, trend_delta);
        for score in scores.iter().filter(|s| s.is_finite()) {
            evaluator.record(*score);
        }
        evaluator
    }

    pub fn record(&mut self, score: f64) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(score);
    }

    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    /// Compare the latest score with the oldest of the last three
    pub fn trend(&self) -> MoodTrend {
        let len = self.history.len();
        if len < TREND_WINDOW {
            return MoodTrend::Stable;
        }
        let delta = self.history[len - 1] - self.history[len - TREND_WINDOW];
        if delta > self.trend_delta {
            MoodTrend::Improving
        } else if delta < -self.trend_delta {
            MoodTrend::Declining
        } else {
            MoodTrend::Stable
        }
    }

    /// Snapshot for the given needs; does not touch the history
    pub fn evaluate(&self, needs: &NeedsState) -> MoodSnapshot {
        let score = calculate_score(needs);
        let tier = state_for(score);
        MoodSnapshot {
            tier,
            score,
            description: tier.description().to_string(),
            can_play: tier.can_play(),
            can_learn: tier.can_learn(),
            trend: self.trend(),
        }
    }
}

impl Default for MoodEvaluator {
    fn default() -> Self {
        Self::new(10, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_scenario_score() {
        let needs = NeedsState::new(80.0, 100.0, 70.0, 100.0, 60.0);
        let score = calculate_score(&needs);
        assert_eq!(score, 83.0);
        assert_eq!(state_for(score), MoodTier::Happy);
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        // 20.075 + 20 + 16 + 12 + 12 = 80.075
        let needs = NeedsState::new(80.3, 80.0, 80.0, 80.0, 80.0);
        assert_eq!(calculate_score(&needs), 80.1);

        // 15.425 + 13.225 + 8 + 11.325 + 3.03 = 51.005
        let needs = NeedsState::new(61.7, 52.9, 40.0, 75.5, 20.2);
        assert_eq!(calculate_score(&needs), 51.0);

        let needs = NeedsState::new(99.9, 99.9, 99.9, 99.9, 99.9);
        assert_eq!(calculate_score(&needs), 99.9);
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        assert_eq!(state_for(90.0), MoodTier::Ecstatic);
        assert_eq!(state_for(89.9), MoodTier::Happy);
        assert_eq!(state_for(70.0), MoodTier::Happy);
        assert_eq!(state_for(50.0), MoodTier::Content);
        assert_eq!(state_for(30.0), MoodTier::Grumpy);
        assert_eq!(state_for(10.0), MoodTier::Sad);
        assert_eq!(state_for(9.9), MoodTier::Miserable);
        assert_eq!(state_for(0.0), MoodTier::Miserable);
    }

    #[test]
    fn test_capability_flags() {
        assert!(MoodTier::Happy.can_play() && MoodTier::Happy.can_learn());
        assert!(MoodTier::Grumpy.can_play() && !MoodTier::Grumpy.can_learn());
        for tier in [MoodTier::Sad, MoodTier::Miserable] {
            assert!(!tier.can_play());
            assert!(!tier.can_learn());
        }
    }

    #[test]
    fn test_trend_needs_three_samples() {
        let mut mood = MoodEvaluator::default();
        mood.record(10.0);
        mood.record(90.0);
        assert_eq!(mood.trend(), MoodTrend::Stable);

        mood.record(95.0);
        // 95 vs 10
        assert_eq!(mood.trend(), MoodTrend::Improving);
    }

    #[test]
    fn test_trend_declining_and_stable() {
        let mut mood = MoodEvaluator::default();
        for score in [80.0, 78.0, 74.0] {
            mood.record(score);
        }
        assert_eq!(mood.trend(), MoodTrend::Declining);

        mood.record(79.0);
        // 79 vs 78
        assert_eq!(mood.trend(), MoodTrend::Stable);
    }

    #[test]
    fn test_trend_threshold_is_strict() {
        let trend_of = |scores: [f64; 3]| {
            let mut mood = MoodEvaluator::default();
            for score in scores {
                mood.record(score);
            }
            mood.trend()
        };

        assert_eq!(trend_of([70.0, 72.0, 75.0]), MoodTrend::Stable);
        assert_eq!(trend_of([70.0, 72.0, 75.1]), MoodTrend::Improving);
        assert_eq!(trend_of([70.0, 68.0, 65.0]), MoodTrend::Stable);
        assert_eq!(trend_of([70.0, 68.0, 64.9]), MoodTrend::Declining);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut mood = MoodEvaluator::default();
        for i in 0..25 {
            mood.record(i as f64);
        }
        let history: Vec<f64> = mood.history().collect();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], 15.0);
        assert_eq!(history[9], 24.0);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let mood = MoodEvaluator::default();
        let needs = NeedsState::new(5.0, 5.0, 5.0, 5.0, 5.0);
        let a = mood.evaluate(&needs);
        let b = mood.evaluate(&needs);
        assert_eq!(a, b);
        assert_eq!(a.tier, MoodTier::Miserable);
        assert!(!a.can_play);
    }

    #[test]
    fn test_with_history_drops_non_finite() {
        let mood = MoodEvaluator::with_history(10, 5.0, &[50.0, f64::NAN, 60.0]);
        assert_eq!(mood.history().count(), 2);
    }
}
