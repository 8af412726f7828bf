//! Creature configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every creature owns its own copy,
//! so two ducks (or two tests) never share mutable tuning state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{DuckError, Result};

/// Configuration for a single creature's simulation
///
/// These values have been tuned so that an unattended duck drifts from
/// "happy" to "sad" over roughly one waking day. Changing them will affect
/// pacing and feel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    // === NEED SYSTEM ===
    /// Hunger points lost per simulated minute
    ///
    /// At 0.08, a full duck becomes critically hungry (< 20) after
    /// about 1000 minutes (~17 hours).
    pub hunger_decay_rate: f64,

    /// Energy points lost per minute, before the activity modifier
    pub energy_decay_rate: f64,

    /// Fun points lost per minute
    pub fun_decay_rate: f64,

    /// Cleanliness points lost per minute, before the tidiness modifier
    ///
    /// Slowest of the needs: ducks get dirty gradually.
    pub cleanliness_decay_rate: f64,

    /// Social points lost per minute, before the sociability modifier
    pub social_decay_rate: f64,

    /// Lower bound for any personality decay modifier
    ///
    /// Keeps decay strictly subtractive even for extreme personalities,
    /// which is what makes split updates equal to a single summed update.
    pub min_decay_modifier: f64,

    /// Needs below this value are critical
    pub critical_need_threshold: f64,

    /// Needs below this value are low (but not critical)
    pub low_need_threshold: f64,

    // === MOOD SYSTEM ===
    /// Number of mood scores kept for trend detection
    pub mood_history_len: usize,

    /// Score change across the trend window that counts as improving/declining
    pub trend_delta: f64,

    /// Simulated minutes between two mood history samples
    ///
    /// Samples land on fixed multiples of this interval of the creature's
    /// age, however the host chooses to chunk its updates.
    pub mood_sample_minutes: f64,

    // === PERSONALITY ===
    /// Birth bias: each trait starts uniformly in [-range, range]
    pub personality_bias_range: i32,

    // === BEHAVIOR SELECTION ===
    /// Scale of the uniform jitter added to every action score
    ///
    /// At 0.1, jitter can reorder actions whose scores are within 0.2,
    /// which keeps the duck from looking robotic without overriding needs.
    pub randomness_factor: f64,

    /// Temperament at or above which jitter is amplified
    pub extreme_trait_threshold: i32,

    /// Jitter multiplier for excitable ducks above the extreme threshold
    pub extreme_jitter_multiplier: f64,

    /// Minimum simulated minutes between two autonomous proposals
    pub idle_interval_minutes: f64,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            // Need decay (hunger > fun > energy > social > cleanliness)
            hunger_decay_rate: 0.08,
            energy_decay_rate: 0.05,
            fun_decay_rate: 0.06,
            cleanliness_decay_rate: 0.03,
            social_decay_rate: 0.04,
            min_decay_modifier: 0.1,

            // Need thresholds
            critical_need_threshold: 20.0,
            low_need_threshold: 40.0,

            // Mood
            mood_history_len: 10,
            trend_delta: 5.0,
            mood_sample_minutes: 60.0,

            // Personality
            personality_bias_range: 60,

            // Behavior
            randomness_factor: 0.1,
            extreme_trait_threshold: 75,
            extreme_jitter_multiplier: 2.0,
            idle_interval_minutes: 15.0,
        }
    }
}

impl CreatureConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CreatureConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("hunger_decay_rate", self.hunger_decay_rate),
            ("energy_decay_rate", self.energy_decay_rate),
            ("fun_decay_rate", self.fun_decay_rate),
            ("cleanliness_decay_rate", self.cleanliness_decay_rate),
            ("social_decay_rate", self.social_decay_rate),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(DuckError::InvalidConfig(format!(
                    "{} ({}) must be a non-negative number",
                    name, rate
                )));
            }
        }

        if self.min_decay_modifier <= 0.0 {
            return Err(DuckError::InvalidConfig(
                "min_decay_modifier must be positive".into(),
            ));
        }

        // Thresholds should be ordered
        if self.critical_need_threshold >= self.low_need_threshold {
            return Err(DuckError::InvalidConfig(format!(
                "critical_need_threshold ({}) should be < low_need_threshold ({})",
                self.critical_need_threshold, self.low_need_threshold
            )));
        }

        if self.mood_history_len < 3 {
            return Err(DuckError::InvalidConfig(format!(
                "mood_history_len ({}) must hold at least 3 samples for trends",
                self.mood_history_len
            )));
        }

        if !self.mood_sample_minutes.is_finite() || self.mood_sample_minutes <= 0.0 {
            return Err(DuckError::InvalidConfig(format!(
                "mood_sample_minutes ({}) must be a positive number",
                self.mood_sample_minutes
            )));
        }

        if !(0..=100).contains(&self.personality_bias_range) {
            return Err(DuckError::InvalidConfig(format!(
                "personality_bias_range ({}) must be within 0..=100",
                self.personality_bias_range
            )));
        }

        if self.randomness_factor < 0.0 || self.extreme_jitter_multiplier < 1.0 {
            return Err(DuckError::InvalidConfig(
                "randomness_factor must be >= 0 and extreme_jitter_multiplier >= 1".into(),
            ));
        }

        if self.idle_interval_minutes < 0.0 {
            return Err(DuckError::InvalidConfig(
                "idle_interval_minutes must be non-negative".into(),
            ));
        }

        Ok(())
    }
}

/// Load a creature config from a TOML file
pub fn load_config(path: &Path) -> Result<CreatureConfig> {
    let content = std::fs::read_to_string(path)?;
    CreatureConfig::from_toml_str(&content)
}
