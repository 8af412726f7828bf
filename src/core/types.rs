//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub Uuid);

impl CreatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CreatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulated time is measured in minutes
pub type Minutes = f64;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Clamp a value into the 0-100 range used by needs and scores
///
/// Non-finite input collapses to 0.0 rather than poisoning later arithmetic.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Sanitize an elapsed-time input: negative, NaN and infinite deltas count as zero
pub fn sanitize_minutes(delta: Minutes) -> Minutes {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}
