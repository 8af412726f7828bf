//! Snapshot contract for saving and restoring a creature
//!
//! A snapshot is one flat JSON object. Every key is optional: a missing or
//! malformed value falls back to the default documented on its field, and
//! keys this version does not know are carried through untouched so newer
//! saves survive a round trip through older code.

use ahash::AHashSet;
use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::core::config::CreatureConfig;
use crate::core::error::{DuckError, Result};
use crate::core::types::{CreatureId, MINUTES_PER_DAY};
use crate::creature::Creature;
use crate::entity::growth::{GrowthRecord, GrowthStage, GrowthStageMachine, LifeEvent};
use crate::entity::mood::MoodEvaluator;
use crate::entity::needs::{NeedsState, NeedsTracker};
use crate::entity::personality::{PersonalityProfile, TraitAxis, TRAIT_MAX, TRAIT_MIN};
use crate::simulation::action_select::BehaviorSelector;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Keys owned by the snapshot; anything else lands in `extra`
const KNOWN_KEYS: &[&str] = &[
    "version",
    "id",
    "name",
    "seed",
    "rng_word_pos",
    "age_minutes",
    "birth_time",
    "hunger",
    "energy",
    "fun",
    "cleanliness",
    "social",
    "trait_curiosity",
    "trait_sociability",
    "trait_activity",
    "trait_tidiness",
    "trait_temperament",
    "stage",
    "highest_stage",
    "days_in_stage",
    "stage_entry_age_days",
    "growth_paused",
    "stage_milestones",
    "celebrated_birthdays",
    "life_events",
    "mood_history",
    "last_proposal_minutes",
];

/// Flat persisted form of a creature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureSnapshot {
    /// Default: current version
    pub version: u32,
    /// Default: a fresh random id
    pub id: Uuid,
    /// Default: "Duck"
    pub name: String,
    /// Default: 0
    pub seed: u64,
    /// RNG stream position; default 0 (start of the seeded stream)
    pub rng_word_pos: u64,
    /// Default: 0.0
    pub age_minutes: f64,
    /// Default: now minus the restored age
    pub birth_time: DateTime<Utc>,
    /// Need values; each defaults to 100.0 and is clamped on load
    pub hunger: f64,
    pub energy: f64,
    pub fun: f64,
    pub cleanliness: f64,
    pub social: f64,
    /// Trait values; each defaults to 0, accepts floats, clamped to [-100, 100]
    pub trait_curiosity: i32,
    pub trait_sociability: i32,
    pub trait_activity: i32,
    pub trait_tidiness: i32,
    pub trait_temperament: i32,
    /// Default (or unknown tag): the bracket for `age_minutes`
    pub stage: String,
    /// Default (or unknown tag): `stage`
    pub highest_stage: String,
    /// Default: 0
    pub days_in_stage: u32,
    /// Default: the current stage's lower bound
    pub stage_entry_age_days: f64,
    /// Default: false
    pub growth_paused: bool,
    /// Default: empty; unknown stage keys are dropped
    pub stage_milestones: BTreeMap<String, DateTime<Utc>>,
    /// Default: empty
    pub celebrated_birthdays: Vec<i32>,
    /// Default: empty; malformed entries are skipped
    pub life_events: Vec<LifeEvent>,
    /// Default: empty; non-finite entries are skipped
    pub mood_history: Vec<f64>,
    /// Default: none (the next autonomous request is answered)
    pub last_proposal_minutes: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read one key, falling back to `default` when it is missing or malformed
fn read<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, default: T) -> T {
    match map.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Snapshot field {:?} is malformed ({}); using default", key, e);
                default
            }
        },
    }
}

/// Read a list, keeping the well-formed entries and skipping the rest
fn read_list<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Vec<T> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Skipping malformed entry in {:?}: {}", key, e);
                    None
                }
            })
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            tracing::warn!("Snapshot field {:?} is not a list; using default", key);
            Vec::new()
        }
    }
}

fn read_trait(map: &Map<String, Value>, key: &str) -> i32 {
    let raw: f64 = read(map, key, 0.0);
    if raw.is_finite() {
        raw.round().clamp(TRAIT_MIN as f64, TRAIT_MAX as f64) as i32
    } else {
        0
    }
}

fn read_stage(map: &Map<String, Value>, key: &str, default: GrowthStage) -> GrowthStage {
    let tag: Option<String> = read(map, key, None);
    match tag {
        None => default,
        Some(tag) => tag.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown stage tag {:?} in {:?}; using {:?}", tag, key, default);
            default
        }),
    }
}

impl CreatureSnapshot {
    /// Leniently read a snapshot from any JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or(DuckError::SnapshotNotObject)?;

        let age_minutes: f64 = read(map, "age_minutes", 0.0);
        let age_minutes = if age_minutes.is_finite() { age_minutes.max(0.0) } else { 0.0 };
        let default_birth = Utc::now()
            - Duration::milliseconds((age_minutes.min(1.0e9) * 60_000.0) as i64);

        let stage = read_stage(map, "stage", GrowthStage::for_age(age_minutes / MINUTES_PER_DAY));
        let highest_stage = read_stage(map, "highest_stage", stage);

        let extra = map
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            version: read(map, "version", SNAPSHOT_VERSION),
            id: read(map, "id", Uuid::new_v4()),
            name: read(map, "name", "Duck".to_string()),
            seed: read(map, "seed", 0),
            rng_word_pos: read(map, "rng_word_pos", 0),
            age_minutes,
            birth_time: read(map, "birth_time", default_birth),
            hunger: read(map, "hunger", 100.0),
            energy: read(map, "energy", 100.0),
            fun: read(map, "fun", 100.0),
            cleanliness: read(map, "cleanliness", 100.0),
            social: read(map, "social", 100.0),
            trait_curiosity: read_trait(map, "trait_curiosity"),
            trait_sociability: read_trait(map, "trait_sociability"),
            trait_activity: read_trait(map, "trait_activity"),
            trait_tidiness: read_trait(map, "trait_tidiness"),
            trait_temperament: read_trait(map, "trait_temperament"),
            stage: stage.key().to_string(),
            highest_stage: highest_stage.key().to_string(),
            days_in_stage: read(map, "days_in_stage", 0),
            stage_entry_age_days: read(map, "stage_entry_age_days", stage.min_days()),
            growth_paused: read(map, "growth_paused", false),
            stage_milestones: read(map, "stage_milestones", BTreeMap::new()),
            celebrated_birthdays: read_list(map, "celebrated_birthdays"),
            life_events: read_list(map, "life_events"),
            mood_history: read_list::<f64>(map, "mood_history")
                .into_iter()
                .filter(|s| s.is_finite())
                .collect(),
            last_proposal_minutes: read(map, "last_proposal_minutes", None),
            extra,
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Creature {
    /// Flatten this creature into a snapshot
    pub fn to_snapshot(&self) -> CreatureSnapshot {
        let state = self.needs.state();
        let record = self.growth.record();
        let mut celebrated: Vec<i32> = record.celebrated_birthdays.iter().copied().collect();
        celebrated.sort_unstable();

        CreatureSnapshot {
            version: SNAPSHOT_VERSION,
            id: self.id.0,
            name: self.name.clone(),
            seed: self.seed,
            rng_word_pos: u64::try_from(self.rng.get_word_pos()).unwrap_or(u64::MAX),
            age_minutes: self.age_minutes,
            birth_time: record.birth_time,
            hunger: state.hunger,
            energy: state.energy,
            fun: state.fun,
            cleanliness: state.cleanliness,
            social: state.social,
            trait_curiosity: self.personality.get(TraitAxis::Curiosity),
            trait_sociability: self.personality.get(TraitAxis::Sociability),
            trait_activity: self.personality.get(TraitAxis::Activity),
            trait_tidiness: self.personality.get(TraitAxis::Tidiness),
            trait_temperament: self.personality.get(TraitAxis::Temperament),
            stage: record.stage.key().to_string(),
            highest_stage: record.highest_stage.key().to_string(),
            days_in_stage: record.days_in_stage,
            stage_entry_age_days: record.stage_entry_age_days,
            growth_paused: record.paused,
            stage_milestones: record
                .milestones
                .iter()
                .map(|(stage, at)| (stage.key().to_string(), *at))
                .collect(),
            celebrated_birthdays: celebrated,
            life_events: record.life_events.clone(),
            mood_history: self.mood.history().collect(),
            last_proposal_minutes: self.selector.last_proposal(),
            extra: self.extra.clone(),
        }
    }

    /// Rebuild a creature from a snapshot under the given config
    pub fn from_snapshot(snapshot: CreatureSnapshot, config: CreatureConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(snapshot.seed);
        rng.set_word_pos(snapshot.rng_word_pos as u128);

        let mut personality = PersonalityProfile::new();
        personality.set_trait(TraitAxis::Curiosity, snapshot.trait_curiosity);
        personality.set_trait(TraitAxis::Sociability, snapshot.trait_sociability);
        personality.set_trait(TraitAxis::Activity, snapshot.trait_activity);
        personality.set_trait(TraitAxis::Tidiness, snapshot.trait_tidiness);
        personality.set_trait(TraitAxis::Temperament, snapshot.trait_temperament);

        let needs = NeedsTracker::from_state(NeedsState::new(
            snapshot.hunger,
            snapshot.energy,
            snapshot.fun,
            snapshot.cleanliness,
            snapshot.social,
        ));

        // Tags were normalized by from_value; parse again for hand-built snapshots
        let stage = snapshot.stage.parse().unwrap_or(GrowthStage::Hatchling);
        let highest_stage = snapshot.highest_stage.parse().unwrap_or(stage);
        let milestones = snapshot
            .stage_milestones
            .iter()
            .filter_map(|(key, at)| key.parse::<GrowthStage>().ok().map(|s| (s, *at)))
            .collect();
        let growth = GrowthStageMachine::from_record(GrowthRecord {
            stage,
            highest_stage,
            days_in_stage: snapshot.days_in_stage,
            stage_entry_age_days: snapshot.stage_entry_age_days,
            birth_time: snapshot.birth_time,
            life_events: snapshot.life_events,
            milestones,
            celebrated_birthdays: snapshot.celebrated_birthdays.into_iter().collect::<AHashSet<_>>(),
            paused: snapshot.growth_paused,
        });

        let mood = MoodEvaluator::with_history(
            config.mood_history_len,
            config.trend_delta,
            &snapshot.mood_history,
        );
        // Never later than the saved age
        let last_proposal = snapshot
            .last_proposal_minutes
            .map(|minutes| minutes.min(snapshot.age_minutes));
        let selector = BehaviorSelector::new(&config).with_last_proposal(last_proposal);

        Self {
            id: CreatureId(snapshot.id),
            name: snapshot.name,
            seed: snapshot.seed,
            rng,
            config,
            personality,
            needs,
            mood,
            growth,
            selector,
            age_minutes: snapshot.age_minutes,
            extra: snapshot.extra,
        }
    }

    pub fn to_serialized(&self) -> Result<Value> {
        self.to_snapshot().to_value()
    }

    /// Restore from a JSON value with default tuning
    pub fn from_serialized(state: &Value) -> Result<Self> {
        Self::from_serialized_with(state, CreatureConfig::default())
    }

    pub fn from_serialized_with(state: &Value, config: CreatureConfig) -> Result<Self> {
        let snapshot = CreatureSnapshot::from_value(state)?;
        Ok(Self::from_snapshot(snapshot, config))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_serialized(&value)
    }
}
