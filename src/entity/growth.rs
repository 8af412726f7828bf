//! Life stages, milestones and birthdays
//!
//! Stages are chosen by age bracket, but the machine never moves backward:
//! the highest stage ever reached acts as a floor under the bracket result.
//! A pause (or a resumed save with an odd clock) can therefore only ever make
//! the duck jump forward, never regress.

use ahash::AHashSet;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::entity::personality::{PersonalityProfile, TraitAxis};

/// Ordered life stages; derive(Ord) follows declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrowthStage {
    Hatchling,
    Duckling,
    Fledgling,
    Juvenile,
    Adolescent,
    YoungAdult,
    Adult,
    Elder,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 8] = [
        GrowthStage::Hatchling,
        GrowthStage::Duckling,
        GrowthStage::Fledgling,
        GrowthStage::Juvenile,
        GrowthStage::Adolescent,
        GrowthStage::YoungAdult,
        GrowthStage::Adult,
        GrowthStage::Elder,
    ];

    /// Inclusive lower age bound in days
    pub fn min_days(self) -> f64 {
        match self {
            GrowthStage::Hatchling => 0.0,
            GrowthStage::Duckling => 3.0,
            GrowthStage::Fledgling => 15.0,
            GrowthStage::Juvenile => 45.0,
            GrowthStage::Adolescent => 90.0,
            GrowthStage::YoungAdult => 180.0,
            GrowthStage::Adult => 365.0,
            GrowthStage::Elder => 1095.0,
        }
    }

    /// Exclusive upper age bound in days; `None` marks the terminal stage
    pub fn max_days(self) -> Option<f64> {
        match self {
            GrowthStage::Elder => None,
            other => Some(GrowthStage::ALL[other as usize + 1].min_days()),
        }
    }

    pub fn contains(self, age_days: f64) -> bool {
        age_days >= self.min_days() && self.max_days().map_or(true, |max| age_days < max)
    }

    /// Pure bracket scan; knows nothing about the floor
    pub fn for_age(age_days: f64) -> GrowthStage {
        GrowthStage::ALL
            .into_iter()
            .find(|stage| stage.contains(age_days))
            .unwrap_or(GrowthStage::Hatchling)
    }

    pub fn key(self) -> &'static str {
        match self {
            GrowthStage::Hatchling => "hatchling",
            GrowthStage::Duckling => "duckling",
            GrowthStage::Fledgling => "fledgling",
            GrowthStage::Juvenile => "juvenile",
            GrowthStage::Adolescent => "adolescent",
            GrowthStage::YoungAdult => "young_adult",
            GrowthStage::Adult => "adult",
            GrowthStage::Elder => "elder",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GrowthStage::Hatchling => "Hatchling",
            GrowthStage::Duckling => "Duckling",
            GrowthStage::Fledgling => "Fledgling",
            GrowthStage::Juvenile => "Juvenile",
            GrowthStage::Adolescent => "Adolescent",
            GrowthStage::YoungAdult => "Young Adult",
            GrowthStage::Adult => "Adult",
            GrowthStage::Elder => "Elder",
        }
    }

    fn base_modifiers(self) -> StageModifiers {
        let (play, learn, rest) = match self {
            GrowthStage::Hatchling => (0.0, 0.0, 0.2),
            GrowthStage::Duckling => (0.1, 0.1, 0.1),
            GrowthStage::Fledgling => (0.15, 0.15, 0.0),
            GrowthStage::Juvenile => (0.2, 0.1, 0.0),
            GrowthStage::Adolescent => (0.1, 0.05, 0.0),
            GrowthStage::YoungAdult => (0.05, 0.05, 0.0),
            GrowthStage::Adult => (0.0, 0.0, 0.05),
            GrowthStage::Elder => (-0.1, -0.05, 0.2),
        };
        StageModifiers {
            play_affinity: play,
            learn_affinity: learn,
            rest_affinity: rest,
        }
    }
}

impl FromStr for GrowthStage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        GrowthStage::ALL
            .into_iter()
            .find(|stage| stage.key() == wanted)
            .ok_or(())
    }
}

/// Score offsets a stage contributes to autonomous behavior
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StageModifiers {
    pub play_affinity: f64,
    pub learn_affinity: f64,
    pub rest_affinity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifeEventKind {
    Hatched,
    StageReached { stage: GrowthStage },
    Birthday { years: u32 },
}

/// One entry in the append-only life log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: LifeEventKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: GrowthStage,
    pub to: GrowthStage,
}

impl StageTransition {
    /// Number of stage steps taken (more than one after a long gap)
    pub fn steps(&self) -> usize {
        self.to as usize - self.from as usize
    }
}

/// Plain growth data, as persisted
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRecord {
    pub stage: GrowthStage,
    pub highest_stage: GrowthStage,
    pub days_in_stage: u32,
    pub stage_entry_age_days: f64,
    pub birth_time: DateTime<Utc>,
    pub life_events: Vec<LifeEvent>,
    pub milestones: BTreeMap<GrowthStage, DateTime<Utc>>,
    pub celebrated_birthdays: AHashSet<i32>,
    pub paused: bool,
}

impl GrowthRecord {
    pub fn new(birth_time: DateTime<Utc>) -> Self {
        let mut milestones = BTreeMap::new();
        milestones.insert(GrowthStage::Hatchling, birth_time);
        Self {
            stage: GrowthStage::Hatchling,
            highest_stage: GrowthStage::Hatchling,
            days_in_stage: 0,
            stage_entry_age_days: 0.0,
            birth_time,
            life_events: vec![LifeEvent {
                timestamp: birth_time,
                kind: LifeEventKind::Hatched,
                description: "Hatched from an egg".to_string(),
            }],
            milestones,
            celebrated_birthdays: AHashSet::new(),
            paused: false,
        }
    }
}

/// Forward-only stage machine for one creature
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthStageMachine {
    record: GrowthRecord,
}

impl GrowthStageMachine {
    pub fn new(birth_time: DateTime<Utc>) -> Self {
        Self {
            record: GrowthRecord::new(birth_time),
        }
    }

    /// Rebuild from persisted data, repairing an inconsistent floor
    pub fn from_record(mut record: GrowthRecord) -> Self {
        if record.highest_stage < record.stage {
            record.highest_stage = record.stage;
        }
        if record.stage < record.highest_stage {
            tracing::warn!(
                "Restored stage {:?} below highest reached {:?}; raising to floor",
                record.stage,
                record.highest_stage
            );
            record.stage = record.highest_stage;
        }
        record.stage_entry_age_days = record.stage.min_days().max(record.stage_entry_age_days);
        let entered = entry_timestamp(record.birth_time, record.stage_entry_age_days);
        record.milestones.entry(record.stage).or_insert(entered);
        Self { record }
    }

    pub fn record(&self) -> &GrowthRecord {
        &self.record
    }

    pub fn stage(&self) -> GrowthStage {
        self.record.stage
    }

    pub fn highest_stage(&self) -> GrowthStage {
        self.record.highest_stage
    }

    pub fn days_in_stage(&self) -> u32 {
        self.record.days_in_stage
    }

    pub fn birth_time(&self) -> DateTime<Utc> {
        self.record.birth_time
    }

    pub fn life_events(&self) -> &[LifeEvent] {
        &self.record.life_events
    }

    pub fn milestone(&self, stage: GrowthStage) -> Option<DateTime<Utc>> {
        self.record.milestones.get(&stage).copied()
    }

    pub fn is_paused(&self) -> bool {
        self.record.paused
    }

    pub fn pause(&mut self) {
        self.record.paused = true;
    }

    pub fn resume(&mut self) {
        self.record.paused = false;
    }

    /// Advance to the stage for `age_days`, never below the highest reached
    ///
    /// Returns the transition when the stage changed. A no-op while paused.
    /// Entry ages and milestone timestamps depend only on the age, so
    /// reaching the same age in one step or many leaves the same record.
    pub fn update_stage(&mut self, age_days: f64) -> Option<StageTransition> {
        if self.record.paused {
            return None;
        }
        let age_days = if age_days.is_finite() { age_days.max(0.0) } else { 0.0 };

        let bracket = GrowthStage::for_age(age_days);
        if bracket < self.record.highest_stage {
            tracing::warn!(
                "Age {:.2} days maps to {:?}, below highest reached {:?}; holding floor",
                age_days,
                bracket,
                self.record.highest_stage
            );
        }
        let target = bracket.max(self.record.highest_stage).max(self.record.stage);

        if target == self.record.stage {
            self.record.days_in_stage = whole_days_since(self.record.stage_entry_age_days, age_days);
            return None;
        }

        let from = self.record.stage;
        let mut entry_age = self.record.stage_entry_age_days;
        for stage in GrowthStage::ALL
            .into_iter()
            .filter(|s| *s > from && *s <= target)
        {
            entry_age = stage.min_days().max(entry_age);
            let entered = self.timestamp_at_age(entry_age);
            self.record.milestones.entry(stage).or_insert(entered);
            self.record.life_events.push(LifeEvent {
                timestamp: entered,
                kind: LifeEventKind::StageReached { stage },
                description: format!("Grew into a {}", stage.display_name()),
            });
        }

        self.record.stage = target;
        self.record.highest_stage = target;
        self.record.stage_entry_age_days = entry_age;
        self.record.days_in_stage = whole_days_since(entry_age, age_days);

        let transition = StageTransition { from, to: target };
        if transition.steps() > 1 {
            tracing::info!(
                "Caught up {} stages: {:?} -> {:?} at {:.1} days",
                transition.steps(),
                from,
                target,
                age_days
            );
        } else {
            tracing::info!("Stage transition {:?} -> {:?} at {:.1} days", from, target, age_days);
        }
        Some(transition)
    }

    /// Wall-clock time at which the creature was `age_days` old
    pub fn timestamp_at_age(&self, age_days: f64) -> DateTime<Utc> {
        entry_timestamp(self.record.birth_time, age_days)
    }

    /// Celebrate a birthday at most once per calendar year
    ///
    /// Ducks hatched on Feb 29 celebrate on Feb 28 in common years.
    pub fn check_birthday(&mut self, today: NaiveDate) -> Option<u32> {
        let birth = self.record.birth_time.date_naive();
        let years = today.year() - birth.year();
        if years <= 0 {
            return None;
        }

        let exact = today.month() == birth.month() && today.day() == birth.day();
        let leap_substitute = birth.month() == 2
            && birth.day() == 29
            && today.month() == 2
            && today.day() == 28
            && NaiveDate::from_ymd_opt(today.year(), 2, 29).is_none();
        if !(exact || leap_substitute) {
            return None;
        }

        if !self.record.celebrated_birthdays.insert(today.year()) {
            return None;
        }

        let years = years as u32;
        self.record.life_events.push(LifeEvent {
            timestamp: Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN)),
            kind: LifeEventKind::Birthday { years },
            description: format!("Celebrated birthday number {}", years),
        });
        tracing::info!("Birthday celebrated: {} year(s) old", years);
        Some(years)
    }

    pub fn has_celebrated(&self, year: i32) -> bool {
        self.record.celebrated_birthdays.contains(&year)
    }

    /// Stage affinities, with learning scaled by curiosity
    pub fn stat_modifiers(&self, personality: &PersonalityProfile) -> StageModifiers {
        let mut modifiers = self.record.stage.base_modifiers();
        let curiosity = personality.get(TraitAxis::Curiosity) as f64;
        modifiers.learn_affinity *= 1.0 + curiosity / 200.0;
        modifiers
    }
}

/// Ages past this many days are stamped as if they were this old (~1900 years)
const MAX_TIMESTAMP_DAYS: f64 = 700_000.0;

fn entry_timestamp(birth_time: DateTime<Utc>, age_days: f64) -> DateTime<Utc> {
    let days = if age_days.is_finite() { age_days.clamp(0.0, MAX_TIMESTAMP_DAYS) } else { 0.0 };
    let millis = (days * 86_400_000.0).round() as i64;
    birth_time
        .checked_add_signed(Duration::milliseconds(millis))
        .unwrap_or(birth_time)
}

fn whole_days_since(entry_age: f64, age_days: f64) -> u32 {
    (age_days - entry_age).max(0.0).floor() as u32
}

/// Human-readable age such as "5 days old" or "2 years old"
pub fn age_string(age_days: f64) -> String {
    let days = if age_days.is_finite() { age_days.max(0.0).floor() as u64 } else { 0 };
    let (count, unit) = match days {
        0 => return "less than a day old".to_string(),
        1..=13 => (days, "day"),
        14..=59 => (days / 7, "week"),
        60..=364 => (days / 30, "month"),
        _ => (days / 365, "year"),
    };
    if count == 1 {
        format!("1 {} old", unit)
    } else {
        format!("{} {}s old", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birth() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_brackets() {
        assert_eq!(GrowthStage::for_age(0.0), GrowthStage::Hatchling);
        assert_eq!(GrowthStage::for_age(2.99), GrowthStage::Hatchling);
        assert_eq!(GrowthStage::for_age(3.0), GrowthStage::Duckling);
        assert_eq!(GrowthStage::for_age(14.9), GrowthStage::Duckling);
        assert_eq!(GrowthStage::for_age(15.0), GrowthStage::Fledgling);
        assert_eq!(GrowthStage::for_age(400.0), GrowthStage::Adult);
        assert_eq!(GrowthStage::for_age(100_000.0), GrowthStage::Elder);
        assert_eq!(GrowthStage::Elder.max_days(), None);
    }

    #[test]
    fn test_update_stage_reports_change() {
        let mut growth = GrowthStageMachine::new(birth());
        assert_eq!(growth.update_stage(1.0), None);

        let transition = growth.update_stage(5.0).unwrap();
        assert_eq!(transition.from, GrowthStage::Hatchling);
        assert_eq!(transition.to, GrowthStage::Duckling);
        // Entered at the bracket start, not when the update happened to land
        assert_eq!(growth.days_in_stage(), 2);
        assert_eq!(
            growth.milestone(GrowthStage::Duckling),
            Some(birth() + Duration::days(3))
        );

        growth.update_stage(8.5);
        assert_eq!(growth.days_in_stage(), 5);
    }

    #[test]
    fn test_one_jump_matches_daily_steps() {
        let mut stepped = GrowthStageMachine::new(birth());
        for day in 1..=400 {
            stepped.update_stage(day as f64);
        }
        let mut jumped = GrowthStageMachine::new(birth());
        jumped.update_stage(400.0);

        assert_eq!(stepped.record(), jumped.record());
        assert_eq!(jumped.stage(), GrowthStage::Adult);
        assert_eq!(jumped.days_in_stage(), 35);
        assert_eq!(
            jumped.milestone(GrowthStage::Adult),
            Some(birth() + Duration::days(365))
        );
    }

    #[test]
    fn test_stage_never_regresses() {
        let mut growth = GrowthStageMachine::new(birth());
        growth.update_stage(400.0);
        assert_eq!(growth.stage(), GrowthStage::Adult);

        assert_eq!(growth.update_stage(5.0), None);
        assert_eq!(growth.stage(), GrowthStage::Adult);
        assert_eq!(growth.update_stage(0.0), None);
        assert_eq!(growth.stage(), GrowthStage::Adult);
    }

    #[test]
    fn test_pause_is_noop_and_resume_jumps_forward() {
        let mut growth = GrowthStageMachine::new(birth());
        growth.update_stage(5.0);
        growth.pause();
        assert_eq!(growth.update_stage(200.0), None);
        assert_eq!(growth.stage(), GrowthStage::Duckling);

        growth.resume();
        let transition = growth.update_stage(200.0).unwrap();
        assert_eq!(transition.to, GrowthStage::YoungAdult);
        assert_eq!(transition.steps(), 4);
    }

    #[test]
    fn test_multi_stage_jump_stamps_every_milestone() {
        let mut growth = GrowthStageMachine::new(birth());
        growth.update_stage(100.0);
        for stage in [
            GrowthStage::Duckling,
            GrowthStage::Fledgling,
            GrowthStage::Juvenile,
            GrowthStage::Adolescent,
        ] {
            assert!(growth.milestone(stage).is_some(), "{:?} missing", stage);
        }
        assert_eq!(
            growth.milestone(GrowthStage::Fledgling),
            Some(birth() + Duration::days(15))
        );
        assert!(growth.milestone(GrowthStage::YoungAdult).is_none());
        // Hatched + 4 stage entries
        assert_eq!(growth.life_events().len(), 5);
    }

    #[test]
    fn test_from_record_repairs_floor() {
        let mut record = GrowthRecord::new(birth());
        record.stage = GrowthStage::Juvenile;
        record.highest_stage = GrowthStage::Adult;
        let growth = GrowthStageMachine::from_record(record);
        assert_eq!(growth.stage(), GrowthStage::Adult);
        assert_eq!(
            growth.milestone(GrowthStage::Adult),
            Some(birth() + Duration::days(365))
        );
    }

    #[test]
    fn test_birthday_once_per_year() {
        let mut growth = GrowthStageMachine::new(birth());
        let first = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        assert_eq!(growth.check_birthday(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()), None);
        assert_eq!(growth.check_birthday(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()), None);
        assert_eq!(growth.check_birthday(first), Some(1));
        assert_eq!(growth.check_birthday(first), None);
        assert!(growth.has_celebrated(2025));
        assert_eq!(growth.check_birthday(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()), Some(2));
    }

    #[test]
    fn test_leap_day_birthday() {
        let leap = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let mut growth = GrowthStageMachine::new(leap);
        assert_eq!(growth.check_birthday(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()), Some(1));
        // Leap years still use the real date
        assert_eq!(growth.check_birthday(NaiveDate::from_ymd_opt(2028, 2, 28).unwrap()), None);
        assert_eq!(growth.check_birthday(NaiveDate::from_ymd_opt(2028, 2, 29).unwrap()), Some(4));
    }

    #[test]
    fn test_stat_modifiers_scale_with_curiosity() {
        let mut growth = GrowthStageMachine::new(birth());
        growth.update_stage(20.0);
        let mut curious = PersonalityProfile::new();
        curious.set_trait(TraitAxis::Curiosity, 100);

        let neutral = growth.stat_modifiers(&PersonalityProfile::new());
        let boosted = growth.stat_modifiers(&curious);
        assert!((boosted.learn_affinity - neutral.learn_affinity * 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_age_string() {
        assert_eq!(age_string(0.5), "less than a day old");
        assert_eq!(age_string(1.2), "1 day old");
        assert_eq!(age_string(5.0), "5 days old");
        assert_eq!(age_string(21.0), "3 weeks old");
        assert_eq!(age_string(95.0), "3 months old");
        assert_eq!(age_string(400.0), "1 year old");
        assert_eq!(age_string(800.0), "2 years old");
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!("duckling".parse::<GrowthStage>(), Ok(GrowthStage::Duckling));
        assert_eq!("Young Adult".parse::<GrowthStage>(), Ok(GrowthStage::YoungAdult));
        assert!("egg".parse::<GrowthStage>().is_err());
    }
}
