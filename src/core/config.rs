//! Lance simulation configuration with documented constants
//!
//! All tuning numbers are collected here. Defaults reproduce the standard
//! campaign balance; a TOML file may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{LanceError, Result};

/// Inclusive day (or count) range
pub type DayRange = (i32, i32);

/// Configuration for the whole lance simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanceConfig {
    pub roster: RosterConfig,
    pub injury: InjuryConfig,
    pub recovery: RecoveryConfig,
    pub cover: CoverConfig,
    pub promotion: PromotionConfig,
    pub escalation: EscalationConfig,
    pub battle: BattleConfig,
    pub morale: MoraleConfig,
    pub schedule: ScheduleConfig,
}

// === ROSTER ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Smallest generated lance
    pub min_size: i32,
    /// Largest generated lance
    pub max_size: i32,
    /// Rank tier of every lance leader, generated or appointed
    pub leader_rank_tier: u8,
    pub leader_days: DayRange,
    pub leader_battles: DayRange,
    /// Weights for rank tiers 1..=5 of ordinary members
    ///
    /// Un-normalized; drawn with the cumulative-sum picker.
    pub rank_weights: [f32; 5],
    /// Weights for infantry, archer, cavalry, horse archer
    pub formation_weights: [f32; 4],
    /// Inclusive bounds of the medical risk roll
    pub medical_risk: DayRange,
    /// Starting relation of ordinary members
    pub starting_relation: DayRange,
    /// Starting relation of the generated leader
    pub leader_starting_relation: DayRange,
    /// Service days of a leader appointed to fill a vacancy
    pub replacement_leader_days: DayRange,
    pub replacement_leader_battles: DayRange,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            min_size: 8,
            max_size: 12,
            leader_rank_tier: 5,
            leader_days: (180, 365),
            leader_battles: (5, 15),
            rank_weights: [0.40, 0.30, 0.15, 0.10, 0.05],
            formation_weights: [0.5, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0],
            medical_risk: (0, 5),
            starting_relation: (-5, 15),
            leader_starting_relation: (0, 10),
            replacement_leader_days: (90, 180),
            replacement_leader_battles: (3, 10),
        }
    }
}

// === DAILY INJURY ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryConfig {
    /// Daily injury chance for every member below MajorInjury
    pub base_chance: f32,
    /// Added while the member is OnDuty
    pub on_duty_bonus: f32,
    /// Added while the scheduler has the member on a training drill
    pub training_bonus: f32,
    /// Added for each of Rest and Equipment below `low_need_threshold`
    pub low_need_bonus: f32,
    pub low_need_threshold: f32,
    /// Severity split: minor share, then major share, remainder incapacitated
    pub minor_share: f32,
    pub major_share: f32,
    pub minor_days: DayRange,
    pub major_days: DayRange,
    pub incapacitated_days: DayRange,
    /// Members at or above this medical risk may die of an incapacitating injury
    pub complication_risk_threshold: u8,
    /// Death chance is `complication_base + medical_risk * complication_per_risk`
    pub complication_base: f32,
    pub complication_per_risk: f32,
}

impl Default for InjuryConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.001,
            on_duty_bonus: 0.001,
            training_bonus: 0.005,
            low_need_bonus: 0.002,
            low_need_threshold: 40.0,
            minor_share: 0.70,
            major_share: 0.25,
            minor_days: (1, 4),
            major_days: (7, 14),
            incapacitated_days: (14, 30),
            complication_risk_threshold: 4,
            complication_base: 0.05,
            complication_per_risk: 0.02,
        }
    }
}

// === RECOVERY ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Window granted when Incapacitated improves to MajorInjury
    pub major_followup_days: f64,
    /// Window granted when MajorInjury improves to MinorInjury
    pub minor_followup_days: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            major_followup_days: 7.0,
            minor_followup_days: 3.0,
        }
    }
}

// === COVER REQUESTS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// No new request within this many days of the last one
    pub cooldown_days: f64,
    pub base_chance: f32,
    pub minor_injury_bonus: f32,
    pub friendly_bonus: f32,
    /// Subtracted once the member owes the player more than `indebted_threshold` favors
    pub indebted_penalty: f32,
    pub indebted_threshold: u32,
    pub accepted_relation: i32,
    pub accepted_favors: u32,
    pub declined_relation: i32,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            cooldown_days: 3.0,
            base_chance: 0.02,
            minor_injury_bonus: 0.05,
            friendly_bonus: 0.02,
            indebted_penalty: 0.03,
            indebted_threshold: 2,
            accepted_relation: 10,
            accepted_favors: 1,
            declined_relation: -5,
        }
    }
}

// === PLAYER PROMOTION ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionConfig {
    pub min_tier: u8,
    pub min_days_served: u32,
    pub leadership_threshold: u32,
    pub combat_threshold: u32,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            min_tier: 4,
            min_days_served: 90,
            leadership_threshold: 50,
            combat_threshold: 75,
        }
    }
}

// === ESCALATION ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Chance after the first full week of waiting is `base_chance + weekly_increment`
    pub base_chance: f32,
    pub weekly_increment: f32,
    pub max_chance: f32,
    pub weights: PathWeights,
    /// Leaders with more service than this are twice as likely to retire
    pub veteran_days: u32,
    pub retirement_multiplier: f32,
    pub war_injury_multiplier: f32,
    pub war_death_multiplier: f32,
    /// Leaders at or above this tier are more likely to be promoted away
    pub senior_rank_tier: u8,
    pub promotion_multiplier: f32,
    /// Recovery window of a leader removed through the injury path
    pub injury_recovery_days: f64,
    /// Tier a leader reaches when promoted away
    pub promoted_rank_tier: u8,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.05,
            weekly_increment: 0.10,
            max_chance: 0.95,
            weights: PathWeights::default(),
            veteran_days: 300,
            retirement_multiplier: 2.0,
            war_injury_multiplier: 1.5,
            war_death_multiplier: 1.3,
            senior_rank_tier: 5,
            promotion_multiplier: 1.5,
            injury_recovery_days: 30.0,
            promoted_rank_tier: 6,
        }
    }
}

/// Base weights of the five vacancy causes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathWeights {
    pub promotion: f32,
    pub transfer: f32,
    pub injury: f32,
    pub death: f32,
    pub retirement: f32,
}

impl Default for PathWeights {
    fn default() -> Self {
        Self {
            promotion: 0.40,
            transfer: 0.30,
            injury: 0.15,
            death: 0.10,
            retirement: 0.05,
        }
    }
}

// === BATTLE ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub siege_assault_severity: f32,
    pub siege_outside_severity: f32,
    pub field_battle_severity: f32,
    pub other_severity: f32,
    /// Base severity when the report carries no participant counts
    pub unknown_size_severity: f32,
    /// Upper bound of the uniform severity addition
    pub severity_jitter: f32,
    /// Injury chance per member is `injury_rate * severity`
    pub injury_rate: f32,
    /// Death chance per member is `death_rate * severity`
    pub death_rate: f32,
    pub minor_share: f32,
    pub minor_days: DayRange,
    pub major_days: DayRange,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            siege_assault_severity: 0.7,
            siege_outside_severity: 0.5,
            field_battle_severity: 0.4,
            other_severity: 0.3,
            unknown_size_severity: 0.5,
            severity_jitter: 0.3,
            injury_rate: 0.15,
            death_rate: 0.02,
            minor_share: 0.70,
            minor_days: (2, 5),
            major_days: (7, 14),
        }
    }
}

// === MORALE ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoraleConfig {
    /// Morale lost when a member dies
    pub death_penalty: f32,
    /// Morale lost when a duty goes unfilled
    pub unfulfilled_duty_penalty: f32,
}

impl Default for MoraleConfig {
    fn default() -> Self {
        Self {
            death_penalty: 10.0,
            unfulfilled_duty_penalty: 2.0,
        }
    }
}

// === SCHEDULER FACADE ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub leader_priority: u8,
    pub member_priority: u8,
    pub formation_match_confidence: f32,
    pub rank_match_confidence: f32,
    pub player_cover_confidence: f32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            leader_priority: 3,
            member_priority: 1,
            formation_match_confidence: 0.9,
            rank_match_confidence: 0.6,
            player_cover_confidence: 0.8,
        }
    }
}

impl LanceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LanceConfig = toml::from_str(content)?;
        config.validate().map_err(LanceError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let roster = &self.roster;
        if roster.min_size < 1 || roster.min_size > roster.max_size {
            return Err(format!(
                "roster size range ({}, {}) must be non-empty and start at 1 or more",
                roster.min_size, roster.max_size
            ));
        }

        if roster.rank_weights.iter().sum::<f32>() <= 0.0 {
            return Err("rank_weights must have a positive total".into());
        }
        if roster.formation_weights.iter().sum::<f32>() <= 0.0 {
            return Err("formation_weights must have a positive total".into());
        }

        let ranges = [
            ("roster.leader_days", roster.leader_days),
            ("roster.leader_battles", roster.leader_battles),
            ("roster.medical_risk", roster.medical_risk),
            ("roster.replacement_leader_days", roster.replacement_leader_days),
            ("injury.minor_days", self.injury.minor_days),
            ("injury.major_days", self.injury.major_days),
            ("injury.incapacitated_days", self.injury.incapacitated_days),
            ("battle.minor_days", self.battle.minor_days),
            ("battle.major_days", self.battle.major_days),
        ];
        for (name, (lo, hi)) in ranges {
            if lo > hi {
                return Err(format!("{} has min {} above max {}", name, lo, hi));
            }
        }

        if roster.medical_risk.0 < 0 || roster.medical_risk.1 > 5 {
            return Err("roster.medical_risk must stay within 0..=5".into());
        }

        // Severity shares must leave a non-negative remainder
        if self.injury.minor_share + self.injury.major_share > 1.0 {
            return Err(format!(
                "injury minor_share ({}) + major_share ({}) exceeds 1.0",
                self.injury.minor_share, self.injury.major_share
            ));
        }

        if self.escalation.max_chance > 1.0 || self.escalation.base_chance < 0.0 {
            return Err("escalation chances must stay within [0, 1]".into());
        }

        Ok(())
    }
}
