//! Battle outcome processing
//!
//! When a battle the player's lord fought in concludes, every member fit
//! for duty was on the field. Casualty odds scale with how heavy the fighting
//! was for that kind of encounter.

use serde::{Deserialize, Serialize};

use crate::core::config::BattleConfig;
use crate::core::dice::Dice;
use crate::host::LanceHost;
use crate::lance::health::{DeathCause, HealthState};
use crate::simulation::events::LanceEvent;
use crate::simulation::session::LanceSession;

/// Kind of engagement, as reported by the battle source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterKind {
    SiegeAssault,
    /// Fighting outside the walls of a besieged settlement
    SiegeOutside,
    FieldBattle,
    Other,
}

/// Summary of a concluded battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub encounter: EncounterKind,
    pub attackers: u32,
    pub defenders: u32,
    /// Whether the player's lord took part
    pub lord_participated: bool,
}

impl BattleReport {
    pub fn new(encounter: EncounterKind, attackers: u32, defenders: u32) -> Self {
        Self {
            encounter,
            attackers,
            defenders,
            lord_participated: true,
        }
    }

    pub fn field_battle(attackers: u32, defenders: u32) -> Self {
        Self::new(EncounterKind::FieldBattle, attackers, defenders)
    }

    pub fn siege_assault(attackers: u32, defenders: u32) -> Self {
        Self::new(EncounterKind::SiegeAssault, attackers, defenders)
    }

    pub fn total_participants(&self) -> u32 {
        self.attackers.saturating_add(self.defenders)
    }
}

/// Severity before the random addition
pub fn base_severity(config: &BattleConfig, report: &BattleReport) -> f32 {
    if report.total_participants() == 0 {
        return config.unknown_size_severity;
    }
    match report.encounter {
        EncounterKind::SiegeAssault => config.siege_assault_severity,
        EncounterKind::SiegeOutside => config.siege_outside_severity,
        EncounterKind::FieldBattle => config.field_battle_severity,
        EncounterKind::Other => config.other_severity,
    }
}

/// Final severity in [0, 1] for a uniform `jitter_roll` in [0, 1)
pub fn battle_severity(config: &BattleConfig, report: &BattleReport, jitter_roll: f32) -> f32 {
    (base_severity(config, report) + jitter_roll * config.severity_jitter).clamp(0.0, 1.0)
}

impl<D: Dice> LanceSession<D> {
    /// Apply a concluded battle to every member who was fit to fight
    ///
    /// Injury and death are rolled independently, so a member can be
    /// wounded and then killed in the same battle.
    pub fn process_battle_outcome(&mut self, host: &mut dyn LanceHost, report: &BattleReport) -> Vec<LanceEvent> {
        if !host.is_enlisted() || !report.lord_participated {
            return Vec::new();
        }

        let now = host.clock().now();
        let fighters = self.roster.available_ids();
        for id in &fighters {
            if let Some(member) = self.roster.get_mut(*id) {
                member.record_battle();
            }
        }

        let config = self.config.battle.clone();
        let jitter = self.dice.roll();
        let severity = battle_severity(&config, report, jitter);
        let injury_chance = config.injury_rate * severity;
        let death_chance = config.death_rate * severity;
        tracing::debug!(
            "{:?} with {} lance members at severity {:.2}",
            report.encounter,
            fighters.len(),
            severity
        );

        for id in fighters.iter().copied() {
            if self.dice.chance(injury_chance) {
                let (severity, window) = if self.dice.roll() < config.minor_share {
                    (HealthState::MinorInjury, config.minor_days)
                } else {
                    (HealthState::MajorInjury, config.major_days)
                };
                let days = self.dice.range(window.0, window.1) as f64;
                let applied = self
                    .roster
                    .get_mut(id)
                    .map(|m| m.apply_injury(severity, days, now))
                    .unwrap_or(false);
                if applied {
                    self.emit(host, LanceEvent::Injured { member: id, severity, recovery_days: days });
                }
            }

            if self.dice.chance(death_chance) {
                self.process_death(host, id, DeathCause::KilledInBattle);
            }
        }

        self.emit(
            host,
            LanceEvent::BattleEndured {
                participants: fighters.len(),
                severity,
            },
        );
        self.take_events()
    }
}
