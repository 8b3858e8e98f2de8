//! Daily simulation pass
//!
//! Runs once per campaign day while the player is enlisted. The pass does
//! not guard against running twice on the same day; the host must.

use crate::core::calendar::CampaignTime;
use crate::core::config::{CoverConfig, DayRange, InjuryConfig};
use crate::core::dice::Dice;
use crate::core::types::MemberId;
use crate::host::{LanceHost, NeedKind, ScheduledActivity};
use crate::lance::health::{ActivityState, DeathCause, HealthState};
use crate::lance::member::LanceMember;
use crate::lance::relation::RelationshipCategory;
use crate::simulation::events::LanceEvent;
use crate::simulation::session::LanceSession;

/// Gauge readings taken once at the start of a pass
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyConditions {
    pub rest_low: bool,
    pub equipment_low: bool,
}

impl DailyConditions {
    pub fn observe(host: &dyn LanceHost, config: &InjuryConfig) -> Self {
        match host.scheduler() {
            Some(scheduler) => Self {
                rest_low: scheduler.need(NeedKind::Rest) < config.low_need_threshold,
                equipment_low: scheduler.need(NeedKind::Equipment) < config.low_need_threshold,
            },
            None => Self::default(),
        }
    }
}

/// Chance that a member below MajorInjury gets hurt today
pub fn daily_injury_chance(
    config: &InjuryConfig,
    activity: ActivityState,
    training: bool,
    conditions: DailyConditions,
) -> f32 {
    let mut chance = config.base_chance;
    if activity == ActivityState::OnDuty {
        chance += config.on_duty_bonus;
    }
    if training {
        chance += config.training_bonus;
    }
    if conditions.rest_low {
        chance += config.low_need_bonus;
    }
    if conditions.equipment_low {
        chance += config.low_need_bonus;
    }
    chance
}

/// Severity of a daily injury and its recovery window bounds
pub fn roll_injury_severity(config: &InjuryConfig, dice: &mut impl Dice) -> (HealthState, DayRange) {
    let roll = dice.roll();
    if roll < config.minor_share {
        (HealthState::MinorInjury, config.minor_days)
    } else if roll < config.minor_share + config.major_share {
        (HealthState::MajorInjury, config.major_days)
    } else {
        (HealthState::Incapacitated, config.incapacitated_days)
    }
}

/// Death chance from an incapacitating injury, if the member is at risk
pub fn complication_death_chance(config: &InjuryConfig, medical_risk: u8) -> Option<f32> {
    if medical_risk < config.complication_risk_threshold {
        return None;
    }
    Some(config.complication_base + medical_risk as f32 * config.complication_per_risk)
}

/// Chance that a member asks the player to cover a duty today
///
/// The indebted penalty can push the raw sum below zero; it is floored
/// there, which behaves the same as comparing a negative chance.
pub fn cover_request_chance(config: &CoverConfig, member: &LanceMember) -> f32 {
    let mut chance = config.base_chance;
    if member.health() == HealthState::MinorInjury {
        chance += config.minor_injury_bonus;
    }
    if member.relationship() == RelationshipCategory::Friendly {
        chance += config.friendly_bonus;
    }
    if member.favors_owed_to_player > config.indebted_threshold {
        chance -= config.indebted_penalty;
    }
    chance.max(0.0)
}

impl<D: Dice> LanceSession<D> {
    /// Run one day of the lance's life
    ///
    /// Returns every event produced; player-facing ones have also been
    /// passed to the host.
    pub fn run_daily_tick(&mut self, host: &mut dyn LanceHost) -> Vec<LanceEvent> {
        if !host.is_enlisted() {
            return Vec::new();
        }
        self.ensure_roster(host);

        let now = host.clock().now();
        // Deaths from earlier passes and battles are mourned before today's rolls
        self.finalize_memorials(host);
        let conditions = DailyConditions::observe(host, &self.config.injury);

        for id in self.roster.active_ids() {
            if !self.roster.get(id).map(|m| m.is_active()).unwrap_or(false) {
                continue;
            }
            let training = host
                .scheduler()
                .and_then(|s| s.current_activity(id))
                .map(|a| a == ScheduledActivity::TrainingDrill)
                .unwrap_or(false);

            self.advance_member(host, id, now);
            self.roll_daily_injury(host, id, now, training, conditions);
            self.roll_cover_request(host, id, now);
        }

        self.evaluate_promotion_readiness(host, now);
        self.check_escalation(host, now);

        self.state.last_daily_process = Some(now);
        self.take_events()
    }

    /// Service day, recovery curve, leave expiry
    fn advance_member(&mut self, host: &mut dyn LanceHost, id: MemberId, now: CampaignTime) {
        let leader_tier = self.config.roster.leader_rank_tier;
        let mut produced = Vec::new();

        if let Some(member) = self.roster.get_mut(id) {
            member.add_service_day();
            if let Some(health) = member.process_recovery(now, &self.config.recovery) {
                tracing::debug!("{} recovered to {}", member.name, health);
                produced.push(LanceEvent::Recovered { member: id, health });
            }
            if member.end_leave_if_due(now) {
                produced.push(LanceEvent::LeaveEnded { member: id });
            }
            member.refresh_promotion_eligibility(leader_tier);
        }

        for event in produced {
            self.emit(host, event);
        }
    }

    fn roll_daily_injury(
        &mut self,
        host: &mut dyn LanceHost,
        id: MemberId,
        now: CampaignTime,
        training: bool,
        conditions: DailyConditions,
    ) {
        let (activity, medical_risk) = match self.roster.get(id) {
            Some(m) if m.health() < HealthState::MajorInjury => (m.activity(), m.medical_risk),
            _ => return,
        };

        let chance = daily_injury_chance(&self.config.injury, activity, training, conditions);
        if !self.dice.chance(chance) {
            return;
        }

        let (severity, window) = roll_injury_severity(&self.config.injury, &mut self.dice);
        let days = self.dice.range(window.0, window.1) as f64;
        if let Some(member) = self.roster.get_mut(id) {
            member.apply_injury(severity, days, now);
            tracing::debug!("{} injured ({}), {} days to recover", member.name, severity, days);
        }
        self.emit(host, LanceEvent::Injured { member: id, severity, recovery_days: days });

        if severity == HealthState::Incapacitated {
            if let Some(chance) = complication_death_chance(&self.config.injury, medical_risk) {
                if self.dice.chance(chance) {
                    self.process_death(host, id, DeathCause::InjuryComplications);
                }
            }
        }
    }

    fn roll_cover_request(&mut self, host: &mut dyn LanceHost, id: MemberId, now: CampaignTime) {
        let chance = match self.roster.get(id) {
            Some(m) if m.is_active() && !m.cover_cooldown_active(now, self.config.cover.cooldown_days) => {
                cover_request_chance(&self.config.cover, m)
            }
            _ => return,
        };

        if !self.dice.chance(chance) {
            return;
        }
        if let Some(member) = self.roster.get_mut(id) {
            member.record_cover_request(now);
        }
        self.emit(host, LanceEvent::CoverRequested { member: id });
    }

    /// Hold memorials for every queued member who is confirmed dead
    fn finalize_memorials(&mut self, host: &mut dyn LanceHost) {
        let pending = std::mem::take(&mut self.state.pending_memorials);
        for id in pending {
            match self.roster.get(id) {
                Some(member) if member.is_dead() => {
                    let name = member.name.clone();
                    tracing::info!("Memorial held for {}", name);
                    self.emit(host, LanceEvent::MemorialHeld { member: id, name });
                }
                Some(_) => self.state.pending_memorials.push(id),
                // Unknown ids are dropped
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LanceConfig;
    use crate::core::types::Formation;

    fn member(relation: i32) -> LanceMember {
        let mut m = LanceMember::new(
            MemberId(1),
            "Osric".to_string(),
            Formation::Archer,
            2,
            CampaignTime::default(),
            3,
        );
        m.set_relation(relation);
        m
    }

    #[test]
    fn test_injury_chance_components() {
        let config = InjuryConfig::default();
        let calm = DailyConditions::default();
        let strained = DailyConditions { rest_low: true, equipment_low: true };

        let off = daily_injury_chance(&config, ActivityState::OffDuty, false, calm);
        assert!((off - 0.001).abs() < 1e-6);

        let on = daily_injury_chance(&config, ActivityState::OnDuty, false, calm);
        assert!((on - 0.002).abs() < 1e-6);

        let worst = daily_injury_chance(&config, ActivityState::OnDuty, true, strained);
        assert!((worst - 0.011).abs() < 1e-6);
    }

    #[test]
    fn test_severity_split() {
        let config = InjuryConfig::default();
        let mut dice = crate::core::dice::ScriptedDice::never();
        dice.push_rolls(&[0.0, 0.69, 0.70, 0.94, 0.95, 0.99]);
        let severities: Vec<HealthState> =
            (0..6).map(|_| roll_injury_severity(&config, &mut dice).0).collect();
        assert_eq!(
            severities,
            vec![
                HealthState::MinorInjury,
                HealthState::MinorInjury,
                HealthState::MajorInjury,
                HealthState::MajorInjury,
                HealthState::Incapacitated,
                HealthState::Incapacitated,
            ]
        );
    }

    #[test]
    fn test_complication_chance() {
        let config = InjuryConfig::default();
        assert_eq!(complication_death_chance(&config, 3), None);
        assert!((complication_death_chance(&config, 4).unwrap() - 0.13).abs() < 1e-6);
        assert!((complication_death_chance(&config, 5).unwrap() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_cover_chance_components() {
        let config = LanceConfig::default().cover;

        let neutral = member(0);
        assert!((cover_request_chance(&config, &neutral) - 0.02).abs() < 1e-6);

        let mut friendly_hurt = member(15);
        friendly_hurt.apply_injury(HealthState::MinorInjury, 2.0, CampaignTime::default());
        assert!((cover_request_chance(&config, &friendly_hurt) - 0.09).abs() < 1e-6);

        // Trusted members do not get the friendly bonus
        let trusted = member(30);
        assert!((cover_request_chance(&config, &trusted) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_indebted_member_never_asks() {
        let config = LanceConfig::default().cover;
        let mut indebted = member(0);
        indebted.favors_owed_to_player = 3;
        assert_eq!(cover_request_chance(&config, &indebted), 0.0);

        // Two favors is not yet indebted
        indebted.favors_owed_to_player = 2;
        assert!(cover_request_chance(&config, &indebted) > 0.0);
    }
}
