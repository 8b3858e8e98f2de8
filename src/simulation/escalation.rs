//! Escalation resolver
//!
//! When the player is ready for promotion but the leader post is filled,
//! something has to happen to the sitting leader. A weighted draw picks what,
//! and the resulting vacancy either goes to the player or to a fresh NPC.

use serde::{Deserialize, Serialize};

use crate::core::calendar::CampaignTime;
use crate::core::config::EscalationConfig;
use crate::core::dice::{pick_weighted, Dice};
use crate::core::types::{MemberId, RankTier};
use crate::host::{drain_need, LanceHost, NeedKind};
use crate::lance::generation::generate_replacement_leader;
use crate::lance::health::{ActivityState, DeathCause, HealthState};
use crate::simulation::events::LanceEvent;
use crate::simulation::session::LanceSession;

/// What happens to the sitting leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscalationPath {
    Promotion,
    Transfer,
    Injury,
    Death,
    Retirement,
}

impl EscalationPath {
    pub fn all() -> &'static [EscalationPath] {
        &[
            EscalationPath::Promotion,
            EscalationPath::Transfer,
            EscalationPath::Injury,
            EscalationPath::Death,
            EscalationPath::Retirement,
        ]
    }

    pub fn vacancy_reason(&self) -> VacancyReason {
        match self {
            EscalationPath::Promotion => VacancyReason::Promotion,
            EscalationPath::Transfer => VacancyReason::Transfer,
            EscalationPath::Injury => VacancyReason::Injury,
            EscalationPath::Death => VacancyReason::Death,
            EscalationPath::Retirement => VacancyReason::Retirement,
        }
    }
}

/// Why the leader post opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacancyReason {
    Promotion,
    Transfer,
    Injury,
    Death,
    Retirement,
}

/// Facts about the leader and the campaign that bend the path weights
#[derive(Debug, Clone, Copy)]
pub struct LeaderContext {
    pub days_in_service: u32,
    pub rank_tier: RankTier,
    pub at_war: bool,
}

/// Path weights after context multipliers, in draw order
pub fn path_weights(config: &EscalationConfig, ctx: &LeaderContext) -> Vec<(EscalationPath, f32)> {
    let base = &config.weights;
    let mut promotion = base.promotion;
    let mut injury = base.injury;
    let mut death = base.death;
    let mut retirement = base.retirement;

    if ctx.days_in_service > config.veteran_days {
        retirement *= config.retirement_multiplier;
    }
    if ctx.at_war {
        injury *= config.war_injury_multiplier;
        death *= config.war_death_multiplier;
    }
    if ctx.rank_tier >= config.senior_rank_tier {
        promotion *= config.promotion_multiplier;
    }

    vec![
        (EscalationPath::Promotion, promotion),
        (EscalationPath::Transfer, base.transfer),
        (EscalationPath::Injury, injury),
        (EscalationPath::Death, death),
        (EscalationPath::Retirement, retirement),
    ]
}

pub fn select_path(config: &EscalationConfig, ctx: &LeaderContext, dice: &mut impl Dice) -> EscalationPath {
    pick_weighted(&path_weights(config, ctx), dice).unwrap_or(EscalationPath::Promotion)
}

impl<D: Dice> LanceSession<D> {
    /// Remove the sitting leader by a weighted path and resolve the vacancy
    ///
    /// Returns the chosen path, or `None` when there is no leader.
    pub fn trigger_escalation(&mut self, host: &mut dyn LanceHost, now: CampaignTime) -> Option<EscalationPath> {
        let leader = self.roster.leader()?;
        let leader_id = leader.id;
        let ctx = LeaderContext {
            days_in_service: leader.days_in_service,
            rank_tier: leader.rank_tier(),
            at_war: host.enlistment().map(|e| e.lord_at_war()).unwrap_or(false),
        };

        let path = select_path(&self.config.escalation, &ctx, &mut self.dice);
        self.state.escalation_in_progress = true;
        self.state.selected_path = Some(path);
        tracing::info!(
            "Escalation after {} weeks: leader {} leaves by {:?}",
            self.state.weeks_waiting,
            leader_id,
            path
        );
        self.emit(
            host,
            LanceEvent::EscalationTriggered {
                path,
                leader: leader_id,
                weeks_waiting: self.state.weeks_waiting,
            },
        );

        self.execute_path(host, path, leader_id, now);
        Some(path)
    }

    fn execute_path(&mut self, host: &mut dyn LanceHost, path: EscalationPath, leader: MemberId, now: CampaignTime) {
        let escalation = &self.config.escalation;
        match path {
            EscalationPath::Promotion => {
                let tier = escalation.promoted_rank_tier;
                self.roster.clear_leader();
                if let Some(member) = self.roster.get_mut(leader) {
                    member.set_rank_tier(tier);
                }
            }
            EscalationPath::Transfer | EscalationPath::Retirement => {
                self.roster.clear_leader();
                if let Some(member) = self.roster.get_mut(leader) {
                    member.set_activity(ActivityState::Detached);
                }
            }
            EscalationPath::Injury => {
                let days = escalation.injury_recovery_days;
                if let Some(member) = self.roster.get_mut(leader) {
                    member.apply_injury(HealthState::Incapacitated, days, now);
                }
                self.roster.clear_leader();
            }
            EscalationPath::Death => {
                self.process_death(host, leader, DeathCause::CombatWounds);
                return;
            }
        }
        self.resolve_vacancy(host, path.vacancy_reason(), now);
    }

    /// Fill the leader post: the ready player gets it, otherwise a new NPC
    pub fn resolve_vacancy(&mut self, host: &mut dyn LanceHost, reason: VacancyReason, now: CampaignTime) {
        self.emit(host, LanceEvent::VacancyOpened { reason });

        if self.state.player_ready_for_promotion {
            self.state.player_ready_for_promotion = false;
            self.state.weeks_waiting = 0;
            self.state.escalation_in_progress = false;
            self.state.selected_path = None;
            self.state.escalation_started = None;
            self.state.promotion_offered = true;
            tracing::info!("Leader post ({:?}) offered to the player", reason);
            self.emit(host, LanceEvent::PromotionGranted);
            return;
        }

        let id = generate_replacement_leader(&mut self.roster, &self.config.roster, &mut self.dice, now);
        self.state.escalation_in_progress = false;
        self.state.selected_path = None;
        if let Some(member) = self.roster.get(id) {
            tracing::info!("{} appointed lance leader after {:?}", member.name, reason);
        }
        self.emit(host, LanceEvent::LeaderAppointed { member: id });
    }

    /// Kill a member, queue their memorial and open the post if they led
    ///
    /// Unknown or already dead members are ignored.
    pub fn process_death(&mut self, host: &mut dyn LanceHost, id: MemberId, cause: DeathCause) -> bool {
        let now = host.clock().now();
        let (was_leader, name) = match self.roster.get_mut(id) {
            Some(member) => {
                let was_leader = member.is_lance_leader();
                if !member.mark_dead(cause, now) {
                    return false;
                }
                (was_leader, member.name.clone())
            }
            None => return false,
        };

        tracing::info!("{} died: {}", name, cause);
        self.state.pending_memorials.push(id);
        self.emit(host, LanceEvent::Died { member: id, cause });

        if was_leader {
            self.resolve_vacancy(host, VacancyReason::Death, now);
        }

        let penalty = self.config.morale.death_penalty;
        if let Some(scheduler) = host.scheduler_mut() {
            drain_need(scheduler, NeedKind::Morale, penalty);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LanceConfig;
    use crate::core::dice::{ScriptedDice, SeededDice};
    use crate::host::StandaloneHost;

    fn calm_ctx() -> LeaderContext {
        LeaderContext {
            days_in_service: 200,
            rank_tier: 4,
            at_war: false,
        }
    }

    fn weight_of(weights: &[(EscalationPath, f32)], path: EscalationPath) -> f32 {
        weights.iter().find(|(p, _)| *p == path).map(|(_, w)| *w).unwrap_or(0.0)
    }

    #[test]
    fn test_base_weights_unchanged_without_context() {
        let config = EscalationConfig::default();
        let weights = path_weights(&config, &calm_ctx());
        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!((weight_of(&weights, EscalationPath::Transfer) - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_context_multipliers() {
        let config = EscalationConfig::default();
        let ctx = LeaderContext {
            days_in_service: 301,
            rank_tier: 5,
            at_war: true,
        };
        let weights = path_weights(&config, &ctx);
        assert!((weight_of(&weights, EscalationPath::Promotion) - 0.60).abs() < 1e-6);
        assert!((weight_of(&weights, EscalationPath::Injury) - 0.225).abs() < 1e-6);
        assert!((weight_of(&weights, EscalationPath::Death) - 0.13).abs() < 1e-6);
        assert!((weight_of(&weights, EscalationPath::Retirement) - 0.10).abs() < 1e-6);

        // Exactly 300 days is not yet a veteran
        let ctx = LeaderContext { days_in_service: 300, ..ctx };
        let weights = path_weights(&config, &ctx);
        assert!((weight_of(&weights, EscalationPath::Retirement) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_select_path_walks_cumulative_sum() {
        let config = EscalationConfig::default();
        let mut dice = ScriptedDice::never();
        // Totals 1.0: 0.39 -> promotion, 0.45 -> transfer, 0.80 -> injury,
        // 0.90 -> death, 0.97 -> retirement
        dice.push_rolls(&[0.39, 0.45, 0.80, 0.90, 0.97]);
        let picks: Vec<_> = (0..5).map(|_| select_path(&config, &calm_ctx(), &mut dice)).collect();
        assert_eq!(picks, EscalationPath::all().to_vec());
    }

    #[test]
    fn test_promotion_path_appoints_npc_when_player_not_ready() {
        let mut host = StandaloneHost::enlisted();
        let mut session = LanceSession::with_dice(LanceConfig::default(), ScriptedDice::never());
        session.ensure_roster(&mut host);
        let old_leader = session.roster().leader().unwrap().id;

        session.dice_mut().push_rolls(&[0.0]);
        let now = host.now();
        let path = session.trigger_escalation(&mut host, now);
        assert_eq!(path, Some(EscalationPath::Promotion));

        let old = session.get_member(old_leader).unwrap();
        assert!(!old.is_lance_leader());
        assert_eq!(old.rank_tier(), 6);

        let new_leader = session.roster().leader().unwrap();
        assert_ne!(new_leader.id, old_leader);
        assert_eq!(new_leader.rank_tier(), 5);
        assert!(!session.state().escalation_in_progress);
        assert_eq!(session.roster().all().iter().filter(|m| m.is_lance_leader()).count(), 1);
    }

    #[test]
    fn test_transfer_detaches_leader() {
        let mut host = StandaloneHost::enlisted();
        let mut session = LanceSession::with_dice(LanceConfig::default(), ScriptedDice::never());
        session.ensure_roster(&mut host);
        let old_leader = session.roster().leader().unwrap().id;

        // Leader tier 5 lifts promotion to 0.6; total 1.2, transfer spans 0.6..0.9
        session.dice_mut().push_rolls(&[0.6]);
        let now = host.now();
        assert_eq!(session.trigger_escalation(&mut host, now), Some(EscalationPath::Transfer));
        let old = session.get_member(old_leader).unwrap();
        assert_eq!(old.activity(), ActivityState::Detached);
        assert!(old.is_active());
    }

    #[test]
    fn test_injury_path_sends_leader_to_sick_bay() {
        let mut host = StandaloneHost::enlisted();
        let mut session = LanceSession::with_dice(LanceConfig::default(), ScriptedDice::never());
        session.ensure_roster(&mut host);
        let old_leader = session.roster().leader().unwrap().id;

        // 0.8 of a 1.2 total lands at 0.96, inside injury's 0.9..1.05
        session.dice_mut().push_rolls(&[0.8]);
        let now = host.now();
        assert_eq!(session.trigger_escalation(&mut host, now), Some(EscalationPath::Injury));

        let old = session.get_member(old_leader).unwrap();
        assert_eq!(old.health(), HealthState::Incapacitated);
        assert_eq!(old.activity(), ActivityState::SickBay);
        assert_eq!(old.recovery_due(), Some(now.plus_days(30.0)));
        assert!(!old.is_lance_leader());
        assert!(old.is_active());

        let events = session.take_events();
        assert!(events.contains(&LanceEvent::VacancyOpened { reason: VacancyReason::Injury }));
        assert!(events.iter().any(|e| matches!(e, LanceEvent::LeaderAppointed { .. })));
        assert_ne!(session.roster().leader().unwrap().id, old_leader);
        assert!(!session.state().escalation_in_progress);
        assert_eq!(session.state().selected_path, None);
    }

    #[test]
    fn test_death_path_resolves_vacancy_once() {
        let mut host = StandaloneHost::enlisted();
        let mut session = LanceSession::with_dice(LanceConfig::default(), ScriptedDice::never());
        session.ensure_roster(&mut host);
        let old_leader = session.roster().leader().unwrap().id;
        session.state.player_ready_for_promotion = true;

        // 0.9 of a 1.2 total lands at 1.08, inside death's 1.05..1.15
        session.dice_mut().push_rolls(&[0.9]);
        let now = host.now();
        assert_eq!(session.trigger_escalation(&mut host, now), Some(EscalationPath::Death));

        let dead = session.get_member(old_leader).unwrap();
        assert!(dead.is_dead());
        assert_eq!(dead.death_cause(), Some(DeathCause::CombatWounds));
        assert!(!dead.is_lance_leader());
        assert_eq!(session.state().pending_memorials, vec![old_leader]);

        let events = session.take_events();
        let died_at = events
            .iter()
            .position(|e| *e == LanceEvent::Died { member: old_leader, cause: DeathCause::CombatWounds });
        let vacancies: Vec<_> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, LanceEvent::VacancyOpened { .. }))
            .collect();
        assert_eq!(vacancies.len(), 1);
        assert_eq!(*vacancies[0].1, LanceEvent::VacancyOpened { reason: VacancyReason::Death });
        assert!(died_at.unwrap() < vacancies[0].0);
        assert!(events.contains(&LanceEvent::PromotionGranted));
        assert!(session.state().promotion_offered);
        assert!(session.roster().leader().is_none());
    }

    #[test]
    fn test_vacancy_goes_to_ready_player() {
        let mut host = StandaloneHost::enlisted();
        let mut session = LanceSession::enlist(LanceConfig::default(), 3);
        session.ensure_roster(&mut host);
        session.state.player_ready_for_promotion = true;
        session.state.weeks_waiting = 4;
        session.state.escalation_in_progress = true;
        session.roster.clear_leader();

        let before = session.roster().len();
        let now = host.now();
        session.resolve_vacancy(&mut host, VacancyReason::Retirement, now);

        assert!(session.state().promotion_offered);
        assert!(!session.state().player_ready_for_promotion);
        assert_eq!(session.state().weeks_waiting, 0);
        assert!(!session.state().escalation_in_progress);
        assert_eq!(session.roster().len(), before);
        assert!(host.inbox.contains(&LanceEvent::PromotionGranted));
    }

    #[test]
    fn test_leader_death_drains_morale_and_replaces() {
        let mut host = StandaloneHost::enlisted();
        let mut session = LanceSession::with_dice(LanceConfig::default(), SeededDice::new(11));
        session.ensure_roster(&mut host);
        let leader = session.roster().leader().unwrap().id;

        assert!(session.process_death(&mut host, leader, DeathCause::CombatWounds));
        let dead = session.get_member(leader).unwrap();
        assert!(dead.is_dead());
        assert_eq!(dead.activity(), ActivityState::Detached);
        assert_eq!(dead.death_cause(), Some(DeathCause::CombatWounds));
        assert_eq!(session.state().pending_memorials, vec![leader]);
        assert_eq!(host.morale(), Some(60.0));

        let replacement = session.roster().leader().unwrap();
        assert_ne!(replacement.id, leader);

        // A second death of the same member changes nothing
        assert!(!session.process_death(&mut host, leader, DeathCause::KilledInBattle));
        assert_eq!(host.morale(), Some(60.0));
        assert!(!session.process_death(&mut host, MemberId(404), DeathCause::KilledInBattle));
    }

    #[test]
    fn test_death_without_scheduler_still_resolves() {
        let mut host = StandaloneHost::enlisted();
        host.duties = None;
        let mut session = LanceSession::enlist(LanceConfig::default(), 5);
        session.ensure_roster(&mut host);
        let id = session.roster().all()[1].id;

        assert!(session.process_death(&mut host, id, DeathCause::KilledInBattle));
        assert!(session.get_member(id).unwrap().is_dead());
    }
}
