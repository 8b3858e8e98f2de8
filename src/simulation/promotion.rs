//! Player promotion readiness and the escalation timer

use crate::core::calendar::CampaignTime;
use crate::core::config::{EscalationConfig, PromotionConfig};
use crate::core::dice::Dice;
use crate::core::types::MemberId;
use crate::host::{Enlistment, LanceHost};
use crate::lance::generation::generate_replacement_leader;
use crate::simulation::events::LanceEvent;
use crate::simulation::session::LanceSession;

/// Whether the player's record qualifies for the leader post
pub fn meets_promotion_requirements(config: &PromotionConfig, enlistment: &dyn Enlistment) -> bool {
    enlistment.is_enlisted()
        && enlistment.tier() >= config.min_tier
        && enlistment.days_served() >= config.min_days_served
        && (enlistment.leadership_skill() >= config.leadership_threshold
            || enlistment.best_combat_skill() >= config.combat_threshold)
}

/// Chance the sitting leader is displaced after `weeks` of waiting
pub fn escalation_chance(config: &EscalationConfig, weeks: u32) -> f32 {
    (config.base_chance + weeks as f32 * config.weekly_increment).min(config.max_chance)
}

impl<D: Dice> LanceSession<D> {
    /// Re-derive the readiness flag; the timer starts on the rising edge
    pub fn evaluate_promotion_readiness(&mut self, host: &mut dyn LanceHost, now: CampaignTime) {
        if self.state.promotion_offered || self.state.player_leads_lance {
            return;
        }

        let ready = host
            .enlistment()
            .map(|e| meets_promotion_requirements(&self.config.promotion, e))
            .unwrap_or(false);

        match (self.state.player_ready_for_promotion, ready) {
            (false, true) => {
                self.state.player_ready_for_promotion = true;
                self.state.escalation_started = Some(now);
                self.state.weeks_waiting = 0;
                tracing::info!("Player ready for promotion to lance leader");
                self.emit(host, LanceEvent::PromotionReady { since: now });
            }
            (true, false) => {
                self.state.player_ready_for_promotion = false;
                self.state.escalation_started = None;
                self.state.weeks_waiting = 0;
            }
            _ => {}
        }
    }

    /// Roll for escalation once per newly completed week of waiting
    pub fn check_escalation(&mut self, host: &mut dyn LanceHost, now: CampaignTime) {
        if !self.state.player_ready_for_promotion || self.roster.leader().is_none() {
            return;
        }

        let started = *self.state.escalation_started.get_or_insert(now);
        let weeks = now.weeks_since(started);
        if weeks <= self.state.weeks_waiting {
            return;
        }
        self.state.weeks_waiting = weeks;

        let chance = escalation_chance(&self.config.escalation, weeks);
        tracing::debug!("Escalation check after {} weeks at {:.2}", weeks, chance);
        if self.dice.chance(chance) {
            self.trigger_escalation(host, now);
        }
    }

    /// Take up the offered leader post
    pub fn accept_promotion(&mut self, host: &mut dyn LanceHost) -> bool {
        if !self.state.promotion_offered {
            return false;
        }
        self.state.promotion_offered = false;
        self.state.player_leads_lance = true;
        tracing::info!("Player accepted command of the lance");
        self.emit(host, LanceEvent::PromotionAccepted);
        true
    }

    /// Turn the offer down; an NPC is appointed in the player's place
    pub fn decline_promotion(&mut self, host: &mut dyn LanceHost) -> Option<MemberId> {
        if !self.state.promotion_offered {
            return None;
        }
        self.state.promotion_offered = false;
        self.emit(host, LanceEvent::PromotionDeclined);

        let now = host.clock().now();
        let id = generate_replacement_leader(&mut self.roster, &self.config.roster, &mut self.dice, now);
        tracing::info!("Player declined command; {} appointed instead", id);
        self.emit(host, LanceEvent::LeaderAppointed { member: id });
        Some(id)
    }
}
