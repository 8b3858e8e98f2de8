//! A single lance member
//!
//! State that carries invariants (health, activity, relation, leadership)
//! is private and only changes through methods. Every mutator is a no-op on
//! a dead member.

use serde::{Deserialize, Serialize};

use crate::core::calendar::CampaignTime;
use crate::core::config::{CoverConfig, RecoveryConfig};
use crate::core::types::{Formation, MemberId, RankTier, MAX_RANK_TIER, MIN_RANK_TIER};
use crate::lance::health::{is_available, ActivityState, DeathCause, HealthEvent, HealthState};
use crate::lance::relation::{clamp_relation, CoverResponse, RelationshipCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanceMember {
    // Identity
    pub id: MemberId,
    pub name: String,
    pub formation: Formation,
    /// Flavor seed, never read by simulation math
    pub seed: u64,

    // Health
    health: HealthState,
    recovery_due: Option<CampaignTime>,
    death_cause: Option<DeathCause>,
    died_at: Option<CampaignTime>,

    // Activity
    activity: ActivityState,
    leave_ends: Option<CampaignTime>,

    // Career
    rank_tier: RankTier,
    pub days_in_service: u32,
    pub battles_participated: u32,
    is_lance_leader: bool,
    pub eligible_for_promotion: bool,
    pub joined_at: CampaignTime,
    pub last_duty_id: Option<String>,
    /// 0 = robust, 5 = frail
    pub medical_risk: u8,

    // Relationship with the player
    relation: i32,
    pub favors_owed_to_player: u32,
    pub favors_owed_by_player: u32,
    pub cover_requests_made: u32,
    pub cover_requests_accepted: u32,
    pub last_cover_request: Option<CampaignTime>,
}

impl LanceMember {
    pub fn new(
        id: MemberId,
        name: String,
        formation: Formation,
        rank_tier: RankTier,
        joined_at: CampaignTime,
        seed: u64,
    ) -> Self {
        Self {
            id,
            name,
            formation,
            seed,
            health: HealthState::Healthy,
            recovery_due: None,
            death_cause: None,
            died_at: None,
            activity: ActivityState::OnDuty,
            leave_ends: None,
            rank_tier: rank_tier.clamp(MIN_RANK_TIER, MAX_RANK_TIER),
            days_in_service: 0,
            battles_participated: 0,
            is_lance_leader: false,
            eligible_for_promotion: false,
            joined_at,
            last_duty_id: None,
            medical_risk: 0,
            relation: 0,
            favors_owed_to_player: 0,
            favors_owed_by_player: 0,
            cover_requests_made: 0,
            cover_requests_accepted: 0,
            last_cover_request: None,
        }
    }

    // === QUERIES ===

    pub fn health(&self) -> HealthState {
        self.health
    }

    pub fn activity(&self) -> ActivityState {
        self.activity
    }

    pub fn recovery_due(&self) -> Option<CampaignTime> {
        self.recovery_due
    }

    pub fn leave_ends(&self) -> Option<CampaignTime> {
        self.leave_ends
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    pub fn died_at(&self) -> Option<CampaignTime> {
        self.died_at
    }

    pub fn rank_tier(&self) -> RankTier {
        self.rank_tier
    }

    pub fn is_lance_leader(&self) -> bool {
        self.is_lance_leader
    }

    pub fn relation(&self) -> i32 {
        self.relation
    }

    pub fn relationship(&self) -> RelationshipCategory {
        RelationshipCategory::from_score(self.relation)
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Alive, whether or not fit for duty
    pub fn is_active(&self) -> bool {
        !self.is_dead()
    }

    /// Derived on every call, never stored
    pub fn is_available_for_duty(&self) -> bool {
        is_available(self.health, self.activity)
    }

    pub fn is_injured(&self) -> bool {
        self.health.is_injured()
    }

    pub fn is_on_leave(&self) -> bool {
        self.activity == ActivityState::OnLeave
    }

    /// True while a previous request is younger than the cooldown
    pub fn cover_cooldown_active(&self, now: CampaignTime, cooldown_days: f64) -> bool {
        self.last_cover_request
            .map(|last| now.days_since(last) < cooldown_days)
            .unwrap_or(false)
    }

    // === HEALTH ===

    /// Apply an injury with the given recovery window
    ///
    /// Severity and due date only ever get worse: a lighter wound on top of
    /// a heavier one keeps the heavier state and the later deadline.
    pub fn apply_injury(&mut self, severity: HealthState, recovery_days: f64, now: CampaignTime) -> bool {
        if self.is_dead() || !severity.is_injured() {
            return false;
        }

        self.health = self.health.transition(HealthEvent::Injured(severity));
        let due = now.plus_days(recovery_days);
        self.recovery_due = Some(match self.recovery_due {
            Some(existing) if existing > due => existing,
            _ => due,
        });
        self.activity = self.activity.settle(self.health);
        true
    }

    /// Advance the recovery curve if the current window has elapsed
    ///
    /// Returns the new health state when a step was taken.
    pub fn process_recovery(&mut self, now: CampaignTime, config: &RecoveryConfig) -> Option<HealthState> {
        if !self.health.is_injured() {
            return None;
        }
        let due = self.recovery_due?;
        if !now.has_reached(due) {
            return None;
        }

        self.health = self.health.transition(HealthEvent::RecoveryElapsed);
        self.recovery_due = match self.health {
            HealthState::MajorInjury => Some(now.plus_days(config.major_followup_days)),
            HealthState::MinorInjury => Some(now.plus_days(config.minor_followup_days)),
            _ => None,
        };
        self.activity = self.activity.settle(self.health);
        Some(self.health)
    }

    /// Soft-destroy the member; the record stays for history
    pub fn mark_dead(&mut self, cause: DeathCause, now: CampaignTime) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = self.health.transition(HealthEvent::Killed);
        self.activity = self.activity.settle(self.health);
        self.death_cause = Some(cause);
        self.died_at = Some(now);
        self.recovery_due = None;
        self.leave_ends = None;
        self.is_lance_leader = false;
        true
    }

    // === ACTIVITY ===

    /// Change activity; a member in the sick bay stays there while hurt
    pub fn set_activity(&mut self, activity: ActivityState) -> bool {
        if self.is_dead() {
            return false;
        }
        self.activity = if self.health.requires_sick_bay() {
            ActivityState::SickBay
        } else {
            activity
        };
        if self.activity != ActivityState::OnLeave {
            self.leave_ends = None;
        }
        true
    }

    pub fn grant_leave(&mut self, until: CampaignTime) -> bool {
        if !self.is_available_for_duty() {
            return false;
        }
        self.activity = ActivityState::OnLeave;
        self.leave_ends = Some(until);
        true
    }

    /// Return from leave once the end date has passed
    pub fn end_leave_if_due(&mut self, now: CampaignTime) -> bool {
        if self.is_dead() || self.activity != ActivityState::OnLeave {
            return false;
        }
        match self.leave_ends {
            Some(end) if now.has_reached(end) => {
                self.activity = ActivityState::OnDuty;
                self.leave_ends = None;
                true
            }
            _ => false,
        }
    }

    // === CAREER ===

    pub fn add_service_day(&mut self) {
        if self.is_active() {
            self.days_in_service += 1;
        }
    }

    pub fn record_battle(&mut self) {
        if self.is_active() {
            self.battles_participated += 1;
        }
    }

    pub fn set_rank_tier(&mut self, tier: RankTier) {
        if self.is_active() {
            self.rank_tier = tier.clamp(MIN_RANK_TIER, MAX_RANK_TIER);
        }
    }

    /// Only the roster flips this flag, so it can keep a single leader
    pub(crate) fn set_leader(&mut self, leader: bool) {
        if self.is_active() || !leader {
            self.is_lance_leader = leader && self.is_active();
        }
    }

    /// Living members below the leader tier with enough seasoning
    pub fn refresh_promotion_eligibility(&mut self, leader_tier: RankTier) {
        if self.is_dead() {
            return;
        }
        let tier = self.rank_tier as u32;
        self.eligible_for_promotion = self.rank_tier < leader_tier
            && self.days_in_service >= tier * 60
            && self.battles_participated >= tier;
    }

    // === RELATIONSHIP ===

    pub fn modify_relation(&mut self, delta: i32) -> i32 {
        if self.is_active() {
            self.relation = clamp_relation(self.relation.saturating_add(delta));
        }
        self.relation
    }

    pub fn set_relation(&mut self, score: i32) {
        if self.is_active() {
            self.relation = clamp_relation(score);
        }
    }

    pub fn record_cover_request(&mut self, now: CampaignTime) {
        if self.is_active() {
            self.cover_requests_made += 1;
            self.last_cover_request = Some(now);
        }
    }

    /// Apply the player's answer; returns the new relation score
    pub fn record_cover_response(&mut self, response: CoverResponse, config: &CoverConfig) -> Option<i32> {
        if self.is_dead() {
            return None;
        }
        match response {
            CoverResponse::Accepted => {
                self.cover_requests_accepted += 1;
                self.favors_owed_to_player += config.accepted_favors;
                Some(self.modify_relation(config.accepted_relation))
            }
            CoverResponse::Declined => Some(self.modify_relation(config.declined_relation)),
        }
    }
}
