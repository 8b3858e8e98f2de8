//! Read-only view of the lance for the duty scheduler
//!
//! The scheduler never touches members directly. It asks this facade who
//! can work, what to do when someone can't, and reports duties that went
//! unfilled so the camp's morale can take the hit.

use serde::{Deserialize, Serialize};

use crate::core::config::{MoraleConfig, ScheduleConfig};
use crate::core::types::MemberId;
use crate::host::{drain_need, LanceHost, NeedKind};
use crate::lance::member::LanceMember;
use crate::lance::roster::LanceRoster;

/// How a modification request should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModificationKind {
    /// Another member takes the duty
    AssignReplacement,
    /// Nobody else is free; the player is asked to cover
    PlayerCover,
    /// The requester is fit after all; just take them off the duty
    RemoveFromDuty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationRequest {
    pub requester: MemberId,
    pub reason: String,
    pub kind: ModificationKind,
    pub replacement: Option<MemberId>,
    pub priority: u8,
}

/// Who should take over a duty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assignee {
    Member(MemberId),
    Player,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReassignmentSuggestion {
    pub duty_id: String,
    pub assignee: Assignee,
    pub confidence: f32,
}

pub struct ScheduleFacade<'a> {
    roster: &'a LanceRoster,
    config: &'a ScheduleConfig,
    morale: &'a MoraleConfig,
}

impl<'a> ScheduleFacade<'a> {
    pub fn new(roster: &'a LanceRoster, config: &'a ScheduleConfig, morale: &'a MoraleConfig) -> Self {
        Self { roster, config, morale }
    }

    /// Fraction of living members fit for duty; 1.0 for an empty lance
    pub fn availability_ratio(&self) -> f32 {
        let active = self.roster.active_count();
        if active == 0 {
            return 1.0;
        }
        self.roster.available_count() as f32 / active as f32
    }

    /// Living members who cannot work right now
    pub fn unavailable_member_ids(&self) -> Vec<MemberId> {
        self.roster
            .active()
            .filter(|m| !m.is_available_for_duty())
            .map(|m| m.id)
            .collect()
    }

    pub fn can_cover_duty(&self, _duty_id: &str) -> bool {
        self.roster.available().next().is_some()
    }

    /// Classify a member's request to be taken off a duty
    ///
    /// Returns `None` for unknown or dead members.
    pub fn request_modification(&self, member: MemberId, reason: &str) -> Option<ModificationRequest> {
        let requester = self.roster.get(member).filter(|m| m.is_active())?;
        let priority = if requester.is_lance_leader() {
            self.config.leader_priority
        } else {
            self.config.member_priority
        };

        let (kind, replacement) = if requester.is_available_for_duty() {
            (ModificationKind::RemoveFromDuty, None)
        } else {
            match self.best_by_rank(member) {
                Some(candidate) => (ModificationKind::AssignReplacement, Some(candidate.id)),
                None => (ModificationKind::PlayerCover, None),
            }
        };

        tracing::debug!("{} asked off duty ({}): {:?}", member, reason, kind);
        Some(ModificationRequest {
            requester: member,
            reason: reason.to_string(),
            kind,
            replacement,
            priority,
        })
    }

    /// Drop camp morale for a duty nobody filled
    ///
    /// Returns the new morale, or `None` when no scheduler is attached.
    pub fn notify_unfulfilled_duty(&self, host: &mut dyn LanceHost, duty_id: &str, reason: &str) -> Option<f32> {
        let scheduler = host.scheduler_mut()?;
        let morale = drain_need(scheduler, NeedKind::Morale, self.morale.unfulfilled_duty_penalty);
        tracing::debug!("Duty {} unfulfilled ({}), morale now {:.0}", duty_id, reason, morale);
        Some(morale)
    }

    /// Suggest who should take over `original`'s duty
    ///
    /// Same formation beats rank; rank breaks ties. With nobody free the
    /// player is suggested.
    pub fn reassignment_suggestion(&self, original: MemberId, duty_id: &str) -> ReassignmentSuggestion {
        let formation = self.roster.get(original).map(|m| m.formation);
        let mut candidates: Vec<&LanceMember> = self.roster.available().filter(|m| m.id != original).collect();
        candidates.sort_by(|a, b| {
            let a_match = Some(a.formation) == formation;
            let b_match = Some(b.formation) == formation;
            b_match.cmp(&a_match).then(b.rank_tier().cmp(&a.rank_tier()))
        });

        let (assignee, confidence) = match candidates.first() {
            Some(best) if Some(best.formation) == formation => {
                (Assignee::Member(best.id), self.config.formation_match_confidence)
            }
            Some(best) => (Assignee::Member(best.id), self.config.rank_match_confidence),
            None => (Assignee::Player, self.config.player_cover_confidence),
        };

        ReassignmentSuggestion {
            duty_id: duty_id.to_string(),
            assignee,
            confidence,
        }
    }

    /// Highest-ranked free member other than `excluded`; earliest joiner wins ties
    fn best_by_rank(&self, excluded: MemberId) -> Option<&'a LanceMember> {
        self.roster
            .available()
            .filter(|m| m.id != excluded)
            .fold(None, |best: Option<&'a LanceMember>, m| match best {
                Some(b) if b.rank_tier() >= m.rank_tier() => Some(b),
                _ => Some(m),
            })
    }
}
