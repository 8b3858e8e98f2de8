//! Member registry
//!
//! Owns every member record the lance has ever had, in join order. Dead
//! members stay in the list for historical queries but drop out of the
//! active and available views.

use serde::{Deserialize, Serialize};

use crate::core::types::MemberId;
use crate::lance::member::LanceMember;

/// `(total, available, injured, on_leave)` over living members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterSummary {
    pub total: usize,
    pub available: usize,
    pub injured: usize,
    pub on_leave: usize,
}

impl RosterSummary {
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.total, self.available, self.injured, self.on_leave)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanceRoster {
    members: Vec<LanceMember>,
    next_id: u32,
}

impl LanceRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records
    ///
    /// The id counter is bumped past every stored id so ids are never reused.
    pub fn from_parts(members: Vec<LanceMember>, next_id: u32) -> Self {
        let floor = members.iter().map(|m| m.id.0 + 1).max().unwrap_or(0);
        Self {
            members,
            next_id: next_id.max(floor),
        }
    }

    pub fn allocate_id(&mut self) -> MemberId {
        let id = MemberId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Append a member; if it carries the leader flag, it becomes the sole leader
    pub fn add(&mut self, member: LanceMember) -> MemberId {
        let id = member.id;
        let is_leader = member.is_lance_leader();
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
        self.members.push(member);
        if is_leader {
            self.install_leader(id);
        }
        id
    }

    /// Make `id` the only living member with the leader flag
    pub fn install_leader(&mut self, id: MemberId) -> bool {
        let eligible = self.get(id).map(|m| m.is_active()).unwrap_or(false);
        if !eligible {
            return false;
        }
        for member in &mut self.members {
            member.set_leader(member.id == id);
        }
        true
    }

    /// Clear the leader flag; returns the former leader, if any
    pub fn clear_leader(&mut self) -> Option<MemberId> {
        let id = self.leader()?.id;
        if let Some(member) = self.get_mut(id) {
            member.set_leader(false);
        }
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Every record, living and dead, in join order
    pub fn all(&self) -> &[LanceMember] {
        &self.members
    }

    pub fn get(&self, id: MemberId) -> Option<&LanceMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut LanceMember> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    /// Living members
    pub fn active(&self) -> impl Iterator<Item = &LanceMember> {
        self.members.iter().filter(|m| m.is_active())
    }

    /// Members fit for duty right now
    pub fn available(&self) -> impl Iterator<Item = &LanceMember> {
        self.members.iter().filter(|m| m.is_available_for_duty())
    }

    /// The fallen, kept for memorials and history
    pub fn fallen(&self) -> impl Iterator<Item = &LanceMember> {
        self.members.iter().filter(|m| m.is_dead())
    }

    pub fn active_ids(&self) -> Vec<MemberId> {
        self.active().map(|m| m.id).collect()
    }

    pub fn available_ids(&self) -> Vec<MemberId> {
        self.available().map(|m| m.id).collect()
    }

    pub fn leader(&self) -> Option<&LanceMember> {
        self.active().find(|m| m.is_lance_leader())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    pub fn summary(&self) -> RosterSummary {
        let mut summary = RosterSummary::default();
        for member in self.active() {
            summary.total += 1;
            if member.is_available_for_duty() {
                summary.available += 1;
            }
            if member.is_injured() {
                summary.injured += 1;
            }
            if member.is_on_leave() {
                summary.on_leave += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::CampaignTime;
    use crate::core::types::Formation;
    use crate::lance::health::{DeathCause, HealthState};

    fn member(roster: &mut LanceRoster, tier: u8) -> MemberId {
        let id = roster.allocate_id();
        roster.add(LanceMember::new(
            id,
            format!("Member {}", id.0),
            Formation::Infantry,
            tier,
            CampaignTime::default(),
            id.0 as u64,
        ))
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut roster = LanceRoster::new();
        let a = member(&mut roster, 1);
        let b = member(&mut roster, 1);
        assert_ne!(a, b);

        let mut restored = LanceRoster::from_parts(roster.all().to_vec(), 0);
        let c = restored.allocate_id();
        assert!(c.0 > b.0);
    }

    #[test]
    fn test_install_leader_is_exclusive() {
        let mut roster = LanceRoster::new();
        let a = member(&mut roster, 5);
        let b = member(&mut roster, 3);

        assert!(roster.install_leader(a));
        assert!(roster.install_leader(b));

        let leaders: Vec<_> = roster.all().iter().filter(|m| m.is_lance_leader()).collect();
        assert_eq!(leaders.len(), 1);
        assert_eq!(roster.leader().map(|m| m.id), Some(b));
    }

    #[test]
    fn test_dead_member_cannot_lead() {
        let mut roster = LanceRoster::new();
        let a = member(&mut roster, 5);
        roster
            .get_mut(a)
            .unwrap()
            .mark_dead(DeathCause::CombatWounds, CampaignTime::default());
        assert!(!roster.install_leader(a));
        assert!(roster.leader().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut roster = LanceRoster::new();
        let healthy = member(&mut roster, 1);
        let minor = member(&mut roster, 1);
        let major = member(&mut roster, 1);
        let leave = member(&mut roster, 1);
        let dead = member(&mut roster, 1);
        let now = CampaignTime::default();

        roster.get_mut(minor).unwrap().apply_injury(HealthState::MinorInjury, 2.0, now);
        roster.get_mut(major).unwrap().apply_injury(HealthState::MajorInjury, 8.0, now);
        roster.get_mut(leave).unwrap().grant_leave(now.plus_days(5.0));
        roster.get_mut(dead).unwrap().mark_dead(DeathCause::KilledInBattle, now);

        let summary = roster.summary();
        assert_eq!(summary.as_tuple(), (4, 2, 2, 1));
        assert!(roster.available_ids().contains(&healthy));
        assert_eq!(roster.fallen().count(), 1);
        assert_eq!(roster.len(), 5);
    }

    #[test]
    fn test_unknown_lookup_is_none() {
        let roster = LanceRoster::new();
        assert!(roster.get(MemberId(42)).is_none());
    }
}
