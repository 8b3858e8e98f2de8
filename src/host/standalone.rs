//! In-memory host for tests and the command-line runner

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::calendar::{CampaignTime, Clock, ManualClock};
use crate::core::types::MemberId;
use crate::host::{DutyScheduler, Enlistment, LanceHost, NeedKind, ScheduledActivity};
use crate::simulation::events::LanceEvent;

/// The player's service record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub enlisted: bool,
    pub tier: u8,
    pub days_served: u32,
    pub at_war: bool,
    pub leadership: u32,
    pub best_combat: u32,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            enlisted: true,
            tier: 1,
            days_served: 0,
            at_war: false,
            leadership: 10,
            best_combat: 20,
        }
    }
}

impl PlayerRecord {
    /// A veteran who meets every promotion requirement
    pub fn veteran() -> Self {
        Self {
            enlisted: true,
            tier: 4,
            days_served: 120,
            at_war: false,
            leadership: 60,
            best_combat: 80,
        }
    }
}

impl Enlistment for PlayerRecord {
    fn is_enlisted(&self) -> bool {
        self.enlisted
    }

    fn tier(&self) -> u8 {
        self.tier
    }

    fn days_served(&self) -> u32 {
        self.days_served
    }

    fn lord_at_war(&self) -> bool {
        self.at_war
    }

    fn leadership_skill(&self) -> u32 {
        self.leadership
    }

    fn best_combat_skill(&self) -> u32 {
        self.best_combat
    }
}

/// Needs gauges plus per-member assignments
#[derive(Debug, Clone)]
pub struct DutyBoard {
    pub rest: f32,
    pub equipment: f32,
    pub morale: f32,
    pub assignments: AHashMap<MemberId, ScheduledActivity>,
}

impl Default for DutyBoard {
    fn default() -> Self {
        Self {
            rest: 70.0,
            equipment: 70.0,
            morale: 70.0,
            assignments: AHashMap::new(),
        }
    }
}

impl DutyBoard {
    pub fn assign(&mut self, member: MemberId, activity: ScheduledActivity) {
        self.assignments.insert(member, activity);
    }
}

impl DutyScheduler for DutyBoard {
    fn current_activity(&self, member: MemberId) -> Option<ScheduledActivity> {
        self.assignments.get(&member).copied()
    }

    fn need(&self, need: NeedKind) -> f32 {
        match need {
            NeedKind::Rest => self.rest,
            NeedKind::Equipment => self.equipment,
            NeedKind::Morale => self.morale,
        }
    }

    fn set_need(&mut self, need: NeedKind, value: f32) {
        let value = value.clamp(0.0, 100.0);
        match need {
            NeedKind::Rest => self.rest = value,
            NeedKind::Equipment => self.equipment = value,
            NeedKind::Morale => self.morale = value,
        }
    }
}

/// Host with a manual clock, an optional player and an optional scheduler
#[derive(Debug, Clone, Default)]
pub struct StandaloneHost {
    pub clock: ManualClock,
    pub player: Option<PlayerRecord>,
    pub duties: Option<DutyBoard>,
    /// Player-facing notifications, oldest first
    pub inbox: Vec<LanceEvent>,
}

impl StandaloneHost {
    /// Enlisted player, default gauges, clock at day zero
    pub fn enlisted() -> Self {
        Self {
            clock: ManualClock::new(CampaignTime::from_days(0.0)),
            player: Some(PlayerRecord::default()),
            duties: Some(DutyBoard::default()),
            inbox: Vec::new(),
        }
    }

    pub fn with_player(mut self, player: PlayerRecord) -> Self {
        self.player = Some(player);
        self
    }

    pub fn now(&self) -> CampaignTime {
        self.clock.now()
    }

    pub fn advance_days(&mut self, days: f64) {
        self.clock.advance_days(days);
    }

    pub fn morale(&self) -> Option<f32> {
        self.duties.as_ref().map(|d| d.morale)
    }

    /// The player's record advances with the calendar
    pub fn serve_day(&mut self) {
        self.clock.advance_days(1.0);
        if let Some(player) = self.player.as_mut() {
            if player.enlisted {
                player.days_served += 1;
            }
        }
    }
}

impl LanceHost for StandaloneHost {
    fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    fn enlistment(&self) -> Option<&dyn Enlistment> {
        self.player.as_ref().map(|p| p as &dyn Enlistment)
    }

    fn scheduler(&self) -> Option<&dyn DutyScheduler> {
        self.duties.as_ref().map(|d| d as &dyn DutyScheduler)
    }

    fn scheduler_mut(&mut self) -> Option<&mut dyn DutyScheduler> {
        self.duties.as_mut().map(|d| d as &mut dyn DutyScheduler)
    }

    fn notify(&mut self, event: &LanceEvent) {
        self.inbox.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::drain_need;

    #[test]
    fn test_drain_need_floors_at_zero() {
        let mut board = DutyBoard::default();
        board.morale = 5.0;
        assert_eq!(drain_need(&mut board, NeedKind::Morale, 10.0), 0.0);
        assert_eq!(board.morale, 0.0);
    }

    #[test]
    fn test_missing_player_is_not_enlisted() {
        let mut host = StandaloneHost::enlisted();
        assert!(host.is_enlisted());
        host.player = None;
        assert!(!host.is_enlisted());
    }

    #[test]
    fn test_serve_day_advances_record() {
        let mut host = StandaloneHost::enlisted();
        host.serve_day();
        host.serve_day();
        assert_eq!(host.now().as_days(), 2.0);
        assert_eq!(host.player.as_ref().unwrap().days_served, 2);
    }
}
