//! Collaborators owned by the surrounding campaign
//!
//! The lance core never stores these; the host hands them over for the
//! duration of each call through `LanceHost`. Any of them may be missing,
//! in which case the operations that need them quietly do nothing.

pub mod standalone;

use serde::{Deserialize, Serialize};

use crate::core::calendar::Clock;
use crate::core::types::MemberId;
use crate::simulation::events::LanceEvent;

pub use standalone::{DutyBoard, PlayerRecord, StandaloneHost};

/// The player's enlistment with a lord
pub trait Enlistment {
    fn is_enlisted(&self) -> bool;
    /// Player's enlisted tier
    fn tier(&self) -> u8;
    fn days_served(&self) -> u32;
    /// Whether the lord's faction is currently at war
    fn lord_at_war(&self) -> bool;
    fn leadership_skill(&self) -> u32;
    /// Highest of the player's primary combat skills
    fn best_combat_skill(&self) -> u32;
}

/// Named 0-100 gauges kept by the duty scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    Rest,
    Equipment,
    Morale,
}

/// Kind of activity the scheduler has a member assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduledActivity {
    TrainingDrill,
    Patrol,
    SentryWatch,
    Foraging,
    Labor,
    Rest,
}

/// External duty scheduler, as far as the lance core needs it
pub trait DutyScheduler {
    fn current_activity(&self, member: MemberId) -> Option<ScheduledActivity>;
    fn need(&self, need: NeedKind) -> f32;
    fn set_need(&mut self, need: NeedKind, value: f32);
}

/// Lower a gauge, never below zero
pub fn drain_need(scheduler: &mut dyn DutyScheduler, need: NeedKind, amount: f32) -> f32 {
    let value = (scheduler.need(need) - amount).max(0.0);
    scheduler.set_need(need, value);
    value
}

/// Everything the host lends the lance core for one call
pub trait LanceHost {
    fn clock(&self) -> &dyn Clock;
    fn enlistment(&self) -> Option<&dyn Enlistment>;
    fn scheduler(&self) -> Option<&dyn DutyScheduler>;
    fn scheduler_mut(&mut self) -> Option<&mut dyn DutyScheduler>;
    /// Player-facing notification sink
    fn notify(&mut self, event: &LanceEvent);

    fn is_enlisted(&self) -> bool {
        self.enlistment().map(|e| e.is_enlisted()).unwrap_or(false)
    }
}
