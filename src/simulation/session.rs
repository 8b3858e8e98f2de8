//! Simulation context for one enlistment
//!
//! A `LanceSession` is created when the player enlists and dropped on
//! discharge. It owns the roster, the simulation scalars, the tuning config
//! and the dice; host collaborators are lent to each call instead of being
//! stored.

use serde::{Deserialize, Serialize};

use crate::core::calendar::CampaignTime;
use crate::core::config::LanceConfig;
use crate::core::dice::{Dice, SeededDice};
use crate::core::error::Result;
use crate::core::types::MemberId;
use crate::host::LanceHost;
use crate::lance::generation::generate_initial_roster;
use crate::lance::member::LanceMember;
use crate::lance::relation::CoverResponse;
use crate::lance::roster::{LanceRoster, RosterSummary};
use crate::schedule::facade::ScheduleFacade;
use crate::simulation::escalation::EscalationPath;
use crate::simulation::events::LanceEvent;

/// Scalars carried between daily passes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub player_ready_for_promotion: bool,
    pub weeks_waiting: u32,
    pub selected_path: Option<EscalationPath>,
    pub escalation_started: Option<CampaignTime>,
    pub escalation_in_progress: bool,
    pub last_daily_process: Option<CampaignTime>,
    /// Members awaiting a memorial, in order of death
    pub pending_memorials: Vec<MemberId>,
    /// Initial roster has been generated
    pub initialized: bool,
    /// A vacancy was granted to the player and awaits an answer
    pub promotion_offered: bool,
    pub player_leads_lance: bool,
}

/// Persisted shape of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanceSave {
    pub members: Vec<LanceMember>,
    pub next_member_id: u32,
    pub state: SimulationState,
}

impl LanceSave {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct LanceSession<D: Dice = SeededDice> {
    pub(crate) config: LanceConfig,
    pub(crate) roster: LanceRoster,
    pub(crate) state: SimulationState,
    pub(crate) dice: D,
    pub(crate) events: Vec<LanceEvent>,
}

impl LanceSession<SeededDice> {
    /// Start a session for a fresh enlistment
    pub fn enlist(config: LanceConfig, seed: u64) -> Self {
        Self::with_dice(config, SeededDice::new(seed))
    }
}

impl<D: Dice> LanceSession<D> {
    pub fn with_dice(config: LanceConfig, dice: D) -> Self {
        Self {
            config,
            roster: LanceRoster::new(),
            state: SimulationState::default(),
            dice,
            events: Vec::new(),
        }
    }

    /// Adopt an already populated roster
    pub fn with_roster(config: LanceConfig, roster: LanceRoster, dice: D) -> Self {
        let mut session = Self::with_dice(config, dice);
        session.state.initialized = !roster.is_empty();
        session.roster = roster;
        session
    }

    pub fn restore(config: LanceConfig, save: LanceSave, dice: D) -> Self {
        Self {
            config,
            roster: LanceRoster::from_parts(save.members, save.next_member_id),
            state: save.state,
            dice,
            events: Vec::new(),
        }
    }

    pub fn save(&self) -> LanceSave {
        LanceSave {
            members: self.roster.all().to_vec(),
            next_member_id: self.roster.next_id(),
            state: self.state.clone(),
        }
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &LanceConfig {
        &self.config
    }

    pub fn roster(&self) -> &LanceRoster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut LanceRoster {
        &mut self.roster
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    pub fn get_member(&self, id: MemberId) -> Option<&LanceMember> {
        self.roster.get(id)
    }

    pub fn summary(&self) -> RosterSummary {
        self.roster.summary()
    }

    pub fn last_daily_process(&self) -> Option<CampaignTime> {
        self.state.last_daily_process
    }

    /// Read-only surface for the duty scheduler
    pub fn schedule(&self) -> ScheduleFacade<'_> {
        ScheduleFacade::new(&self.roster, &self.config.schedule, &self.config.morale)
    }

    // === LIFECYCLE ===

    /// Generate the lance on first use; deferred until the player is enlisted
    pub fn ensure_roster(&mut self, host: &mut dyn LanceHost) -> bool {
        if self.state.initialized {
            return true;
        }
        if !host.is_enlisted() {
            return false;
        }

        let now = host.clock().now();
        let ids = generate_initial_roster(&mut self.roster, &self.config.roster, &mut self.dice, now);
        self.state.initialized = true;
        if let Some(&leader) = ids.first() {
            self.emit(host, LanceEvent::RosterGenerated { size: ids.len(), leader });
        }
        true
    }

    // === PLAYER INTERACTIONS ===

    /// Record the player's answer to a cover request
    ///
    /// Returns the member's new relation score, or `None` for an unknown or
    /// dead member.
    pub fn record_cover_response(&mut self, id: MemberId, response: CoverResponse) -> Option<i32> {
        let relation = self
            .roster
            .get_mut(id)?
            .record_cover_response(response, &self.config.cover)?;
        tracing::debug!("Cover request from {} {:?}, relation now {}", id, response, relation);
        Some(relation)
    }

    /// Send an available member on leave for `days`
    pub fn grant_leave(&mut self, host: &dyn LanceHost, id: MemberId, days: f64) -> bool {
        let until = host.clock().days_from_now(days);
        let granted = self
            .roster
            .get_mut(id)
            .map(|m| m.grant_leave(until))
            .unwrap_or(false);
        if !granted {
            tracing::warn!("Leave request for {} ignored: member absent or unavailable", id);
        }
        granted
    }

    // === EVENTS ===

    pub(crate) fn emit(&mut self, host: &mut dyn LanceHost, event: LanceEvent) {
        if event.is_player_facing() {
            host.notify(&event);
        }
        self.events.push(event);
    }

    /// Events raised outside a daily pass or battle, such as promotion answers
    pub fn take_events(&mut self) -> Vec<LanceEvent> {
        std::mem::take(&mut self.events)
    }
}
