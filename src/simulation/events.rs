//! Events produced by the lance simulation

use serde::{Deserialize, Serialize};

use crate::core::calendar::CampaignTime;
use crate::core::types::MemberId;
use crate::lance::health::{DeathCause, HealthState};
use crate::simulation::escalation::{EscalationPath, VacancyReason};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LanceEvent {
    // Roster
    RosterGenerated { size: usize, leader: MemberId },

    // Health
    Injured { member: MemberId, severity: HealthState, recovery_days: f64 },
    Recovered { member: MemberId, health: HealthState },
    Died { member: MemberId, cause: DeathCause },
    MemorialHeld { member: MemberId, name: String },

    // Activity and relationship
    LeaveEnded { member: MemberId },
    CoverRequested { member: MemberId },

    // Battle
    BattleEndured { participants: usize, severity: f32 },

    // Leadership
    PromotionReady { since: CampaignTime },
    EscalationTriggered { path: EscalationPath, leader: MemberId, weeks_waiting: u32 },
    VacancyOpened { reason: VacancyReason },
    LeaderAppointed { member: MemberId },
    PromotionGranted,
    PromotionAccepted,
    PromotionDeclined,
}

impl LanceEvent {
    /// Events the player should hear about directly
    pub fn is_player_facing(&self) -> bool {
        matches!(
            self,
            LanceEvent::Died { .. }
                | LanceEvent::MemorialHeld { .. }
                | LanceEvent::VacancyOpened { .. }
                | LanceEvent::LeaderAppointed { .. }
                | LanceEvent::PromotionGranted
                | LanceEvent::PromotionAccepted
        )
    }
}
