//! Health and activity state machines
//!
//! Transitions are pure `(state, event) -> state` functions so the rules can
//! be tested without a roster or a clock.

use serde::{Deserialize, Serialize};

/// Physical condition of a member, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthState {
    Healthy,
    MinorInjury,
    MajorInjury,
    Incapacitated,
    Dead,
}

/// Something that happens to a member's body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEvent {
    /// A new injury of the given severity
    Injured(HealthState),
    /// The current recovery window ran out
    RecoveryElapsed,
    Killed,
}

impl HealthState {
    pub fn is_injured(&self) -> bool {
        matches!(
            self,
            HealthState::MinorInjury | HealthState::MajorInjury | HealthState::Incapacitated
        )
    }

    pub fn is_dead(&self) -> bool {
        *self == HealthState::Dead
    }

    /// Injuries at or past this point send the member to the sick bay
    pub fn requires_sick_bay(&self) -> bool {
        *self >= HealthState::MajorInjury && *self != HealthState::Dead
    }

    /// One step along the recovery curve
    pub fn recovered(self) -> HealthState {
        match self {
            HealthState::Incapacitated => HealthState::MajorInjury,
            HealthState::MajorInjury => HealthState::MinorInjury,
            HealthState::MinorInjury | HealthState::Healthy => HealthState::Healthy,
            HealthState::Dead => HealthState::Dead,
        }
    }

    /// Apply an event. `Dead` absorbs everything.
    pub fn transition(self, event: HealthEvent) -> HealthState {
        if self.is_dead() {
            return HealthState::Dead;
        }
        match event {
            HealthEvent::Injured(severity) => {
                // An injury never improves the current condition
                self.max(severity).min(HealthState::Incapacitated)
            }
            HealthEvent::RecoveryElapsed => self.recovered(),
            HealthEvent::Killed => HealthState::Dead,
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HealthState::Healthy => "healthy",
            HealthState::MinorInjury => "lightly wounded",
            HealthState::MajorInjury => "badly wounded",
            HealthState::Incapacitated => "incapacitated",
            HealthState::Dead => "dead",
        };
        f.write_str(label)
    }
}

/// What a member is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityState {
    OnDuty,
    OffDuty,
    SickBay,
    OnLeave,
    Detached,
}

impl ActivityState {
    /// Activities that keep a member off the duty roster regardless of health
    pub fn blocks_duty(&self) -> bool {
        matches!(
            self,
            ActivityState::SickBay | ActivityState::OnLeave | ActivityState::Detached
        )
    }

    /// Reconcile activity with a (new) health state
    ///
    /// Serious injuries force the sick bay, death detaches the member for
    /// good, and a full recovery returns the member to duty unless they are
    /// away on leave or detached from the lance.
    pub fn settle(self, health: HealthState) -> ActivityState {
        match health {
            HealthState::Dead => ActivityState::Detached,
            h if h.requires_sick_bay() => ActivityState::SickBay,
            HealthState::Healthy => match self {
                ActivityState::OnLeave | ActivityState::Detached => self,
                _ => ActivityState::OnDuty,
            },
            _ => self,
        }
    }
}

/// Why a member died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    InjuryComplications,
    CombatWounds,
    KilledInBattle,
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DeathCause::InjuryComplications => "complications from injury",
            DeathCause::CombatWounds => "combat wounds",
            DeathCause::KilledInBattle => "killed in battle",
        };
        f.write_str(text)
    }
}

/// Duty availability, derived from both state machines
pub fn is_available(health: HealthState, activity: ActivityState) -> bool {
    health < HealthState::MajorInjury && !activity.blocks_duty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(HealthState::Healthy < HealthState::MinorInjury);
        assert!(HealthState::MinorInjury < HealthState::MajorInjury);
        assert!(HealthState::MajorInjury < HealthState::Incapacitated);
        assert!(HealthState::Incapacitated < HealthState::Dead);
    }

    #[test]
    fn test_recovery_curve() {
        let mut state = HealthState::Incapacitated;
        state = state.transition(HealthEvent::RecoveryElapsed);
        assert_eq!(state, HealthState::MajorInjury);
        state = state.transition(HealthEvent::RecoveryElapsed);
        assert_eq!(state, HealthState::MinorInjury);
        state = state.transition(HealthEvent::RecoveryElapsed);
        assert_eq!(state, HealthState::Healthy);
        state = state.transition(HealthEvent::RecoveryElapsed);
        assert_eq!(state, HealthState::Healthy);
    }

    #[test]
    fn test_injury_never_improves() {
        let state = HealthState::MajorInjury.transition(HealthEvent::Injured(HealthState::MinorInjury));
        assert_eq!(state, HealthState::MajorInjury);

        let state = HealthState::MinorInjury.transition(HealthEvent::Injured(HealthState::Incapacitated));
        assert_eq!(state, HealthState::Incapacitated);
    }

    #[test]
    fn test_injury_cannot_kill() {
        let state = HealthState::Healthy.transition(HealthEvent::Injured(HealthState::Dead));
        assert_eq!(state, HealthState::Incapacitated);
    }

    #[test]
    fn test_dead_is_terminal() {
        for event in [
            HealthEvent::Injured(HealthState::MinorInjury),
            HealthEvent::RecoveryElapsed,
            HealthEvent::Killed,
        ] {
            assert_eq!(HealthState::Dead.transition(event), HealthState::Dead);
        }
    }

    #[test]
    fn test_settle_forces_sick_bay() {
        assert_eq!(
            ActivityState::OnDuty.settle(HealthState::MajorInjury),
            ActivityState::SickBay
        );
        assert_eq!(
            ActivityState::OnLeave.settle(HealthState::Incapacitated),
            ActivityState::SickBay
        );
        // Minor injuries leave the activity alone
        assert_eq!(
            ActivityState::SickBay.settle(HealthState::MinorInjury),
            ActivityState::SickBay
        );
        assert_eq!(
            ActivityState::OnDuty.settle(HealthState::MinorInjury),
            ActivityState::OnDuty
        );
    }

    #[test]
    fn test_settle_on_recovery() {
        assert_eq!(
            ActivityState::SickBay.settle(HealthState::Healthy),
            ActivityState::OnDuty
        );
        assert_eq!(
            ActivityState::OffDuty.settle(HealthState::Healthy),
            ActivityState::OnDuty
        );
        assert_eq!(
            ActivityState::Detached.settle(HealthState::Healthy),
            ActivityState::Detached
        );
        assert_eq!(
            ActivityState::OnLeave.settle(HealthState::Healthy),
            ActivityState::OnLeave
        );
    }

    #[test]
    fn test_settle_dead_detaches() {
        assert_eq!(
            ActivityState::OnDuty.settle(HealthState::Dead),
            ActivityState::Detached
        );
    }

    #[test]
    fn test_availability() {
        assert!(is_available(HealthState::Healthy, ActivityState::OnDuty));
        assert!(is_available(HealthState::MinorInjury, ActivityState::OffDuty));
        assert!(!is_available(HealthState::MajorInjury, ActivityState::OnDuty));
        assert!(!is_available(HealthState::Healthy, ActivityState::SickBay));
        assert!(!is_available(HealthState::Healthy, ActivityState::OnLeave));
        assert!(!is_available(HealthState::Healthy, ActivityState::Detached));
        assert!(!is_available(HealthState::Dead, ActivityState::OnDuty));
    }

    #[test]
    fn test_death_cause_text() {
        assert_eq!(DeathCause::InjuryComplications.to_string(), "complications from injury");
        assert_eq!(DeathCause::CombatWounds.to_string(), "combat wounds");
        assert_eq!(DeathCause::KilledInBattle.to_string(), "killed in battle");
    }
}
