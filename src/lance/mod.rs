//! Lance members and the roster that owns them

pub mod generation;
pub mod health;
pub mod member;
pub mod names;
pub mod relation;
pub mod roster;

pub use generation::{generate_initial_roster, generate_replacement_leader};
pub use health::{ActivityState, DeathCause, HealthEvent, HealthState};
pub use member::LanceMember;
pub use relation::{CoverResponse, RelationshipCategory};
pub use roster::{LanceRoster, RosterSummary};
