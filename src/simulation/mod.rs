pub mod battle;
pub mod daily;
pub mod escalation;
pub mod events;
pub mod promotion;
pub mod session;

pub use battle::{battle_severity, BattleReport, EncounterKind};
pub use daily::{complication_death_chance, cover_request_chance, daily_injury_chance, DailyConditions};
pub use escalation::{path_weights, select_path, EscalationPath, LeaderContext, VacancyReason};
pub use events::LanceEvent;
pub use promotion::{escalation_chance, meets_promotion_requirements};
pub use session::{LanceSave, LanceSession, SimulationState};
