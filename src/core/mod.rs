pub mod calendar;
pub mod config;
pub mod dice;
pub mod error;
pub mod types;

pub use calendar::{CampaignTime, Clock, ManualClock};
pub use config::LanceConfig;
pub use dice::{pick_weighted, Dice, ScriptedDice, SeededDice};
pub use error::{LanceError, Result};
pub use types::{Formation, MemberId, RankTier};
