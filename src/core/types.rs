//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for lance members
///
/// Allocated from a monotonically increasing counter owned by the roster,
/// so an id is never handed out twice within one enlistment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl MemberId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Battlefield role of a lance member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formation {
    Infantry,
    Archer,
    Cavalry,
    HorseArcher,
}

impl Formation {
    pub fn all() -> &'static [Formation] {
        &[
            Formation::Infantry,
            Formation::Archer,
            Formation::Cavalry,
            Formation::HorseArcher,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Formation::Infantry => "infantry",
            Formation::Archer => "archer",
            Formation::Cavalry => "cavalry",
            Formation::HorseArcher => "horsearcher",
        }
    }
}

/// Rank tier of a lance member (1 = recruit, 6 = promoted out of the lance)
pub type RankTier = u8;

pub const MIN_RANK_TIER: RankTier = 1;
pub const MAX_RANK_TIER: RankTier = 6;
