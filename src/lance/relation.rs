//! Member-to-player relationship

use serde::{Deserialize, Serialize};

pub const RELATION_MIN: i32 = -100;
pub const RELATION_MAX: i32 = 100;

/// Clamp a raw relation score into the valid range
pub fn clamp_relation(score: i32) -> i32 {
    score.clamp(RELATION_MIN, RELATION_MAX)
}

/// How a member feels about the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipCategory {
    Hostile,  // score < -30
    Wary,     // -30 <= score < -10
    Neutral,  // -10 <= score < 10
    Friendly, // 10 <= score < 30
    Trusted,  // score >= 30
}

impl RelationshipCategory {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s < -30 => RelationshipCategory::Hostile,
            s if s < -10 => RelationshipCategory::Wary,
            s if s < 10 => RelationshipCategory::Neutral,
            s if s < 30 => RelationshipCategory::Friendly,
            _ => RelationshipCategory::Trusted,
        }
    }
}

/// The player's answer to a cover request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverResponse {
    Accepted,
    Declined,
}
