//! Procedural roster generation
//!
//! The first member of a fresh lance is always its leader. Everyone else
//! draws a rank tier and formation from weighted tables, and their service
//! record scales with the tier they drew.

use crate::core::calendar::CampaignTime;
use crate::core::config::{DayRange, RosterConfig};
use crate::core::dice::{pick_weighted, Dice};
use crate::core::types::{Formation, MemberId, RankTier};
use crate::lance::member::LanceMember;
use crate::lance::names::display_name;
use crate::lance::roster::LanceRoster;

/// Service record for a new member
struct Recruit {
    formation: Formation,
    rank_tier: RankTier,
    days_in_service: u32,
    battles: u32,
    relation: DayRange,
}

fn roll(dice: &mut impl Dice, range: DayRange) -> i32 {
    dice.range(range.0, range.1)
}

fn enroll(
    roster: &mut LanceRoster,
    recruit: Recruit,
    config: &RosterConfig,
    dice: &mut impl Dice,
    now: CampaignTime,
) -> MemberId {
    let id = roster.allocate_id();
    let seed = dice.seed();
    let mut member = LanceMember::new(
        id,
        display_name(seed),
        recruit.formation,
        recruit.rank_tier,
        now.minus_days(recruit.days_in_service as f64),
        seed,
    );
    member.days_in_service = recruit.days_in_service;
    member.battles_participated = recruit.battles;
    member.medical_risk = roll(dice, config.medical_risk).clamp(0, 5) as u8;
    member.set_relation(roll(dice, recruit.relation));
    roster.add(member)
}

/// Draw a rank tier 1..=5 from the configured weights
pub fn roll_rank_tier(config: &RosterConfig, dice: &mut impl Dice) -> RankTier {
    let table: Vec<(RankTier, f32)> = config
        .rank_weights
        .iter()
        .enumerate()
        .map(|(i, w)| (i as RankTier + 1, *w))
        .collect();
    pick_weighted(&table, dice).unwrap_or(1)
}

pub fn roll_formation(config: &RosterConfig, dice: &mut impl Dice) -> Formation {
    let table: Vec<(Formation, f32)> = Formation::all()
        .iter()
        .copied()
        .zip(config.formation_weights.iter().copied())
        .collect();
    pick_weighted(&table, dice).unwrap_or(Formation::Infantry)
}

/// Service days and battle count for an ordinary member of the given tier
pub fn service_record_for_tier(tier: RankTier, dice: &mut impl Dice) -> (u32, u32) {
    let tier = tier as i32;
    let days = dice.range(tier * 30 - 20, tier * 60).max(0) as u32;
    let battles = dice.range(tier - 1, tier * 3).max(0) as u32;
    (days, battles)
}

/// Populate an empty roster with a leader and 7-11 followers
///
/// Returns the ids in join order; the leader comes first.
pub fn generate_initial_roster(
    roster: &mut LanceRoster,
    config: &RosterConfig,
    dice: &mut impl Dice,
    now: CampaignTime,
) -> Vec<MemberId> {
    let size = dice.range(config.min_size, config.max_size).max(1) as usize;
    let mut ids = Vec::with_capacity(size);

    let leader = Recruit {
        formation: roll_formation(config, dice),
        rank_tier: config.leader_rank_tier,
        days_in_service: roll(dice, config.leader_days).max(0) as u32,
        battles: roll(dice, config.leader_battles).max(0) as u32,
        relation: config.leader_starting_relation,
    };
    let leader_id = enroll(roster, leader, config, dice, now);
    roster.install_leader(leader_id);
    ids.push(leader_id);

    for _ in 1..size {
        let rank_tier = roll_rank_tier(config, dice);
        let formation = roll_formation(config, dice);
        let (days_in_service, battles) = service_record_for_tier(rank_tier, dice);
        let recruit = Recruit {
            formation,
            rank_tier,
            days_in_service,
            battles,
            relation: config.starting_relation,
        };
        ids.push(enroll(roster, recruit, config, dice, now));
    }

    tracing::info!(
        "Generated lance of {} members, led by {}",
        ids.len(),
        roster.get(leader_id).map(|m| m.name.as_str()).unwrap_or("nobody")
    );

    ids
}

/// Appoint a fresh NPC leader to fill a vacancy
pub fn generate_replacement_leader(
    roster: &mut LanceRoster,
    config: &RosterConfig,
    dice: &mut impl Dice,
    now: CampaignTime,
) -> MemberId {
    let recruit = Recruit {
        formation: roll_formation(config, dice),
        rank_tier: config.leader_rank_tier,
        days_in_service: roll(dice, config.replacement_leader_days).max(0) as u32,
        battles: roll(dice, config.replacement_leader_battles).max(0) as u32,
        relation: config.leader_starting_relation,
    };
    let id = enroll(roster, recruit, config, dice, now);
    roster.install_leader(id);
    id
}
