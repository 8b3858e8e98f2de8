//! Random number sources for the lance simulation
//!
//! Every probabilistic decision goes through the `Dice` trait so tests can
//! replay exact outcomes with `ScriptedDice` while the game uses a seeded
//! ChaCha stream.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random source consumed by the simulation
pub trait Dice {
    /// Uniform float in [0, 1)
    fn roll(&mut self) -> f32;

    /// Uniform integer in [min, max] (inclusive)
    fn range(&mut self, min: i32, max: i32) -> i32;

    /// Fresh seed for per-member flavor generation
    fn seed(&mut self) -> u64;

    /// True with the given probability
    fn chance(&mut self, probability: f32) -> bool {
        self.roll() < probability
    }
}

/// Deterministic dice backed by ChaCha8
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Dice that replay queued values, then fall back to a fixed roll
///
/// Integer ranges pop from their own queue (clamped into the requested
/// bounds) and return the lower bound once it is empty.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<f32>,
    ints: VecDeque<i32>,
    fallback: f32,
    next_seed: u64,
}

impl ScriptedDice {
    pub fn new(fallback: f32) -> Self {
        Self {
            rolls: VecDeque::new(),
            ints: VecDeque::new(),
            fallback,
            next_seed: 1,
        }
    }

    /// Every unscripted roll fails any check below 0.999
    pub fn never() -> Self {
        Self::new(0.999)
    }

    /// Every unscripted roll succeeds any check above zero
    pub fn always() -> Self {
        Self::new(0.0)
    }

    pub fn push_rolls(&mut self, rolls: &[f32]) -> &mut Self {
        self.rolls.extend(rolls.iter().copied());
        self
    }

    pub fn push_ints(&mut self, ints: &[i32]) -> &mut Self {
        self.ints.extend(ints.iter().copied());
        self
    }

    pub fn set_fallback(&mut self, fallback: f32) {
        self.fallback = fallback;
    }

    pub fn pending_rolls(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f32 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        match self.ints.pop_front() {
            Some(value) => value.clamp(min, max.max(min)),
            None => min,
        }
    }

    fn seed(&mut self) -> u64 {
        let seed = self.next_seed;
        self.next_seed += 1;
        seed
    }
}

/// Pick an entry by un-normalized cumulative weight
///
/// Draws `roll * total`, walks the entries accumulating weight and returns
/// the first whose running sum exceeds the draw. Falls back to the first
/// entry when nothing matches (zero total, float rounding at the top end).
/// Returns `None` only for an empty slice.
pub fn pick_weighted<T: Copy>(entries: &[(T, f32)], dice: &mut impl Dice) -> Option<T> {
    let first = entries.first()?.0;

    let total: f32 = entries.iter().map(|(_, w)| *w).sum();
    if total <= 0.0 {
        return Some(first);
    }

    let target = dice.roll() * total;
    let mut cumulative = 0.0;
    for (value, weight) in entries {
        cumulative += *weight;
        if cumulative > target {
            return Some(*value);
        }
    }

    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_dice_is_deterministic() {
        let mut a = SeededDice::new(42);
        let mut b = SeededDice::new(42);
        for _ in 0..20 {
            assert_eq!(a.roll(), b.roll());
            assert_eq!(a.range(1, 30), b.range(1, 30));
        }
    }

    #[test]
    fn test_seeded_range_is_inclusive() {
        let mut dice = SeededDice::new(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..1000 {
            let v = dice.range(1, 4);
            assert!((1..=4).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 4;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_scripted_dice_replays_then_falls_back() {
        let mut dice = ScriptedDice::never();
        dice.push_rolls(&[0.1, 0.2]).push_ints(&[9, 50]);
        assert_eq!(dice.roll(), 0.1);
        assert_eq!(dice.roll(), 0.2);
        assert_eq!(dice.roll(), 0.999);
        assert_eq!(dice.range(8, 12), 9);
        // Clamped into bounds
        assert_eq!(dice.range(8, 12), 12);
        // Empty queue returns the lower bound
        assert_eq!(dice.range(8, 12), 8);
    }

    #[test]
    fn test_pick_weighted_walks_cumulative_sum() {
        let entries = [('a', 0.4), ('b', 0.3), ('c', 0.3)];
        let mut dice = ScriptedDice::never();
        // total 1.0: 0.39 -> a, 0.4 -> b (cumulative must exceed), 0.95 -> c
        dice.push_rolls(&[0.39, 0.4, 0.95]);
        assert_eq!(pick_weighted(&entries, &mut dice), Some('a'));
        assert_eq!(pick_weighted(&entries, &mut dice), Some('b'));
        assert_eq!(pick_weighted(&entries, &mut dice), Some('c'));
    }

    #[test]
    fn test_pick_weighted_scales_roll_by_unnormalized_total() {
        // total 4.0: roll 0.5 -> target 2.0, lands in 'b' (cum 1.0, 3.0)
        let entries = [('a', 1.0), ('b', 2.0), ('c', 1.0)];
        let mut dice = ScriptedDice::never();
        dice.push_rolls(&[0.5]);
        assert_eq!(pick_weighted(&entries, &mut dice), Some('b'));
    }

    #[test]
    fn test_pick_weighted_zero_total_returns_first() {
        let entries = [('x', 0.0), ('y', 0.0)];
        let mut dice = ScriptedDice::always();
        assert_eq!(pick_weighted(&entries, &mut dice), Some('x'));
    }

    #[test]
    fn test_pick_weighted_empty() {
        let entries: [(char, f32); 0] = [];
        let mut dice = ScriptedDice::always();
        assert_eq!(pick_weighted(&entries, &mut dice), None);
    }

    #[test]
    fn test_uniform_weights_converge() {
        let entries = [('A', 1.0), ('B', 1.0), ('C', 1.0), ('D', 1.0), ('E', 1.0)];
        let mut dice = SeededDice::new(2024);
        let mut counts = [0u32; 5];
        let draws = 100_000;
        for _ in 0..draws {
            let pick = pick_weighted(&entries, &mut dice).unwrap();
            counts[(pick as u8 - b'A') as usize] += 1;
        }
        for count in counts {
            let share = count as f32 / draws as f32;
            assert!(
                (0.18..=0.22).contains(&share),
                "share {} outside [0.18, 0.22]",
                share
            );
        }
    }
}
