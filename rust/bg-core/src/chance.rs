//! Dice streams.
//!
//! The deterministic mode defines dice by match seed + structural event rather than by
//! evolving RNG state, so a match can be replayed from its seed alone.
//! Event key: (match_seed, round_idx, turn_idx, roll_idx). Opening rolls use
//! turn_idx 0 and bump roll_idx on ties; regular turns use turn_idx >= 1.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// Structural event key for deterministic dice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub match_seed: u64,
    pub round_idx: u32,
    pub turn_idx: u32,
    pub roll_idx: u32,
}

/// SplitMix64 step (fast, deterministic).
fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mix_seed(key: EventKey) -> u64 {
    // Fixed, stable mixing. Avoid std Hash/RandomState.
    let mut x = key.match_seed;
    x ^= u64::from(key.round_idx).wrapping_mul(0xD6E8FEB86659FD93);
    x ^= u64::from(key.turn_idx).wrapping_mul(0xA5A35625E4F7C1AD);
    x ^= u64::from(key.roll_idx).wrapping_mul(0x9E3779B97F4A7C15);
    let mut s = x;
    splitmix64_next(&mut s)
}

/// Deterministically generate two dice for the given event key.
pub fn roll2(key: EventKey) -> [u8; 2] {
    let mut state = mix_seed(key);
    let mut out = [0u8; 2];
    for o in &mut out {
        let r = splitmix64_next(&mut state);
        *o = ((r % 6) + 1) as u8;
    }
    out
}

/// How dice are generated during a match.
pub enum ChanceMode {
    /// Deterministic, event-keyed dice stream.
    DeterministicEventKeyed { match_seed: u64 },
    /// Pseudorandom dice stream backed by a small PRNG.
    Rng { rng: Box<ChaCha8Rng> },
}

impl ChanceMode {
    pub fn roll2(&mut self, key: EventKey) -> [u8; 2] {
        match self {
            ChanceMode::DeterministicEventKeyed { match_seed } => roll2(EventKey {
                match_seed: *match_seed,
                ..key
            }),
            ChanceMode::Rng { rng } => [rng.gen_range(1..=6), rng.gen_range(1..=6)],
        }
    }
}

/// Mutable dice context owned by a game.
pub struct TurnContext {
    pub chance: ChanceMode,
}

impl TurnContext {
    pub fn new_deterministic(match_seed: u64) -> Self {
        Self {
            chance: ChanceMode::DeterministicEventKeyed { match_seed },
        }
    }

    pub fn new_rng(seed: u64) -> Self {
        Self {
            chance: ChanceMode::Rng {
                rng: Box::new(ChaCha8Rng::seed_from_u64(seed)),
            },
        }
    }

    /// Two dice for a regular turn (`turn_idx >= 1`).
    pub fn roll(&mut self, round_idx: u32, turn_idx: u32) -> [u8; 2] {
        self.chance.roll2(EventKey {
            match_seed: 0,
            round_idx,
            turn_idx,
            roll_idx: 0,
        })
    }

    /// Opening roll: one die per color (`[black, white]`), re-rolled until they differ.
    pub fn opening_roll(&mut self, round_idx: u32) -> [u8; 2] {
        let mut roll_idx = 0u32;
        loop {
            let dice = self.chance.roll2(EventKey {
                match_seed: 0,
                round_idx,
                turn_idx: 0,
                roll_idx,
            });
            if dice[0] != dice[1] {
                return dice;
            }
            roll_idx = roll_idx.wrapping_add(1);
        }
    }
}
