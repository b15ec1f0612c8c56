//! Position samplers shared by the benchmarks.

use bg_core::{Board, Color};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// A position to enumerate moves for.
#[derive(Debug, Clone)]
pub struct Sample {
    pub board: Board,
    pub color: Color,
    pub dice: [u8; 2],
}

fn roll(rng: &mut ChaCha8Rng) -> [u8; 2] {
    [rng.gen_range(1..=6), rng.gen_range(1..=6)]
}

/// Collect `n` positions from random playouts that start at the opening layout.
///
/// A playout restarts once a color has borne everything off, so early, middle and
/// bear-off positions all show up.
pub fn sample_positions(n: usize, seed: u64) -> Vec<Sample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(n);
    let mut board = Board::starting();
    let mut color = Color::Black;

    while out.len() < n {
        let dice = roll(&mut rng);
        out.push(Sample {
            board: board.clone(),
            color,
            dice,
        });
        let moves = board.list_moves(color, dice);
        if !moves.is_empty() {
            let mv = &moves[rng.gen_range(0..moves.len())];
            board.do_move(color, mv);
        }
        if board.is_winner(color) {
            board = Board::starting();
            color = Color::Black;
        } else {
            color = color.opposite();
        }
    }
    out
}

/// Positions where a double is rolled; these dominate enumeration cost.
pub fn sample_doubles(n: usize, seed: u64) -> Vec<Sample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0xD0B1_E5D0_B1E5_0000);
    sample_positions(n, seed)
        .into_iter()
        .map(|mut s| {
            let d = rng.gen_range(1..=6);
            s.dice = [d, d];
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_reproducible_and_well_formed() {
        let a = sample_positions(200, 7);
        let b = sample_positions(200, 7);
        assert_eq!(a.len(), 200);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.board, y.board);
            assert_eq!(x.dice, y.dice);
            for c in Color::ALL {
                assert_eq!(x.board.checker_total(c), 15);
            }
        }
    }

    #[test]
    fn doubles_sampler_rolls_doubles() {
        assert!(sample_doubles(50, 1).iter().all(|s| s.dice[0] == s.dice[1]));
    }
}
