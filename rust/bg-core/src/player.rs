//! The player capability the engine calls back into, and a random reference player.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use crate::action::{Command, Move};
use crate::board::Board;
use crate::engine::Game;
use crate::state::Color;

/// A participant in a match.
///
/// The engine validates every answer. A command of the wrong kind, or a move that is
/// still illegal once the retry budget is spent, forfeits the round.
pub trait Player {
    /// Before rolling, when the cube is available: `Command::Roll` or `Command::Double`.
    fn roll_or_double(&mut self, color: Color, game: &Game) -> Command;

    /// Choose a move for `dice` (already expanded to four values for a double).
    fn make_move(&mut self, color: Color, board: &Board, dice: &[u8]) -> Move;

    /// The opponent offered a double: `Command::Accept` or `Command::Resign`.
    fn accept_or_resign(&mut self, color: Color, game: &Game) -> Command;
}

/// The two-dice roll behind an expanded dice slice.
pub fn roll_from_dice(dice: &[u8]) -> Option<[u8; 2]> {
    match dice {
        [a, b] => Some([*a, *b]),
        [a, b, c, d] if a == b && b == c && c == d => Some([*a, *a]),
        _ => None,
    }
}

/// Always rolls, always accepts, and plays a uniformly random legal move.
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn roll_or_double(&mut self, _color: Color, _game: &Game) -> Command {
        Command::Roll
    }

    fn make_move(&mut self, color: Color, board: &Board, dice: &[u8]) -> Move {
        let Some(roll) = roll_from_dice(dice) else {
            return Move::empty();
        };
        let mut moves = board.list_moves(color, roll);
        if moves.is_empty() {
            return Move::empty();
        }
        let pick = self.rng.gen_range(0..moves.len());
        moves.swap_remove(pick)
    }

    fn accept_or_resign(&mut self, _color: Color, _game: &Game) -> Command {
        Command::Accept
    }
}
