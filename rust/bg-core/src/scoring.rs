//! Round scoring.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::state::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinKind {
    Single,
    Gammon,
    Backgammon,
}

impl WinKind {
    pub fn multiplier(self) -> u32 {
        match self {
            WinKind::Single => 1,
            WinKind::Gammon => 2,
            WinKind::Backgammon => 3,
        }
    }
}

/// Classify the win of `winner` on a finished board.
pub fn classify_win(board: &Board, winner: Color) -> WinKind {
    debug_assert!(board.is_winner(winner));
    if board.is_backgammon(winner) {
        WinKind::Backgammon
    } else if board.is_gammon(winner) {
        WinKind::Gammon
    } else {
        WinKind::Single
    }
}

/// Points for a won round at the given cube stakes.
pub fn win_points(kind: WinKind, stakes: u32) -> u32 {
    stakes.saturating_mul(kind.multiplier())
}
