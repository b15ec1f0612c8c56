//! Point coordinates and colors.
//!
//! Every color sees the board in its own frame: point 0 is its bar, points 1..=24 run
//! in its direction of travel and point 25 holds its borne-off checkers. The same
//! physical point is `pos` for one color and `25 - pos` for the other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Slots per color: bar, 24 points, borne off.
pub const BOARD_SIZE: usize = 26;
/// Where hit checkers wait to re-enter.
pub const BAR_POS: u8 = 0;
/// First point of the home board (home board is 19..=24).
pub const HOME_POS: u8 = 19;
/// Slot counting borne-off checkers.
pub const BEARING_OFF_POS: u8 = 25;
/// Checkers owned by each color.
pub const CHECKERS_PER_COLOR: u8 = 15;

/// Translate a point into the opponent's frame.
#[inline]
pub fn opposite_pos(pos: u8) -> u8 {
    debug_assert!(pos <= BEARING_OFF_POS);
    BEARING_OFF_POS - pos
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Row index used for per-color arrays (Black=0, White=1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("Black"),
            Color::White => f.write_str("White"),
        }
    }
}
