//! Checker placement and the mutation primitives.
//!
//! This module is the single place that moves checkers. Legality lives in `legal`.

use std::fmt;

use crate::action::{Move, Submove};
use crate::state::{
    opposite_pos, Color, BAR_POS, BEARING_OFF_POS, BOARD_SIZE, CHECKERS_PER_COLOR, HOME_POS,
};

/// Standard opening layout in each color's own frame.
const STARTING_CHECKERS: [u8; BOARD_SIZE] = [
    0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5, //
    0, 0, 0, 0, 3, 0, 5, 0, 0, 0, 0, 0, 0,
];

/// Two per-color checker counts, each indexed in its owner's frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    checkers: [[u8; BOARD_SIZE]; 2],
}

/// What `do_submove` changed, so it can be reverted exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmoveUndo {
    pub submove: Submove,
    /// An opposing blot was sent to the bar.
    pub hit: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board (no checkers anywhere).
    pub fn new() -> Self {
        Self {
            checkers: [[0u8; BOARD_SIZE]; 2],
        }
    }

    /// A board in the standard starting position.
    pub fn starting() -> Self {
        let mut b = Self::new();
        b.setup();
        b
    }

    /// Reset both colors to the starting layout.
    pub fn setup(&mut self) {
        self.checkers = [STARTING_CHECKERS; 2];
    }

    #[inline]
    pub fn get_checkers(&self, color: Color, pos: u8) -> u8 {
        self.checkers[color.index()][pos as usize]
    }

    /// Opponent checkers on `pos` as seen from `color`'s frame.
    #[inline]
    pub fn get_opposite_checkers(&self, color: Color, pos: u8) -> u8 {
        self.checkers[color.opposite().index()][opposite_pos(pos) as usize]
    }

    pub fn set_checkers(&mut self, color: Color, pos: u8, checkers: u8) {
        self.checkers[color.index()][pos as usize] = checkers;
    }

    pub fn set_opposite_checkers(&mut self, color: Color, pos: u8, checkers: u8) {
        self.checkers[color.opposite().index()][opposite_pos(pos) as usize] = checkers;
    }

    pub fn bar_checkers(&self, color: Color) -> u8 {
        self.get_checkers(color, BAR_POS)
    }

    pub fn borne_off(&self, color: Color) -> u8 {
        self.get_checkers(color, BEARING_OFF_POS)
    }

    /// Sum over all slots, including bar and borne off.
    pub fn checker_total(&self, color: Color) -> u32 {
        self.checkers[color.index()]
            .iter()
            .map(|&n| u32::from(n))
            .sum()
    }

    /// The opponent holds two or more checkers on `pos`.
    pub fn is_blocked(&self, color: Color, pos: u8) -> bool {
        if pos == BEARING_OFF_POS {
            return false;
        }
        self.get_opposite_checkers(color, pos) > 1
    }

    /// No checker of `color` outside its home board (bar included).
    pub fn is_all_home(&self, color: Color) -> bool {
        (BAR_POS..HOME_POS).all(|pos| self.get_checkers(color, pos) == 0)
    }

    /// No checker of `color` on a home point further from bearing off than `test_pos`.
    pub fn is_highest_home_point(&self, color: Color, test_pos: u8) -> bool {
        (HOME_POS..test_pos).all(|pos| self.get_checkers(color, pos) == 0)
    }

    /// Move one checker; hit a lone opposing checker on the landing point.
    ///
    /// No legality check is performed.
    pub fn do_submove(&mut self, color: Color, submove: Submove) -> SubmoveUndo {
        let src = submove.source as usize;
        let dst = submove.destination();
        let row = &mut self.checkers[color.index()];
        debug_assert!(row[src] > 0, "no {color} checker on {}", submove.source);
        row[src] -= 1;
        row[dst as usize] += 1;

        // Checkers on the opponent's bar are never on a landing point.
        let hit = dst != BEARING_OFF_POS && self.get_opposite_checkers(color, dst) == 1;
        if hit {
            let other = &mut self.checkers[color.opposite().index()];
            other[opposite_pos(dst) as usize] = 0;
            other[BAR_POS as usize] += 1;
        }
        SubmoveUndo { submove, hit }
    }

    /// Revert the submove recorded in `undo`. Must be the last change applied.
    pub fn undo_submove(&mut self, color: Color, undo: SubmoveUndo) {
        let src = undo.submove.source as usize;
        let dst = undo.submove.destination();
        if undo.hit {
            let other = &mut self.checkers[color.opposite().index()];
            other[BAR_POS as usize] -= 1;
            other[opposite_pos(dst) as usize] = 1;
        }
        let row = &mut self.checkers[color.index()];
        row[dst as usize] -= 1;
        row[src] += 1;
    }

    /// Apply every submove in order. Callers validate first.
    pub fn do_move(&mut self, color: Color, mv: &Move) {
        #[cfg(debug_assertions)]
        let before = Color::ALL.map(|c| self.checker_total(c));
        for &sm in mv.iter() {
            self.do_submove(color, sm);
        }
        #[cfg(debug_assertions)]
        debug_assert_eq!(
            before,
            Color::ALL.map(|c| self.checker_total(c)),
            "checker count drifted"
        );
    }

    pub fn is_winner(&self, color: Color) -> bool {
        self.borne_off(color) >= CHECKERS_PER_COLOR
    }

    /// The opponent has not borne off a single checker.
    pub fn is_gammon(&self, color: Color) -> bool {
        self.borne_off(color.opposite()) == 0
    }

    /// Gammon, and the opponent still has a checker on the bar or in `color`'s home board.
    pub fn is_backgammon(&self, color: Color) -> bool {
        if !self.is_gammon(color) {
            return false;
        }
        if self.bar_checkers(color.opposite()) > 0 {
            return true;
        }
        (HOME_POS..BEARING_OFF_POS).any(|pos| self.get_opposite_checkers(color, pos) > 0)
    }

    fn fmt_point(&self, f: &mut fmt::Formatter<'_>, pos: u8) -> fmt::Result {
        let black = self.get_checkers(Color::Black, pos);
        let white = self.get_opposite_checkers(Color::Black, pos);
        if black > 0 {
            write!(f, " B{black:<2}")
        } else if white > 0 {
            write!(f, " W{white:<2}")
        } else {
            f.write_str(" __ ")
        }
    }
}

/// Text board from Black's point of view. Not a stable format.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top_left = 13u8..=18;
        let top_right = 19u8..=24;
        let bottom_left = (7u8..=12).rev();
        let bottom_right = (1u8..=6).rev();

        for pos in top_left.clone() {
            write!(f, " {pos:>2} ")?;
        }
        f.write_str("    ")?;
        for pos in top_right.clone() {
            write!(f, " {pos:>2} ")?;
        }
        writeln!(f, "    Black bar: {}", self.bar_checkers(Color::Black))?;

        for pos in top_left {
            self.fmt_point(f, pos)?;
        }
        f.write_str("    ")?;
        for pos in top_right {
            self.fmt_point(f, pos)?;
        }
        writeln!(f, "    Black off: {}", self.borne_off(Color::Black))?;

        for pos in bottom_left.clone() {
            self.fmt_point(f, pos)?;
        }
        f.write_str("    ")?;
        for pos in bottom_right.clone() {
            self.fmt_point(f, pos)?;
        }
        writeln!(f, "    White bar: {}", self.bar_checkers(Color::White))?;

        for pos in bottom_left {
            write!(f, " {pos:>2} ")?;
        }
        f.write_str("    ")?;
        for pos in bottom_right {
            write!(f, " {pos:>2} ")?;
        }
        writeln!(f, "    White off: {}", self.borne_off(Color::White))
    }
}
