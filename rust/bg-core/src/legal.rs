//! Submove legality and legal move enumeration.
//!
//! Rules:
//! - a submove needs a checker on its source and an unblocked destination
//! - checkers on the bar must enter before anything else moves
//! - bearing off requires every checker home; an overshooting die may only bear off
//!   from the highest occupied home point
//! - a move must use both dice when any sequence allows it; otherwise the sequences
//!   that lead with the high die are preferred

use crate::action::{is_double, Move, Submove};
use crate::board::Board;
use crate::state::{Color, BAR_POS, BEARING_OFF_POS};

impl Board {
    pub fn is_valid_submove(&self, color: Color, submove: Submove) -> bool {
        if submove.source >= BEARING_OFF_POS || submove.die == 0 {
            return false;
        }
        if self.get_checkers(color, submove.source) < 1 {
            return false;
        }
        let destination = submove.destination();
        if self.is_blocked(color, destination) {
            return false;
        }
        if self.bar_checkers(color) > 0 && submove.source != BAR_POS {
            return false;
        }
        if destination == BEARING_OFF_POS {
            if !self.is_all_home(color) {
                return false;
            }
            let exact = u16::from(submove.source) + u16::from(submove.die)
                == u16::from(BEARING_OFF_POS);
            if !exact && !self.is_highest_home_point(color, submove.source) {
                return false;
            }
        }
        true
    }

    /// Legal submoves for one die, ascending by source point.
    pub fn list_submoves(&self, color: Color, die: u8) -> Vec<Submove> {
        (BAR_POS..BEARING_OFF_POS)
            .map(|pos| Submove::new(pos, die))
            .filter(|&sm| self.is_valid_submove(color, sm))
            .collect()
    }

    /// Every submove sequence obtained by playing `dice` strictly in the given order.
    ///
    /// Sequences stop early when no continuation is playable, so results may be
    /// shorter than `dice`. These are not yet filtered by the dice-usage rules.
    pub fn list_moves_with_ordered_dice(&self, color: Color, dice: &[u8]) -> Vec<Move> {
        let mut scratch = self.clone();
        let mut prefix = Vec::with_capacity(dice.len());
        let mut out = Vec::new();
        scratch.extend_moves(color, dice, &mut prefix, &mut out);
        out
    }

    /// Depth-first apply/undo walk. A leaf is reached when the dice run out or when
    /// no submove is playable for the next die.
    fn extend_moves(
        &mut self,
        color: Color,
        dice: &[u8],
        prefix: &mut Vec<Submove>,
        out: &mut Vec<Move>,
    ) {
        let Some((&die, rest)) = dice.split_first() else {
            return;
        };
        for submove in self.list_submoves(color, die) {
            let undo = self.do_submove(color, submove);
            prefix.push(submove);

            let before = out.len();
            self.extend_moves(color, rest, prefix, out);
            if out.len() == before {
                out.push(Move::new(prefix.clone()));
            }

            prefix.pop();
            self.undo_submove(color, undo);
        }
    }

    /// Legal moves for a two-dice roll.
    pub fn list_moves(&self, color: Color, dice: [u8; 2]) -> Vec<Move> {
        debug_assert!(dice.iter().all(|d| (1..=6).contains(d)));

        if is_double(dice) {
            return self.list_moves_with_ordered_dice(color, &[dice[0]; 4]);
        }

        let high = dice[0].max(dice[1]);
        let low = dice[0].min(dice[1]);
        let high_moves = self.list_moves_with_ordered_dice(color, &[high, low]);
        let low_moves = self.list_moves_with_ordered_dice(color, &[low, high]);

        let both_dice_moves: Vec<Move> = high_moves
            .iter()
            .chain(low_moves.iter())
            .filter(|m| m.size() == 2)
            .cloned()
            .collect();

        if !both_dice_moves.is_empty() {
            return both_dice_moves;
        }
        if !high_moves.is_empty() {
            return high_moves;
        }
        low_moves
    }

    pub fn is_valid_move(&self, color: Color, dice: [u8; 2], mv: &Move) -> bool {
        self.list_moves(color, dice).iter().any(|legal| legal == mv)
    }
}
