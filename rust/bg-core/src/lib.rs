//! bg-core: Backgammon rules, legal move enumeration, cube protocol and match scoring.

pub mod action;
pub mod board;
pub mod chance;
pub mod config;
pub mod engine;
pub mod legal;
pub mod notation;
pub mod player;
pub mod scoring;
pub mod state;

pub use action::{expand_dice, is_double, Command, Move, Submove};
pub use board::{Board, SubmoveUndo};
pub use chance::{ChanceMode, EventKey, TurnContext};
pub use config::{ChanceConfig, ChanceKind, Config, ConfigError, LoggingConfig, MatchConfig};
pub use engine::{
    Cube, ForfeitReason, Game, GameError, GameEvent, GameEventSink, MatchResult, NullSink,
    RoundOutcome,
};
pub use notation::{
    format_move, format_submove, parse_command, parse_move, parse_submove_points, NotationError,
};
pub use player::{roll_from_dice, Player, RandomPlayer};
pub use scoring::{classify_win, win_points, WinKind};
pub use state::{
    opposite_pos, Color, BAR_POS, BEARING_OFF_POS, BOARD_SIZE, CHECKERS_PER_COLOR, HOME_POS,
};


#[cfg(test)]
mod engine_tests;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
