//! Match engine: opening roll, turn loop, doubling cube and scoring.
//!
//! This module is the single place that drives a `Board` through a round. Players are
//! asked for commands and moves; every answer is checked against the rules before it
//! touches the board.

use serde::Serialize;
use thiserror::Error;

use crate::action::{expand_dice, Command, Move};
use crate::board::Board;
use crate::chance::TurnContext;
use crate::config::{Config, MatchConfig};
use crate::player::Player;
use crate::scoring::{classify_win, win_points, WinKind};
use crate::state::Color;

/// Who may offer the next double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cube", content = "owner", rename_all = "snake_case")]
pub enum Cube {
    Centered,
    Owned(Color),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ForfeitReason {
    /// No legal move after the full retry budget.
    IllegalMove { attempts: u32 },
    /// A callback answered with a command of the wrong kind.
    UnexpectedCommand {
        expected: &'static str,
        got: &'static str,
    },
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// All checkers borne off.
    Win {
        winner: Color,
        kind: WinKind,
        points: u32,
    },
    /// The opponent declined a double.
    Resigned { winner: Color, points: u32 },
    /// `offender` broke the protocol; the opponent takes the match.
    Forfeit {
        offender: Color,
        reason: ForfeitReason,
    },
}

impl RoundOutcome {
    pub fn winner(&self) -> Color {
        match self {
            RoundOutcome::Win { winner, .. } | RoundOutcome::Resigned { winner, .. } => *winner,
            RoundOutcome::Forfeit { offender, .. } => offender.opposite(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub winner: Color,
    pub scores: [u32; 2],
    pub rounds: u32,
}

/// Engine events, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStart {
        round_idx: u32,
        scores: [u32; 2],
    },
    OpeningRoll {
        black: u8,
        white: u8,
        first: Color,
    },
    DoubleOffered {
        color: Color,
        stakes: u32,
    },
    DoubleAccepted {
        color: Color,
        stakes: u32,
    },
    DoubleDeclined {
        color: Color,
    },
    Roll {
        color: Color,
        dice: [u8; 2],
    },
    NoLegalMoves {
        color: Color,
    },
    MoveRejected {
        color: Color,
        attempt: u32,
        #[serde(rename = "move")]
        mv: Move,
    },
    MovePlayed {
        color: Color,
        #[serde(rename = "move")]
        mv: Move,
    },
    RoundEnd {
        round_idx: u32,
        outcome: RoundOutcome,
        scores: [u32; 2],
    },
    MatchEnd {
        winner: Color,
        scores: [u32; 2],
        rounds: u32,
    },
}

pub trait GameEventSink {
    fn on_event(&mut self, ev: &GameEvent);
}

/// Discards every event.
pub struct NullSink;

impl GameEventSink for NullSink {
    fn on_event(&mut self, _ev: &GameEvent) {}
}

impl GameEventSink for Vec<GameEvent> {
    fn on_event(&mut self, ev: &GameEvent) {
        self.push(ev.clone());
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("round exceeded {limit} turns without a winner")]
    TurnLimitExceeded { limit: u32 },
    #[error("match is already over: {winner} won")]
    MatchOver { winner: Color },
}

/// One match between two players.
pub struct Game {
    board: Board,
    stakes: u32,
    cube: Cube,
    scores: [u32; 2],
    config: MatchConfig,
    ctx: TurnContext,
    round_idx: u32,
}

impl Game {
    pub fn new(config: MatchConfig, ctx: TurnContext) -> Self {
        Self {
            board: Board::starting(),
            stakes: 1,
            cube: Cube::Centered,
            scores: [0, 0],
            config,
            ctx,
            round_idx: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rules.clone(), config.chance.turn_context())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stakes(&self) -> u32 {
        self.stakes
    }

    pub fn cube(&self) -> Cube {
        self.cube
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn score(&self, color: Color) -> u32 {
        self.scores[color.index()]
    }

    /// `[black, white]`.
    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    /// Rounds started so far.
    pub fn round_idx(&self) -> u32 {
        self.round_idx
    }

    /// The cube is centered or owned by `color`, and the stakes can still be doubled.
    pub fn may_double(&self, color: Color) -> bool {
        let available = match self.cube {
            Cube::Centered => true,
            Cube::Owned(owner) => owner == color,
        };
        available && self.stakes.checked_mul(2).is_some()
    }

    pub fn match_winner(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&c| self.score(c) >= self.config.winning_score)
    }

    /// Play one round from the starting position and update the match score.
    pub fn play_round(
        &mut self,
        black: &mut dyn Player,
        white: &mut dyn Player,
        sink: &mut dyn GameEventSink,
    ) -> Result<RoundOutcome, GameError> {
        if let Some(winner) = self.match_winner() {
            return Err(GameError::MatchOver { winner });
        }

        self.board.setup();
        self.stakes = 1;
        self.cube = Cube::Centered;
        let round_idx = self.round_idx;
        self.round_idx += 1;
        sink.on_event(&GameEvent::RoundStart {
            round_idx,
            scores: self.scores,
        });

        let opening = self.ctx.opening_roll(round_idx);
        let mut color = if opening[0] > opening[1] {
            Color::Black
        } else {
            Color::White
        };
        sink.on_event(&GameEvent::OpeningRoll {
            black: opening[0],
            white: opening[1],
            first: color,
        });

        let mut opening_dice = Some(opening);
        let mut outcome = None;
        for turn_idx in 1..=self.config.max_turns_per_round {
            let (mover, opponent): (&mut dyn Player, &mut dyn Player) = match color {
                Color::Black => (&mut *black, &mut *white),
                Color::White => (&mut *white, &mut *black),
            };
            let dice = opening_dice.take();
            if let Some(o) = self.play_turn(color, dice, round_idx, turn_idx, mover, opponent, sink)
            {
                outcome = Some(o);
                break;
            }
            color = color.opposite();
        }
        let Some(outcome) = outcome else {
            return Err(GameError::TurnLimitExceeded {
                limit: self.config.max_turns_per_round,
            });
        };

        sink.on_event(&GameEvent::RoundEnd {
            round_idx,
            outcome: outcome.clone(),
            scores: self.scores,
        });
        Ok(outcome)
    }

    /// Play rounds until a color reaches the winning score.
    pub fn play_match(
        &mut self,
        black: &mut dyn Player,
        white: &mut dyn Player,
        sink: &mut dyn GameEventSink,
    ) -> Result<MatchResult, GameError> {
        if let Some(winner) = self.match_winner() {
            return Err(GameError::MatchOver { winner });
        }
        let first_round = self.round_idx;
        let winner = loop {
            self.play_round(black, white, sink)?;
            if let Some(w) = self.match_winner() {
                break w;
            }
        };
        let result = MatchResult {
            winner,
            scores: self.scores,
            rounds: self.round_idx - first_round,
        };
        sink.on_event(&GameEvent::MatchEnd {
            winner,
            scores: result.scores,
            rounds: result.rounds,
        });
        Ok(result)
    }

    /// One turn for `color`. `preset_dice` carries the opening roll, which is played
    /// without a cube decision. Returns the outcome if the round ended.
    #[allow(clippy::too_many_arguments)]
    fn play_turn(
        &mut self,
        color: Color,
        preset_dice: Option<[u8; 2]>,
        round_idx: u32,
        turn_idx: u32,
        mover: &mut dyn Player,
        opponent: &mut dyn Player,
        sink: &mut dyn GameEventSink,
    ) -> Option<RoundOutcome> {
        let dice = match preset_dice {
            Some(d) => d,
            None => {
                if self.may_double(color) {
                    match mover.roll_or_double(color, self) {
                        Command::Roll => {}
                        Command::Double => {
                            if let Some(o) = self.offer_double(color, opponent, sink) {
                                return Some(o);
                            }
                        }
                        other => {
                            let reason = ForfeitReason::UnexpectedCommand {
                                expected: "roll or double",
                                got: other.kind(),
                            };
                            return Some(self.forfeit(color, reason));
                        }
                    }
                }
                self.ctx.roll(round_idx, turn_idx)
            }
        };
        sink.on_event(&GameEvent::Roll { color, dice });

        let legal = self.board.list_moves(color, dice);
        if legal.is_empty() {
            sink.on_event(&GameEvent::NoLegalMoves { color });
            return None;
        }

        let expanded = expand_dice(dice);
        let max_attempts = self.config.max_move_attempts;
        let mut chosen = None;
        for attempt in 1..=max_attempts {
            let mv = mover.make_move(color, &self.board, &expanded);
            if legal.contains(&mv) {
                chosen = Some(mv);
                break;
            }
            sink.on_event(&GameEvent::MoveRejected { color, attempt, mv });
        }
        let Some(mv) = chosen else {
            let reason = ForfeitReason::IllegalMove {
                attempts: max_attempts,
            };
            return Some(self.forfeit(color, reason));
        };

        self.board.do_move(color, &mv);
        sink.on_event(&GameEvent::MovePlayed { color, mv });

        if self.board.is_winner(color) {
            let kind = classify_win(&self.board, color);
            let points = win_points(kind, self.stakes);
            self.add_points(color, points);
            return Some(RoundOutcome::Win {
                winner: color,
                kind,
                points,
            });
        }
        None
    }

    /// `color` offers the cube. Returns the outcome if the opponent resigned.
    fn offer_double(
        &mut self,
        color: Color,
        opponent: &mut dyn Player,
        sink: &mut dyn GameEventSink,
    ) -> Option<RoundOutcome> {
        let taker = color.opposite();
        let offered = self.stakes.saturating_mul(2);
        sink.on_event(&GameEvent::DoubleOffered {
            color,
            stakes: offered,
        });
        match opponent.accept_or_resign(taker, self) {
            Command::Accept => {
                self.stakes = offered;
                self.cube = Cube::Owned(taker);
                sink.on_event(&GameEvent::DoubleAccepted {
                    color: taker,
                    stakes: self.stakes,
                });
                None
            }
            Command::Resign => {
                sink.on_event(&GameEvent::DoubleDeclined { color: taker });
                let points = self.stakes;
                self.add_points(color, points);
                Some(RoundOutcome::Resigned {
                    winner: color,
                    points,
                })
            }
            other => {
                let reason = ForfeitReason::UnexpectedCommand {
                    expected: "accept or resign",
                    got: other.kind(),
                };
                Some(self.forfeit(taker, reason))
            }
        }
    }

    fn add_points(&mut self, color: Color, points: u32) {
        let score = &mut self.scores[color.index()];
        *score = score.saturating_add(points);
    }

    /// The offender's opponent is awarded the match.
    fn forfeit(&mut self, offender: Color, reason: ForfeitReason) -> RoundOutcome {
        let winner = offender.opposite();
        self.scores[winner.index()] = self.config.winning_score;
        RoundOutcome::Forfeit { offender, reason }
    }
}
