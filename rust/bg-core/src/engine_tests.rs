use crate::engine::{
    Cube, ForfeitReason, Game, GameError, GameEvent, NullSink, RoundOutcome,
};
use crate::{Board, Color, Command, MatchConfig, Move, Player, RandomPlayer, Submove, TurnContext};

/// Configurable test double layered over a random mover.
struct Scripted {
    inner: RandomPlayer,
    /// Answer to the first roll_or_double prompt; later prompts roll.
    first_cube_answer: Command,
    /// Answer to every accept_or_resign prompt.
    offer_answer: Command,
    /// Always return a move that is never legal from the start.
    illegal_moves: bool,
    cube_prompts: u32,
    offers_seen: u32,
    move_calls: u32,
}

impl Scripted {
    fn random(seed: u64) -> Self {
        Self {
            inner: RandomPlayer::new(seed),
            first_cube_answer: Command::Roll,
            offer_answer: Command::Accept,
            illegal_moves: false,
            cube_prompts: 0,
            offers_seen: 0,
            move_calls: 0,
        }
    }
}

impl Player for Scripted {
    fn roll_or_double(&mut self, _color: Color, _game: &Game) -> Command {
        self.cube_prompts += 1;
        if self.cube_prompts == 1 {
            self.first_cube_answer.clone()
        } else {
            Command::Roll
        }
    }

    fn make_move(&mut self, color: Color, board: &Board, dice: &[u8]) -> Move {
        self.move_calls += 1;
        if self.illegal_moves {
            return Move::new(vec![Submove::new(0, dice[0])]);
        }
        self.inner.make_move(color, board, dice)
    }

    fn accept_or_resign(&mut self, _color: Color, _game: &Game) -> Command {
        self.offers_seen += 1;
        self.offer_answer.clone()
    }
}

fn game(seed: u64) -> Game {
    Game::new(MatchConfig::default(), TurnContext::new_deterministic(seed))
}

fn opening_first(events: &[GameEvent]) -> Color {
    events
        .iter()
        .find_map(|e| match e {
            GameEvent::OpeningRoll { first, .. } => Some(*first),
            _ => None,
        })
        .expect("opening roll event")
}

#[test]
fn random_match_runs_to_the_winning_score() {
    let mut g = game(3);
    let mut black = RandomPlayer::new(1);
    let mut white = RandomPlayer::new(2);
    let mut events = Vec::new();

    let result = g.play_match(&mut black, &mut white, &mut events).unwrap();

    assert!(result.scores[result.winner.index()] >= 3);
    assert!(result.scores[result.winner.opposite().index()] < 3);
    assert_eq!(g.match_winner(), Some(result.winner));
    assert!(result.rounds >= 1);
    assert_eq!(
        events.last(),
        Some(&GameEvent::MatchEnd {
            winner: result.winner,
            scores: result.scores,
            rounds: result.rounds,
        })
    );
    let round_ends = events
        .iter()
        .filter(|e| matches!(e, GameEvent::RoundEnd { .. }))
        .count();
    assert_eq!(round_ends as u32, result.rounds);
}

#[test]
fn matches_are_reproducible_from_seeds() {
    let run = || {
        let mut g = game(77);
        let mut black = RandomPlayer::new(5);
        let mut white = RandomPlayer::new(6);
        let mut events = Vec::new();
        g.play_match(&mut black, &mut white, &mut events).unwrap();
        events
    };
    assert_eq!(run(), run());
}

#[test]
fn board_stays_consistent_through_a_round() {
    struct Checking(RandomPlayer);
    impl Player for Checking {
        fn roll_or_double(&mut self, c: Color, g: &Game) -> Command {
            self.0.roll_or_double(c, g)
        }
        fn make_move(&mut self, c: Color, b: &Board, d: &[u8]) -> Move {
            for color in Color::ALL {
                assert_eq!(b.checker_total(color), 15);
            }
            self.0.make_move(c, b, d)
        }
        fn accept_or_resign(&mut self, c: Color, g: &Game) -> Command {
            self.0.accept_or_resign(c, g)
        }
    }

    let mut g = game(9);
    let outcome = g
        .play_round(
            &mut Checking(RandomPlayer::new(3)),
            &mut Checking(RandomPlayer::new(4)),
            &mut NullSink,
        )
        .unwrap();
    assert!(matches!(outcome, RoundOutcome::Win { .. }));
    assert!(g.board().is_winner(outcome.winner()));
}

#[test]
fn illegal_mover_forfeits_after_retry_budget() {
    let mut g = game(21);
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.illegal_moves = true;
    white.illegal_moves = true;
    let mut events = Vec::new();

    let outcome = g.play_round(&mut black, &mut white, &mut events).unwrap();

    let first = opening_first(&events);
    assert_eq!(
        outcome,
        RoundOutcome::Forfeit {
            offender: first,
            reason: ForfeitReason::IllegalMove { attempts: 99 },
        }
    );
    assert_eq!(g.score(first.opposite()), 3);
    assert_eq!(g.score(first), 0);
    assert_eq!(g.match_winner(), Some(first.opposite()));

    let calls = match first {
        Color::Black => black.move_calls,
        Color::White => white.move_calls,
    };
    assert_eq!(calls, 99);
    let rejected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::MoveRejected { .. }))
        .count();
    assert_eq!(rejected, 99);
}

#[test]
fn declined_double_awards_current_stakes_to_doubler() {
    let mut g = game(4);
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.first_cube_answer = Command::Double;
    white.first_cube_answer = Command::Double;
    black.offer_answer = Command::Resign;
    white.offer_answer = Command::Resign;
    let mut events = Vec::new();

    let outcome = g.play_round(&mut black, &mut white, &mut events).unwrap();

    // The player who did not open is the first to face a cube decision.
    let doubler = opening_first(&events).opposite();
    assert_eq!(
        outcome,
        RoundOutcome::Resigned {
            winner: doubler,
            points: 1
        }
    );
    assert_eq!(g.score(doubler), 1);
    assert_eq!(g.score(doubler.opposite()), 0);
    assert!(events.contains(&GameEvent::DoubleDeclined {
        color: doubler.opposite()
    }));
    let taker_offers = match doubler.opposite() {
        Color::Black => black.offers_seen,
        Color::White => white.offers_seen,
    };
    assert_eq!(taker_offers, 1);
}

#[test]
fn accepted_double_moves_cube_and_doubles_stakes() {
    let mut g = game(5);
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.first_cube_answer = Command::Double;
    white.first_cube_answer = Command::Double;
    let mut events = Vec::new();

    let outcome = g.play_round(&mut black, &mut white, &mut events).unwrap();

    let doubler = opening_first(&events).opposite();
    let taker = doubler.opposite();
    assert!(events.contains(&GameEvent::DoubleAccepted {
        color: taker,
        stakes: 2
    }));

    // The taker owns the cube and redoubles on its first prompt; the first doubler
    // accepts, so the cube ends with the first doubler at stakes 4.
    assert!(events.contains(&GameEvent::DoubleAccepted {
        color: doubler,
        stakes: 4
    }));
    assert_eq!(g.stakes(), 4);
    assert_eq!(g.cube(), Cube::Owned(doubler));

    match outcome {
        RoundOutcome::Win { kind, points, .. } => {
            assert_eq!(points, 4 * kind.multiplier());
        }
        other => panic!("expected a win, got {other:?}"),
    }

    // Nobody is asked about the cube while the opponent owns it.
    let offers = events
        .iter()
        .filter(|e| matches!(e, GameEvent::DoubleOffered { .. }))
        .count();
    assert_eq!(offers, 2);
}

#[test]
fn wrong_command_kind_on_roll_prompt_forfeits() {
    let mut g = game(6);
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.first_cube_answer = Command::Accept;
    white.first_cube_answer = Command::Accept;
    let mut events = Vec::new();

    let outcome = g.play_round(&mut black, &mut white, &mut events).unwrap();

    let offender = opening_first(&events).opposite();
    assert_eq!(
        outcome,
        RoundOutcome::Forfeit {
            offender,
            reason: ForfeitReason::UnexpectedCommand {
                expected: "roll or double",
                got: "accept",
            },
        }
    );
    assert_eq!(g.score(offender.opposite()), 3);
}

#[test]
fn wrong_command_kind_on_double_offer_forfeits() {
    let mut g = game(7);
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.first_cube_answer = Command::Double;
    white.first_cube_answer = Command::Double;
    black.offer_answer = Command::Roll;
    white.offer_answer = Command::Roll;
    let mut events = Vec::new();

    let outcome = g.play_round(&mut black, &mut white, &mut events).unwrap();

    let taker = opening_first(&events);
    assert_eq!(
        outcome,
        RoundOutcome::Forfeit {
            offender: taker,
            reason: ForfeitReason::UnexpectedCommand {
                expected: "accept or resign",
                got: "roll",
            },
        }
    );
    assert_eq!(outcome.winner(), taker.opposite());
}

#[test]
fn round_after_match_over_is_an_error() {
    let mut g = game(8);
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.illegal_moves = true;
    white.illegal_moves = true;
    g.play_round(&mut black, &mut white, &mut NullSink).unwrap();

    let err = g
        .play_round(&mut black, &mut white, &mut NullSink)
        .unwrap_err();
    assert!(matches!(err, GameError::MatchOver { .. }));
    let err = g
        .play_match(&mut black, &mut white, &mut NullSink)
        .unwrap_err();
    assert!(matches!(err, GameError::MatchOver { .. }));
}

#[test]
fn turn_limit_is_reported() {
    let config = MatchConfig {
        max_turns_per_round: 2,
        ..MatchConfig::default()
    };
    let mut g = Game::new(config, TurnContext::new_rng(1));
    let err = g
        .play_round(
            &mut RandomPlayer::new(1),
            &mut RandomPlayer::new(2),
            &mut NullSink,
        )
        .unwrap_err();
    assert!(matches!(err, GameError::TurnLimitExceeded { limit: 2 }));
}

#[test]
fn new_round_resets_board_stakes_and_cube() {
    let config = MatchConfig {
        winning_score: 100,
        ..MatchConfig::default()
    };
    let mut g = Game::new(config, TurnContext::new_deterministic(5));
    let mut black = Scripted::random(1);
    let mut white = Scripted::random(2);
    black.first_cube_answer = Command::Double;
    white.first_cube_answer = Command::Double;
    let mut events = Vec::new();
    g.play_round(&mut black, &mut white, &mut events).unwrap();
    assert_eq!(g.stakes(), 4);
    assert_eq!(g.match_winner(), None);

    // Second round: nobody doubles any more.
    let mut events = Vec::new();
    g.play_round(&mut black, &mut white, &mut events).unwrap();
    assert_eq!(g.stakes(), 1);
    assert_eq!(g.cube(), Cube::Centered);
    assert_eq!(g.round_idx(), 2);
    assert!(matches!(
        events.first(),
        Some(GameEvent::RoundStart { round_idx: 1, .. })
    ));
}

#[test]
fn cube_ownership_controls_who_may_double() {
    let g = game(1);
    assert_eq!(g.cube(), Cube::Centered);
    assert!(g.may_double(Color::Black));
    assert!(g.may_double(Color::White));
    assert_eq!(g.stakes(), 1);
    assert_eq!(g.scores(), [0, 0]);
    assert_eq!(g.match_winner(), None);
}

#[test]
fn endless_redoubling_stops_at_the_stakes_ceiling() {
    struct AlwaysDouble(RandomPlayer);
    impl Player for AlwaysDouble {
        fn roll_or_double(&mut self, _c: Color, _g: &Game) -> Command {
            Command::Double
        }
        fn make_move(&mut self, c: Color, b: &Board, d: &[u8]) -> Move {
            self.0.make_move(c, b, d)
        }
        fn accept_or_resign(&mut self, _c: Color, _g: &Game) -> Command {
            Command::Accept
        }
    }

    let mut g = game(3);
    let mut events = Vec::new();
    let outcome = g
        .play_round(
            &mut AlwaysDouble(RandomPlayer::new(1)),
            &mut AlwaysDouble(RandomPlayer::new(2)),
            &mut events,
        )
        .unwrap();

    // Every cube turn doubles until one more double would not fit in the stakes.
    let accepted = events
        .iter()
        .filter(|e| matches!(e, GameEvent::DoubleAccepted { .. }))
        .count();
    assert_eq!(accepted, 31);
    assert_eq!(g.stakes(), 1 << 31);
    let owner = match g.cube() {
        Cube::Owned(owner) => owner,
        Cube::Centered => panic!("cube should be owned"),
    };
    assert!(!g.may_double(owner));
    assert!(!g.may_double(owner.opposite()));

    match outcome {
        RoundOutcome::Win { winner, points, .. } => {
            assert!(points >= 1 << 31);
            assert_eq!(g.score(winner), points);
        }
        other => panic!("expected a win, got {other:?}"),
    }
}
