//! Event sink for `bg play`: NDJSON logging plus a human-readable transcript.

use bg_core::{format_move, ForfeitReason, GameEvent, GameEventSink, RoundOutcome, WinKind};
use bg_logging::{now_ms, EventLineV1, NdjsonError, NdjsonWriter, VersionInfoV1};

pub struct EventLog {
    writer: NdjsonWriter,
    match_id: String,
}

impl EventLog {
    pub fn new(writer: NdjsonWriter, match_id: String) -> Self {
        Self { writer, match_id }
    }
}

pub struct MatchSink {
    log: Option<EventLog>,
    /// Echo every turn, not just round results.
    verbose: bool,
    /// First logging failure; logging stops after it.
    log_error: Option<NdjsonError>,
}

impl MatchSink {
    pub fn new(log: Option<EventLog>, verbose: bool) -> Self {
        Self {
            log,
            verbose,
            log_error: None,
        }
    }

    /// Flush the log and report the first logging failure, if any.
    pub fn finish(mut self) -> Result<(), NdjsonError> {
        if let Some(e) = self.log_error.take() {
            return Err(e);
        }
        if let Some(log) = self.log.as_mut() {
            log.writer.flush()?;
        }
        Ok(())
    }

    fn write_log(&mut self, ev: &GameEvent) {
        if self.log_error.is_some() {
            return;
        }
        let Some(log) = self.log.as_mut() else {
            return;
        };
        let line = EventLineV1 {
            ts_ms: now_ms(),
            v: VersionInfoV1::current(),
            match_id: &log.match_id,
            payload: ev,
        };
        if let Err(e) = log.writer.write_event(&line) {
            self.log_error = Some(e);
        }
    }
}

pub fn describe_outcome(outcome: &RoundOutcome) -> String {
    match outcome {
        RoundOutcome::Win {
            winner,
            kind,
            points,
        } => format!("{winner} wins a {} for {points} point(s)", kind_name(*kind)),
        RoundOutcome::Resigned { winner, points } => {
            format!("{winner} wins {points} point(s), double declined")
        }
        RoundOutcome::Forfeit { offender, reason } => {
            format!(
                "{offender} forfeits ({}), {} takes the match",
                reason_text(reason),
                offender.opposite()
            )
        }
    }
}

fn reason_text(reason: &ForfeitReason) -> String {
    match reason {
        ForfeitReason::IllegalMove { attempts } => format!("{attempts} illegal moves"),
        ForfeitReason::UnexpectedCommand { expected, got } => {
            format!("answered {got} to {expected}")
        }
    }
}

fn kind_name(kind: WinKind) -> &'static str {
    match kind {
        WinKind::Single => "single game",
        WinKind::Gammon => "gammon",
        WinKind::Backgammon => "backgammon",
    }
}

fn transcript_line(ev: &GameEvent, verbose: bool) -> Option<String> {
    let line = match ev {
        GameEvent::RoundEnd {
            round_idx,
            outcome,
            scores,
        } => format!(
            "Round {}: {}. Score: Black {} - White {}",
            round_idx + 1,
            describe_outcome(outcome),
            scores[0],
            scores[1]
        ),
        _ if !verbose => return None,
        GameEvent::RoundStart { round_idx, .. } => format!("--- Round {} ---", round_idx + 1),
        GameEvent::OpeningRoll {
            black,
            white,
            first,
        } => format!("Opening roll: Black {black}, White {white}. {first} moves first."),
        GameEvent::DoubleOffered { color, stakes } => {
            format!("{color} offers to double the stakes to {stakes}.")
        }
        GameEvent::DoubleAccepted { color, stakes } => {
            format!("{color} accepts. Stakes are now {stakes}.")
        }
        GameEvent::DoubleDeclined { color } => format!("{color} declines the double."),
        GameEvent::Roll { color, dice } => format!("{color} rolled {}-{}.", dice[0], dice[1]),
        GameEvent::NoLegalMoves { color } => format!("{color} has no legal moves."),
        GameEvent::MoveRejected { color, .. } => format!("Illegal move by {color}."),
        GameEvent::MovePlayed { color, mv } => format!("{color} plays {}.", format_move(mv, *color)),
        GameEvent::MatchEnd { .. } => return None,
    };
    Some(line)
}

impl GameEventSink for MatchSink {
    fn on_event(&mut self, ev: &GameEvent) {
        self.write_log(ev);
        if let Some(line) = transcript_line(ev, self.verbose) {
            println!("{line}");
        }
    }
}
