//! Text notation for moves and commands.
//!
//! Points are written from Black's point of view for both colors, e.g. `13/18 17/18`.
//! `bar` may be used as a source and `off` as a destination. Submoves are listed in
//! the order they are played.
//!
//! A bearing-off submove does not always spell out the die it consumes (`20/off`
//! with a 6 rolled), so parsed submoves are reconciled against the rolled dice.

use thiserror::Error;

use crate::action::{Command, Move, Submove};
use crate::state::{opposite_pos, Color, BAR_POS, BEARING_OFF_POS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid submove {0}, expected a/b")]
    Malformed(String),
    #[error("invalid submove source {0}")]
    BadSource(String),
    #[error("invalid submove destination {0}")]
    BadDestination(String),
    #[error("submove point out of range {0}")]
    OutOfRange(String),
    #[error("submove {0} does not move forward")]
    NotForward(String),
    #[error("too many submoves: {submoves} for {dice} dice")]
    TooManySubmoves { submoves: usize, dice: usize },
    #[error("there's no die for submove {0}")]
    NoDie(String),
}

fn parse_point(part: &str, keyword: &str, keyword_pos: u8) -> Option<u8> {
    if part.eq_ignore_ascii_case(keyword) {
        return Some(keyword_pos);
    }
    if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
        // Large digit strings are range errors, not format errors.
        return Some(part.parse::<u8>().unwrap_or(u8::MAX));
    }
    None
}

/// Parse `a/b` into `(source, destination)` in `color`'s frame.
pub fn parse_submove_points(text: &str, color: Color) -> Result<(u8, u8), NotationError> {
    let mut parts = text.split('/');
    let (Some(src_txt), Some(dst_txt), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(NotationError::Malformed(text.to_string()));
    };

    // In Black's frame White enters from 25 and bears off to 0.
    let (bar_txt_pos, off_txt_pos) = match color {
        Color::Black => (BAR_POS, BEARING_OFF_POS),
        Color::White => (BEARING_OFF_POS, BAR_POS),
    };
    let source = parse_point(src_txt, "bar", bar_txt_pos)
        .ok_or_else(|| NotationError::BadSource(src_txt.to_string()))?;
    let destination = parse_point(dst_txt, "off", off_txt_pos)
        .ok_or_else(|| NotationError::BadDestination(dst_txt.to_string()))?;

    if source > BEARING_OFF_POS {
        return Err(NotationError::OutOfRange(src_txt.to_string()));
    }
    if destination > BEARING_OFF_POS {
        return Err(NotationError::OutOfRange(dst_txt.to_string()));
    }

    let (source, destination) = match color {
        Color::Black => (source, destination),
        Color::White => (opposite_pos(source), opposite_pos(destination)),
    };
    if destination <= source {
        return Err(NotationError::NotForward(text.to_string()));
    }
    Ok((source, destination))
}

/// Parse whitespace-separated submoves and assign each a die from `dice`.
///
/// `dice` is the expanded roll (four values for a double). A bear-off takes the
/// smallest remaining die that reaches off, and the last submove written picks
/// first: with 3-6, `22/off 23/off` is 22 by 6 then 23 by 3.
pub fn parse_move(text: &str, color: Color, dice: &[u8]) -> Result<Move, NotationError> {
    let points = text
        .split_whitespace()
        .map(|t| parse_submove_points(t, color))
        .collect::<Result<Vec<_>, _>>()?;

    if points.len() > dice.len() {
        return Err(NotationError::TooManySubmoves {
            submoves: points.len(),
            dice: dice.len(),
        });
    }

    // Keep the largest dice when fewer submoves than dice are given.
    let mut pool = dice.to_vec();
    pool.sort_unstable();
    let mut pool = pool.split_off(dice.len() - points.len());

    // Dice are assigned starting from the last submove written, then the result
    // is put back into the order the submoves are played.
    let mut submoves = Vec::with_capacity(points.len());
    for (source, destination) in points.into_iter().rev() {
        let literal = destination - source;
        let found = if destination != BEARING_OFF_POS {
            pool.iter().position(|&d| d == literal)
        } else {
            // Smallest die that reaches off; the pool is ascending.
            pool.iter().position(|&d| d >= literal)
        };
        let Some(idx) = found else {
            return Err(NotationError::NoDie(format_points(source, destination, color)));
        };
        let die = pool.remove(idx);
        submoves.push(Submove::new(source, die));
    }
    submoves.reverse();
    Ok(Move::new(submoves))
}

/// Parse a command line. Anything that is not a command word is read as a move.
pub fn parse_command(text: &str, color: Color, dice: &[u8]) -> Result<Command, NotationError> {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "" | "roll" => Ok(Command::Roll),
        "d" | "double" => Ok(Command::Double),
        "a" | "accept" => Ok(Command::Accept),
        "r" | "resign" => Ok(Command::Resign),
        _ => parse_move(text, color, dice).map(Command::Move),
    }
}

fn format_point(pos: u8, color: Color) -> u8 {
    match color {
        Color::Black => pos,
        Color::White => opposite_pos(pos),
    }
}

fn format_points(source: u8, destination: u8, color: Color) -> String {
    let src = if source == BAR_POS {
        "bar".to_string()
    } else {
        format_point(source, color).to_string()
    };
    let dst = if destination == BEARING_OFF_POS {
        "off".to_string()
    } else {
        format_point(destination, color).to_string()
    };
    format!("{src}/{dst}")
}

/// Render a submove in Black's frame, the inverse of `parse_submove_points`.
pub fn format_submove(submove: &Submove, color: Color) -> String {
    format_points(submove.source, submove.destination(), color)
}

pub fn format_move(mv: &Move, color: Color) -> String {
    mv.iter()
        .map(|sm| format_submove(sm, color))
        .collect::<Vec<_>>()
        .join(" ")
}
