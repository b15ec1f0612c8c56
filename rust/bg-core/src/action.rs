//! Move values: single checker displacements, full moves and player commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::BEARING_OFF_POS;

/// One checker moved by one die, in the mover's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Submove {
    pub source: u8,
    pub die: u8,
}

impl Submove {
    pub fn new(source: u8, die: u8) -> Self {
        Self { source, die }
    }

    /// Landing point, clamped to the bearing-off slot.
    #[inline]
    pub fn destination(&self) -> u8 {
        self.source.saturating_add(self.die).min(BEARING_OFF_POS)
    }

    #[inline]
    pub fn is_bearing_off(&self) -> bool {
        self.destination() == BEARING_OFF_POS
    }
}

impl fmt::Display for Submove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.destination())
    }
}

/// Ordered submoves, stored in application order (index 0 is played first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move {
    submoves: Vec<Submove>,
}

impl Move {
    pub fn new(submoves: Vec<Submove>) -> Self {
        Self { submoves }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.submoves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submoves.is_empty()
    }

    /// Append a submove to be played after the existing ones.
    pub fn push(&mut self, submove: Submove) {
        self.submoves.push(submove);
    }

    pub fn submoves(&self) -> &[Submove] {
        &self.submoves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Submove> {
        self.submoves.iter()
    }
}

impl From<Vec<Submove>> for Move {
    fn from(submoves: Vec<Submove>) -> Self {
        Self::new(submoves)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, sm) in self.submoves.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{sm}")?;
        }
        f.write_str("]")
    }
}

/// Everything a player can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "move", rename_all = "snake_case")]
pub enum Command {
    Roll,
    Double,
    Accept,
    Resign,
    Move(Move),
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Roll => "roll",
            Command::Double => "double",
            Command::Accept => "accept",
            Command::Resign => "resign",
            Command::Move(_) => "move",
        }
    }
}

/// Dice a player may consume for a roll: two values, or four copies of a double.
pub fn expand_dice(roll: [u8; 2]) -> Vec<u8> {
    if roll[0] == roll[1] {
        vec![roll[0]; 4]
    } else {
        roll.to_vec()
    }
}

#[inline]
pub fn is_double(roll: [u8; 2]) -> bool {
    roll[0] == roll[1]
}
