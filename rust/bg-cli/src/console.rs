//! Line-based console player.
//!
//! Reads commands and moves from any `BufRead` and writes prompts to any `Write`, so
//! the same code serves stdin/stdout and scripted tests. End of input gives up: the
//! engine treats it as a forfeit.

use std::io::{BufRead, Write};

use bg_core::{
    format_move, parse_command, roll_from_dice, Board, Color, Command, Game, Move, Player,
};

const HELP: &str = "\
help    -- show this message
list    -- list all legal moves
show    -- show the board
roll    -- roll the dice (or just press enter)
double  -- offer the doubling cube
accept  -- accept a double
resign  -- decline a double
a/b ... -- move checkers, e.g. 13/18 17/18, bar/3, 22/off";

pub struct ConsolePlayer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Console write failures are not fatal to the match.
    fn say(&mut self, text: &str) {
        let _ = self.output.write_all(text.as_bytes());
        let _ = self.output.flush();
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn list_moves(&mut self, color: Color, board: &Board, dice: &[u8]) {
        let moves = roll_from_dice(dice)
            .map(|roll| board.list_moves(color, roll))
            .unwrap_or_default();
        let mut text = String::new();
        for (i, mv) in moves.iter().enumerate() {
            text.push_str(&format!("{i}: {}\n", format_move(mv, color)));
        }
        text.push_str(&format!("listed {} moves\n", moves.len()));
        self.say(&text);
    }
}

impl<R: BufRead, W: Write> Player for ConsolePlayer<R, W> {
    fn roll_or_double(&mut self, color: Color, game: &Game) -> Command {
        loop {
            self.say(&format!("{color}, roll or double? "));
            let Some(line) = self.read_line() else {
                return Command::Resign;
            };
            match line.as_str() {
                "help" => self.say(&format!("{HELP}\n")),
                "show" => self.say(&game.board().to_string()),
                _ => match parse_command(&line, color, &[]) {
                    Ok(cmd @ (Command::Roll | Command::Double)) => return cmd,
                    _ => self.say("Invalid command.\n"),
                },
            }
        }
    }

    fn make_move(&mut self, color: Color, board: &Board, dice: &[u8]) -> Move {
        self.say(&board.to_string());
        loop {
            self.say(&format!(
                "Rolled {}-{}, enter {color} move: ",
                dice.first().copied().unwrap_or(0),
                dice.get(1).copied().unwrap_or(0)
            ));
            let Some(line) = self.read_line() else {
                return Move::empty();
            };
            match line.as_str() {
                "help" => self.say(&format!("{HELP}\n")),
                "list" => self.list_moves(color, board, dice),
                "show" => self.say(&board.to_string()),
                _ => match parse_command(&line, color, dice) {
                    Ok(Command::Move(mv)) => return mv,
                    Ok(_) => self.say("Error: Expected a move.\n"),
                    Err(e) => self.say(&format!("Error: {e}\n")),
                },
            }
        }
    }

    fn accept_or_resign(&mut self, color: Color, game: &Game) -> Command {
        loop {
            self.say(&format!(
                "{} wants to double the stakes to {}. {color}, accept or resign? ",
                color.opposite(),
                game.stakes() * 2
            ));
            let Some(line) = self.read_line() else {
                return Command::Resign;
            };
            match parse_command(&line, color, &[]) {
                Ok(cmd @ (Command::Accept | Command::Resign)) => return cmd,
                _ => self.say("Invalid command.\n"),
            }
        }
    }
}
