/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::{perft, splitperft, Bitboard, Color, Game, SessionCommand};

/// A line-oriented session that reads [`SessionCommand`]s and applies them to a [`Game`].
#[derive(Debug, Default)]
pub struct Session {
    game: Game,
}

impl Session {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    #[inline(always)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Reads commands from `input` until it is exhausted or `exit` is received.
    ///
    /// A command that cannot be parsed or fails is reported on stderr and the session carries on.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        info!(free_play = self.game.config().free_play, "session started");

        for line in input.lines() {
            let line = line.context("Failed to read a line of input")?;
            let line = line.trim();

            // Ignore empty lines
            if line.is_empty() {
                continue;
            }

            let cmd = match line.parse::<SessionCommand>() {
                Ok(cmd) => cmd,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };

            if cmd == SessionCommand::Exit {
                break;
            }

            if let Err(err) = self.execute(cmd, &mut output) {
                warn!(%line, "command failed");
                eprintln!("Error: {err:#}");
            }
        }

        output.flush().context("Failed to flush output")?;
        Ok(())
    }

    /// Executes a single command, writing any response to `output`.
    pub fn execute(&mut self, cmd: SessionCommand, mut output: impl Write) -> Result<()> {
        match cmd {
            SessionCommand::New => self.game.new_game(),

            SessionCommand::Clear => self.game.clear(),

            SessionCommand::Move { from, to, promote } => {
                let kind = promote.unwrap_or(self.game.config().promotion);
                let turn = self
                    .game
                    .set_move_promoting(from, to, kind)
                    .with_context(|| format!("Cannot play {from}{to}"))?;
                writeln!(output, "{turn}")?;
            }

            SessionCommand::Moves { square, pretty } => {
                let moves = self.game.valid_moves(square);
                writeln!(output, "{}", list_squares(moves))?;
                if pretty {
                    writeln!(output, "{moves}")?;
                }
            }

            SessionCommand::Place { piece, square } => {
                if !self.game.config().free_play {
                    bail!("Pieces can only be placed in free play");
                }
                let turn = self.game.add_piece(piece, square);
                writeln!(output, "{turn}")?;
            }

            SessionCommand::Undo => self.game.prev().context("Nothing to undo")?,

            SessionCommand::Redo => self.game.next().context("Nothing to redo")?,

            SessionCommand::Board => writeln!(output, "{}", self.game)?,

            SessionCommand::Defense { color } => {
                let color = color.unwrap_or(self.game.active_player());
                writeln!(output, "{}", self.game.total_defense(color))?;
            }

            SessionCommand::Turn => writeln!(output, "{}", self.game.active_player())?,

            SessionCommand::Check => {
                let checked = Color::all()
                    .into_iter()
                    .filter(|&color| self.game.is_in_check(color))
                    .map(|color| color.to_string())
                    .collect::<Vec<_>>();

                if checked.is_empty() {
                    writeln!(output, "No check")?;
                } else {
                    writeln!(output, "{} in check", checked.join(", "))?;
                }
            }

            SessionCommand::Winner => match self.game.winner() {
                Some(winner) if self.game.is_in_check(winner.opponent()) => {
                    writeln!(output, "Checkmate: {winner} wins")?
                }
                Some(_) => writeln!(output, "Stalemate")?,
                None => writeln!(output, "In progress")?,
            },

            SessionCommand::History => {
                for (i, turn) in self.game.history().applied().iter().enumerate() {
                    writeln!(output, "{}. {turn}", i + 1)?;
                }
            }

            SessionCommand::Perft { depth } => {
                writeln!(output, "{}", perft(&self.game, depth))?;
            }

            SessionCommand::Splitperft { depth } => {
                let nodes = splitperft(&self.game, depth);
                writeln!(output, "\n{nodes}")?;
            }

            SessionCommand::Exit => {}
        }

        Ok(())
    }
}

/// Comma-separated squares, or `(none)`.
fn list_squares(squares: Bitboard) -> String {
    if squares.is_empty() {
        return String::from("(none)");
    }
    squares
        .into_iter()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
