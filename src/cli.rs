/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::{Color, Piece, PieceKind, Square};

/// Options given to the `chessmap` binary on startup.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Apply moves without checking legality or turn order, and allow placing pieces.
    #[arg(long, default_value = "false")]
    pub free_play: bool,

    /// Start from an empty board instead of the standard opening.
    #[arg(long, default_value = "false")]
    pub empty: bool,

    /// Filter directive for log output, such as `debug` or `chessmap=trace`.
    #[arg(long, env = "CHESSMAP_LOG", default_value = "warn")]
    pub log: String,
}

/// A command read by the interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND> [ARGS]")
)]
pub enum SessionCommand {
    /// Reset to the standard opening.
    New,

    /// Remove every piece from the board.
    Clear,

    /// Play a move, such as `move e2 e4`.
    #[command(alias = "m")]
    Move {
        from: Square,
        to: Square,

        /// The piece a promoting pawn becomes (N, B, R or Q).
        #[arg(short, long)]
        promote: Option<PieceKind>,
    },

    /// Show the legal destinations of the piece on a square.
    Moves {
        square: Square,

        /// If set, the destinations are also drawn as a board.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Put a piece on a square, such as `place bK h8`. Requires free play.
    Place { piece: Piece, square: Square },

    /// Take back the most recent turn.
    #[command(alias = "prev")]
    Undo,

    /// Replay the turn most recently taken back.
    #[command(alias = "next")]
    Redo,

    /// Print the board.
    #[command(alias = "d")]
    Board,

    /// Show every square defended by a side, or by the side to move.
    Defense { color: Option<Color> },

    /// Print the side to move.
    Turn,

    /// Report whether either King is in check.
    Check,

    /// Report checkmate or stalemate, if the game is over.
    Winner,

    /// List every turn played so far.
    History,

    /// Count the move paths of the given length.
    Perft { depth: usize },

    /// Like `perft`, but list the count below each move.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Leave the session.
    #[command(alias = "quit")]
    Exit,
}

impl FromStr for SessionCommand {
    type Err = clap::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "move e7 e8 --promote n".parse::<SessionCommand>().unwrap(),
            SessionCommand::Move {
                from: Square::E7,
                to: Square::E8,
                promote: Some(PieceKind::Knight)
            }
        );
        assert_eq!(
            "place bK h8".parse::<SessionCommand>().unwrap(),
            SessionCommand::Place {
                piece: Piece::BLACK_KING,
                square: Square::H8
            }
        );
        assert_eq!("prev".parse::<SessionCommand>().unwrap(), SessionCommand::Undo);
        assert_eq!("quit".parse::<SessionCommand>().unwrap(), SessionCommand::Exit);
        assert_eq!(
            "defense black".parse::<SessionCommand>().unwrap(),
            SessionCommand::Defense {
                color: Some(Color::Black)
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_squares() {
        assert!("moves i9".parse::<SessionCommand>().is_err());
        assert!("place xQ a1".parse::<SessionCommand>().is_err());
        assert!("castle".parse::<SessionCommand>().is_err());
    }
}
