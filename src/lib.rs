/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Chess rules on bitboards: legal move generation, check and pin detection,
//! castling, en passant and promotion, and an undoable move ledger.
//!
//! # Example
//! ```
//! # use chessmap::{Game, GameConfig, Square};
//! let mut game = Game::new(GameConfig::default());
//! assert!(game.is_valid_move(Square::E2, Square::E4));
//!
//! game.set_move(Square::E2, Square::E4).unwrap();
//! game.prev().unwrap();
//! assert!(game.has_next());
//! ```

/// Squares, pieces, bitboards and the fixed board geometry.
mod board;

/// Command-line and session command parsing.
mod cli;

/// The error type shared by the whole crate.
mod error;

/// A game: position, history and configuration behind one interface.
mod game;

/// Turns and the move ledger.
mod history;

/// Move path enumeration for checking the move generator.
mod perft;

/// The piece container: placement plus castling rights.
mod position;

/// Defense, check, pins and legal move generation.
mod rules;

/// The interactive command session.
mod session;

pub use board::*;
pub use cli::*;
pub use error::*;
pub use game::*;
pub use history::*;
pub use perft::*;
pub use position::*;
pub use rules::*;
pub use session::*;
