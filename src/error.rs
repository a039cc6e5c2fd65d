/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Error types shared by every layer of the rules engine.

use thiserror::Error;

use crate::Square;

/// Errors that can occur while converting input or mutating a game.
///
/// Every mutating operation validates its input before touching any state,
/// so receiving one of these means the game is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A square string was malformed, or a bitboard used as a square did not have exactly one bit set.
    #[error("Invalid position: {0:?}")]
    InvalidPosition(String),

    /// A piece code was not one of the twelve `<color><type>` codes (e.g. `"bK"`).
    #[error("Invalid piece code: {0:?}")]
    InvalidPieceCode(String),

    /// History navigation was attempted past either end of the recorded moves.
    #[error("No move at index {requested}: history holds {recorded} move(s)")]
    OutOfRange { requested: usize, recorded: usize },

    /// A move was rejected by the legality check.
    #[error("Illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },
}

/// Result type alias for rules engine operations.
pub type Result<T, E = ChessError> = std::result::Result<T, E>;
