/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Bitboard representation of sets of squares.
mod bitboard;

/// Constant masks and the ray/neighbor primitives.
mod geometry;

/// Colors, piece kinds, and the two-character piece codes.
mod piece;

/// The twelve piece bitboards and queries over them.
mod placement;

/// Squares, files, and ranks.
mod square;

pub use bitboard::*;
pub use geometry::*;
pub use piece::*;
pub use placement::*;
pub use square::*;
