/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{raystar, total_defense, walk, Color, Direction, Placement, Square};

/// Returns `true` if the King sharing a color with the piece on `square` is attacked.
///
/// A vacant `square`, or a side without a King, is never in check.
///
/// # Example
/// ```
/// # use chessmap::{is_in_check, Placement, Piece, Square};
/// let mut placement = Placement::new();
/// placement.place(Piece::WHITE_KING, Square::E1);
/// placement.place(Piece::WHITE_PAWN, Square::A2);
/// placement.place(Piece::BLACK_ROOK, Square::E8);
/// assert!(is_in_check(&placement, Square::A2));
/// assert!(!is_in_check(&placement, Square::E8));
/// ```
#[inline(always)]
pub fn is_in_check(placement: &Placement, square: Square) -> bool {
    placement
        .color_of(square)
        .is_some_and(|color| is_king_attacked(placement, color))
}

/// Returns `true` if `color`'s King stands on a square defended by the other side.
pub fn is_king_attacked(placement: &Placement, color: Color) -> bool {
    placement
        .king(color)
        .is_some_and(|king| total_defense(placement, color.opponent()).intersects(king))
}

/// Returns `true` if the piece on `square` may not leave the line between its King and an enemy slider.
///
/// All of the following must hold:
/// 1. the piece is not its own King;
/// 2. it lies on its King's rank, file or one of its diagonals;
/// 3. nothing stands between the King and the piece;
/// 4. beyond the piece, the first occupied square holds an enemy slider able to move along that line.
///
/// # Example
/// ```
/// # use chessmap::{is_pinned, Placement, Piece, Square};
/// let mut placement = Placement::new();
/// placement.place(Piece::WHITE_KING, Square::E1);
/// placement.place(Piece::WHITE_KNIGHT, Square::E4);
/// placement.place(Piece::BLACK_ROOK, Square::E8);
/// assert!(is_pinned(&placement, Square::E4));
///
/// // A bishop does not pin along a file.
/// placement.place(Piece::BLACK_BISHOP, Square::E8);
/// assert!(!is_pinned(&placement, Square::E4));
/// ```
pub fn is_pinned(placement: &Placement, square: Square) -> bool {
    let Some(piece) = placement.piece_at(square) else {
        return false;
    };
    if piece.is_king() {
        return false;
    }
    let Some(king) = placement.king(piece.color()) else {
        return false;
    };
    if !raystar(king).intersects(square) {
        return false;
    }
    let Some(direction) = Direction::between(king, square) else {
        return false;
    };

    let occupied = placement.occupied();
    let first_from_king = walk(king, direction).find(|&sq| occupied.intersects(sq));
    if first_from_king != Some(square) {
        return false;
    }

    walk(square, direction)
        .find(|&sq| occupied.intersects(sq))
        .and_then(|sq| placement.piece_at(sq))
        .is_some_and(|attacker| {
            attacker.color() != piece.color() && attacker.slides_along(direction)
        })
}
