/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::trace;

use crate::{
    adjacent_squares, connecting_ray, defended_squares, is_in_check, is_king_attacked, is_pinned,
    neighbor, pawn_defense, Bitboard, Piece, PieceKind, Placement, Square, Turn,
};

/// Legal destinations for the piece on `square`, given the move that was just played.
///
/// Castling is not included here; see [`crate::Position::valid_moves`].
/// A vacant `square` yields an empty board.
///
/// # Example
/// ```
/// # use chessmap::{valid_moves, Placement, Square};
/// let placement = Placement::standard();
/// assert_eq!(valid_moves(&placement, Square::E2, None).population(), 2);
/// assert_eq!(valid_moves(&placement, Square::G1, None).population(), 2);
/// assert!(valid_moves(&placement, Square::E1, None).is_empty());
/// assert!(valid_moves(&placement, Square::E4, None).is_empty());
/// ```
pub fn valid_moves(placement: &Placement, square: Square, last_move: Option<&Turn>) -> Bitboard {
    let Some(piece) = placement.piece_at(square) else {
        return Bitboard::EMPTY_BOARD;
    };

    if piece.is_king() {
        return king_moves(placement, square);
    }

    let en_passant = en_passant_target(placement, square, last_move);
    let mut moves = match piece.kind() {
        PieceKind::Pawn => pawn_moves(placement, square, en_passant),
        _ => defended_squares(placement, square) & !placement.friendly_pieces(square),
    };

    if is_pinned(placement, square) {
        if let Some(king) = placement.king(piece.color()) {
            moves &= connecting_ray(square, king);
        }
    }

    if is_in_check(placement, square) {
        return check_blocking_moves(placement, square, moves, en_passant);
    }

    // Removing two pawns from one rank can expose the King sideways, which no pin test sees.
    if let Some(target) = en_passant.filter(|&target| moves.intersects(target)) {
        if !leaves_king_safe(placement, square, target, en_passant) {
            moves.clear(target);
        }
    }

    moves
}

/// Adjacent squares not held by a friendly piece, on which the King would not be attacked.
///
/// Each candidate is tested against the board as it would be after the move, so a King
/// can neither capture a defended piece nor step backward along the ray of a checking slider.
pub fn king_moves(placement: &Placement, square: Square) -> Bitboard {
    let candidates = adjacent_squares(square) & !placement.friendly_pieces(square);
    candidates
        .into_iter()
        .filter(|&to| leaves_king_safe(placement, square, to, None))
        .collect()
}

/// Pushes, double pushes from the starting rank, diagonal captures and the en passant capture.
pub fn pawn_moves(placement: &Placement, square: Square, en_passant: Option<Square>) -> Bitboard {
    let Some(color) = placement.color_of(square) else {
        return Bitboard::EMPTY_BOARD;
    };
    let occupied = placement.occupied();
    let forward = color.forward();
    let mut moves = Bitboard::EMPTY_BOARD;

    if let Some(one) = neighbor(square, forward).filter(|&sq| !occupied.intersects(sq)) {
        moves.set(one);

        if Bitboard::second_rank(color).intersects(square) {
            if let Some(two) = neighbor(one, forward).filter(|&sq| !occupied.intersects(sq)) {
                moves.set(two);
            }
        }
    }

    moves |= pawn_defense(square, color) & placement.color(color.opponent());

    if let Some(target) = en_passant {
        moves.set(target);
    }

    moves
}

/// The square the pawn on `square` may capture en passant onto, if `last_move` allows one.
///
/// `last_move` must be an enemy pawn advancing two ranks to land beside this pawn, which
/// in turn must stand on its fifth rank. The target is the square the enemy pawn skipped.
///
/// # Example
/// ```
/// # use chessmap::{en_passant_target, Placement, Piece, Position, Square};
/// let mut position = Position::standard();
/// position.set_move(Square::E2, Square::E5).unwrap();
/// let turn = position.set_move(Square::D7, Square::D5).unwrap();
///
/// let target = en_passant_target(position.placement(), Square::E5, Some(&turn));
/// assert_eq!(target, Some(Square::D6));
/// ```
pub fn en_passant_target(
    placement: &Placement,
    square: Square,
    last_move: Option<&Turn>,
) -> Option<Square> {
    let pawn = placement.piece_at(square).filter(Piece::is_pawn)?;
    let color = pawn.color();
    if !Bitboard::fifth_rank(color).intersects(square) {
        return None;
    }

    let (from, to) = last_move?.as_move()?;
    let enemy_pawn = Piece::new(color.opponent(), PieceKind::Pawn);

    let advanced_two = from.file() == to.file() && from.distance_ranks(to) == 2;
    let beside = to.rank() == square.rank() && to.distance_files(square) == 1;

    if placement.piece_at(to) == Some(enemy_pawn) && advanced_two && beside {
        neighbor(to, color.forward())
    } else {
        None
    }
}

/// Keeps only the `candidates` after which the mover's King is no longer attacked.
///
/// Every candidate is tried on a scratch copy of `placement` (see [`probe`]); `placement` itself is never touched.
pub fn check_blocking_moves(
    placement: &Placement,
    square: Square,
    candidates: Bitboard,
    en_passant: Option<Square>,
) -> Bitboard {
    candidates
        .into_iter()
        .filter(|&to| {
            let safe = leaves_king_safe(placement, square, to, en_passant);
            trace!(from = %square, %to, safe, "check-blocking probe");
            safe
        })
        .collect()
}

/// Returns the placement that would result from moving the piece on `from` to `to`.
///
/// Any occupant of `to` is captured. If the mover is a pawn landing on `en_passant`,
/// the enemy pawn it passes is removed as well. Castling and promotion are not applied,
/// as neither changes which squares the mover's King is attacked from.
pub fn probe(placement: &Placement, from: Square, to: Square, en_passant: Option<Square>) -> Placement {
    let mut scratch = *placement;
    let mover = scratch.piece_at(from);
    scratch.relocate(from, to);

    if let Some(pawn) = mover.filter(|p| p.is_pawn() && Some(to) == en_passant) {
        if let Some(bypassed) = neighbor(to, pawn.color().opponent().forward()) {
            scratch.take(bypassed);
        }
    }

    scratch
}

fn leaves_king_safe(placement: &Placement, from: Square, to: Square, en_passant: Option<Square>) -> bool {
    let Some(color) = placement.color_of(from) else {
        return false;
    };
    !is_king_attacked(&probe(placement, from, to, en_passant), color)
}
