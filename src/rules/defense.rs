/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{
    adjacent_squares, knight_squares, neighbor, walk, Bitboard, Color, Direction, PieceKind,
    Placement, Square,
};

/// Squares the piece on `square` could capture on if every occupant, friend or foe, were capturable.
///
/// Returns an empty board if `square` is vacant.
///
/// # Example
/// ```
/// # use chessmap::{defended_squares, Placement, Square};
/// let placement = Placement::standard();
/// // The b1 knight covers a3, c3 and the d2 pawn it stands behind.
/// assert_eq!(defended_squares(&placement, Square::B1).population(), 3);
/// // The a1 rook is boxed in: it only covers a2 and b1.
/// assert_eq!(defended_squares(&placement, Square::A1).population(), 2);
/// ```
pub fn defended_squares(placement: &Placement, square: Square) -> Bitboard {
    let Some(piece) = placement.piece_at(square) else {
        return Bitboard::EMPTY_BOARD;
    };

    match piece.kind() {
        PieceKind::Pawn => pawn_defense(square, piece.color()),
        PieceKind::Knight => knight_squares(square),
        PieceKind::King => adjacent_squares(square),
        PieceKind::Bishop => sliding_defense(placement, square, &Direction::DIAGONAL),
        PieceKind::Rook => sliding_defense(placement, square, &Direction::ORTHOGONAL),
        PieceKind::Queen => {
            sliding_defense(placement, square, &Direction::DIAGONAL)
                | sliding_defense(placement, square, &Direction::ORTHOGONAL)
        }
    }
}

/// The two squares diagonally in front of a pawn of `color` standing on `square`.
///
/// Pushes are not attacks, so the square directly ahead is never included.
#[inline(always)]
pub fn pawn_defense(square: Square, color: Color) -> Bitboard {
    color
        .pawn_captures()
        .into_iter()
        .filter_map(|direction| neighbor(square, direction))
        .collect()
}

/// Walks each of `directions` from `square`, stopping after the first occupied square.
///
/// The blocker itself is included; everything behind it is not.
pub fn sliding_defense(placement: &Placement, square: Square, directions: &[Direction]) -> Bitboard {
    let occupied = placement.occupied();
    let mut defense = Bitboard::EMPTY_BOARD;

    for &direction in directions {
        for sq in walk(square, direction) {
            defense.set(sq);
            if occupied.intersects(sq) {
                break;
            }
        }
    }

    defense
}

/// Every square defended by at least one piece of `color`.
///
/// # Example
/// ```
/// # use chessmap::{total_defense, Bitboard, Color, Placement};
/// let placement = Placement::standard();
/// // Every square of the third rank is covered by a white pawn.
/// assert!(total_defense(&placement, Color::White).is_superset(Bitboard::RANK_3));
/// assert!(total_defense(&placement, Color::White).is_disjoint(Bitboard::RANK_4));
/// ```
pub fn total_defense(placement: &Placement, color: Color) -> Bitboard {
    placement
        .color(color)
        .into_iter()
        .fold(Bitboard::EMPTY_BOARD, |acc, sq| {
            acc | defended_squares(placement, sq)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Piece;

    #[test]
    fn test_slider_includes_blocker() {
        let mut placement = Placement::new();
        placement.place(Piece::WHITE_ROOK, Square::D4);
        placement.place(Piece::WHITE_PAWN, Square::D6);
        placement.place(Piece::BLACK_PAWN, Square::F4);

        let defense = defended_squares(&placement, Square::D4);
        assert!(defense.intersects(Square::D5));
        assert!(defense.intersects(Square::D6));
        assert!(!defense.intersects(Square::D7));
        assert!(defense.intersects(Square::F4));
        assert!(!defense.intersects(Square::G4));
        assert!(defense.intersects(Square::A4));
        assert!(defense.intersects(Square::D1));
        assert_eq!(defense.population(), 2 + 2 + 3 + 3);
    }

    #[test]
    fn test_pawn_defense_edges() {
        assert_eq!(
            pawn_defense(Square::A2, Color::White),
            Bitboard::from_square(Square::B3)
        );
        assert_eq!(
            pawn_defense(Square::E7, Color::Black),
            Bitboard::from_square(Square::D6) | Square::F6
        );
        assert!(pawn_defense(Square::C8, Color::White).is_empty());
    }

    #[test]
    fn test_queen_defense_on_empty_board() {
        let mut placement = Placement::new();
        placement.place(Piece::BLACK_QUEEN, Square::D4);
        assert_eq!(defended_squares(&placement, Square::D4).population(), 27);
    }

    #[test]
    fn test_vacant_square_defends_nothing() {
        assert!(defended_squares(&Placement::standard(), Square::E4).is_empty());
    }
}
