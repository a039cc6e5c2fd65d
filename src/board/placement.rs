/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index};

use super::{Bitboard, Color, File, Piece, PieceKind, Rank, Square};

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of castling rights or move history. If you need those, see [`crate::Position`].
///
/// Internally this is one [`Bitboard`] per [`Piece`], indexed by [`Piece::index`].
/// The twelve bitboards are pairwise disjoint: every mutating method here removes
/// any previous occupant before setting a bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    pieces: [Bitboard; Piece::COUNT],
}

impl Placement {
    /// Creates a new, empty [`Placement`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Placement;
    /// assert!(Placement::new().occupied().is_empty());
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            pieces: [Bitboard::EMPTY_BOARD; Piece::COUNT],
        }
    }

    /// Creates a [`Placement`] holding the standard opening array.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Placement, Piece, Square};
    /// let placement = Placement::standard();
    /// assert_eq!(placement.occupied().population(), 32);
    /// assert_eq!(placement.piece_at(Square::D8), Some(Piece::BLACK_QUEEN));
    /// ```
    pub const fn standard() -> Self {
        let mut placement = Self::new();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let colors = Color::all();
        let mut c = 0;
        while c < Color::COUNT {
            let color = colors[c];
            let pawns = Piece::new(color, PieceKind::Pawn).index();
            placement.pieces[pawns] = Bitboard::second_rank(color);

            let home = Bitboard::first_rank(color);
            let mut f = 0;
            while f < File::COUNT {
                let index = Piece::new(color, back_rank[f]).index();
                let square = home.and(Bitboard::from_file(File::new_unchecked(f as u8)));
                placement.pieces[index] = placement.pieces[index].or(square);
                f += 1;
            }
            c += 1;
        }

        placement
    }

    /// Fetches the [`Bitboard`] of every occurrence of `piece`.
    #[inline(always)]
    pub const fn piece(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Overwrites the [`Bitboard`] of `piece` wholesale.
    ///
    /// Used to restore recorded bitboards on undo; callers are responsible for disjointness.
    #[inline(always)]
    pub(crate) fn set_piece(&mut self, piece: Piece, bitboard: Bitboard) {
        self.pieces[piece.index()] = bitboard;
    }

    /// All squares occupied by `color`.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Placement, Color, Bitboard};
    /// let placement = Placement::standard();
    /// assert_eq!(placement.color(Color::White), Bitboard::RANK_1 | Bitboard::RANK_2);
    /// ```
    #[inline(always)]
    pub fn color(&self, color: Color) -> Bitboard {
        let start = color.index() * PieceKind::COUNT;
        self.pieces[start..start + PieceKind::COUNT]
            .iter()
            .fold(Bitboard::EMPTY_BOARD, |acc, &bb| acc | bb)
    }

    /// All occupied squares.
    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.pieces
            .iter()
            .fold(Bitboard::EMPTY_BOARD, |acc, &bb| acc | bb)
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Placement, Piece, Square};
    /// let placement = Placement::standard();
    /// assert_eq!(placement.piece_at(Square::A2), Some(Piece::WHITE_PAWN));
    /// assert!(placement.piece_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Piece::all()
            .into_iter()
            .find(|&piece| self.pieces[piece.index()].intersects(square))
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_of(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn kind_of(&self, square: Square) -> Option<PieceKind> {
        self.piece_at(square).map(|piece| piece.kind())
    }

    /// Every piece sharing a color with the occupant of `square`, or an empty board if it is vacant.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Placement, Bitboard, Square};
    /// let placement = Placement::standard();
    /// assert_eq!(placement.friendly_pieces(Square::E8), Bitboard::RANK_7 | Bitboard::RANK_8);
    /// assert!(placement.friendly_pieces(Square::E4).is_empty());
    /// ```
    #[inline(always)]
    pub fn friendly_pieces(&self, square: Square) -> Bitboard {
        self.color_of(square)
            .map(|color| self.color(color))
            .unwrap_or_default()
    }

    /// Every piece of the opposite color to the occupant of `square`, or an empty board if it is vacant.
    #[inline(always)]
    pub fn enemy_pieces(&self, square: Square) -> Bitboard {
        self.color_of(square)
            .map(|color| self.color(color.opponent()))
            .unwrap_or_default()
    }

    /// All Bishops, Rooks and Queens of `color`.
    #[inline(always)]
    pub fn sliding_pieces(&self, color: Color) -> Bitboard {
        self.piece(Piece::new(color, PieceKind::Bishop))
            | self.piece(Piece::new(color, PieceKind::Rook))
            | self.piece(Piece::new(color, PieceKind::Queen))
    }

    /// The square of `color`'s King, if it has one.
    ///
    /// Only the lowest one is returned if the editor has placed several.
    #[inline(always)]
    pub fn king(&self, color: Color) -> Option<Square> {
        self.piece(Piece::new(color, PieceKind::King)).lsb()
    }

    /// Places `piece` on `square`, removing whatever occupied it before.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Placement, Piece, Square};
    /// let mut placement = Placement::standard();
    /// placement.place(Piece::WHITE_QUEEN, Square::E7);
    /// assert_eq!(placement.piece_at(Square::E7), Some(Piece::WHITE_QUEEN));
    /// assert_eq!(placement.occupied().population(), 32);
    /// ```
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.take(square);
        self.pieces[piece.index()].set(square);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square)?;
        self.pieces[piece.index()].clear(square);
        Some(piece)
    }

    /// Moves whatever stands on `from` to `to`, capturing any occupant of `to`.
    ///
    /// Returns the piece captured on `to`, if any.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let captured = self.take(to);
        if let Some(piece) = self.take(from) {
            self.pieces[piece.index()].set(to);
        }
        captured
    }

    /// Checks that no two piece bitboards share a square.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Placement;
    /// assert!(Placement::standard().is_disjoint());
    /// ```
    pub fn is_disjoint(&self) -> bool {
        let mut seen = Bitboard::EMPTY_BOARD;
        for bb in self.pieces {
            if seen.intersects(bb) {
                return false;
            }
            seen |= bb;
        }
        true
    }

    /// Iterates every occupied square together with its [`Piece`], from `a1` to `h8`.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .into_iter()
            .filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }
}

impl Index<Piece> for Placement {
    type Output = Bitboard;
    #[inline(always)]
    fn index(&self, index: Piece) -> &Self::Output {
        &self.pieces[index]
    }
}

impl fmt::Display for Placement {
    /// Renders an 8x8 diagram of two-character piece codes, White at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(256);

        for rank in Rank::iter().rev() {
            let row = File::iter()
                .map(|file| {
                    self.piece_at(Square::new(file, rank))
                        .map_or("..", |piece| piece.code())
                })
                .collect::<Vec<_>>()
                .join(" ");

            board += &format!("{rank}| {row}\n");
        }
        board += " +";
        for _ in File::iter() {
            board += "---";
        }
        board += "\n   ";
        for file in File::iter() {
            board += &format!("{file}  ");
        }

        write!(f, "{}", board.trim_end())
    }
}

impl fmt::Debug for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (piece, bb) in Piece::all().iter().zip(self.pieces) {
            map.entry(&piece.code(), &bb.to_hex_string());
        }
        map.finish()
    }
}
