/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::BTreeMap,
    fmt,
    ops::{Index, IndexMut},
};

use tracing::debug;

use crate::{
    is_king_attacked, king_moves, neighbor, rules, total_defense, Action, Bitboard, ChessError,
    Color, File, Piece, PieceKind, Placement, Result, Square, Turn,
};

/// One of the two sides of the board a King may castle toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wing {
    /// Short castling, toward the h-file.
    Kingside,
    /// Long castling, toward the a-file.
    Queenside,
}

impl Wing {
    pub const COUNT: usize = 2;

    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::Kingside, Self::Queenside]
    }

    /// Where the King lands when castling toward this wing.
    #[inline(always)]
    pub const fn king_destination(&self, color: Color) -> Square {
        match self {
            Self::Kingside => Square::king_short_castle(color),
            Self::Queenside => Square::king_long_castle(color),
        }
    }

    /// The corner the castling Rook starts on.
    #[inline(always)]
    pub const fn rook_start(&self, color: Color) -> Square {
        match self {
            Self::Kingside => Square::rook_short_start(color),
            Self::Queenside => Square::rook_long_start(color),
        }
    }

    /// Where the castling Rook lands.
    #[inline(always)]
    pub const fn rook_destination(&self, color: Color) -> Square {
        match self {
            Self::Kingside => Square::rook_short_castle(color),
            Self::Queenside => Square::rook_long_castle(color),
        }
    }

    /// Squares that must be empty: everything strictly between King and Rook.
    pub fn empty_path(&self, color: Color) -> Bitboard {
        let files: &[File] = match self {
            Self::Kingside => &[File::F, File::G],
            Self::Queenside => &[File::B, File::C, File::D],
        };
        Self::path(color, files)
    }

    /// Squares the enemy may not defend: the King's start, transit and destination.
    pub fn safe_path(&self, color: Color) -> Bitboard {
        let files: &[File] = match self {
            Self::Kingside => &[File::E, File::F, File::G],
            Self::Queenside => &[File::C, File::D, File::E],
        };
        Self::path(color, files)
    }

    fn path(color: Color, files: &[File]) -> Bitboard {
        let home = Bitboard::first_rank(color);
        files
            .iter()
            .fold(Bitboard::EMPTY_BOARD, |acc, &file| acc | (home & file))
    }
}

/// The four independent castling flags: one per side per [`Wing`].
///
/// Flags only ever go from `true` to `false` during play; undo is the only way back.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    rights: [[bool; Wing::COUNT]; Color::COUNT],
}

impl CastlingRights {
    /// All four rights held.
    pub const ALL: Self = Self {
        rights: [[true; Wing::COUNT]; Color::COUNT],
    };

    /// No rights held.
    pub const NONE: Self = Self {
        rights: [[false; Wing::COUNT]; Color::COUNT],
    };

    #[inline(always)]
    pub const fn get(&self, color: Color, wing: Wing) -> bool {
        self.rights[color.index()][wing as usize]
    }

    #[inline(always)]
    pub fn revoke(&mut self, color: Color, wing: Wing) {
        self.rights[color][wing as usize] = false;
    }

    /// Revokes both of `color`'s rights.
    #[inline(always)]
    pub fn revoke_all(&mut self, color: Color) {
        self.rights[color] = [false; Wing::COUNT];
    }
}

impl Default for CastlingRights {
    #[inline(always)]
    fn default() -> Self {
        Self::ALL
    }
}

impl Index<Color> for CastlingRights {
    type Output = [bool; Wing::COUNT];
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self.rights[index]
    }
}

impl IndexMut<Color> for CastlingRights {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self.rights[index]
    }
}

impl fmt::Display for CastlingRights {
    /// Formats as the usual `KQkq` string, or `-` if no rights remain.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rights = String::with_capacity(4);
        for (color, [k, q]) in [(Color::White, ['K', 'Q']), (Color::Black, ['k', 'q'])] {
            if self.get(color, Wing::Kingside) {
                rights.push(k);
            }
            if self.get(color, Wing::Queenside) {
                rights.push(q);
            }
        }
        if rights.is_empty() {
            rights.push('-');
        }
        write!(f, "{rights}")
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({self})")
    }
}

/// The piece container: every piece's location plus the castling rights.
///
/// [`Position::set_move`] applies a move with all of its side effects and returns the [`Turn`]
/// that [`Position::unmake`] uses to restore the previous state bit-for-bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    placement: Placement,
    castling: CastlingRights,
}

impl Position {
    /// An empty board with every castling right held.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            placement: Placement::new(),
            castling: CastlingRights::ALL,
        }
    }

    /// The standard opening array with every castling right held.
    #[inline(always)]
    pub const fn standard() -> Self {
        Self {
            placement: Placement::standard(),
            castling: CastlingRights::ALL,
        }
    }

    /// Builds a position from an arbitrary placement and set of rights.
    #[inline(always)]
    pub const fn from_parts(placement: Placement, castling: CastlingRights) -> Self {
        Self {
            placement,
            castling,
        }
    }

    #[inline(always)]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Moves the piece on `from` to `to`, promoting to a Queen if a pawn reaches its last rank.
    ///
    /// Legality is not checked; call [`Position::is_valid_move`] first for untrusted input.
    /// Fails with [`ChessError::IllegalMove`] only if `from` is vacant or equal to `to`,
    /// in which case nothing changes.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Position, Piece, Square};
    /// let mut position = Position::standard();
    /// let turn = position.set_move(Square::G1, Square::F3).unwrap();
    /// assert_eq!(position.placement().piece_at(Square::F3), Some(Piece::WHITE_KNIGHT));
    ///
    /// position.unmake(&turn);
    /// assert_eq!(position, Position::standard());
    /// ```
    #[inline(always)]
    pub fn set_move(&mut self, from: Square, to: Square) -> Result<Turn> {
        self.set_move_promoting(from, to, PieceKind::Queen)
    }

    /// Like [`Position::set_move`], but a promoting pawn becomes `promotion`.
    ///
    /// `promotion` must be a Knight, Bishop, Rook or Queen; anything else is rejected with
    /// [`ChessError::InvalidPieceCode`] before the board is touched.
    pub fn set_move_promoting(&mut self, from: Square, to: Square, promotion: PieceKind) -> Result<Turn> {
        if !promotion.is_promotion_target() {
            return Err(ChessError::InvalidPieceCode(promotion.char().to_string()));
        }
        let Some(mover) = self.placement.piece_at(from) else {
            return Err(ChessError::IllegalMove { from, to });
        };
        if from == to {
            return Err(ChessError::IllegalMove { from, to });
        }

        let before = self.placement;
        let castling_before = self.castling;
        let color = mover.color();

        let captured = self.placement.relocate(from, to);
        debug!(%from, %to, piece = %mover, captured = ?captured, "applying move");

        if mover.is_pawn() && from.file() != to.file() && captured.is_none() {
            self.capture_en_passant(to, color);
        }

        if mover.is_king() && from == Square::king_start(color) {
            self.castle_rook(to, color);
        }

        self.revoke_displaced_rights();

        let mut promoted = None;
        if mover.is_pawn() && Bitboard::eighth_rank(color).intersects(to) {
            self.placement.place(mover.promoted(promotion), to);
            promoted = Some(promotion);
            debug!(square = %to, kind = %promotion, "pawn promoted");
        }

        let action = Action::Move {
            from,
            to,
            promotion: promoted,
        };
        Ok(Turn::new(action, self.changes_since(&before), castling_before))
    }

    /// Undoes `turn` by writing back every bitboard and castling right it recorded.
    ///
    /// `turn` must be the most recent turn applied to this position.
    pub fn unmake(&mut self, turn: &Turn) {
        for (piece, bitboard) in turn.prior_bitboards() {
            self.placement.set_piece(piece, bitboard);
        }
        self.castling = turn.castling_rights();
        debug!(%turn, "undid turn");
    }

    /// Applies `turn` again after it has been undone.
    ///
    /// A move is replayed through [`Position::set_move_promoting`] and a placement through
    /// [`Position::add_piece_to_board`], so the result matches the first application.
    pub fn redo(&mut self, turn: &Turn) -> Result<Turn> {
        debug!(%turn, "redoing turn");
        match *turn.action() {
            Action::Move {
                from,
                to,
                promotion,
            } => self.set_move_promoting(from, to, promotion.unwrap_or(PieceKind::Queen)),
            Action::Place { piece, square } => Ok(self.add_piece_to_board(piece, square)),
        }
    }

    /// Puts `piece` on `square` as the board editor does, replacing any occupant.
    ///
    /// A King or Rook displaced from its home square costs the matching castling rights,
    /// and a pawn placed on its last rank is promoted to a Queen.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Color, Position, Piece, Square, Wing};
    /// let mut position = Position::standard();
    /// position.add_piece_to_board(Piece::BLACK_KNIGHT, Square::H1);
    /// assert!(!position.castling_rights().get(Color::White, Wing::Kingside));
    /// assert!(position.castling_rights().get(Color::White, Wing::Queenside));
    /// ```
    pub fn add_piece_to_board(&mut self, piece: Piece, square: Square) -> Turn {
        let before = self.placement;
        let castling_before = self.castling;

        let piece = if piece.is_pawn() && Bitboard::eighth_rank(piece.color()).intersects(square) {
            piece.promoted(PieceKind::Queen)
        } else {
            piece
        };
        self.placement.place(piece, square);
        debug!(%piece, %square, "placed piece");

        for color in Color::all() {
            for wing in Wing::all() {
                if home_pieces_present(&before, color, wing)
                    && !home_pieces_present(&self.placement, color, wing)
                {
                    self.castling.revoke(color, wing);
                }
            }
        }

        let action = Action::Place { piece, square };
        Turn::new(action, self.changes_since(&before), castling_before)
    }

    /// Returns `true` if `from` holds a piece of `side_to_move` and `to` is one of its legal destinations.
    pub fn is_valid_move(&self, from: Square, to: Square, last_move: Option<&Turn>, side_to_move: Color) -> bool {
        self.placement.color_of(from) == Some(side_to_move)
            && self.valid_moves(from, last_move).intersects(to)
    }

    /// Legal destinations for the piece on `square`, including castling for a King.
    ///
    /// An empty square has no moves.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Position, Square};
    /// let position = Position::standard();
    /// assert_eq!(position.valid_moves(Square::B1, None).population(), 2);
    /// assert!(position.valid_moves(Square::D4, None).is_empty());
    /// ```
    pub fn valid_moves(&self, square: Square, last_move: Option<&Turn>) -> Bitboard {
        match self.placement.piece_at(square) {
            Some(piece) if piece.is_king() => {
                king_moves(&self.placement, square) | self.castling_moves(piece.color(), square)
            }
            Some(_) => rules::valid_moves(&self.placement, square, last_move),
            None => Bitboard::EMPTY_BOARD,
        }
    }

    /// Castling destinations currently open to the King of `color` standing on `king`.
    pub fn castling_moves(&self, color: Color, king: Square) -> Bitboard {
        if king != Square::king_start(color) {
            return Bitboard::EMPTY_BOARD;
        }

        let occupied = self.placement.occupied();
        let defended = total_defense(&self.placement, color.opponent());

        Wing::all()
            .into_iter()
            .filter(|&wing| {
                self.castling.get(color, wing)
                    && home_pieces_present(&self.placement, color, wing)
                    && occupied.is_disjoint(wing.empty_path(color))
                    && defended.is_disjoint(wing.safe_path(color))
            })
            .map(|wing| wing.king_destination(color))
            .collect()
    }

    /// Every square defended by `color`.
    #[inline(always)]
    pub fn total_defense(&self, color: Color) -> Bitboard {
        total_defense(&self.placement, color)
    }

    /// Returns `true` if `color`'s King is attacked.
    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_king_attacked(&self.placement, color)
    }

    /// Returns `true` if no piece of `color` has a legal move.
    pub fn has_no_moves(&self, color: Color, last_move: Option<&Turn>) -> bool {
        self.placement
            .color(color)
            .into_iter()
            .all(|square| self.valid_moves(square, last_move).is_empty())
    }

    fn capture_en_passant(&mut self, to: Square, color: Color) {
        let enemy_pawn = Piece::new(color.opponent(), PieceKind::Pawn);
        if let Some(bypassed) = neighbor(to, color.opponent().forward()) {
            if self.placement.piece_at(bypassed) == Some(enemy_pawn) {
                self.placement.take(bypassed);
                debug!(square = %bypassed, "captured en passant");
            }
        }
    }

    fn castle_rook(&mut self, to: Square, color: Color) {
        let Some(wing) = Wing::all()
            .into_iter()
            .find(|wing| wing.king_destination(color) == to)
        else {
            return;
        };

        let rook = Piece::new(color, PieceKind::Rook);
        let start = wing.rook_start(color);
        if self.placement.piece_at(start) == Some(rook) {
            self.placement.relocate(start, wing.rook_destination(color));
        }
        self.castling.revoke_all(color);
        debug!(?color, ?wing, "castled");
    }

    /// Revokes any right whose King or Rook no longer stands on its home square.
    fn revoke_displaced_rights(&mut self) {
        for color in Color::all() {
            for wing in Wing::all() {
                if self.castling.get(color, wing) && !home_pieces_present(&self.placement, color, wing) {
                    self.castling.revoke(color, wing);
                    debug!(?color, ?wing, "castling right revoked");
                }
            }
        }
    }

    fn changes_since(&self, before: &Placement) -> BTreeMap<Piece, Bitboard> {
        Piece::all()
            .into_iter()
            .filter(|&piece| before.piece(piece) != self.placement.piece(piece))
            .map(|piece| (piece, before.piece(piece)))
            .collect()
    }
}

/// Returns `true` if `color`'s King and the Rook of `wing` both stand on their home squares.
fn home_pieces_present(placement: &Placement, color: Color, wing: Wing) -> bool {
    placement
        .piece(Piece::new(color, PieceKind::King))
        .intersects(Square::king_start(color))
        && placement
            .piece(Piece::new(color, PieceKind::Rook))
            .intersects(wing.rook_start(color))
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.placement)?;
        write!(f, "Castling: {}", self.castling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_of(pieces: &[(Piece, Square)]) -> Position {
        let mut placement = Placement::new();
        for &(piece, square) in pieces {
            placement.place(piece, square);
        }
        Position::from_parts(placement, CastlingRights::ALL)
    }

    #[test]
    fn test_set_move_rejects_vacant_source() {
        let mut position = Position::standard();
        assert_eq!(
            position.set_move(Square::E4, Square::E5),
            Err(ChessError::IllegalMove {
                from: Square::E4,
                to: Square::E5
            })
        );
        assert_eq!(position, Position::standard());
    }

    #[test]
    fn test_capture_records_both_bitboards() {
        let mut position = Position::standard();
        let turn = position.set_move(Square::D1, Square::D7).unwrap();
        assert_eq!(turn.prior(Piece::WHITE_QUEEN), Some(Bitboard::from_square(Square::D1)));
        assert_eq!(turn.prior(Piece::BLACK_PAWN), Some(Bitboard::RANK_7));
        assert_eq!(turn.prior(Piece::WHITE_PAWN), None);
        position.unmake(&turn);
        assert_eq!(position, Position::standard());
    }

    #[test]
    fn test_castling_moves_rook_and_revokes() {
        let mut position = position_of(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::WHITE_ROOK, Square::H1),
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_ROOK, Square::A8),
            (Piece::BLACK_ROOK, Square::H8),
        ]);
        let moves = position.valid_moves(Square::E1, None);
        assert!(moves.intersects(Square::G1));
        assert!(moves.intersects(Square::C1));

        let turn = position.set_move(Square::E1, Square::C1).unwrap();
        assert_eq!(position.placement().piece_at(Square::D1), Some(Piece::WHITE_ROOK));
        assert!(position.placement().piece_at(Square::A1).is_none());
        assert!(!position.castling_rights().get(Color::White, Wing::Kingside));
        assert!(!position.castling_rights().get(Color::White, Wing::Queenside));
        assert!(position.castling_rights().get(Color::Black, Wing::Kingside));

        position.unmake(&turn);
        assert_eq!(position.placement().piece_at(Square::A1), Some(Piece::WHITE_ROOK));
        assert_eq!(position.castling_rights(), CastlingRights::ALL);
    }

    #[test]
    fn test_no_castling_through_defended_square() {
        let position = position_of(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::WHITE_ROOK, Square::H1),
            (Piece::BLACK_ROOK, Square::F8),
            (Piece::BLACK_KING, Square::A8),
        ]);
        let moves = position.valid_moves(Square::E1, None);
        assert!(!moves.intersects(Square::G1));
        assert!(moves.intersects(Square::C1));
    }

    #[test]
    fn test_queenside_b_file_must_be_empty_but_may_be_defended() {
        let position = position_of(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::BLACK_ROOK, Square::B8),
            (Piece::BLACK_KING, Square::H8),
        ]);
        assert!(position.valid_moves(Square::E1, None).intersects(Square::C1));

        let blocked = position_of(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::WHITE_KNIGHT, Square::B1),
            (Piece::BLACK_KING, Square::H8),
        ]);
        assert!(!blocked.valid_moves(Square::E1, None).intersects(Square::C1));
    }

    #[test]
    fn test_promotion_choice_and_undo() {
        let mut position = position_of(&[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_PAWN, Square::B7),
            (Piece::BLACK_ROOK, Square::A8),
            (Piece::BLACK_KING, Square::H8),
        ]);
        let before = position;

        assert_eq!(
            position.set_move_promoting(Square::B7, Square::A8, PieceKind::King),
            Err(ChessError::InvalidPieceCode("K".to_string()))
        );
        assert_eq!(position, before);

        let turn = position
            .set_move_promoting(Square::B7, Square::A8, PieceKind::Knight)
            .unwrap();
        assert_eq!(position.placement().piece_at(Square::A8), Some(Piece::WHITE_KNIGHT));
        assert!(position.placement()[Piece::WHITE_PAWN].is_empty());
        assert!(position.placement()[Piece::BLACK_ROOK].is_empty());
        assert!(position.placement().is_disjoint());
        assert!(matches!(
            turn.action(),
            Action::Move {
                promotion: Some(PieceKind::Knight),
                ..
            }
        ));

        position.unmake(&turn);
        assert_eq!(position, before);
    }

    #[test]
    fn test_black_promotion_and_undo() {
        let mut position = position_of(&[
            (Piece::WHITE_KING, Square::H1),
            (Piece::BLACK_PAWN, Square::B2),
            (Piece::BLACK_KING, Square::E8),
        ]);
        let before = position;

        let turn = position.set_move(Square::B2, Square::B1).unwrap();
        assert_eq!(position.placement().piece_at(Square::B1), Some(Piece::BLACK_QUEEN));
        assert!(position.placement()[Piece::BLACK_PAWN].is_empty());
        assert!(matches!(
            turn.action(),
            Action::Move {
                promotion: Some(PieceKind::Queen),
                ..
            }
        ));

        position.unmake(&turn);
        assert_eq!(position, before);
        assert_eq!(position.placement().piece_at(Square::B2), Some(Piece::BLACK_PAWN));
    }

    #[test]
    fn test_redo_matches_first_application() {
        let mut position = Position::standard();
        let turn = position.set_move(Square::E2, Square::E4).unwrap();
        let after = position;
        position.unmake(&turn);
        let replayed = position.redo(&turn).unwrap();
        assert_eq!(position, after);
        assert_eq!(replayed, turn);
    }

    #[test]
    fn test_editor_placement_undo() {
        let mut position = Position::new();
        let turn = position.add_piece_to_board(Piece::WHITE_PAWN, Square::C8);
        assert_eq!(position.placement().piece_at(Square::C8), Some(Piece::WHITE_QUEEN));
        assert_eq!(position.castling_rights(), CastlingRights::ALL);
        position.unmake(&turn);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_castling_rights_display() {
        let mut rights = CastlingRights::ALL;
        assert_eq!(rights.to_string(), "KQkq");
        rights.revoke(Color::White, Wing::Queenside);
        rights.revoke_all(Color::Black);
        assert_eq!(rights.to_string(), "K");
        assert_eq!(CastlingRights::NONE.to_string(), "-");
    }
}
