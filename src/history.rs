/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeMap, fmt};

use tracing::debug;

use crate::{Bitboard, CastlingRights, ChessError, Color, Piece, PieceKind, Result, Square};

/// What a [`Turn`] did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// A piece moved from one square to another.
    ///
    /// `promotion` is set only if a pawn actually promoted on this move.
    Move {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },

    /// A piece was put on the board by the editor.
    Place { piece: Piece, square: Square },
}

/// An immutable record of one ply, holding everything needed to undo it.
///
/// Alongside the [`Action`], a [`Turn`] stores the prior [`Bitboard`] of every piece
/// the action touched and the castling rights as they were before it. Undoing a turn
/// writes those values back verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    action: Action,
    prior: BTreeMap<Piece, Bitboard>,
    castling: CastlingRights,
}

impl Turn {
    pub(crate) fn new(action: Action, prior: BTreeMap<Piece, Bitboard>, castling: CastlingRights) -> Self {
        Self {
            action,
            prior,
            castling,
        }
    }

    #[inline(always)]
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// The source and destination of this turn, if it was a move rather than a placement.
    #[inline(always)]
    pub const fn as_move(&self) -> Option<(Square, Square)> {
        match self.action {
            Action::Move { from, to, .. } => Some((from, to)),
            Action::Place { .. } => None,
        }
    }

    /// The bitboard `piece` had before this turn, if this turn changed it.
    #[inline(always)]
    pub fn prior(&self, piece: Piece) -> Option<Bitboard> {
        self.prior.get(&piece).copied()
    }

    /// Every bitboard this turn changed, with its value from before the turn.
    pub fn prior_bitboards(&self) -> impl Iterator<Item = (Piece, Bitboard)> + '_ {
        self.prior.iter().map(|(&piece, &bb)| (piece, bb))
    }

    /// Castling rights as they were before this turn.
    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Move {
                from,
                to,
                promotion: None,
            } => write!(f, "{from}{to}"),
            Action::Move {
                from,
                to,
                promotion: Some(kind),
            } => write!(f, "{from}{to}={}", kind.char()),
            Action::Place { piece, square } => write!(f, "{piece}@{square}"),
        }
    }
}

/// The ledger of every [`Turn`] played, with a cursor for undo and redo.
///
/// The cursor (`move_count`) counts how many turns are currently applied to the board.
/// Turns beyond the cursor are the redo branch; recording a new turn discards them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveHistory {
    turns: Vec<Turn>,
    move_count: usize,
    is_blacks_turn: bool,
}

impl MoveHistory {
    /// An empty ledger, with White to move.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `turn` at the cursor, discarding any redo branch, and passes the move to the other side.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{MoveHistory, Position, Square};
    /// let mut position = Position::standard();
    /// let mut history = MoveHistory::new();
    ///
    /// history.add_move(position.set_move(Square::E2, Square::E4).unwrap());
    /// assert_eq!(history.move_count(), 1);
    /// assert!(history.is_blacks_turn());
    /// ```
    pub fn add_move(&mut self, turn: Turn) {
        if self.turns.len() > self.move_count {
            debug!(
                discarded = self.turns.len() - self.move_count,
                "truncating redo branch"
            );
            self.turns.truncate(self.move_count);
        }

        self.turns.push(turn);
        self.move_count += 1;
        self.switch_turns();
    }

    /// Advances the cursor and returns the turn that must be replayed.
    ///
    /// Fails with [`ChessError::OutOfRange`] if there is nothing to redo.
    pub fn get_next(&mut self) -> Result<&Turn> {
        if !self.has_next() {
            return Err(ChessError::OutOfRange {
                requested: self.move_count + 1,
                recorded: self.turns.len(),
            });
        }

        self.move_count += 1;
        self.switch_turns();
        Ok(&self.turns[self.move_count - 1])
    }

    /// Returns the turn under the cursor, which must be undone, and retreats the cursor.
    ///
    /// Fails with [`ChessError::OutOfRange`] if no turn is applied.
    pub fn get_prev(&mut self) -> Result<&Turn> {
        if !self.has_prev() {
            return Err(ChessError::OutOfRange {
                requested: 0,
                recorded: self.turns.len(),
            });
        }

        self.move_count -= 1;
        self.switch_turns();
        Ok(&self.turns[self.move_count])
    }

    /// The last applied turn, without moving the cursor.
    #[inline(always)]
    pub fn most_recent(&self) -> Option<&Turn> {
        self.move_count
            .checked_sub(1)
            .and_then(|index| self.turns.get(index))
    }

    #[inline(always)]
    pub fn has_next(&self) -> bool {
        self.move_count < self.turns.len()
    }

    #[inline(always)]
    pub fn has_prev(&self) -> bool {
        self.move_count > 0
    }

    /// Number of turns currently applied.
    #[inline(always)]
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Number of turns recorded, including the redo branch.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[inline(always)]
    pub fn is_blacks_turn(&self) -> bool {
        self.is_blacks_turn
    }

    /// The side to move.
    #[inline(always)]
    pub fn active_player(&self) -> Color {
        Color::from_bool(self.is_blacks_turn)
    }

    /// Overrides the side to move, e.g. when setting up a position in the editor.
    #[inline(always)]
    pub fn set_active_player(&mut self, color: Color) {
        self.is_blacks_turn = color.is_black();
    }

    /// The applied turns, oldest first.
    pub fn applied(&self) -> &[Turn] {
        &self.turns[..self.move_count]
    }

    /// Every recorded turn, including the redo branch.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[inline(always)]
    fn switch_turns(&mut self) {
        self.is_blacks_turn = !self.is_blacks_turn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(from: Square, to: Square) -> Turn {
        Turn::new(
            Action::Move {
                from,
                to,
                promotion: None,
            },
            BTreeMap::new(),
            CastlingRights::default(),
        )
    }

    #[test]
    fn test_navigation_bounds() {
        let mut history = MoveHistory::new();
        assert_eq!(
            history.get_prev(),
            Err(ChessError::OutOfRange {
                requested: 0,
                recorded: 0
            })
        );
        assert!(history.get_next().is_err());
        assert!(!history.is_blacks_turn());

        history.add_move(turn(Square::E2, Square::E4));
        assert_eq!(history.get_prev().unwrap().as_move(), Some((Square::E2, Square::E4)));
        assert!(!history.is_blacks_turn());
        assert!(history.get_prev().is_err());
        assert!(!history.is_blacks_turn());

        assert_eq!(history.get_next().unwrap().as_move(), Some((Square::E2, Square::E4)));
        assert!(history.is_blacks_turn());
        assert!(history.get_next().is_err());
    }

    #[test]
    fn test_branch_truncation() {
        let mut history = MoveHistory::new();
        history.add_move(turn(Square::E2, Square::E4));
        history.add_move(turn(Square::E7, Square::E5));
        history.add_move(turn(Square::G1, Square::F3));

        history.get_prev().unwrap();
        history.get_prev().unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.has_next());

        history.add_move(turn(Square::D7, Square::D5));
        assert_eq!(history.len(), 2);
        assert_eq!(history.move_count(), 2);
        assert!(!history.has_next());
        assert_eq!(history.most_recent().unwrap().to_string(), "d7d5");
        assert!(!history.is_blacks_turn());
    }

    #[test]
    fn test_most_recent_does_not_move_cursor() {
        let mut history = MoveHistory::new();
        assert!(history.most_recent().is_none());
        history.add_move(turn(Square::B1, Square::C3));
        assert_eq!(history.most_recent().unwrap().to_string(), "b1c3");
        assert_eq!(history.move_count(), 1);
    }

    #[test]
    fn test_turn_display() {
        let promotion = Turn::new(
            Action::Move {
                from: Square::A7,
                to: Square::A8,
                promotion: Some(PieceKind::Knight),
            },
            BTreeMap::new(),
            CastlingRights::default(),
        );
        assert_eq!(promotion.to_string(), "a7a8=N");

        let placement = Turn::new(
            Action::Place {
                piece: Piece::BLACK_KING,
                square: Square::H8,
            },
            BTreeMap::new(),
            CastlingRights::default(),
        );
        assert_eq!(placement.to_string(), "bK@h8");
        assert!(placement.as_move().is_none());
    }
}
