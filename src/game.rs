/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeMap, fmt};

use tracing::{debug, info};

use crate::{
    Bitboard, ChessError, Color, MoveHistory, Piece, PieceKind, Position, Result, Square, Turn,
};

/// Library-side options for a [`Game`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// If set, moves are applied without checking legality or whose turn it is.
    pub free_play: bool,

    /// The piece a pawn becomes when [`Game::set_move`] promotes it.
    pub promotion: PieceKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            free_play: false,
            promotion: PieceKind::Queen,
        }
    }
}

/// The narrow set of capabilities a user interface needs from a rules engine.
pub trait RulesEngine {
    /// Resets to the standard opening with an empty history.
    fn new_game(&mut self);

    /// Plays `from` to `to`.
    fn make_move(&mut self, from: Square, to: Square) -> Result<()>;

    /// Takes back the most recent turn.
    fn undo(&mut self) -> Result<()>;

    /// Replays the turn most recently taken back.
    fn redo(&mut self) -> Result<()>;

    /// Legal destinations for the piece on `square`.
    fn valid_moves(&self, square: Square) -> Bitboard;

    /// Every occupied square and its piece. Squares absent from the map are empty.
    fn board(&self) -> BTreeMap<Square, Piece>;

    /// The side that has won, if the side to move has no legal move.
    fn winner(&self) -> Option<Color>;
}

/// A game of chess: a [`Position`], the [`MoveHistory`] that led to it, and its [`GameConfig`].
///
/// Every mutating method validates its input before touching anything, so an `Err` leaves
/// both the board and the history exactly as they were.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Game {
    position: Position,
    history: MoveHistory,
    config: GameConfig,
}

impl Game {
    /// A game at the standard opening.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Color, Game, GameConfig};
    /// let game = Game::new(GameConfig::default());
    /// assert_eq!(game.active_player(), Color::White);
    /// assert_eq!(game.board().len(), 32);
    /// ```
    pub fn new(config: GameConfig) -> Self {
        Self::from_position(Position::standard(), config)
    }

    /// A game starting from `position` with an empty history.
    pub fn from_position(position: Position, config: GameConfig) -> Self {
        Self {
            position,
            history: MoveHistory::new(),
            config,
        }
    }

    /// Resets to the standard opening and forgets every turn.
    pub fn new_game(&mut self) {
        self.position = Position::standard();
        self.history = MoveHistory::new();
        info!("new game");
    }

    /// Empties the board, restores every castling right and forgets every turn.
    pub fn clear(&mut self) {
        self.position = Position::new();
        self.history = MoveHistory::new();
        info!("board cleared");
    }

    /// Resets to the standard opening and plays `moves` in order, each checked for legality.
    ///
    /// If any move is rejected, the game is left as it was before the call.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Game, GameConfig, Square};
    /// let mut game = Game::new(GameConfig::default());
    /// game.load_game(&[(Square::E2, Square::E4), (Square::E7, Square::E5)]).unwrap();
    /// assert_eq!(game.history().move_count(), 2);
    ///
    /// assert!(game.load_game(&[(Square::E2, Square::E5)]).is_err());
    /// assert_eq!(game.history().move_count(), 2);
    /// ```
    pub fn load_game(&mut self, moves: &[(Square, Square)]) -> Result<()> {
        let mut loaded = Self::new(self.config);
        for &(from, to) in moves {
            loaded.play(from, to, self.config.promotion, true)?;
        }

        info!(turns = moves.len(), "game loaded");
        *self = loaded;
        Ok(())
    }

    /// Overrides the side to move.
    #[inline(always)]
    pub fn set_active_player(&mut self, color: Color) {
        self.history.set_active_player(color);
    }

    /// Plays `from` to `to`, promoting to the configured piece if a pawn reaches its last rank.
    ///
    /// Outside free play, a move that is not legal for the side to move is rejected with
    /// [`ChessError::IllegalMove`].
    #[inline(always)]
    pub fn set_move(&mut self, from: Square, to: Square) -> Result<&Turn> {
        self.set_move_promoting(from, to, self.config.promotion)
    }

    /// Like [`Game::set_move`], but a promoting pawn becomes `promotion`.
    pub fn set_move_promoting(&mut self, from: Square, to: Square, promotion: PieceKind) -> Result<&Turn> {
        self.play(from, to, promotion, !self.config.free_play)
    }

    /// A copy of this game with `from` to `to` played on it. `self` is left alone.
    pub fn with_move_made(&self, from: Square, to: Square, promotion: PieceKind) -> Result<Self> {
        let mut game = self.clone();
        game.set_move_promoting(from, to, promotion)?;
        Ok(game)
    }

    /// Puts `piece` on `square` through the board editor and records it as a turn.
    pub fn add_piece(&mut self, piece: Piece, square: Square) -> &Turn {
        let turn = self.position.add_piece_to_board(piece, square);
        self.record(turn)
    }

    /// Returns `true` if the side to move may play `from` to `to`.
    #[inline(always)]
    pub fn is_valid_move(&self, from: Square, to: Square) -> bool {
        self.position
            .is_valid_move(from, to, self.history.most_recent(), self.active_player())
    }

    /// Legal destinations for the piece on `square`.
    ///
    /// Outside free play, pieces of the side not to move have none.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Game, GameConfig, Square};
    /// let game = Game::new(GameConfig::default());
    /// assert_eq!(game.valid_moves(Square::E2).population(), 2);
    /// assert!(game.valid_moves(Square::E7).is_empty());
    /// ```
    pub fn valid_moves(&self, square: Square) -> Bitboard {
        let movable = self.config.free_play
            || self.position.placement().color_of(square) == Some(self.active_player());
        if !movable {
            return Bitboard::EMPTY_BOARD;
        }
        self.position.valid_moves(square, self.history.most_recent())
    }

    /// [`Game::valid_moves`] for a square given in two-character notation, such as `"e2"`.
    pub fn valid_moves_at(&self, square: &str) -> Result<Bitboard> {
        Ok(self.valid_moves(square.parse()?))
    }

    /// Every legal `(from, to)` pair for the side to move.
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        let last_move = self.history.most_recent();
        self.position
            .placement()
            .color(self.active_player())
            .into_iter()
            .flat_map(|from| {
                self.position
                    .valid_moves(from, last_move)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Replays the next turn in the history.
    ///
    /// Fails with [`ChessError::OutOfRange`] if nothing has been taken back.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let turn = self.history.get_next()?;
        if let Err(err) = self.position.redo(turn) {
            self.history.get_prev()?;
            return Err(err);
        }
        Ok(())
    }

    /// Takes back the most recent turn.
    ///
    /// Fails with [`ChessError::OutOfRange`] if no turn has been played.
    pub fn prev(&mut self) -> Result<()> {
        let turn = self.history.get_prev()?;
        self.position.unmake(turn);
        Ok(())
    }

    #[inline(always)]
    pub fn has_next(&self) -> bool {
        self.history.has_next()
    }

    #[inline(always)]
    pub fn has_prev(&self) -> bool {
        self.history.has_prev()
    }

    /// Every occupied square and its piece.
    pub fn board(&self) -> BTreeMap<Square, Piece> {
        self.position.placement().iter().collect()
    }

    /// Every square defended by `color`.
    #[inline(always)]
    pub fn total_defense(&self, color: Color) -> Bitboard {
        self.position.total_defense(color)
    }

    #[inline(always)]
    pub fn active_player(&self) -> Color {
        self.history.active_player()
    }

    /// Returns `true` if `color`'s King is attacked.
    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.position.is_in_check(color)
    }

    /// The opponent of the side to move, if the side to move has no legal move.
    ///
    /// This does not tell checkmate from stalemate; combine it with [`Game::is_in_check`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Color, Game, GameConfig, Square};
    /// let mut game = Game::new(GameConfig::default());
    /// let moves = [
    ///     (Square::F2, Square::F3),
    ///     (Square::E7, Square::E5),
    ///     (Square::G2, Square::G4),
    ///     (Square::D8, Square::H4),
    /// ];
    /// game.load_game(&moves).unwrap();
    /// assert_eq!(game.winner(), Some(Color::Black));
    /// assert!(game.is_in_check(Color::White));
    /// ```
    pub fn winner(&self) -> Option<Color> {
        let side = self.active_player();
        if self.position.has_no_moves(side, self.history.most_recent()) {
            debug!(loser = %side, "side to move has no legal moves");
            Some(side.opponent())
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[inline(always)]
    pub const fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[inline(always)]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    fn play(&mut self, from: Square, to: Square, promotion: PieceKind, validate: bool) -> Result<&Turn> {
        if validate && !self.is_valid_move(from, to) {
            return Err(ChessError::IllegalMove { from, to });
        }

        let turn = self.position.set_move_promoting(from, to, promotion)?;
        Ok(self.record(turn))
    }

    fn record(&mut self, turn: Turn) -> &Turn {
        self.history.add_move(turn);
        // The ledger holds at least the turn just added.
        let index = self.history.move_count() - 1;
        &self.history.applied()[index]
    }
}

impl RulesEngine for Game {
    fn new_game(&mut self) {
        Game::new_game(self)
    }

    fn make_move(&mut self, from: Square, to: Square) -> Result<()> {
        self.set_move(from, to).map(|_| ())
    }

    fn undo(&mut self) -> Result<()> {
        self.prev()
    }

    fn redo(&mut self) -> Result<()> {
        self.next()
    }

    fn valid_moves(&self, square: Square) -> Bitboard {
        Game::valid_moves(self, square)
    }

    fn board(&self) -> BTreeMap<Square, Piece> {
        Game::board(self)
    }

    fn winner(&self) -> Option<Color> {
        Game::winner(self)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position)?;
        write!(f, "{} to move", self.active_player())
    }
}
