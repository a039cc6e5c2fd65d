/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut, Neg},
    str::FromStr,
};

use crate::{ChessError, Result};

use super::Direction;

/// Represents the color of a player or a piece.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Creates a new [`Color`] from a `bool`, where `false = White`.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Color;
    /// assert_eq!(Color::from_bool(false), Color::White);
    /// assert_eq!(Color::from_bool(true), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn from_bool(is_black: bool) -> Self {
        if is_black {
            Self::Black
        } else {
            Self::White
        }
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns `true` if this [`Color`] is Black.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns this [`Color`] as a `usize`.
    ///
    /// Will be `0` for White, `1` for Black. Useful for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The direction this [`Color`]'s pawns advance in.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Color, Direction};
    /// assert_eq!(Color::White.forward(), Direction::North);
    /// assert_eq!(Color::Black.forward(), Direction::South);
    /// ```
    #[inline(always)]
    pub const fn forward(&self) -> Direction {
        match self {
            Self::White => Direction::North,
            Self::Black => Direction::South,
        }
    }

    /// The two diagonal directions this [`Color`]'s pawns capture in.
    #[inline(always)]
    pub const fn pawn_captures(&self) -> [Direction; 2] {
        match self {
            Self::White => [Direction::NorthWest, Direction::NorthEast],
            Self::Black => [Direction::SouthWest, Direction::SouthEast],
        }
    }

    /// Parses the color half of a piece code: `'w'` or `'b'`.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Color;
    /// assert_eq!(Color::from_char('w').unwrap(), Color::White);
    /// assert!(Color::from_char('W').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(color: char) -> Result<Self> {
        match color {
            'w' => Ok(Self::White),
            'b' => Ok(Self::Black),
            _ => Err(ChessError::InvalidPieceCode(color.to_string())),
        }
    }

    /// The color half of a piece code.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::Color;
    /// assert_eq!(Color::White.name(), "white");
    /// ```
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    /// Negating [`Color::White`] yields [`Color::Black`] and vice versa.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Color {
    type Err = ChessError;
    /// Accepts `w`, `b`, `white` or `black`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => Err(ChessError::InvalidPieceCode(s.to_string())),
        }
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Returns this [`PieceKind`] as a `usize`.
    ///
    /// Will always be `[0,5]`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns `true` if a Pawn may promote to this [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::PieceKind;
    /// assert!(PieceKind::Knight.is_promotion_target());
    /// assert!(!PieceKind::King.is_promotion_target());
    /// ```
    #[inline(always)]
    pub const fn is_promotion_target(&self) -> bool {
        matches!(
            self,
            Self::Knight | Self::Bishop | Self::Rook | Self::Queen
        )
    }

    /// Parses the type half of a piece code, which is always uppercase.
    ///
    /// # Example
    /// ```
    /// # use chessmap::PieceKind;
    /// assert_eq!(PieceKind::from_char('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('q').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(kind: char) -> Result<Self> {
        match kind {
            'P' => Ok(Self::Pawn),
            'N' => Ok(Self::Knight),
            'B' => Ok(Self::Bishop),
            'R' => Ok(Self::Rook),
            'Q' => Ok(Self::Queen),
            'K' => Ok(Self::King),
            _ => Err(ChessError::InvalidPieceCode(kind.to_string())),
        }
    }

    /// The type half of a piece code.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = ChessError;
    /// Accepts either the code letter (`"N"`) or the name (`"knight"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == lower || kind.char().to_ascii_lowercase().to_string() == lower)
            .ok_or_else(|| ChessError::InvalidPieceCode(s.to_string()))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Represents a chess piece: a [`Color`] paired with a [`PieceKind`].
///
/// On the wire a piece is a two-character code, `<color><type>`, such as `"bK"` for
/// the black king or `"wP"` for a white pawn. [`Piece::from_code`] and [`Piece::code`]
/// are the only places that translate between the two forms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

/// Wire codes of every [`Piece`], in [`Piece::index`] order.
const CODES: [&str; Piece::COUNT] = [
    "wP", "wN", "wB", "wR", "wQ", "wK", "bP", "bN", "bB", "bR", "bQ", "bK",
];

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);

    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    /// Number of unique piece variants.
    pub const COUNT: usize = Color::COUNT * PieceKind::COUNT;

    /// An array of all 12 [`Piece`]s, White first, in [`Piece::index`] order.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::WHITE_PAWN,
            Self::WHITE_KNIGHT,
            Self::WHITE_BISHOP,
            Self::WHITE_ROOK,
            Self::WHITE_QUEEN,
            Self::WHITE_KING,
            Self::BLACK_PAWN,
            Self::BLACK_KNIGHT,
            Self::BLACK_BISHOP,
            Self::BLACK_ROOK,
            Self::BLACK_QUEEN,
            Self::BLACK_KING,
        ]
    }

    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Piece, Color, PieceKind};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert_eq!(white_knight.to_string(), "wN");
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns `true` if this [`Piece`] is a King.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns `true` if this [`Piece`] is a Pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Returns `true` if this [`Piece`] is a slider (Rook, Bishop, Queen).
    #[inline(always)]
    pub const fn is_slider(&self) -> bool {
        matches!(
            self.kind,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop
        )
    }

    /// Returns `true` if this [`Piece`] slides along `direction`.
    ///
    /// Rooks slide orthogonally, Bishops diagonally and Queens both ways.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Piece, Direction};
    /// assert!(Piece::BLACK_ROOK.slides_along(Direction::West));
    /// assert!(!Piece::BLACK_ROOK.slides_along(Direction::NorthWest));
    /// assert!(Piece::WHITE_QUEEN.slides_along(Direction::NorthWest));
    /// assert!(!Piece::WHITE_KNIGHT.slides_along(Direction::North));
    /// ```
    #[inline(always)]
    pub const fn slides_along(&self, direction: Direction) -> bool {
        match self.kind {
            PieceKind::Queen => true,
            PieceKind::Rook => !direction.is_diagonal(),
            PieceKind::Bishop => direction.is_diagonal(),
            _ => false,
        }
    }

    /// Fetches the [`Color`] and [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn parts(&self) -> (Color, PieceKind) {
        (self.color, self.kind)
    }

    /// Returns the index value of this [`Piece`], as a `usize`.
    ///
    /// Useful for indexing into lists of size 12.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    /// Parses a two-character piece code such as `"bK"`.
    ///
    /// Anything else is rejected with [`ChessError::InvalidPieceCode`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Piece, Color, PieceKind};
    /// let black_king = Piece::from_code("bK").unwrap();
    /// assert_eq!(black_king.parts(), (Color::Black, PieceKind::King));
    ///
    /// assert!(Piece::from_code("xK").is_err());
    /// assert!(Piece::from_code("bk").is_err());
    /// assert!(Piece::from_code("bKK").is_err());
    /// ```
    pub fn from_code(code: &str) -> Result<Self> {
        CODES
            .iter()
            .position(|c| *c == code)
            .map(|index| Self::all()[index])
            .ok_or_else(|| ChessError::InvalidPieceCode(code.to_string()))
    }

    /// The two-character code of this [`Piece`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::Piece;
    /// assert_eq!(Piece::WHITE_QUEEN.code(), "wQ");
    /// assert_eq!(Piece::BLACK_PAWN.code(), "bP");
    /// ```
    #[inline(always)]
    pub const fn code(&self) -> &'static str {
        CODES[self.index()]
    }

    /// Returns a [`Piece`] of the same [`Color`] but with the given [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Color, Piece, PieceKind};
    /// let queen = Piece::BLACK_PAWN.promoted(PieceKind::Queen);
    /// assert_eq!(queen, Piece::BLACK_QUEEN);
    /// ```
    #[inline(always)]
    pub const fn promoted(self, promotion: PieceKind) -> Self {
        Self::new(self.color, promotion)
    }
}

impl FromStr for Piece {
    type Err = ChessError;
    /// Wrapper for [`Piece::from_code`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl<T> Index<Piece> for [T; Piece::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Piece) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Piece> for [T; Piece::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Piece) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.code(), self.color.name(), self.kind.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table_is_bidirectional() {
        for piece in Piece::all() {
            assert_eq!(Piece::from_code(piece.code()).unwrap(), piece);
            assert_eq!(piece.code().chars().next(), Some(piece.color().char()));
            assert_eq!(piece.code().chars().nth(1), Some(piece.kind().char()));
        }
    }

    #[test]
    fn test_indices_are_unique() {
        let mut seen = [false; Piece::COUNT];
        for piece in Piece::all() {
            assert!(!seen[piece]);
            seen[piece] = true;
        }
        assert_eq!(Piece::all()[Piece::BLACK_KING.index()], Piece::BLACK_KING);
    }

    #[test]
    fn test_invalid_codes() {
        for bad in ["", "b", "K", "Kb", "wk", "gQ", "wQ ", "bKing"] {
            assert_eq!(
                Piece::from_code(bad),
                Err(ChessError::InvalidPieceCode(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_piece_kind_from_str() {
        assert_eq!("n".parse::<PieceKind>().unwrap(), PieceKind::Knight);
        assert_eq!("Rook".parse::<PieceKind>().unwrap(), PieceKind::Rook);
        assert!("x".parse::<PieceKind>().is_err());
    }
}
