/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use crate::{ChessError, Result};

use super::{Bitboard, Color};

/// One of the 64 squares, stored as `file + 8 * rank` (little-endian rank-file order).
///
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// A [`Square`] converts losslessly to a [`Bitboard`] with exactly one bit set,
/// and back again through [`Bitboard::to_square`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    pub const A1: Self = Self::new(File::A, Rank::ONE);
    pub const A2: Self = Self::new(File::A, Rank::TWO);
    pub const A3: Self = Self::new(File::A, Rank::THREE);
    pub const A4: Self = Self::new(File::A, Rank::FOUR);
    pub const A5: Self = Self::new(File::A, Rank::FIVE);
    pub const A6: Self = Self::new(File::A, Rank::SIX);
    pub const A7: Self = Self::new(File::A, Rank::SEVEN);
    pub const A8: Self = Self::new(File::A, Rank::EIGHT);

    pub const B1: Self = Self::new(File::B, Rank::ONE);
    pub const B2: Self = Self::new(File::B, Rank::TWO);
    pub const B3: Self = Self::new(File::B, Rank::THREE);
    pub const B4: Self = Self::new(File::B, Rank::FOUR);
    pub const B5: Self = Self::new(File::B, Rank::FIVE);
    pub const B6: Self = Self::new(File::B, Rank::SIX);
    pub const B7: Self = Self::new(File::B, Rank::SEVEN);
    pub const B8: Self = Self::new(File::B, Rank::EIGHT);

    pub const C1: Self = Self::new(File::C, Rank::ONE);
    pub const C2: Self = Self::new(File::C, Rank::TWO);
    pub const C3: Self = Self::new(File::C, Rank::THREE);
    pub const C4: Self = Self::new(File::C, Rank::FOUR);
    pub const C5: Self = Self::new(File::C, Rank::FIVE);
    pub const C6: Self = Self::new(File::C, Rank::SIX);
    pub const C7: Self = Self::new(File::C, Rank::SEVEN);
    pub const C8: Self = Self::new(File::C, Rank::EIGHT);

    pub const D1: Self = Self::new(File::D, Rank::ONE);
    pub const D2: Self = Self::new(File::D, Rank::TWO);
    pub const D3: Self = Self::new(File::D, Rank::THREE);
    pub const D4: Self = Self::new(File::D, Rank::FOUR);
    pub const D5: Self = Self::new(File::D, Rank::FIVE);
    pub const D6: Self = Self::new(File::D, Rank::SIX);
    pub const D7: Self = Self::new(File::D, Rank::SEVEN);
    pub const D8: Self = Self::new(File::D, Rank::EIGHT);

    pub const E1: Self = Self::new(File::E, Rank::ONE);
    pub const E2: Self = Self::new(File::E, Rank::TWO);
    pub const E3: Self = Self::new(File::E, Rank::THREE);
    pub const E4: Self = Self::new(File::E, Rank::FOUR);
    pub const E5: Self = Self::new(File::E, Rank::FIVE);
    pub const E6: Self = Self::new(File::E, Rank::SIX);
    pub const E7: Self = Self::new(File::E, Rank::SEVEN);
    pub const E8: Self = Self::new(File::E, Rank::EIGHT);

    pub const F1: Self = Self::new(File::F, Rank::ONE);
    pub const F2: Self = Self::new(File::F, Rank::TWO);
    pub const F3: Self = Self::new(File::F, Rank::THREE);
    pub const F4: Self = Self::new(File::F, Rank::FOUR);
    pub const F5: Self = Self::new(File::F, Rank::FIVE);
    pub const F6: Self = Self::new(File::F, Rank::SIX);
    pub const F7: Self = Self::new(File::F, Rank::SEVEN);
    pub const F8: Self = Self::new(File::F, Rank::EIGHT);

    pub const G1: Self = Self::new(File::G, Rank::ONE);
    pub const G2: Self = Self::new(File::G, Rank::TWO);
    pub const G3: Self = Self::new(File::G, Rank::THREE);
    pub const G4: Self = Self::new(File::G, Rank::FOUR);
    pub const G5: Self = Self::new(File::G, Rank::FIVE);
    pub const G6: Self = Self::new(File::G, Rank::SIX);
    pub const G7: Self = Self::new(File::G, Rank::SEVEN);
    pub const G8: Self = Self::new(File::G, Rank::EIGHT);

    pub const H1: Self = Self::new(File::H, Rank::ONE);
    pub const H2: Self = Self::new(File::H, Rank::TWO);
    pub const H3: Self = Self::new(File::H, Rank::THREE);
    pub const H4: Self = Self::new(File::H, Rank::FOUR);
    pub const H5: Self = Self::new(File::H, Rank::FIVE);
    pub const H6: Self = Self::new(File::H, Rank::SIX);
    pub const H7: Self = Self::new(File::H, Rank::SEVEN);
    pub const H8: Self = Self::new(File::H, Rank::EIGHT);

    pub const COUNT: usize = 64;

    /// All 64 squares, `a1` first and `h8` last.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Square;
    /// assert_eq!(Square::iter().len(), 64);
    /// assert_eq!(Square::iter().nth(27), Some(Square::D4));
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(rank.0 * 8 + file.0)
    }

    /// Fails with [`ChessError::InvalidPosition`] unless `index` is below 64.
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(ChessError::InvalidPosition(index.to_string()))
        }
    }

    /// Caller guarantees `index < 64`. Used when building the const geometry tables.
    #[inline(always)]
    pub const fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < Self::COUNT);
        Self(index as u8)
    }

    /// `e1` for White, `e8` for Black.
    #[inline(always)]
    pub const fn king_start(color: Color) -> Self {
        Self::E1.rank_relative_to(color)
    }

    /// Where the King lands after castling kingside: `g1` / `g8`.
    #[inline(always)]
    pub const fn king_short_castle(color: Color) -> Self {
        Self::G1.rank_relative_to(color)
    }

    /// Where the King lands after castling queenside: `c1` / `c8`.
    #[inline(always)]
    pub const fn king_long_castle(color: Color) -> Self {
        Self::C1.rank_relative_to(color)
    }

    /// The kingside Rook's corner: `h1` / `h8`.
    #[inline(always)]
    pub const fn rook_short_start(color: Color) -> Self {
        Self::H1.rank_relative_to(color)
    }

    /// The queenside Rook's corner: `a1` / `a8`.
    #[inline(always)]
    pub const fn rook_long_start(color: Color) -> Self {
        Self::A1.rank_relative_to(color)
    }

    /// Where the Rook lands after castling kingside: `f1` / `f8`.
    #[inline(always)]
    pub const fn rook_short_castle(color: Color) -> Self {
        Self::F1.rank_relative_to(color)
    }

    /// Where the Rook lands after castling queenside: `d1` / `d8`.
    #[inline(always)]
    pub const fn rook_long_castle(color: Color) -> Self {
        Self::D1.rank_relative_to(color)
    }

    /// Mirrors this square across the middle of the board, so `c2` becomes `c7`.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Square;
    /// assert_eq!(Square::C2.flipped_rank(), Square::C7);
    /// assert_eq!(Square::H8.flipped_rank(), Square::H1);
    /// ```
    #[inline(always)]
    pub const fn flipped_rank(self) -> Self {
        Self::new(self.file(), Rank(7 - self.rank().0))
    }

    /// Reads a White-relative square from `color`'s side of the board.
    #[inline(always)]
    pub const fn rank_relative_to(self, color: Color) -> Self {
        if color.is_white() {
            self
        } else {
            self.flipped_rank()
        }
    }

    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 % 8)
    }

    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 / 8)
    }

    /// Horizontal distance between two squares, ignoring ranks.
    #[inline(always)]
    pub const fn distance_files(&self, other: Self) -> u8 {
        self.file().0.abs_diff(other.file().0)
    }

    /// Vertical distance between two squares, ignoring files.
    #[inline(always)]
    pub const fn distance_ranks(&self, other: Self) -> u8 {
        self.rank().0.abs_diff(other.rank().0)
    }

    /// Parses two-character square notation: a file `a`-`h`, then a rank `1`-`8`.
    ///
    /// Anything else, including uppercase files and trailing characters, is rejected
    /// with [`ChessError::InvalidPosition`] carrying the input.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Square;
    /// assert_eq!(Square::from_notation("g7").unwrap(), Square::G7);
    /// assert!(Square::from_notation("G7").is_err());
    /// assert!(Square::from_notation("g").is_err());
    /// assert!(Square::from_notation("g77").is_err());
    /// ```
    pub fn from_notation(notation: &str) -> Result<Self> {
        let invalid = || ChessError::InvalidPosition(notation.to_string());

        let mut chars = notation.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let file = File::from_char(file).map_err(|_| invalid())?;
        let rank = Rank::from_char(rank).map_err(|_| invalid())?;
        Ok(Self::new(file, rank))
    }

    /// The two-character name of this square, such as `"e4"`.
    #[inline(always)]
    pub fn to_notation(self) -> String {
        format!("{}{}", self.file().char(), self.rank().char())
    }

    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_square(*self)
    }

    /// The square `file_delta` files and `rank_delta` ranks away, or `None` if that is off the board.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Square;
    /// assert_eq!(Square::B1.offset(1, 2), Some(Square::C3));
    /// assert_eq!(Square::B1.offset(-2, 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        match (self.file().offset(file_delta), self.rank().offset(rank_delta)) {
            (Some(file), Some(rank)) => Some(Self::new(file, rank)),
            _ => None,
        }
    }
}

impl FromStr for Square {
    type Err = ChessError;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl TryFrom<&str> for Square {
    type Error = ChessError;
    #[inline(always)]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_notation(value)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().char(), self.rank().char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}#{}", self.0)
    }
}

/// Defines a board coordinate ([`File`] or [`Rank`]): a `u8` in `0..8` with a one-character label.
macro_rules! coordinate {
    ($name:ident, $first:literal, $doc:literal, [$($label:ident),+]) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub(crate) u8);

        impl $name {
            coordinate!(@consts 0u8, $($label),+);

            pub const COUNT: usize = 8;

            #[inline(always)]
            pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
                (0..Self::COUNT as u8).map(Self)
            }

            /// Fails with [`ChessError::InvalidPosition`] unless `value` is below 8.
            #[inline(always)]
            pub fn new(value: u8) -> Result<Self> {
                if (value as usize) < Self::COUNT {
                    Ok(Self(value))
                } else {
                    Err(ChessError::InvalidPosition(value.to_string()))
                }
            }

            /// Caller guarantees `value < 8`.
            #[inline(always)]
            pub const fn new_unchecked(value: u8) -> Self {
                Self(value)
            }

            /// Parses the one-character label; fails with [`ChessError::InvalidPosition`].
            #[inline(always)]
            pub fn from_char(c: char) -> Result<Self> {
                let value = (c as u32).wrapping_sub($first as u32);
                if value < Self::COUNT as u32 {
                    Ok(Self(value as u8))
                } else {
                    Err(ChessError::InvalidPosition(c.to_string()))
                }
            }

            #[inline(always)]
            pub const fn inner(&self) -> u8 {
                self.0
            }

            #[inline(always)]
            pub const fn index(&self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub const fn char(&self) -> char {
                ($first as u8 + self.0) as char
            }

            /// Steps `delta` places along the axis, or `None` if that leaves the board.
            #[inline(always)]
            pub const fn offset(self, delta: i8) -> Option<Self> {
                match self.0.checked_add_signed(delta) {
                    Some(value) if (value as usize) < Self::COUNT => Some(Self(value)),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.char())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.char())
            }
        }
    };

    (@consts $value:expr, $label:ident) => {
        pub const $label: Self = Self($value);
    };

    (@consts $value:expr, $label:ident, $($rest:ident),+) => {
        pub const $label: Self = Self($value);
        coordinate!(@consts $value + 1, $($rest),+);
    };
}

coordinate!(
    File,
    'a',
    "A column of the board, `a` through `h`.",
    [A, B, C, D, E, F, G, H]
);

coordinate!(
    Rank,
    '1',
    "A row of the board, `1` through `8`.",
    [ONE, TWO, THREE, FOUR, FIVE, SIX, SEVEN, EIGHT]
);

impl File {
    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_file(*self)
    }
}

impl Rank {
    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_rank(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(Square::A1.index(), 0);
        assert_eq!(Square::H1.index(), 7);
        assert_eq!(Square::A8.index(), 56);
        assert_eq!(Square::H8.index(), 63);
        assert_eq!(Square::D4.file(), File::D);
        assert_eq!(Square::D4.rank(), Rank::FOUR);
        assert_eq!(Rank::EIGHT.inner(), 7);
    }

    #[test]
    fn test_notation() {
        assert_eq!(Square::E4.to_string(), "e4");
        assert_eq!(Square::H8.to_notation(), "h8");
        assert_eq!(Square::try_from("a1").unwrap(), Square::A1);
        assert_eq!("d4".parse::<Square>().unwrap(), Square::D4);

        for bad in ["", "a", "1", "i1", "a9", "a0", "A1", "a1 "] {
            assert_eq!(
                Square::from_notation(bad),
                Err(ChessError::InvalidPosition(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_coordinates() {
        assert_eq!(File::from_char('h').unwrap(), File::H);
        assert_eq!(Rank::from_char('1').unwrap(), Rank::ONE);
        assert!(File::from_char('A').is_err());
        assert!(Rank::from_char('9').is_err());
        assert_eq!(File::G.char(), 'g');
        assert_eq!(Rank::new(8), Err(ChessError::InvalidPosition("8".to_string())));
        assert_eq!(File::H.offset(1), None);
        assert_eq!(Rank::TWO.offset(-1), Some(Rank::ONE));
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(Square::from_index(63).unwrap(), Square::H8);
        assert!(Square::from_index(64).is_err());
    }

    #[test]
    fn test_castling_squares() {
        assert_eq!(Square::king_start(Color::Black), Square::E8);
        assert_eq!(Square::king_short_castle(Color::White), Square::G1);
        assert_eq!(Square::king_long_castle(Color::Black), Square::C8);
        assert_eq!(Square::rook_long_start(Color::Black), Square::A8);
        assert_eq!(Square::rook_short_start(Color::White), Square::H1);
        assert_eq!(Square::rook_short_castle(Color::Black), Square::F8);
        assert_eq!(Square::rook_long_castle(Color::White), Square::D1);
    }
}
