/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, Not},
};

use crate::{ChessError, Result};

use super::{Color, File, Rank, Square};

/// A set of squares packed into one `u64`, one bit per [`Square`].
///
/// Bits follow the square index: `a1` is bit 0, `h1` bit 7, `a2` bit 8 and `h8` bit 63.
/// A board with exactly one bit set stands in for a single square, which is how
/// pieces, rays and move sets all share this one type.
///
/// Printed with `{}`, rank 8 comes first:
/// ```text
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// X X X X X X X X
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0);
    pub const FULL_BOARD: Self = Self(u64::MAX);

    pub const FILE_A: Self = Self(0x0101_0101_0101_0101);
    pub const FILE_B: Self = Self::from_file(File::B);
    pub const FILE_C: Self = Self::from_file(File::C);
    pub const FILE_D: Self = Self::from_file(File::D);
    pub const FILE_E: Self = Self::from_file(File::E);
    pub const FILE_F: Self = Self::from_file(File::F);
    pub const FILE_G: Self = Self::from_file(File::G);
    pub const FILE_H: Self = Self::from_file(File::H);

    pub const RANK_1: Self = Self(0xFF);
    pub const RANK_2: Self = Self::from_rank(Rank::TWO);
    pub const RANK_3: Self = Self::from_rank(Rank::THREE);
    pub const RANK_4: Self = Self::from_rank(Rank::FOUR);
    pub const RANK_5: Self = Self::from_rank(Rank::FIVE);
    pub const RANK_6: Self = Self::from_rank(Rank::SIX);
    pub const RANK_7: Self = Self::from_rank(Rank::SEVEN);
    pub const RANK_8: Self = Self::from_rank(Rank::EIGHT);

    /// Wraps a raw bit pattern.
    ///
    /// ```
    /// # use chessmap::Bitboard;
    /// assert_eq!(Bitboard::new(0xFF), Bitboard::RANK_1);
    /// ```
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// The set holding only `square`.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Square};
    /// assert_eq!(Bitboard::from_square(Square::H8).inner(), 1 << 63);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.0)
    }

    /// Every square on `file`.
    #[inline(always)]
    pub const fn from_file(file: File) -> Self {
        Self(Self::FILE_A.0 << file.0)
    }

    /// Every square on `rank`.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Rank};
    /// assert_eq!(Bitboard::from_rank(Rank::SEVEN), Bitboard::RANK_7);
    /// ```
    #[inline(always)]
    pub const fn from_rank(rank: Rank) -> Self {
        Self(Self::RANK_1.0 << (8 * rank.0))
    }

    /// The rank `color`'s pieces start on.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Color};
    /// assert_eq!(Bitboard::first_rank(Color::Black), Bitboard::RANK_8);
    /// ```
    #[inline(always)]
    pub const fn first_rank(color: Color) -> Self {
        Self::relative_rank(color, Rank::ONE)
    }

    /// The rank `color`'s pawns start on.
    #[inline(always)]
    pub const fn second_rank(color: Color) -> Self {
        Self::relative_rank(color, Rank::TWO)
    }

    /// The rank a `color` pawn must stand on to take en passant.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Color};
    /// assert_eq!(Bitboard::fifth_rank(Color::White), Bitboard::RANK_5);
    /// assert_eq!(Bitboard::fifth_rank(Color::Black), Bitboard::RANK_4);
    /// ```
    #[inline(always)]
    pub const fn fifth_rank(color: Color) -> Self {
        Self::relative_rank(color, Rank::FIVE)
    }

    /// The rank `color`'s pawns promote on.
    #[inline(always)]
    pub const fn eighth_rank(color: Color) -> Self {
        Self::relative_rank(color, Rank::EIGHT)
    }

    /// `rank` as seen from `color`'s side of the board.
    const fn relative_rank(color: Color, rank: Rank) -> Self {
        match color {
            Color::White => Self::from_rank(rank),
            Color::Black => Self::from_rank(Rank(7 - rank.0)),
        }
    }

    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// The single square this board holds.
    ///
    /// Any other population, including zero, is an [`ChessError::InvalidPosition`]
    /// carrying the board in hex.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Square};
    /// assert_eq!(Bitboard::from_square(Square::G2).to_square(), Ok(Square::G2));
    /// assert!(Bitboard::RANK_1.to_square().is_err());
    /// assert!(Bitboard::EMPTY_BOARD.to_square().is_err());
    /// ```
    pub fn to_square(&self) -> Result<Square> {
        match self.population() {
            1 => Ok(Square(self.0.trailing_zeros() as u8)),
            _ => Err(ChessError::InvalidPosition(self.to_hex_string())),
        }
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        !self.is_empty()
    }

    /// True when every square of `other` is also in `self`.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Square};
    /// assert!(Bitboard::RANK_1.is_superset(Square::E1));
    /// assert!(!Bitboard::RANK_1.is_superset(Bitboard::FILE_E));
    /// ```
    #[inline(always)]
    pub fn is_superset(&self, other: impl Into<Self>) -> bool {
        let other = other.into();
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share no square.
    #[inline(always)]
    pub fn is_disjoint(&self, other: impl Into<Self>) -> bool {
        !self.intersects(other)
    }

    /// True when `self` and `other` share at least one square.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Square};
    /// assert!(Bitboard::FILE_A.intersects(Square::A3));
    /// assert!(!Bitboard::RANK_1.intersects(Bitboard::RANK_5));
    /// ```
    #[inline(always)]
    pub fn intersects(&self, other: impl Into<Self>) -> bool {
        self.0 & other.into().0 != 0
    }

    /// Adds the squares of `other`.
    #[inline(always)]
    pub fn set(&mut self, other: impl Into<Self>) {
        self.0 |= other.into().0;
    }

    /// Removes the squares of `other`.
    ///
    /// ```
    /// # use chessmap::{Bitboard, Square};
    /// let mut board = Bitboard::RANK_1;
    /// board.clear(Square::C1);
    /// assert_eq!(board.inner(), 0xFB);
    /// ```
    #[inline(always)]
    pub fn clear(&mut self, other: impl Into<Self>) {
        self.0 &= !other.into().0;
    }

    /// The lowest-indexed square in the set, if any.
    #[inline(always)]
    pub fn lsb(&self) -> Option<Square> {
        (!self.is_empty()).then(|| Square(self.0.trailing_zeros() as u8))
    }

    /// Removes and returns the lowest-indexed square.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let square = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    /// Squares of the set in ascending index order.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter(*self)
    }

    /// Number of squares in the set.
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Moves every square `offset` indices up (positive) or down (negative).
    ///
    /// Squares pushed off either end vanish. Squares may wrap onto the next rank,
    /// so callers mask out the files that would wrap.
    ///
    /// ```
    /// # use chessmap::Bitboard;
    /// assert_eq!(Bitboard::RANK_4.shifted(8), Bitboard::RANK_5);
    /// assert_eq!(Bitboard::RANK_4.shifted(-8), Bitboard::RANK_3);
    /// assert!(Bitboard::RANK_8.shifted(8).is_empty());
    /// ```
    #[inline(always)]
    pub const fn shifted(self, offset: i8) -> Self {
        match offset {
            0.. => Self(self.0 << offset),
            _ => Self(self.0 >> offset.unsigned_abs()),
        }
    }

    // Operator traits are not callable in `const` contexts, so the geometry tables use these.

    #[inline(always)]
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline(always)]
    pub const fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline(always)]
    pub const fn not(self) -> Self {
        Self(!self.0)
    }

    /// `0x` followed by sixteen upper-case hex digits.
    pub fn to_hex_string(&self) -> String {
        format!("0x{:0>16X}", self.0)
    }

    /// Writes the board as an 8x8 grid of `X` and `.`, rank 8 on top.
    fn write_grid(&self, f: &mut fmt::Formatter<'_>, labels: bool) -> fmt::Result {
        for rank in Rank::iter().rev() {
            if labels {
                write!(f, "{rank}| ")?;
            }
            for file in File::iter() {
                let mark = if self.intersects(Square::new(file, rank)) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{mark} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl TryFrom<Bitboard> for Square {
    type Error = ChessError;

    fn try_from(value: Bitboard) -> Result<Self> {
        value.to_square()
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut board = Self::EMPTY_BOARD;
        iter.into_iter().for_each(|square| board.set(square));
        board
    }
}

/// Implements a binary operator and its assigning form for anything convertible into a [`Bitboard`].
macro_rules! bit_operator {
    ($trait:ident :: $method:ident, $assign_trait:ident :: $assign_method:ident, $op:tt) => {
        impl<T> std::ops::$trait<T> for Bitboard
        where
            Bitboard: From<T>,
        {
            type Output = Bitboard;

            #[inline(always)]
            fn $method(self, rhs: T) -> Bitboard {
                Bitboard(self.0 $op Bitboard::from(rhs).0)
            }
        }

        impl<T> std::ops::$assign_trait<T> for Bitboard
        where
            Bitboard: From<T>,
        {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: T) {
                *self = std::ops::$trait::$method(*self, rhs);
            }
        }
    };
}

bit_operator!(BitAnd::bitand, BitAndAssign::bitand_assign, &);
bit_operator!(BitOr::bitor, BitOrAssign::bitor_assign, |);
bit_operator!(BitXor::bitxor, BitXorAssign::bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Bitboard::not(self)
    }
}

/// `board[square]` reads as membership.
impl<T: Into<Bitboard>> Index<T> for Bitboard {
    type Output = bool;

    fn index(&self, index: T) -> &bool {
        if self.intersects(index) {
            &true
        } else {
            &false
        }
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(square: Square) -> Self {
        Self::from_square(square)
    }
}

impl From<File> for Bitboard {
    #[inline(always)]
    fn from(file: File) -> Self {
        Self::from_file(file)
    }
}

impl From<Rank> for Bitboard {
    #[inline(always)]
    fn from(rank: Rank) -> Self {
        Self::from_rank(rank)
    }
}

impl From<u64> for Bitboard {
    #[inline(always)]
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_grid(f, false)
    }
}

/// Like [`fmt::Display`], with rank and file labels along the edges.
impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_grid(f, true)?;
        write!(f, " +{}\n   ", "--".repeat(File::COUNT))?;
        File::iter().try_for_each(|file| write!(f, "{file} "))
    }
}

/// Yields the squares of a [`Bitboard`], lowest index first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for BitboardIter {
    #[inline(always)]
    fn len(&self) -> usize {
        self.0.population() as usize
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    fn into_iter(self) -> BitboardIter {
        self.iter()
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    fn into_iter(self) -> BitboardIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_puts_rank_eight_first() {
        let board = Bitboard::RANK_2 | Bitboard::FILE_C;
        let expected = ". . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        X X X X X X X X \n\
                        . . X . . . . . \n";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_masks_agree_with_constructors() {
        assert_eq!(Bitboard::FILE_H.inner(), 0x8080_8080_8080_8080);
        assert_eq!(Bitboard::RANK_8.inner(), 0xFF00_0000_0000_0000);
        assert_eq!(
            Bitboard::from_square(Square::D5),
            Bitboard::FILE_D & Bitboard::RANK_5
        );
        assert_eq!(Bitboard::second_rank(Color::Black), Bitboard::RANK_7);
        assert_eq!(Bitboard::eighth_rank(Color::Black), Bitboard::RANK_1);
    }

    #[test]
    fn test_to_square_needs_exactly_one_bit() {
        assert_eq!(
            Bitboard::new(0b0001_0100).to_square(),
            Err(ChessError::InvalidPosition("0x0000000000000014".to_string()))
        );
        assert!(Square::try_from(Bitboard::EMPTY_BOARD).is_err());
        assert_eq!(Square::try_from(Bitboard::new(1)), Ok(Square::A1));
    }

    #[test]
    fn test_iteration_is_ascending() {
        let board: Bitboard = [Square::H8, Square::A1, Square::E4].into_iter().collect();
        assert_eq!(board.iter().len(), 3);
        assert_eq!(
            board.iter().collect::<Vec<_>>(),
            vec![Square::A1, Square::E4, Square::H8]
        );
        assert!(board[Square::E4]);
        assert!(!board[Square::E5]);
    }
}
