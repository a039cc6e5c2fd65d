/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Constant board geometry and the ray/neighbor primitives built on it.
//!
//! All masks live in a single [`Geometry`] table that is computed at compile time
//! and shared by reference through [`geometry`].

use std::{fmt, iter};

use super::{Bitboard, File, Rank, Square};

/// Number of diagonals (and anti-diagonals) on the board.
pub const DIAGONAL_COUNT: usize = 15;

/// One of the eight compass directions, enumerated clockwise starting from North
/// (toward higher ranks).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const COUNT: usize = 8;

    /// Directions a Rook slides in.
    pub const ORTHOGONAL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Directions a Bishop slides in.
    pub const DIAGONAL: [Self; 4] = [
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthWest,
    ];

    /// All eight directions, clockwise from North.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use Direction::*;
        [
            North, NorthEast, East, SouthEast, South, SouthWest, West, NorthWest,
        ]
    }

    /// Fetches the direction with the given clockwise index, `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use chessmap::Direction;
    /// assert_eq!(Direction::from_index(0), Some(Direction::North));
    /// assert_eq!(Direction::from_index(5), Some(Direction::SouthWest));
    /// assert_eq!(Direction::from_index(8), None);
    /// ```
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::all()[index])
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The bit offset that moves a single-square bitboard one step this way.
    #[inline(always)]
    pub const fn shift(&self) -> i8 {
        match self {
            Self::North => 8,
            Self::NorthEast => 9,
            Self::East => 1,
            Self::SouthEast => -7,
            Self::South => -8,
            Self::SouthWest => -9,
            Self::West => -1,
            Self::NorthWest => 7,
        }
    }

    /// Squares that have no neighbor this way.
    ///
    /// Shifting a square on this border would wrap onto the wrong rank or off the board.
    #[inline(always)]
    pub const fn border(&self) -> Bitboard {
        match self {
            Self::North => Bitboard::RANK_8,
            Self::NorthEast => Bitboard::RANK_8.or(Bitboard::FILE_H),
            Self::East => Bitboard::FILE_H,
            Self::SouthEast => Bitboard::RANK_1.or(Bitboard::FILE_H),
            Self::South => Bitboard::RANK_1,
            Self::SouthWest => Bitboard::RANK_1.or(Bitboard::FILE_A),
            Self::West => Bitboard::FILE_A,
            Self::NorthWest => Bitboard::RANK_8.or(Bitboard::FILE_A),
        }
    }

    #[inline(always)]
    pub const fn is_diagonal(&self) -> bool {
        (*self as u8) & 1 == 1
    }

    /// # Example
    /// ```
    /// # use chessmap::Direction;
    /// assert_eq!(Direction::NorthEast.opposite(), Direction::SouthWest);
    /// ```
    #[inline(always)]
    pub const fn opposite(&self) -> Self {
        Self::all()[(self.index() + 4) % Self::COUNT]
    }

    /// The direction pointing from `from` toward `to`, if the two share a rank, file or diagonal.
    ///
    /// # Example
    /// ```
    /// # use chessmap::{Direction, Square};
    /// assert_eq!(Direction::between(Square::E1, Square::E8), Some(Direction::North));
    /// assert_eq!(Direction::between(Square::E1, Square::A5), Some(Direction::NorthWest));
    /// assert_eq!(Direction::between(Square::E1, Square::F3), None);
    /// assert_eq!(Direction::between(Square::E1, Square::E1), None);
    /// ```
    pub fn between(from: Square, to: Square) -> Option<Self> {
        let df = to.file().inner() as i8 - from.file().inner() as i8;
        let dr = to.rank().inner() as i8 - from.rank().inner() as i8;

        if (df, dr) == (0, 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
            return None;
        }

        let direction = match (df.signum(), dr.signum()) {
            (0, 1) => Self::North,
            (1, 1) => Self::NorthEast,
            (1, 0) => Self::East,
            (1, -1) => Self::SouthEast,
            (0, -1) => Self::South,
            (-1, -1) => Self::SouthWest,
            (-1, 0) => Self::West,
            _ => Self::NorthWest,
        };

        Some(direction)
    }
}

impl fmt::Debug for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        };
        name.fmt(f)
    }
}

/// Every constant mask the rules need, indexed by rank, file, diagonal or square.
#[derive(Debug)]
pub struct Geometry {
    ranks: [Bitboard; Rank::COUNT],
    files: [Bitboard; File::COUNT],
    diagonals: [Bitboard; DIAGONAL_COUNT],
    anti_diagonals: [Bitboard; DIAGONAL_COUNT],
    adjacent: [Bitboard; Square::COUNT],
    knight: [Bitboard; Square::COUNT],
    raystar: [Bitboard; Square::COUNT],
}

static GEOMETRY: Geometry = Geometry::new();

/// The shared geometry table.
#[inline(always)]
pub fn geometry() -> &'static Geometry {
    &GEOMETRY
}

impl Geometry {
    const fn new() -> Self {
        let mut ranks = [Bitboard::EMPTY_BOARD; Rank::COUNT];
        let mut files = [Bitboard::EMPTY_BOARD; File::COUNT];
        let mut i = 0;
        while i < 8 {
            ranks[i] = Bitboard::from_rank(Rank::new_unchecked(i as u8));
            files[i] = Bitboard::from_file(File::new_unchecked(i as u8));
            i += 1;
        }

        let mut diagonals = [Bitboard::EMPTY_BOARD; DIAGONAL_COUNT];
        let mut anti_diagonals = [Bitboard::EMPTY_BOARD; DIAGONAL_COUNT];
        let mut i = 0;
        while i < Square::COUNT {
            let square = Square::from_index_unchecked(i);
            let bb = square.bitboard();
            diagonals[diagonal_index(square)] = diagonals[diagonal_index(square)].or(bb);
            anti_diagonals[anti_diagonal_index(square)] =
                anti_diagonals[anti_diagonal_index(square)].or(bb);
            i += 1;
        }

        let mut adjacent = [Bitboard::EMPTY_BOARD; Square::COUNT];
        let mut knight = [Bitboard::EMPTY_BOARD; Square::COUNT];
        let mut raystar = [Bitboard::EMPTY_BOARD; Square::COUNT];
        let mut i = 0;
        while i < Square::COUNT {
            let square = Square::from_index_unchecked(i);
            let b = square.bitboard().inner();
            let rank = ranks[square.rank().index()].inner();

            // Horizontal shifts are masked to the square's own rank so they cannot wrap.
            let row = rank & (b << 1 | b | b >> 1);
            adjacent[i] = Bitboard::new((row << 8 | row | row >> 8) ^ b);

            let one = ((b << 1) | (b >> 1)) & rank;
            let two = ((b << 2) | (b >> 2)) & rank;
            knight[i] = Bitboard::new(one << 16 | one >> 16 | two << 8 | two >> 8);

            raystar[i] = ranks[square.rank().index()]
                .or(files[square.file().index()])
                .or(diagonals[diagonal_index(square)])
                .or(anti_diagonals[anti_diagonal_index(square)])
                .xor(square.bitboard());

            i += 1;
        }

        Self {
            ranks,
            files,
            diagonals,
            anti_diagonals,
            adjacent,
            knight,
            raystar,
        }
    }

    #[inline(always)]
    pub const fn rank(&self, rank: Rank) -> Bitboard {
        self.ranks[rank.index()]
    }

    #[inline(always)]
    pub const fn file(&self, file: File) -> Bitboard {
        self.files[file.index()]
    }

    /// The diagonal (running from lower-left to upper-right) through `square`.
    #[inline(always)]
    pub const fn diagonal(&self, square: Square) -> Bitboard {
        self.diagonals[diagonal_index(square)]
    }

    /// The anti-diagonal (running from upper-left to lower-right) through `square`.
    #[inline(always)]
    pub const fn anti_diagonal(&self, square: Square) -> Bitboard {
        self.anti_diagonals[anti_diagonal_index(square)]
    }

    #[inline(always)]
    pub const fn adjacent(&self, square: Square) -> Bitboard {
        self.adjacent[square.index()]
    }

    #[inline(always)]
    pub const fn knight(&self, square: Square) -> Bitboard {
        self.knight[square.index()]
    }

    #[inline(always)]
    pub const fn raystar(&self, square: Square) -> Bitboard {
        self.raystar[square.index()]
    }
}

#[inline(always)]
const fn diagonal_index(square: Square) -> usize {
    (square.rank().inner() + 7 - square.file().inner()) as usize
}

#[inline(always)]
const fn anti_diagonal_index(square: Square) -> usize {
    (square.rank().inner() + square.file().inner()) as usize
}

/// Returns `true` if `square` has a neighbor in `direction`.
///
/// # Example
/// ```
/// # use chessmap::{has_neighbor, Direction, Square};
/// assert!(has_neighbor(Square::E4, Direction::NorthWest));
/// assert!(!has_neighbor(Square::H4, Direction::East));
/// assert!(!has_neighbor(Square::C1, Direction::SouthEast));
/// ```
#[inline(always)]
pub fn has_neighbor(square: Square, direction: Direction) -> bool {
    !direction.border().intersects(square)
}

/// The square one step from `square` in `direction`, or `None` at the edge of the board.
///
/// # Example
/// ```
/// # use chessmap::{neighbor, Direction, Square};
/// assert_eq!(neighbor(Square::E4, Direction::NorthEast), Some(Square::F5));
/// assert_eq!(neighbor(Square::A4, Direction::West), None);
/// ```
#[inline(always)]
pub fn neighbor(square: Square, direction: Direction) -> Option<Square> {
    has_neighbor(square, direction).then(|| {
        Square::from_index_unchecked((square.inner() as i8 + direction.shift()) as usize)
    })
}

/// Iterates the squares from `square` (exclusive) to the edge of the board in `direction`.
///
/// # Example
/// ```
/// # use chessmap::{walk, Direction, Square};
/// let ray: Vec<_> = walk(Square::F6, Direction::NorthEast).collect();
/// assert_eq!(ray, vec![Square::G7, Square::H8]);
/// ```
#[inline(always)]
pub fn walk(square: Square, direction: Direction) -> impl Iterator<Item = Square> {
    iter::successors(neighbor(square, direction), move |&sq| neighbor(sq, direction))
}

/// Every square one king-step away from `square`.
#[inline(always)]
pub fn adjacent_squares(square: Square) -> Bitboard {
    geometry().adjacent(square)
}

/// Every square one knight-jump away from `square`.
///
/// # Example
/// ```
/// # use chessmap::{knight_squares, Square};
/// let jumps = knight_squares(Square::A1);
/// assert_eq!(jumps.population(), 2);
/// assert!(jumps.intersects(Square::B3));
/// assert!(jumps.intersects(Square::C2));
/// ```
#[inline(always)]
pub fn knight_squares(square: Square) -> Bitboard {
    geometry().knight(square)
}

/// The union of the rank, file, diagonal and anti-diagonal through `square`, without `square` itself.
#[inline(always)]
pub fn raystar(square: Square) -> Bitboard {
    geometry().raystar(square)
}

/// The full line shared by `a` and `b`, or an empty board if they are not aligned.
///
/// Ranks are checked first, then files, then diagonals and anti-diagonals.
///
/// # Example
/// ```
/// # use chessmap::{connecting_ray, Bitboard, Square};
/// assert_eq!(connecting_ray(Square::A1, Square::H1), Bitboard::RANK_1);
/// assert!(connecting_ray(Square::C1, Square::H6).intersects(Square::E3));
/// assert!(connecting_ray(Square::B1, Square::C3).is_empty());
/// ```
pub fn connecting_ray(a: Square, b: Square) -> Bitboard {
    let geo = geometry();
    [
        geo.rank(a.rank()),
        geo.file(a.file()),
        geo.diagonal(a),
        geo.anti_diagonal(a),
    ]
    .into_iter()
    .find(|line| line.intersects(b))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borders_match_neighbors() {
        for square in Square::iter() {
            for direction in Direction::all() {
                let expected = square.offset(
                    match direction {
                        Direction::NorthEast | Direction::East | Direction::SouthEast => 1,
                        Direction::SouthWest | Direction::West | Direction::NorthWest => -1,
                        _ => 0,
                    },
                    match direction {
                        Direction::NorthWest | Direction::North | Direction::NorthEast => 1,
                        Direction::SouthEast | Direction::South | Direction::SouthWest => -1,
                        _ => 0,
                    },
                );
                assert_eq!(neighbor(square, direction), expected, "{square} {direction:?}");
            }
        }
    }

    #[test]
    fn test_adjacent_counts() {
        assert_eq!(adjacent_squares(Square::A1).population(), 3);
        assert_eq!(adjacent_squares(Square::E1).population(), 5);
        assert_eq!(adjacent_squares(Square::E4).population(), 8);
        assert!(!adjacent_squares(Square::H4).intersects(Bitboard::FILE_A));
    }

    #[test]
    fn test_knight_squares_do_not_wrap() {
        assert_eq!(knight_squares(Square::H4).population(), 4);
        assert!(knight_squares(Square::H4).is_disjoint(Bitboard::FILE_A | Bitboard::FILE_B));
        assert_eq!(knight_squares(Square::D4).population(), 8);
        assert_eq!(knight_squares(Square::B1).population(), 3);
    }

    #[test]
    fn test_diagonals_partition_board() {
        let geo = geometry();
        let union = Square::iter().fold(Bitboard::EMPTY_BOARD, |acc, sq| acc | geo.diagonal(sq));
        assert_eq!(union, Bitboard::FULL_BOARD);
        assert_eq!(geo.diagonal(Square::A1).population(), 8);
        assert_eq!(geo.anti_diagonal(Square::A8).population(), 8);
        assert_eq!(geo.anti_diagonal(Square::A1), Bitboard::from_square(Square::A1));
    }

    #[test]
    fn test_raystar() {
        // Rank, file and two diagonals through d4, minus d4 itself.
        assert_eq!(raystar(Square::D4).population(), 7 + 7 + 7 + 6);
        assert!(!raystar(Square::D4).intersects(Square::D4));
        assert!(raystar(Square::D4).intersects(Square::H8));
        assert!(raystar(Square::D4).intersects(Square::A7));
    }

    #[test]
    fn test_connecting_ray_prefers_rank() {
        let geo = geometry();
        assert_eq!(connecting_ray(Square::E1, Square::E8), Bitboard::FILE_E);
        assert_eq!(connecting_ray(Square::E4, Square::B7), geo.anti_diagonal(Square::E4));
        assert_eq!(connecting_ray(Square::D4, Square::D4), Bitboard::RANK_4);
    }

    #[test]
    fn test_direction_between_agrees_with_walk() {
        for from in Square::iter() {
            for to in Square::iter() {
                if let Some(direction) = Direction::between(from, to) {
                    assert!(walk(from, direction).any(|sq| sq == to));
                }
            }
        }
    }
}
