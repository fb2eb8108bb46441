use std::fmt;
use std::str::FromStr;

use crate::error::SquareError;

/// Represents a square on a chess board, ranging from A1 to H8.
///
/// Files (columns) are labeled a-h and ranks (rows) 1-8. The index of a
/// square is `rank * 8 + file`, so White's back rank occupies 0-7:
///
/// ```text
///   a  b  c  d  e  f  g  h
/// 8 56 57 58 59 60 61 62 63
/// 7 48 49 50 51 52 53 54 55
/// 6 40 41 42 43 44 45 46 47
/// 5 32 33 34 35 36 37 38 39
/// 4 24 25 26 27 28 29 30 31
/// 3 16 17 18 19 20 21 22 23
/// 2 08 09 10 11 12 13 14 15
/// 1 00 01 02 03 04 05 06 07
/// ```
///
/// Absence of a square is expressed with `Option<Square>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

/// Number of files (and ranks) on the board.
pub const BOARD_WIDTH: usize = 8;
/// Number of squares on the board.
pub const BOARD_SQUARES: usize = BOARD_WIDTH * BOARD_WIDTH;

use Square::*;

#[rustfmt::skip]
const ALL_SQUARES: [Square; BOARD_SQUARES] = [
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
];

impl Square {
    /// Returns the index of the square (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts an index into a `Square`, or `None` when it is outside 0-63.
    #[inline]
    pub fn from_index(index: usize) -> Option<Square> {
        ALL_SQUARES.get(index).copied()
    }

    /// Converts a signed index into a `Square`, rejecting anything off the board.
    #[inline]
    pub fn from_signed(index: i32) -> Option<Square> {
        usize::try_from(index).ok().and_then(Square::from_index)
    }

    /// Creates a `Square` from file and rank coordinates (both 0-7).
    ///
    /// # Returns
    ///
    /// `None` if either coordinate is off the board.
    #[inline]
    pub fn from_file_rank(file: u8, rank: u8) -> Option<Square> {
        if (file as usize) < BOARD_WIDTH && (rank as usize) < BOARD_WIDTH {
            Square::from_index(rank as usize * BOARD_WIDTH + file as usize)
        } else {
            None
        }
    }

    /// Square at known-valid coordinates; panics if either is 8 or more.
    #[inline]
    pub(crate) fn at(file: u8, rank: u8) -> Square {
        ALL_SQUARES[rank as usize * BOARD_WIDTH + file as usize]
    }

    /// Returns the file (column) of this square, 0 for file a.
    #[inline]
    pub const fn file(self) -> u8 {
        (self as u8) % BOARD_WIDTH as u8
    }

    /// Returns the rank (row) of this square, 0 for rank 1.
    #[inline]
    pub const fn rank(self) -> u8 {
        (self as u8) / BOARD_WIDTH as u8
    }

    /// The file letter of this square ('a'-'h').
    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// The rank digit of this square ('1'-'8').
    #[inline]
    pub fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// Moves the square by the given file and rank deltas.
    ///
    /// Unlike raw index arithmetic this never wraps across the board edge.
    #[inline]
    pub fn shift(self, delta_file: i8, delta_rank: i8) -> Option<Square> {
        let file = self.file() as i8 + delta_file;
        let rank = self.rank() as i8 + delta_rank;
        if (0..BOARD_WIDTH as i8).contains(&file) && (0..BOARD_WIDTH as i8).contains(&rank) {
            Square::from_file_rank(file as u8, rank as u8)
        } else {
            None
        }
    }

    /// Returns an iterator over all 64 squares, from A1 to H8.
    #[inline]
    pub fn iter() -> impl Iterator<Item = Square> {
        ALL_SQUARES.into_iter()
    }
}

impl FromStr for Square {
    type Err = SquareError;

    /// Parses a square in coordinate notation, e.g. "e4".
    ///
    /// Only lowercase file letters are accepted since uppercase letters name
    /// pieces in SAN.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(SquareError::InvalidFormat);
        };

        if !('a'..='h').contains(&file_char) {
            return Err(SquareError::InvalidFile(file_char));
        }
        if !('1'..='8').contains(&rank_char) {
            return Err(SquareError::InvalidRank(rank_char));
        }

        let file = file_char as u8 - b'a';
        let rank = rank_char as u8 - b'1';
        Square::from_file_rank(file, rank).ok_or(SquareError::InvalidFormat)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_rank_and_file() {
        for (i, sq) in Square::iter().enumerate() {
            assert_eq!(sq.index(), i);
            assert_eq!(sq.file() as usize, i % 8);
            assert_eq!(sq.rank() as usize, i / 8);
        }
    }

    #[test]
    fn test_from_index() {
        assert_eq!(Square::from_index(0), Some(Square::A1));
        assert_eq!(Square::from_index(63), Some(Square::H8));
        assert_eq!(Square::from_index(64), None);
        assert_eq!(Square::from_signed(-1), None);
        assert_eq!(Square::from_signed(28), Some(Square::E4));
    }

    #[test]
    fn test_from_file_rank() {
        assert_eq!(Square::from_file_rank(4, 3), Some(Square::E4));
        assert_eq!(Square::from_file_rank(8, 0), None);
        assert_eq!(Square::from_file_rank(0, 8), None);
    }

    #[test]
    fn test_shift_does_not_wrap() {
        assert_eq!(Square::H1.shift(1, 0), None);
        assert_eq!(Square::A4.shift(-1, 1), None);
        assert_eq!(Square::G1.shift(-1, 2), Some(Square::F3));
        assert_eq!(Square::E8.shift(0, 1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Square::A1.to_string(), "a1");
        assert_eq!(Square::E4.to_string(), "e4");
        assert_eq!(Square::H8.to_string(), "h8");
    }

    #[test]
    fn test_square_from_str() {
        assert_eq!("a1".parse::<Square>(), Ok(Square::A1));
        assert_eq!(" d5 ".parse::<Square>(), Ok(Square::D5));
        assert_eq!("e".parse::<Square>(), Err(SquareError::InvalidFormat));
        assert_eq!("e44".parse::<Square>(), Err(SquareError::InvalidFormat));
        assert_eq!("i4".parse::<Square>(), Err(SquareError::InvalidFile('i')));
        assert_eq!("E4".parse::<Square>(), Err(SquareError::InvalidFile('E')));
        assert_eq!("e9".parse::<Square>(), Err(SquareError::InvalidRank('9')));

        for square in Square::iter() {
            assert_eq!(square.to_string().parse::<Square>(), Ok(square));
        }
    }
}
