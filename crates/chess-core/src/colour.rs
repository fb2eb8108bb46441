use std::fmt;

/// The two sides of a chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    White,
    Black,
}

impl Colour {
    /// Both colours, White first.
    pub const ALL: [Colour; 2] = [Colour::White, Colour::Black];

    /// Returns the opposite colour.
    #[inline]
    pub fn opposite(self) -> Colour {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }

    /// Index usable for per-colour arrays (White = 0, Black = 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rank offset a pawn of this colour advances by.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Colour::White => 1,
            Colour::Black => -1,
        }
    }

    /// Rank (0-7) this colour's pieces start on.
    #[inline]
    pub fn back_rank(self) -> u8 {
        match self {
            Colour::White => 0,
            Colour::Black => 7,
        }
    }

    /// Rank (0-7) a pawn of this colour promotes on.
    #[inline]
    pub fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }

    /// Converts the colour to its FEN active-colour token.
    pub fn to_fen_char(self) -> char {
        match self {
            Colour::White => 'w',
            Colour::Black => 'b',
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colour::White => write!(f, "White"),
            Colour::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Colour::White.opposite(), Colour::Black);
        assert_eq!(Colour::Black.opposite(), Colour::White);
    }

    #[test]
    fn test_ranks() {
        assert_eq!(Colour::White.promotion_rank(), 7);
        assert_eq!(Colour::Black.promotion_rank(), 0);
        assert_eq!(Colour::Black.forward(), -1);
    }
}
