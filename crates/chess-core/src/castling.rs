use std::fmt;
use std::str::FromStr;

use crate::colour::Colour;
use crate::error::FenError;
use crate::square::Square;

/// The side of the board a king castles towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];

    /// The corner square the rook of this side starts on.
    pub fn rook_corner(self, colour: Colour) -> Square {
        let file = match self {
            CastlingSide::KingSide => 7,
            CastlingSide::QueenSide => 0,
        };
        square_on_back_rank(file, colour)
    }

    /// The square the king lands on when castling.
    pub fn king_destination(self, colour: Colour) -> Square {
        let file = match self {
            CastlingSide::KingSide => 6,
            CastlingSide::QueenSide => 2,
        };
        square_on_back_rank(file, colour)
    }

    /// The square the rook lands on when castling.
    pub fn rook_destination(self, colour: Colour) -> Square {
        let file = match self {
            CastlingSide::KingSide => 5,
            CastlingSide::QueenSide => 3,
        };
        square_on_back_rank(file, colour)
    }

    /// SAN of the castling move.
    pub fn san(self) -> &'static str {
        match self {
            CastlingSide::KingSide => "O-O",
            CastlingSide::QueenSide => "O-O-O",
        }
    }

    fn flag(self, colour: Colour) -> u8 {
        match (colour, self) {
            (Colour::White, CastlingSide::KingSide) => CastlingRights::WHITE_KING_SIDE,
            (Colour::White, CastlingSide::QueenSide) => CastlingRights::WHITE_QUEEN_SIDE,
            (Colour::Black, CastlingSide::KingSide) => CastlingRights::BLACK_KING_SIDE,
            (Colour::Black, CastlingSide::QueenSide) => CastlingRights::BLACK_QUEEN_SIDE,
        }
    }
}

/// The king's home square for a colour.
pub fn king_home(colour: Colour) -> Square {
    square_on_back_rank(4, colour)
}

fn square_on_back_rank(file: u8, colour: Colour) -> Square {
    Square::at(file, colour.back_rank())
}

/// Four independent castling flags packed into a byte.
///
/// Rights are only ever removed while a game is played; the FEN importer is
/// the only place a fresh set is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KING_SIDE: u8 = 0b0001;
    const WHITE_QUEEN_SIDE: u8 = 0b0010;
    const BLACK_KING_SIDE: u8 = 0b0100;
    const BLACK_QUEEN_SIDE: u8 = 0b1000;

    pub const ALL: CastlingRights = CastlingRights(0b1111);
    pub const NONE: CastlingRights = CastlingRights(0);

    #[inline]
    pub fn has(self, colour: Colour, side: CastlingSide) -> bool {
        self.0 & side.flag(colour) != 0
    }

    #[inline]
    pub fn revoke(&mut self, colour: Colour, side: CastlingSide) {
        self.0 &= !side.flag(colour);
    }

    /// Revokes both rights of `colour`, as after any king move.
    #[inline]
    pub fn revoke_colour(&mut self, colour: Colour) {
        for side in CastlingSide::ALL {
            self.revoke(colour, side);
        }
    }

    /// Revokes the right tied to a rook corner, if `square` is one.
    pub fn revoke_corner(&mut self, square: Square) {
        match square {
            Square::A1 => self.revoke(Colour::White, CastlingSide::QueenSide),
            Square::H1 => self.revoke(Colour::White, CastlingSide::KingSide),
            Square::A8 => self.revoke(Colour::Black, CastlingSide::QueenSide),
            Square::H8 => self.revoke(Colour::Black, CastlingSide::KingSide),
            _ => {}
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::ALL
    }
}

impl FromStr for CastlingRights {
    type Err = FenError;

    /// Parses the FEN castling field: `-` or any subset of `KQkq`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(CastlingRights::NONE);
        }
        let mut rights = CastlingRights::NONE;
        for c in s.chars() {
            rights.0 |= match c {
                'K' => Self::WHITE_KING_SIDE,
                'Q' => Self::WHITE_QUEEN_SIDE,
                'k' => Self::BLACK_KING_SIDE,
                'q' => Self::BLACK_QUEEN_SIDE,
                _ => return Err(FenError::InvalidCastling(c)),
            };
        }
        if rights.is_empty() {
            return Err(FenError::InvalidCastling('-'));
        }
        Ok(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_KING_SIDE, 'K'),
            (Self::WHITE_QUEEN_SIDE, 'Q'),
            (Self::BLACK_KING_SIDE, 'k'),
            (Self::BLACK_QUEEN_SIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
