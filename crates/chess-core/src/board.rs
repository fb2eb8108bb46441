//! Chess position representation.
//!
//! A [`Board`] owns the pieces (kept in a [`PositionStore`] keyed by square
//! index), a per-colour king square cache, the castling rights and the
//! en-passant target. Moves are applied in place; callers that need to
//! explore a move clone the board first.

use crate::castling::{CastlingRights, CastlingSide};
use crate::colour::Colour;
use crate::error::FenError;
use crate::move_list::MoveList;
use crate::movegen;
use crate::piece::{Piece, PieceKind};
use crate::square::{BOARD_WIDTH, Square};
use crate::store::PositionStore;

/// Piece kinds of the back rank in file order a-h.
const BACK_RANK: [PieceKind; BOARD_WIDTH] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A chess position without turn or clock information.
#[derive(Clone, Debug)]
pub struct Board {
    store: PositionStore<Piece>,
    /// Square of each colour's king, indexed by [`Colour::index`].
    kings: [Option<Square>; 2],
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Board {
    /// Two boards are equal when they hold the same pieces on the same
    /// squares with the same castling rights and en-passant target; the
    /// internal layout of the store is irrelevant.
    fn eq(&self, other: &Self) -> bool {
        self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.len() == other.len()
            && Square::iter().all(|sq| self.piece_at(sq) == other.piece_at(sq))
    }
}

impl Eq for Board {}

impl Board {
    /// Creates a board without pieces.
    ///
    /// All four castling rights are set and there is no en-passant target, so
    /// importing a placement into it yields a position that may castle as
    /// soon as kings and rooks stand on their home squares.
    pub fn empty() -> Board {
        Board {
            store: PositionStore::new(),
            kings: [None; 2],
            castling: CastlingRights::ALL,
            en_passant: None,
        }
    }

    /// Creates the standard initial position.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for colour in Colour::ALL {
            let back_rank = colour.back_rank();
            let pawn_rank = (back_rank as i8 + colour.forward()) as u8;
            for (file, kind) in (0..).zip(BACK_RANK) {
                board.set_piece(Square::at(file, back_rank), Piece::new(kind, colour));
                board.set_piece(Square::at(file, pawn_rank), Piece::new(PieceKind::Pawn, colour));
            }
        }
        board
    }

    /// Parses a FEN piece placement field into a new board.
    ///
    /// The board carries all castling rights and no en-passant target.
    ///
    /// # Errors
    ///
    /// [`FenError::InvalidPlacement`] if the field does not describe exactly
    /// eight ranks of eight files with known piece letters.
    pub fn from_placement(placement: &str) -> Result<Board, FenError> {
        let mut board = Board::empty();
        board.import_placement(placement)?;
        Ok(board)
    }

    /// Replaces every piece with the ones described by `placement`.
    ///
    /// Castling rights and the en-passant target are left untouched. The
    /// placement is parsed into a scratch store first, so on error the board
    /// is unchanged.
    pub fn import_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_WIDTH {
            return Err(FenError::InvalidPlacement(format!(
                "expected {BOARD_WIDTH} ranks, found {}",
                ranks.len()
            )));
        }

        let mut store = PositionStore::new();
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = (BOARD_WIDTH - 1 - row) as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 {
                        return Err(FenError::InvalidPlacement(format!(
                            "empty run of 0 on rank {}",
                            rank + 1
                        )));
                    }
                    file += run as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or_else(|| {
                        FenError::InvalidPlacement(format!("unknown piece '{c}'"))
                    })?;
                    if file as usize >= BOARD_WIDTH {
                        return Err(too_many_files(rank));
                    }
                    store
                        .add(Square::at(file, rank).index(), piece)
                        .map_err(|err| FenError::InvalidPlacement(err.to_string()))?;
                    file += 1;
                }
                if file as usize > BOARD_WIDTH {
                    return Err(too_many_files(rank));
                }
            }
            if file as usize != BOARD_WIDTH {
                return Err(FenError::InvalidPlacement(format!(
                    "rank {} describes {file} files",
                    rank + 1
                )));
            }
        }

        self.store = store;
        self.recalculate_king_squares();
        Ok(())
    }

    /// Renders the piece placement field of a FEN string.
    pub fn to_placement(&self) -> String {
        let mut placement = String::with_capacity(72);
        for rank in (0..BOARD_WIDTH as u8).rev() {
            let mut empty = 0;
            for file in 0..BOARD_WIDTH as u8 {
                match self.piece_at(Square::at(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }
        placement
    }

    /// Rebuilds the king square cache from a scan of all 64 squares.
    pub fn recalculate_king_squares(&mut self) {
        self.kings = [None; 2];
        for sq in Square::iter() {
            if let Some(piece) = self.piece_at(sq) {
                if piece.kind == PieceKind::King {
                    self.kings[piece.colour.index()] = Some(sq);
                }
            }
        }
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.store.get(sq.index()).ok().copied()
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.store.contains(sq.index())
    }

    /// Places `piece` on `sq`, replacing any occupant.
    ///
    /// # Panics
    ///
    /// Panics if the underlying store cannot place the entry, which would
    /// mean its resizing invariant has been broken.
    pub fn set_piece(&mut self, sq: Square, piece: Piece) {
        self.remove_piece(sq);
        self.store
            .add(sq.index(), piece)
            .unwrap_or_else(|err| panic!("cannot place {piece} on {sq}: {err}"));
        if piece.kind == PieceKind::King {
            self.kings[piece.colour.index()] = Some(sq);
        }
    }

    /// Removes and returns the piece on `sq`.
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.store.delete(sq.index()).ok()?;
        if piece.kind == PieceKind::King && self.kings[piece.colour.index()] == Some(sq) {
            self.kings[piece.colour.index()] = None;
        }
        Some(piece)
    }

    /// Number of pieces on the board.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Cached square of the king of `colour`.
    #[inline]
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.kings[colour.index()]
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn set_castling(&mut self, castling: CastlingRights) {
        self.castling = castling;
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn set_en_passant(&mut self, en_passant: Option<Square>) {
        self.en_passant = en_passant;
    }

    /// Pieces of `colour` with their squares, in square order from a1.
    pub fn pieces(&self, colour: Colour) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |sq| {
            self.piece_at(sq)
                .filter(|piece| piece.colour == colour)
                .map(|piece| (sq, piece))
        })
    }

    /// Applies a move without checking that it is legal.
    ///
    /// Handles the rook of a castling move (any king move of two files), the
    /// pawn captured en passant, castling right revocation and the en-passant
    /// target. Pawns reaching the last rank are not promoted here; move
    /// generation does that on its own copy.
    ///
    /// # Panics
    ///
    /// Panics if `from` is empty. Moves are expected to come from the
    /// generator's output.
    pub fn apply_move(&mut self, from: Square, to: Square) {
        let piece = self
            .remove_piece(from)
            .unwrap_or_else(|| panic!("no piece on {from} to move to {to}"));
        let colour = piece.colour;
        let captured = self.remove_piece(to);

        match piece.kind {
            PieceKind::Pawn => {
                if captured.is_none() && from.file() != to.file() && self.en_passant == Some(to) {
                    if let Some(victim) = to.shift(0, -colour.forward()) {
                        self.remove_piece(victim);
                    }
                }
            }
            PieceKind::King => {
                if from.file().abs_diff(to.file()) == 2 {
                    let side = if to.file() > from.file() {
                        CastlingSide::KingSide
                    } else {
                        CastlingSide::QueenSide
                    };
                    let corner = side.rook_corner(colour);
                    if let Some(rook) = self.remove_piece(corner) {
                        self.set_piece(side.rook_destination(colour), rook);
                    }
                }
                self.castling.revoke_colour(colour);
            }
            _ => {}
        }

        self.castling.revoke_corner(from);
        self.castling.revoke_corner(to);

        self.en_passant = if piece.kind == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2
        {
            from.shift(0, colour.forward())
        } else {
            None
        };

        self.set_piece(to, piece);
    }

    /// Every pseudo-legal move of `colour`, each with its resulting board.
    pub fn generate_pseudo_legal_moves(&self, colour: Colour) -> MoveList {
        MoveList::pseudo_legal(self, colour)
    }

    /// Every legal move of `colour`, each with its resulting board.
    pub fn generate_legal_moves(&self, colour: Colour) -> MoveList {
        MoveList::legal(self, colour)
    }

    /// SAN of every legal move of `colour`, in generation order.
    pub fn generate_legal_move_sans(&self, colour: Colour) -> Vec<String> {
        self.generate_legal_moves(colour).sans()
    }

    /// Returns true if the king of `colour` is missing or attacked.
    pub fn is_in_check(&self, colour: Colour) -> bool {
        let Some(king) = self.king_square(colour) else {
            return true;
        };
        self.is_attacked_by(king, colour.opposite())
    }

    /// Returns true if any piece of `attacker` could capture on `sq`.
    pub fn is_attacked_by(&self, sq: Square, attacker: Colour) -> bool {
        self.pieces(attacker)
            .any(|(from, piece)| movegen::attacks(piece, from, self).contains(&sq))
    }

    pub fn is_checkmate(&self, colour: Colour) -> bool {
        self.is_in_check(colour) && self.generate_legal_moves(colour).is_empty()
    }

    pub fn is_stalemate(&self, colour: Colour) -> bool {
        !self.is_in_check(colour) && self.generate_legal_moves(colour).is_empty()
    }
}

fn too_many_files(rank: u8) -> FenError {
    FenError::InvalidPlacement(format!("rank {} describes more than 8 files", rank + 1))
}
