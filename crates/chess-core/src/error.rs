//! Error types for the position store and the FEN/coordinate parsers.

use thiserror::Error;

/// Failures reported by [`crate::store::PositionStore`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The key has no live entry.
    #[error("key not found: {0}")]
    NotFound(usize),

    /// The key already has a live entry.
    #[error("key already present: {0}")]
    Duplicate(usize),

    /// A probe wrapped around the whole table without finding a free slot.
    #[error("position store is full (capacity {capacity})")]
    CapacityExhausted { capacity: usize },
}

/// Errors that can occur when parsing a square in coordinate notation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareError {
    #[error("Invalid square format: must be 2 characters (e.g., 'e4')")]
    InvalidFormat,
    #[error("Invalid file '{0}': must be a-h")]
    InvalidFile(char),
    #[error("Invalid rank '{0}': must be 1-8")]
    InvalidRank(char),
}

/// Errors raised while importing a FEN string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// A full FEN must have exactly six whitespace separated fields.
    #[error("invalid FEN: expected 6 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("invalid active colour '{0}': must be 'w' or 'b'")]
    InvalidColour(String),

    #[error("invalid castling availability character '{0}'")]
    InvalidCastling(char),

    #[error("invalid en passant target '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid {field}: '{value}' is not a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },
}
