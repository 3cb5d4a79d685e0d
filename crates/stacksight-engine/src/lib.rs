//! Board, piece and placement model for the stacksight search core.
//!
//! - [`BitBoard`] - 10×20 playable area stored as bit rows with sentinel walls
//! - [`Piece`] / [`PieceKind`] - the seven tetrominoes with rotation and anchor
//! - [`Placement`] - a terminal, locked piece position plus its [`PlacementKind`]
//! - [`move_gen`] - enumeration of every reachable terminal placement

pub use self::{core::*, move_gen::generate_placements};

pub mod core;
pub mod move_gen;

/// Malformed board input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardShapeError {
    #[display("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[display("row {row}: expected {expected} cells, got {actual}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("row {row}, column {column}: invalid cell {cell:?} (expected '#' or '.')")]
    InvalidCell { row: usize, column: usize, cell: char },
    #[display("row {row}: bits {bits:#06x} do not fit the board frame")]
    RowBits { row: usize, bits: u16 },
    #[display("row {row}: invalid hex row {text:?}")]
    InvalidHex { row: usize, text: String },
}

/// Piece state outside the closed set of kinds, rotations and board frame.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceStateError {
    #[display("invalid piece kind {_0:?}")]
    Kind(#[error(not(source))] char),
    #[display("rotation must be 0-3, got {_0}")]
    Rotation(#[error(not(source))] u8),
    #[display("piece anchored at ({x}, {y}) does not fit the board frame")]
    Position { x: u8, y: u8 },
    #[display("expected format 'kind' or 'kind#rotation@x,y', got {_0:?}")]
    Format(#[error(not(source))] String),
}
