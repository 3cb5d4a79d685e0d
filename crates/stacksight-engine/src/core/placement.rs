use serde::{Deserialize, Serialize};

use super::{
    bit_board::BitBoard,
    piece::{Piece, PieceKind, PieceRotation},
};

/// How a terminal placement is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    /// Reachable by shifting/rotating in the open and dropping straight down.
    Drop,
    /// Something overhangs the final position; the piece had to slide under it.
    Tuck,
    /// The piece cannot move left, right or up from its final position.
    Spin,
}

impl PlacementKind {
    /// Classifies a resting piece against the board it rests on.
    #[must_use]
    pub fn classify(board: &BitBoard, piece: Piece) -> Self {
        let blocked = |moved: Option<Piece>| moved.is_none_or(|p| board.is_colliding(p));

        if piece.kind() != PieceKind::O
            && blocked(piece.left())
            && blocked(piece.right())
            && blocked(piece.up())
        {
            return PlacementKind::Spin;
        }

        let mut above = piece;
        while let Some(p) = above.up() {
            if board.is_colliding(p) {
                return PlacementKind::Tuck;
            }
            above = p;
        }
        PlacementKind::Drop
    }
}

/// A terminal piece position produced by the move generator.
///
/// The piece has settled (one row lower would collide) and every cell lies inside
/// the playable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    piece: Piece,
    kind: PlacementKind,
}

impl Placement {
    #[must_use]
    pub fn new(piece: Piece, kind: PlacementKind) -> Self {
        Self { piece, kind }
    }

    #[must_use]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub fn kind(&self) -> PlacementKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.piece.rotation()
    }

    /// Anchor column of the 4×4 box in the board frame.
    #[must_use]
    pub fn x(&self) -> usize {
        self.piece.position().x()
    }

    /// Anchor row of the 4×4 box in the board frame.
    #[must_use]
    pub fn y(&self) -> usize {
        self.piece.position().y()
    }

    /// Locks the piece onto a copy of `board` and clears lines.
    ///
    /// Returns the resulting board and the number of cleared lines.
    #[must_use]
    pub fn apply(&self, board: &BitBoard) -> (BitBoard, usize) {
        let mut board = board.clone();
        board.fill_piece(self.piece);
        let cleared_lines = board.clear_lines();
        (board, cleared_lines)
    }
}
