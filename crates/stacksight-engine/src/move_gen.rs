//! Enumeration of every terminal placement a piece can reach.
//!
//! The generator floods the state space `(rotation, x, y)` from the supplied piece
//! state. Edges are shift left, shift right, soft drop by one row, and rotation in
//! both directions under the given [`RotationSystem`]. Every reachable state whose
//! next row down collides is a terminal placement.
//!
//! # Canonical order
//!
//! Terminals are sorted by `(rotation, x, y)`. Several states can lock the same
//! cells (the O-piece in every rotation, the two horizontal I states, ...); of those
//! only the first in canonical order is kept. Output order is canonical order, so
//! repeated calls return identical sequences.
//!
//! # Example
//!
//! ```
//! use stacksight_engine::{BitBoard, Piece, PieceKind, RotationSystem, generate_placements};
//!
//! let placements = generate_placements(
//!     &BitBoard::INITIAL,
//!     Piece::new(PieceKind::O),
//!     RotationSystem::SimpleKick,
//! );
//! assert_eq!(placements.len(), 9);
//! ```

use arrayvec::ArrayVec;

use crate::core::{
    BitBoard, Footprint, Piece, Placement, PlacementKind, RotationDirection, RotationSystem,
};

/// Returns the distinct terminal placements of `piece` on `board`, in canonical order.
///
/// A start state that already collides yields an empty list, as does a board on
/// which every resting position would leave a cell in the hidden rows.
#[must_use]
pub fn generate_placements(
    board: &BitBoard,
    piece: Piece,
    system: RotationSystem,
) -> Vec<Placement> {
    if board.is_colliding(piece) {
        return Vec::new();
    }

    let mut visited = VisitedStates::default();
    visited.insert(piece);
    let mut pending = vec![piece];
    let mut terminals = Vec::new();

    while let Some(current) = pending.pop() {
        if is_resting(board, current) && is_inside_playable_area(current) {
            terminals.push(current);
        }
        for next in successors(board, current, system) {
            if visited.insert(next) {
                pending.push(next);
            }
        }
    }

    canonicalize(board, terminals)
}

fn successors(board: &BitBoard, piece: Piece, system: RotationSystem) -> ArrayVec<Piece, 5> {
    let free = |moved: Option<Piece>| moved.filter(|p| !board.is_colliding(*p));

    let mut next = ArrayVec::new();
    next.extend(free(piece.left()));
    next.extend(free(piece.right()));
    next.extend(free(piece.down()));
    next.extend(piece.rotated_with(system, RotationDirection::Clockwise, board));
    next.extend(piece.rotated_with(system, RotationDirection::CounterClockwise, board));
    next
}

fn is_resting(board: &BitBoard, piece: Piece) -> bool {
    piece.down().is_none_or(|p| board.is_colliding(p))
}

fn is_inside_playable_area(piece: Piece) -> bool {
    piece
        .occupied_positions()
        .all(|(_, y)| BitBoard::PLAYABLE_Y_RANGE.contains(&y))
}

fn canonicalize(board: &BitBoard, mut terminals: Vec<Piece>) -> Vec<Placement> {
    terminals.sort_unstable_by_key(|p| (p.rotation(), p.position().x(), p.position().y()));

    let mut keyed: Vec<(Footprint, usize)> = terminals
        .iter()
        .enumerate()
        .map(|(i, p)| (p.footprint(), i))
        .collect();
    keyed.sort_unstable();
    keyed.dedup_by_key(|(footprint, _)| *footprint);
    keyed.sort_unstable_by_key(|(_, i)| *i);

    keyed
        .into_iter()
        .map(|(_, i)| {
            let piece = terminals[i];
            Placement::new(piece, PlacementKind::classify(board, piece))
        })
        .collect()
}

/// Visited set over `(rotation, x, y)`, one bit per row.
#[derive(Debug, Default)]
struct VisitedStates {
    bits: [[u32; BitBoard::TOTAL_WIDTH]; 4],
}

impl VisitedStates {
    /// Marks the state visited; returns `false` if it already was.
    fn insert(&mut self, piece: Piece) -> bool {
        let cell = &mut self.bits[usize::from(piece.rotation().as_u8())][piece.position().x()];
        let bit = 1 << piece.position().y();
        let inserted = *cell & bit == 0;
        *cell |= bit;
        inserted
    }
}
