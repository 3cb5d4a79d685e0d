//! Canonical cache key for a search call.
//!
//! The key names every input that can change the search result:
//!
//! ```text
//! v1;b=<board rows>;p1=<piece>;p2=<piece>;n=<keep_top_n>;c=<context>;w=<weights>
//! ```
//!
//! - `b` - the board's hex row list, hidden rows and walls included
//! - `p1`, `p2` - pieces in `kind#rotation@x,y` form
//! - `c` - `rotation_system,clear_requirement,danger_zone_height,reward_spin_clears,level`
//! - `w` - the 17 coefficients as `f32` bit patterns (8 hex digits each), so a change
//!   in the last bit of any weight changes the key
//!
//! Building a key never validates or searches; it is cheap enough to compute before
//! deciding whether to run the search.

use std::fmt;

use stacksight_engine::{BitBoard, Piece};
use stacksight_evaluator::{EvaluationContext, FastEvalWeights};

pub const KEY_VERSION: &str = "v1";

/// Borrowed search inputs whose [`Display`](fmt::Display) output is the lookup key.
#[derive(Debug, Clone, Copy)]
pub struct LookupKey<'a> {
    pub board: &'a BitBoard,
    pub first_piece: Piece,
    pub second_piece: Piece,
    pub keep_top_n: usize,
    pub context: &'a EvaluationContext,
    pub weights: &'a FastEvalWeights,
}

impl fmt::Display for LookupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.context;
        write!(
            f,
            "{KEY_VERSION};b={};p1={};p2={};n={};c={},{},{},{},{};w=",
            self.board,
            self.first_piece,
            self.second_piece,
            self.keep_top_n,
            context.rotation_system.as_str(),
            context.clear_requirement.as_str(),
            context.danger_zone_height,
            context.reward_spin_clears,
            context.level,
        )?;
        for (i, weight) in self.weights.to_array().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:08x}", weight.to_bits())?;
        }
        Ok(())
    }
}

/// Returns the lookup key of a [`search_depth2`](crate::search_depth2) call.
#[must_use]
pub fn lookup_key(
    board: &BitBoard,
    first_piece: Piece,
    second_piece: Piece,
    keep_top_n: usize,
    context: &EvaluationContext,
    weights: &FastEvalWeights,
) -> String {
    LookupKey {
        board,
        first_piece,
        second_piece,
        keep_top_n,
        context,
        weights,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use stacksight_engine::PieceKind;

    use super::*;

    #[test]
    fn test_key_layout() {
        let key = lookup_key(
            &BitBoard::INITIAL,
            Piece::new(PieceKind::O),
            Piece::new(PieceKind::I),
            5,
            &EvaluationContext::default(),
            &FastEvalWeights::default(),
        );

        let sections: Vec<&str> = key.split(';').collect();
        assert_eq!(sections.len(), 7);
        assert_eq!(sections[0], "v1");
        assert!(sections[1].starts_with("b=3003,3003,"));
        assert!(sections[1].ends_with(",3fff,3fff"));
        assert_eq!(sections[2], "p1=O#0@5,0");
        assert_eq!(sections[3], "p2=I#0@5,0");
        assert_eq!(sections[4], "n=5");
        assert_eq!(sections[5], "c=simple_kick,any_lines,15,true,0");

        let weights: Vec<&str> = sections[6].trim_start_matches("w=").split(',').collect();
        assert_eq!(weights.len(), FastEvalWeights::COUNT);
        assert!(weights.iter().all(|w| w.len() == 8));
        // tetris = 8.0
        assert_eq!(weights[11], "41000000");
    }

    #[test]
    fn test_weight_bit_changes_key() {
        let board = BitBoard::INITIAL;
        let piece = Piece::new(PieceKind::T);
        let context = EvaluationContext::default();
        let weights = FastEvalWeights::default();
        let nudged = FastEvalWeights {
            holes: f32::from_bits(weights.holes.to_bits() + 1),
            ..weights
        };

        assert_ne!(
            lookup_key(&board, piece, piece, 1, &context, &weights),
            lookup_key(&board, piece, piece, 1, &context, &nudged)
        );
    }

    #[test]
    fn test_non_finite_weights_still_encode() {
        let weights = FastEvalWeights {
            bumpiness: f32::NAN,
            ..FastEvalWeights::default()
        };
        let key = lookup_key(
            &BitBoard::INITIAL,
            Piece::new(PieceKind::S),
            Piece::new(PieceKind::Z),
            0,
            &EvaluationContext::default(),
            &weights,
        );
        assert!(key.contains(&format!("{:08x}", f32::NAN.to_bits())));
    }
}
