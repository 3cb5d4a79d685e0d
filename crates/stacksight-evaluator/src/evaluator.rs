//! Linear scoring of a final board.
//!
//! ```text
//! score = w₁·f₁ + w₂·f₂ + ... + w₁₆·f₁₆
//! ```
//!
//! The terms are summed in [`FastEvalWeights::NAMES`] order, so a given board, tally,
//! context and weight vector always produce the same `f32` bit pattern.

use std::iter;

use stacksight_engine::BitBoard;

use crate::{
    board_features::BoardFeatures, context::EvaluationContext,
    placement_analysis::LineClearTally, weights::FastEvalWeights,
};

/// Scores boards under one context and weight vector.
///
/// The score is finite whenever the weights pass [`FastEvalWeights::validate`]:
/// every feature is a bounded integer, and validation bounds every coefficient. A topped-out board is not an error, it
/// scores very low through the `top_out` and `danger` terms and stays comparable.
///
/// # Example
///
/// ```
/// use stacksight_engine::BitBoard;
/// use stacksight_evaluator::{EvaluationContext, FastEvalWeights, FastEvaluator, LineClearTally};
///
/// let evaluator = FastEvaluator::new(EvaluationContext::default(), FastEvalWeights::default());
/// let score = evaluator.score(&BitBoard::INITIAL, &LineClearTally::default());
/// assert_eq!(score, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastEvaluator {
    context: EvaluationContext,
    weights: FastEvalWeights,
}

impl FastEvaluator {
    #[must_use]
    pub fn new(context: EvaluationContext, weights: FastEvalWeights) -> Self {
        Self { context, weights }
    }

    #[must_use]
    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    #[must_use]
    pub fn weights(&self) -> &FastEvalWeights {
        &self.weights
    }

    #[must_use]
    pub fn features(&self, board: &BitBoard, clears: &LineClearTally) -> BoardFeatures {
        BoardFeatures::extract(board, clears, &self.context)
    }

    #[inline]
    #[must_use]
    pub fn score(&self, board: &BitBoard, clears: &LineClearTally) -> f32 {
        self.score_features(&self.features(board, clears))
    }

    #[must_use]
    pub fn score_features(&self, features: &BoardFeatures) -> f32 {
        iter::zip(features.to_array(), self.weights.to_array())
            .map(|(f, w)| f * w)
            .sum()
    }
}
