//! Fast heuristic scoring of boards reached by a two-ply search.
//!
//! # Pipeline
//!
//! ```text
//! PlacementAnalysis (lock + clear, per ply)
//!     ↓ accumulated into
//! LineClearTally
//!     ↓ with the final board
//! BoardFeatures (17 integers, rule gates and level from EvaluationContext)
//!     ↓ dot product with
//! FastEvalWeights → score
//! ```
//!
//! - [`board_analysis`] - lazily computed shape metrics (heights, holes, transitions, wells)
//! - [`board_features`] - the fixed feature vector, in [`FastEvalWeights::NAMES`] order
//! - [`context`] - rule variants: rotation system, clear requirement, danger zone, spin bonus, level
//! - [`weights`] - named coefficients with versioned defaults
//! - [`evaluator`] - [`FastEvaluator`], the weighted sum
//!
//! Scoring is pure: the evaluator reads the board and tally, allocates nothing, and
//! returns the same `f32` for the same inputs.

pub use self::{
    board_features::BoardFeatures,
    context::{ClearRequirement, ContextError, EvaluationContext},
    evaluator::FastEvaluator,
    placement_analysis::{LineClearTally, PlacementAnalysis},
    weights::{FastEvalWeights, WeightsError},
};

pub mod board_analysis;
pub mod board_features;
pub mod context;
pub mod evaluator;
pub mod placement_analysis;
pub mod weights;
