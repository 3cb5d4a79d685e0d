//! Two-ply search: every placement of the current piece, then every placement of the
//! next piece on each resulting board.
//!
//! Enumeration follows the canonical placement order at both plies and candidates enter
//! the [`TopN`] in that order, so equal scores are ranked by discovery and the output
//! is identical across runs and threads.

use log::{debug, trace, warn};
use serde::Serialize;
use stacksight_engine::{BitBoard, Piece, Placement, generate_placements};
use stacksight_evaluator::{
    ContextError, EvaluationContext, FastEvalWeights, FastEvaluator, LineClearTally,
    PlacementAnalysis, WeightsError,
};

use crate::top_n::TopN;

/// One ranked outcome of the two-ply search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Depth2Possibility {
    pub first_placement: Placement,
    pub second_placement: Placement,
    /// Board after both pieces are locked and full rows are cleared.
    pub board: BitBoard,
    pub score: f32,
    pub first_cleared_lines: usize,
    pub second_cleared_lines: usize,
}

impl Depth2Possibility {
    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.first_cleared_lines + self.second_cleared_lines
    }
}

#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SearchError {
    #[display("invalid evaluation context: {_0}")]
    Context(ContextError),
    #[display("invalid weights: {_0}")]
    Weights(WeightsError),
}

/// Counters of one search call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub first_placements: usize,
    pub evaluated_nodes: usize,
    /// The node limit stopped the enumeration before every pair was scored.
    pub truncated: bool,
}

/// Configured two-ply search.
///
/// # Example
///
/// ```
/// use stacksight_engine::{BitBoard, Piece, PieceKind};
/// use stacksight_evaluator::{EvaluationContext, FastEvalWeights};
/// use stacksight_search::Depth2Search;
///
/// let search = Depth2Search::new(EvaluationContext::default(), FastEvalWeights::default())
///     .keep_top_n(3);
/// let best = search
///     .run(&BitBoard::INITIAL, Piece::new(PieceKind::T), Piece::new(PieceKind::I))
///     .unwrap();
/// assert_eq!(best.len(), 3);
/// assert!(best[0].score >= best[1].score);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Depth2Search {
    context: EvaluationContext,
    weights: FastEvalWeights,
    keep_top_n: usize,
    node_limit: Option<usize>,
}

impl Depth2Search {
    pub const DEFAULT_KEEP_TOP_N: usize = 1;

    #[must_use]
    pub fn new(context: EvaluationContext, weights: FastEvalWeights) -> Self {
        Self {
            context,
            weights,
            keep_top_n: Self::DEFAULT_KEEP_TOP_N,
            node_limit: None,
        }
    }

    #[must_use]
    pub fn keep_top_n(self, keep_top_n: usize) -> Self {
        Self { keep_top_n, ..self }
    }

    /// Caps the number of second-ply boards scored per call.
    #[must_use]
    pub fn node_limit(self, node_limit: Option<usize>) -> Self {
        Self { node_limit, ..self }
    }

    pub fn run(
        &self,
        board: &BitBoard,
        first_piece: Piece,
        second_piece: Piece,
    ) -> Result<Vec<Depth2Possibility>, SearchError> {
        let (possibilities, _stats) = self.run_with_stats(board, first_piece, second_piece)?;
        Ok(possibilities)
    }

    pub fn run_with_stats(
        &self,
        board: &BitBoard,
        first_piece: Piece,
        second_piece: Piece,
    ) -> Result<(Vec<Depth2Possibility>, SearchStats), SearchError> {
        self.context.validate()?;
        self.weights.validate()?;

        let mut stats = SearchStats::default();
        if self.keep_top_n == 0 {
            debug!("depth2 search skipped: keep_top_n is 0");
            return Ok((Vec::new(), stats));
        }

        let evaluator = FastEvaluator::new(self.context, self.weights);
        let system = self.context.rotation_system;
        let mut top = TopN::new(self.keep_top_n);

        let first_placements = generate_placements(board, first_piece, system);
        stats.first_placements = first_placements.len();

        'first: for first_placement in first_placements {
            let first = PlacementAnalysis::from_board(board, first_placement);
            let first_clears = LineClearTally::default().with(&first);
            let second_placements = generate_placements(first.board(), second_piece, system);
            trace!(
                "first {} cleared {} lines, {} second placements",
                first_placement.piece(),
                first.cleared_lines(),
                second_placements.len()
            );

            for second_placement in second_placements {
                if self
                    .node_limit
                    .is_some_and(|limit| stats.evaluated_nodes >= limit)
                {
                    stats.truncated = true;
                    break 'first;
                }

                let second = PlacementAnalysis::from_board(first.board(), second_placement);
                let clears = first_clears.with(&second);
                let score = evaluator.score(second.board(), &clears);
                stats.evaluated_nodes += 1;

                if top.would_accept(score) {
                    let second_cleared_lines = second.cleared_lines();
                    top.push(
                        score,
                        Depth2Possibility {
                            first_placement,
                            second_placement,
                            board: second.into_board(),
                            score,
                            first_cleared_lines: first.cleared_lines(),
                            second_cleared_lines,
                        },
                    );
                }
            }
        }

        if stats.truncated {
            warn!(
                "depth2 search truncated after {} nodes (node_limit reached)",
                stats.evaluated_nodes
            );
        }
        debug!(
            "depth2 search {} then {}: {} first placements, {} nodes, kept {}",
            first_piece.kind().as_char(),
            second_piece.kind().as_char(),
            stats.first_placements,
            stats.evaluated_nodes,
            top.len()
        );
        Ok((top.into_sorted_vec(), stats))
    }
}

/// Runs the two-ply search and returns at most `keep_top_n` outcomes, best first.
///
/// An empty result is not an error: it means the first piece has no legal placement,
/// no second placement exists on any intermediate board, or `keep_top_n` is 0.
pub fn search_depth2(
    board: &BitBoard,
    first_piece: Piece,
    second_piece: Piece,
    keep_top_n: usize,
    context: &EvaluationContext,
    weights: &FastEvalWeights,
) -> Result<Vec<Depth2Possibility>, SearchError> {
    Depth2Search::new(*context, *weights)
        .keep_top_n(keep_top_n)
        .run(board, first_piece, second_piece)
}
