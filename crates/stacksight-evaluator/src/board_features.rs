//! Feature vector consumed by the fast evaluator.
//!
//! Every feature is a non-negative integer measured on the final board or on the line
//! clears that produced it. Rule-dependent features (`burn`, `spin_clear`, `danger`) are
//! gated or scaled by the [`EvaluationContext`] here, so the evaluator itself is a plain dot product.
//! An empty board with no clears has every feature at zero.

use stacksight_engine::BitBoard;

use crate::{
    board_analysis::BoardAnalysis,
    context::{ClearRequirement, EvaluationContext},
    placement_analysis::LineClearTally,
    weights::FastEvalWeights,
};

/// Raw feature values, one per [`FastEvalWeights`] coefficient.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BoardFeatures {
    pub aggregate_height: u32,
    pub max_height: u32,
    pub bumpiness: u32,
    pub roughness: u32,
    pub holes: u32,
    pub hole_depth: u32,
    pub row_transitions: u32,
    pub column_transitions: u32,
    pub well_depth: u32,
    pub edge_well: u32,
    pub line_clear: u32,
    pub tetris: u32,
    pub burn: u32,
    pub spin_clear: u32,
    pub danger: u32,
    pub top_out: u32,
    /// Clear points at the context's level, summed over plies.
    pub clear_points: u32,
}

impl BoardFeatures {
    #[must_use]
    pub fn extract(
        board: &BitBoard,
        clears: &LineClearTally,
        context: &EvaluationContext,
    ) -> Self {
        let analysis = BoardAnalysis::new(board);
        let max_height = analysis.max_height();
        let topped_out =
            usize::from(analysis.spawn_column_max_height()) >= BitBoard::PLAYABLE_HEIGHT;

        Self {
            aggregate_height: analysis.total_height(),
            max_height: u32::from(max_height),
            bumpiness: analysis.surface_bumpiness(),
            roughness: analysis.surface_roughness(),
            holes: analysis.num_holes(),
            hole_depth: analysis.sum_of_hole_depth(),
            row_transitions: analysis.row_transitions(),
            column_transitions: analysis.column_transitions(),
            well_depth: analysis.sum_of_deep_well_depth(),
            edge_well: u32::from(analysis.edge_well_depth()),
            line_clear: clears.lines,
            tetris: clears.tetrises,
            burn: match context.clear_requirement {
                ClearRequirement::AnyLines => 0,
                ClearRequirement::TetrisOnly => clears.burned_lines,
            },
            spin_clear: if context.reward_spin_clears {
                clears.spin_clears
            } else {
                0
            },
            danger: u32::from(max_height.saturating_sub(context.danger_zone_height)),
            top_out: u32::from(topped_out),
            clear_points: clears.points_at_level(context.level),
        }
    }

    /// Returns the features in [`FastEvalWeights::NAMES`] order.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_array(&self) -> [f32; FastEvalWeights::COUNT] {
        [
            self.aggregate_height,
            self.max_height,
            self.bumpiness,
            self.roughness,
            self.holes,
            self.hole_depth,
            self.row_transitions,
            self.column_transitions,
            self.well_depth,
            self.edge_well,
            self.line_clear,
            self.tetris,
            self.burn,
            self.spin_clear,
            self.danger,
            self.top_out,
            self.clear_points,
        ]
        .map(|value| value as f32)
    }
}
