use serde::Serialize;
use stacksight_engine::Placement;
use stacksight_evaluator::board_analysis::BoardAnalysis;
use stacksight_search::{Depth2Possibility, SearchStats};

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub key: String,
    pub stats: SearchStats,
    pub outcomes: Vec<OutcomeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    pub rank: usize,
    pub score: f32,
    pub first_placement: Placement,
    pub second_placement: Placement,
    pub first_cleared_lines: usize,
    pub second_cleared_lines: usize,
    /// Resulting playable area, top to bottom.
    pub board: Vec<String>,
    pub parity: i32,
}

impl OutcomeReport {
    pub fn new(rank: usize, possibility: &Depth2Possibility) -> Self {
        Self {
            rank,
            score: possibility.score,
            first_placement: possibility.first_placement,
            second_placement: possibility.second_placement,
            first_cleared_lines: possibility.first_cleared_lines,
            second_cleared_lines: possibility.second_cleared_lines,
            board: possibility.board.to_ascii_rows(),
            parity: BoardAnalysis::new(&possibility.board).checkerboard_parity(),
        }
    }
}
