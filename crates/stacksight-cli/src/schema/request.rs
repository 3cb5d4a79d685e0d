use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use stacksight_engine::{BitBoard, Piece};
use stacksight_evaluator::{EvaluationContext, FastEvalWeights};
use stacksight_search::{Depth2Search, LookupKey};

/// Input document shared by the `search` and `encode` commands.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchRequest {
    /// 20 rows of 10 cells, top to bottom, `#` occupied and `.` empty.
    pub board: Vec<String>,
    /// `"T"` for the spawn state, or a full `"T#0@5,0"` state.
    pub first_piece: Piece,
    pub second_piece: Piece,
    /// Zero or negative asks for an empty result.
    pub keep_top_n: i64,
    #[serde(default)]
    pub context: EvaluationContext,
    #[serde(default)]
    pub weights: FastEvalWeights,
    #[serde(default)]
    pub node_limit: Option<usize>,
}

impl SearchRequest {
    pub fn parse_board(&self) -> anyhow::Result<BitBoard> {
        BitBoard::from_ascii_rows(&self.board).context("Invalid board in request")
    }

    pub fn keep_top_n(&self) -> usize {
        usize::try_from(self.keep_top_n.max(0)).unwrap_or(usize::MAX)
    }

    pub fn to_search(&self) -> Depth2Search {
        Depth2Search::new(self.context, self.weights)
            .keep_top_n(self.keep_top_n())
            .node_limit(self.node_limit)
    }

    pub fn lookup_key<'a>(&'a self, board: &'a BitBoard) -> LookupKey<'a> {
        LookupKey {
            board,
            first_piece: self.first_piece,
            second_piece: self.second_piece,
            keep_top_n: self.keep_top_n(),
            context: &self.context,
            weights: &self.weights,
        }
    }
}
