//! The result of locking one placement, and line clears summed over plies.

use stacksight_engine::{BitBoard, Placement, PlacementKind};

/// Rows cleared by a single four-line clear.
pub const TETRIS_LINES: usize = 4;

/// Points for clearing 0 to 4 rows at once at level 0.
///
/// Each level above 0 multiplies the award: a clear at level `l` is worth
/// `CLEAR_POINTS[lines] * (l + 1)`.
pub const CLEAR_POINTS: [u32; TETRIS_LINES + 1] = [0, 40, 100, 300, 1200];

/// A placement locked onto a board, with the board after line clears.
#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    placement: Placement,
    board: BitBoard,
    cleared_lines: usize,
}

impl PlacementAnalysis {
    /// Locks `placement` onto a copy of `before_placement` and clears full rows.
    #[must_use]
    pub fn from_board(before_placement: &BitBoard, placement: Placement) -> Self {
        let (board, cleared_lines) = placement.apply(before_placement);
        Self {
            placement,
            board,
            cleared_lines,
        }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Board after the piece is locked and full rows are removed.
    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> BitBoard {
        self.board
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }
}

/// Line clears accumulated over the plies that led to a board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineClearTally {
    /// Total cleared rows.
    pub lines: u32,
    /// Number of four-line clears.
    pub tetrises: u32,
    /// Rows removed by clears of one to three lines.
    pub burned_lines: u32,
    /// Spin placements that cleared at least one row.
    pub spin_clears: u32,
    /// Sum of [`CLEAR_POINTS`] over the clears, before the level multiplier.
    pub base_points: u32,
}

impl LineClearTally {
    pub fn record(&mut self, cleared_lines: usize, kind: PlacementKind) {
        if cleared_lines == 0 {
            return;
        }
        // at most four rows per placement
        let lines = u32::try_from(cleared_lines).unwrap_or(u32::MAX);
        self.lines += lines;
        if cleared_lines >= TETRIS_LINES {
            self.tetrises += 1;
        } else {
            self.burned_lines += lines;
        }
        if kind.is_spin() {
            self.spin_clears += 1;
        }
        self.base_points += CLEAR_POINTS[cleared_lines.min(TETRIS_LINES)];
    }

    /// Points the clears earn at `level`.
    #[must_use]
    pub fn points_at_level(&self, level: u8) -> u32 {
        self.base_points.saturating_mul(u32::from(level) + 1)
    }

    /// Returns a copy with `analysis` recorded.
    #[must_use]
    pub fn with(mut self, analysis: &PlacementAnalysis) -> Self {
        self.record(analysis.cleared_lines(), analysis.placement().kind());
        self
    }
}

#[cfg(test)]
mod tests {
    use stacksight_engine::{Piece, PieceKind};

    use super::*;

    #[test]
    fn test_from_board_clears_single_gap() {
        let board = BitBoard::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #########.
            ",
        )
        .unwrap();
        // vertical I in the last column
        let piece = Piece::from_parts(PieceKind::I, 1, 9, 18).unwrap();
        let placement = Placement::new(piece, PlacementKind::Drop);

        let analysis = PlacementAnalysis::from_board(&board, placement);
        assert_eq!(analysis.cleared_lines(), 1);
        assert_eq!(analysis.placement(), placement);
        let rows = analysis.board().to_ascii_rows();
        assert_eq!(rows[19], ".........#");
        assert_eq!(rows[17], ".........#");
        assert_eq!(rows[16], "..........");
    }

    #[test]
    fn test_tally_records_clear_kinds() {
        let mut tally = LineClearTally::default();
        tally.record(0, PlacementKind::Spin);
        assert_eq!(tally, LineClearTally::default());

        tally.record(2, PlacementKind::Drop);
        tally.record(4, PlacementKind::Tuck);
        tally.record(1, PlacementKind::Spin);
        assert_eq!(
            tally,
            LineClearTally {
                lines: 7,
                tetrises: 1,
                burned_lines: 3,
                spin_clears: 1,
                base_points: 100 + 1200 + 40,
            }
        );
    }

    #[test]
    fn test_points_scale_with_level() {
        let mut tally = LineClearTally::default();
        assert_eq!(tally.points_at_level(0), 0);

        tally.record(4, PlacementKind::Drop);
        assert_eq!(tally.points_at_level(0), 1200);
        assert_eq!(tally.points_at_level(18), 1200 * 19);

        tally.record(1, PlacementKind::Drop);
        assert_eq!(tally.points_at_level(9), (1200 + 40) * 10);
        assert_eq!(tally.points_at_level(u8::MAX), 1240 * 256);
    }
}
