//! Lazily computed shape metrics of a board.
//!
//! [`BoardAnalysis`] borrows a board and computes each metric on first access, caching
//! it for later reads. Several metrics build on others (holes on column heights, well
//! sums on per-column well depths), so a caller that only needs a few of them pays
//! only for those.
//!
//! Heights are measured from the floor: an empty column has height 0, a column whose
//! top cell sits in the first playable row has height 20.

use std::{cell::OnceCell, iter};

use stacksight_engine::BitBoard;

const WIDTH: usize = BitBoard::PLAYABLE_WIDTH;
const HEIGHT: usize = BitBoard::PLAYABLE_HEIGHT;

/// Columns a freshly spawned piece occupies.
const SPAWN_COLUMNS: std::ops::RangeInclusive<usize> = 3..=6;

/// Wells up to this depth are ignored by [`BoardAnalysis::sum_of_deep_well_depth`].
const SHALLOW_WELL_DEPTH: u8 = 1;

#[derive(Debug)]
pub struct BoardAnalysis<'a> {
    board: &'a BitBoard,
    column_heights: OnceCell<[u8; WIDTH]>,
    column_occupied_cells: OnceCell<[u8; WIDTH]>,
    column_well_depths: OnceCell<[u8; WIDTH]>,
    num_holes: OnceCell<u32>,
    sum_of_hole_depth: OnceCell<u32>,
    row_transitions: OnceCell<u32>,
    column_transitions: OnceCell<u32>,
}

impl<'a> BoardAnalysis<'a> {
    #[must_use]
    pub fn new(board: &'a BitBoard) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            column_well_depths: OnceCell::new(),
            num_holes: OnceCell::new(),
            sum_of_hole_depth: OnceCell::new(),
            row_transitions: OnceCell::new(),
            column_transitions: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &'a BitBoard {
        self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8; WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut heights = [0; WIDTH];
            let mut remaining = (1u16 << WIDTH) - 1;
            for (y, row) in self.board.playable_rows().enumerate() {
                let tops = row.playable_bits() & remaining;
                if tops == 0 {
                    continue;
                }
                for (x, h) in heights.iter_mut().enumerate() {
                    if tops & (1 << x) != 0 {
                        *h = to_u8(HEIGHT - y);
                    }
                }
                remaining &= !tops;
                if remaining == 0 {
                    break;
                }
            }
            heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut occupied = [0; WIDTH];
            for row in self.board.playable_rows() {
                let bits = row.playable_bits();
                for (x, o) in occupied.iter_mut().enumerate() {
                    *o += u8::from(bits & (1 << x) != 0);
                }
            }
            occupied
        })
    }

    /// Depth of the well at each column, walls counting as infinitely tall.
    #[must_use]
    pub fn column_well_depths(&self) -> &[u8; WIDTH] {
        self.column_well_depths.get_or_init(|| {
            let h = self.column_heights();
            let mut depths = [0; WIDTH];
            for (x, depth) in depths.iter_mut().enumerate() {
                let left = if x == 0 { u8::MAX } else { h[x - 1] };
                let right = if x == WIDTH - 1 { u8::MAX } else { h[x + 1] };
                if h[x] < left && h[x] < right {
                    *depth = u8::min(left, right) - h[x];
                }
            }
            depths
        })
    }

    #[must_use]
    pub fn max_height(&self) -> u8 {
        self.column_heights().iter().copied().max().unwrap_or(0)
    }

    /// Tallest column among those a spawning piece occupies.
    #[must_use]
    pub fn spawn_column_max_height(&self) -> u8 {
        self.column_heights()[SPAWN_COLUMNS]
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn total_height(&self) -> u32 {
        self.column_heights().iter().copied().map(u32::from).sum()
    }

    /// Empty cells below the top of their column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Sum over holes of the number of cells stacked above each one.
    #[must_use]
    pub fn sum_of_hole_depth(&self) -> u32 {
        *self.sum_of_hole_depth.get_or_init(|| {
            let mut depth_sum = 0;
            let mut depths = [0u32; WIDTH];
            for row in self.board.playable_rows() {
                let bits = row.playable_bits();
                for (x, depth) in depths.iter_mut().enumerate() {
                    if bits & (1 << x) != 0 {
                        *depth += 1;
                    } else if *depth > 0 {
                        depth_sum += *depth;
                        *depth += 1;
                    }
                }
            }
            depth_sum
        })
    }

    /// Occupied/empty changes between horizontally adjacent playable cells.
    #[must_use]
    pub fn row_transitions(&self) -> u32 {
        *self.row_transitions.get_or_init(|| {
            const PAIRS_MASK: u16 = (1 << (WIDTH - 1)) - 1;
            self.board
                .playable_rows()
                .map(|row| {
                    let bits = row.playable_bits();
                    ((bits ^ (bits >> 1)) & PAIRS_MASK).count_ones()
                })
                .sum()
        })
    }

    /// Occupied/empty changes between vertically adjacent playable cells.
    #[must_use]
    pub fn column_transitions(&self) -> u32 {
        *self.column_transitions.get_or_init(|| {
            let rows = self.board.playable_rows().map(|row| row.playable_bits());
            let below = self.board.playable_rows().skip(1).map(|row| row.playable_bits());
            iter::zip(rows, below)
                .map(|(upper, lower)| (upper ^ lower).count_ones())
                .sum()
        })
    }

    /// Sum of height differences between adjacent columns.
    #[must_use]
    pub fn surface_bumpiness(&self) -> u32 {
        self.column_heights()
            .windows(2)
            .map(|w| u32::from(w[0].abs_diff(w[1])))
            .sum()
    }

    /// Sum of second differences of the column heights.
    #[must_use]
    pub fn surface_roughness(&self) -> u32 {
        self.column_heights()
            .windows(3)
            .map(|w| {
                let left = i32::from(w[0]);
                let mid = i32::from(w[1]);
                let right = i32::from(w[2]);
                ((right - mid) - (mid - left)).unsigned_abs()
            })
            .sum()
    }

    #[must_use]
    pub fn sum_of_deep_well_depth(&self) -> u32 {
        self.column_well_depths()
            .iter()
            .filter(|depth| **depth > SHALLOW_WELL_DEPTH)
            .map(|depth| u32::from(depth - SHALLOW_WELL_DEPTH))
            .sum()
    }

    /// Deeper of the two wells against the side walls.
    #[must_use]
    pub fn edge_well_depth(&self) -> u8 {
        let depths = self.column_well_depths();
        u8::max(depths[0], depths[WIDTH - 1])
    }

    /// Checkerboard balance of the filled cells.
    ///
    /// The top-left playable cell and every cell an even step away from it count +1,
    /// the others count -1. Not a scoring feature; reported alongside outcomes.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn checkerboard_parity(&self) -> i32 {
        const EVEN_COLUMNS: u16 = 0b01_0101_0101;
        const ODD_COLUMNS: u16 = 0b10_1010_1010;
        self.board
            .playable_rows()
            .enumerate()
            .map(|(y, row)| {
                let bits = row.playable_bits();
                let (plus, minus) = if y % 2 == 0 {
                    (EVEN_COLUMNS, ODD_COLUMNS)
                } else {
                    (ODD_COLUMNS, EVEN_COLUMNS)
                };
                (bits & plus).count_ones() as i32 - (bits & minus).count_ones() as i32
            })
            .sum()
    }
}

#[expect(clippy::cast_possible_truncation)]
fn to_u8(value: usize) -> u8 {
    debug_assert!(value <= HEIGHT);
    value as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    mod test_boards {
        use super::*;

        pub fn empty() -> BitBoard {
            BitBoard::INITIAL
        }

        pub fn flat() -> BitBoard {
            BitBoard::from_ascii(
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
                #########.
                #########.
                ",
            )
            .unwrap()
        }

        pub fn staircase() -> BitBoard {
            BitBoard::from_ascii(
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
                #.........
                ##........
                ###.......
                ####......
                #####.....
                ",
            )
            .unwrap()
        }

        pub fn single_hole() -> BitBoard {
            BitBoard::from_ascii(
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
                #.........
                ..........
                #.........
                ",
            )
            .unwrap()
        }

        pub fn well() -> BitBoard {
            BitBoard::from_ascii(
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
                #.#.......
                ###.......
                ###.......
                ",
            )
            .unwrap()
        }

        pub fn edge_well_ready() -> BitBoard {
            BitBoard::from_ascii(
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
                .#........
                .#........
                .#........
                .#........
                ##........
                ",
            )
            .unwrap()
        }

        pub fn alternating() -> BitBoard {
            BitBoard::from_ascii(
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
                #.#.#.#.#.
                ",
            )
            .unwrap()
        }
    }

    #[test]
    fn test_basic_metrics_on_common_boards() {
        // (name, board, total_height, max_height, holes, bumpiness, roughness)
        let test_cases = [
            ("empty", test_boards::empty(), 0, 0, 0, 0, 0),
            ("flat", test_boards::flat(), 18, 2, 0, 2, 2),
            ("staircase", test_boards::staircase(), 15, 5, 0, 5, 1),
            ("single_hole", test_boards::single_hole(), 3, 3, 1, 3, 3),
            ("well", test_boards::well(), 8, 3, 0, 5, 9),
        ];

        for (name, board, total, max, holes, bumpiness, roughness) in test_cases {
            let analysis = BoardAnalysis::new(&board);
            assert_eq!(analysis.total_height(), total, "{name}: total_height");
            assert_eq!(analysis.max_height(), max, "{name}: max_height");
            assert_eq!(analysis.num_holes(), holes, "{name}: num_holes");
            assert_eq!(
                analysis.surface_bumpiness(),
                bumpiness,
                "{name}: surface_bumpiness"
            );
            assert_eq!(
                analysis.surface_roughness(),
                roughness,
                "{name}: surface_roughness"
            );
        }
    }

    #[test]
    fn test_checkerboard_parity() {
        let test_cases = [
            ("empty", test_boards::empty(), 0),
            ("flat", test_boards::flat(), 0),
            ("staircase", test_boards::staircase(), -3),
            ("alternating", test_boards::alternating(), -5),
        ];
        for (name, board, parity) in test_cases {
            let analysis = BoardAnalysis::new(&board);
            assert_eq!(analysis.checkerboard_parity(), parity, "{name}");
        }
    }

    #[test]
    fn test_column_heights_and_occupancy() {
        let board = test_boards::staircase();
        let analysis = BoardAnalysis::new(&board);
        assert_eq!(analysis.column_heights(), &[5, 4, 3, 2, 1, 0, 0, 0, 0, 0]);
        assert_eq!(
            analysis.column_occupied_cells(),
            &[5, 4, 3, 2, 1, 0, 0, 0, 0, 0]
        );

        let board = test_boards::single_hole();
        let analysis = BoardAnalysis::new(&board);
        assert_eq!(analysis.column_heights()[0], 3);
        assert_eq!(analysis.column_occupied_cells()[0], 2);
    }

    #[test]
    fn test_sum_of_hole_depth() {
        let stacked_holes = BitBoard::from_ascii(
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
            #.........
            ..........
            #.........
            ..........
            #.........
            ",
        )
        .unwrap();

        let test_cases = [
            ("empty", test_boards::empty(), 0),
            ("flat", test_boards::flat(), 0),
            ("single_hole", test_boards::single_hole(), 1),
            // first hole under one cell, second under three (two cells and a hole)
            ("stacked_holes", stacked_holes, 4),
        ];

        for (name, board, expected) in test_cases {
            let analysis = BoardAnalysis::new(&board);
            assert_eq!(analysis.sum_of_hole_depth(), expected, "{name}");
        }
    }

    #[test]
    fn test_transitions() {
        // (name, board, row_transitions, column_transitions)
        let test_cases = [
            ("empty", test_boards::empty(), 0, 0),
            ("flat", test_boards::flat(), 2, 9),
            ("staircase", test_boards::staircase(), 5, 5),
            ("single_hole", test_boards::single_hole(), 2, 3),
            ("alternating", test_boards::alternating(), 9, 5),
        ];

        for (name, board, row, column) in test_cases {
            let analysis = BoardAnalysis::new(&board);
            assert_eq!(analysis.row_transitions(), row, "{name}: row");
            assert_eq!(analysis.column_transitions(), column, "{name}: column");
        }
    }

    #[test]
    fn test_wells() {
        let board = test_boards::well();
        let analysis = BoardAnalysis::new(&board);
        assert_eq!(&analysis.column_well_depths()[..3], &[0, 1, 0]);
        assert_eq!(analysis.sum_of_deep_well_depth(), 0);

        let board = test_boards::edge_well_ready();
        let analysis = BoardAnalysis::new(&board);
        assert_eq!(analysis.column_well_depths()[0], 4);
        assert_eq!(analysis.edge_well_depth(), 4);
        // right edge is level with its neighbour
        assert_eq!(analysis.column_well_depths()[WIDTH - 1], 0);
        assert_eq!(analysis.sum_of_deep_well_depth(), 3);

        let board = test_boards::flat();
        let analysis = BoardAnalysis::new(&board);
        assert_eq!(analysis.edge_well_depth(), 2);
    }

    #[test]
    fn test_spawn_column_max_height() {
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
            #.........
            #..#......
            #..##.....
            #..###....
            #..####...
            ##.#####..
            ",
        )
        .unwrap();

        let analysis = BoardAnalysis::new(&board);
        assert_eq!(analysis.max_height(), 6);
        assert_eq!(analysis.spawn_column_max_height(), 5);
    }

    #[test]
    fn test_invariants() {
        let boards = [
            test_boards::empty(),
            test_boards::flat(),
            test_boards::staircase(),
            test_boards::single_hole(),
            test_boards::well(),
            test_boards::edge_well_ready(),
        ];

        for board in &boards {
            let analysis = BoardAnalysis::new(board);
            let heights = analysis.column_heights();

            assert!(u32::from(analysis.max_height()) <= analysis.total_height());
            assert!(analysis.spawn_column_max_height() <= analysis.max_height());
            assert!(analysis.num_holes() <= analysis.sum_of_hole_depth());
            assert_eq!(
                analysis.total_height(),
                heights.iter().copied().map(u32::from).sum::<u32>()
            );
            let max_well = *analysis.column_well_depths().iter().max().unwrap();
            assert!(analysis.edge_well_depth() <= max_well);
        }
    }
}
