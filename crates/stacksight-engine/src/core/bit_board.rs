use std::{
    fmt,
    ops::Range,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{BoardShapeError, core::piece::Piece};

use super::{
    PLAYABLE_HEIGHT, PLAYABLE_WIDTH, SENTINEL_MARGIN_LEFT, SENTINEL_MARGIN_TOP, TOTAL_HEIGHT,
    TOTAL_WIDTH,
};

const WALL_BITS: u16 = 0b11 | (0b11 << (SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH));
const FRAME_BITS: u16 = (1 << TOTAL_WIDTH) - 1;
const FIELD_BITS: u16 = FRAME_BITS & !WALL_BITS;
/// Playable cells shifted down so that bit N is playable column N.
const PACKED_BITS: u16 = (1 << PLAYABLE_WIDTH) - 1;

/// One board row in frame coordinates: bit N is frame column N.
///
/// Columns 0-1 and 12-13 are wall bits and stay set; columns 2-11 are the playable
/// cells; bits 14-15 are unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRow(u16);

impl BitRow {
    pub const EMPTY: Self = Self(WALL_BITS);
    pub const SOLID: Self = Self(FRAME_BITS);

    #[inline]
    #[must_use]
    pub fn is_full(self) -> bool {
        self.0 & FIELD_BITS == FIELD_BITS
    }

    #[inline]
    #[must_use]
    pub fn is_clear(self) -> bool {
        self.0 & FIELD_BITS == 0
    }

    /// Checks a frame column (walls included).
    #[inline]
    #[must_use]
    pub fn contains(self, frame_x: usize) -> bool {
        (self.0 >> frame_x) & 1 == 1
    }

    /// Returns the playable cells packed into the low bits (bit N = playable column N).
    #[inline]
    #[must_use]
    pub fn playable_bits(self) -> u16 {
        (self.0 >> SENTINEL_MARGIN_LEFT) & PACKED_BITS
    }

    #[inline]
    fn overlaps(self, bits: u16) -> bool {
        self.0 & bits != 0
    }

    #[inline]
    fn set(&mut self, bits: u16) {
        self.0 |= bits;
    }
}

/// The playing field as 24 frame rows of 14 bits.
///
/// The playable 10×20 area sits inside a frame: two wall columns on each side, two
/// hidden spawn rows on top and two solid floor rows below. The walls are two cells
/// thick because a piece's 4×4 box may hang up to two empty columns past its cells,
/// so every box that touches a wall still fits in the row.
///
/// ```text
/// frame x   0 1 | 2 ... 11 | 12 13
///           W W | playable | W  W      y = 0..2    hidden
///           W W | playable | W  W      y = 2..22   playable
///           W W   W ... W    W  W      y = 22..24  floor
/// ```
///
/// A piece locked with a cell in the hidden rows means the stack topped out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitBoard {
    rows: [BitRow; TOTAL_HEIGHT],
}

impl fmt::Display for BitBoard {
    /// Comma-separated 4-digit hex rows, top to bottom, walls and hidden rows included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for row in &self.rows {
            write!(f, "{separator}{:04x}", row.0)?;
            separator = ",";
        }
        Ok(())
    }
}

impl FromStr for BitBoard {
    type Err = BoardShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() != TOTAL_HEIGHT {
            return Err(BoardShapeError::RowCount {
                expected: TOTAL_HEIGHT,
                actual: fields.len(),
            });
        }

        let mut board = Self::INITIAL;
        for (row, (slot, text)) in board.rows.iter_mut().zip(fields).enumerate() {
            let bits = u16::from_str_radix(text, 16).map_err(|_| BoardShapeError::InvalidHex {
                row,
                text: text.to_owned(),
            })?;
            let well_formed = if Self::FLOOR_Y_RANGE.contains(&row) {
                bits == FRAME_BITS
            } else {
                bits & !FRAME_BITS == 0 && bits & WALL_BITS == WALL_BITS
            };
            if !well_formed {
                return Err(BoardShapeError::RowBits { row, bits });
            }
            *slot = BitRow(bits);
        }
        Ok(board)
    }
}

impl TryFrom<String> for BitBoard {
    type Error = BoardShapeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitBoard> for String {
    fn from(board: BitBoard) -> Self {
        board.to_string()
    }
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl BitBoard {
    pub const TOTAL_WIDTH: usize = TOTAL_WIDTH;
    pub const TOTAL_HEIGHT: usize = TOTAL_HEIGHT;
    pub const PLAYABLE_WIDTH: usize = PLAYABLE_WIDTH;
    pub const PLAYABLE_HEIGHT: usize = PLAYABLE_HEIGHT;
    /// Frame columns of the playable area.
    pub const PLAYABLE_X_RANGE: Range<usize> =
        SENTINEL_MARGIN_LEFT..SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH;
    /// Frame rows of the playable area.
    pub const PLAYABLE_Y_RANGE: Range<usize> =
        SENTINEL_MARGIN_TOP..SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT;
    const FLOOR_Y_RANGE: Range<usize> = SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT..TOTAL_HEIGHT;

    /// Empty field inside walls and floor.
    pub const INITIAL: Self = {
        let mut rows = [BitRow::EMPTY; TOTAL_HEIGHT];
        let mut y = Self::FLOOR_Y_RANGE.start;
        while y < TOTAL_HEIGHT {
            rows[y] = BitRow::SOLID;
            y += 1;
        }
        Self { rows }
    };

    /// Returns a playable row, 0 being the top of the playable area.
    #[must_use]
    pub fn playable_row(&self, y: usize) -> BitRow {
        self.rows[SENTINEL_MARGIN_TOP + y]
    }

    /// Iterates the playable rows, top to bottom.
    pub fn playable_rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows[Self::PLAYABLE_Y_RANGE].iter().copied()
    }

    /// Checks a cell in playable coordinates (`x` in `0..10`, `y` in `0..20`, top to bottom).
    #[must_use]
    pub fn is_cell_occupied(&self, x: usize, y: usize) -> bool {
        self.playable_row(y).contains(SENTINEL_MARGIN_LEFT + x)
    }

    /// Returns `true` if any cell is locked inside the hidden spawn rows.
    #[must_use]
    pub fn has_hidden_cells(&self) -> bool {
        !self.rows[..SENTINEL_MARGIN_TOP].iter().all(|row| row.is_clear())
    }

    /// Checks the piece against walls, floor and locked cells.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        let PieceAnchor { x, y } = PieceAnchor::of(piece);
        piece
            .mask()
            .into_iter()
            .zip(&self.rows[y..])
            .any(|(mask, row)| row.overlaps(mask << x))
    }

    /// Writes the piece's cells into the board without any collision check.
    pub fn fill_piece(&mut self, piece: Piece) {
        let PieceAnchor { x, y } = PieceAnchor::of(piece);
        for (mask, row) in piece.mask().into_iter().zip(&mut self.rows[y..]) {
            row.set(mask << x);
        }
    }

    /// Removes every full playable row, drops the rows above it, and returns how many
    /// were removed.
    ///
    /// Only the playable area takes part; hidden rows are left as they are.
    pub fn clear_lines(&mut self) -> usize {
        let field = &mut self.rows[Self::PLAYABLE_Y_RANGE];
        let mut write = field.len();
        for read in (0..field.len()).rev() {
            let row = field[read];
            if !row.is_full() {
                write -= 1;
                field[write] = row;
            }
        }
        field[..write].fill(BitRow::EMPTY);
        write
    }

    /// Builds a board from packed playable rows, top to bottom (bit N = column N).
    pub fn from_playable_rows(rows: &[u16]) -> Result<Self, BoardShapeError> {
        check_row_count(rows.len())?;
        let mut board = Self::INITIAL;
        for (row, &bits) in rows.iter().enumerate() {
            if bits & !PACKED_BITS != 0 {
                return Err(BoardShapeError::RowBits { row, bits });
            }
            board.rows[SENTINEL_MARGIN_TOP + row].set(bits << SENTINEL_MARGIN_LEFT);
        }
        Ok(board)
    }

    /// Builds a board from ASCII art, one line per row from top to bottom.
    ///
    /// `'#'` is an occupied cell and `'.'` an empty one. Exactly 20 non-blank lines of
    /// 10 cells are required; whitespace inside a line is ignored.
    pub fn from_ascii(art: &str) -> Result<Self, BoardShapeError> {
        let lines: Vec<&str> = art.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        Self::from_ascii_rows(&lines)
    }

    /// Same as [`BitBoard::from_ascii`] with the rows already split.
    pub fn from_ascii_rows<S>(lines: &[S]) -> Result<Self, BoardShapeError>
    where
        S: AsRef<str>,
    {
        check_row_count(lines.len())?;
        let packed = lines
            .iter()
            .enumerate()
            .map(|(row, line)| pack_ascii_row(row, line.as_ref()))
            .collect::<Result<Vec<u16>, _>>()?;
        Self::from_playable_rows(&packed)
    }

    /// Renders the playable area as ASCII rows, top to bottom.
    #[must_use]
    pub fn to_ascii_rows(&self) -> Vec<String> {
        self.playable_rows()
            .map(|row| {
                (0..PLAYABLE_WIDTH)
                    .map(|x| if (row.playable_bits() >> x) & 1 == 1 { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

struct PieceAnchor {
    x: usize,
    y: usize,
}

impl PieceAnchor {
    fn of(piece: Piece) -> Self {
        let position = piece.position();
        Self {
            x: position.x(),
            y: position.y(),
        }
    }
}

fn check_row_count(actual: usize) -> Result<(), BoardShapeError> {
    if actual == PLAYABLE_HEIGHT {
        Ok(())
    } else {
        Err(BoardShapeError::RowCount {
            expected: PLAYABLE_HEIGHT,
            actual,
        })
    }
}

fn pack_ascii_row(row: usize, line: &str) -> Result<u16, BoardShapeError> {
    let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if cells.len() != PLAYABLE_WIDTH {
        return Err(BoardShapeError::RowWidth {
            row,
            expected: PLAYABLE_WIDTH,
            actual: cells.len(),
        });
    }
    cells
        .into_iter()
        .enumerate()
        .try_fold(0, |bits, (column, cell)| match cell {
            '#' => Ok(bits | (1 << column)),
            '.' => Ok(bits),
            _ => Err(BoardShapeError::InvalidCell { row, column, cell }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(bottom_rows: &[&str]) -> BitBoard {
        let mut rows = vec![".........."; PLAYABLE_HEIGHT - bottom_rows.len()];
        rows.extend_from_slice(bottom_rows);
        BitBoard::from_ascii_rows(&rows).unwrap()
    }

    #[test]
    fn test_initial_frame() {
        let board = BitBoard::INITIAL;
        for (y, row) in board.rows.iter().enumerate() {
            for x in 0..TOTAL_WIDTH {
                let expected = BitBoard::FLOOR_Y_RANGE.contains(&y)
                    || !BitBoard::PLAYABLE_X_RANGE.contains(&x);
                assert_eq!(row.contains(x), expected, "({x}, {y})");
            }
        }
        assert!(!board.has_hidden_cells());
        assert!(board.playable_rows().all(BitRow::is_clear));
    }

    #[test]
    fn test_row_predicates() {
        assert!(BitRow::EMPTY.is_clear());
        assert!(!BitRow::EMPTY.is_full());
        assert!(BitRow::SOLID.is_full());
        assert_eq!(BitRow::SOLID.playable_bits(), PACKED_BITS);

        let board = board(&["#........#"]);
        let row = board.playable_row(PLAYABLE_HEIGHT - 1);
        assert_eq!(row.playable_bits(), 0b10_0000_0001);
        assert!(row.contains(SENTINEL_MARGIN_LEFT));
        assert!(!row.contains(SENTINEL_MARGIN_LEFT + 1));
        assert!(!row.is_full() && !row.is_clear());
    }

    #[test]
    fn test_clear_lines_compacts_stack() {
        let mut cleared = board(&["#.........", "##########", ".#........", "##########"]);
        assert_eq!(cleared.clear_lines(), 2);
        assert_eq!(cleared, board(&["#.........", ".#........"]));

        let mut untouched = board(&["#########.", "##.#######"]);
        assert_eq!(untouched.clear_lines(), 0);
        assert_eq!(untouched, board(&["#########.", "##.#######"]));

        let mut solid = BitBoard::from_playable_rows(&[PACKED_BITS; PLAYABLE_HEIGHT]).unwrap();
        assert_eq!(solid.clear_lines(), PLAYABLE_HEIGHT);
        assert_eq!(solid, BitBoard::INITIAL);
    }

    #[test]
    fn test_hidden_rows_never_clear() {
        let mut board = board(&["##########"]);
        board.rows[0] = BitRow::SOLID;
        assert!(board.has_hidden_cells());

        assert_eq!(board.clear_lines(), 1);
        assert!(board.has_hidden_cells());
        assert!(board.playable_rows().all(BitRow::is_clear));
    }

    #[test]
    fn test_collision_and_fill() {
        let mut board = BitBoard::INITIAL;
        let floor_o = Piece::from_parts(crate::PieceKind::O, 0, 2, 20).unwrap();
        assert!(!board.is_colliding(floor_o));
        assert!(board.is_colliding(floor_o.down().unwrap()));
        assert!(board.is_colliding(floor_o.left().unwrap()));

        board.fill_piece(floor_o);
        assert_eq!(board.to_ascii_rows()[18], "##........");
        assert_eq!(board.to_ascii_rows()[19], "##........");
        assert!(board.is_colliding(floor_o));
    }

    #[test]
    fn test_text_form_round_trip() {
        let mut rows = vec![".........."; PLAYABLE_HEIGHT];
        rows[0] = "##........";
        rows[19] = "....#.....";
        let board = BitBoard::from_ascii_rows(&rows).unwrap();

        let text = board.to_string();
        assert!(text.starts_with("3003,3003,300f,"));
        assert!(text.ends_with(",3043,3fff,3fff"));
        assert_eq!(text.len(), TOTAL_HEIGHT * 5 - 1);
        assert_eq!(text.parse::<BitBoard>().unwrap(), board);

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, format!("\"{text}\""));
        assert_eq!(serde_json::from_str::<BitBoard>(&json).unwrap(), board);
        assert_eq!(board.to_ascii_rows(), rows);
    }

    #[test]
    fn test_text_form_rejects_broken_frame() {
        let with_row = |index: usize, text: &str| {
            let mut rows: Vec<String> =
                BitBoard::INITIAL.to_string().split(',').map(str::to_owned).collect();
            rows[index] = text.to_owned();
            rows.join(",").parse::<BitBoard>()
        };

        assert_eq!(with_row(5, "0000"), Err(BoardShapeError::RowBits { row: 5, bits: 0 }));
        assert_eq!(
            with_row(23, "3003"),
            Err(BoardShapeError::RowBits { row: 23, bits: 0x3003 })
        );
        assert!(matches!(with_row(0, "zz"), Err(BoardShapeError::InvalidHex { row: 0, .. })));
        assert!(matches!(
            "3003,3003".parse::<BitBoard>(),
            Err(BoardShapeError::RowCount { actual: 2, .. })
        ));
    }

    #[test]
    fn test_ascii_shape_errors() {
        assert_eq!(
            BitBoard::from_ascii("..........\n.........."),
            Err(BoardShapeError::RowCount {
                expected: PLAYABLE_HEIGHT,
                actual: 2
            })
        );

        let mut rows = vec![".........."; PLAYABLE_HEIGHT];
        rows[3] = "...........";
        assert_eq!(
            BitBoard::from_ascii_rows(&rows),
            Err(BoardShapeError::RowWidth {
                row: 3,
                expected: PLAYABLE_WIDTH,
                actual: 11
            })
        );

        rows[3] = "....x.....";
        assert_eq!(
            BitBoard::from_ascii_rows(&rows),
            Err(BoardShapeError::InvalidCell {
                row: 3,
                column: 4,
                cell: 'x'
            })
        );
    }

    #[test]
    fn test_playable_rows_reject_wall_bits() {
        let mut rows = [0u16; PLAYABLE_HEIGHT];
        rows[19] = 0b10_0000_0001;
        let board = BitBoard::from_playable_rows(&rows).unwrap();
        assert!(board.is_cell_occupied(0, 19));
        assert!(board.is_cell_occupied(9, 19));
        assert!(!board.is_cell_occupied(1, 19));

        rows[0] = 1 << PLAYABLE_WIDTH;
        assert_eq!(
            BitBoard::from_playable_rows(&rows),
            Err(BoardShapeError::RowBits {
                row: 0,
                bits: 1 << PLAYABLE_WIDTH
            })
        );
        assert!(matches!(
            BitBoard::from_playable_rows(&rows[..3]),
            Err(BoardShapeError::RowCount { actual: 3, .. })
        ));
    }
}
