use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::PieceStateError;

use super::bit_board::BitBoard;

/// A tetromino state: kind, rotation and the anchor of its 4×4 box.
///
/// Pieces are `Copy` values; every move returns a new piece and never checks the
/// board except where the method takes one.
///
/// # Coordinate System
///
/// - The anchor is the top-left corner of the 4×4 box in the board frame, walls and
///   hidden rows included, so playable column 0 is frame `x = 2`
/// - Rotation 0 is the spawn orientation; each step is a quarter turn clockwise
///
/// # Text Form
///
/// `"kind#rotation@x,y"` (e.g. `"S#1@4,18"`). A bare kind (`"T"`) parses as the
/// spawn state of that kind.
///
/// ```
/// use stacksight_engine::{Piece, PieceKind};
///
/// let spawned: Piece = "T".parse().unwrap();
/// assert_eq!(spawned, Piece::new(PieceKind::T));
///
/// let turned = spawned.right().unwrap().rotated_right();
/// assert_eq!(turned.to_string(), "T#1@6,0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let PiecePosition { x, y } = self.position;
        write!(f, "{}#{}@{x},{y}", self.kind, self.rotation.as_u8())
    }
}

impl FromStr for Piece {
    type Err = PieceStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PieceStateError::Format(s.to_owned());
        let number = |text: &str| text.parse::<u8>().map_err(|_| malformed());

        let (kind_text, state) = match s.split_once('#') {
            Some((kind_text, state)) => (kind_text, Some(state)),
            None => (s, None),
        };
        let mut chars = kind_text.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c).ok_or(PieceStateError::Kind(c))?,
            _ => return Err(malformed()),
        };

        let Some(state) = state else {
            return Ok(Self::new(kind));
        };
        let (rotation, anchor) = state.split_once('@').ok_or_else(malformed)?;
        let (x, y) = anchor.split_once(',').ok_or_else(malformed)?;
        Self::from_parts(kind, number(rotation)?, number(x)?, number(y)?)
    }
}

impl TryFrom<String> for Piece {
    type Error = PieceStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> Self {
        piece.to_string()
    }
}

impl Piece {
    /// Returns the spawn state of the given kind.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN,
            rotation: PieceRotation::default(),
            kind,
        }
    }

    /// Builds a piece from raw parts, rejecting rotations outside the closed set and
    /// states with any cell outside the board frame.
    pub fn from_parts(kind: PieceKind, rotation: u8, x: u8, y: u8) -> Result<Self, PieceStateError> {
        let piece = Self {
            position: PiecePosition::try_new(x, y)?,
            rotation: PieceRotation::try_from(rotation)?,
            kind,
        };
        if !piece.fits_frame() {
            return Err(PieceStateError::Position { x, y });
        }
        Ok(piece)
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub(crate) fn mask(&self) -> PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Returns the occupied cells in the board frame as `(x, y)`.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (x0, y0) = (self.position.x(), self.position.y());
        self.kind
            .occupied_positions(self.rotation)
            .map(move |(dx, dy)| (x0 + dx, y0 + dy))
    }

    /// Returns the identity of the occupied cells, independent of rotation and anchor.
    ///
    /// Two pieces with equal footprints produce identical boards when locked.
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        let mask = self.mask();
        let skipped = mask.iter().take_while(|row| **row == 0).count();
        let mut rows = [0; 4];
        for (dst, src) in rows.iter_mut().zip(&mask[skipped..]) {
            *dst = src << self.position.x;
        }
        Footprint {
            top: usize::from(self.position.y) + skipped,
            rows,
        }
    }

    /// Returns `true` if every cell lies inside the board frame.
    fn fits_frame(&self) -> bool {
        let PiecePosition { x, y } = self.position;
        self.mask().into_iter().enumerate().all(|(dy, row)| {
            row == 0
                || (usize::from(y) + dy < BitBoard::TOTAL_HEIGHT
                    && (u32::from(row) << x) < (1 << BitBoard::TOTAL_WIDTH))
        })
    }

    fn shifted(&self, dx: i8, dy: i8) -> Option<Self> {
        let position = self.position.shifted(dx, dy)?;
        Some(Self { position, ..*self }).filter(Self::fits_frame)
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn up(&self) -> Option<Self> {
        self.shifted(0, -1)
    }

    #[must_use]
    pub fn down(&self) -> Option<Self> {
        self.shifted(0, 1)
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.turned(1),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_left(&self) -> Self {
        Self {
            rotation: self.rotation.turned(3),
            ..*self
        }
    }

    /// Rotates the piece under the given rotation system.
    ///
    /// Returns `None` if the rotated piece collides and no kick resolves it.
    #[must_use]
    pub fn rotated_with(
        &self,
        system: RotationSystem,
        direction: RotationDirection,
        board: &BitBoard,
    ) -> Option<Self> {
        let turned = match direction {
            RotationDirection::Clockwise => self.rotated_right(),
            RotationDirection::CounterClockwise => self.rotated_left(),
        };
        let candidates: &[(i8, i8)] = match system {
            RotationSystem::Nes => &[(0, 0)],
            RotationSystem::SimpleKick => &KICK_OFFSETS,
        };
        candidates
            .iter()
            .filter_map(|&(dx, dy)| turned.shifted(dx, dy))
            .find(|candidate| !board.is_colliding(*candidate))
    }

    /// Moves the piece straight down until one more row would collide.
    #[must_use]
    pub fn dropped(&self, board: &BitBoard) -> Self {
        let mut piece = *self;
        while let Some(below) = piece.down().filter(|p| !board.is_colliding(*p)) {
            piece = below;
        }
        piece
    }
}

/// In place first, then up, right, down, left.
const KICK_OFFSETS: [(i8, i8); 5] = [(0, 0), (0, -1), (1, 0), (0, 1), (-1, 0)];

/// Rotation rule set used while searching for reachable placements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationSystem {
    /// A rotation that collides fails; no positional adjustment.
    Nes,
    /// A colliding rotation tries the offsets up, right, down, left and takes the first free one.
    #[default]
    SimpleKick,
}

impl RotationSystem {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RotationSystem::Nes => "nes",
            RotationSystem::SimpleKick => "simple_kick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Identity of the cells a locked piece occupies.
///
/// `rows[0]` is the first non-empty row of the piece, at board row `top`; each row
/// holds the cells already shifted into board-frame bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Footprint {
    top: usize,
    rows: [u16; 4],
}

/// Anchor of a piece's 4×4 box in the board frame; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: u8,
    y: u8,
}

impl PiecePosition {
    pub const SPAWN: Self = Self { x: 5, y: 0 };

    pub fn try_new(x: u8, y: u8) -> Result<Self, PieceStateError> {
        if usize::from(x) < BitBoard::TOTAL_WIDTH && usize::from(y) < BitBoard::TOTAL_HEIGHT {
            Ok(Self { x, y })
        } else {
            Err(PieceStateError::Position { x, y })
        }
    }

    #[must_use]
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    /// Moves the anchor, or `None` when it would leave the board frame.
    #[must_use]
    pub fn shifted(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Self::try_new(x, y).ok()
    }
}

/// Rotation state of a piece: `0` spawn, `1` 90° clockwise, `2` 180°, `3` 270° clockwise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceRotation(u8);

impl TryFrom<u8> for PieceRotation {
    type Error = PieceStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 4 {
            Ok(Self(value))
        } else {
            Err(PieceStateError::Rotation(value))
        }
    }
}

impl PieceRotation {
    /// Applies `quarter_turns` clockwise quarter turns, wrapping modulo 4.
    #[must_use]
    pub fn turned(self, quarter_turns: u8) -> Self {
        Self((self.0 + quarter_turns % 4) % 4)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

/// The closed set of piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

impl PieceKind {
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    const CHARS: [char; Self::LEN] = ['I', 'O', 'S', 'Z', 'J', 'L', 'T'];

    pub(crate) fn mask(self, rotation: PieceRotation) -> PieceMask {
        PIECE_MASKS[self as usize][usize::from(rotation.as_u8())]
    }

    /// Returns the occupied `(dx, dy)` offsets inside the 4×4 box.
    pub fn occupied_positions(self, rotation: PieceRotation) -> impl Iterator<Item = (usize, usize)> {
        self.mask(rotation)
            .into_iter()
            .enumerate()
            .flat_map(|(dy, row)| (0..4).filter(move |dx| (row >> dx) & 1 == 1).map(move |dx| (dx, dy)))
    }

    /// ```
    /// use stacksight_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::L.as_char(), 'L');
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('l'), None);
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        Self::CHARS[self as usize]
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        let mut i = 0;
        while i < Self::LEN {
            if Self::CHARS[i] == c {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }
}

/// One `u16` per row of the 4×4 box; bit N is column N of the box.
pub(crate) type PieceMask = [u16; 4];

/// Builds the four rotation states from the spawn cells.
///
/// Cells turn clockwise inside a `size`×`size` box: `(x, y)` becomes `(size - 1 - y, x)`.
const fn rotation_masks(size: u8, spawn_cells: [(u8, u8); 4]) -> [PieceMask; 4] {
    let mut masks = [[0; 4]; 4];
    let mut cells = spawn_cells;
    let mut rotation = 0;
    while rotation < 4 {
        let mut i = 0;
        while i < cells.len() {
            let (x, y) = cells[i];
            masks[rotation][y as usize] |= 1 << x;
            cells[i] = (size - 1 - y, x);
            i += 1;
        }
        rotation += 1;
    }
    masks
}

#[rustfmt::skip]
const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = [
    rotation_masks(4, [(0, 1), (1, 1), (2, 1), (3, 1)]), // I
    rotation_masks(2, [(0, 0), (1, 0), (0, 1), (1, 1)]), // O
    rotation_masks(3, [(1, 0), (2, 0), (0, 1), (1, 1)]), // S
    rotation_masks(3, [(0, 0), (1, 0), (1, 1), (2, 1)]), // Z
    rotation_masks(3, [(0, 0), (0, 1), (1, 1), (2, 1)]), // J
    rotation_masks(3, [(2, 0), (0, 1), (1, 1), (2, 1)]), // L
    rotation_masks(3, [(1, 0), (0, 1), (1, 1), (2, 1)]), // T
];
