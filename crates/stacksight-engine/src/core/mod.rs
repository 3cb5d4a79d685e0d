pub use self::{bit_board::*, piece::*, placement::*};

pub(crate) mod bit_board;
pub(crate) mod piece;
pub(crate) mod placement;

const SENTINEL_MARGIN_LEFT: usize = 2;
const SENTINEL_MARGIN_RIGHT: usize = 2;
const SENTINEL_MARGIN_TOP: usize = 2;
const SENTINEL_MARGIN_BOTTOM: usize = 2;

const PLAYABLE_WIDTH: usize = 10;
const PLAYABLE_HEIGHT: usize = 20;

const TOTAL_WIDTH: usize = SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH + SENTINEL_MARGIN_RIGHT;
const TOTAL_HEIGHT: usize = SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT + SENTINEL_MARGIN_BOTTOM;
