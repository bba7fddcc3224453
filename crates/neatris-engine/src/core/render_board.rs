use std::fmt;

use super::{
    block_type::{BlockType, Cell},
    board::{BOARD_HEIGHT, BOARD_WIDTH, Board},
    piece::Piece,
};

/// What a viewer should draw in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderCell {
    #[default]
    Empty,
    /// Locked cell from the board.
    Locked(BlockType),
    /// Cell of the falling piece.
    Falling(BlockType),
    /// Landing preview of the falling piece.
    Shadow,
}

impl RenderCell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == RenderCell::Empty
    }

    const fn as_char(self) -> char {
        match self {
            RenderCell::Empty => '.',
            RenderCell::Locked(_) => '#',
            RenderCell::Falling(kind) => kind.as_char(),
            RenderCell::Shadow => '+',
        }
    }
}

/// Presentation overlay computed from a [`Board`].
///
/// Shadow and falling cells exist only here; the gameplay board never stores
/// them, so observation encoding is unaffected by what a viewer draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBoard {
    rows: [[RenderCell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl RenderBoard {
    #[must_use]
    pub fn new(board: &Board) -> Self {
        let mut rows = [[RenderCell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        for (dst, src) in rows.iter_mut().zip(board.rows()) {
            for (d, s) in dst.iter_mut().zip(src.cells()) {
                *d = match s {
                    Cell::Empty => RenderCell::Empty,
                    Cell::Filled(kind) => RenderCell::Locked(*kind),
                };
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[RenderCell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Overlays the filled cells of `piece` at `(x, y)` with `cell`.
    ///
    /// Cells outside the board are skipped. Locked cells are never
    /// overwritten.
    pub fn fill_piece_as(&mut self, piece: &Piece, x: i32, y: i32, cell: RenderCell) {
        for (row, col) in piece.filled_cells() {
            let cx = usize::try_from(x).ok().map(|x| x + col);
            let cy = usize::try_from(y).ok().map(|y| y + row);
            let Some(target) = cx
                .zip(cy)
                .and_then(|(cx, cy)| self.rows.get_mut(cy)?.get_mut(cx))
            else {
                continue;
            };
            if !matches!(target, RenderCell::Locked(_)) {
                *target = cell;
            }
        }
    }
}

impl fmt::Display for RenderBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}
