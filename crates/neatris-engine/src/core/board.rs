use crate::PlacementError;

use super::{
    block_type::{BlockType, Cell},
    piece::Piece,
};

/// Board width in columns.
pub const BOARD_WIDTH: usize = 10;
/// Board height in rows, hidden spawn rows included.
pub const BOARD_HEIGHT: usize = 22;
/// Rows at the top of the board where new pieces spawn.
pub const HIDDEN_ROWS: usize = 2;

/// A single row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow {
    cells: [Cell; BOARD_WIDTH],
}

impl BoardRow {
    const EMPTY: Self = Self {
        cells: [Cell::Empty; BOARD_WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Cell; BOARD_WIDTH] {
        &self.cells
    }

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| c.is_filled())
    }
}

/// Fixed-size occupancy grid of locked cells.
///
/// Coordinates are `(x, y)` with `x` the column (`0..10`, left to right) and
/// `y` the row (`0..22`, top to bottom). Rows `0..HIDDEN_ROWS` form the spawn
/// zone above the visible playfield. Only locked cells are stored here; the
/// falling piece and its shadow live elsewhere.
///
/// # Example
///
/// ```
/// use neatris_engine::{BlockType, Board, Piece};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(BlockType::Square);
/// assert!(board.can_place(&piece, 0, 20));
/// board.lock(&piece, 0, 20).unwrap();
/// assert!(board.is_occupied(1, 21));
/// assert!(!board.can_place(&piece, 1, 20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|x| *x < BOARD_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < BOARD_HEIGHT)?;
        Some((x, y))
    }

    /// Returns the cell at `(x, y)`, or `None` if outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = Self::index(x, y)?;
        Some(self.rows[y].cells[x])
    }

    /// Returns `true` iff `(x, y)` is inside the board and holds a locked cell.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(Cell::is_filled)
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Iterates over `(x, y, kind)` for every locked cell, row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, BlockType)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.cells
                .iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.block_type().map(|kind| (x, y, kind)))
        })
    }

    /// Returns `true` iff every filled cell of `piece` translated to `(x, y)`
    /// lies inside the board over an empty cell.
    #[must_use]
    pub fn can_place(&self, piece: &Piece, x: i32, y: i32) -> bool {
        piece.filled_cells().iter().all(|&(row, col)| {
            offset(x, col)
                .zip(offset(y, row))
                .and_then(|(cx, cy)| self.cell(cx, cy))
                .is_some_and(Cell::is_empty)
        })
    }

    /// Commits every filled cell of `piece` at `(x, y)` into the board.
    ///
    /// The board is left untouched when the placement is invalid.
    pub fn lock(&mut self, piece: &Piece, x: i32, y: i32) -> Result<(), PlacementError> {
        if !self.can_place(piece, x, y) {
            return Err(PlacementError { x, y });
        }
        for (row, col) in piece.filled_cells() {
            // Bounds were checked by `can_place`.
            let (cx, cy) = offset(x, col)
                .zip(offset(y, row))
                .and_then(|(cx, cy)| Self::index(cx, cy))
                .expect("placement was validated");
            self.rows[cy].cells[cx] = Cell::Filled(piece.kind());
        }
        Ok(())
    }

    /// Fills a single cell. Used to set up board positions directly.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the board.
    pub fn fill_cell(&mut self, x: usize, y: usize, kind: BlockType) {
        self.rows[y].cells[x] = Cell::Filled(kind);
    }

    /// Removes every fully occupied row, shifts the rows above down and
    /// returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        if count > 0 {
            tracing::trace!(count, "cleared full rows");
        }
        count
    }
}

fn offset(base: i32, delta: usize) -> Option<i32> {
    i32::try_from(delta).ok().and_then(|d| base.checked_add(d))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn fill_row(board: &mut Board, y: usize, kind: BlockType) {
        for x in 0..BOARD_WIDTH {
            board.fill_cell(x, y, kind);
        }
    }

    #[test]
    fn test_is_occupied_out_of_bounds() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, 0, BlockType::LinePiece);
        assert!(board.is_occupied(0, 0));
        assert!(!board.is_occupied(-1, 0));
        assert!(!board.is_occupied(0, -1));
        assert!(!board.is_occupied(10, 0));
        assert!(!board.is_occupied(0, 22));
    }

    #[test]
    fn test_can_place_walls_and_floor() {
        let board = Board::EMPTY;
        let line = Piece::new(BlockType::LinePiece);
        assert!(board.can_place(&line, 0, 0));
        assert!(board.can_place(&line, 6, 21));
        assert!(!board.can_place(&line, 7, 21));
        assert!(!board.can_place(&line, -1, 0));
        assert!(!board.can_place(&line, 0, 22));
        assert!(!board.can_place(&line, 0, -1));
    }

    #[test]
    fn test_can_place_ignores_empty_shape_cells() {
        let mut board = Board::EMPTY;
        // Squiggly row 0 is ".SS", so (x, y) itself stays free.
        board.fill_cell(0, 20, BlockType::Square);
        let piece = Piece::new(BlockType::Squiggly);
        assert!(board.can_place(&piece, 0, 20));
        assert!(!board.can_place(&piece, 0, 19));
    }

    #[test]
    fn test_lock_rejects_collision() {
        let mut board = Board::EMPTY;
        let square = Piece::new(BlockType::Square);
        board.lock(&square, 4, 20).unwrap();
        let before = board.clone();
        assert_eq!(
            board.lock(&square, 5, 20),
            Err(PlacementError { x: 5, y: 20 })
        );
        assert_eq!(board, before);
        assert_eq!(board.occupied_cells().count(), 4);
    }

    #[test]
    fn test_clear_full_rows_shifts_down() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, 21, BlockType::LinePiece);
        board.fill_cell(3, 20, BlockType::TBlock);
        fill_row(&mut board, 19, BlockType::Square);
        board.fill_cell(7, 18, BlockType::LBlock);

        assert_eq!(board.clear_full_rows(), 2);

        let cells: Vec<_> = board.occupied_cells().collect();
        assert_eq!(
            cells,
            [(7, 20, BlockType::LBlock), (3, 21, BlockType::TBlock)]
        );
    }

    #[test]
    fn test_clear_full_rows_none() {
        let mut board = Board::EMPTY;
        for x in 0..BOARD_WIDTH - 1 {
            board.fill_cell(x, 21, BlockType::Square);
        }
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::EMPTY;
        for y in 0..BOARD_HEIGHT {
            fill_row(&mut board, y, BlockType::ReverseSquiggly);
        }
        assert_eq!(board.clear_full_rows(), BOARD_HEIGHT);
        assert_eq!(board, Board::EMPTY);
    }

    fn piece_strategy() -> impl Strategy<Value = Piece> {
        (0..BlockType::LEN, 0..4usize).prop_map(|(i, rotations)| {
            let mut piece = Piece::new(BlockType::ALL[i]);
            for _ in 0..rotations {
                piece = piece.rotated_right();
            }
            piece
        })
    }

    fn board_strategy() -> impl Strategy<Value = Board> {
        prop::collection::vec(any::<bool>(), BOARD_WIDTH * BOARD_HEIGHT).prop_map(|bits| {
            let mut board = Board::EMPTY;
            for (i, filled) in bits.into_iter().enumerate() {
                if filled {
                    board.fill_cell(i % BOARD_WIDTH, i / BOARD_WIDTH, BlockType::TBlock);
                }
            }
            board
        })
    }

    proptest! {
        #[test]
        fn can_place_matches_cell_check(
            board in board_strategy(),
            piece in piece_strategy(),
            x in -4i32..14,
            y in -4i32..26,
        ) {
            let expected = piece.filled_cells().iter().all(|&(row, col)| {
                let cx = x + i32::try_from(col).unwrap();
                let cy = y + i32::try_from(row).unwrap();
                (0..10).contains(&cx) && (0..22).contains(&cy) && !board.is_occupied(cx, cy)
            });
            prop_assert_eq!(board.can_place(&piece, x, y), expected);

            let mut locked = board.clone();
            prop_assert_eq!(locked.lock(&piece, x, y).is_ok(), expected);
            if expected {
                prop_assert_eq!(
                    locked.occupied_cells().count(),
                    board.occupied_cells().count() + 4
                );
            }
        }

        #[test]
        fn clear_full_rows_keeps_remaining_rows_in_order(board in board_strategy()) {
            let full = board.rows().filter(|row| row.is_filled()).count();
            let remaining: Vec<BoardRow> =
                board.rows().filter(|row| !row.is_filled()).copied().collect();

            let mut cleared = board.clone();
            prop_assert_eq!(cleared.clear_full_rows(), full);

            let rows: Vec<BoardRow> = cleared.rows().copied().collect();
            prop_assert!(rows[..full].iter().all(|row| *row == BoardRow::EMPTY));
            prop_assert_eq!(&rows[full..], remaining.as_slice());
        }
    }
}
