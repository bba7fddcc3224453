use arrayvec::ArrayVec;

use crate::CellOutOfRangeError;

use super::block_type::{BlockType, Cell};

/// Largest extent of any piece shape in either direction.
pub const MAX_PIECE_SIZE: usize = 4;

const MAX_PIECE_CELLS: usize = MAX_PIECE_SIZE * MAX_PIECE_SIZE;

type ShapeGrid = [[bool; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// An immutable piece shape tagged with its [`BlockType`].
///
/// The shape is a `height`×`width` grid stored in the top-left corner of a
/// fixed 4×4 array, so `Piece` stays `Copy`. Rotation never mutates: it
/// returns a new value whose rotation counter is one higher.
///
/// # Example
///
/// ```
/// use neatris_engine::{BlockType, Piece};
///
/// let piece = Piece::new(BlockType::LinePiece);
/// assert_eq!((piece.height(), piece.width()), (1, 4));
///
/// let rotated = piece.rotated_right();
/// assert_eq!((rotated.height(), rotated.width()), (4, 1));
/// assert_eq!(rotated.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: BlockType,
    grid: ShapeGrid,
    height: u8,
    width: u8,
    rotation_counter: u8,
}

impl Piece {
    /// Creates the piece in its spawn orientation.
    #[must_use]
    pub fn new(kind: BlockType) -> Self {
        let (rows, height, width) = &SPAWN_SHAPES[kind.ordinal()];
        let mut grid = [[false; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (dst, src) in grid.iter_mut().zip(rows) {
            *dst = *src;
        }
        Self {
            kind,
            grid,
            height: *height,
            width: *width,
            rotation_counter: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> BlockType {
        self.kind
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    /// Rotation index in `0..4`.
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation_counter % 4
    }

    /// Returns the cell at `(row, col)` of the shape.
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, CellOutOfRangeError> {
        if row >= self.height() || col >= self.width() {
            return Err(CellOutOfRangeError {
                row,
                col,
                height: self.height(),
                width: self.width(),
            });
        }
        Ok(if self.grid[row][col] {
            Cell::Filled(self.kind)
        } else {
            Cell::Empty
        })
    }

    /// Returns the `(row, col)` offsets of every filled cell, row-major.
    #[must_use]
    pub fn filled_cells(&self) -> ArrayVec<(usize, usize), MAX_PIECE_CELLS> {
        let mut cells = ArrayVec::new();
        for row in 0..self.height() {
            for col in 0..self.width() {
                if self.grid[row][col] {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Returns this piece rotated 90° clockwise.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        let (height, width) = (self.height(), self.width());
        let mut grid = [[false; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (i, row) in self.grid.iter().enumerate().take(height) {
            for (j, &filled) in row.iter().enumerate().take(width) {
                grid[j][height - i - 1] = filled;
            }
        }
        Self {
            kind: self.kind,
            grid,
            height: self.width,
            width: self.height,
            rotation_counter: self.rotation_counter.wrapping_add(1),
        }
    }

    /// Returns `true` if both pieces have the same kind and shape, regardless of
    /// how many times either was rotated to get there.
    #[must_use]
    pub fn is_congruent(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.height == other.height
            && self.width == other.width
            && self.grid == other.grid
    }
}

const SPAWN_SHAPES: [([[bool; MAX_PIECE_SIZE]; 2], u8, u8); BlockType::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // LinePiece
        ([[C, C, C, C], EEEE], 1, 4),
        // Square
        ([[C, C, E, E], [C, C, E, E]], 2, 2),
        // Squiggly
        ([[E, C, C, E], [C, C, E, E]], 2, 3),
        // ReverseSquiggly
        ([[C, C, E, E], [E, C, C, E]], 2, 3),
        // TBlock
        ([[E, C, E, E], [C, C, C, E]], 2, 3),
        // LBlock
        ([[E, E, C, E], [C, C, C, E]], 2, 3),
        // ReverseLBlock
        ([[C, E, E, E], [C, C, C, E]], 2, 3),
    ]
};
