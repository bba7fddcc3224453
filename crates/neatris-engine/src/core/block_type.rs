use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// The seven falling-block kinds.
///
/// The discriminant is the block's ordinal. Ordinals feed the observation
/// vector directly, so the variant order must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockType {
    /// Four cells in a line (I).
    LinePiece = 0,
    /// 2×2 square (O).
    Square = 1,
    /// S-shaped skew piece.
    Squiggly = 2,
    /// Z-shaped skew piece.
    ReverseSquiggly = 3,
    /// T-shaped piece.
    TBlock = 4,
    /// L-shaped piece.
    LBlock = 5,
    /// J-shaped piece.
    ReverseLBlock = 6,
}

impl Distribution<BlockType> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockType {
        BlockType::ALL[rng.random_range(0..BlockType::LEN)]
    }
}

impl BlockType {
    /// Number of block kinds (7).
    pub const LEN: usize = 7;

    /// All block kinds in ordinal order.
    pub const ALL: [Self; Self::LEN] = [
        BlockType::LinePiece,
        BlockType::Square,
        BlockType::Squiggly,
        BlockType::ReverseSquiggly,
        BlockType::TBlock,
        BlockType::LBlock,
        BlockType::ReverseLBlock,
    ];

    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns the single character used for this kind in logs and board dumps.
    ///
    /// # Examples
    ///
    /// ```
    /// use neatris_engine::BlockType;
    ///
    /// assert_eq!(BlockType::LinePiece.as_char(), 'I');
    /// assert_eq!(BlockType::ReverseLBlock.as_char(), 'J');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            BlockType::LinePiece => 'I',
            BlockType::Square => 'O',
            BlockType::Squiggly => 'S',
            BlockType::ReverseSquiggly => 'Z',
            BlockType::TBlock => 'T',
            BlockType::LBlock => 'L',
            BlockType::ReverseLBlock => 'J',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(BlockType::LinePiece),
            'O' => Some(BlockType::Square),
            'S' => Some(BlockType::Squiggly),
            'Z' => Some(BlockType::ReverseSquiggly),
            'T' => Some(BlockType::TBlock),
            'L' => Some(BlockType::LBlock),
            'J' => Some(BlockType::ReverseLBlock),
            _ => None,
        }
    }
}

/// Content of a single piece or board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(BlockType),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn block_type(self) -> Option<BlockType> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }
}
