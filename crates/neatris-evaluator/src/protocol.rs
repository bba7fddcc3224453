//! Observation and action encoding between a game and a decision-maker.
//!
//! # Observation
//!
//! A fixed vector of [`NUM_INPUTS`] values, each either `1.0` or `-1.0`:
//!
//! ```text
//! [0..7)     next block, one-hot on its ordinal (1 at the ordinal, -1 elsewhere)
//! [7..227)   board occupancy, row-major over all 22 x 10 cells (1 = occupied)
//! ```
//!
//! # Action
//!
//! A fixed vector of [`NUM_OUTPUTS`] values:
//!
//! ```text
//! [0]  <= -0.5 move left, >= 0.5 move right, otherwise no shift
//! [1]  >= 0.5 rotate
//! [2]  > 0.5 finish the move (drop and lock)
//! ```
//!
//! Commands are applied in that order, so a single decision can shift, rotate
//! and drop the same piece.

use neatris_engine::{BOARD_HEIGHT, BOARD_WIDTH, BlockType, GameInstance};

/// Number of leading inputs that encode the next block.
pub const NUM_BASE_INPUTS: usize = BlockType::LEN;

/// Length of an observation vector.
pub const NUM_INPUTS: usize = NUM_BASE_INPUTS + BOARD_WIDTH * BOARD_HEIGHT;

/// Length of an action vector.
pub const NUM_OUTPUTS: usize = 3;

const SHIFT_THRESHOLD: f64 = 0.5;
const ROTATE_THRESHOLD: f64 = 0.5;
const DROP_THRESHOLD: f64 = 0.5;

const ON: f64 = 1.0;
const OFF: f64 = -1.0;

/// Horizontal part of a decoded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

/// Commands requested by one action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub shift: Option<Shift>,
    pub rotate: bool,
    pub drop: bool,
}

impl Action {
    /// Interprets an action vector.
    ///
    /// # Panics
    ///
    /// Panics if `outputs` is shorter than [`NUM_OUTPUTS`].
    #[must_use]
    pub fn from_outputs(outputs: &[f64]) -> Self {
        let shift = if outputs[0] <= -SHIFT_THRESHOLD {
            Some(Shift::Left)
        } else if outputs[0] >= SHIFT_THRESHOLD {
            Some(Shift::Right)
        } else {
            None
        };
        Self {
            shift,
            rotate: outputs[1] >= ROTATE_THRESHOLD,
            drop: outputs[2] > DROP_THRESHOLD,
        }
    }

    /// Applies the commands to `game` and reports whether the move finished.
    pub fn apply(self, game: &mut dyn GameInstance) -> bool {
        match self.shift {
            Some(Shift::Left) => game.move_left(),
            Some(Shift::Right) => game.move_right(),
            None => {}
        }
        if self.rotate {
            game.rotate();
        }
        if self.drop {
            game.finish_move();
        }
        self.drop
    }
}

/// Writes the observation of `game` into `inputs`.
///
/// # Panics
///
/// Panics if `inputs` is shorter than [`NUM_INPUTS`].
pub fn encode(game: &dyn GameInstance, inputs: &mut [f64]) {
    let (base, cells) = inputs[..NUM_INPUTS].split_at_mut(NUM_BASE_INPUTS);

    let next = game.next_block().ordinal();
    for (i, value) in base.iter_mut().enumerate() {
        *value = if i == next { ON } else { OFF };
    }

    for (i, value) in cells.iter_mut().enumerate() {
        let x = i32::try_from(i % BOARD_WIDTH).expect("board width fits in i32");
        let y = i32::try_from(i / BOARD_WIDTH).expect("board height fits in i32");
        *value = if game.is_board_coordinate_occupied(x, y) {
            ON
        } else {
            OFF
        };
    }
}

/// Applies the action vector `outputs` to `game`.
///
/// Returns `true` iff the action finished the move.
pub fn decode(outputs: &[f64], game: &mut dyn GameInstance) -> bool {
    Action::from_outputs(outputs).apply(game)
}
