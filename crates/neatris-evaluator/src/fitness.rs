//! Fitness of a finished game.
//!
//! ```text
//! fitness = 1
//!         + 1    per occupied cell above the bottom row
//!         + 100  per occupied cell in the bottom row
//!         + 1000 per cleared row
//! ```
//!
//! A game in which every single decision dropped the piece scores exactly `1`
//! regardless of the board, and an abandoned (stalled) evaluation scores `0`.

use std::sync::atomic::{AtomicU64, Ordering};

use neatris_engine::{BOARD_HEIGHT, BOARD_WIDTH, GameInstance};
use serde::{Deserialize, Serialize};

const BASE_FITNESS: f64 = 1.0;
const CELL_REWARD: f64 = 1.0;
const BOTTOM_ROW_CELL_REWARD: f64 = 100.0;
const CLEARED_ROW_REWARD: f64 = 1000.0;

/// Fitness pair reported to a search algorithm.
///
/// Both fields always hold the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessInfo {
    pub raw_fitness: f64,
    pub ranking_fitness: f64,
}

impl FitnessInfo {
    pub const ZERO: Self = Self::new(0.0);

    #[must_use]
    pub const fn new(fitness: f64) -> Self {
        Self {
            raw_fitness: fitness,
            ranking_fitness: fitness,
        }
    }
}

/// Computes the fitness of a game that reached game over.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_fitness(game: &dyn GameInstance, dropped_every_time: bool) -> f64 {
    if dropped_every_time {
        return BASE_FITNESS;
    }

    let mut fitness = BASE_FITNESS;
    for y in 0..BOARD_HEIGHT {
        let reward = if y == BOARD_HEIGHT - 1 {
            BOTTOM_ROW_CELL_REWARD
        } else {
            CELL_REWARD
        };
        for x in 0..BOARD_WIDTH {
            let x = i32::try_from(x).expect("board width fits in i32");
            let y = i32::try_from(y).expect("board height fits in i32");
            if game.is_board_coordinate_occupied(x, y) {
                fitness += reward;
            }
        }
    }
    fitness + CLEARED_ROW_REWARD * game.score() as f64
}

/// Running maximum of all fitness values recorded, shareable across threads.
///
/// Fitness values are non-negative, so their IEEE 754 bit patterns order the
/// same way as the values and a single atomic `fetch_max` suffices.
#[derive(Debug, Default)]
pub struct MaxFitness {
    bits: AtomicU64,
}

impl MaxFitness {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: AtomicU64::new(0),
        }
    }

    /// Records `fitness` and returns the maximum including it.
    ///
    /// # Panics
    ///
    /// Panics if `fitness` is negative or NaN.
    pub fn record(&self, fitness: f64) -> f64 {
        assert!(fitness >= 0.0, "fitness must be non-negative: {fitness}");
        // -0.0 has the sign bit set and would compare above every positive value.
        let bits = (fitness + 0.0).to_bits();
        let previous = self.bits.fetch_max(bits, Ordering::AcqRel);
        f64::from_bits(previous.max(bits))
    }

    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}
