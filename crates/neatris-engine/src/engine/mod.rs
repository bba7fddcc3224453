//! Game state machine built on the core data structures.
//!
//! - [`Game`] - Board, falling piece, next piece and statistics
//! - [`GameInstance`] - Command and query surface used by evaluators
//! - [`GameStats`] - Cleared-row counters
//! - [`PieceGenerator`] - Next-piece policies selected by [`PieceRule`]
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. A [`Game`] spawns its first piece centered above the playfield
//! 2. A caller shifts or rotates the falling piece; illegal commands are ignored
//! 3. [`finish_move`](GameInstance::finish_move) drops and locks the piece
//! 4. Full rows are cleared and the next piece spawns
//! 5. Repeat until a spawn collides, which ends the game
//!
//! # Example
//!
//! ```
//! use neatris_engine::{Game, GameInstance, PieceRule, PieceSeed};
//!
//! let seed = PieceSeed::from_bytes([7; 16]);
//! let mut game = Game::new(PieceRule::Bag7.build(seed));
//!
//! while !game.game_over() {
//!     game.rotate();
//!     game.move_left();
//!     game.finish_move();
//! }
//!
//! println!("cleared {} rows", game.score());
//! ```

pub use self::{game::*, game_instance::*, game_stats::*, piece_generator::*};

mod game;
mod game_instance;
mod game_stats;
mod piece_generator;
