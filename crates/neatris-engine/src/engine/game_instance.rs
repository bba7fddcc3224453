use crate::BlockType;

/// Capability surface of a running game, as seen by an evaluator.
///
/// The four commands are the only way to change the game. Once
/// [`game_over`](Self::game_over) reports `true` every command is a no-op.
pub trait GameInstance {
    fn game_over(&self) -> bool;

    /// Cumulative number of cleared rows.
    fn score(&self) -> usize;

    fn current_block(&self) -> BlockType;

    fn next_block(&self) -> BlockType;

    /// Rotation index of the falling piece, in `0..4`.
    fn current_block_rotation(&self) -> u8;

    /// Returns `true` iff `(x, y)` is on the board and holds a locked cell.
    fn is_board_coordinate_occupied(&self, x: i32, y: i32) -> bool;

    fn move_left(&mut self);

    fn move_right(&mut self);

    fn rotate(&mut self);

    /// Drops the falling piece as far as it goes, locks it, clears full rows
    /// and spawns the next piece.
    fn finish_move(&mut self);
}
