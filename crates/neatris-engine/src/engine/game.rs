use std::{fmt, sync::Arc};

use crate::{
    BOARD_WIDTH, BlockType, Board, HIDDEN_ROWS, Piece, RenderBoard, RenderCell,
    engine::{GameInstance, GameStats, PieceGenerator},
};

/// Callback invoked synchronously after every [`Game::finish_move`].
pub type MoveObserver = Arc<dyn Fn(&Game) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameState {
    /// A piece is falling and accepts commands.
    Falling,
    /// Terminal; the game no longer changes.
    GameOver,
}

/// Board offset of the falling piece's top-left shape cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    pub x: i32,
    pub y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Spawn offset for `piece`: horizontally centered with its lowest row in
    /// the hidden rows above the visible playfield.
    #[must_use]
    pub fn spawn(piece: &Piece) -> Self {
        let x = (BOARD_WIDTH - piece.width()) / 2;
        let x = i32::try_from(x).expect("board width fits in i32");
        let hidden = i32::try_from(HIDDEN_ROWS).expect("hidden rows fit in i32");
        let height = i32::try_from(piece.height()).expect("piece height fits in i32");
        Self::new(x, hidden - height)
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y + 1)
    }
}

/// The falling-block game: a board, the falling and next pieces, and stats.
///
/// There is no gravity tick. The piece only moves down when
/// [`finish_move`](GameInstance::finish_move) drops it to the floor.
///
/// # Example
///
/// ```
/// use neatris_engine::{BlockType, Game, GameInstance, SequencePieceGenerator};
///
/// let generator = SequencePieceGenerator::new(vec![BlockType::Square]);
/// let mut game = Game::new(Box::new(generator));
/// game.move_left();
/// game.finish_move();
///
/// assert!(game.is_board_coordinate_occupied(3, 21));
/// assert_eq!(game.stats().completed_pieces(), 1);
/// ```
pub struct Game {
    board: Board,
    falling_piece: Piece,
    position: PiecePosition,
    next_block: BlockType,
    generator: Box<dyn PieceGenerator>,
    stats: GameStats,
    state: GameState,
    on_move_finished: Option<MoveObserver>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("falling_piece", &self.falling_piece)
            .field("position", &self.position)
            .field("next_block", &self.next_block)
            .field("stats", &self.stats)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Game {
    #[must_use]
    pub fn new(generator: Box<dyn PieceGenerator>) -> Self {
        Self::with_board(Board::EMPTY, generator)
    }

    /// Starts a game on a prepared board.
    ///
    /// The game is over immediately if the first piece cannot spawn.
    #[must_use]
    pub fn with_board(board: Board, mut generator: Box<dyn PieceGenerator>) -> Self {
        let falling_piece = Piece::new(generator.next_block());
        let next_block = generator.next_block();
        let position = PiecePosition::spawn(&falling_piece);
        let state = if board.can_place(&falling_piece, position.x, position.y) {
            GameState::Falling
        } else {
            GameState::GameOver
        };
        Self {
            board,
            falling_piece,
            position,
            next_block,
            generator,
            stats: GameStats::new(),
            state,
            on_move_finished: None,
        }
    }

    /// Installs a callback run after every finished move.
    #[must_use]
    pub fn with_observer(mut self, observer: MoveObserver) -> Self {
        self.on_move_finished = Some(observer);
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Where the falling piece would land if dropped now.
    #[must_use]
    pub fn drop_position(&self) -> PiecePosition {
        let mut position = self.position;
        while self.fits(&self.falling_piece, position.down()) {
            position = position.down();
        }
        position
    }

    /// Builds the presentation overlay: locked cells, the shadow at the
    /// landing position and the falling piece on top.
    #[must_use]
    pub fn render_board(&self) -> RenderBoard {
        let mut render = RenderBoard::new(&self.board);
        if self.state.is_falling() {
            let kind = self.falling_piece.kind();
            let shadow = self.drop_position();
            render.fill_piece_as(&self.falling_piece, shadow.x, shadow.y, RenderCell::Shadow);
            render.fill_piece_as(
                &self.falling_piece,
                self.position.x,
                self.position.y,
                RenderCell::Falling(kind),
            );
        }
        render
    }

    fn fits(&self, piece: &Piece, position: PiecePosition) -> bool {
        self.board.can_place(piece, position.x, position.y)
    }

    fn try_replace(&mut self, piece: Piece, position: PiecePosition) {
        if self.state.is_game_over() || !self.fits(&piece, position) {
            return;
        }
        self.falling_piece = piece;
        self.position = position;
    }

    fn spawn_next(&mut self) {
        self.falling_piece = Piece::new(self.next_block);
        self.next_block = self.generator.next_block();
        self.position = PiecePosition::spawn(&self.falling_piece);
        if !self.fits(&self.falling_piece, self.position) {
            tracing::trace!(
                score = self.stats.score(),
                pieces = self.stats.completed_pieces(),
                "spawn blocked, game over"
            );
            self.state = GameState::GameOver;
        }
    }
}

impl GameInstance for Game {
    fn game_over(&self) -> bool {
        self.state.is_game_over()
    }

    fn score(&self) -> usize {
        self.stats.score()
    }

    fn current_block(&self) -> BlockType {
        self.falling_piece.kind()
    }

    fn next_block(&self) -> BlockType {
        self.next_block
    }

    fn current_block_rotation(&self) -> u8 {
        self.falling_piece.rotation()
    }

    fn is_board_coordinate_occupied(&self, x: i32, y: i32) -> bool {
        self.board.is_occupied(x, y)
    }

    fn move_left(&mut self) {
        self.try_replace(self.falling_piece, self.position.left());
    }

    fn move_right(&mut self) {
        self.try_replace(self.falling_piece, self.position.right());
    }

    fn rotate(&mut self) {
        self.try_replace(self.falling_piece.rotated_right(), self.position);
    }

    fn finish_move(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let landing = self.drop_position();
        self.board
            .lock(&self.falling_piece, landing.x, landing.y)
            .expect("falling piece is always placeable");
        let cleared = self.board.clear_full_rows();
        self.stats.complete_piece_drop(cleared);
        self.spawn_next();

        if let Some(observer) = self.on_move_finished.clone() {
            observer(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{BOARD_HEIGHT, SequencePieceGenerator};

    fn game_with(blocks: &[BlockType]) -> Game {
        Game::new(Box::new(SequencePieceGenerator::new(blocks.to_vec())))
    }

    fn occupied(game: &Game) -> Vec<(usize, usize)> {
        game.board().occupied_cells().map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn test_spawn_is_centered_above_playfield() {
        let game = game_with(&[BlockType::LinePiece, BlockType::TBlock]);
        assert_eq!(game.position(), PiecePosition::new(3, 1));
        assert_eq!(game.current_block(), BlockType::LinePiece);
        assert_eq!(game.next_block(), BlockType::TBlock);

        let game = game_with(&[BlockType::TBlock]);
        assert_eq!(game.position(), PiecePosition::new(3, 0));
        assert!(game.state().is_falling());
    }

    #[test]
    fn test_move_stops_at_walls() {
        let mut game = game_with(&[BlockType::Square]);
        for _ in 0..10 {
            game.move_left();
        }
        assert_eq!(game.position().x, 0);
        for _ in 0..10 {
            game.move_right();
        }
        assert_eq!(game.position().x, 8);
    }

    #[test]
    fn test_move_blocked_by_locked_cells() {
        let mut board = Board::EMPTY;
        board.fill_cell(3, 0, BlockType::LinePiece);
        let generator = SequencePieceGenerator::new(vec![BlockType::Square]);
        let mut game = Game::with_board(board, Box::new(generator));
        // Square spawns at x = 4, y = 0.
        game.move_left();
        assert_eq!(game.position(), PiecePosition::new(4, 0));
    }

    #[test]
    fn test_rotate_without_wall_kick() {
        let mut game = game_with(&[BlockType::LinePiece]);
        // Horizontal line at y = 1; vertical needs rows 1..5.
        game.rotate();
        assert_eq!(game.current_block_rotation(), 1);
        assert_eq!(game.falling_piece().height(), 4);

        for _ in 0..10 {
            game.move_right();
        }
        assert_eq!(game.position().x, 9);
        // Horizontal would span x = 9..13, so rotation is ignored.
        game.rotate();
        assert_eq!(game.current_block_rotation(), 1);
        assert_eq!(game.position().x, 9);
    }

    #[test]
    fn test_finish_move_drops_and_locks() {
        let mut game = game_with(&[BlockType::Square, BlockType::TBlock]);
        game.finish_move();
        assert_eq!(occupied(&game), [(4, 20), (5, 20), (4, 21), (5, 21)]);
        assert_eq!(game.current_block(), BlockType::TBlock);
        assert_eq!(game.next_block(), BlockType::Square);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_finish_move_clears_rows() {
        let mut board = Board::EMPTY;
        for y in [20, 21] {
            for x in (0..BOARD_WIDTH).filter(|x| !(4..6).contains(x)) {
                board.fill_cell(x, y, BlockType::LinePiece);
            }
        }
        let generator = SequencePieceGenerator::new(vec![BlockType::Square]);
        let mut game = Game::with_board(board, Box::new(generator));
        game.finish_move();

        assert_eq!(game.score(), 2);
        assert_eq!(game.stats().line_cleared_counter()[2], 1);
        assert!(occupied(&game).is_empty());
        assert!(!game.game_over());
    }

    #[test]
    fn test_stacking_ends_in_game_over() {
        let mut game = game_with(&[BlockType::Square]);
        let mut drops = 0;
        while !game.game_over() {
            game.finish_move();
            drops += 1;
        }
        // Each square adds two rows in the middle columns.
        assert_eq!(drops, BOARD_HEIGHT / 2);
        assert!(game.state().is_game_over());

        let before = occupied(&game);
        game.move_left();
        game.rotate();
        game.finish_move();
        assert_eq!(occupied(&game), before);
        assert_eq!(game.stats().completed_pieces(), drops);
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut board = Board::EMPTY;
        board.fill_cell(4, 1, BlockType::TBlock);
        let generator = SequencePieceGenerator::new(vec![BlockType::Square]);
        let game = Game::with_board(board, Box::new(generator));
        assert!(game.game_over());
    }

    #[test]
    fn test_observer_runs_after_each_finish() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let observer: MoveObserver = Arc::new(move |g: &Game| {
            let expected = seen.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(g.stats().completed_pieces(), expected);
        });
        let mut game = game_with(&[BlockType::LinePiece]).with_observer(observer);
        game.move_left();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        game.finish_move();
        game.finish_move();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_render_board_shows_shadow_and_piece() {
        let game = game_with(&[BlockType::Square]);
        let rows: Vec<_> = game.render_board().rows().copied().collect();
        assert_eq!(rows[0][4], RenderCell::Falling(BlockType::Square));
        assert_eq!(rows[21][5], RenderCell::Shadow);
        assert_eq!(game.board().occupied_cells().count(), 0);
        assert!(!game.is_board_coordinate_occupied(4, 21));
    }
}
