use std::str::FromStr;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::{CellState, Grid, Row, GRID_HEIGHT, GRID_WIDTH};
use crate::randomizer::PieceProvider;
use crate::tetromino::{Tetromino, TetrominoType};

// ============================================================================
// Configuration
// ============================================================================

// Timing (in milliseconds)
const BASE_TICK_MS: u64 = 800;
const MIN_TICK_MS: u64 = 100;
const SPEED_INCREASE_PER_LEVEL: u64 = 50;
pub const LINES_PER_LEVEL: u32 = 10;

// Scoring, per clear and multiplied by the level
pub const SCORE_SINGLE: u32 = 40;
pub const SCORE_DOUBLE: u32 = 100;
pub const SCORE_TRIPLE: u32 = 300;
pub const SCORE_TETRIS: u32 = 1200;

/// Base award for clearing `lines` rows in one lock. Anything past four is
/// scored as repeated tetrises plus the remainder.
pub fn line_clear_score(lines: u32) -> u32 {
    let remainder = match lines % 4 {
        1 => SCORE_SINGLE,
        2 => SCORE_DOUBLE,
        3 => SCORE_TRIPLE,
        _ => 0,
    };
    (lines / 4) * SCORE_TETRIS + remainder
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Anchor shift as (columns, rows).
    pub fn offset(self) -> (i16, i16) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            _ => Err(GameError::UnknownDirection(s.to_string())),
        }
    }
}

/// A single driver request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Rotate,
    Drop,
    Tick,
}

impl FromStr for Command {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotate" => Ok(Command::Rotate),
            "drop" => Ok(Command::Drop),
            "tick" => Ok(Command::Tick),
            other => other
                .parse()
                .map(Command::Move)
                .map_err(|_| GameError::UnknownCommand(s.to_string())),
        }
    }
}

/// What a command did. Returned by every mutating operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Spawned,
    Moved,
    Rotated,
    Rejected,
    Locked,
    LinesCleared(u32),
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Initialized,
    PieceSpawned(TetrominoType),
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    grid: Grid,
    current_piece: Tetromino,
    next_piece: TetrominoType,
    score: u32,
    lines_cleared: u32,
    level: u32,
    start_level: u32,
    state: GameState,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut game = Self::unstarted(config.provider(), config.start_level);
        game.initialize();
        game
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        let mut game = Self::unstarted(provider, 1);
        game.initialize();
        game
    }

    /// Starts mid-game: `piece` is already falling over `grid`. The next
    /// piece is drawn from `provider`. The placement is not validated.
    pub fn with_grid(grid: Grid, piece: Tetromino, provider: Box<dyn PieceProvider>) -> Self {
        let mut game = Self::unstarted(provider, 1);
        game.grid = grid;
        game.current_piece = piece;
        game.next_piece = game.piece_provider.next_piece();
        game
    }

    fn unstarted(provider: Box<dyn PieceProvider>, start_level: u32) -> Self {
        let start_level = start_level.max(1);
        // Piece slots are placeholders until the first spawn.
        Self {
            grid: Grid::new(),
            current_piece: Tetromino::spawn(TetrominoType::O),
            next_piece: TetrominoType::O,
            score: 0,
            lines_cleared: 0,
            level: start_level,
            start_level,
            state: GameState::Playing,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    /// Clears the field and counters, draws the first next piece and spawns.
    /// This is the only way out of `GameState::GameOver`.
    pub fn initialize(&mut self) -> Outcome {
        self.grid = Grid::new();
        self.score = 0;
        self.lines_cleared = 0;
        self.level = self.start_level;
        self.state = GameState::Playing;
        self.events.clear();
        self.events.push(GameEvent::Initialized);

        self.next_piece = self.piece_provider.next_piece();
        self.spawn()
    }

    // ------------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------------

    /// Every block inside the field (spawn band included) and on an empty cell.
    pub fn is_valid_position(&self, piece: &Tetromino) -> bool {
        piece.blocks().iter().all(|&block| self.grid.is_free(block))
    }

    /// Promotes the next piece to the falling piece at the spawn point and
    /// draws a new next piece. Ends the game if the spawn point is blocked.
    pub fn spawn(&mut self) -> Outcome {
        if self.is_game_over() {
            return Outcome::GameOver;
        }

        self.current_piece = Tetromino::spawn(self.next_piece);
        self.next_piece = self.piece_provider.next_piece();
        self.events
            .push(GameEvent::PieceSpawned(self.current_piece.tetromino_type));

        if !self.is_valid_position(&self.current_piece) {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
            return Outcome::GameOver;
        }
        Outcome::Spawned
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Move(direction) => self.try_move(direction),
            Command::Rotate => self.try_rotate(),
            Command::Drop => self.hard_drop(),
            Command::Tick => self.tick(),
        }
    }

    /// Shifts the piece one cell. A blocked downward move lands the piece.
    pub fn try_move(&mut self, direction: Direction) -> Outcome {
        if self.is_game_over() {
            return Outcome::GameOver;
        }

        let (dx, dy) = direction.offset();
        let moved = self.current_piece.moved(dx, dy);
        if self.is_valid_position(&moved) {
            self.current_piece = moved;
            self.events.push(GameEvent::PieceMoved);
            Outcome::Moved
        } else if direction == Direction::Down {
            self.lock()
        } else {
            Outcome::Rejected
        }
    }

    /// Clockwise quarter turn about the anchor. No kicks: the turned piece
    /// either fits where it is or the rotation is refused.
    pub fn try_rotate(&mut self) -> Outcome {
        if self.is_game_over() {
            return Outcome::GameOver;
        }

        let rotated = self.current_piece.rotated();
        if self.is_valid_position(&rotated) {
            self.current_piece = rotated;
            self.events.push(GameEvent::PieceRotated);
            Outcome::Rotated
        } else {
            Outcome::Rejected
        }
    }

    /// Auto-drop step, driven by the caller's clock.
    pub fn tick(&mut self) -> Outcome {
        self.try_move(Direction::Down)
    }

    pub fn hard_drop(&mut self) -> Outcome {
        if self.is_game_over() {
            return Outcome::GameOver;
        }

        loop {
            let moved = self.current_piece.moved(0, 1);
            if !self.is_valid_position(&moved) {
                break;
            }
            self.current_piece = moved;
        }
        self.lock()
    }

    /// Writes the falling piece into the grid, clears completed rows and
    /// spawns the next piece, all in one step.
    pub fn lock(&mut self) -> Outcome {
        if self.is_game_over() {
            return Outcome::GameOver;
        }

        let piece_type = self.current_piece.tetromino_type;
        for block in self.current_piece.blocks() {
            self.grid.set(block, CellState::Filled(piece_type));
        }
        self.events.push(GameEvent::PieceLocked);

        let cleared = self.clear_lines();
        match self.spawn() {
            Outcome::GameOver => Outcome::GameOver,
            _ if cleared > 0 => Outcome::LinesCleared(cleared),
            _ => Outcome::Locked,
        }
    }

    /// Removes full rows and credits lines, score and level.
    pub fn clear_lines(&mut self) -> u32 {
        if self.is_game_over() {
            return 0;
        }

        let cleared = self.grid.clear_full_rows();
        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared(cleared));
            self.add_score(cleared);
        }
        cleared
    }

    fn add_score(&mut self, lines: u32) {
        let award = line_clear_score(lines).saturating_mul(self.level);
        self.score = self.score.saturating_add(award);
        self.lines_cleared = self.lines_cleared.saturating_add(lines);

        let new_level = self
            .start_level
            .saturating_add(self.lines_cleared / LINES_PER_LEVEL);
        if new_level > self.level {
            self.level = new_level;
            self.events.push(GameEvent::LevelUp(self.level));
        }
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> &Tetromino {
        &self.current_piece
    }

    pub fn next_piece(&self) -> TetrominoType {
        self.next_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Auto-drop interval for the current level.
    pub fn tick_duration_ms(&self) -> u64 {
        let speed_reduction = u64::from(self.level - 1) * SPEED_INCREASE_PER_LEVEL;
        BASE_TICK_MS.saturating_sub(speed_reduction).max(MIN_TICK_MS)
    }

    /// Visible rows with the falling piece drawn in. Blocks still in the
    /// spawn band are not shown.
    pub fn render_grid(&self) -> Vec<Row> {
        let mut visual_grid = self.grid.visible_rows().to_vec();

        for block in self.current_piece.blocks() {
            if (0..GRID_HEIGHT as i16).contains(&block.y) && (0..GRID_WIDTH as i16).contains(&block.x) {
                visual_grid[block.y as usize][block.x as usize] =
                    CellState::Filled(self.current_piece.tetromino_type);
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_clears_beat_repeated_singles() {
        for k in 2..=4 {
            assert!(line_clear_score(k) > k * line_clear_score(1), "{k} lines");
        }
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(4), SCORE_TETRIS);
        assert_eq!(line_clear_score(6), SCORE_TETRIS + SCORE_DOUBLE);
    }

    #[test]
    fn parses_directions_and_commands() {
        assert_eq!("Left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("down".parse::<Command>(), Ok(Command::Move(Direction::Down)));
        assert_eq!("rotate".parse::<Command>(), Ok(Command::Rotate));
        assert_eq!(
            "up".parse::<Direction>(),
            Err(GameError::UnknownDirection("up".to_string()))
        );
        assert_eq!(
            "hold".parse::<Command>(),
            Err(GameError::UnknownCommand("hold".to_string()))
        );
    }

    #[test]
    fn score_scales_with_level() {
        let mut game = Game::new();
        game.level = 3;

        game.add_score(1);

        assert_eq!(game.score(), SCORE_SINGLE * 3);
        assert_eq!(game.lines_cleared(), 1);
        assert_eq!(game.level(), 3);
    }

    #[test]
    fn level_follows_start_level_and_lines() {
        let mut game = Game::from_config(&GameConfig {
            start_level: 2,
            ..GameConfig::default()
        });
        game.take_events();

        game.add_score(4);
        game.add_score(4);
        assert_eq!(game.level(), 2);
        game.add_score(2);

        assert_eq!(game.level(), 3);
        assert_eq!(game.take_events(), vec![GameEvent::LevelUp(3)]);
        assert_eq!(game.score(), 2 * SCORE_TETRIS * 2 + SCORE_DOUBLE * 2);
    }

    #[test]
    fn level_saturates_at_the_top_start_level() {
        let mut game = Game::from_config(&GameConfig {
            start_level: u32::MAX,
            ..GameConfig::default()
        });
        let mut rows = vec![vec![CellState::Empty; GRID_WIDTH]; GRID_HEIGHT];
        for row in rows.iter_mut().skip(GRID_HEIGHT - 10) {
            row.fill(CellState::Filled(TetrominoType::L));
        }
        game.grid = Grid::from_rows(rows).unwrap();
        game.take_events();

        assert_eq!(game.clear_lines(), 10);

        assert_eq!(game.level(), u32::MAX);
        assert_eq!(game.lines_cleared(), 10);
        assert_eq!(game.score(), u32::MAX);
        assert_eq!(game.take_events(), vec![GameEvent::LinesCleared(10)]);
        assert_eq!(game.tick_duration_ms(), MIN_TICK_MS);
    }

    #[test]
    fn tick_duration_shrinks_with_level_and_bottoms_out() {
        let mut game = Game::new();
        assert_eq!(game.tick_duration_ms(), BASE_TICK_MS);
        game.level = 5;
        assert_eq!(game.tick_duration_ms(), BASE_TICK_MS - 4 * SPEED_INCREASE_PER_LEVEL);
        game.level = 100;
        assert_eq!(game.tick_duration_ms(), MIN_TICK_MS);
    }
}
