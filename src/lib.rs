pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod randomizer;
pub mod tetromino;

pub use config::{GameConfig, RandomizerKind};
pub use error::GameError;
pub use game::{Command, Direction, Game, GameEvent, GameState, Outcome};
pub use grid::{CellState, Grid, GRID_HEIGHT, GRID_WIDTH, HIDDEN_ROWS};
pub use randomizer::{BagPieceProvider, PieceProvider, RandomPieceProvider, SequencePieceProvider};
pub use tetromino::{Position, Tetromino, TetrominoType};
