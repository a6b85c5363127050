use crate::grid::{GRID_HEIGHT, GRID_WIDTH};

/// Errors raised at the engine boundary. Moves and rotations that do not fit
/// are not errors; they come back as `Outcome::Rejected`.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum GameError {
    #[error("unknown direction `{0}` (expected left, right or down)")]
    UnknownDirection(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unknown randomizer `{0}` (expected uniform or bag)")]
    UnknownRandomizer(String),
    #[error("grid must be {}x{} cells, got {width}x{height}", GRID_WIDTH, GRID_HEIGHT)]
    GridDimensions { width: usize, height: usize },
}
