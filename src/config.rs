use std::fmt;
use std::str::FromStr;

use crate::error::GameError;
use crate::randomizer::{BagPieceProvider, PieceProvider, RandomPieceProvider};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RandomizerKind {
    Uniform,
    #[default]
    Bag,
}

impl FromStr for RandomizerKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "random" => Ok(RandomizerKind::Uniform),
            "bag" | "7bag" | "bag7" => Ok(RandomizerKind::Bag),
            _ => Err(GameError::UnknownRandomizer(s.to_string())),
        }
    }
}

impl fmt::Display for RandomizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomizerKind::Uniform => f.write_str("uniform"),
            RandomizerKind::Bag => f.write_str("bag"),
        }
    }
}

/// Runtime settings for a game. Board size and scoring are fixed constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the piece generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub randomizer: RandomizerKind,
    pub start_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            randomizer: RandomizerKind::default(),
            start_level: 1,
        }
    }
}

impl GameConfig {
    pub fn provider(&self) -> Box<dyn PieceProvider> {
        match self.randomizer {
            RandomizerKind::Uniform => Box::new(RandomPieceProvider::new(self.seed)),
            RandomizerKind::Bag => Box::new(BagPieceProvider::new(self.seed)),
        }
    }
}
