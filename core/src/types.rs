use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Identifier handed out by the category registry, starting at 1.
pub type CategoryId = u32;

/// Dollar value of a board cell.
pub type Points = u32;

/// Running score, may go negative.
pub type Score = i64;

/// Number of rows on the board, one per difficulty level.
pub const DIFFICULTY_LEVELS: u8 = 5;

/// Value step between two consecutive difficulty levels.
pub const POINTS_PER_LEVEL: Points = 100;

/// Row of the board, `0` is the cheapest question.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub fn new(level: u8) -> Result<Self> {
        if level < DIFFICULTY_LEVELS {
            Ok(Self(level))
        } else {
            Err(GameError::InvalidDifficulty(level))
        }
    }

    /// Maps a dollar value back to its row, only exact multiples of the step are valid.
    pub fn from_value(value: Points) -> Result<Self> {
        if value == 0 || value % POINTS_PER_LEVEL != 0 {
            return Err(GameError::InvalidValue(value));
        }
        let level = value / POINTS_PER_LEVEL - 1;
        if level < DIFFICULTY_LEVELS as Points {
            Ok(Self(level as u8))
        } else {
            Err(GameError::InvalidValue(value))
        }
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    pub const fn value(self) -> Points {
        (self.0 as Points + 1) * POINTS_PER_LEVEL
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..DIFFICULTY_LEVELS).map(Self)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = GameError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.value())
    }
}

/// One board position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub category: CategoryId,
    pub difficulty: Difficulty,
}

impl CellKey {
    pub const fn new(category: CategoryId, difficulty: Difficulty) -> Self {
        Self {
            category,
            difficulty,
        }
    }

    pub const fn value(&self) -> Points {
        self.difficulty.value()
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category, self.difficulty.level())
    }
}
