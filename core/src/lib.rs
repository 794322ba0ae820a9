#![no_std]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use bank::*;
pub use board::*;
pub use category::*;
pub use engine::*;
pub use error::*;
pub use schedule::*;
pub use types::*;
pub use view::*;

mod bank;
mod board;
mod category;
mod engine;
mod error;
mod schedule;
mod types;
mod view;

/// Columns a fresh board starts with.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Science", "History", "Geography", "Entertainment", "Sports"];

/// Tunables for a game session, every field falls back to its default when missing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulated latency between selecting a cell and the question showing up.
    pub lookup_delay_ms: u64,
    /// Simulated latency between submitting a category and it joining the board.
    pub add_category_delay_ms: u64,
    /// How long a transient error stays visible.
    pub error_display_ms: u64,
    pub categories: Vec<String>,
}

impl GameConfig {
    pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 500;
    pub const DEFAULT_ADD_CATEGORY_DELAY_MS: u64 = 500;
    pub const DEFAULT_ERROR_DISPLAY_MS: u64 = 3_000;

    /// Drops the simulated latencies, error display time is kept.
    pub fn without_latency(self) -> Self {
        Self {
            lookup_delay_ms: 0,
            add_category_delay_ms: 0,
            ..self
        }
    }

    pub const fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }

    pub const fn add_category_delay(&self) -> Duration {
        Duration::from_millis(self.add_category_delay_ms)
    }

    pub const fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lookup_delay_ms: Self::DEFAULT_LOOKUP_DELAY_MS,
            add_category_delay_ms: Self::DEFAULT_ADD_CATEGORY_DELAY_MS,
            error_display_ms: Self::DEFAULT_ERROR_DISPLAY_MS,
            categories: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    NoChange,
    Changed,
}

impl Outcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

impl core::ops::BitOr for Outcome {
    type Output = Outcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::NoChange, Self::NoChange) => Self::NoChange,
            _ => Self::Changed,
        }
    }
}

/// Result of asking for a cell's question.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    /// The lookup is under way and lands once the clock reaches its due time.
    Scheduled,
    AlreadyRevealed,
    /// Another lookup has not landed yet.
    Loading,
    /// A question is still waiting for its resolution.
    QuestionActive,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            Scheduled => true,
            AlreadyRevealed => false,
            Loading => false,
            QuestionActive => false,
        }
    }
}

/// Result of submitting a new category name.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AddOutcome {
    Scheduled,
    /// An earlier submission is still in flight.
    Busy,
}

impl AddOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Scheduled)
    }
}
