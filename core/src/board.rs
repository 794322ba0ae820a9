use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells that have shown their question during the current game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    revealed: HashSet<CellKey>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_revealed(&self, cell: CellKey) -> bool {
        self.revealed.contains(&cell)
    }

    pub fn mark_revealed(&mut self, cell: CellKey) -> Outcome {
        if self.revealed.insert(cell) {
            log::trace!("cell revealed: {}", cell);
            Outcome::Changed
        } else {
            Outcome::NoChange
        }
    }

    pub fn reset_all(&mut self) -> Outcome {
        if self.revealed.is_empty() {
            return Outcome::NoChange;
        }
        self.revealed.clear();
        Outcome::Changed
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn iter_revealed(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.revealed.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(category: CategoryId, level: u8) -> CellKey {
        CellKey::new(category, Difficulty::new(level).unwrap())
    }

    #[test]
    fn mark_revealed_is_idempotent() {
        let mut board = BoardState::new();

        assert_eq!(board.mark_revealed(cell(1, 0)), Outcome::Changed);
        assert_eq!(board.mark_revealed(cell(1, 0)), Outcome::NoChange);
        assert!(board.is_revealed(cell(1, 0)));
        assert!(!board.is_revealed(cell(1, 1)));
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn reset_all_clears_every_cell() {
        let mut board = BoardState::new();
        board.mark_revealed(cell(1, 0));
        board.mark_revealed(cell(2, 4));

        assert_eq!(board.reset_all(), Outcome::Changed);
        assert_eq!(board.reset_all(), Outcome::NoChange);
        assert_eq!(board.iter_revealed().count(), 0);
    }
}
