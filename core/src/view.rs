use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of one board cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub cell: CellKey,
    pub value: Points,
    pub revealed: bool,
}

impl CellView {
    /// `$<value>` while the cell is still selectable, blank once revealed.
    pub fn label(&self) -> String {
        if self.revealed {
            String::new()
        } else {
            format!("${}", self.value)
        }
    }
}

/// The question dialog, the answer is only present once revealed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionModal {
    pub category_id: CategoryId,
    pub value: Points,
    pub text: String,
    pub answer: Option<String>,
}

/// Snapshot of everything a presentation layer renders in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardFrame {
    pub categories: Vec<Category>,
    /// One row per difficulty level, one cell per category in column order.
    pub rows: Vec<Vec<CellView>>,
    pub score: Score,
    pub error: Option<String>,
    pub loading: bool,
    pub adding_category: bool,
    pub phase: RoundPhase,
    pub modal: Option<QuestionModal>,
}

impl BoardFrame {
    /// Add-category control is disabled while a submission is in flight.
    pub fn can_add_category(&self) -> bool {
        !self.adding_category
    }

    pub fn cell(&self, category_id: CategoryId, difficulty: Difficulty) -> Option<&CellView> {
        self.rows
            .get(usize::from(difficulty.level()))?
            .iter()
            .find(|view| view.cell.category == category_id)
    }
}

impl<B: QuestionBank> RoundEngine<B> {
    pub fn frame(&self) -> BoardFrame {
        let rows = Difficulty::all()
            .map(|difficulty| {
                self.registry()
                    .iter()
                    .map(|category| {
                        let cell = CellKey::new(category.id, difficulty);
                        CellView {
                            cell,
                            value: cell.value(),
                            revealed: self.board().is_revealed(cell),
                        }
                    })
                    .collect()
            })
            .collect();

        let modal = self.active_question().map(|question| QuestionModal {
            category_id: question.category_id,
            value: question.value,
            text: question.text.clone(),
            answer: self
                .is_answer_revealed()
                .then(|| question.answer.clone()),
        });

        BoardFrame {
            categories: self.registry().iter().cloned().collect(),
            rows,
            score: self.score(),
            error: self.error_message().map(String::from),
            loading: self.is_loading() || self.is_adding_category(),
            adding_category: self.is_adding_category(),
            phase: self.phase(),
            modal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(level: u8) -> Difficulty {
        Difficulty::new(level).unwrap()
    }

    #[test]
    fn fresh_board_shows_every_value() {
        let frame = RoundEngine::standard().frame();

        assert_eq!(frame.rows.len(), 5);
        assert!(frame.rows.iter().all(|row| row.len() == 5));
        let labels: Vec<_> = frame.rows.iter().map(|row| row[0].label()).collect();
        assert_eq!(labels, ["$100", "$200", "$300", "$400", "$500"]);
        assert!(frame.modal.is_none());
        assert!(!frame.loading);
    }

    #[test]
    fn revealed_cell_renders_blank_and_modal_hides_answer() {
        let mut engine = RoundEngine::standard();
        engine.select_question(3, 0).unwrap();
        assert!(engine.frame().loading);
        engine.settle();

        let frame = engine.frame();
        assert_eq!(frame.cell(3, level(0)).unwrap().label(), "");
        assert_eq!(frame.cell(3, level(1)).unwrap().label(), "$200");
        let modal = frame.modal.unwrap();
        assert_eq!(modal.text, "This is the largest ocean on Earth");
        assert_eq!(modal.answer, None);

        engine.reveal_answer().unwrap();
        let modal = engine.frame().modal.unwrap();
        assert_eq!(modal.answer.as_deref(), Some("What is the Pacific Ocean?"));
    }

    #[test]
    fn new_category_adds_a_column() {
        let mut engine = RoundEngine::standard();
        engine.add_category("Music").unwrap();

        let frame = engine.frame();
        assert!(!frame.can_add_category());
        assert!(frame.loading);

        engine.settle();
        let frame = engine.frame();
        assert_eq!(frame.categories.len(), 6);
        assert!(frame.rows.iter().all(|row| row.len() == 6));
        assert_eq!(frame.cell(6, level(4)).unwrap().label(), "$500");
    }

    #[test]
    fn frame_serializes_for_external_renderers() {
        let frame = RoundEngine::standard().frame();

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["score"], 0);
        assert_eq!(json["categories"][0]["name"], "Science");
        assert_eq!(json["phase"], "Idle");
    }
}
