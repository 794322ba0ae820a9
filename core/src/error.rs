use alloc::string::String;
use thiserror::Error;

use crate::Points;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Category name is empty")]
    EmptyName,
    #[error("Category already exists")]
    DuplicateCategory,
    #[error("Invalid category")]
    InvalidCategory,
    #[error("Invalid difficulty level {0}")]
    InvalidDifficulty(u8),
    #[error("Invalid question value ${0}")]
    InvalidValue(Points),
    #[error("No question found for {category} with value ${value}")]
    QuestionNotFound { category: String, value: Points },
    #[error("No question is being asked")]
    NoActiveQuestion,
    #[error("Question text and answer must not be empty")]
    EmptyQuestion,
    #[error("A question already exists for {category} with value ${value}")]
    DuplicateQuestion { category: String, value: Points },
    #[error("Malformed question key {0:?}")]
    InvalidQuestionKey(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
