use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub text: String,
    pub answer: String,
}

impl QuestionRecord {
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
        }
    }
}

/// Read-only source of questions, keyed by lowercased category name and value.
pub trait QuestionBank {
    fn lookup(&self, category: &str, value: Points) -> Option<&QuestionRecord>;

    fn contains(&self, category: &str, value: Points) -> bool {
        self.lookup(category, value).is_some()
    }
}

/// A [`QuestionBank`] that accepts new entries at runtime.
pub trait QuestionStore: QuestionBank {
    fn insert(&mut self, category: &str, value: Points, record: QuestionRecord) -> Result<()>;
}

/// Formats the external lookup key, `"<category>-<value>"`.
pub fn question_key(category: &str, value: Points) -> String {
    format!("{}-{}", category, value)
}

/// Splits a `"<category>-<value>"` key, the category part may itself contain dashes.
pub fn parse_question_key(key: &str) -> Result<(String, Points)> {
    let invalid = || GameError::InvalidQuestionKey(key.to_string());
    let (category, value) = key.rsplit_once('-').ok_or_else(invalid)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(invalid());
    }
    let value: Points = value.trim().parse().map_err(|_| invalid())?;
    Difficulty::from_value(value)?;
    Ok((category.to_lowercase(), value))
}

const SEED_QUESTIONS: [(&str, &str, &str); 10] = [
    (
        "science-100",
        "This gas makes up about 78% of Earth's atmosphere",
        "What is Nitrogen?",
    ),
    (
        "science-200",
        "This element has the atomic number 79",
        "What is Gold?",
    ),
    (
        "history-100",
        "This document, signed in 1776, declared American independence from Great Britain",
        "What is the Declaration of Independence?",
    ),
    (
        "history-200",
        "This ancient wonder was a lighthouse built in Alexandria, Egypt",
        "What is the Lighthouse of Alexandria?",
    ),
    (
        "geography-100",
        "This is the largest ocean on Earth",
        "What is the Pacific Ocean?",
    ),
    (
        "geography-200",
        "This African country is home to the Nile River and the Pyramids of Giza",
        "What is Egypt?",
    ),
    (
        "entertainment-100",
        "This Disney movie features a lion cub named Simba",
        "What is The Lion King?",
    ),
    (
        "entertainment-200",
        "This actor played Iron Man in the Marvel Cinematic Universe",
        "Who is Robert Downey Jr.?",
    ),
    (
        "sports-100",
        "This sport uses a shuttlecock",
        "What is Badminton?",
    ),
    (
        "sports-200",
        "This athlete holds the record for most Olympic gold medals",
        "Who is Michael Phelps?",
    ),
];

/// In-memory question table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticQuestionBank {
    questions: BTreeMap<String, QuestionRecord>,
}

impl StaticQuestionBank {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock table shipped with the game.
    pub fn seeded() -> Self {
        let questions = SEED_QUESTIONS
            .iter()
            .map(|&(key, text, answer)| (key.to_string(), QuestionRecord::new(text, answer)))
            .collect();
        Self { questions }
    }

    /// Builds a bank from `"<category>-<value>"` keyed entries, later entries replace earlier ones.
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, QuestionRecord)>,
        K: AsRef<str>,
    {
        let mut bank = Self::empty();
        bank.merge(entries)?;
        Ok(bank)
    }

    /// Adds or replaces entries, nothing is inserted if any key is malformed.
    pub fn merge<I, K>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, QuestionRecord)>,
        K: AsRef<str>,
    {
        let mut parsed = BTreeMap::new();
        for (key, record) in entries {
            let (category, value) = parse_question_key(key.as_ref())?;
            parsed.insert(question_key(&category, value), record);
        }
        self.questions.extend(parsed);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.questions.keys().map(String::as_str)
    }
}

impl QuestionBank for StaticQuestionBank {
    fn lookup(&self, category: &str, value: Points) -> Option<&QuestionRecord> {
        self.questions.get(&question_key(category, value))
    }
}

impl QuestionStore for StaticQuestionBank {
    fn insert(&mut self, category: &str, value: Points, record: QuestionRecord) -> Result<()> {
        use alloc::collections::btree_map::Entry;

        Difficulty::from_value(value)?;
        match self.questions.entry(question_key(category, value)) {
            Entry::Occupied(_) => Err(GameError::DuplicateQuestion {
                category: category.to_string(),
                value,
            }),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_bank_holds_the_stock_table() {
        let bank = StaticQuestionBank::seeded();

        assert_eq!(bank.len(), 10);
        let record = bank.lookup("science", 100).unwrap();
        assert_eq!(record.text, "This gas makes up about 78% of Earth's atmosphere");
        assert_eq!(record.answer, "What is Nitrogen?");
        assert!(bank.contains("sports", 200));
        assert!(!bank.contains("history", 500));
    }

    #[test]
    fn lookup_is_case_sensitive_on_the_key() {
        let bank = StaticQuestionBank::seeded();

        assert!(bank.lookup("Science", 100).is_none());
    }

    #[test]
    fn parse_key_handles_dashed_categories() {
        assert_eq!(
            parse_question_key("Pop-Culture-300"),
            Ok(("pop-culture".to_string(), 300))
        );
        assert!(matches!(
            parse_question_key("science"),
            Err(GameError::InvalidQuestionKey(_))
        ));
        assert!(matches!(
            parse_question_key("-100"),
            Err(GameError::InvalidQuestionKey(_))
        ));
        assert_eq!(
            parse_question_key("science-250"),
            Err(GameError::InvalidValue(250))
        );
    }

    #[test]
    fn merge_is_all_or_nothing() {
        let mut bank = StaticQuestionBank::empty();

        let result = bank.merge([
            ("art-100", QuestionRecord::new("q", "a")),
            ("art", QuestionRecord::new("q", "a")),
        ]);

        assert!(result.is_err());
        assert!(bank.is_empty());
    }

    #[test]
    fn insert_rejects_existing_entries() {
        let mut bank = StaticQuestionBank::seeded();

        let duplicate = bank.insert("science", 100, QuestionRecord::new("q", "a"));
        assert_eq!(
            duplicate,
            Err(GameError::DuplicateQuestion {
                category: "science".into(),
                value: 100
            })
        );

        bank.insert("science", 300, QuestionRecord::new("q", "a")).unwrap();
        assert_eq!(bank.lookup("science", 300).unwrap().answer, "a");
    }
}
