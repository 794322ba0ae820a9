use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use quizboard_core::{GameConfig, QuestionRecord, RoundEngine, StaticQuestionBank};
use serde::{Deserialize, Serialize};

/// Contents of the optional TOML settings file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    #[serde(flatten)]
    pub game: GameConfig,
    /// Start from the stock question table before adding `questions`.
    pub seed_questions: bool,
    /// Extra entries keyed `"<category>-<value>"`.
    pub questions: BTreeMap<String, QuestionRecord>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed_questions: true,
            questions: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub(crate) fn question_bank(&self) -> Result<StaticQuestionBank> {
        let mut bank = if self.seed_questions {
            StaticQuestionBank::seeded()
        } else {
            StaticQuestionBank::empty()
        };
        bank.merge(self.questions.iter().map(|(key, record)| (key, record.clone())))?;
        Ok(bank)
    }

    pub(crate) fn build_engine(&self) -> Result<RoundEngine> {
        let bank = self.question_bank()?;
        log::debug!("question bank holds {} entries", bank.len());
        Ok(RoundEngine::new(&self.game, bank)?)
    }
}
