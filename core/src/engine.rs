use alloc::string::{String, ToString};
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    Loading,
    AwaitingReveal,
    AnswerRevealed,
}

impl RoundPhase {
    pub const fn is_question_active(self) -> bool {
        matches!(self, Self::AwaitingReveal | Self::AnswerRevealed)
    }
}

impl Default for RoundPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// The question currently being asked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuestion {
    pub text: String,
    pub answer: String,
    pub value: Points,
    pub category_id: CategoryId,
}

/// User-visible error message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    /// Bumped for every raised notice, dismissal timers only clear their own generation.
    pub generation: u64,
    /// Transient notices clear themselves after the configured display time.
    pub transient: bool,
}

/// Score change produced by answering the active question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub question: ActiveQuestion,
    pub correct: bool,
    pub delta: Score,
    pub score: Score,
}

#[derive(Clone, Debug, PartialEq)]
enum Deferred {
    Lookup(CellKey),
    CommitCategory(String),
    DismissNotice(u64),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Delays {
    lookup: Duration,
    add_category: Duration,
    error_display: Duration,
}

impl From<&GameConfig> for Delays {
    fn from(config: &GameConfig) -> Self {
        Self {
            lookup: config.lookup_delay(),
            add_category: config.add_category_delay(),
            error_display: config.error_display(),
        }
    }
}

/// Owns the whole game state, every mutation goes through one of its commands.
///
/// Delayed effects are queued on an internal [`Scheduler`] and only land when the owner moves the
/// clock with [`RoundEngine::advance`] or [`RoundEngine::advance_to`].
#[derive(Clone, Debug)]
pub struct RoundEngine<B = StaticQuestionBank> {
    delays: Delays,
    registry: CategoryRegistry,
    board: BoardState,
    bank: B,
    score: Score,
    active: Option<ActiveQuestion>,
    answer_revealed: bool,
    pending_lookup: Option<CellKey>,
    pending_category: Option<String>,
    notice: Option<Notice>,
    notice_generation: u64,
    scheduler: Scheduler<Deferred>,
}

impl RoundEngine<StaticQuestionBank> {
    /// Stock categories, stock questions and default delays.
    pub fn standard() -> Self {
        Self::with_registry(
            &GameConfig::default(),
            CategoryRegistry::stock(),
            StaticQuestionBank::seeded(),
        )
    }
}

impl<B: QuestionBank> RoundEngine<B> {
    pub fn new(config: &GameConfig, bank: B) -> Result<Self> {
        let registry = CategoryRegistry::with_names(&config.categories)?;
        Ok(Self::with_registry(config, registry, bank))
    }

    pub fn with_registry(config: &GameConfig, registry: CategoryRegistry, bank: B) -> Self {
        Self {
            delays: config.into(),
            registry,
            board: BoardState::new(),
            bank,
            score: 0,
            active: None,
            answer_revealed: false,
            pending_lookup: None,
            pending_category: None,
            notice: None,
            notice_generation: 0,
            scheduler: Scheduler::new(),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        match (&self.active, self.answer_revealed) {
            (Some(_), false) => RoundPhase::AwaitingReveal,
            (Some(_), true) => RoundPhase::AnswerRevealed,
            (None, _) if self.pending_lookup.is_some() => RoundPhase::Loading,
            (None, _) => RoundPhase::Idle,
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn active_question(&self) -> Option<&ActiveQuestion> {
        self.active.as_ref()
    }

    pub fn is_answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.message.as_str())
    }

    /// A question lookup is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending_lookup.is_some()
    }

    /// A category submission is in flight.
    pub fn is_adding_category(&self) -> bool {
        self.pending_category.is_some()
    }

    pub fn is_revealed(&self, category_id: CategoryId, difficulty: Difficulty) -> bool {
        self.board.is_revealed(CellKey::new(category_id, difficulty))
    }

    /// Starts the lookup for a cell, the question shows up once the lookup delay has passed.
    pub fn select_question(&mut self, category_id: CategoryId, level: u8) -> Result<SelectOutcome> {
        let difficulty = Difficulty::new(level)?;
        let Some(category) = self.registry.find_by_id(category_id) else {
            log::debug!("select on unknown category {}", category_id);
            self.raise(GameError::InvalidCategory, false);
            return Err(GameError::InvalidCategory);
        };
        let cell = CellKey::new(category.id, difficulty);

        if self.board.is_revealed(cell) {
            log::trace!("cell {} already revealed", cell);
            return Ok(SelectOutcome::AlreadyRevealed);
        }
        if let Some(pending) = self.pending_lookup {
            log::trace!("cell {} ignored, lookup for {} in flight", cell, pending);
            return Ok(SelectOutcome::Loading);
        }
        if self.active.is_some() {
            log::trace!("cell {} ignored, a question is active", cell);
            return Ok(SelectOutcome::QuestionActive);
        }

        self.pending_lookup = Some(cell);
        let due = self.scheduler.schedule(self.delays.lookup, Deferred::Lookup(cell));
        log::debug!("lookup for {} ({}) due at {:?}", cell, category.name, due);
        Ok(SelectOutcome::Scheduled)
    }

    pub fn reveal_answer(&mut self) -> Result<Outcome> {
        if self.active.is_none() {
            return Err(GameError::NoActiveQuestion);
        }
        if self.answer_revealed {
            return Ok(Outcome::NoChange);
        }
        self.answer_revealed = true;
        log::debug!("answer revealed");
        Ok(Outcome::Changed)
    }

    /// Applies the self-reported result, allowed whether or not the answer was shown first.
    pub fn resolve_answer(&mut self, correct: bool) -> Result<Resolution> {
        let question = self.active.take().ok_or(GameError::NoActiveQuestion)?;
        self.answer_revealed = false;

        let value = Score::from(question.value);
        let delta = if correct { value } else { -value };
        self.score = self.score.saturating_add(delta);
        log::debug!("answer resolved: correct={} delta={} score={}", correct, delta, self.score);

        Ok(Resolution {
            question,
            correct,
            delta,
            score: self.score,
        })
    }

    /// Submits a category, it joins the board once the add delay has passed.
    ///
    /// Blank names are rejected without raising a notice.
    pub fn add_category(&mut self, name: &str) -> Result<AddOutcome> {
        if let Some(pending) = &self.pending_category {
            log::trace!("category {:?} ignored, {:?} in flight", name, pending);
            return Ok(AddOutcome::Busy);
        }

        let name = match self.registry.validate(name) {
            Ok(name) => name.to_string(),
            Err(GameError::EmptyName) => {
                log::trace!("blank category name ignored");
                return Err(GameError::EmptyName);
            }
            Err(err) => {
                self.raise(err.clone(), false);
                return Err(err);
            }
        };

        let due = self
            .scheduler
            .schedule(self.delays.add_category, Deferred::CommitCategory(name.clone()));
        log::debug!("category {:?} due at {:?}", name, due);
        self.pending_category = Some(name);
        Ok(AddOutcome::Scheduled)
    }

    /// Clears revealed cells and the score, an active question is left alone.
    pub fn reset_game(&mut self) -> Outcome {
        let score_changed = if self.score != 0 {
            self.score = 0;
            Outcome::Changed
        } else {
            Outcome::NoChange
        };
        let outcome = self.board.reset_all() | score_changed;
        log::debug!("game reset ({:?})", outcome);
        outcome
    }

    /// Clears revealed cells, the score is kept.
    pub fn refresh_board(&mut self) -> Outcome {
        let outcome = self.board.reset_all();
        log::debug!("board refreshed ({:?})", outcome);
        outcome
    }

    pub fn dismiss_error(&mut self) -> Outcome {
        match self.notice.take() {
            Some(_) => Outcome::Changed,
            None => Outcome::NoChange,
        }
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Moves the clock forward by `elapsed`, returns how many deferred tasks fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let target = self.scheduler.now().saturating_add(elapsed);
        self.advance_to(target)
    }

    /// Moves the clock to `now`, firing every task due on the way in order.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(now) {
            self.run(task);
            fired += 1;
        }
        self.scheduler.set_now(now);
        fired
    }

    /// Moves the clock until no lookup or category submission is in flight.
    pub fn settle(&mut self) -> usize {
        let mut fired = 0;
        while self.is_loading() || self.is_adding_category() {
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            fired += self.advance_to(due);
        }
        fired
    }

    /// Fires every queued task, including notice dismissals.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            fired += self.advance_to(due);
        }
        fired
    }

    fn run(&mut self, task: Deferred) {
        log::trace!("deferred task fired at {:?}: {:?}", self.scheduler.now(), task);
        match task {
            Deferred::Lookup(cell) => self.complete_lookup(cell),
            Deferred::CommitCategory(name) => self.commit_category(name),
            Deferred::DismissNotice(generation) => self.dismiss_notice(generation),
        }
    }

    fn complete_lookup(&mut self, cell: CellKey) {
        self.pending_lookup = None;

        let Some(category) = self.registry.find_by_id(cell.category) else {
            log::warn!("lookup landed for unknown category {}", cell.category);
            return;
        };
        let category_name = category.bank_name();
        let value = cell.value();

        match self.bank.lookup(&category_name, value).cloned() {
            Some(record) => {
                self.board.mark_revealed(cell);
                self.active = Some(ActiveQuestion {
                    text: record.text,
                    answer: record.answer,
                    value,
                    category_id: cell.category,
                });
                self.answer_revealed = false;
                log::debug!("question active for {}", cell);
            }
            None => {
                log::debug!("no question for {}", question_key(&category_name, value));
                self.raise(
                    GameError::QuestionNotFound {
                        category: category_name,
                        value,
                    },
                    true,
                );
            }
        }
    }

    fn commit_category(&mut self, name: String) {
        self.pending_category = None;
        if let Err(err) = self.registry.add(&name) {
            log::warn!("category {:?} rejected on commit: {}", name, err);
            self.raise(err, false);
        }
    }

    fn raise(&mut self, error: GameError, transient: bool) {
        self.notice_generation += 1;
        let generation = self.notice_generation;
        self.notice = Some(Notice {
            message: error.to_string(),
            generation,
            transient,
        });
        if transient {
            self.scheduler
                .schedule(self.delays.error_display, Deferred::DismissNotice(generation));
        }
        log::debug!("notice {} raised: {}", generation, error);
    }

    fn dismiss_notice(&mut self, generation: u64) {
        match &self.notice {
            Some(notice) if notice.generation == generation => {
                self.notice = None;
                log::trace!("notice {} dismissed", generation);
            }
            _ => log::trace!("stale dismissal for notice {}", generation),
        }
    }
}

impl<B: QuestionStore> RoundEngine<B> {
    /// Adds a question for an existing category, available immediately.
    pub fn add_question(
        &mut self,
        category_id: CategoryId,
        value: Points,
        text: &str,
        answer: &str,
    ) -> Result<()> {
        let category = self
            .registry
            .find_by_id(category_id)
            .ok_or(GameError::InvalidCategory)?;
        Difficulty::from_value(value)?;

        let (text, answer) = (text.trim(), answer.trim());
        if text.is_empty() || answer.is_empty() {
            return Err(GameError::EmptyQuestion);
        }

        let category_name = category.bank_name();
        self.bank
            .insert(&category_name, value, QuestionRecord::new(text, answer))?;
        log::debug!("question added: {}", question_key(&category_name, value));
        Ok(())
    }
}
