#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod report;

mod countdown;
mod score;

pub use countdown::Countdown;
pub use model::{Question, QuestionId, QuizDefinition};
pub use report::Report;
pub use score::Score;

use alloc::{boxed::Box, collections::BTreeMap, string::ToString, sync::Arc, vec::Vec};
use core::fmt::Display;
use model::OPTION_COUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    /// Waiting on the question store.
    Loading,
    /// Counting down and accepting answers.
    Active,
    Finished,
    /// The questions could not be loaded.
    Error,
}

impl Status {
    /// Whether no further transition can happen.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Error)
    }
}

/// User input forwarded by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Select { question: QuestionId, choice: u8 },
    Next,
    Previous,
    Submit,
}

/// What a single one-second tick did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The session was not counting down.
    Ignored,
    /// Seconds left after this tick.
    Counted(u32),
    /// Time ran out and the attempt was submitted.
    Expired,
}

/// Everything the presentation layer may render about an attempt.
#[derive(Clone, Debug)]
pub struct AttemptState {
    status: Status,
    questions: Arc<[Question]>,
    /// Only answered questions have an entry.
    answers: BTreeMap<QuestionId, u8>,
    current: usize,
    countdown: Countdown,
    error: Option<Box<str>>,
    score: Option<Score>,
}

impl Default for AttemptState {
    fn default() -> Self {
        Self {
            status: Status::NotStarted,
            questions: Arc::from(Vec::new()),
            answers: BTreeMap::new(),
            current: 0,
            countdown: Countdown::default(),
            error: None,
            score: None,
        }
    }
}

impl AttemptState {
    pub const fn status(&self) -> Status {
        self.status
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub const fn answers(&self) -> &BTreeMap<QuestionId, u8> {
        &self.answers
    }

    pub fn answer_for(&self, question: &QuestionId) -> Option<u8> {
        self.answers.get(question).copied()
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub const fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Set only when the status is [`Status::Error`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set only when the status is [`Status::Finished`].
    pub const fn score(&self) -> Option<&Score> {
        self.score.as_ref()
    }
}

/// State machine of a single timed attempt at a quiz.
///
/// The session itself never blocks nor keeps time. Its owner feeds it the
/// result of the question lookup, one [`Session::tick`] per elapsed second and
/// the user's actions, all from one logical execution context.
pub struct Session {
    quiz: QuizDefinition,
    state: AttemptState,
}

impl Session {
    pub const EMPTY_QUIZ: &'static str = "This quiz has no questions.";

    pub fn new(quiz: QuizDefinition) -> Self {
        Self { quiz, state: AttemptState::default() }
    }

    pub const fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub const fn state(&self) -> &AttemptState {
        &self.state
    }

    pub const fn status(&self) -> Status {
        self.state.status
    }

    /// Moves a fresh session into [`Status::Loading`]. A session can only be
    /// started once; returns `false` on every later call.
    pub fn start(&mut self) -> bool {
        if self.state.status != Status::NotStarted {
            return false;
        }
        self.state.status = Status::Loading;
        true
    }

    /// Completes the question lookup requested by [`Session::start`].
    pub fn load<E: Display>(&mut self, result: Result<Vec<Question>, E>) -> Status {
        if self.state.status != Status::Loading {
            return self.state.status;
        }

        match result {
            Ok(questions) if questions.is_empty() => self.fail(Self::EMPTY_QUIZ.into()),
            Ok(questions) => {
                self.state.questions = questions.into();
                self.state.current = 0;
                self.state.countdown = Countdown::started(self.quiz.duration_secs());
                self.state.status = Status::Active;
            }
            Err(err) => self.fail(err.to_string().into_boxed_str()),
        }

        self.state.status
    }

    fn fail(&mut self, message: Box<str>) {
        self.state.error = Some(message);
        self.state.status = Status::Error;
    }

    /// Records an answer. A later selection for the same question replaces the earlier one.
    pub fn select_answer(&mut self, question: &QuestionId, choice: u8) -> error::Result<()> {
        if self.state.status != Status::Active {
            return Err(error::Error::NotActive);
        }

        if usize::from(choice) >= OPTION_COUNT {
            return Err(error::Error::OptionOutOfRange);
        }

        if !self.state.questions.iter().any(|q| q.id == *question) {
            return Err(error::Error::UnknownQuestion);
        }

        self.state.answers.insert(question.clone(), choice);
        Ok(())
    }

    /// Advances the cursor, staying put on the last question.
    pub fn next_question(&mut self) -> usize {
        if self.state.status == Status::Active {
            let last = self.state.questions.len().saturating_sub(1);
            self.state.current = (self.state.current + 1).min(last);
        }
        self.state.current
    }

    /// Moves the cursor back, staying put on the first question.
    pub fn previous_question(&mut self) -> usize {
        if self.state.status == Status::Active {
            self.state.current = self.state.current.saturating_sub(1);
        }
        self.state.current
    }

    /// Stops the countdown and grades the attempt. Returns `false` without
    /// touching anything unless the session is [`Status::Active`], which makes a
    /// manual submit racing the timeout harmless.
    pub fn submit(&mut self) -> bool {
        if self.state.status != Status::Active {
            return false;
        }

        self.state.countdown.stop();
        let score = Score::grade(&self.state.questions, &self.state.answers, self.quiz.marks_per_question);
        self.state.score = Some(score);
        self.state.status = Status::Finished;
        true
    }

    /// Accounts for one elapsed second. The tick that exhausts the countdown
    /// submits the attempt before returning.
    pub fn tick(&mut self) -> Tick {
        if self.state.status != Status::Active {
            return Tick::Ignored;
        }

        let Some(remaining) = self.state.countdown.tick() else {
            return Tick::Ignored;
        };

        if remaining > 0 {
            return Tick::Counted(remaining);
        }

        assert!(self.submit());
        Tick::Expired
    }

    pub fn dispatch(&mut self, action: Action) -> error::Result<()> {
        match action {
            Action::Select { question, choice } => return self.select_answer(&question, choice),
            Action::Next => {
                self.next_question();
            }
            Action::Previous => {
                self.previous_question();
            }
            Action::Submit => {
                self.submit();
            }
        }
        Ok(())
    }
}
