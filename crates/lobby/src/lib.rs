pub mod attempt;
pub mod error;

pub use attempt::{wait_until_terminal, Attempt};
pub use session::{Action, AttemptState, Report, Status};

use dashmap::DashMap;
use db::QuestionStore;
use model::{Profile, QuizDefinition, QuizId, UserId};
use std::sync::Arc;
use tokio::sync::watch;

type Key = (UserId, QuizId);
type Registry = DashMap<Key, Attempt>;

/// Registry of the attempts currently held by each user.
pub struct Lobby<S: ?Sized> {
    store: Arc<S>,
    /// At most one attempt per user and quiz.
    attempts: Registry,
}

impl<S> Lobby<S>
where
    S: QuestionStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store, attempts: Registry::new() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a fresh attempt. A concluded attempt at the same quiz is replaced;
    /// one that is still loading or running is left alone.
    pub fn begin(&self, user: UserId, quiz: QuizDefinition) -> error::Result<watch::Receiver<AttemptState>> {
        use dashmap::mapref::entry::Entry::{Occupied, Vacant};
        match self.attempts.entry((user, quiz.id.clone())) {
            Occupied(mut entry) => {
                if !entry.get().status().is_terminal() {
                    return Err(error::Error::AlreadyStarted);
                }
                let attempt = Attempt::start(Arc::clone(&self.store), quiz);
                let state = attempt.subscribe();
                drop(entry.insert(attempt));
                Ok(state)
            }
            Vacant(entry) => {
                let attempt = Attempt::start(Arc::clone(&self.store), quiz);
                let state = attempt.subscribe();
                entry.insert(attempt);
                Ok(state)
            }
        }
    }

    pub fn subscribe(&self, user: &UserId, quiz: &QuizId) -> error::Result<watch::Receiver<AttemptState>> {
        let key = (user.clone(), quiz.clone());
        let attempt = self.attempts.get(&key).ok_or(error::Error::UnknownAttempt)?;
        Ok(attempt.subscribe())
    }

    pub fn dispatch(&self, user: &UserId, quiz: &QuizId, action: Action) -> error::Result<()> {
        let key = (user.clone(), quiz.clone());
        self.attempts.get(&key).ok_or(error::Error::UnknownAttempt)?.dispatch(action);
        Ok(())
    }

    /// Tears down the attempt, whatever its status. Returns `false` if there was none.
    pub fn abandon(&self, user: &UserId, quiz: &QuizId) -> bool {
        let key = (user.clone(), quiz.clone());
        let Some((_, attempt)) = self.attempts.remove(&key) else {
            return false;
        };

        if !attempt.status().is_terminal() {
            log::info!("User {user} abandoned quiz {quiz}.");
        }
        attempt.dispose();
        true
    }

    pub fn report(&self, user: &UserId, quiz: &QuizId, candidate: Profile) -> error::Result<Report> {
        let key = (user.clone(), quiz.clone());
        let attempt = self.attempts.get(&key).ok_or(error::Error::UnknownAttempt)?;
        attempt.report(candidate).ok_or(error::Error::NotFinished)
    }
}
