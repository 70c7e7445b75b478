use core::time::Duration;
use db::QuestionStore;
use model::{Profile, QuestionId, QuizDefinition};
use session::{Action, AttemptState, Report, Session, Status, Tick};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time,
};

const TICK: Duration = Duration::from_secs(1);

/// Handle to one running attempt at a quiz.
///
/// The attempt lives in its own task, which serializes the question lookup,
/// the countdown and the user's actions. Dropping the handle aborts that task
/// and with it the countdown.
pub struct Attempt {
    quiz: QuizDefinition,
    actions: mpsc::UnboundedSender<Action>,
    state: watch::Receiver<AttemptState>,
    task: JoinHandle<()>,
}

impl Attempt {
    /// Spawns the attempt and immediately requests its questions from the store.
    pub fn start<S>(store: Arc<S>, quiz: QuizDefinition) -> Self
    where
        S: QuestionStore + ?Sized + 'static,
    {
        let mut session = Session::new(quiz.clone());
        assert!(session.start());

        let (publisher, state) = watch::channel(session.state().clone());
        let (actions, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, session, rx, publisher));
        Self { quiz, actions, state, task }
    }

    pub const fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub fn status(&self) -> Status {
        self.state.borrow().status()
    }

    pub fn snapshot(&self) -> AttemptState {
        self.state.borrow().clone()
    }

    /// Change notifications for the presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<AttemptState> {
        self.state.clone()
    }

    /// Forwards an action to the attempt. Actions sent after the attempt has
    /// ended are dropped, just like any action that does not fit the status.
    pub fn dispatch(&self, action: Action) {
        if self.actions.send(action).is_err() {
            log::debug!("Dropped an action for a concluded attempt at quiz {}.", self.quiz.id);
        }
    }

    pub fn select_answer(&self, question: QuestionId, choice: u8) {
        self.dispatch(Action::Select { question, choice });
    }

    pub fn next_question(&self) {
        self.dispatch(Action::Next);
    }

    pub fn previous_question(&self) {
        self.dispatch(Action::Previous);
    }

    pub fn submit(&self) {
        self.dispatch(Action::Submit);
    }

    /// Resolves once the questions have been loaded or have failed to load.
    pub async fn started(&self) -> AttemptState {
        wait_for(self.subscribe(), |status| !matches!(status, Status::NotStarted | Status::Loading)).await
    }

    /// Resolves once the attempt is finished or has failed.
    pub async fn finished(&self) -> AttemptState {
        wait_until_terminal(self.subscribe()).await
    }

    /// Builds the exportable result. Only available once the attempt is finished.
    pub fn report(&self, candidate: Profile) -> Option<Report> {
        let score = *self.state.borrow().score()?;
        Some(Report::new(&self.quiz, score, candidate))
    }

    /// Tears the attempt down without reporting anything.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Attempt {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Waits on a state subscription until the attempt reaches a terminal status.
/// Returns the last published state if the attempt is torn down first.
pub async fn wait_until_terminal(state: watch::Receiver<AttemptState>) -> AttemptState {
    wait_for(state, Status::is_terminal).await
}

async fn wait_for<F>(mut state: watch::Receiver<AttemptState>, done: F) -> AttemptState
where
    F: Fn(Status) -> bool,
{
    loop {
        let current = state.borrow_and_update().clone();
        if done(current.status()) {
            return current;
        }
        if state.changed().await.is_err() {
            return state.borrow().clone();
        }
    }
}

fn apply(session: &mut Session, action: Action) {
    if let Err(err) = session.dispatch(action) {
        log::warn!("Rejected action for quiz {} while {:?}: {err}", session.quiz().id, session.status());
    }
}

async fn run<S>(
    store: Arc<S>,
    mut session: Session,
    mut actions: mpsc::UnboundedReceiver<Action>,
    publisher: watch::Sender<AttemptState>,
) where
    S: QuestionStore + ?Sized,
{
    let quiz = session.quiz().id.clone();

    // Actions that arrive before the questions do are applied to a loading
    // session, which rejects them.
    let lookup = store.get_questions(&quiz);
    tokio::pin!(lookup);
    let result = loop {
        tokio::select! {
            biased;
            result = &mut lookup => break result,
            Some(action) = actions.recv() => apply(&mut session, action),
        }
    };

    let status = session.load(result);
    publisher.send_replace(session.state().clone());
    if status != Status::Active {
        log::warn!("Attempt at quiz {quiz} could not start: {}", session.state().error().unwrap_or_default());
        return;
    }

    log::info!("Attempt at quiz {quiz} started with {} questions.", session.state().questions().len());

    // The first tick is due one full second after activation.
    let mut ticker = time::interval_at(time::Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    while session.status() == Status::Active {
        tokio::select! {
            biased;
            Some(action) = actions.recv() => apply(&mut session, action),
            _ = ticker.tick() => match session.tick() {
                Tick::Expired => log::info!("Time is up for quiz {quiz}."),
                Tick::Counted(secs) if secs <= 10 => log::debug!("{secs} seconds left on quiz {quiz}."),
                _ => {}
            },
        }
        publisher.send_replace(session.state().clone());
    }

    // No tick may reach a concluded session.
    drop(ticker);

    if let Some(score) = session.state().score() {
        log::info!(
            "Attempt at quiz {quiz} finished: {} correct, {} incorrect, {} unanswered, {} points.",
            score.correct,
            score.incorrect,
            score.unanswered,
            score.points,
        );
    }
}
