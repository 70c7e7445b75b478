use db::QuestionStore;
use lobby::{Action, AttemptState, Lobby, Status};
use model::{QuizId, UserId, OPTION_COUNT};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands: 1-4 or a-d to answer, n (next), p (previous), t (time left), s (submit), q (quit)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Choose(u8),
    Next,
    Previous,
    Submit,
    Time,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    Some(match line.as_str() {
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Previous,
        "s" | "submit" => Command::Submit,
        "t" | "time" => Command::Time,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" => Command::Quit,
        "a" | "b" | "c" | "d" => Command::Choose(line.as_bytes()[0] - b'a'),
        other => {
            let choice: u8 = other.parse().ok()?;
            if !(1..=OPTION_COUNT).contains(&usize::from(choice)) {
                return None;
            }
            Command::Choose(choice - 1)
        }
    })
}

pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Renders the question under the cursor, marking the selected option.
pub fn render_question(state: &AttemptState) -> Option<String> {
    let question = state.current_question()?;
    let selected = state.answer_for(&question.id);
    let mut text = format!("[{}/{}] {}", state.current_index() + 1, state.questions().len(), question.text);
    for (option, label) in (0..).zip(question.options.iter()) {
        let marker = if selected == Some(option) { '*' } else { ' ' };
        text.push_str(&format!("\n {marker} {}) {label}", option + 1));
    }
    Some(text)
}

/// Whether the countdown is worth announcing at this many seconds left.
fn is_milestone(secs: u32) -> bool {
    secs <= 10 || secs % 60 == 0
}

/// Runs the attempt interactively until it concludes or the user walks away.
/// Walking away abandons the attempt.
pub async fn drive<S>(lobby: &Lobby<S>, user: &UserId, quiz: &QuizId) -> anyhow::Result<AttemptState>
where
    S: QuestionStore + ?Sized + 'static,
{
    let mut state = lobby.subscribe(user, quiz)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = None;
    let mut announced = None;

    loop {
        let current = state.borrow_and_update().clone();
        match current.status() {
            Status::NotStarted | Status::Loading => {}
            Status::Active => {
                let view = current.current_question().map(|q| (current.current_index(), current.answer_for(&q.id)));
                if view != shown {
                    shown = view;
                    if let Some(text) = render_question(&current) {
                        println!("{text}");
                    }
                }
                let secs = current.remaining_secs();
                if announced != Some(secs) && is_milestone(secs) {
                    announced = Some(secs);
                    println!("{} remaining.", format_time(secs));
                }
            }
            Status::Finished | Status::Error => return Ok(current),
        }

        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    return Ok(state.borrow().clone());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    lobby.abandon(user, quiz);
                    anyhow::bail!("input closed before the attempt was submitted");
                };
                let action = match parse(&line) {
                    Some(Command::Choose(choice)) => match current.current_question() {
                        Some(question) => Action::Select { question: question.id.clone(), choice },
                        None => continue,
                    },
                    Some(Command::Next) => Action::Next,
                    Some(Command::Previous) => Action::Previous,
                    Some(Command::Submit) => Action::Submit,
                    Some(Command::Time) => {
                        println!("{} remaining.", format_time(current.remaining_secs()));
                        continue;
                    }
                    Some(Command::Quit) => {
                        lobby.abandon(user, quiz);
                        anyhow::bail!("attempt abandoned");
                    }
                    Some(Command::Help) | None => {
                        println!("{HELP}");
                        continue;
                    }
                };
                lobby.dispatch(user, quiz, action)?;
            }
            _ = tokio::signal::ctrl_c() => {
                lobby.abandon(user, quiz);
                anyhow::bail!("attempt abandoned");
            }
        }
    }
}
