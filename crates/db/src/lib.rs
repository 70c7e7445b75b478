pub mod error;

mod memory;

use async_trait::async_trait;
use core::num::NonZeroU16;
use model::{Question, QuestionId, QuizDefinition, QuizId, OPTION_COUNT};

pub use futures_util::{TryStream, TryStreamExt};
pub use memory::MemoryStore;
pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Source of quiz definitions and their ordered questions.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn get_quiz(&self, quiz: &QuizId) -> error::Result<QuizDefinition>;

    /// Questions of the quiz in the order they are presented. The order is stable
    /// across calls.
    async fn get_questions(&self, quiz: &QuizId) -> error::Result<Vec<Question>>;
}

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn deserialize_quiz_from_row(id: &QuizId, row: tokio_postgres::Row) -> error::Result<QuizDefinition> {
    let title = row.try_get("title").map_err(|_| error::Error::Corrupted)?;
    let total: i16 = row.try_get("total_questions").map_err(|_| error::Error::Corrupted)?;
    let duration: i16 = row.try_get("duration_minutes").map_err(|_| error::Error::Corrupted)?;
    let marks: i16 = row.try_get("marks_per_question").map_err(|_| error::Error::Corrupted)?;

    let marks = u16::try_from(marks).ok().and_then(NonZeroU16::new).ok_or(error::Error::Corrupted)?;
    Ok(QuizDefinition {
        id: id.clone(),
        title,
        total_questions: u16::try_from(total).map_err(|_| error::Error::Corrupted)?,
        duration_minutes: u16::try_from(duration).map_err(|_| error::Error::Corrupted)?,
        marks_per_question: marks,
    })
}

fn deserialize_question_from_row(row: tokio_postgres::Row) -> error::Result<Question> {
    let id: String = row.try_get("id").map_err(|_| error::Error::Corrupted)?;
    let text = row.try_get("text").map_err(|_| error::Error::Corrupted)?;
    let options: Vec<String> = row.try_get("options").map_err(|_| error::Error::Corrupted)?;
    let answer: i16 = row.try_get("answer").map_err(|_| error::Error::Corrupted)?;

    let options: [String; OPTION_COUNT] = options.try_into().map_err(|_| error::Error::Corrupted)?;
    let answer = u8::try_from(answer).map_err(|_| error::Error::Corrupted)?;
    let question = Question { id: QuestionId::from(id), text, options, answer };
    if question.is_well_formed() {
        Ok(question)
    } else {
        Err(error::Error::Corrupted)
    }
}

impl Database {
    pub async fn create_quiz(&self, quiz: &QuizDefinition) -> error::Result<()> {
        let total = i16::try_from(quiz.total_questions).map_err(|_| error::Error::BadInput)?;
        let duration = i16::try_from(quiz.duration_minutes).map_err(|_| error::Error::BadInput)?;
        let marks = i16::try_from(quiz.marks_per_question.get()).map_err(|_| error::Error::BadInput)?;
        self.0
            .execute(
                "INSERT INTO quiz (id, title, total_questions, duration_minutes, marks_per_question) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[&quiz.id.as_str(), &quiz.title, &total, &duration, &marks],
            )
            .await?;
        Ok(())
    }

    /// Appends a question after the existing ones.
    pub async fn add_question(&self, quiz: &QuizId, question: &Question) -> error::Result<()> {
        if !question.is_well_formed() {
            return Err(error::Error::BadInput);
        }

        let options: &[String] = &question.options;
        let answer = i16::from(question.answer);
        self.0
            .execute(
                "INSERT INTO question (quiz, id, position, text, options, answer) \
                 VALUES ($1, $2, (SELECT COALESCE(MAX(position) + 1, 0) FROM question WHERE quiz = $1), $3, $4, $5)",
                &[&quiz.as_str(), &question.id.as_str(), &question.text, &options, &answer],
            )
            .await?;
        Ok(())
    }

    async fn quiz_exists(&self, quiz: &QuizId) -> error::Result<bool> {
        let row = self.0.query_opt("SELECT 1 FROM quiz WHERE id = $1", &[&quiz.as_str()]).await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl QuestionStore for Database {
    async fn get_quiz(&self, quiz: &QuizId) -> error::Result<QuizDefinition> {
        let row = self
            .0
            .query_opt(
                "SELECT title, total_questions, duration_minutes, marks_per_question FROM quiz WHERE id = $1",
                &[&quiz.as_str()],
            )
            .await?
            .ok_or(error::Error::NotFound)?;
        deserialize_quiz_from_row(quiz, row)
    }

    async fn get_questions(&self, quiz: &QuizId) -> error::Result<Vec<Question>> {
        let questions: Vec<_> = self
            .0
            .query_raw(
                "SELECT id, text, options, answer FROM question WHERE quiz = $1 ORDER BY position",
                &[&quiz.as_str()],
            )
            .await?
            .map_err(error::Error::from)
            .and_then(|row| core::future::ready(deserialize_question_from_row(row)))
            .try_collect()
            .await?;

        // An empty result may also mean that the quiz itself is missing.
        if questions.is_empty() && !self.quiz_exists(quiz).await? {
            return Err(error::Error::NotFound);
        }

        log::debug!("Loaded {} questions for quiz {quiz}.", questions.len());
        Ok(questions)
    }
}
