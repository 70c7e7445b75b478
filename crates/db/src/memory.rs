use crate::{error, QuestionStore};
use async_trait::async_trait;
use model::{Question, QuizDefinition, QuizId};
use serde::Deserialize;
use std::{collections::BTreeMap, io::Read};

struct Entry {
    quiz: QuizDefinition,
    questions: Vec<Question>,
}

/// A quiz bundled with its questions, as found in a question bank document.
#[derive(Deserialize)]
struct Bundle {
    quiz: QuizDefinition,
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct Document {
    quizzes: Vec<Bundle>,
}

/// Question store kept entirely in memory. Questions are served in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    quizzes: BTreeMap<QuizId, Entry>,
}

impl MemoryStore {
    /// Loads a JSON question bank of the form `{ "quizzes": [{ "quiz": {..}, "questions": [..] }] }`.
    pub fn from_reader<R: Read>(reader: R) -> error::Result<Self> {
        let Document { quizzes } = serde_json::from_reader(reader)?;
        let mut store = Self::default();
        for Bundle { quiz, questions } in quizzes {
            let id = quiz.id.clone();
            store.insert_quiz(quiz)?;
            for question in questions {
                store.add_question(&id, question)?;
            }
        }
        Ok(store)
    }

    pub fn insert_quiz(&mut self, quiz: QuizDefinition) -> error::Result<()> {
        use std::collections::btree_map::Entry::{Occupied, Vacant};
        match self.quizzes.entry(quiz.id.clone()) {
            Vacant(slot) => {
                slot.insert(Entry { quiz, questions: Vec::new() });
                Ok(())
            }
            Occupied(_) => Err(error::Error::AlreadyExists),
        }
    }

    /// Appends a question after the existing ones.
    pub fn add_question(&mut self, quiz: &QuizId, question: Question) -> error::Result<()> {
        if !question.is_well_formed() {
            return Err(error::Error::BadInput);
        }

        let entry = self.quizzes.get_mut(quiz).ok_or(error::Error::NotFound)?;
        if entry.questions.iter().any(|existing| existing.id == question.id) {
            return Err(error::Error::AlreadyExists);
        }

        entry.questions.push(question);
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn get_quiz(&self, quiz: &QuizId) -> error::Result<QuizDefinition> {
        self.quizzes.get(quiz).map(|entry| entry.quiz.clone()).ok_or(error::Error::NotFound)
    }

    async fn get_questions(&self, quiz: &QuizId) -> error::Result<Vec<Question>> {
        self.quizzes.get(quiz).map(|entry| entry.questions.clone()).ok_or(error::Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::QuestionId;

    const BANK: &str = r#"{
        "quizzes": [
            {
                "quiz": {
                    "id": "planets",
                    "title": "Planets",
                    "total_questions": 2,
                    "duration_minutes": 1,
                    "marks_per_question": 5
                },
                "questions": [
                    {
                        "id": "largest",
                        "text": "What is the largest planet in the solar system?",
                        "options": ["Mercury", "Jupiter", "Earth", "Mars"],
                        "answer": 1
                    },
                    {
                        "id": "hottest",
                        "text": "What is the hottest planet in the solar system?",
                        "options": ["Venus", "Mercury", "Mars", "Neptune"],
                        "answer": 0
                    }
                ]
            },
            {
                "quiz": {
                    "id": "empty",
                    "title": "Nothing Here",
                    "total_questions": 0,
                    "duration_minutes": 5,
                    "marks_per_question": 1
                }
            }
        ]
    }"#;

    fn question(id: &str, answer: u8) -> Question {
        Question {
            id: QuestionId::from(id),
            text: String::from("Which one?"),
            options: ["A", "B", "C", "D"].map(String::from),
            answer,
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn loads_question_bank() {
        let store = MemoryStore::from_reader(BANK.as_bytes()).unwrap();

        let planets = QuizId::from("planets");
        let quiz = store.get_quiz(&planets).await.unwrap();
        assert_eq!(quiz.title, "Planets");
        assert_eq!(quiz.marks_per_question.get(), 5);

        let ids: Vec<_> = store.get_questions(&planets).await.unwrap().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, [QuestionId::from("largest"), QuestionId::from("hottest")]);

        let empty = QuizId::from("empty");
        assert!(store.get_questions(&empty).await.unwrap().is_empty());

        let missing = QuizId::from("missing");
        assert!(matches!(store.get_quiz(&missing).await, Err(error::Error::NotFound)));
        assert!(matches!(store.get_questions(&missing).await, Err(error::Error::NotFound)));
    }

    #[test]
    fn rejects_malformed_banks() {
        assert!(matches!(MemoryStore::from_reader("{ \"quizzes\": [".as_bytes()), Err(error::Error::Corrupted)));
        assert!(matches!(MemoryStore::from_reader("{ \"quizzes\": 1 }".as_bytes()), Err(error::Error::Corrupted)));

        // Three options instead of four.
        let bank = BANK.replace(r#"["Venus", "Mercury", "Mars", "Neptune"]"#, r#"["Venus", "Mercury", "Mars"]"#);
        assert!(matches!(MemoryStore::from_reader(bank.as_bytes()), Err(error::Error::Corrupted)));

        // Answer key pointing past the options.
        let bank = BANK.replace("\"answer\": 0", "\"answer\": 4");
        assert!(matches!(MemoryStore::from_reader(bank.as_bytes()), Err(error::Error::BadInput)));

        // Marks must be positive.
        let bank = BANK.replace("\"marks_per_question\": 5", "\"marks_per_question\": 0");
        assert!(matches!(MemoryStore::from_reader(bank.as_bytes()), Err(error::Error::Corrupted)));
    }

    #[test]
    fn enforces_unique_identifiers() {
        let mut store = MemoryStore::from_reader(BANK.as_bytes()).unwrap();
        let planets = QuizId::from("planets");
        assert!(matches!(store.add_question(&planets, question("largest", 2)), Err(error::Error::AlreadyExists)));
        assert!(matches!(store.add_question(&QuizId::from("missing"), question("new", 2)), Err(error::Error::NotFound)));
        store.add_question(&planets, question("new", 3)).unwrap();

        let duplicate = QuizDefinition {
            id: planets,
            title: String::from("Planets Again"),
            total_questions: 0,
            duration_minutes: 1,
            marks_per_question: core::num::NonZeroU16::MIN,
        };
        assert!(matches!(store.insert_quiz(duplicate), Err(error::Error::AlreadyExists)));
    }
}
