use alloc::{boxed::Box, string::String};
use core::{
    fmt::{self, Display},
    num::NonZeroU16,
};
use serde::{Deserialize, Serialize};

/// Every question in this domain offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(Box<str>);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id.into_boxed_str())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id! {
    /// Opaque identifier of a quiz.
    QuizId
}

opaque_id! {
    /// Opaque identifier of a question, unique within its quiz.
    QuestionId
}

opaque_id! {
    /// Opaque identifier of an authenticated user.
    UserId
}

/// Metadata of a timed quiz. Loaded by the caller before an attempt begins.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizDefinition {
    pub id: QuizId,
    pub title: String,
    /// Declared number of questions. Only used for display and the maximum score;
    /// grading always counts the questions that were actually loaded.
    pub total_questions: u16,
    /// Length of the countdown.
    pub duration_minutes: u16,
    /// Uniform weight of every correct answer.
    pub marks_per_question: NonZeroU16,
}

impl QuizDefinition {
    /// Countdown length in seconds.
    pub fn duration_secs(&self) -> u32 {
        u32::from(self.duration_minutes) * 60
    }
}

/// Acceptable schema for a multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: QuestionId,
    /// Prompt displayed to the candidate.
    pub text: String,
    /// Possible answers to select from.
    pub options: [String; OPTION_COUNT],
    /// Index of the option with the correct answer.
    pub answer: u8,
}

impl Question {
    /// Whether the answer key points at one of the options.
    pub fn is_well_formed(&self) -> bool {
        usize::from(self.answer) < OPTION_COUNT
    }

    pub fn is_correct(&self, choice: u8) -> bool {
        self.answer == choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: u8) -> Question {
        Question {
            id: QuestionId::from("q1"),
            text: String::from("What is the largest planet in the solar system?"),
            options: [String::from("Mercury"), String::from("Venus"), String::from("Jupiter"), String::from("Mars")],
            answer,
        }
    }

    #[test]
    fn answer_key_must_index_an_option() {
        assert!(question(0).is_well_formed());
        assert!(question(3).is_well_formed());
        assert!(!question(4).is_well_formed());
        assert!(!question(255).is_well_formed());
    }

    #[test]
    fn duration_is_converted_to_seconds() {
        let quiz = QuizDefinition {
            id: QuizId::from("planets"),
            title: String::from("Planets"),
            total_questions: 10,
            duration_minutes: 3,
            marks_per_question: NonZeroU16::new(2).unwrap(),
        };
        assert_eq!(quiz.duration_secs(), 180);
    }
}
