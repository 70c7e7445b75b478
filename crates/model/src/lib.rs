#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod profile;
pub mod quiz;

pub use profile::Profile;
pub use quiz::{Question, QuestionId, QuizDefinition, QuizId, UserId, OPTION_COUNT};
