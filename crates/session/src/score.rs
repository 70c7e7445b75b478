use alloc::collections::BTreeMap;
use core::num::NonZeroU16;
use model::{Question, QuestionId};
use serde::Serialize;

/// Outcome of a submitted attempt. Frozen once computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    /// Number of questions that were actually graded.
    pub total: usize,
    /// `correct * marks_per_question`. Wrong and missing answers cost nothing.
    pub points: u64,
}

impl Score {
    pub fn grade(questions: &[Question], answers: &BTreeMap<QuestionId, u8>, marks: NonZeroU16) -> Self {
        let (mut correct, mut incorrect, mut unanswered) = (0, 0, 0);
        for question in questions {
            match answers.get(&question.id) {
                Some(&choice) if question.is_correct(choice) => correct += 1,
                Some(_) => incorrect += 1,
                None => unanswered += 1,
            }
        }

        let total = questions.len();
        assert_eq!(correct + incorrect + unanswered, total);
        let points = correct as u64 * u64::from(marks.get());
        Self { correct, incorrect, unanswered, total, points }
    }
}
