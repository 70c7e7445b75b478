use crate::{Score, Session, Status};
use alloc::string::String;
use core::fmt::{self, Display};
use model::{Profile, QuizDefinition, QuizId};
use serde::Serialize;

/// Minimum percentage required to pass.
pub const PASS_PERCENTAGE: f64 = 40.0;

/// Exportable summary of a finished attempt.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub quiz: QuizId,
    pub title: String,
    pub candidate: Profile,
    pub score: Score,
    /// Derived from the quiz's declared question count rather than the number
    /// of questions actually graded. The two disagree when questions were added
    /// or removed after the quiz was created.
    pub max_points: u64,
    pub percentage: f64,
    pub passed: bool,
}

impl Report {
    pub fn new(quiz: &QuizDefinition, score: Score, candidate: Profile) -> Self {
        let max_points = u64::from(quiz.total_questions) * u64::from(quiz.marks_per_question.get());
        let percentage = if max_points == 0 { 0.0 } else { score.points as f64 * 100.0 / max_points as f64 };
        Self {
            quiz: quiz.id.clone(),
            title: quiz.title.clone(),
            candidate,
            score,
            max_points,
            percentage,
            passed: percentage >= PASS_PERCENTAGE,
        }
    }

    /// Builds the report of a finished session. Returns `None` for any other status.
    pub fn from_session(session: &Session, candidate: Profile) -> Option<Self> {
        let state = session.state();
        if state.status() != Status::Finished {
            return None;
        }
        let score = *state.score()?;
        Some(Self::new(session.quiz(), score, candidate))
    }

    /// One-line summary suitable for sharing.
    pub fn share_text(&self) -> String {
        let verdict = if self.passed { "passed" } else { "did not pass" };
        alloc::format!(
            "{} scored {}/{} ({:.1}%) on \"{}\" and {verdict}.",
            self.candidate.name,
            self.score.points,
            self.max_points,
            self.percentage,
            self.title,
        )
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quiz Result: {}", self.title)?;
        writeln!(f, "Candidate: {}", self.candidate.name)?;
        if let Some(email) = &self.candidate.email {
            writeln!(f, "Email: {email}")?;
        }
        writeln!(f)?;
        writeln!(f, "Correct: {}", self.score.correct)?;
        writeln!(f, "Incorrect: {}", self.score.incorrect)?;
        writeln!(f, "Unanswered: {}", self.score.unanswered)?;
        writeln!(f, "Score: {}/{}", self.score.points, self.max_points)?;
        writeln!(f, "Percentage: {:.1}%", self.percentage)?;
        write!(f, "Result: {}", if self.passed { "PASS" } else { "FAIL" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Question, QuestionId};
    use alloc::{string::ToString, vec::Vec};
    use core::num::NonZeroU16;

    fn quiz(total: u16, marks: u16) -> QuizDefinition {
        QuizDefinition {
            id: QuizId::from("rust-101"),
            title: String::from("Rust 101"),
            total_questions: total,
            duration_minutes: 5,
            marks_per_question: NonZeroU16::new(marks).unwrap(),
        }
    }

    fn score(correct: usize, total: usize, marks: u64) -> Score {
        Score { correct, incorrect: total - correct, unanswered: 0, total, points: correct as u64 * marks }
    }

    fn candidate() -> Profile {
        Profile { name: String::from("Ferris"), email: Some(String::from("ferris@example.com")) }
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let report = Report::new(&quiz(5, 2), score(2, 5, 2), candidate());
        assert_eq!(report.max_points, 10);
        assert_eq!(report.percentage, 40.0);
        assert!(report.passed);

        let report = Report::new(&quiz(5, 2), score(1, 5, 2), candidate());
        assert_eq!(report.percentage, 20.0);
        assert!(!report.passed);
    }

    #[test]
    fn maximum_follows_declared_question_count() {
        // Only two questions were graded although ten were declared.
        let report = Report::new(&quiz(10, 1), score(2, 2, 1), candidate());
        assert_eq!(report.max_points, 10);
        assert_eq!(report.percentage, 20.0);
        assert!(!report.passed);
    }

    #[test]
    fn zero_declared_questions_yield_zero_percent() {
        let report = Report::new(&quiz(0, 3), score(1, 1, 3), candidate());
        assert_eq!(report.max_points, 0);
        assert_eq!(report.percentage, 0.0);
        assert!(!report.passed);
    }

    #[test]
    fn renders_text_forms() {
        let report = Report::new(&quiz(4, 5), score(3, 4, 5), candidate());
        assert_eq!(report.share_text(), "Ferris scored 15/20 (75.0%) on \"Rust 101\" and passed.");
        let document = report.to_string();
        assert!(document.starts_with("Quiz Result: Rust 101\nCandidate: Ferris\nEmail: ferris@example.com\n"));
        assert!(document.contains("Correct: 3\nIncorrect: 1\nUnanswered: 0\nScore: 15/20\n"));
        assert!(document.ends_with("Result: PASS"));
    }

    #[test]
    fn only_finished_sessions_are_reported() {
        let mut session = Session::new(quiz(1, 1));
        assert!(Report::from_session(&session, candidate()).is_none());

        assert!(session.start());
        let questions = Vec::from([Question {
            id: QuestionId::from("q1"),
            text: String::from("Is Rust memory safe?"),
            options: [String::from("Yes"), String::from("No"), String::from("Maybe"), String::from("Sometimes")],
            answer: 0,
        }]);
        session.load(Ok::<_, &str>(questions));
        assert!(Report::from_session(&session, candidate()).is_none());

        session.select_answer(&QuestionId::from("q1"), 0).unwrap();
        assert!(session.submit());
        let report = Report::from_session(&session, Profile::default()).unwrap();
        assert_eq!(report.score.points, 1);
        assert_eq!(report.percentage, 100.0);
        assert!(report.passed);
    }
}
