use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The user is still taking this quiz.
    AlreadyStarted,
    /// No attempt exists for this user and quiz.
    UnknownAttempt,
    /// The attempt has not been submitted yet.
    NotFinished,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadyStarted => "You are already taking this quiz.",
            Self::UnknownAttempt => "Attempt not found. It may have been abandoned.",
            Self::NotFinished => "The attempt has not been submitted yet.",
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
