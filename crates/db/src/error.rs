use core::fmt::{self, Display};
use serde_json::error::Category;
use tokio_postgres::error::SqlState;

#[derive(Debug)]
pub enum Error {
    /// The quiz does not exist.
    NotFound,
    /// The store could not be reached.
    Network,
    /// The store returned data that violates the question schema.
    Corrupted,
    /// The question bank could not be read.
    Unreadable,
    /// The object we are trying to insert already exists.
    AlreadyExists,
    /// The object we are trying to insert is malformed.
    BadInput,
    /// Unrecoverable error.
    Fatal,
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        let Some(err) = err.as_db_error() else {
            return Self::Network;
        };
        let code = err.code();
        if *code == SqlState::UNIQUE_VIOLATION {
            Self::AlreadyExists
        } else if *code == SqlState::FOREIGN_KEY_VIOLATION {
            Self::NotFound
        } else if *code == SqlState::CHECK_VIOLATION || *code == SqlState::STRING_DATA_RIGHT_TRUNCATION {
            Self::BadInput
        } else {
            Self::Fatal
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => Self::Unreadable,
            Category::Syntax | Category::Data | Category::Eof => Self::Corrupted,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Quiz not found.",
            Self::Network => "Could not reach the question store. Please try again.",
            Self::Corrupted => "The question store returned malformed questions.",
            Self::Unreadable => "Could not read the question bank.",
            Self::AlreadyExists => "This entry already exists.",
            Self::BadInput => "Unacceptable input.",
            Self::Fatal => "Oops! We have encountered an unrecoverable error on our end.",
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
