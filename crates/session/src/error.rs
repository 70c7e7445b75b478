use core::fmt::{self, Display};

/// Actions dispatched out of order by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The attempt is not accepting answers right now.
    NotActive,
    /// The question does not belong to this attempt.
    UnknownQuestion,
    /// The selected option does not exist.
    OptionOutOfRange,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotActive => "The attempt is not accepting answers.",
            Self::UnknownQuestion => "Question not found in this quiz.",
            Self::OptionOutOfRange => "There is no such option for this question.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
