use std::fmt;
use thiserror::Error as ThisError;

///
/// SplitNotPossibleError
///
/// The request cannot be split; raised before the store is contacted.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SplitNotPossibleError {
    #[error("num_splits must be at least 2, got {num_splits}")]
    NumSplits { num_splits: usize },

    #[error("query cannot have an offset set")]
    Offset,

    #[error("query cannot have a limit set")]
    Limit,

    #[error("query cannot have any sort orders")]
    SortOrder,

    #[error("query cannot have an inequality filter on '{property}'")]
    InequalityFilter { property: String },
}

impl SplitNotPossibleError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NumSplits { .. } => ErrorClass::Configuration,
            Self::Offset | Self::Limit | Self::SortOrder | Self::InequalityFilter { .. } => {
                ErrorClass::Unsupported
            }
        }
    }
}

///
/// SplitError
///
/// Failure of one `get_splits` call. `Fetch` carries the store client's own
/// error value untouched.
///

#[derive(Debug, ThisError)]
pub enum SplitError<E> {
    #[error(transparent)]
    NotPossible(#[from] SplitNotPossibleError),

    #[error(transparent)]
    Fetch(E),
}

impl<E> SplitError<E> {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotPossible(err) => err.class(),
            Self::Fetch(_) => ErrorClass::Upstream,
        }
    }

    /// Return the client error, if this failure came from the store.
    pub fn into_fetch(self) -> Option<E> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::NotPossible(_) => None,
        }
    }
}

///
/// ErrorClass
/// Coarse classification for callers deciding whether to fall back to an
/// unsplit read, fix their request, or retry the store.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Unsupported,
    Upstream,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Unsupported => "unsupported",
            Self::Upstream => "upstream",
        };
        write!(f, "{label}")
    }
}
