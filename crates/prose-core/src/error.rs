//! Engine-core error types.

use std::fmt;

/// Errors produced by [`EditSession`](crate::EditSession) mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The requested range does not fit the current text.
    RangeOutOfBounds {
        /// Requested start offset (`char`s).
        offset: usize,
        /// Requested length (`char`s).
        length: usize,
        /// Current text length (`char`s).
        len: usize,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::RangeOutOfBounds {
                offset,
                length,
                len,
            } => write!(
                f,
                "Range {}..{} out of bounds for text of {} chars",
                offset,
                offset + length,
                len
            ),
        }
    }
}

impl std::error::Error for EditError {}

/// Input-validation errors, reported inline; no network call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The text has too few non-whitespace characters to review.
    TooShort {
        /// Non-whitespace characters present.
        meaningful: usize,
        /// Minimum required.
        minimum: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooShort { minimum, .. } => write!(
                f,
                "Please make sure your text is meaningful and comprehensive (at least {} characters)",
                minimum
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
