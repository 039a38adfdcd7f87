use std::{error::Error, fmt::Display};

/// Errors that prevent any job from being extracted from an input buffer
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// no line introducing a route section (`#`, `#N`, `#P`, or `#T`) was
    /// found before the end of the input. the field is the 0-based index of
    /// the job in the input file
    MissingCommandSection(usize),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingCommandSection(job) => {
                write!(f, "route section not found in job {}", job + 1)
            }
        }
    }
}

impl Error for ParseError {}

/// Per-deck problems found while applying [crate::Overrides]. These do not
/// stop the other decks from being rewritten
#[derive(Debug, PartialEq, Eq)]
pub enum DeckError {
    /// the deck asks for more processors than are available
    ResourceOverCommit {
        /// 0-based index of the deck in its list
        deck: usize,
        requested: usize,
        available: usize,
    },
}

impl DeckError {
    /// Returns `true` if the deck error is [`ResourceOverCommit`].
    ///
    /// [`ResourceOverCommit`]: DeckError::ResourceOverCommit
    #[must_use]
    pub fn is_resource_over_commit(&self) -> bool {
        matches!(self, Self::ResourceOverCommit { .. })
    }
}

impl Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::ResourceOverCommit {
                deck,
                requested,
                available,
            } => write!(
                f,
                "job {}: {requested} processors requested, but only \
                 {available} available",
                deck + 1
            ),
        }
    }
}

impl Error for DeckError {}
