//! Reading, rewriting, and writing Gaussian job decks (`.com`/`.gjf` input
//! files).
//!
//! A single input file can hold several chained jobs separated by
//! `--Link1--`. [parse] splits the text into a list of [JobDeck]s,
//! [Overrides] rewrites their Link0 directives and route sections, and
//! [write_decks] (or the [std::fmt::Display] impl on [JobDeck]) turns them back
//! into text Gaussian will accept.

pub mod deck;
pub mod error;
pub mod mutate;
pub mod parse;
pub mod section;
pub mod serialize;

#[cfg(test)]
mod tests;

pub use deck::{Directive, JobDeck, Key, Link0};
pub use error::{DeckError, ParseError};
pub use mutate::Overrides;
pub use parse::{Syntax, parse};
pub use serialize::{to_string, write_decks, write_temp};

/// The job separator Gaussian uses to chain jobs in one input file
pub const LINK1: &str = "--Link1--";

/// The memory directive value injected when neither the caller nor the deck
/// specifies one
pub const DEFAULT_MEM: &str = "1GB";

/// Return `true` if `line` contains nothing but whitespace
#[inline]
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
