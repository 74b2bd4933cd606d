//! Opening book storage and lookup.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use crate::builtin::builtin_openings;
use crate::opening::Opening;

/// Errors that can occur when loading an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read the opening book file.
    #[error("failed to read opening book: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("failed to parse opening book: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered collection of named opening lines.
///
/// Lookup is an ordered prefix match: the first entry wins, so entry order is
/// part of the book's semantics.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    openings: Vec<Opening>,
}

impl OpeningBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a book from the built-in opening table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            openings: builtin_openings(),
        }
    }

    /// Creates a book from an explicit list of openings.
    #[must_use]
    pub fn from_openings(openings: Vec<Opening>) -> Self {
        Self { openings }
    }

    /// Loads a book from a JSON string containing an array of openings.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let openings: Vec<Opening> = serde_json::from_str(json)?;
        Ok(Self { openings })
    }

    /// Loads a book from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let file = File::open(path)?;
        let openings: Vec<Opening> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { openings })
    }

    /// Returns true if the book has no openings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    /// Returns the number of openings in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.openings.len()
    }

    /// Returns the openings in lookup order.
    #[must_use]
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    /// Identifies the opening a game follows.
    ///
    /// Returns the first entry whose full move sequence is a prefix of the
    /// played moves. Once a game has played out an opening's line, it keeps
    /// identifying as that opening for the rest of the game.
    #[must_use]
    pub fn identify(&self, played: &[impl AsRef<str>]) -> Option<&Opening> {
        if played.is_empty() {
            return None;
        }
        self.openings.iter().find(|o| o.matches(played))
    }

    /// Returns true if the played moves are still inside some opening line.
    ///
    /// Unlike [`identify`](Self::identify), this stops reporting true once the
    /// game has gone past the end of every matching line.
    #[must_use]
    pub fn in_book(&self, played: &[impl AsRef<str>]) -> bool {
        !played.is_empty() && self.openings.iter().any(|o| o.contains(played))
    }
}
