//! Core opening types.

use serde::{Deserialize, Serialize};

/// A named chess opening with its defining move sequence.
///
/// Only `eco`, `name`, and `moves` take part in lookup; the remaining fields
/// are descriptive metadata and are optional in serialized books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code or code range for this opening (e.g., "B20-B99").
    pub eco: String,
    /// The name of the opening.
    pub name: String,
    /// The defining move sequence in standard algebraic notation.
    pub moves: Vec<String>,
    /// A one-sentence description of the opening.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Named continuations branching off the defining sequence.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
    /// Rough difficulty label ("Beginner", "Intermediate", "Advanced").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// How often the opening shows up in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<String>,
}

impl Opening {
    /// Creates a new opening with the given ECO code, name, and moves,
    /// and no descriptive metadata.
    #[must_use]
    pub fn new(eco: impl Into<String>, name: impl Into<String>, moves: Vec<String>) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves,
            description: None,
            lines: Vec::new(),
            difficulty: None,
            popularity: None,
        }
    }

    /// Returns true if this opening's move sequence is a prefix of `played`.
    #[must_use]
    pub fn matches(&self, played: &[impl AsRef<str>]) -> bool {
        if self.moves.len() > played.len() {
            return false;
        }
        self.moves
            .iter()
            .zip(played)
            .all(|(book, game)| book == game.as_ref())
    }

    /// Returns true if `played` follows this opening's line and has not yet
    /// gone past its end.
    #[must_use]
    pub fn contains(&self, played: &[impl AsRef<str>]) -> bool {
        if played.len() > self.moves.len() {
            return false;
        }
        played
            .iter()
            .zip(&self.moves)
            .all(|(game, book)| game.as_ref() == book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruy_lopez() -> Opening {
        Opening::new(
            "C60-C99",
            "Ruy Lopez",
            vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    #[test]
    fn matches_needs_full_line_played() {
        let opening = ruy_lopez();
        assert!(!opening.matches(&["e4", "e5"]));
        assert!(opening.matches(&["e4", "e5", "Nf3", "Nc6", "Bb5"]));
        assert!(opening.matches(&["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"]));
    }

    #[test]
    fn metadata_fields_survive_serialization() {
        let json = r#"{
            "name": "Italian Game",
            "eco": "C50-C59",
            "description": "A classic opening developing pieces quickly",
            "lines": ["Giuoco Piano: 1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5"],
            "moves": ["e4", "e5", "Nf3", "Nc6", "Bc4"],
            "difficulty": "Intermediate",
            "popularity": "High"
        }"#;
        let opening: Opening = serde_json::from_str(json).unwrap();
        assert_eq!(
            opening.description.as_deref(),
            Some("A classic opening developing pieces quickly")
        );
        assert_eq!(opening.lines.len(), 1);
        assert_eq!(opening.difficulty.as_deref(), Some("Intermediate"));
        assert_eq!(opening.popularity.as_deref(), Some("High"));

        let round_trip: Opening =
            serde_json::from_str(&serde_json::to_string(&opening).unwrap()).unwrap();
        assert_eq!(round_trip, opening);
    }

    #[test]
    fn metadata_fields_are_optional_in_json() {
        let json = r#"{"eco": "B20", "name": "Sicilian Defense", "moves": ["e4", "c5"]}"#;
        let opening: Opening = serde_json::from_str(json).unwrap();
        assert!(opening.description.is_none());
        assert!(opening.lines.is_empty());
        assert!(opening.difficulty.is_none());
        assert!(opening.popularity.is_none());
    }

    #[test]
    fn contains_stops_at_end_of_line() {
        let opening = ruy_lopez();
        assert!(opening.contains(&["e4"]));
        assert!(opening.contains(&["e4", "e5", "Nf3", "Nc6", "Bb5"]));
        assert!(!opening.contains(&["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]));
        assert!(!opening.contains(&["e4", "c5"]));
    }
}
