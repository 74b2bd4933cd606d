//! Built-in opening data.

use crate::opening::Opening;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn entry(
    eco: &str,
    name: &str,
    moves: &[&str],
    description: &str,
    lines: &[&str],
    difficulty: &str,
    popularity: &str,
) -> Opening {
    Opening {
        eco: eco.to_string(),
        name: name.to_string(),
        moves: strings(moves),
        description: Some(description.to_string()),
        lines: strings(lines),
        difficulty: Some(difficulty.to_string()),
        popularity: Some(popularity.to_string()),
    }
}

/// Returns the built-in opening table.
///
/// Entries are ordered; lookup takes the first match, so more specific lines
/// come before the broader ones that share a prefix.
#[must_use]
pub fn builtin_openings() -> Vec<Opening> {
    vec![
        entry(
            "C60-C99",
            "Ruy Lopez",
            &["e4", "e5", "Nf3", "Nc6", "Bb5"],
            "A classic opening that begins with 1.e4 e5 2.Nf3 Nc6 3.Bb5",
            &[
                "Main Line: 3...a6 4.Ba4 Nf6 5.O-O",
                "Morphy Defense: 3...f6",
                "Closed Variation: 3...Nf6 4.O-O",
            ],
            "Advanced",
            "High",
        ),
        entry(
            "B20-B99",
            "Sicilian Defense",
            &["e4", "c5"],
            "A sharp and aggressive response to 1.e4",
            &[
                "Najdorf Variation: 1.e4 c5 2.Nf3 d6 3.d4 cxd4 4.Nxd4 Nf6 5.Nc3 a6",
                "Dragon Variation: 1.e4 c5 2.Nf3 d6 3.d4 cxd4 4.Nxd4 Nf6 5.Nc3 g6",
                "Classical Variation: 1.e4 c5 2.Nf3 d6 3.d4 cxd4 4.Nxd4 Nf6 5.Nc3 Nc6",
            ],
            "Advanced",
            "Very High",
        ),
        entry(
            "C50-C59",
            "Italian Game",
            &["e4", "e5", "Nf3", "Nc6", "Bc4"],
            "A classic opening developing pieces quickly",
            &[
                "Giuoco Piano: 1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5",
                "Two Knights Defense: 1.e4 e5 2.Nf3 Nc6 3.Bc4 Nf6",
                "Evans Gambit: 1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5 4.b4",
            ],
            "Intermediate",
            "High",
        ),
        entry(
            "D00-D69",
            "Queen's Gambit",
            &["d4", "d5", "c4"],
            "A solid opening for White in the Queen's Pawn Game",
            &[
                "Accepted: 1.d4 d5 2.c4 dxc4",
                "Declined: 1.d4 d5 2.c4 e6",
                "Slav Defense: 1.d4 d5 2.c4 c6",
            ],
            "Advanced",
            "High",
        ),
        entry(
            "C00-C19",
            "French Defense",
            &["e4", "e6"],
            "A solid but somewhat passive response to 1.e4",
            &[
                "Advance Variation: 1.e4 e6 2.d4 d5 3.e5",
                "Tarrasch Variation: 1.e4 e6 2.d4 d5 3.Nd2",
            ],
            "Intermediate",
            "High",
        ),
        entry(
            "A01",
            "Nimzo-Larsen Attack",
            &["b3", "e5", "Bb2", "Nc6"],
            "A flank opening beginning with 1.b3, popularized by Bent Larsen",
            &[
                "Classical Variation: 1.b3 e5 2.Bb2 Nc6 3.e3 Nf6",
                "Modern Variation: 1.b3 e5 2.Bb2 Nc6 3.f4",
            ],
            "Intermediate",
            "Medium",
        ),
    ]
}
