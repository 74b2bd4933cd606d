//! Move quality classification and aggregate game statistics.
//!
//! Classification works on the side-adjusted evaluation delta of a
//! [`MoveRecord`], with special cases evaluated in a fixed precedence order:
//! checkmate, opening-book membership, missing score, captures, and finally
//! the quiet-move thresholds.

use chess::{Color, Piece};
use serde::{Deserialize, Serialize};

use crate::record::MoveRecord;

/// Discrete quality labels for a played move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveQuality {
    /// An exceptional move: large gain, winning capture, or checkmate.
    Brilliant,
    /// A strong move with a clear gain.
    Great,
    /// Agreement with the engine's preferred move; emitted by engine-backed
    /// review rather than the heuristic classifier.
    Best,
    /// A solid move that keeps or slightly improves the position.
    Good,
    /// An opening-book move, or a quiet move that holds the balance.
    Book,
    /// A small slip.
    Inaccuracy,
    /// A clear error.
    Mistake,
    /// A serious error.
    Blunder,
}

/// Accuracy assigned to book moves; fixed, not derived from the evaluation.
pub const BOOK_ACCURACY: f64 = 75.0;

/// Exchange value of a piece for capture assessment.
///
/// This is the integer trade table (bishop counts 3); the evaluator's
/// material table is deliberately finer-grained.
#[must_use]
pub fn exchange_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight => 3,
        Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 0,
    }
}

/// Quality label and accuracy score for a single move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveAssessment {
    /// The quality label.
    pub quality: MoveQuality,
    /// Accuracy in the range 0..=100.
    pub accuracy: f64,
    /// False when the move had no evaluation delta and received the
    /// conservative default instead of a real score.
    pub scored: bool,
}

impl MoveAssessment {
    fn new(quality: MoveQuality, accuracy: f64) -> Self {
        Self {
            quality,
            accuracy: accuracy.clamp(0.0, 100.0),
            scored: true,
        }
    }

    /// Classifies a move.
    ///
    /// `is_book` states whether the game was still inside a known opening
    /// line when this move was played.
    #[must_use]
    pub fn classify(record: &MoveRecord, is_book: bool) -> Self {
        // Checkmate trumps everything, whatever the evaluation says.
        if record.is_checkmate() {
            return Self::new(MoveQuality::Brilliant, 100.0);
        }

        if is_book {
            return Self::new(MoveQuality::Book, BOOK_ACCURACY);
        }

        let eval_change = match record.eval_change {
            Some(change) => change,
            // Conservative default for unscorable moves.
            None => {
                return Self {
                    quality: MoveQuality::Mistake,
                    accuracy: 0.0,
                    scored: false,
                }
            }
        };

        if let Some(captured) = record.captured {
            return Self::classify_capture(record.piece, captured, eval_change);
        }

        Self::classify_quiet(eval_change)
    }

    /// Capture assessment by material delta: what was taken minus what did
    /// the taking.
    fn classify_capture(mover: Piece, captured: Piece, eval_change: f64) -> Self {
        let delta = exchange_value(captured) - exchange_value(mover);

        if delta > 0 {
            let quality = if eval_change >= 2.0 {
                MoveQuality::Brilliant
            } else {
                MoveQuality::Great
            };
            return Self::new(quality, 95.0 + f64::from(delta.min(5)));
        }

        if delta == 0 {
            return if eval_change >= 0.0 {
                Self::new(MoveQuality::Good, 85.0)
            } else {
                Self::new(MoveQuality::Inaccuracy, 70.0)
            };
        }

        let quality = if eval_change >= -0.5 {
            MoveQuality::Inaccuracy
        } else {
            MoveQuality::Mistake
        };
        Self::new(quality, (70.0 + f64::from(delta) * 10.0).max(50.0))
    }

    /// Quiet-move thresholds. Each boundary is closed on its stated side:
    /// -0.1 is still a quiet Book move, 1.0 is already Great.
    fn classify_quiet(eval_change: f64) -> Self {
        if eval_change > 2.0 {
            Self::new(MoveQuality::Brilliant, 100.0)
        } else if eval_change >= 1.0 {
            Self::new(MoveQuality::Great, 90.0)
        } else if eval_change >= 0.5 {
            Self::new(MoveQuality::Good, 85.0)
        } else if eval_change >= -0.1 {
            Self::new(MoveQuality::Book, BOOK_ACCURACY)
        } else if eval_change >= -0.5 {
            Self::new(MoveQuality::Inaccuracy, 65.0)
        } else if eval_change >= -1.0 {
            Self::new(MoveQuality::Mistake, 50.0)
        } else {
            Self::new(MoveQuality::Blunder, 30.0)
        }
    }
}

/// A move record together with its assessment.
#[derive(Debug, Clone)]
pub struct ScoredMove {
    /// The replayed move.
    pub record: MoveRecord,
    /// Its classification.
    pub assessment: MoveAssessment,
}

/// Options for [`summarize`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    /// Count unscored moves as 0% in the mean accuracy.
    ///
    /// This matches historical aggregates (which it skews downward); disable
    /// it to average over scored moves only.
    pub count_unscored_in_accuracy: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            count_unscored_in_accuracy: true,
        }
    }
}

/// Per-side label counts and mean accuracy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QualityTally {
    /// Moves counted for this side.
    pub moves: u32,
    /// Brilliant moves.
    pub brilliant: u32,
    /// Great moves.
    pub great: u32,
    /// Best moves.
    pub best: u32,
    /// Good moves.
    pub good: u32,
    /// Book moves (opening or quiet).
    pub book: u32,
    /// Inaccuracies.
    pub inaccuracy: u32,
    /// Mistakes.
    pub mistake: u32,
    /// Blunders.
    pub blunder: u32,
    /// Moves that could not be scored.
    pub unscored: u32,
    /// Mean accuracy over this side's counted moves.
    pub accuracy: f64,
}

impl QualityTally {
    fn count(&mut self, assessment: &MoveAssessment) {
        self.moves += 1;
        if !assessment.scored {
            self.unscored += 1;
        }
        match assessment.quality {
            MoveQuality::Brilliant => self.brilliant += 1,
            MoveQuality::Great => self.great += 1,
            MoveQuality::Best => self.best += 1,
            MoveQuality::Good => self.good += 1,
            MoveQuality::Book => self.book += 1,
            MoveQuality::Inaccuracy => self.inaccuracy += 1,
            MoveQuality::Mistake => self.mistake += 1,
            MoveQuality::Blunder => self.blunder += 1,
        }
    }
}

/// Aggregate statistics over a game's scored moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GameStatistics {
    /// White's tally.
    pub white: QualityTally,
    /// Black's tally.
    pub black: QualityTally,
    /// Total plies counted.
    pub total_moves: u32,
    /// Plies that could not be scored.
    pub unscored_moves: u32,
    /// Mean accuracy over both sides.
    pub accuracy: f64,
    /// Total thinking time in seconds.
    pub total_time_seconds: f64,
    /// Mean thinking time per ply in seconds.
    pub average_time_seconds: f64,
}

/// Builds aggregate statistics for a sequence of scored moves.
///
/// An empty input produces the all-zero statistics; no division by zero.
#[must_use]
pub fn summarize(moves: &[ScoredMove], options: SummaryOptions) -> GameStatistics {
    let mut stats = GameStatistics::default();

    let mut accuracy_sum = 0.0;
    let mut accuracy_count = 0u32;
    let mut white_sum = 0.0;
    let mut white_count = 0u32;
    let mut black_sum = 0.0;
    let mut black_count = 0u32;

    for mv in moves {
        let tally = match mv.record.color {
            Color::White => &mut stats.white,
            Color::Black => &mut stats.black,
        };
        tally.count(&mv.assessment);

        stats.total_moves += 1;
        if !mv.assessment.scored {
            stats.unscored_moves += 1;
        }
        stats.total_time_seconds += mv.record.time_seconds;

        if mv.assessment.scored || options.count_unscored_in_accuracy {
            accuracy_sum += mv.assessment.accuracy;
            accuracy_count += 1;
            match mv.record.color {
                Color::White => {
                    white_sum += mv.assessment.accuracy;
                    white_count += 1;
                }
                Color::Black => {
                    black_sum += mv.assessment.accuracy;
                    black_count += 1;
                }
            }
        }
    }

    if accuracy_count > 0 {
        stats.accuracy = accuracy_sum / f64::from(accuracy_count);
    }
    if white_count > 0 {
        stats.white.accuracy = white_sum / f64::from(white_count);
    }
    if black_count > 0 {
        stats.black.accuracy = black_sum / f64::from(black_count);
    }
    if stats.total_moves > 0 {
        stats.average_time_seconds = stats.total_time_seconds / f64::from(stats.total_moves);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Square;
    use crate::record::MoveFlags;

    fn record(color: Color, eval_change: Option<f64>) -> MoveRecord {
        MoveRecord {
            move_number: 1,
            color,
            san: "e4".to_string(),
            piece: Piece::Pawn,
            captured: None,
            from: Square::E2,
            to: Square::E4,
            flags: MoveFlags::default(),
            fen_after: String::new(),
            prev_eval: 0.0,
            new_eval: 0.0,
            eval_change,
            time_seconds: 0.0,
        }
    }

    fn capture(mover: Piece, captured: Piece, eval_change: f64) -> MoveRecord {
        let mut rec = record(Color::White, Some(eval_change));
        rec.piece = mover;
        rec.captured = Some(captured);
        rec.flags.capture = true;
        rec.san = "x".to_string();
        rec
    }

    fn classify(rec: &MoveRecord) -> MoveAssessment {
        MoveAssessment::classify(rec, false)
    }

    #[test]
    fn checkmate_overrides_everything() {
        // Even a move the evaluator hates is Brilliant if it mates.
        let mut rec = record(Color::White, Some(-3.0));
        rec.san = "Qg7#".to_string();
        let assessment = classify(&rec);
        assert_eq!(assessment.quality, MoveQuality::Brilliant);
        assert_eq!(assessment.accuracy, 100.0);

        let mut rec = record(Color::Black, None);
        rec.flags.checkmate = true;
        assert_eq!(classify(&rec).quality, MoveQuality::Brilliant);
    }

    #[test]
    fn book_moves_get_the_fixed_accuracy() {
        let rec = record(Color::White, Some(-0.8));
        let assessment = MoveAssessment::classify(&rec, true);
        assert_eq!(assessment.quality, MoveQuality::Book);
        assert_eq!(assessment.accuracy, BOOK_ACCURACY);
    }

    #[test]
    fn missing_eval_change_is_a_conservative_default() {
        let assessment = classify(&record(Color::White, None));
        assert_eq!(assessment.quality, MoveQuality::Mistake);
        assert_eq!(assessment.accuracy, 0.0);
        assert!(!assessment.scored);
    }

    #[test]
    fn winning_captures_rate_highly() {
        // Pawn takes queen: delta +8, capped bonus.
        let assessment = classify(&capture(Piece::Pawn, Piece::Queen, 3.0));
        assert_eq!(assessment.quality, MoveQuality::Brilliant);
        assert_eq!(assessment.accuracy, 100.0);

        // Knight takes rook with a modest eval gain: Great.
        let assessment = classify(&capture(Piece::Knight, Piece::Rook, 0.5));
        assert_eq!(assessment.quality, MoveQuality::Great);
        assert_eq!(assessment.accuracy, 97.0);
    }

    #[test]
    fn even_trades_depend_on_the_eval() {
        let assessment = classify(&capture(Piece::Knight, Piece::Bishop, 0.2));
        assert_eq!(assessment.quality, MoveQuality::Good);
        assert_eq!(assessment.accuracy, 85.0);

        let assessment = classify(&capture(Piece::Knight, Piece::Bishop, -0.2));
        assert_eq!(assessment.quality, MoveQuality::Inaccuracy);
        assert_eq!(assessment.accuracy, 70.0);
    }

    #[test]
    fn losing_captures_floor_at_fifty() {
        // Queen takes pawn for nothing: delta -8, accuracy floored at 50.
        let assessment = classify(&capture(Piece::Queen, Piece::Pawn, -1.2));
        assert_eq!(assessment.quality, MoveQuality::Mistake);
        assert_eq!(assessment.accuracy, 50.0);

        // Same trade but the evaluation barely moves: an inaccuracy.
        let assessment = classify(&capture(Piece::Queen, Piece::Pawn, -0.3));
        assert_eq!(assessment.quality, MoveQuality::Inaccuracy);

        // Rook takes knight, slightly losing trade.
        let assessment = classify(&capture(Piece::Rook, Piece::Knight, -0.6));
        assert_eq!(assessment.quality, MoveQuality::Mistake);
        assert_eq!(assessment.accuracy, 50.0);
    }

    #[test]
    fn quiet_thresholds() {
        let cases = [
            (2.5, MoveQuality::Brilliant, 100.0),
            (2.0, MoveQuality::Great, 90.0),
            (1.0, MoveQuality::Great, 90.0),
            (0.7, MoveQuality::Good, 85.0),
            (0.5, MoveQuality::Good, 85.0),
            (0.0, MoveQuality::Book, 75.0),
            (-0.1, MoveQuality::Book, 75.0),
            (-0.3, MoveQuality::Inaccuracy, 65.0),
            (-0.5, MoveQuality::Inaccuracy, 65.0),
            (-0.8, MoveQuality::Mistake, 50.0),
            (-1.0, MoveQuality::Mistake, 50.0),
            (-1.5, MoveQuality::Blunder, 30.0),
        ];
        for (eval_change, quality, accuracy) in cases {
            let assessment = classify(&record(Color::White, Some(eval_change)));
            assert_eq!(assessment.quality, quality, "eval_change {eval_change}");
            assert_eq!(assessment.accuracy, accuracy, "eval_change {eval_change}");
        }
    }

    #[test]
    fn summarize_empty_input_is_all_zero() {
        let stats = summarize(&[], SummaryOptions::default());
        assert_eq!(stats, GameStatistics::default());
        assert!(!stats.accuracy.is_nan());
        assert!(!stats.average_time_seconds.is_nan());
    }

    #[test]
    fn summarize_partitions_by_color() {
        let scored = |color, eval_change, time| ScoredMove {
            record: MoveRecord {
                time_seconds: time,
                ..record(color, Some(eval_change))
            },
            assessment: MoveAssessment::classify(&record(color, Some(eval_change)), false),
        };

        let moves = vec![
            scored(Color::White, 0.6, 2.0),  // Good, 85
            scored(Color::Black, -1.5, 3.0), // Blunder, 30
            scored(Color::White, 0.0, 1.0),  // Book, 75
        ];

        let stats = summarize(&moves, SummaryOptions::default());
        assert_eq!(stats.total_moves, 3);
        assert_eq!(stats.white.moves, 2);
        assert_eq!(stats.white.good, 1);
        assert_eq!(stats.white.book, 1);
        assert_eq!(stats.black.blunder, 1);
        assert_eq!(stats.white.accuracy, 80.0);
        assert_eq!(stats.black.accuracy, 30.0);
        assert!((stats.accuracy - (85.0 + 30.0 + 75.0) / 3.0).abs() < 1e-9);
        assert_eq!(stats.total_time_seconds, 6.0);
        assert_eq!(stats.average_time_seconds, 2.0);
    }

    #[test]
    fn statistics_serialize_to_json() {
        let stats = summarize(&[], SummaryOptions::default());
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total_moves"], 0);
        assert_eq!(json["white"]["blunder"], 0);
        assert_eq!(json["accuracy"], 0.0);
    }

    #[test]
    fn unscored_moves_can_be_excluded_from_accuracy() {
        let make = |eval_change: Option<f64>| {
            let rec = record(Color::White, eval_change);
            let assessment = MoveAssessment::classify(&rec, false);
            ScoredMove {
                record: rec,
                assessment,
            }
        };
        let moves = vec![make(Some(0.6)), make(None)];

        let included = summarize(&moves, SummaryOptions::default());
        assert_eq!(included.unscored_moves, 1);
        assert_eq!(included.accuracy, 42.5);

        let excluded = summarize(
            &moves,
            SummaryOptions {
                count_unscored_in_accuracy: false,
            },
        );
        assert_eq!(excluded.unscored_moves, 1);
        assert_eq!(excluded.accuracy, 85.0);
    }
}
