//! Whole-game review: replay, evaluate, classify, aggregate.
//!
//! [`GameAnalyzer`] consolidates the review pipeline: it replays a game's
//! SAN moves on the rules engine, evaluates the position before and after
//! every ply, classifies each move, identifies the opening, and aggregates
//! statistics into a [`GameReview`].
//!
//! Each ply's evaluation depends only on its own position, so callers that
//! want to fan evaluation out across threads can do so and feed the results
//! back in move order; this driver is the straightforward sequential form.

use chess::{Board, BoardStatus, ChessMove, Piece};
use thiserror::Error;
use tracing::debug;

use opening_book::{Opening, OpeningBook};

use crate::evaluation::{EvalOptions, StaticEvaluator};
use crate::quality::{summarize, GameStatistics, MoveAssessment, ScoredMove, SummaryOptions};
use crate::record::{MoveFlags, MoveRecord};

/// Errors that can occur while reviewing a game.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// A move could not be played in the position it was given for.
    #[error("illegal move {san:?} at ply {ply}")]
    IllegalMove {
        /// Zero-based ply index of the offending move.
        ply: usize,
        /// The move text as given.
        san: String,
    },
}

/// Configuration for [`GameAnalyzer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerOptions {
    /// Evaluator options.
    pub eval: EvalOptions,
    /// Statistics options.
    pub summary: SummaryOptions,
}

/// One ply of input: the move and the time spent on it.
#[derive(Debug, Clone)]
pub struct PlyInput {
    /// The move in standard algebraic notation.
    pub san: String,
    /// Time spent on the move, in seconds.
    pub time_seconds: f64,
}

impl PlyInput {
    /// Creates a ply with no time information.
    #[must_use]
    pub fn new(san: impl Into<String>) -> Self {
        Self {
            san: san.into(),
            time_seconds: 0.0,
        }
    }

    /// Creates a ply with the time spent on it.
    #[must_use]
    pub fn with_time(san: impl Into<String>, time_seconds: f64) -> Self {
        Self {
            san: san.into(),
            time_seconds,
        }
    }
}

/// The complete review of one game.
#[derive(Debug, Clone)]
pub struct GameReview {
    /// Every ply, scored in game order.
    pub moves: Vec<ScoredMove>,
    /// The opening the game followed, if recognized.
    pub opening: Option<Opening>,
    /// Aggregate statistics.
    pub stats: GameStatistics,
}

/// Replays and reviews complete games.
#[derive(Debug, Clone)]
pub struct GameAnalyzer {
    evaluator: StaticEvaluator,
    book: OpeningBook,
    summary: SummaryOptions,
}

impl Default for GameAnalyzer {
    fn default() -> Self {
        Self::new(OpeningBook::builtin(), AnalyzerOptions::default())
    }
}

impl GameAnalyzer {
    /// Creates an analyzer with the given opening book and options.
    #[must_use]
    pub fn new(book: OpeningBook, options: AnalyzerOptions) -> Self {
        Self {
            evaluator: StaticEvaluator::new(options.eval),
            book,
            summary: options.summary,
        }
    }

    /// Reviews a game given as bare SAN moves, with no time information.
    pub fn analyze_sans<S: AsRef<str>>(&self, sans: &[S]) -> Result<GameReview, AnalyzeError> {
        let plies: Vec<PlyInput> = sans.iter().map(|s| PlyInput::new(s.as_ref())).collect();
        self.analyze_game(&plies)
    }

    /// Reviews a complete game.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::IllegalMove`] on the first move that cannot be
    /// played; everything before it has already been discarded.
    pub fn analyze_game(&self, plies: &[PlyInput]) -> Result<GameReview, AnalyzeError> {
        let mut board = Board::default();
        let mut history: Vec<String> = Vec::with_capacity(plies.len());
        let mut moves: Vec<ScoredMove> = Vec::with_capacity(plies.len());

        for (ply, input) in plies.iter().enumerate() {
            let san = bare_san(&input.san);
            let mv = ChessMove::from_san(&board, san).map_err(|_| AnalyzeError::IllegalMove {
                ply,
                san: input.san.clone(),
            })?;
            let piece = board
                .piece_on(mv.get_source())
                .ok_or_else(|| AnalyzeError::IllegalMove {
                    ply,
                    san: input.san.clone(),
                })?;
            let color = board.side_to_move();

            let direct_capture = board.piece_on(mv.get_dest());
            let en_passant = piece == Piece::Pawn
                && direct_capture.is_none()
                && mv.get_source().get_file() != mv.get_dest().get_file();
            let captured = if en_passant {
                Some(Piece::Pawn)
            } else {
                direct_capture
            };

            let next = board.make_move_new(mv);

            let prev_eval = self.evaluator.evaluate(&board).total;
            let new_eval = self.evaluator.evaluate(&next).total;
            let eval_change = MoveRecord::side_adjusted_change(color, prev_eval, new_eval);

            let file_shift = (mv.get_source().get_file().to_index() as i32
                - mv.get_dest().get_file().to_index() as i32)
                .abs();
            let flags = MoveFlags {
                capture: captured.is_some(),
                check: next.checkers().popcnt() > 0,
                checkmate: next.status() == BoardStatus::Checkmate,
                castle: piece == Piece::King && file_shift == 2,
                promotion: mv.get_promotion().is_some(),
                en_passant,
            };

            let record = MoveRecord {
                move_number: (ply / 2 + 1) as u32,
                color,
                san: input.san.clone(),
                piece,
                captured,
                from: mv.get_source(),
                to: mv.get_dest(),
                flags,
                fen_after: next.to_string(),
                prev_eval,
                new_eval,
                eval_change: Some(eval_change),
                time_seconds: input.time_seconds,
            };

            history.push(san.to_string());
            let is_book = self.book.in_book(&history);
            let assessment = MoveAssessment::classify(&record, is_book);

            moves.push(ScoredMove { record, assessment });
            board = next;
        }

        let opening = self.book.identify(&history).cloned();
        let stats = summarize(&moves, self.summary);
        debug!(
            plies = moves.len(),
            opening = opening.as_ref().map(|o| o.name.as_str()),
            accuracy = stats.accuracy,
            "game review complete"
        );

        Ok(GameReview {
            moves,
            opening,
            stats,
        })
    }
}

/// Strips check, mate, and annotation suffixes from a SAN token.
fn bare_san(san: &str) -> &str {
    san.trim_end_matches(['+', '#', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::MoveQuality;
    use chess::Color;

    #[test]
    fn first_move_pawn_push_is_book() {
        let review = GameAnalyzer::default().analyze_sans(&["e4"]).unwrap();
        assert_eq!(review.moves.len(), 1);
        let mv = &review.moves[0];
        assert_eq!(mv.assessment.quality, MoveQuality::Book);
        assert_eq!(mv.record.piece, Piece::Pawn);
        assert_eq!(mv.record.color, Color::White);
        assert!(mv.record.eval_change.is_some());
    }

    #[test]
    fn opening_line_stays_book_and_is_identified() {
        let review = GameAnalyzer::default()
            .analyze_sans(&["e4", "e5", "Nf3", "Nc6", "Bb5"])
            .unwrap();
        for mv in &review.moves {
            assert_eq!(mv.assessment.quality, MoveQuality::Book, "{}", mv.record.san);
        }
        assert_eq!(review.opening.unwrap().name, "Ruy Lopez");
    }

    #[test]
    fn scholars_mate_ends_brilliant() {
        let review = GameAnalyzer::default()
            .analyze_sans(&["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"])
            .unwrap();
        let mate = review.moves.last().unwrap();
        assert!(mate.record.flags.checkmate);
        assert!(mate.record.flags.capture);
        assert_eq!(mate.record.captured, Some(Piece::Pawn));
        assert_eq!(mate.assessment.quality, MoveQuality::Brilliant);
        assert_eq!(mate.assessment.accuracy, 100.0);

        assert_eq!(review.stats.total_moves, 7);
        assert_eq!(review.stats.white.moves, 4);
        assert_eq!(review.stats.black.moves, 3);
        assert_eq!(review.stats.white.brilliant, 1);
    }

    #[test]
    fn en_passant_capture_is_recorded() {
        let review = GameAnalyzer::default()
            .analyze_sans(&["e4", "Nf6", "e5", "d5", "exd6"])
            .unwrap();
        let ep = review.moves.last().unwrap();
        assert!(ep.record.flags.en_passant);
        assert!(ep.record.flags.capture);
        assert_eq!(ep.record.captured, Some(Piece::Pawn));
    }

    #[test]
    fn castling_is_flagged() {
        let review = GameAnalyzer::default()
            .analyze_sans(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"])
            .unwrap();
        let castle = review.moves.last().unwrap();
        assert!(castle.record.flags.castle);
        assert_eq!(castle.record.piece, Piece::King);
    }

    #[test]
    fn illegal_move_is_a_distinct_error() {
        let err = GameAnalyzer::default()
            .analyze_sans(&["e4", "e4"])
            .unwrap_err();
        match err {
            AnalyzeError::IllegalMove { ply, san } => {
                assert_eq!(ply, 1);
                assert_eq!(san, "e4");
            }
        }
    }

    #[test]
    fn move_numbers_and_fens_advance() {
        let review = GameAnalyzer::default()
            .analyze_sans(&["d4", "d5", "c4"])
            .unwrap();
        assert_eq!(review.moves[0].record.move_number, 1);
        assert_eq!(review.moves[1].record.move_number, 1);
        assert_eq!(review.moves[2].record.move_number, 2);
        assert!(review.moves[2]
            .record
            .fen_after
            .starts_with("rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR b"));
        assert_eq!(review.opening.unwrap().name, "Queen's Gambit");
    }

    #[test]
    fn times_are_carried_into_the_summary() {
        let plies = vec![
            PlyInput::with_time("e4", 1.5),
            PlyInput::with_time("c5", 2.5),
        ];
        let review = GameAnalyzer::default().analyze_game(&plies).unwrap();
        assert_eq!(review.stats.total_time_seconds, 4.0);
        assert_eq!(review.stats.average_time_seconds, 2.0);
        assert_eq!(review.opening.unwrap().name, "Sicilian Defense");
    }
}
