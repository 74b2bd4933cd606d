//! Heuristic chess game review.
//!
//! This crate turns a played game into a reviewed one: a static evaluation of
//! every position, a quality label and accuracy score for every move, and
//! aggregate per-side statistics.
//!
//! # Overview
//!
//! - [`StaticEvaluator`] - multi-factor heuristic position evaluation
//! - [`MoveAssessment`] - move-quality classification from evaluation deltas
//! - [`GameAnalyzer`] - replays a full game and produces a [`GameReview`]
//! - [`tactics`] - fork, pin, and skewer detection over a single position
//! - [`EngineSession`] - owned session with a UCI engine for deep analysis
//!
//! The evaluator and classifier are pure functions with no shared state;
//! positions can be evaluated concurrently and assembled in move order.
//!
//! # Example
//!
//! ```
//! use move_insight::GameAnalyzer;
//!
//! let analyzer = GameAnalyzer::default();
//! let review = analyzer.analyze_sans(&["e4", "c5", "Nf3"])?;
//! println!(
//!     "{}: {:.1}% accuracy over {} plies",
//!     review.opening.map(|o| o.name).unwrap_or_default(),
//!     review.stats.accuracy,
//!     review.stats.total_moves,
//! );
//! # Ok::<(), move_insight::AnalyzeError>(())
//! ```

pub mod analyzer;
pub mod engine;
pub mod evaluation;
pub mod quality;
pub mod record;
pub mod tactics;

pub use analyzer::{AnalyzeError, AnalyzerOptions, GameAnalyzer, GameReview, PlyInput};
pub use engine::{EngineAnalysis, EngineError, EngineLine, EngineOptions, EngineSession, Score};
pub use evaluation::{EvalError, EvalOptions, Evaluation, StaticEvaluator};
pub use quality::{
    summarize, GameStatistics, MoveAssessment, MoveQuality, QualityTally, ScoredMove,
    SummaryOptions,
};
pub use record::{MoveFlags, MoveRecord};
pub use tactics::{is_fork, is_pin, is_skewer, Tactic};
