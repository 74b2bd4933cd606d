//! Per-ply move records produced by game replay.

use chess::{Color, Piece, Square};

/// What happened on a move, as explicit flags.
///
/// Absent metadata never fails classification; a default (all-false) value
/// simply contributes nothing to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    /// The move captured a piece (including en passant).
    pub capture: bool,
    /// The move gave check.
    pub check: bool,
    /// The move delivered checkmate.
    pub checkmate: bool,
    /// The move was a castle (either side).
    pub castle: bool,
    /// The move promoted a pawn.
    pub promotion: bool,
    /// The capture was en passant.
    pub en_passant: bool,
}

/// One fully-specified ply of a game, with evaluations before and after.
///
/// Records are immutable once built: the replay driver creates them and the
/// classifier only reads them.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// Full-move number this ply belongs to (1-based).
    pub move_number: u32,
    /// The side that moved.
    pub color: Color,
    /// The move in standard algebraic notation, as given.
    pub san: String,
    /// The piece that moved.
    pub piece: Piece,
    /// The piece captured by this move, if any.
    pub captured: Option<Piece>,
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Move flags.
    pub flags: MoveFlags,
    /// FEN of the position after the move.
    pub fen_after: String,
    /// Evaluation total before the move (White-positive).
    pub prev_eval: f64,
    /// Evaluation total after the move (White-positive).
    pub new_eval: f64,
    /// Side-adjusted evaluation delta; `None` when the move could not be
    /// scored.
    pub eval_change: Option<f64>,
    /// Time spent on the move, in seconds.
    pub time_seconds: f64,
}

impl MoveRecord {
    /// Side-adjusted evaluation delta: positive always means the move
    /// improved the mover's position, whichever side moved.
    #[must_use]
    pub fn side_adjusted_change(color: Color, prev_eval: f64, new_eval: f64) -> f64 {
        match color {
            Color::White => new_eval - prev_eval,
            Color::Black => prev_eval - new_eval,
        }
    }

    /// Returns true if the move delivered checkmate, from either the explicit
    /// flag or the SAN mate marker.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.flags.checkmate || self.san.contains('#')
    }
}
