//! Heuristic static position evaluation.
//!
//! [`StaticEvaluator`] maps a board position to an [`Evaluation`]: six
//! sub-scores (material, piece placement, king safety, pawn structure,
//! mobility, central control) and their weighted combination. It is a pure
//! function of the position, so evaluating many positions in parallel is
//! safe and requires no coordination.

use std::str::FromStr;

use chess::{Board, Color, File, MoveGen, Piece, Rank, Square};
use serde::Serialize;
use thiserror::Error;

/// Weight applied to the material sub-score.
pub const MATERIAL_WEIGHT: f64 = 1.0;
/// Weight applied to the piece-placement sub-score.
pub const POSITION_WEIGHT: f64 = 0.2;
/// Weight applied to the king-safety sub-score.
pub const KING_SAFETY_WEIGHT: f64 = 0.3;
/// Weight applied to the pawn-structure sub-score.
pub const PAWN_STRUCTURE_WEIGHT: f64 = 0.2;
/// Weight applied to the mobility sub-score.
pub const MOBILITY_WEIGHT: f64 = 0.15;
/// Weight applied to the central-control sub-score.
pub const CONTROL_WEIGHT: f64 = 0.15;

const PAWN_SHIELD_BONUS: f64 = 0.2;
const KING_EXPOSURE_PENALTY: f64 = -0.1;
const DOUBLED_PAWN_PENALTY: f64 = -0.3;
const ISOLATED_PAWN_PENALTY: f64 = -0.3;
const PASSED_PAWN_BASE: f64 = 0.2;
const PASSED_PAWN_ADVANCE: f64 = 0.1;
const MOBILITY_UNIT: f64 = 0.1;
const CONTROL_UNIT: f64 = 0.2;

/// Pawn placement bonuses in centipawns, indexed from White's eighth rank
/// down to the first, mirrored for Black. Tables for the other piece types
/// are an acknowledged gap in the positional sub-score.
const PAWN_TABLE: [[f64; 8]; 8] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0],
    [10.0, 10.0, 20.0, 30.0, 30.0, 20.0, 10.0, 10.0],
    [5.0, 5.0, 10.0, 25.0, 25.0, 10.0, 5.0, 5.0],
    [0.0, 0.0, 0.0, 20.0, 20.0, 0.0, 0.0, 0.0],
    [5.0, -5.0, -10.0, 0.0, 0.0, -10.0, -5.0, 5.0],
    [5.0, 10.0, 10.0, -20.0, -20.0, 10.0, 10.0, 5.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

const CENTRAL_SQUARES: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

/// Material value of a piece in pawn units, as used by the evaluator.
///
/// The king is worth 0 here; it can never be exchanged.
#[must_use]
pub fn material_value(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 3.0,
        Piece::Bishop => 3.15,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King => 0.0,
    }
}

/// Errors that can occur when evaluating a position.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The position could not be parsed at all.
    #[error("invalid position: {0}")]
    InvalidPosition(chess::Error),
}

/// A multi-dimensional position evaluation. Positive favors White.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    /// Raw material balance.
    pub material: f64,
    /// Piece-square placement score.
    pub position: f64,
    /// Pawn shield bonus minus exposure penalty, White minus Black.
    pub king_safety: f64,
    /// Doubled/isolated penalties and passed-pawn bonuses, White minus Black.
    pub pawn_structure: f64,
    /// Legal-move mobility score.
    pub mobility: f64,
    /// Occupation of the four central squares.
    pub control: f64,
    /// Weighted combination of the sub-scores.
    pub total: f64,
}

/// Configuration for [`StaticEvaluator`].
#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    /// Score mobility for both sides (White minus Black) instead of only the
    /// side to move.
    ///
    /// The side-to-move-only variant is the historical behavior; it makes the
    /// total depend on whose turn it is, so two renderings of the same
    /// material balance evaluate differently. Symmetric scoring is the
    /// default; set this to `false` for parity with previously stored
    /// evaluations.
    pub symmetric_mobility: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            symmetric_mobility: true,
        }
    }
}

/// Heuristic static evaluator.
///
/// Stateless apart from its options; evaluating a position never mutates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticEvaluator {
    options: EvalOptions,
}

impl StaticEvaluator {
    /// Creates an evaluator with the given options.
    #[must_use]
    pub fn new(options: EvalOptions) -> Self {
        Self { options }
    }

    /// Evaluates a position.
    #[must_use]
    pub fn evaluate(&self, board: &Board) -> Evaluation {
        let material = material_score(board);
        let position = positional_score(board);
        let king_safety = king_safety_score(board);
        let pawn_structure = pawn_structure_score(board);
        let mobility = self.mobility_score(board);
        let control = control_score(board);

        let total = material * MATERIAL_WEIGHT
            + position * POSITION_WEIGHT
            + king_safety * KING_SAFETY_WEIGHT
            + pawn_structure * PAWN_STRUCTURE_WEIGHT
            + mobility * MOBILITY_WEIGHT
            + control * CONTROL_WEIGHT;

        Evaluation {
            material,
            position,
            king_safety,
            pawn_structure,
            mobility,
            control,
            total,
        }
    }

    /// Parses a FEN string and evaluates the resulting position.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidPosition`] if the FEN cannot be parsed.
    pub fn evaluate_fen(&self, fen: &str) -> Result<Evaluation, EvalError> {
        let board = Board::from_str(fen).map_err(EvalError::InvalidPosition)?;
        Ok(self.evaluate(&board))
    }

    fn mobility_score(&self, board: &Board) -> f64 {
        let to_move = MoveGen::new_legal(board).len() as f64 * MOBILITY_UNIT;
        if !self.options.symmetric_mobility {
            return to_move;
        }

        // A null move flips the side to move; it is unavailable while in
        // check, in which case the opponent contributes nothing.
        let opponent = board
            .null_move()
            .map(|flipped| MoveGen::new_legal(&flipped).len())
            .unwrap_or(0) as f64
            * MOBILITY_UNIT;

        match board.side_to_move() {
            Color::White => to_move - opponent,
            Color::Black => opponent - to_move,
        }
    }
}

fn square_at(rank: usize, file: usize) -> Square {
    Square::make_square(Rank::from_index(rank), File::from_index(file))
}

fn sign(color: Color) -> f64 {
    match color {
        Color::White => 1.0,
        Color::Black => -1.0,
    }
}

fn material_score(board: &Board) -> f64 {
    let mut score = 0.0;
    for sq in chess::ALL_SQUARES {
        if let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
            score += sign(color) * material_value(piece);
        }
    }
    score
}

fn positional_score(board: &Board) -> f64 {
    let mut score = 0.0;
    let pawns = *board.pieces(Piece::Pawn);
    for sq in pawns {
        let color = match board.color_on(sq) {
            Some(c) => c,
            None => continue,
        };
        let rank = sq.get_rank().to_index();
        let file = sq.get_file().to_index();
        let row = match color {
            Color::White => 7 - rank,
            Color::Black => rank,
        };
        score += sign(color) * PAWN_TABLE[row][file] / 100.0;
    }
    score
}

fn king_safety_score(board: &Board) -> f64 {
    king_zone_score(board, Color::White) - king_zone_score(board, Color::Black)
}

/// Shield bonus plus exposure penalty for one side's king.
///
/// A side with no king on the board contributes nothing.
fn king_zone_score(board: &Board, color: Color) -> f64 {
    let mut kings = *board.pieces(Piece::King) & *board.color_combined(color);
    let king = match kings.next() {
        Some(sq) => sq,
        None => return 0.0,
    };

    let kr = king.get_rank().to_index() as i32;
    let kf = king.get_file().to_index() as i32;
    let forward: i32 = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    let mut score = 0.0;

    // Friendly pawns one or two ranks in front of the king, on the king's
    // file or the adjacent ones.
    for df in -1..=1 {
        let file = kf + df;
        if !(0..8).contains(&file) {
            continue;
        }
        for step in 1..=2 {
            let rank = kr + forward * step;
            if !(0..8).contains(&rank) {
                continue;
            }
            let sq = square_at(rank as usize, file as usize);
            if board.piece_on(sq) == Some(Piece::Pawn) && board.color_on(sq) == Some(color) {
                score += PAWN_SHIELD_BONUS;
            }
        }
    }

    // Empty squares adjacent to the king leave it exposed.
    for dr in -1..=1 {
        for df in -1..=1 {
            if dr == 0 && df == 0 {
                continue;
            }
            let rank = kr + dr;
            let file = kf + df;
            if !(0..8).contains(&rank) || !(0..8).contains(&file) {
                continue;
            }
            if board.piece_on(square_at(rank as usize, file as usize)).is_none() {
                score += KING_EXPOSURE_PENALTY;
            }
        }
    }

    score
}

fn pawn_structure_score(board: &Board) -> f64 {
    side_pawn_structure(board, Color::White) - side_pawn_structure(board, Color::Black)
}

fn side_pawn_structure(board: &Board, color: Color) -> f64 {
    let own = *board.pieces(Piece::Pawn) & *board.color_combined(color);

    let mut per_file = [0u32; 8];
    for sq in own {
        per_file[sq.get_file().to_index()] += 1;
    }

    let mut score = 0.0;

    for file in 0..8 {
        let count = per_file[file];
        if count > 1 {
            score += DOUBLED_PAWN_PENALTY * f64::from(count - 1);
        }
        if count > 0 {
            let left = file.checked_sub(1).map_or(0, |f| per_file[f]);
            let right = if file + 1 < 8 { per_file[file + 1] } else { 0 };
            if left == 0 && right == 0 {
                score += ISOLATED_PAWN_PENALTY;
            }
        }
    }

    for sq in own {
        if is_passed_pawn(board, sq, color) {
            let rank = sq.get_rank().to_index();
            let advancement = match color {
                Color::White => rank,
                Color::Black => 7 - rank,
            };
            score += PASSED_PAWN_BASE + advancement as f64 * PASSED_PAWN_ADVANCE;
        }
    }

    score
}

/// A pawn is passed when no enemy pawn stands ahead of it on its own file or
/// an adjacent file.
fn is_passed_pawn(board: &Board, sq: Square, color: Color) -> bool {
    let rank = sq.get_rank().to_index() as i32;
    let file = sq.get_file().to_index() as i32;
    let forward: i32 = match color {
        Color::White => 1,
        Color::Black => -1,
    };
    let enemy = !color;

    let mut r = rank + forward;
    while (0..8).contains(&r) {
        for f in (file - 1).max(0)..=(file + 1).min(7) {
            let ahead = square_at(r as usize, f as usize);
            if board.piece_on(ahead) == Some(Piece::Pawn) && board.color_on(ahead) == Some(enemy) {
                return false;
            }
        }
        r += forward;
    }
    true
}

fn control_score(board: &Board) -> f64 {
    let mut score = 0.0;
    for sq in CENTRAL_SQUARES {
        if let Some(color) = board.color_on(sq) {
            score += sign(color) * CONTROL_UNIT;
        }
    }
    score
}
