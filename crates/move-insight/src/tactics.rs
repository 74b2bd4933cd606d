//! Tactical motif detection over a single position.
//!
//! Each detector is a pure function over a [`Board`] and answers whether the
//! side to move has the motif available ([`is_fork`], [`is_skewer`]) or is
//! suffering from it ([`is_pin`]). They are independent of the review
//! pipeline; callers typically run [`detect`] over each position of a
//! reviewed game and surface the labels alongside the move list.

use chess::{BitBoard, Board, Color, File, MoveGen, Piece, Rank, Square, EMPTY};
use serde::Serialize;
use std::fmt;

use crate::quality::exchange_value;

/// Minimum exchange value for a forked piece to count as a real target.
const MINOR_VALUE: i32 = 3;

/// Ray directions as (rank, file) steps: straight first, then diagonal.
const RAY_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// A tactical motif found in a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tactic {
    /// One piece attacks two or more valuable enemy pieces at once.
    Fork,
    /// A piece cannot move without exposing its own king to attack.
    Pin,
    /// A valuable piece is attacked and shields a lesser piece behind it.
    Skewer,
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tactic::Fork => "Fork",
            Tactic::Pin => "Pin",
            Tactic::Skewer => "Skewer",
        };
        f.write_str(label)
    }
}

/// Returns every motif present in the position, in a fixed order.
#[must_use]
pub fn detect(board: &Board) -> Vec<Tactic> {
    let mut tactics = Vec::new();
    if is_fork(board) {
        tactics.push(Tactic::Fork);
    }
    if is_pin(board) {
        tactics.push(Tactic::Pin);
    }
    if is_skewer(board) {
        tactics.push(Tactic::Skewer);
    }
    tactics
}

/// Returns true if the side to move has a fork available: a legal move after
/// which the moved piece attacks two or more enemy pieces of at least
/// minor-piece value.
#[must_use]
pub fn is_fork(board: &Board) -> bool {
    let enemy = !board.side_to_move();
    for mv in MoveGen::new_legal(board) {
        let next = board.make_move_new(mv);
        let dest = mv.get_dest();
        let targets = attacks_from(&next, dest) & *next.color_combined(enemy);
        let valuable = targets
            .filter(|&sq| {
                next.piece_on(sq)
                    .map_or(false, |p| exchange_value(p) >= MINOR_VALUE)
            })
            .count();
        if valuable > 1 {
            return true;
        }
    }
    false
}

/// Returns true if a piece of the side to move is absolutely pinned: removing
/// it would expose its king to an enemy slider that cannot reach the king
/// while the piece stands.
#[must_use]
pub fn is_pin(board: &Board) -> bool {
    let color = board.side_to_move();
    let king_sq = board.king_square(color);
    let occupied = *board.combined();
    let enemy = *board.color_combined(!color);
    let diagonal_sliders = enemy & (*board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen));
    let straight_sliders = enemy & (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen));

    let diagonal_before = chess::get_bishop_moves(king_sq, occupied) & diagonal_sliders;
    let straight_before = chess::get_rook_moves(king_sq, occupied) & straight_sliders;

    let own = *board.color_combined(color) & !BitBoard::from_square(king_sq);
    for sq in own {
        let without = occupied & !BitBoard::from_square(sq);
        let diagonal = chess::get_bishop_moves(king_sq, without) & diagonal_sliders;
        let straight = chess::get_rook_moves(king_sq, without) & straight_sliders;
        if (diagonal & !diagonal_before) != EMPTY || (straight & !straight_before) != EMPTY {
            return true;
        }
    }
    false
}

/// Returns true if the side to move has a skewer available: a legal slider
/// move after which the first enemy piece along some ray is worth more than
/// the enemy piece shielded behind it.
#[must_use]
pub fn is_skewer(board: &Board) -> bool {
    let enemy = !board.side_to_move();
    for mv in MoveGen::new_legal(board) {
        let next = board.make_move_new(mv);
        let dest = mv.get_dest();
        let directions: &[(i8, i8)] = match next.piece_on(dest) {
            Some(Piece::Rook) => &RAY_DIRECTIONS[..4],
            Some(Piece::Bishop) => &RAY_DIRECTIONS[4..],
            Some(Piece::Queen) => &RAY_DIRECTIONS[..],
            _ => continue,
        };
        for &(d_rank, d_file) in directions {
            if let Some((front, back)) = ray_pieces(&next, dest, enemy, d_rank, d_file) {
                if exchange_value(front) > exchange_value(back) {
                    return true;
                }
            }
        }
    }
    false
}

/// Squares attacked by the piece on `square`, whatever occupies them.
fn attacks_from(board: &Board, square: Square) -> BitBoard {
    let piece = match board.piece_on(square) {
        Some(p) => p,
        None => return EMPTY,
    };
    let occupied = *board.combined();
    match piece {
        Piece::Pawn => match board.color_on(square) {
            Some(color) => chess::get_pawn_attacks(square, color, !EMPTY),
            None => EMPTY,
        },
        Piece::Knight => chess::get_knight_moves(square),
        Piece::Bishop => chess::get_bishop_moves(square, occupied),
        Piece::Rook => chess::get_rook_moves(square, occupied),
        Piece::Queen => {
            chess::get_bishop_moves(square, occupied) | chess::get_rook_moves(square, occupied)
        }
        Piece::King => chess::get_king_moves(square),
    }
}

/// The first two enemy pieces along a ray from `from`, nearest first.
///
/// Returns `None` when the ray runs off the board or hits a friendly piece
/// before finding two enemy ones.
fn ray_pieces(
    board: &Board,
    from: Square,
    enemy: Color,
    d_rank: i8,
    d_file: i8,
) -> Option<(Piece, Piece)> {
    let mut rank = from.get_rank().to_index() as i8 + d_rank;
    let mut file = from.get_file().to_index() as i8 + d_file;
    let mut front: Option<Piece> = None;

    while (0..8).contains(&rank) && (0..8).contains(&file) {
        let sq = Square::make_square(Rank::from_index(rank as usize), File::from_index(file as usize));
        if let Some(piece) = board.piece_on(sq) {
            if board.color_on(sq) != Some(enemy) {
                return None;
            }
            match front {
                None => front = Some(piece),
                Some(f) => return Some((f, piece)),
            }
        }
        rank += d_rank;
        file += d_file;
    }
    None
}
