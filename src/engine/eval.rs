use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Color, PieceType, Square};
use std::sync::Arc;

// Piece-square tables, row 0 = White's home rank; mirrored for Black.
// Deliberately coarse: only pawns and knights get a positional bonus.
#[rustfmt::skip]
const PST_PAWN: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, -20, -20, 10, 10,  5,
     5, -5, -10,  0,  0, -10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PST_KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

/// Positional bonus for a piece of `color` standing on `sq`.
#[must_use]
pub fn pst_value(kind: PieceType, color: Color, sq: Square) -> i32 {
    let row = match color {
        Color::White => sq.row,
        Color::Black => 7 - sq.row,
    };
    let idx = row * 8 + sq.col;

    match kind {
        PieceType::Pawn => PST_PAWN[idx],
        PieceType::Knight => PST_KNIGHT[idx],
        _ => 0,
    }
}

/// Material plus piece-square evaluation from `for_color`'s perspective.
pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board, for_color: Color) -> i32 {
        let mut score = 0;
        for (sq, piece) in board.pieces() {
            let value = self.config.piece_value(piece.kind) + pst_value(piece.kind, piece.color, sq);
            if piece.color == for_color {
                score += value;
            } else {
                score -= value;
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> MaterialEvaluator {
        MaterialEvaluator::new(Arc::new(EngineConfig::default()))
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let board = Board::new();
        assert_eq!(evaluator().evaluate(&board, Color::White), 0);
        assert_eq!(evaluator().evaluate(&board, Color::Black), 0);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        let (board, _) = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w").unwrap();
        let white = evaluator().evaluate(&board, Color::White);
        let black = evaluator().evaluate(&board, Color::Black);
        assert_eq!(white, -black);
        assert!(white > 0);
    }

    #[test]
    fn test_material_counts() {
        // A bare queen against a bare rook.
        let (board, _) = Board::from_fen("3qk3/8/8/8/8/8/8/3RK3 w").unwrap();
        let score = evaluator().evaluate(&board, Color::White);
        assert_eq!(score, 500 - 900);
    }

    #[test]
    fn test_pst_mirrors_for_black() {
        // A white knight on e4 and a black knight on e5 occupy mirrored
        // squares and must get the same bonus.
        let white_sq = Square::from_algebraic("e4").unwrap();
        let black_sq = Square::from_algebraic("e5").unwrap();
        assert_eq!(
            pst_value(PieceType::Knight, Color::White, white_sq),
            pst_value(PieceType::Knight, Color::Black, black_sq)
        );
    }

    #[test]
    fn test_advanced_pawn_scores_higher() {
        let home = Square::from_algebraic("e2").unwrap();
        let advanced = Square::from_algebraic("e6").unwrap();
        assert!(
            pst_value(PieceType::Pawn, Color::White, advanced)
                > pst_value(PieceType::Pawn, Color::White, home)
        );
    }

    #[test]
    fn test_only_pawns_and_knights_have_pst() {
        let sq = Square::from_algebraic("d4").unwrap();
        for kind in [
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
            PieceType::King,
        ] {
            assert_eq!(pst_value(kind, Color::White, sq), 0);
        }
    }
}
