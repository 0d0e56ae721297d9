use crate::engine::config::{Difficulty, EngineConfig};
use crate::engine::eval::MaterialEvaluator;
use crate::engine::{Evaluator, Move, SearchStats, Searcher};
use crate::logic::board::{Board, Color};
use crate::logic::game::GameState;
use crate::logic::rules::{generate_legal_moves, is_in_check, LastMove};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Depth-limited minimax with alpha-beta pruning, maximizing the side to
/// move at the root.
///
/// Ties between equally-scored root moves are broken by first-encountered
/// order over the deterministic move ordering of `generate_legal_moves`
/// (ascending square index of the mover, fixed candidate order per piece),
/// so repeated searches of the same position pick the same move.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: MaterialEvaluator,
    rng: StdRng,
}

impl AlphaBetaEngine {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: MaterialEvaluator::new(Arc::clone(&config)),
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic seeding hook for reproducible play.
    #[must_use]
    pub fn with_seed(config: Arc<EngineConfig>, seed: u64) -> Self {
        Self {
            evaluator: MaterialEvaluator::new(Arc::clone(&config)),
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        side: Color,
        ai: Color,
        last_move: Option<LastMove>,
        ply: u8,
        nodes: &mut u64,
    ) -> i32 {
        *nodes += 1;

        if depth == 0 {
            return self.evaluator.evaluate(board, ai);
        }

        let moves = generate_legal_moves(board, side, last_move);
        if moves.is_empty() {
            if is_in_check(board, side) {
                // Prefer the shorter mate.
                let mate = self.config.mate_score - i32::from(ply);
                return if side == ai { -mate } else { mate };
            }
            return 0;
        }

        let maximizing = side == ai;
        let mut best = if maximizing { -i32::MAX } else { i32::MAX };

        for &(from, to) in &moves {
            let Some(piece) = board.get_piece(from) else {
                continue;
            };
            let mut next = board.clone();
            next.apply_move(from, to);

            let score = self.minimax(
                &next,
                depth - 1,
                alpha,
                beta,
                side.opposite(),
                ai,
                Some(LastMove { from, to, piece }),
                ply + 1,
                nodes,
            );

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }
}

impl Searcher for AlphaBetaEngine {
    fn choose_move(
        &mut self,
        state: &GameState,
        difficulty: Difficulty,
    ) -> Option<(Move, SearchStats)> {
        if state.status.is_terminal() {
            return None;
        }

        let moves = generate_legal_moves(&state.board, state.turn, state.last_move());
        if moves.is_empty() {
            return None;
        }

        let profile = difficulty.profile();

        // A single draw against the tier's escape probability models weaker,
        // inconsistent play cheaply.
        if profile.random_move_probability > 0.0
            && self.rng.gen::<f64>() < profile.random_move_probability
        {
            let &(from, to) = moves.choose(&mut self.rng)?;
            log::debug!("{}: playing a random legal move", difficulty.name());
            return Some((Move { from, to, score: 0 }, SearchStats::default()));
        }

        let ai = state.turn;
        let depth = profile.search_depth;
        let mut nodes = 0u64;
        let mut alpha = -i32::MAX;
        let beta = i32::MAX;
        let mut best: Option<Move> = None;

        for &(from, to) in &moves {
            let Some(piece) = state.board.get_piece(from) else {
                continue;
            };
            let mut next = state.board.clone();
            next.apply_move(from, to);

            let score = self.minimax(
                &next,
                depth - 1,
                alpha,
                beta,
                ai.opposite(),
                ai,
                Some(LastMove { from, to, piece }),
                1,
                &mut nodes,
            );

            // Strict improvement only: first-encountered wins ties.
            if best.map_or(true, |b| score > b.score) {
                best = Some(Move { from, to, score });
            }
            alpha = alpha.max(score);
        }

        best.map(|mv| (mv, SearchStats { depth, nodes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::MATE_SCORE;
    use crate::logic::board::Square;

    fn engine(seed: u64) -> AlphaBetaEngine {
        AlphaBetaEngine::with_seed(Arc::new(EngineConfig::default()), seed)
    }

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_opening_move_is_legal() {
        let state = GameState::new();
        let legal = generate_legal_moves(&state.board, Color::White, None);
        assert_eq!(legal.len(), 20);

        let (mv, stats) = engine(7).choose_move(&state, Difficulty::Amateur).unwrap();
        assert!(legal.contains(&(mv.from, mv.to)));
        assert_eq!(stats.depth, 2);
        assert!(stats.nodes > 0);
    }

    #[test]
    fn test_depth_one_search_plays_an_opening_move() {
        let state = GameState::new();
        let legal = generate_legal_moves(&state.board, Color::White, None);

        // Apprentice searches at depth 1 except for its rare escape draw; a
        // searched result is distinguishable by its reported depth. Across
        // these seeds at least one draw must fail and reach the search.
        let mut searched = 0;
        for seed in 0..32 {
            let (mv, stats) = engine(seed).choose_move(&state, Difficulty::Apprentice).unwrap();
            assert!(legal.contains(&(mv.from, mv.to)));
            if stats.depth == 1 {
                searched += 1;
                assert!(stats.nodes > 0);
            }
        }
        assert!(searched > 0);
    }

    #[test]
    fn test_random_tiers_still_play_legal_moves() {
        let state = GameState::new();
        let legal = generate_legal_moves(&state.board, Color::White, None);

        // Whatever the escape draw does, the move must come from the legal
        // set.
        let mut eng = engine(42);
        for _ in 0..20 {
            let (mv, _) = eng.choose_move(&state, Difficulty::Beginner).unwrap();
            assert!(legal.contains(&(mv.from, mv.to)));
        }
    }

    #[test]
    fn test_finds_mate_in_one() {
        let state = GameState::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w").unwrap();
        let (mv, _) = engine(0).choose_move(&state, Difficulty::Amateur).unwrap();
        assert_eq!((mv.from, mv.to), (sq("a1"), sq("a8")));
        assert!(mv.score >= MATE_SCORE - 2);
    }

    #[test]
    fn test_prefers_winning_capture() {
        // A queen hangs on d4; take it.
        let state = GameState::from_fen("4k3/8/8/8/3q4/8/8/3RK3 w").unwrap();
        let (mv, _) = engine(0).choose_move(&state, Difficulty::Advanced).unwrap();
        assert_eq!((mv.from, mv.to), (sq("d1"), sq("d4")));
    }

    #[test]
    fn test_legend_is_deterministic() {
        let state = GameState::from_fen("8/8/8/8/3k4/8/3K4/3Q4 w").unwrap();

        let first = engine(1).choose_move(&state, Difficulty::Legend).unwrap();
        let second = engine(99).choose_move(&state, Difficulty::Legend).unwrap();

        // Zero randomness and deterministic tie-breaking: the seed must not
        // matter.
        assert_eq!((first.0.from, first.0.to), (second.0.from, second.0.to));
        assert_eq!(first.0.score, second.0.score);
        assert_eq!(first.1.depth, 5);
    }

    #[test]
    fn test_no_move_on_terminal_position() {
        // Stalemate: no legal moves, search declines to pick.
        let state = GameState::from_fen("k7/2Q5/1K6/8/8/8/8/8 b").unwrap();
        assert!(engine(0).choose_move(&state, Difficulty::Legend).is_none());
    }
}
