use crate::logic::board::{Board, Color, Square};
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod search;
pub mod worker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
}

pub trait Evaluator {
    /// Static evaluation of `board` from `for_color`'s perspective.
    fn evaluate(&self, board: &Board, for_color: Color) -> i32;
}

pub trait Searcher {
    /// Picks a move for the side to move. `None` only when no legal move
    /// exists, which the caller should treat as an already-terminal state.
    fn choose_move(
        &mut self,
        state: &GameState,
        difficulty: config::Difficulty,
    ) -> Option<(Move, SearchStats)>;
}
