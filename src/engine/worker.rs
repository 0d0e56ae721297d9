use crate::engine::config::{Difficulty, EngineConfig};
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchStats, Searcher};
use crate::logic::board::Color;
use crate::logic::game::GameState;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Outcome of polling a [`SearchTask`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskPoll {
    /// The search is still running.
    Pending,
    /// A move computed against a still-current position.
    Ready(Move, SearchStats),
    /// The snapshot had no legal moves; the position was already terminal.
    NoMove,
    /// The game moved on while the search ran; the result was discarded.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StalenessToken {
    ply: usize,
    turn: Color,
}

/// A computer move computed off-thread against a snapshot of the game
/// taken at dispatch time.
///
/// The task never mutates game state itself; the caller polls it from the
/// same event loop that serializes all other writers and applies the move
/// through the usual legality path. A result whose dispatch token no longer
/// matches the live state (the turn advanced, or a timeout fired
/// mid-search) is discarded.
pub struct SearchTask {
    rx: Receiver<Option<(Move, SearchStats)>>,
    token: StalenessToken,
}

impl SearchTask {
    /// Spawns the search on its own thread. The search is depth-bounded and
    /// always terminates; no cancellation is needed beyond the staleness
    /// check on collection.
    #[must_use]
    pub fn spawn(snapshot: GameState, difficulty: Difficulty, config: Arc<EngineConfig>) -> Self {
        let token = StalenessToken {
            ply: snapshot.history.len(),
            turn: snapshot.turn,
        };
        let (tx, rx) = bounded(1);

        thread::spawn(move || {
            let mut engine = AlphaBetaEngine::new(config);
            let result = engine.choose_move(&snapshot, difficulty);
            // The receiver may be gone if the game was torn down; that is
            // fine, the result dies with it.
            let _ = tx.send(result);
        });

        Self { rx, token }
    }

    fn is_stale(&self, current: &GameState) -> bool {
        current.history.len() != self.token.ply
            || current.turn != self.token.turn
            || current.status.is_terminal()
    }

    /// Non-blocking collection against the live state.
    pub fn poll(&self, current: &GameState) -> TaskPoll {
        match self.rx.try_recv() {
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                log::warn!("search worker vanished without a result");
                TaskPoll::NoMove
            }
            Ok(result) => self.classify(result, current),
        }
    }

    /// Blocking collection against the live state.
    pub fn wait(&self, current: &GameState) -> TaskPoll {
        match self.rx.recv() {
            Err(_) => {
                log::warn!("search worker vanished without a result");
                TaskPoll::NoMove
            }
            Ok(result) => self.classify(result, current),
        }
    }

    fn classify(&self, result: Option<(Move, SearchStats)>, current: &GameState) -> TaskPoll {
        if self.is_stale(current) {
            log::warn!(
                "discarding stale search result (dispatched at ply {})",
                self.token.ply
            );
            return TaskPoll::Stale;
        }
        match result {
            Some((mv, stats)) => TaskPoll::Ready(mv, stats),
            None => TaskPoll::NoMove,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::Square;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_search_task_delivers_applicable_move() {
        let state = GameState::new();
        let task = SearchTask::spawn(state.clone(), Difficulty::Amateur, Arc::default());

        match task.wait(&state) {
            TaskPoll::Ready(mv, stats) => {
                let mut next = state;
                next.make_move(mv.from, mv.to).unwrap();
                assert_eq!(stats.depth, 2);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn test_result_discarded_when_position_moved_on() {
        let state = GameState::new();
        let task = SearchTask::spawn(state.clone(), Difficulty::Beginner, Arc::default());

        // The game advances while the search runs.
        let mut advanced = state;
        advanced.make_move(sq("e2"), sq("e4")).unwrap();

        assert_eq!(task.wait(&advanced), TaskPoll::Stale);
    }

    #[test]
    fn test_result_discarded_after_timeout() {
        let mut state = GameState::with_time(100);
        state.make_move(sq("e2"), sq("e4")).unwrap();
        let task = SearchTask::spawn(state.clone(), Difficulty::Amateur, Arc::default());

        // A flag falls mid-search.
        state.tick(150);
        assert_eq!(task.wait(&state), TaskPoll::Stale);
    }

    #[test]
    fn test_no_move_on_terminal_snapshot() {
        // Stalemate snapshot: the engine has nothing to play. The live state
        // is terminal too, so staleness wins; poll a playing copy to see the
        // NoMove outcome.
        let state = GameState::from_fen("k7/2Q5/1K6/8/8/8/8/8 b").unwrap();
        let mut playing = state.clone();
        playing.status = crate::logic::game::GameStatus::Playing;

        let task = SearchTask::spawn(state, Difficulty::Amateur, Arc::default());
        assert_eq!(task.wait(&playing), TaskPoll::NoMove);
    }
}
