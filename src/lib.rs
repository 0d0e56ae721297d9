//! Game-logic core for a turn-based chess application: move legality,
//! move execution, adversarial search for the computer opponent, per-side
//! countdown clocks and the reconciliation gate for remote play.
//!
//! Rendering, input handling, transport and account management are the
//! embedding application's concern; this crate only owns the game state and
//! its transitions.

pub mod clock;
pub mod engine;
pub mod logic;
pub mod sync;

pub use clock::Clock;
pub use engine::config::{Difficulty, DifficultyProfile, EngineConfig};
pub use engine::search::AlphaBetaEngine;
pub use engine::worker::{SearchTask, TaskPoll};
pub use engine::{Evaluator, Move, SearchStats, Searcher};
pub use logic::board::{Board, Color, FenError, Piece, PieceType, Square, SquareOutOfBounds};
pub use logic::game::{GameError, GameState, GameStatus, MoveRecord, Selection};
pub use logic::rules::MoveError;
pub use sync::{MovePublisher, RemoteMove};
