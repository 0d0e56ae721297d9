use chess_core::{
    AlphaBetaEngine, Color, Difficulty, EngineConfig, GameState, RemoteMove, SearchTask, Searcher,
    Square, TaskPoll,
};
use std::sync::Arc;

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

#[test]
fn test_engine_self_play_stays_legal() {
    let config = Arc::new(EngineConfig::default());
    let mut engine = AlphaBetaEngine::with_seed(Arc::clone(&config), 11);
    let mut game = GameState::new();

    // Ten plies of self-play: every proposed move must pass the executor's
    // own legality check.
    for _ in 0..10 {
        let Some((mv, _)) = engine.choose_move(&game, Difficulty::Casual) else {
            break;
        };
        game.make_move(mv.from, mv.to)
            .expect("engine proposed an illegal move");
        if game.status.is_terminal() {
            break;
        }
    }
    assert!(game.history.len() >= 2);
}

#[test]
fn test_engine_rescues_attacked_queen() {
    // The d4 queen is attacked by the c5 pawn; taking it is also the best
    // material outcome.
    let state = GameState::from_fen("4k3/8/8/2p5/3Q4/8/8/4K3 w").unwrap();
    let config = Arc::new(EngineConfig::default());
    let mut engine = AlphaBetaEngine::with_seed(config, 0);

    let (mv, _) = engine.choose_move(&state, Difficulty::Amateur).unwrap();
    assert_eq!((mv.from, mv.to), (sq("d4"), sq("c5")));
}

#[test]
fn test_deferred_search_feeds_the_executor() {
    let mut game = GameState::new();
    game.make_move(sq("e2"), sq("e4")).unwrap();

    // The computer plays Black via the deferred task against a snapshot.
    let task = SearchTask::spawn(game.clone(), Difficulty::Amateur, Arc::default());
    match task.wait(&game) {
        TaskPoll::Ready(mv, _) => {
            game.make_move(mv.from, mv.to).unwrap();
            assert_eq!(game.turn, Color::White);
        }
        other => panic!("expected a computer move, got {other:?}"),
    }
}

#[test]
fn test_remote_game_stays_in_lockstep() {
    // Two peers apply the same moves; one side's moves arrive via the gate,
    // with a duplicate thrown in.
    let mut white_side = GameState::new();
    let mut black_side = GameState::new();

    white_side.make_move(sq("e2"), sq("e4")).unwrap();
    let outbound = RemoteMove {
        from: sq("e2"),
        to: sq("e4"),
        mover: Color::White,
        fen: Some(white_side.board.to_fen(white_side.turn)),
    };

    chess_core::sync::receive_remote_move(&mut black_side, &outbound, Color::Black).unwrap();
    // Duplicate notification: must be a no-op.
    chess_core::sync::receive_remote_move(&mut black_side, &outbound, Color::Black).unwrap();
    // Echo back to the sender: also a no-op.
    chess_core::sync::receive_remote_move(&mut white_side, &outbound, Color::White).unwrap();

    assert_eq!(white_side.board, black_side.board);
    assert_eq!(white_side.turn, black_side.turn);
    assert_eq!(black_side.history.len(), 1);
}
