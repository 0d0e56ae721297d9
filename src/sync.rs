//! Reconciliation of remotely-reported moves with local state.
//!
//! Every locally-applied move is published outward through a
//! [`MovePublisher`]; inbound moves pass through [`receive_remote_move`],
//! which filters echoes, re-validates through the normal legality path and
//! rejects replays, guaranteeing at-most-once application.

use crate::logic::board::{Color, Square};
use crate::logic::game::{GameError, GameState};
use serde::{Deserialize, Serialize};

/// The payload published for every locally-applied move, keyed externally
/// by a game identifier. `fen` is advisory only; receivers re-validate the
/// move and never trust a pre-serialized board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMove {
    pub from: Square,
    pub to: Square,
    pub mover: Color,
    pub fen: Option<String>,
}

/// Fire-and-forget outbound seam; delivery failures are the transport
/// layer's problem.
pub trait MovePublisher {
    fn publish(&self, game_id: &str, mv: &RemoteMove);
}

/// Publishes the most recent local move, with the current board attached
/// for diagnostics on the receiving side.
pub fn publish_local_move<P: MovePublisher>(publisher: &P, game_id: &str, state: &GameState) {
    let Some(record) = state.history.last() else {
        return;
    };
    let msg = RemoteMove {
        from: record.from,
        to: record.to,
        mover: record.color,
        fen: Some(state.board.to_fen(state.turn)),
    };
    publisher.publish(game_id, &msg);
}

/// Applies a move reported by the remote peer.
///
/// Echoes of our own moves and detectable replays are no-ops; anything else
/// goes through `make_move` and is validated like a local move, so a stale
/// or corrupted payload cannot desync the board.
pub fn receive_remote_move(
    state: &mut GameState,
    msg: &RemoteMove,
    local_color: Color,
) -> Result<(), GameError> {
    // 1. Our own move coming back from the channel.
    if msg.mover == local_color {
        log::debug!("ignoring echoed move {:?} -> {:?}", msg.from, msg.to);
        return Ok(());
    }

    // 2. Duplicate delivery: the board has already advanced past this
    //    mover's turn, so the payload is a replay.
    if msg.mover != state.turn {
        log::debug!(
            "ignoring replayed move {:?} -> {:?} (turn is {:?})",
            msg.from,
            msg.to,
            state.turn
        );
        return Ok(());
    }

    // 3. Validate and apply through the same path local moves take.
    state.make_move(msg.from, msg.to)?;

    // The attached board is advisory; flag divergence but keep our own.
    if let Some(claimed) = &msg.fen {
        let actual = state.board.to_fen(state.turn);
        if *claimed != actual {
            log::warn!("remote board diverges from local replay: {claimed} != {actual}");
        }
    }

    Ok(())
}
