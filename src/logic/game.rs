use crate::clock::Clock;
use crate::logic::board::{Board, Color, FenError, Piece, PieceType, Square};
use crate::logic::rules::{
    has_any_legal_move, is_in_check, is_valid_move, legal_moves_from, LastMove, MoveError,
};
use serde::{Deserialize, Serialize};

/// Crate-level error taxonomy. Rejected operations never mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move: {0:?}")]
    Illegal(MoveError),
    #[error("no legal moves in a terminal position")]
    NoLegalMoves,
    #[error("{0:?} ran out of time")]
    Timeout(Color),
    #[error("search result is stale and was discarded")]
    StaleSearchResult,
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        Self::Illegal(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    /// Winner.
    Checkmate(Color),
    Stalemate,
    /// Winner; the opposing flag fell.
    Timeout(Color),
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The piece as it stood before the move.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub color: Color,
    pub notation: String,
}

/// The result of a square selection: the selected square (if it holds a
/// piece of the side to move) and its legal destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub selected: Option<Square>,
    pub legal_targets: Vec<Square>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
    pub in_check: bool,
    pub history: Vec<MoveRecord>,
    pub clock: Clock,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh game: standard initial position, full clocks, empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Color::White,
            status: GameStatus::Playing,
            in_check: false,
            history: Vec::new(),
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_time(initial_ms: u64) -> Self {
        Self {
            clock: Clock::new(initial_ms),
            ..Self::new()
        }
    }

    /// Builds a state from a FEN position with full clocks and empty
    /// history. Status flags are derived, never trusted from the input.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let (board, turn) = Board::from_fen(fen)?;
        let mut state = Self {
            board,
            turn,
            status: GameStatus::Playing,
            in_check: false,
            history: Vec::new(),
            clock: Clock::default(),
        };
        state.update_status();
        Ok(state)
    }

    /// The previous move, as consulted for en passant eligibility.
    #[must_use]
    pub fn last_move(&self) -> Option<LastMove> {
        self.history.last().map(|record| LastMove {
            from: record.from,
            to: record.to,
            piece: record.piece,
        })
    }

    /// The sole state-mutating entry point for moves, local, remote or
    /// engine-chosen. A rejected move leaves the state untouched.
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::Illegal(MoveError::NotYourTurn));
        }

        is_valid_move(&self.board, from, to, self.turn, self.last_move())?;

        let piece = self
            .board
            .get_piece(from)
            .ok_or(GameError::Illegal(MoveError::NoPieceAtSource))?;

        let mut next_board = self.board.clone();
        let captured = next_board.apply_move(from, to);
        let notation = notation_for(piece, from, to, captured);

        self.board = next_board;
        self.history.push(MoveRecord {
            from,
            to,
            piece,
            captured,
            color: self.turn,
            notation,
        });

        // The clock arms on the first move and changes hands on every one.
        if !self.clock.is_running() {
            self.clock.start();
        }
        self.clock.press(self.turn);

        self.turn = self.turn.opposite();
        self.update_status();

        Ok(())
    }

    /// Recomputes the derived flags for the side to move.
    fn update_status(&mut self) {
        self.in_check = is_in_check(&self.board, self.turn);

        if !has_any_legal_move(&self.board, self.turn, self.last_move()) {
            // Checkmate and stalemate are mutually exclusive by construction.
            self.status = if self.in_check {
                GameStatus::Checkmate(self.turn.opposite())
            } else {
                GameStatus::Stalemate
            };
        }
    }

    /// Advances the active side's clock. Returns the flagged color when a
    /// flag falls; the game then ends in favor of the opponent regardless of
    /// board state.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<Color> {
        if self.status.is_terminal() {
            return None;
        }
        let flagged = self.clock.tick(elapsed_ms)?;
        self.status = GameStatus::Timeout(flagged.opposite());
        log::debug!("flag fell for {flagged:?}");
        Some(flagged)
    }

    /// UI query surface: selecting a square yields its legal destinations.
    #[must_use]
    pub fn select_square(&self, square: Square) -> Selection {
        let owns_piece = self
            .board
            .get_piece(square)
            .is_some_and(|p| p.color == self.turn);

        if !owns_piece || self.status.is_terminal() {
            return Selection {
                selected: None,
                legal_targets: Vec::new(),
            };
        }

        Selection {
            selected: Some(square),
            legal_targets: legal_moves_from(&self.board, square, self.turn, self.last_move()),
        }
    }
}

/// Deterministic coordinate notation: `e2e4`, capture `e5xd6`, promotion
/// `e7e8=Q`, castling `O-O` / `O-O-O`. Cosmetic only.
fn notation_for(piece: Piece, from: Square, to: Square, captured: Option<Piece>) -> String {
    if piece.kind == PieceType::King && from.col.abs_diff(to.col) == 2 {
        return if to.col > from.col { "O-O" } else { "O-O-O" }.to_string();
    }

    let mut s = from.algebraic();
    if captured.is_some() {
        s.push('x');
    }
    s.push_str(&to.algebraic());
    if piece.kind == PieceType::Pawn && to.row == piece.color.promotion_row() {
        s.push_str("=Q");
    }
    s
}
