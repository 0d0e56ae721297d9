use crate::logic::board::{Board, Color, Piece, PieceType, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NoPieceAtSource,
    NotYourTurn,
    InvalidMovePattern,
    BlockedPath,
    TargetOccupiedByFriendly,
    SelfCheck,
}

/// The immediately preceding move of the game, consulted for en passant
/// eligibility. `piece` is the piece as it stood before the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
}

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Checks if a move is legal, including rule logic and self-check prevention.
pub fn is_valid_move(
    board: &Board,
    from: Square,
    to: Square,
    turn: Color,
    last_move: Option<LastMove>,
) -> Result<(), MoveError> {
    // 1. Validate the physical movement rules.
    validate_piece_logic(board, from, to, turn, last_move)?;

    // 2. Simulate on a scratch board and reject if our own king ends up
    //    attacked. apply_move also removes an en-passant victim, so
    //    discovered checks along the departure rank are seen.
    let mut next_board = board.clone();
    next_board.apply_move(from, to);

    if is_in_check(&next_board, turn) {
        return Err(MoveError::SelfCheck);
    }

    Ok(())
}

/// Checks whether `square` is attacked by any piece of `by_color`.
///
/// Uses the same physical movement rules as move validation, with two
/// deltas: pawns attack only diagonally forward, and castling / double-step
/// are irrelevant for attack purposes.
pub fn is_attacked(board: &Board, square: Square, by_color: Color) -> bool {
    board.pieces().any(|(sq, piece)| {
        piece.color == by_color && can_reach(board, sq, piece, square)
    })
}

fn can_reach(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    let d_row = target.row.abs_diff(from.row);
    let d_col = target.col.abs_diff(from.col);

    match piece.kind {
        PieceType::Pawn => {
            let forward = piece.color.forward();
            d_col == 1 && target.row as isize == from.row as isize + forward
        }
        PieceType::Knight => (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2),
        PieceType::King => d_row <= 1 && d_col <= 1 && (d_row, d_col) != (0, 0),
        PieceType::Rook => (d_row == 0) != (d_col == 0) && path_is_clear(board, from, target),
        PieceType::Bishop => d_row == d_col && d_row > 0 && path_is_clear(board, from, target),
        PieceType::Queen => {
            ((d_row == 0) != (d_col == 0) || (d_row == d_col && d_row > 0))
                && path_is_clear(board, from, target)
        }
    }
}

/// Checks if the `color` king is currently attacked.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.king_square(color) else {
        // No king means an invalid state, treat as check.
        return true;
    };
    is_attacked(board, king_sq, color.opposite())
}

/// Validates the geometry and specific rules for a piece move, IGNORING
/// self-check.
fn validate_piece_logic(
    board: &Board,
    from: Square,
    to: Square,
    turn: Color,
    last_move: Option<LastMove>,
) -> Result<(), MoveError> {
    let piece = board.get_piece(from).ok_or(MoveError::NoPieceAtSource)?;

    if piece.color != turn {
        return Err(MoveError::NotYourTurn);
    }

    if from == to {
        return Err(MoveError::InvalidMovePattern);
    }

    if let Some(target) = board.get_piece(to) {
        if target.color == piece.color {
            return Err(MoveError::TargetOccupiedByFriendly);
        }
    }

    let d_row = to.row.abs_diff(from.row);
    let d_col = to.col.abs_diff(from.col);

    match piece.kind {
        PieceType::Pawn => validate_pawn(board, piece.color, from, to, last_move),
        PieceType::Knight => validate_knight(d_row, d_col),
        PieceType::Bishop => validate_bishop(board, from, to, d_row, d_col),
        PieceType::Rook => validate_rook(board, from, to, d_row, d_col),
        PieceType::Queen => validate_queen(board, from, to, d_row, d_col),
        PieceType::King => validate_king(board, piece, from, to, d_row, d_col),
    }
}

fn validate_pawn(
    board: &Board,
    color: Color,
    from: Square,
    to: Square,
    last_move: Option<LastMove>,
) -> Result<(), MoveError> {
    let forward = color.forward();
    let d_col = to.col.abs_diff(from.col);

    // Single step forward into an empty square.
    if d_col == 0 && to.row as isize == from.row as isize + forward {
        if board.get_piece(to).is_some() {
            return Err(MoveError::BlockedPath);
        }
        return Ok(());
    }

    // Double step from the start rank, both squares empty.
    if d_col == 0
        && from.row == color.pawn_row()
        && to.row as isize == from.row as isize + 2 * forward
    {
        let step = unsafe {
            Square::new_unchecked((from.row as isize + forward) as usize, from.col)
        };
        if board.get_piece(step).is_some() || board.get_piece(to).is_some() {
            return Err(MoveError::BlockedPath);
        }
        return Ok(());
    }

    // Diagonal forward: capture, or en passant into an empty square.
    if d_col == 1 && to.row as isize == from.row as isize + forward {
        if board.get_piece(to).is_some() {
            // Friendly occupancy was already rejected, so this is a capture.
            return Ok(());
        }
        if is_en_passant(color, from, to, last_move) {
            return Ok(());
        }
        return Err(MoveError::InvalidMovePattern);
    }

    Err(MoveError::InvalidMovePattern)
}

/// En passant: permitted only if the immediately preceding move was an
/// opposing pawn double-step landing adjacent on the mover's rank, on the
/// destination file.
fn is_en_passant(color: Color, from: Square, to: Square, last_move: Option<LastMove>) -> bool {
    let Some(last) = last_move else {
        return false;
    };
    last.piece.kind == PieceType::Pawn
        && last.piece.color == color.opposite()
        && last.from.row.abs_diff(last.to.row) == 2
        && last.to.row == from.row
        && last.to.col == to.col
}

fn validate_knight(d_row: usize, d_col: usize) -> Result<(), MoveError> {
    // Knights ignore intervening pieces.
    if (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2) {
        Ok(())
    } else {
        Err(MoveError::InvalidMovePattern)
    }
}

fn validate_bishop(
    board: &Board,
    from: Square,
    to: Square,
    d_row: usize,
    d_col: usize,
) -> Result<(), MoveError> {
    if d_row != d_col {
        return Err(MoveError::InvalidMovePattern);
    }
    if !path_is_clear(board, from, to) {
        return Err(MoveError::BlockedPath);
    }
    Ok(())
}

fn validate_rook(
    board: &Board,
    from: Square,
    to: Square,
    d_row: usize,
    d_col: usize,
) -> Result<(), MoveError> {
    if d_row != 0 && d_col != 0 {
        return Err(MoveError::InvalidMovePattern);
    }
    if !path_is_clear(board, from, to) {
        return Err(MoveError::BlockedPath);
    }
    Ok(())
}

fn validate_queen(
    board: &Board,
    from: Square,
    to: Square,
    d_row: usize,
    d_col: usize,
) -> Result<(), MoveError> {
    if d_row != 0 && d_col != 0 && d_row != d_col {
        return Err(MoveError::InvalidMovePattern);
    }
    if !path_is_clear(board, from, to) {
        return Err(MoveError::BlockedPath);
    }
    Ok(())
}

fn validate_king(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    d_row: usize,
    d_col: usize,
) -> Result<(), MoveError> {
    // Plain single step in any direction.
    if d_row <= 1 && d_col <= 1 {
        return Ok(());
    }

    // Castling: a two-square horizontal move.
    if d_row == 0 && d_col == 2 {
        return validate_castling(board, piece, from, to);
    }

    Err(MoveError::InvalidMovePattern)
}

fn validate_castling(
    board: &Board,
    king: Piece,
    from: Square,
    to: Square,
) -> Result<(), MoveError> {
    if king.has_moved {
        return Err(MoveError::InvalidMovePattern);
    }

    let kingside = to.col > from.col;
    let rook_col = if kingside { 7 } else { 0 };
    let rook_sq = unsafe { Square::new_unchecked(from.row, rook_col) };

    let rook_ok = board.get_piece(rook_sq).is_some_and(|rook| {
        rook.kind == PieceType::Rook && rook.color == king.color && !rook.has_moved
    });
    if !rook_ok {
        return Err(MoveError::InvalidMovePattern);
    }

    // Every square between king and rook must be empty.
    let between: &[usize] = if kingside { &[5, 6] } else { &[1, 2, 3] };
    for &col in between {
        let sq = unsafe { Square::new_unchecked(from.row, col) };
        if board.get_piece(sq).is_some() {
            return Err(MoveError::BlockedPath);
        }
    }

    let enemy = king.color.opposite();

    // The king may not castle out of check.
    if is_attacked(board, from, enemy) {
        return Err(MoveError::SelfCheck);
    }

    // Nor through an attacked square. Simulate the king standing on the
    // transit square; the destination square is covered by the usual
    // self-check simulation.
    let transit_col = if kingside { 5 } else { 3 };
    let transit = unsafe { Square::new_unchecked(from.row, transit_col) };
    let mut scratch = board.clone();
    scratch.set_piece(from, None);
    scratch.set_piece(transit, Some(king));
    if is_attacked(&scratch, transit, enemy) {
        return Err(MoveError::SelfCheck);
    }

    Ok(())
}

fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    let d_row = (to.row as isize - from.row as isize).signum();
    let d_col = (to.col as isize - from.col as isize).signum();

    let mut sq = from;
    loop {
        sq = match sq.offset(d_row, d_col) {
            Some(next) => next,
            None => return false,
        };
        if sq == to {
            return true;
        }
        if board.get_piece(sq).is_some() {
            return false;
        }
    }
}

/// All legal destination squares for the piece on `from`, empty if the
/// square is vacant or holds an opposing piece.
pub fn legal_moves_from(
    board: &Board,
    from: Square,
    turn: Color,
    last_move: Option<LastMove>,
) -> Vec<Square> {
    let Some(piece) = board.get_piece(from) else {
        return Vec::new();
    };
    if piece.color != turn {
        return Vec::new();
    }

    candidate_targets(board, from, piece)
        .into_iter()
        .filter(|&to| is_valid_move(board, from, to, turn, last_move).is_ok())
        .collect()
}

/// Pseudo-legal target squares for a piece, before the self-check filter.
fn candidate_targets(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    let mut targets = Vec::new();

    match piece.kind {
        PieceType::Pawn => {
            let forward = piece.color.forward();
            for (dr, dc) in [(forward, 0), (2 * forward, 0), (forward, -1), (forward, 1)] {
                if let Some(sq) = from.offset(dr, dc) {
                    targets.push(sq);
                }
            }
        }
        PieceType::Knight => {
            for (dr, dc) in KNIGHT_OFFSETS {
                if let Some(sq) = from.offset(dr, dc) {
                    targets.push(sq);
                }
            }
        }
        PieceType::King => {
            for (dr, dc) in KING_OFFSETS {
                if let Some(sq) = from.offset(dr, dc) {
                    targets.push(sq);
                }
            }
            // Castling candidates.
            for dc in [-2, 2] {
                if let Some(sq) = from.offset(0, dc) {
                    targets.push(sq);
                }
            }
        }
        PieceType::Rook => push_ray_targets(board, from, &ROOK_DIRS, &mut targets),
        PieceType::Bishop => push_ray_targets(board, from, &BISHOP_DIRS, &mut targets),
        PieceType::Queen => {
            push_ray_targets(board, from, &ROOK_DIRS, &mut targets);
            push_ray_targets(board, from, &BISHOP_DIRS, &mut targets);
        }
    }

    targets
}

fn push_ray_targets(
    board: &Board,
    from: Square,
    dirs: &[(isize, isize)],
    targets: &mut Vec<Square>,
) {
    for &(dr, dc) in dirs {
        let mut sq = from;
        while let Some(next) = sq.offset(dr, dc) {
            targets.push(next);
            if board.get_piece(next).is_some() {
                break;
            }
            sq = next;
        }
    }
}

/// All legal moves for `color`, in board-scan order (ascending square index
/// of the moving piece, fixed candidate order per piece). This ordering is
/// the tie-break contract of the search engine.
pub fn generate_legal_moves(
    board: &Board,
    color: Color,
    last_move: Option<LastMove>,
) -> Vec<(Square, Square)> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces() {
        if piece.color != color {
            continue;
        }
        for to in legal_moves_from(board, from, color, last_move) {
            moves.push((from, to));
        }
    }
    moves
}

/// Early-exit variant of `generate_legal_moves` for terminality checks.
pub fn has_any_legal_move(board: &Board, color: Color, last_move: Option<LastMove>) -> bool {
    for (from, piece) in board.pieces() {
        if piece.color != color {
            continue;
        }
        if !legal_moves_from(board, from, color, last_move).is_empty() {
            return true;
        }
    }
    false
}
