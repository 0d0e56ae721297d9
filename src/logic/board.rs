use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Pawn movement direction along the row axis.
    pub const fn forward(self) -> isize {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// The rank index a pawn of this color promotes on.
    pub const fn promotion_row(self) -> usize {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// The rank index this color's pawns start on.
    pub const fn pawn_row(self) -> usize {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// The rank index of this color's back rank (king, rooks).
    pub const fn back_row(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceType, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }
}

/// A board coordinate, guaranteed in-bounds by construction.
/// Row 0 is White's home rank (rank 1), row 7 is Black's (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

/// Wire-side shape of a [`Square`]. Payloads arrive from untrusted peers,
/// so the coordinates are range-checked before they can index a board.
#[derive(Deserialize)]
struct RawSquare {
    row: usize,
    col: usize,
}

impl TryFrom<RawSquare> for Square {
    type Error = SquareOutOfBounds;

    fn try_from(raw: RawSquare) -> Result<Self, Self::Error> {
        Self::new(raw.row, raw.col).ok_or(SquareOutOfBounds {
            row: raw.row,
            col: raw.col,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("square ({row}, {col}) is off the board")]
pub struct SquareOutOfBounds {
    pub row: usize,
    pub col: usize,
}

impl Square {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// # Safety
    /// Caller must guarantee `row < 8` and `col < 8`.
    #[must_use]
    pub const unsafe fn new_unchecked(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let r = self.row as isize + d_row;
        let c = self.col as isize + d_col;
        if r >= 0 && r < 8 && c >= 0 && c < 8 {
            Some(Self {
                row: r as usize,
                col: c as usize,
            })
        } else {
            None
        }
    }

    pub const fn file_char(self) -> char {
        (b'a' + self.col as u8) as char
    }

    pub const fn rank_char(self) -> char {
        (b'1' + self.row as u8) as char
    }

    #[must_use]
    pub fn algebraic(self) -> String {
        let mut s = String::with_capacity(2);
        s.push(self.file_char());
        s.push(self.rank_char());
        s
    }

    /// Parses `"e4"` style coordinates.
    #[must_use]
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Self::new(rank as usize - '1' as usize, file as usize - 'a' as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Mailbox representation, row-major from White's side.
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { grid: [None; 64] }
    }

    fn setup_initial_position(&mut self) {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for color in [Color::White, Color::Black] {
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                let sq = unsafe { Square::new_unchecked(color.back_row(), col) };
                self.set_piece(sq, Some(Piece::new(kind, color)));
            }
            for col in 0..8 {
                let sq = unsafe { Square::new_unchecked(color.pawn_row(), col) };
                self.set_piece(sq, Some(Piece::new(PieceType::Pawn, color)));
            }
        }
    }

    #[must_use]
    pub const fn square_index(sq: Square) -> usize {
        sq.row * 8 + sq.col
    }

    #[must_use]
    pub const fn index_to_square(idx: usize) -> Square {
        Square {
            row: idx / 8,
            col: idx % 8,
        }
    }

    #[must_use]
    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        self.grid[Self::square_index(sq)]
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[Self::square_index(sq)] = piece;
    }

    /// Iterates over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.map(|piece| (Self::index_to_square(idx), piece)))
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.kind == PieceType::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    /// Applies a move at board level, including its side effects:
    /// en passant removal, castling rook relocation and automatic queen
    /// promotion. Returns the captured piece, if any.
    ///
    /// Legality is the caller's responsibility; this is the single mutation
    /// primitive shared by the executor, the legality simulation and the
    /// search.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let Some(mut piece) = self.get_piece(from) else {
            return None;
        };

        let mut captured = self.get_piece(to);

        // En passant: pawn moves diagonally into an empty square. The victim
        // sits on the departure rank, destination file.
        if piece.kind == PieceType::Pawn && from.col != to.col && captured.is_none() {
            let victim_sq = unsafe { Square::new_unchecked(from.row, to.col) };
            captured = self.get_piece(victim_sq);
            self.set_piece(victim_sq, None);
        }

        // Castling: king moves two files, the rook jumps to his other side.
        if piece.kind == PieceType::King && from.col.abs_diff(to.col) == 2 {
            let (rook_from_col, rook_to_col) = if to.col > from.col { (7, 5) } else { (0, 3) };
            let rook_from = unsafe { Square::new_unchecked(from.row, rook_from_col) };
            let rook_to = unsafe { Square::new_unchecked(from.row, rook_to_col) };
            if let Some(mut rook) = self.get_piece(rook_from) {
                rook.has_moved = true;
                self.set_piece(rook_from, None);
                self.set_piece(rook_to, Some(rook));
            }
        }

        // Promotion is always to queen; no underpromotion choice is exposed.
        if piece.kind == PieceType::Pawn && to.row == piece.color.promotion_row() {
            piece.kind = PieceType::Queen;
        }

        piece.has_moved = true;
        self.set_piece(from, None);
        self.set_piece(to, Some(piece));

        captured
    }

    pub fn to_fen(&self, turn: Color) -> String {
        let mut fen = String::new();
        for r in (0..8).rev() {
            let mut empty_count = 0;
            for c in 0..8 {
                let sq = unsafe { Square::new_unchecked(r, c) };
                if let Some(piece) = self.get_piece(sq) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let char_code = match piece.kind {
                        PieceType::Pawn => 'p',
                        PieceType::Knight => 'n',
                        PieceType::Bishop => 'b',
                        PieceType::Rook => 'r',
                        PieceType::Queen => 'q',
                        PieceType::King => 'k',
                    };
                    let final_char = if piece.color == Color::White {
                        char_code.to_ascii_uppercase()
                    } else {
                        char_code
                    };
                    fen.push(final_char);
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if r > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if turn == Color::White { 'w' } else { 'b' });

        fen
    }

    /// Parses the placement and side-to-move fields of a FEN string.
    ///
    /// `has_moved` is reconstructed heuristically: a piece standing on its
    /// initial square is assumed unmoved, anything else has moved.
    pub fn from_fen(fen: &str) -> Result<(Self, Color), FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::MissingField)?;
        let turn = match parts.next() {
            Some("w") | None => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(FenError::BadTurn),
        };

        let mut board = Self::empty();
        let mut row = 7usize;
        let mut col = 0usize;

        for ch in placement.chars() {
            match ch {
                '/' => {
                    if row == 0 {
                        return Err(FenError::BadPlacement);
                    }
                    row -= 1;
                    col = 0;
                }
                '1'..='8' => {
                    col += ch as usize - '0' as usize;
                    if col > 8 {
                        return Err(FenError::BadPlacement);
                    }
                }
                _ => {
                    let kind = match ch.to_ascii_lowercase() {
                        'p' => PieceType::Pawn,
                        'n' => PieceType::Knight,
                        'b' => PieceType::Bishop,
                        'r' => PieceType::Rook,
                        'q' => PieceType::Queen,
                        'k' => PieceType::King,
                        _ => return Err(FenError::BadPiece(ch)),
                    };
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let sq = Square::new(row, col).ok_or(FenError::BadPlacement)?;
                    let mut piece = Piece::new(kind, color);
                    piece.has_moved = !Self::is_home_square(kind, color, sq);
                    board.set_piece(sq, Some(piece));
                    col += 1;
                }
            }
        }

        Ok((board, turn))
    }

    fn is_home_square(kind: PieceType, color: Color, sq: Square) -> bool {
        match kind {
            PieceType::Pawn => sq.row == color.pawn_row(),
            PieceType::Rook => sq.row == color.back_row() && (sq.col == 0 || sq.col == 7),
            PieceType::Knight => sq.row == color.back_row() && (sq.col == 1 || sq.col == 6),
            PieceType::Bishop => sq.row == color.back_row() && (sq.col == 2 || sq.col == 5),
            PieceType::Queen => sq.row == color.back_row() && sq.col == 3,
            PieceType::King => sq.row == color.back_row() && sq.col == 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("missing placement field")]
    MissingField,
    #[error("invalid side-to-move field")]
    BadTurn,
    #[error("invalid placement field")]
    BadPlacement,
    #[error("unknown piece character `{0}`")]
    BadPiece(char),
}
