//! Position state.

use chess_model::{Color, Fen, FenError, Piece, Square};

/// Which castlings each side may still perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    /// All four castlings available.
    pub const fn all() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    /// No castling available.
    pub const fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    /// True if the given side may still castle kingside.
    pub const fn kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// True if the given side may still castle queenside.
    pub const fn queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    /// Removes both castlings for a side.
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke_kingside(color);
        self.revoke_queenside(color);
    }

    /// Removes the kingside castling for a side.
    pub fn revoke_kingside(&mut self, color: Color) {
        match color {
            Color::White => self.white_kingside = false,
            Color::Black => self.black_kingside = false,
        }
    }

    /// Removes the queenside castling for a side.
    pub fn revoke_queenside(&mut self, color: Color) {
        match color {
            Color::White => self.white_queenside = false,
            Color::Black => self.black_queenside = false,
        }
    }

    fn render(self) -> String {
        let mut out = String::new();
        if self.white_kingside {
            out.push('K');
        }
        if self.white_queenside {
            out.push('Q');
        }
        if self.black_kingside {
            out.push('k');
        }
        if self.black_queenside {
            out.push('q');
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}

/// A complete chess position: piece placement plus every piece of state
/// needed to resolve move legality.
///
/// Positions are immutable values; applying a move builds the successor
/// position rather than editing in place, so a half-applied move is never
/// observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<(Piece, Color)>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    fn blank() -> Self {
        Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting arrangement.
    pub fn startpos() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("the standard starting position parses")
    }

    /// Builds a position from a FEN record.
    pub fn from_fen(text: &str) -> Result<Self, FenError> {
        let fen = Fen::parse(text)?;
        let mut position = Self::blank();

        for (i, rank_text) in fen.placement.split('/').enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::new(file, rank) {
                        position.board[sq.index()] = Some((piece, color));
                    }
                    file += 1;
                }
            }
        }

        position.side_to_move = match fen.side_to_move {
            'b' => Color::Black,
            _ => Color::White,
        };
        position.castling = CastlingRights {
            white_kingside: fen.castling.contains('K'),
            white_queenside: fen.castling.contains('Q'),
            black_kingside: fen.castling.contains('k'),
            black_queenside: fen.castling.contains('q'),
        };
        position.en_passant = Square::from_algebraic(&fen.en_passant);
        position.halfmove_clock = fen.halfmove_clock;
        position.fullmove_number = fen.fullmove_number;
        Ok(position)
    }

    /// Renders the position as a FEN record.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(file, rank).expect("file and rank are in range");
                match self.board[sq.index()] {
                    Some((piece, color)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let en_passant = match self.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {} {} {} {}",
            placement,
            match self.side_to_move {
                Color::White => 'w',
                Color::Black => 'b',
            },
            self.castling.render(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// The first four FEN fields; positions with equal keys are identical
    /// for repetition purposes (clocks excluded).
    pub fn repetition_key(&self) -> String {
        let fen = self.to_fen();
        let fields: Vec<&str> = fen.split_whitespace().take(4).collect();
        fields.join(" ")
    }

    /// The piece and color on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board[sq.index()]
    }

    pub(crate) fn set(&mut self, sq: Square, piece: Piece, color: Color) {
        self.board[sq.index()] = Some((piece, color));
    }

    pub(crate) fn clear(&mut self, sq: Square) {
        self.board[sq.index()] = None;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
