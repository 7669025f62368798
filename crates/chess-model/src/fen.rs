//! FEN (Forsyth-Edwards Notation) field parsing and validation.

use thiserror::Error;

/// Errors raised while parsing a FEN record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 whitespace-separated fields, got {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move `{0}`, expected `w` or `b`")]
    SideToMove(String),

    #[error("bad castling field `{0}`")]
    Castling(String),

    #[error("bad en passant field `{0}`")]
    EnPassant(String),

    #[error("bad halfmove clock `{0}`")]
    HalfmoveClock(String),

    #[error("bad fullmove number `{0}`")]
    FullmoveNumber(String),
}

/// The six fields of a FEN record, validated but not yet interpreted.
///
/// The rules crate turns this into its position representation; this type
/// only guarantees the text is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece placement, e.g. `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`.
    pub placement: String,
    /// Side to move, `w` or `b`.
    pub side_to_move: char,
    /// Castling availability, e.g. `KQkq` or `-`.
    pub castling: String,
    /// En passant target square, e.g. `e3` or `-`.
    pub en_passant: String,
    /// Halfmove clock for the fifty-move rule.
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN record.
    pub fn parse(text: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        Self::check_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => 'w',
            "b" => 'b',
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        Self::check_castling(fields[2])?;
        Self::check_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;
        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;

        Ok(Fen {
            placement: fields[0].to_string(),
            side_to_move,
            castling: fields[2].to_string(),
            en_passant: fields[3].to_string(),
            halfmove_clock,
            fullmove_number,
        })
    }

    fn check_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }
        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0u32;
            for c in rank.chars() {
                if let Some(d) = c.to_digit(10) {
                    squares += d;
                } else if "pnbrqkPNBRQK".contains(c) {
                    squares += 1;
                } else {
                    return Err(FenError::Placement(format!(
                        "invalid character `{}` in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::Placement(format!(
                    "rank {} covers {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }
        Ok(())
    }

    fn check_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }
        if castling.is_empty() || castling.chars().any(|c| !"KQkq".contains(c)) {
            return Err(FenError::Castling(castling.to_string()));
        }
        Ok(())
    }

    fn check_en_passant(en_passant: &str) -> Result<(), FenError> {
        if en_passant == "-" {
            return Ok(());
        }
        let chars: Vec<char> = en_passant.chars().collect();
        let valid = chars.len() == 2
            && ('a'..='h').contains(&chars[0])
            && (chars[1] == '3' || chars[1] == '6');
        if !valid {
            return Err(FenError::EnPassant(en_passant.to_string()));
        }
        Ok(())
    }

    /// Renders the record back to FEN text.
    pub fn render(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.placement,
            self.side_to_move,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
