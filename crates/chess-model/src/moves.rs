//! Moves and coordinate move tokens.

use crate::{Piece, Square};
use std::fmt;
use thiserror::Error;

/// Classification of a move beyond its source and destination squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Plain move or capture.
    Quiet,
    /// Pawn double push from its starting rank.
    DoublePush,
    /// Kingside castling.
    CastleKingside,
    /// Queenside castling.
    CastleQueenside,
    /// En passant capture.
    EnPassant,
    /// Pawn promotion to the given piece.
    Promotion(Piece),
}

/// A fully classified move, as produced by the rules authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
}

impl Move {
    /// Creates a move.
    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move { from, to, kind }
    }

    /// Creates a plain move or capture.
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::Quiet)
    }

    /// Source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Move classification.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// The promotion piece, if this is a promotion.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    /// Canonical lowercase coordinate token, e.g. `e2e4` or `e7e8q`.
    pub fn uci(self) -> String {
        let mut token = format!("{}{}", self.from, self.to);
        if let MoveKind::Promotion(piece) = self.kind {
            if let Some(c) = piece.promotion_char() {
                token.push(c);
            }
        }
        token
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uci())
    }
}

/// A move token decoded from coordinate text, before any legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedToken {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

/// Failure modes when decoding a coordinate move token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("expected 4 or 5 characters, got {0}")]
    BadLength(usize),

    #[error("`{0}` is not a board square")]
    BadSquare(String),

    #[error("`{0}` is not a promotion piece (use q, r, b or n)")]
    BadPromotion(char),
}

/// Decodes a coordinate move token: source square, destination square and an
/// optional promotion letter. Accepts uppercase input; legality is not
/// checked here.
pub fn parse_token(token: &str) -> Result<ParsedToken, TokenError> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() != 4 && chars.len() != 5 {
        return Err(TokenError::BadLength(chars.len()));
    }
    let from = Square::from_chars(chars[0], chars[1])
        .ok_or_else(|| TokenError::BadSquare(chars[..2].iter().collect()))?;
    let to = Square::from_chars(chars[2], chars[3])
        .ok_or_else(|| TokenError::BadSquare(chars[2..4].iter().collect()))?;
    let promotion = match chars.get(4) {
        Some(&c) => Some(Piece::from_promotion_char(c).ok_or(TokenError::BadPromotion(c))?),
        None => None,
    };
    Ok(ParsedToken {
        from,
        to,
        promotion,
    })
}
