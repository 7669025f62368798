//! Core chess types shared by the rules authority and the match referee.
//!
//! This crate provides the vocabulary of the workspace:
//! - [`Color`] and [`Piece`] for piece identity
//! - [`Square`] for board coordinates
//! - [`Move`] and coordinate move-token parsing
//! - FEN field parsing and validation

mod color;
mod fen;
mod moves;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use moves::{parse_token, Move, MoveKind, ParsedToken, TokenError};
pub use piece::Piece;
pub use square::Square;
