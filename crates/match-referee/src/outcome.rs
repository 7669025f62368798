//! Move outcomes and derived game status.

use serde::Serialize;
use std::fmt;

/// Why a submitted move token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The token does not parse as coordinate notation.
    Malformed,
    /// The token parses but names no legal move in the current position.
    Illegal,
}

/// The result of one `apply_move` attempt.
///
/// Built once per attempt and never mutated. Rejections are ordinary data,
/// not errors: a bad proposal is an expected event in this protocol. The
/// check/checkmate/stalemate flags report the position *after* an accepted
/// move and feed the arbiter's termination probe directly.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<RejectReason>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    /// Human-readable summary, also used as retry feedback for proposers.
    pub description: String,
}

impl MoveOutcome {
    pub(crate) fn rejected(reason: RejectReason, description: String) -> Self {
        MoveOutcome {
            accepted: false,
            reject_reason: Some(reason),
            is_check: false,
            is_checkmate: false,
            is_stalemate: false,
            description,
        }
    }
}

/// Reason a finished game is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::FiftyMoveRule => write!(f, "fifty-move rule"),
            DrawReason::ThreefoldRepetition => write!(f, "threefold repetition"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

/// Game state derived from the current position.
///
/// `Checkmate` and `Stalemate` are mutually exclusive and both end the game;
/// `InProgress` and `Check` do not. The turn-limit terminal is not a
/// position property and lives in the arbiter's completion type instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    /// True for any status that ends the game.
    pub const fn is_game_over(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(reason) => write!(f, "draw ({reason})"),
        }
    }
}
