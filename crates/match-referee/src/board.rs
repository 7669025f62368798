//! The board manager: sole owner of the live position.

use crate::outcome::{DrawReason, GameStatus, MoveOutcome, RejectReason};
use chess_model::{parse_token, FenError, Move};
use chess_rules::{apply, in_check, insufficient_material, legal_moves, Position};
use std::collections::HashMap;
use tracing::{debug, info};

/// Owns the authoritative [`Position`] and the repetition history.
///
/// Every mutation goes through [`apply_move`](BoardManager::apply_move),
/// which commits the successor position atomically: a rejected token leaves
/// the position untouched, and no partially applied move is ever observable.
pub struct BoardManager {
    position: Position,
    seen: HashMap<String, u32>,
}

impl BoardManager {
    /// Creates a manager holding the standard starting arrangement.
    pub fn new() -> Self {
        let mut manager = BoardManager {
            position: Position::startpos(),
            seen: HashMap::new(),
        };
        manager.note_position();
        manager
    }

    /// Creates a manager from an arbitrary FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut manager = BoardManager {
            position: Position::from_fen(fen)?,
            seen: HashMap::new(),
        };
        manager.note_position();
        Ok(manager)
    }

    /// Reinitializes to the standard starting arrangement and clears the
    /// repetition history.
    pub fn reset(&mut self) {
        self.position = Position::startpos();
        self.seen.clear();
        self.note_position();
        info!("board reset to the starting position");
    }

    fn note_position(&mut self) {
        *self.seen.entry(self.position.repetition_key()).or_insert(0) += 1;
    }

    fn occurrences(&self) -> u32 {
        self.seen
            .get(&self.position.repetition_key())
            .copied()
            .unwrap_or(0)
    }

    /// Every legal move in the current position, in a stable order.
    ///
    /// An empty result signals checkmate or stalemate; [`in_check`](Self::in_check)
    /// disambiguates.
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position)
    }

    /// Legal moves rendered as coordinate tokens.
    pub fn legal_tokens(&self) -> Vec<String> {
        self.legal_moves().iter().map(|m| m.uci()).collect()
    }

    /// True if the side to move is in check.
    pub fn in_check(&self) -> bool {
        in_check(&self.position, self.position.side_to_move)
    }

    /// Read-only copy of the current position.
    pub fn snapshot(&self) -> Position {
        self.position.clone()
    }

    /// Current position in canonical FEN text.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Validates a coordinate move token and, if it names a legal move,
    /// applies it.
    ///
    /// Rejections come back as data with `accepted == false`: `Malformed`
    /// when the token does not parse, `Illegal` when it parses but matches
    /// no legal move. Accepted outcomes describe the move and carry the
    /// post-move check/checkmate/stalemate flags.
    pub fn apply_move(&mut self, token: &str) -> MoveOutcome {
        let parsed = match parse_token(token) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(%token, %err, "rejected malformed move token");
                return MoveOutcome::rejected(
                    RejectReason::Malformed,
                    format!(
                        "Invalid move format `{token}`: {err}. \
                         Use coordinate notation such as e2e4 or e7e8q."
                    ),
                );
            }
        };

        let matched = self.legal_moves().into_iter().find(|m| {
            m.from() == parsed.from && m.to() == parsed.to && m.promotion() == parsed.promotion
        });
        let Some(mv) = matched else {
            debug!(%token, "rejected illegal move");
            return MoveOutcome::rejected(
                RejectReason::Illegal,
                format!("Illegal move `{token}` in the current position."),
            );
        };

        let mover = self.position.side_to_move;
        let (piece, _) = self
            .position
            .piece_at(mv.from())
            .expect("a legal move starts from an occupied square");

        self.position = apply(&self.position, mv);
        self.note_position();

        let replies = legal_moves(&self.position);
        let check = in_check(&self.position, self.position.side_to_move);
        let is_checkmate = check && replies.is_empty();
        let is_check = check && !replies.is_empty();
        let is_stalemate = !check && replies.is_empty();

        let mut description = format!(
            "Moved {} {} from {} to {}.",
            mover.name(),
            piece.name(),
            mv.from(),
            mv.to()
        );
        if is_checkmate {
            description.push_str(" Checkmate!");
        } else if is_check {
            description.push_str(" Check!");
        } else if is_stalemate {
            description.push_str(" Stalemate!");
        }
        info!(token = %mv.uci(), "{}", description);

        MoveOutcome {
            accepted: true,
            reject_reason: None,
            is_check,
            is_checkmate,
            is_stalemate,
            description,
        }
    }

    /// Derives the game status for the current position.
    ///
    /// A position with no legal moves is checkmate or stalemate before it is
    /// anything else; draws by rule are probed next, then check.
    pub fn status(&self) -> GameStatus {
        let moves = legal_moves(&self.position);
        let check = self.in_check();
        if moves.is_empty() {
            return if check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if insufficient_material(&self.position) {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if self.position.halfmove_clock >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }
        if self.occurrences() >= 3 {
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }
        if check {
            GameStatus::Check
        } else {
            GameStatus::InProgress
        }
    }
}

impl Default for BoardManager {
    fn default() -> Self {
        Self::new()
    }
}
