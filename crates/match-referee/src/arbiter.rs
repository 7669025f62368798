//! The turn arbiter: drives one game between two proposers.

use crate::board::BoardManager;
use crate::outcome::{DrawReason, GameStatus, MoveOutcome};
use crate::proposer::{ProposalContext, ProposeError, Proposer};
use chess_model::Color;
use serde::{Serialize, Serializer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Limits governing one game: the outer ply cap and the inner retry bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    /// Maximum number of plies before the game is cut off.
    pub max_turns: u32,
    /// Maximum proposals per ply before the turn is forfeited.
    pub max_nested_turns: u32,
}

impl MatchLimits {
    /// Builds validated limits; both bounds must be at least 1.
    pub fn new(max_turns: i64, max_nested_turns: i64) -> Result<Self, ConfigError> {
        if max_turns < 1 {
            return Err(ConfigError::MaxTurns(max_turns));
        }
        if max_nested_turns < 1 {
            return Err(ConfigError::MaxNestedTurns(max_nested_turns));
        }
        Ok(MatchLimits {
            max_turns: max_turns as u32,
            max_nested_turns: max_nested_turns as u32,
        })
    }
}

impl Default for MatchLimits {
    fn default() -> Self {
        MatchLimits {
            max_turns: 50,
            max_nested_turns: 5,
        }
    }
}

/// Invalid game limits, rejected before any game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_turns must be at least 1, got {0}")]
    MaxTurns(i64),

    #[error("max_nested_turns must be at least 1, got {0}")]
    MaxNestedTurns(i64),
}

/// Requests cancellation of a running game; checked between plies.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the arbiter to stop before the next ply.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once an abort has been requested.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Checkmate,
    Stalemate,
    Draw(DrawReason),
    /// The ply cap elapsed without a terminal position.
    TurnLimit,
    /// An operator aborted the game between plies.
    Aborted,
    /// An unrecoverable fault, with its description.
    Error(String),
}

/// Final winner designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    White,
    Black,
    Draw,
    Undecided,
}

/// One submitted move attempt, accepted or not.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    /// The side whose proposer submitted the token.
    #[serde(serialize_with = "color_name")]
    pub side: Color,
    /// The token as submitted.
    pub token: String,
    /// What the board manager made of it.
    pub outcome: MoveOutcome,
}

fn color_name<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(color.name())
}

/// The structured result handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub white: String,
    pub black: String,
    pub completion: Completion,
    /// Status derived from the final position.
    pub status: GameStatus,
    pub winner: Winner,
    /// Final position in canonical FEN text.
    pub final_fen: String,
    pub plies_played: u32,
    pub forfeited_plies: u32,
    /// Every submitted attempt, in order.
    pub turns: Vec<TurnRecord>,
}

enum State {
    NotStarted,
    InProgress,
    Completed(Completion),
}

enum PlyResult {
    Moved,
    Forfeited,
    Fault(String),
}

/// State machine driving one game instance.
///
/// Per ply: the active proposer (strictly alternating, White first) is asked
/// for a move under a bounded retry loop; rejections are fed back as
/// feedback, and exhausting the bound forfeits the ply with the position
/// unchanged. Terminal conditions are probed between plies, and the ply cap
/// cuts the game off. Completed games are absorbing.
pub struct TurnArbiter {
    board: BoardManager,
    white: Box<dyn Proposer>,
    black: Box<dyn Proposer>,
    limits: MatchLimits,
    abort: AbortHandle,
    state: State,
    turns: Vec<TurnRecord>,
    forfeits: u32,
    plies: u32,
}

impl TurnArbiter {
    /// Creates an arbiter for one game; limits are validated here, before
    /// anything runs.
    pub fn new(
        white: Box<dyn Proposer>,
        black: Box<dyn Proposer>,
        limits: MatchLimits,
    ) -> Result<Self, ConfigError> {
        if limits.max_turns < 1 {
            return Err(ConfigError::MaxTurns(limits.max_turns as i64));
        }
        if limits.max_nested_turns < 1 {
            return Err(ConfigError::MaxNestedTurns(limits.max_nested_turns as i64));
        }
        Ok(TurnArbiter {
            board: BoardManager::new(),
            white,
            black,
            limits,
            abort: AbortHandle::new(),
            state: State::NotStarted,
            turns: Vec::new(),
            forfeits: 0,
            plies: 0,
        })
    }

    /// A handle for requesting cancellation from outside the game loop.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Runs the game to completion and returns the structured report.
    ///
    /// Terminal states are absorbing: running a completed game again
    /// returns the same report without replaying anything.
    pub fn run(&mut self) -> GameReport {
        if let State::Completed(completion) = &self.state {
            return self.report(completion.clone());
        }

        self.board.reset();
        self.turns.clear();
        self.forfeits = 0;
        self.plies = 0;
        self.state = State::InProgress;
        info!(
            white = self.white.name(),
            black = self.black.name(),
            max_turns = self.limits.max_turns,
            max_nested_turns = self.limits.max_nested_turns,
            "game started"
        );

        let completion = self.play();
        info!(?completion, plies = self.plies, "game finished");
        self.state = State::Completed(completion.clone());
        self.report(completion)
    }

    fn play(&mut self) -> Completion {
        for ply in 0..self.limits.max_turns {
            if self.abort.is_aborted() {
                warn!(ply, "game aborted by operator");
                return Completion::Aborted;
            }
            if let Some(done) = completion_for(self.board.status()) {
                return done;
            }

            let side = if ply % 2 == 0 {
                Color::White
            } else {
                Color::Black
            };
            self.plies += 1;
            match self.play_ply(side) {
                PlyResult::Moved => {}
                PlyResult::Forfeited => {
                    self.forfeits += 1;
                    warn!(
                        ply,
                        side = side.name(),
                        "ply forfeited after repeated invalid proposals"
                    );
                }
                PlyResult::Fault(message) => return Completion::Error(message),
            }
        }
        // The final ply may itself have ended the game.
        completion_for(self.board.status()).unwrap_or(Completion::TurnLimit)
    }

    fn play_ply(&mut self, side: Color) -> PlyResult {
        let position = self.board.snapshot();
        let legal = self.board.legal_tokens();
        let proposer = match side {
            Color::White => self.white.as_mut(),
            Color::Black => self.black.as_mut(),
        };
        let mut feedback: Option<String> = None;

        for attempt in 1..=self.limits.max_nested_turns {
            let ctx = ProposalContext {
                position: &position,
                legal_moves: &legal,
                feedback: feedback.as_deref(),
            };
            let token = match proposer.propose(&ctx) {
                Ok(token) => token,
                Err(ProposeError::Retryable(message)) => {
                    warn!(side = side.name(), attempt, %message, "proposer failed, retrying");
                    feedback = Some(message);
                    continue;
                }
                Err(ProposeError::Fatal(message)) => {
                    warn!(side = side.name(), %message, "proposer failed fatally");
                    return PlyResult::Fault(message);
                }
            };

            let outcome = self.board.apply_move(&token);
            let accepted = outcome.accepted;
            feedback = (!accepted).then(|| outcome.description.clone());
            self.turns.push(TurnRecord {
                side,
                token,
                outcome,
            });
            if accepted {
                return PlyResult::Moved;
            }
        }
        PlyResult::Forfeited
    }

    fn report(&self, completion: Completion) -> GameReport {
        let winner = match &completion {
            Completion::Checkmate => match self.board.snapshot().side_to_move {
                Color::White => Winner::Black,
                Color::Black => Winner::White,
            },
            Completion::Stalemate | Completion::Draw(_) => Winner::Draw,
            Completion::TurnLimit | Completion::Aborted | Completion::Error(_) => Winner::Undecided,
        };
        GameReport {
            white: self.white.name().to_string(),
            black: self.black.name().to_string(),
            completion,
            status: self.board.status(),
            winner,
            final_fen: self.board.to_fen(),
            plies_played: self.plies,
            forfeited_plies: self.forfeits,
            turns: self.turns.clone(),
        }
    }
}

fn completion_for(status: GameStatus) -> Option<Completion> {
    match status {
        GameStatus::Checkmate => Some(Completion::Checkmate),
        GameStatus::Stalemate => Some(Completion::Stalemate),
        GameStatus::Draw(reason) => Some(Completion::Draw(reason)),
        GameStatus::InProgress | GameStatus::Check => None,
    }
}
