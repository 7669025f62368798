//! Orchestration core for games between autonomous move proposers.
//!
//! The referee owns the authoritative board state, validates and applies
//! proposed moves, detects terminal conditions and drives the turn-taking
//! protocol, including the bounded retry dialogue that follows an illegal
//! or malformed proposal.
//!
//! - [`BoardManager`] is the single source of truth for the position.
//! - [`Proposer`] is the capability contract a side must satisfy; it may be
//!   backed by a script, a random strategy or an external reasoning service.
//! - [`TurnArbiter`] runs one game to completion and produces a
//!   [`GameReport`] for the presentation layer.
//!
//! # Example
//!
//! ```
//! use match_referee::{FirstMoveProposer, MatchLimits, TurnArbiter};
//!
//! let mut arbiter = TurnArbiter::new(
//!     Box::new(FirstMoveProposer::new("white")),
//!     Box::new(FirstMoveProposer::new("black")),
//!     MatchLimits::new(4, 3).unwrap(),
//! )
//! .unwrap();
//! let report = arbiter.run();
//! assert_eq!(report.plies_played, 4);
//! ```

mod arbiter;
mod board;
mod outcome;
mod proposer;

pub use arbiter::{
    AbortHandle, Completion, ConfigError, GameReport, MatchLimits, TurnArbiter, TurnRecord, Winner,
};
pub use board::BoardManager;
pub use outcome::{DrawReason, GameStatus, MoveOutcome, RejectReason};
pub use proposer::{
    FirstMoveProposer, ProposalContext, ProposeError, Proposer, RandomProposer, ScriptedProposer,
};
