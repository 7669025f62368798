//! The proposer capability: one contract, many backing strategies.

use chess_rules::Position;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use thiserror::Error;

/// Everything a proposer may look at when choosing a move.
pub struct ProposalContext<'a> {
    /// Immutable snapshot of the current position.
    pub position: &'a Position,
    /// Legal moves as coordinate tokens, in the board manager's order.
    pub legal_moves: &'a [String],
    /// Rejection feedback from the previous attempt of this ply, if any.
    pub feedback: Option<&'a str>,
}

/// Failure modes of a proposer.
#[derive(Debug, Error)]
pub enum ProposeError {
    /// Transient failure (timeout, unusable output); the arbiter retries
    /// with feedback, consuming one attempt of the inner bound.
    #[error("proposer failed (retryable): {0}")]
    Retryable(String),
    /// The proposer cannot produce output at all; the game ends in an
    /// error completion.
    #[error("proposer failed fatally: {0}")]
    Fatal(String),
}

/// A source of candidate moves for one side.
///
/// A proposer may be scripted, random, human-driven or backed by an
/// external reasoning service; the arbiter only ever sees this contract.
pub trait Proposer {
    /// Display name used in logs and reports.
    fn name(&self) -> &str;

    /// Produces a candidate move token for the given context.
    fn propose(&mut self, ctx: &ProposalContext<'_>) -> Result<String, ProposeError>;
}

/// Always plays the first listed legal move.
pub struct FirstMoveProposer {
    name: String,
}

impl FirstMoveProposer {
    pub fn new(name: impl Into<String>) -> Self {
        FirstMoveProposer { name: name.into() }
    }
}

impl Proposer for FirstMoveProposer {
    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, ctx: &ProposalContext<'_>) -> Result<String, ProposeError> {
        ctx.legal_moves
            .first()
            .cloned()
            .ok_or_else(|| ProposeError::Fatal("no legal moves to choose from".to_string()))
    }
}

/// Plays a uniformly random legal move.
pub struct RandomProposer {
    name: String,
}

impl RandomProposer {
    pub fn new(name: impl Into<String>) -> Self {
        RandomProposer { name: name.into() }
    }
}

impl Proposer for RandomProposer {
    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, ctx: &ProposalContext<'_>) -> Result<String, ProposeError> {
        ctx.legal_moves
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ProposeError::Fatal("no legal moves to choose from".to_string()))
    }
}

/// Replays a fixed sequence of tokens, then fails.
pub struct ScriptedProposer {
    name: String,
    script: VecDeque<String>,
}

impl ScriptedProposer {
    pub fn new<I, T>(name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ScriptedProposer {
            name: name.into(),
            script: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl Proposer for ScriptedProposer {
    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, _ctx: &ProposalContext<'_>) -> Result<String, ProposeError> {
        self.script
            .pop_front()
            .ok_or_else(|| ProposeError::Fatal(format!("script for `{}` is exhausted", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(position: &'a Position, legal: &'a [String]) -> ProposalContext<'a> {
        ProposalContext {
            position,
            legal_moves: legal,
            feedback: None,
        }
    }

    #[test]
    fn first_move_picks_head_of_list() {
        let position = Position::startpos();
        let legal = vec!["a2a3".to_string(), "a2a4".to_string()];
        let mut proposer = FirstMoveProposer::new("first");
        assert_eq!(
            proposer.propose(&context(&position, &legal)).unwrap(),
            "a2a3"
        );
        assert_eq!(proposer.name(), "first");
    }

    #[test]
    fn first_move_fails_without_moves() {
        let position = Position::startpos();
        let mut proposer = FirstMoveProposer::new("first");
        assert!(matches!(
            proposer.propose(&context(&position, &[])),
            Err(ProposeError::Fatal(_))
        ));
    }

    #[test]
    fn random_picks_a_listed_move() {
        let position = Position::startpos();
        let legal = vec!["e2e4".to_string(), "d2d4".to_string(), "g1f3".to_string()];
        let mut proposer = RandomProposer::new("random");
        for _ in 0..20 {
            let token = proposer.propose(&context(&position, &legal)).unwrap();
            assert!(legal.contains(&token));
        }
    }

    #[test]
    fn scripted_replays_in_order_then_fails() {
        let position = Position::startpos();
        let legal: Vec<String> = Vec::new();
        let mut proposer = ScriptedProposer::new("script", ["e2e4", "g1f3"]);
        assert_eq!(
            proposer.propose(&context(&position, &legal)).unwrap(),
            "e2e4"
        );
        assert_eq!(
            proposer.propose(&context(&position, &legal)).unwrap(),
            "g1f3"
        );
        assert!(matches!(
            proposer.propose(&context(&position, &legal)),
            Err(ProposeError::Fatal(_))
        ));
    }
}
