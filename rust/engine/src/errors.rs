use thiserror::Error;

use crate::game::GamePhase;
use crate::invariants::Violation;
use crate::player::{Chips, Seat, SeatStatus};

/// Rule violations detected by the action validator. Always the caller's
/// fault and always recoverable by requesting a different action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("no betting is possible during {0:?}")]
    NotBettingPhase(GamePhase),
    #[error("It's not player {actual}'s turn (expected player {expected:?})")]
    NotPlayersTurn { expected: Option<Seat>, actual: Seat },
    #[error("player {seat} cannot act while {status:?}")]
    CannotAct { seat: Seat, status: SeatStatus },
    #[error("cannot check facing a bet of {to_call}; call, raise or fold")]
    CheckFacingBet { to_call: Chips },
    #[error("cannot bet into an open bet of {current_bet}; call, raise or fold")]
    BetIntoOpenBet { current_bet: Chips },
    #[error("Invalid bet amount: {amount}, minimum: {minimum}")]
    BetBelowMinimum { amount: Chips, minimum: Chips },
    #[error("cannot raise when nothing has been bet; bet instead")]
    RaiseWithoutBet,
    #[error("raise to {to} is below the minimum raise to {minimum}")]
    RaiseBelowMinimum { to: Chips, minimum: Chips },
    #[error("the betting round is complete; advance the hand first")]
    RoundComplete,
    #[error("the betting round is still open; player {waiting_on:?} has to act first")]
    RoundOpen { waiting_on: Option<Seat> },
    #[error("player {seat} already acted and no full raise has reopened the betting; call, fold or go all-in")]
    ActionNotReopened { seat: Seat },
}

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("invalid action: {0}")]
    InvalidAction(#[from] ActionError),
    #[error("Insufficient chips for action: player {seat} needs {required}, has {available}")]
    InsufficientChips {
        seat: Seat,
        required: Chips,
        available: Chips,
    },
    #[error("game state invariant violated: {}", summarize(.violations))]
    InvariantViolation { violations: Vec<Violation> },
    #[error("transition out of {phase:?} failed: {source}")]
    PhaseTransition {
        phase: GamePhase,
        #[source]
        source: Box<GameError>,
    },
    #[error("deck empty")]
    EmptyDeck,
    #[error("no player in seat {0}")]
    UnknownSeat(Seat),
    #[error("seat {0} is already taken")]
    SeatTaken(Seat),
    #[error("table is full ({max} seats)")]
    TableFull { max: usize },
    #[error("at least {min} players with chips are required, found {found}")]
    NotEnoughPlayers { min: usize, found: usize },
    #[error("the table would hold {total} chips, above the limit of {limit}")]
    ChipLimit { total: u64, limit: u64 },
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("invalid card: {0:?}")]
    InvalidCard(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GameError {
    /// Business errors propagate unchanged out of a phase transition; every
    /// other error is wrapped into [`GameError::PhaseTransition`].
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            GameError::InvalidAction(_)
                | GameError::InsufficientChips { .. }
                | GameError::InvariantViolation { .. }
                | GameError::PhaseTransition { .. }
        )
    }

    /// The error at the bottom of a chain of transition wrappers.
    pub fn root_cause(&self) -> &GameError {
        match self {
            GameError::PhaseTransition { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
