//! Per-phase behaviour of a hand.
//!
//! Every handler exposes the same three steps: `enter` deals and sets up the
//! phase, `execute` applies a validated action and reports whether the
//! betting round goes on, `exit` closes the phase and names the next one
//! (`None` once the hand is over).

mod betting;
mod preflop;
pub mod showdown;
mod street;

pub use preflop::PreFlop;
pub use showdown::{PotAward, Showdown, ShowdownSummary};
pub use street::Street;

use crate::deck::CardSource;
use crate::errors::{ActionError, GameError};
use crate::events::{timestamp, GameEvent};
use crate::game::{GamePhase, GameState};
use crate::hand::HandEvaluator;
use crate::rules::ValidatedAction;

/// What a phase may use besides the state: cards to deal and a way to rank
/// hands.
pub struct PhaseContext<'a, E: HandEvaluator> {
    pub deck: &'a mut dyn CardSource,
    pub evaluator: &'a E,
}

pub trait PhaseHandler {
    fn phase(&self) -> GamePhase;

    fn enter<E: HandEvaluator>(
        &self,
        state: &mut GameState,
        ctx: &mut PhaseContext<'_, E>,
    ) -> Result<(), GameError>;

    /// Returns `true` while the betting round continues.
    fn execute(&self, state: &mut GameState, action: &ValidatedAction) -> Result<bool, GameError>;

    fn exit(&self, state: &mut GameState) -> Result<Option<GamePhase>, GameError>;
}

/// Handler for whichever phase the state is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreFlop(PreFlop),
    Street(Street),
    Showdown(Showdown),
}

impl Phase {
    /// `None` for `Init` and `Finished`, which have no handler.
    pub fn for_phase(phase: GamePhase) -> Option<Phase> {
        match phase {
            GamePhase::PreFlop => Some(Phase::PreFlop(PreFlop)),
            GamePhase::Flop | GamePhase::Turn | GamePhase::River => {
                Some(Phase::Street(Street::new(phase)))
            }
            GamePhase::Showdown => Some(Phase::Showdown(Showdown)),
            GamePhase::Init | GamePhase::Finished => None,
        }
    }
}

impl PhaseHandler for Phase {
    fn phase(&self) -> GamePhase {
        match self {
            Phase::PreFlop(h) => h.phase(),
            Phase::Street(h) => h.phase(),
            Phase::Showdown(h) => h.phase(),
        }
    }

    fn enter<E: HandEvaluator>(
        &self,
        state: &mut GameState,
        ctx: &mut PhaseContext<'_, E>,
    ) -> Result<(), GameError> {
        match self {
            Phase::PreFlop(h) => h.enter(state, ctx),
            Phase::Street(h) => h.enter(state, ctx),
            Phase::Showdown(h) => h.enter(state, ctx),
        }
    }

    fn execute(&self, state: &mut GameState, action: &ValidatedAction) -> Result<bool, GameError> {
        match self {
            Phase::PreFlop(h) => h.execute(state, action),
            Phase::Street(h) => h.execute(state, action),
            Phase::Showdown(h) => h.execute(state, action),
        }
    }

    fn exit(&self, state: &mut GameState) -> Result<Option<GamePhase>, GameError> {
        match self {
            Phase::PreFlop(h) => h.exit(state),
            Phase::Street(h) => h.exit(state),
            Phase::Showdown(h) => h.exit(state),
        }
    }
}

/// Exits the current phase and enters the next. Not transactional on its
/// own; callers wrap it in [`crate::transition::transactional`].
///
/// A betting phase is only left once its round is complete; before that the
/// call fails with [`ActionError::RoundOpen`] and changes nothing.
pub fn advance<E: HandEvaluator>(
    state: &mut GameState,
    ctx: &mut PhaseContext<'_, E>,
) -> Result<GamePhase, GameError> {
    ensure_round_closed(state)?;
    let from = state.phase();
    let handler = Phase::for_phase(from).ok_or(GameError::NoHandInProgress)?;
    let next = handler.exit(state)?;
    let to = next.unwrap_or(GamePhase::Finished);
    state.phase = to;
    state.push_event(GameEvent::PhaseChanged { from, to });
    tracing::info!(hand = state.hand_number(), ?from, ?to, "phase changed");
    match Phase::for_phase(to) {
        Some(handler) => handler.enter(state, ctx)?,
        None => state.push_event(GameEvent::HandFinished {
            hand_number: state.hand_number(),
            ts: timestamp(),
        }),
    }
    Ok(to)
}

/// Fails while the current betting round still waits on a decision.
pub fn ensure_round_closed(state: &GameState) -> Result<(), GameError> {
    if state.phase().is_betting() && !state.is_betting_round_complete() {
        return Err(ActionError::RoundOpen {
            waiting_on: state.active_player(),
        }
        .into());
    }
    Ok(())
}
