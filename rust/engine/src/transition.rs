//! All-or-nothing phase transitions.

use crate::errors::GameError;
use crate::game::{GamePhase, GameState};
use crate::invariants::InvariantChecker;

/// Holds a copy of the state taken before a transition and puts it back when
/// dropped, unless [`TransitionGuard::commit`] was called first. Dropping
/// during a panic restores as well.
pub struct TransitionGuard<'a> {
    state: &'a mut GameState,
    snapshot: Option<GameState>,
}

impl<'a> TransitionGuard<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        let snapshot = Some(state.clone());
        Self { state, snapshot }
    }

    pub fn state(&mut self) -> &mut GameState {
        self.state
    }

    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            tracing::warn!(
                hand = snapshot.hand_number(),
                from = ?snapshot.phase(),
                reached = ?self.state.phase(),
                "transition rolled back"
            );
            *self.state = snapshot;
        }
    }
}

/// Runs `f` against `state` and checks the result; keeps the changes only if
/// both succeed.
///
/// Business errors come back unchanged. Anything else is wrapped in
/// [`GameError::PhaseTransition`] naming the phase the transition started
/// from.
///
/// # Errors
///
/// Whatever `f` returns, and [`GameError::InvariantViolation`] when the
/// checker enforces and finds a critical violation.
///
/// # Examples
///
/// ```
/// use holdem_engine::errors::GameError;
/// use holdem_engine::game::{GamePhase, GameState};
/// use holdem_engine::invariants::{CheckMode, InvariantChecker};
/// use holdem_engine::player::Player;
/// use holdem_engine::transition::transactional;
///
/// let mut state = GameState::with_players(vec![Player::new(0, 100), Player::new(1, 100)], 0, 1, 2);
/// let before = state.clone();
/// let checker = InvariantChecker::new(200, CheckMode::Enforce);
///
/// let err = transactional(&mut state, &checker, |s| {
///     s.set_blinds()?;
///     Err::<(), _>(GameError::EmptyDeck)
/// })
/// .unwrap_err();
///
/// assert!(matches!(err, GameError::PhaseTransition { phase: GamePhase::Init, .. }));
/// assert_eq!(state, before);
/// ```
pub fn transactional<T, F>(
    state: &mut GameState,
    checker: &InvariantChecker,
    f: F,
) -> Result<T, GameError>
where
    F: FnOnce(&mut GameState) -> Result<T, GameError>,
{
    let from = state.phase();
    let mut guard = TransitionGuard::new(state);
    let value = f(guard.state()).map_err(|e| wrap(from, e))?;
    checker.enforce(guard.state())?;
    guard.commit();
    Ok(value)
}

fn wrap(phase: GamePhase, error: GameError) -> GameError {
    if error.is_business() {
        error
    } else {
        tracing::warn!(?phase, %error, "transition failed");
        GameError::PhaseTransition {
            phase,
            source: Box::new(error),
        }
    }
}
