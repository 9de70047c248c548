use crate::errors::{ActionError, GameError};
use crate::game::GameState;
use crate::player::{Action, ActionType, Chips, Player, Seat};

/// What an action actually does once the betting rules have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAction {
    Fold,
    Check,
    /// Chips added to match the current bet
    Call(Chips),
    /// Opening bet
    Bet(Chips),
    /// Total bet for the round after raising
    Raise(Chips),
    /// Chips added, which is the whole stack
    AllIn(Chips),
}

impl ResolvedAction {
    pub fn action_type(self) -> ActionType {
        match self {
            ResolvedAction::Fold => ActionType::Fold,
            ResolvedAction::Check => ActionType::Check,
            ResolvedAction::Call(_) => ActionType::Call,
            ResolvedAction::Bet(_) => ActionType::Bet,
            ResolvedAction::Raise(_) => ActionType::Raise,
            ResolvedAction::AllIn(_) => ActionType::AllIn,
        }
    }

    pub fn amount(self) -> Chips {
        match self {
            ResolvedAction::Fold | ResolvedAction::Check => 0,
            ResolvedAction::Call(c)
            | ResolvedAction::Bet(c)
            | ResolvedAction::Raise(c)
            | ResolvedAction::AllIn(c) => c,
        }
    }
}

/// An action that passed validation. Only [`ActionValidator`] creates these,
/// so holding one means the rules were applied against some state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAction {
    original: Action,
    actual: ResolvedAction,
    seat: Seat,
    is_converted: bool,
    reason: Option<String>,
}

impl ValidatedAction {
    pub(crate) fn new(seat: Seat, original: Action, actual: ResolvedAction) -> Self {
        Self {
            original,
            actual,
            seat,
            is_converted: false,
            reason: None,
        }
    }

    pub(crate) fn converted(
        seat: Seat,
        original: Action,
        actual: ResolvedAction,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            original,
            actual,
            seat,
            is_converted: true,
            reason: Some(reason.into()),
        }
    }

    pub fn original(&self) -> Action {
        self.original
    }
    pub fn actual(&self) -> ResolvedAction {
        self.actual
    }
    pub fn seat(&self) -> Seat {
        self.seat
    }
    pub fn is_converted(&self) -> bool {
        self.is_converted
    }
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
    pub fn actual_type(&self) -> ActionType {
        self.actual.action_type()
    }
    pub fn actual_amount(&self) -> Chips {
        self.actual.amount()
    }
}

/// Applies the No-Limit betting rules to a requested action without touching
/// the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionValidator;

impl ActionValidator {
    /// Checks `action` for `seat` against `state`, converting it where the
    /// rules call for it (a call that costs nothing is a check, anything the
    /// stack cannot cover is an all-in).
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidAction`] for wrong phase, wrong turn, a player who
    ///   cannot act, an action the rules forbid, or a raise from a player
    ///   whose action was not reopened
    /// - [`GameError::UnknownSeat`] if nobody sits at `seat`
    /// - [`GameError::InsufficientChips`] for a raise the stack cannot cover
    ///   that is not an all-in either
    ///
    /// # Examples
    ///
    /// ```
    /// use holdem_engine::config::TableConfig;
    /// use holdem_engine::player::Action;
    /// use holdem_engine::rules::{ActionValidator, ResolvedAction};
    /// use holdem_engine::table::Table;
    ///
    /// let mut table = Table::new(TableConfig::default()).unwrap();
    /// for seat in 0..3 {
    ///     table.seat_player(seat).unwrap();
    /// }
    /// table.start_hand().unwrap();
    ///
    /// // Dealer on seat 0, blinds 1/2: seat 0 is first to act and owes 2.
    /// let state = table.state();
    /// let v = ActionValidator::validate(state, 0, Action::Call).unwrap();
    /// assert_eq!(v.actual(), ResolvedAction::Call(2));
    /// assert!(ActionValidator::validate(state, 0, Action::Check).is_err());
    /// ```
    pub fn validate(
        state: &GameState,
        seat: Seat,
        action: Action,
    ) -> Result<ValidatedAction, GameError> {
        let player = Self::acting_player(state, seat)?;
        let chips = player.chips();
        let to_call = player.to_call(state.current_bet());
        let all_in = ResolvedAction::AllIn(chips);

        let validated = match action {
            Action::Fold => ValidatedAction::new(seat, action, ResolvedAction::Fold),
            Action::Check => {
                if to_call > 0 {
                    return Err(ActionError::CheckFacingBet { to_call }.into());
                }
                ValidatedAction::new(seat, action, ResolvedAction::Check)
            }
            Action::Call => {
                if to_call == 0 {
                    ValidatedAction::converted(
                        seat,
                        action,
                        ResolvedAction::Check,
                        "nothing to call",
                    )
                } else if chips < to_call {
                    ValidatedAction::converted(seat, action, all_in, "stack short of the call")
                } else {
                    ValidatedAction::new(seat, action, ResolvedAction::Call(to_call))
                }
            }
            Action::Bet(amount) => {
                Self::ensure_reopened(player)?;
                if state.current_bet() > 0 {
                    return Err(ActionError::BetIntoOpenBet {
                        current_bet: state.current_bet(),
                    }
                    .into());
                }
                let minimum = state.big_blind();
                if amount == chips {
                    ValidatedAction::converted(seat, action, all_in, "bet is the whole stack")
                } else if amount == 0 || amount < minimum {
                    return Err(ActionError::BetBelowMinimum { amount, minimum }.into());
                } else if chips < amount {
                    ValidatedAction::converted(seat, action, all_in, "stack short of the bet")
                } else {
                    ValidatedAction::new(seat, action, ResolvedAction::Bet(amount))
                }
            }
            Action::Raise(to) => {
                Self::ensure_reopened(player)?;
                if state.current_bet() == 0 {
                    return Err(ActionError::RaiseWithoutBet.into());
                }
                let minimum = Self::min_raise_to(state);
                if to == player.commitment() {
                    ValidatedAction::converted(seat, action, all_in, "raise is the whole stack")
                } else if to < minimum {
                    return Err(ActionError::RaiseBelowMinimum { to, minimum }.into());
                } else if to > player.commitment() {
                    if chips >= to_call {
                        ValidatedAction::converted(
                            seat,
                            action,
                            all_in,
                            "stack short of the raise",
                        )
                    } else {
                        return Err(GameError::InsufficientChips {
                            seat,
                            required: to - player.current_bet(),
                            available: chips,
                        });
                    }
                } else {
                    ValidatedAction::new(seat, action, ResolvedAction::Raise(to))
                }
            }
            Action::AllIn => ValidatedAction::new(seat, action, all_in),
        };
        Ok(validated)
    }

    /// A player who already acted this round may only raise again after a full
    /// raise by someone else. A short all-in leaves them call, fold or all-in.
    fn ensure_reopened(player: &Player) -> Result<(), GameError> {
        if player.acted_this_round() {
            return Err(ActionError::ActionNotReopened {
                seat: player.seat_id(),
            }
            .into());
        }
        Ok(())
    }

    /// Smallest total a raise may bring the round's bet to.
    pub fn min_raise_to(state: &GameState) -> Chips {
        state
            .current_bet()
            .saturating_add(state.last_raise_increment())
    }

    /// Action types `seat` could submit right now without being rejected.
    pub fn legal_actions(state: &GameState, seat: Seat) -> Vec<ActionType> {
        let Ok(player) = Self::acting_player(state, seat) else {
            return Vec::new();
        };
        let to_call = player.to_call(state.current_bet());
        let mut legal = vec![ActionType::Fold];
        if to_call == 0 {
            legal.push(ActionType::Check);
        } else {
            legal.push(ActionType::Call);
        }
        // Back on a short all-in: the action is not reopened for them.
        let reopened = !player.acted_this_round();
        if reopened && state.current_bet() == 0 {
            if player.chips() >= state.big_blind() {
                legal.push(ActionType::Bet);
            }
        } else if reopened && player.commitment() >= Self::min_raise_to(state) {
            legal.push(ActionType::Raise);
        }
        legal.push(ActionType::AllIn);
        legal
    }

    fn acting_player(state: &GameState, seat: Seat) -> Result<&Player, GameError> {
        let phase = state.phase();
        if !phase.is_betting() {
            return Err(ActionError::NotBettingPhase(phase).into());
        }
        let player = state.player(seat).ok_or(GameError::UnknownSeat(seat))?;
        if !player.can_act() {
            return Err(ActionError::CannotAct {
                seat,
                status: player.status(),
            }
            .into());
        }
        if state.is_betting_round_complete() {
            return Err(ActionError::RoundComplete.into());
        }
        if state.active_player() != Some(seat) {
            return Err(ActionError::NotPlayersTurn {
                expected: state.active_player(),
                actual: seat,
            }
            .into());
        }
        Ok(player)
    }
}
