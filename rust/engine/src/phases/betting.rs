use crate::errors::{ActionError, GameError};
use crate::events::{timestamp, ActionRecord, GameEvent};
use crate::game::{GamePhase, GameState};
use crate::player::{Player, Seat};
use crate::rules::{ResolvedAction, ValidatedAction};

/// Moves the chips for a validated action and passes the turn on.
///
/// Bets, raises and all-ins that raise by at least the last increment reopen
/// the action for everyone else. A shorter all-in only lifts the bet to call.
pub(super) fn apply_action(
    state: &mut GameState,
    action: &ValidatedAction,
) -> Result<bool, GameError> {
    let seat = action.seat();
    if state.active_player != Some(seat) {
        return Err(ActionError::NotPlayersTurn {
            expected: state.active_player,
            actual: seat,
        }
        .into());
    }

    let prev_bet = state.current_bet;
    let pot_before = state.pot_total();
    let (chips_before, bet_after) = {
        let player = state.player_mut(seat)?;
        let chips_before = player.chips();
        match action.actual() {
            ResolvedAction::Fold => player.fold()?,
            ResolvedAction::Check => {}
            ResolvedAction::Call(amount)
            | ResolvedAction::Bet(amount)
            | ResolvedAction::AllIn(amount) => {
                player.bet(amount)?;
            }
            ResolvedAction::Raise(to) => {
                let add = to.saturating_sub(player.current_bet());
                player.bet(add)?;
            }
        }
        player.record_action(action.actual_type());
        (chips_before, player.current_bet())
    };

    let reopens = match action.actual() {
        ResolvedAction::Bet(_) | ResolvedAction::Raise(_) => true,
        ResolvedAction::AllIn(_) => {
            bet_after > prev_bet && bet_after - prev_bet >= state.last_raise_increment
        }
        _ => false,
    };
    if bet_after > prev_bet {
        state.current_bet = bet_after;
    }
    if reopens {
        state.last_raise_increment = bet_after - prev_bet;
        state.last_raiser = Some(seat);
        for p in state.players.iter_mut().filter(|p| p.seat_id() != seat) {
            p.reopen_action();
        }
    }

    state.street_action_count += 1;
    let chips_after = state.player(seat).map_or(0, Player::chips);
    let record = ActionRecord {
        phase: state.phase,
        sequence: state.street_action_count,
        seat,
        action: action.actual_type(),
        amount: action.actual_amount(),
        pot_before,
        pot_after: state.pot_total(),
        chips_before,
        chips_after,
        ts: timestamp(),
    };
    tracing::debug!(
        hand = state.hand_number,
        phase = ?record.phase,
        seat,
        action = ?record.action,
        amount = record.amount,
        converted = action.is_converted(),
        pot = record.pot_after,
        "action applied"
    );
    state.push_event(GameEvent::Action(record));

    state.active_player = state.next_seat_after(seat, Player::can_act);
    Ok(!state.is_betting_round_complete())
}

/// Resets the round and hands the first decision to the first seat that can
/// act clockwise of `after`.
pub(super) fn open_round(state: &mut GameState, after: Seat) {
    state.start_betting_round();
    state.active_player = state.next_seat_after(after, Player::can_act);
}

/// Collects the street's bets and picks the next phase. Once at most one
/// player is left the hand skips straight to the showdown.
pub(super) fn close_round(state: &mut GameState) -> Option<GamePhase> {
    state.collect_bets();
    if state.players_in_hand().count() <= 1 {
        Some(GamePhase::Showdown)
    } else {
        state.phase.next_street()
    }
}
