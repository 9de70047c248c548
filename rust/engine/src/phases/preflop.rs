use super::betting::{apply_action, close_round};
use super::{PhaseContext, PhaseHandler};
use crate::errors::GameError;
use crate::events::GameEvent;
use crate::game::{GamePhase, GameState};
use crate::hand::HandEvaluator;
use crate::player::{Player, Seat, SeatStatus};
use crate::rules::ValidatedAction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreFlop;

impl PhaseHandler for PreFlop {
    fn phase(&self) -> GamePhase {
        GamePhase::PreFlop
    }

    /// Deals two hole cards to every seat with chips, one at a time starting
    /// left of the dealer, then posts the blinds. The first decision belongs
    /// to the seat after the big blind (the dealer when heads-up).
    fn enter<E: HandEvaluator>(
        &self,
        state: &mut GameState,
        ctx: &mut PhaseContext<'_, E>,
    ) -> Result<(), GameError> {
        let order: Vec<Seat> = state
            .seats_from_dealer()
            .into_iter()
            .filter(|&seat| {
                state
                    .player(seat)
                    .is_some_and(|p| p.status() != SeatStatus::Out)
            })
            .collect();
        for _ in 0..2 {
            for &seat in &order {
                let card = ctx.deck.deal_card()?;
                state.player_mut(seat)?.give_card(card)?;
            }
        }
        for &seat in &order {
            let cards = state.player_mut(seat)?.hole_cards().to_vec();
            state.push_event(GameEvent::HoleCardsDealt { seat, cards });
        }

        state.start_betting_round();
        state.set_blinds()?;
        let big_blind = state.big_blind_seat().unwrap_or(state.dealer_position);
        state.active_player = state.next_seat_after(big_blind, Player::can_act);
        tracing::debug!(
            hand = state.hand_number,
            dealer = state.dealer_position,
            small_blind = ?state.small_blind_seat(),
            big_blind,
            first_to_act = ?state.active_player,
            "hole cards dealt and blinds posted"
        );
        Ok(())
    }

    fn execute(&self, state: &mut GameState, action: &ValidatedAction) -> Result<bool, GameError> {
        apply_action(state, action)
    }

    fn exit(&self, state: &mut GameState) -> Result<Option<GamePhase>, GameError> {
        Ok(close_round(state))
    }
}
