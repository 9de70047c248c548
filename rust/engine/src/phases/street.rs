use super::betting::{apply_action, close_round, open_round};
use super::{PhaseContext, PhaseHandler};
use crate::errors::GameError;
use crate::events::GameEvent;
use crate::game::{GamePhase, GameState};
use crate::hand::HandEvaluator;
use crate::rules::ValidatedAction;

/// Flop, turn or river: one burn, then the street's community cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Street {
    phase: GamePhase,
}

impl Street {
    pub(crate) fn new(phase: GamePhase) -> Self {
        Self { phase }
    }

    fn cards_to_deal(self) -> usize {
        if self.phase == GamePhase::Flop {
            3
        } else {
            1
        }
    }
}

impl PhaseHandler for Street {
    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn enter<E: HandEvaluator>(
        &self,
        state: &mut GameState,
        ctx: &mut PhaseContext<'_, E>,
    ) -> Result<(), GameError> {
        ctx.deck.burn_card()?;
        let mut dealt = Vec::with_capacity(3);
        for _ in 0..self.cards_to_deal() {
            dealt.push(ctx.deck.deal_card()?);
        }
        state.community_cards.extend_from_slice(&dealt);
        let dealer = state.dealer_position;
        open_round(state, dealer);
        tracing::debug!(
            hand = state.hand_number,
            phase = ?self.phase,
            board = %state
                .community_cards
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            first_to_act = ?state.active_player,
            "street dealt"
        );
        state.push_event(GameEvent::StreetDealt {
            phase: self.phase,
            cards: dealt,
        });
        Ok(())
    }

    fn execute(&self, state: &mut GameState, action: &ValidatedAction) -> Result<bool, GameError> {
        apply_action(state, action)
    }

    fn exit(&self, state: &mut GameState) -> Result<Option<GamePhase>, GameError> {
        Ok(close_round(state))
    }
}
