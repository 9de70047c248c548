use serde::{Deserialize, Serialize};

use super::{PhaseContext, PhaseHandler};
use crate::cards::Card;
use crate::errors::{ActionError, GameError};
use crate::events::GameEvent;
use crate::game::{GamePhase, GameState};
use crate::hand::HandEvaluator;
use crate::player::{Chips, Seat};
use crate::pot::{split_amount, PotTier, Refund};
use crate::rules::ValidatedAction;

/// How one pot tier was paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    /// 0 for the main pot, then side pots in order
    pub pot_index: usize,
    pub amount: Chips,
    /// Winners clockwise from the dealer
    pub winners: Vec<Seat>,
    /// Chips each winner received, odd chips included
    pub shares: Vec<(Seat, Chips)>,
    /// Whether hands had to be compared
    pub contested: bool,
}

/// Result of the last finished hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownSummary {
    pub hand_number: u64,
    /// Empty when everyone else folded before the flop
    pub board: Vec<Card>,
    /// Uncalled chips returned before any pot was paid
    pub refund: Option<Refund>,
    /// One entry per pot tier, main pot first
    pub awards: Vec<PotAward>,
}

impl ShowdownSummary {
    /// Chips won by `seat` across all pots, refund excluded.
    pub fn won_by(&self, seat: Seat) -> Chips {
        self.awards
            .iter()
            .flat_map(|a| a.shares.iter())
            .filter(|(s, _)| *s == seat)
            .map(|(_, amount)| amount)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Showdown;

impl PhaseHandler for Showdown {
    fn phase(&self) -> GamePhase {
        GamePhase::Showdown
    }

    /// Returns the uncalled surplus, then pays every tier to the best hands
    /// among its eligible seats. Ties split evenly, odd chips going one at a
    /// time to winners clockwise from the dealer.
    fn enter<E: HandEvaluator>(
        &self,
        state: &mut GameState,
        ctx: &mut PhaseContext<'_, E>,
    ) -> Result<(), GameError> {
        state.active_player = None;
        let breakdown = state.pot.drain();

        if let Some(refund) = breakdown.refund {
            state.player_mut(refund.seat)?.add_chips(refund.amount);
            tracing::debug!(seat = refund.seat, amount = refund.amount, "uncalled bet returned");
            state.push_event(GameEvent::UncalledReturned {
                seat: refund.seat,
                amount: refund.amount,
            });
        }

        let clockwise = state.seats_from_dealer();
        let mut awards = Vec::new();
        for (pot_index, tier) in breakdown.tiers().enumerate() {
            let contenders = contenders(state, tier);
            let contested = contenders.len() > 1;
            let best = if contested {
                best_hands(state, &contenders, ctx.evaluator)
            } else {
                contenders
            };
            let winners: Vec<Seat> = clockwise
                .iter()
                .copied()
                .filter(|seat| best.contains(seat))
                .collect();
            let shares = split_amount(tier.amount, &winners);
            for &(seat, amount) in &shares {
                state.player_mut(seat)?.add_chips(amount);
            }
            tracing::info!(
                hand = state.hand_number,
                pot_index,
                amount = tier.amount,
                ?winners,
                contested,
                "pot awarded"
            );
            let award = PotAward {
                pot_index,
                amount: tier.amount,
                winners,
                shares,
                contested,
            };
            state.push_event(GameEvent::PotAwarded(award.clone()));
            awards.push(award);
        }

        state.last_showdown = Some(ShowdownSummary {
            hand_number: state.hand_number,
            board: state.community_cards.clone(),
            refund: breakdown.refund,
            awards,
        });
        Ok(())
    }

    fn execute(&self, _state: &mut GameState, _action: &ValidatedAction) -> Result<bool, GameError> {
        Err(ActionError::NotBettingPhase(GamePhase::Showdown).into())
    }

    fn exit(&self, _state: &mut GameState) -> Result<Option<GamePhase>, GameError> {
        Ok(None)
    }
}

/// Eligible seats of a tier, or everyone still in the hand if all of its
/// contributors folded.
fn contenders(state: &GameState, tier: &PotTier) -> Vec<Seat> {
    if tier.eligible.is_empty() {
        state.players_in_hand().map(|p| p.seat_id()).collect()
    } else {
        tier.eligible.clone()
    }
}

fn best_hands<E: HandEvaluator>(state: &GameState, seats: &[Seat], evaluator: &E) -> Vec<Seat> {
    let ranked: Vec<(Seat, E::Rank)> = seats
        .iter()
        .filter_map(|&seat| state.player(seat))
        .map(|p| {
            (
                p.seat_id(),
                evaluator.evaluate(p.hole_cards(), &state.community_cards),
            )
        })
        .collect();
    let Some(top) = ranked.iter().map(|(_, rank)| rank).max() else {
        return Vec::new();
    };
    ranked
        .iter()
        .filter(|(_, rank)| rank == top)
        .map(|(seat, _)| *seat)
        .collect()
}
