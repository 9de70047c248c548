use serde_json::json;

use super::{InvariantCheck, InvariantKind, TableSnapshot, Violation};
use crate::game::GamePhase;
use crate::player::{Chips, SeatStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct BettingRules;

impl InvariantCheck for BettingRules {
    fn kind(&self) -> InvariantKind {
        InvariantKind::BettingRules
    }

    fn check(&self, s: &TableSnapshot) -> Vec<Violation> {
        let mut found = Vec::new();
        let kind = self.kind();

        let max_bet = s.players.iter().map(|p| p.current_bet()).max().unwrap_or(0);
        if s.current_bet != max_bet {
            found.push(Violation::critical(
                kind,
                format!(
                    "current bet is {} but the highest player bet is {}",
                    s.current_bet, max_bet
                ),
                json!({
                    "current_bet": s.current_bet,
                    "max_player_bet": max_bet,
                    "bets": s.players.iter().map(|p| (p.seat_id(), p.current_bet())).collect::<Vec<_>>(),
                }),
            ));
        }

        if s.big_blind <= s.small_blind {
            found.push(Violation::critical(
                kind,
                format!(
                    "big blind {} must exceed small blind {}",
                    s.big_blind, s.small_blind
                ),
                json!({ "small_blind": s.small_blind, "big_blind": s.big_blind }),
            ));
        }

        found.extend(blind_positions(s));

        for p in &s.players {
            let idle = matches!(p.status(), SeatStatus::Folded | SeatStatus::Out);
            // A fold mid-street leaves the bet out until the street is collected.
            let collected = s.street_action_count == 0 || p.status() == SeatStatus::Out;
            if idle && collected && p.current_bet() > 0 {
                found.push(Violation::critical(
                    kind,
                    format!(
                        "seat {} is {:?} but holds a bet of {}",
                        p.seat_id(),
                        p.status(),
                        p.current_bet()
                    ),
                    json!({ "seat": p.seat_id(), "status": p.status(), "current_bet": p.current_bet() }),
                ));
            }
            if p.current_bet() > p.total_bet_this_hand() {
                found.push(Violation::critical(
                    kind,
                    format!(
                        "seat {} bet {} this round but only {} this hand",
                        p.seat_id(),
                        p.current_bet(),
                        p.total_bet_this_hand()
                    ),
                    json!({
                        "seat": p.seat_id(),
                        "current_bet": p.current_bet(),
                        "total_bet_this_hand": p.total_bet_this_hand(),
                    }),
                ));
            }
            if s.phase.is_betting() && p.status() == SeatStatus::AllIn && p.chips() > 0 {
                found.push(Violation::warning(
                    kind,
                    format!("seat {} is all-in with {} chips left", p.seat_id(), p.chips()),
                    json!({ "seat": p.seat_id(), "chips": p.chips() }),
                ));
            }
        }

        found.extend(minimum_raise(s));
        found
    }
}

fn blind_positions(s: &TableSnapshot) -> Vec<Violation> {
    let kind = InvariantKind::BettingRules;
    let dealt_in = s
        .players
        .iter()
        .filter(|p| p.status() != SeatStatus::Out)
        .count();
    if s.phase == GamePhase::Init || dealt_in <= 2 {
        return Vec::new();
    }
    let sb = s.players.iter().find(|p| p.is_small_blind()).map(|p| p.seat_id());
    let bb = s.players.iter().find(|p| p.is_big_blind()).map(|p| p.seat_id());
    let mut found = Vec::new();
    if sb.is_some() && sb == bb {
        found.push(Violation::critical(
            kind,
            format!("small and big blind share seat {:?} with {} players", sb, dealt_in),
            json!({ "small_blind_seat": sb, "big_blind_seat": bb, "players": dealt_in }),
        ));
    }
    if bb == Some(s.dealer_position) {
        found.push(Violation::critical(
            kind,
            format!("dealer seat {} is also the big blind", s.dealer_position),
            json!({ "dealer": s.dealer_position, "big_blind_seat": bb }),
        ));
    }
    found
}

/// The top bet must clear the next one by at least the round's last raise
/// increment. Exempt: ties, an all-in raiser, and pre-flop bets no higher than
/// the big blind (the blinds themselves, including a short one).
///
/// During play the table runs this at phase boundaries; mid-street it only
/// runs through [`crate::table::Table::check_invariants`].
fn minimum_raise(s: &TableSnapshot) -> Option<Violation> {
    let mut bets: Vec<Chips> = s
        .players
        .iter()
        .filter(|p| p.in_hand())
        .map(|p| p.current_bet())
        .collect();
    if bets.len() < 2 {
        return None;
    }
    bets.sort_unstable_by(|a, b| b.cmp(a));
    let (highest, second) = (bets[0], bets[1]);
    let raise = highest - second;
    let minimum = s.last_raise_increment.max(s.big_blind);
    if raise == 0 || raise >= minimum {
        return None;
    }
    if s.phase == GamePhase::PreFlop && highest <= s.big_blind {
        return None;
    }
    let raiser = s
        .players
        .iter()
        .find(|p| p.in_hand() && p.current_bet() == highest)?;
    if raiser.status() == SeatStatus::AllIn {
        return None;
    }
    Some(Violation::warning(
        InvariantKind::BettingRules,
        format!(
            "seat {} raised by {}, below the minimum of {}",
            raiser.seat_id(),
            raise,
            minimum
        ),
        json!({
            "seat": raiser.seat_id(),
            "raise": raise,
            "minimum": minimum,
            "current_bet": highest,
            "previous_bet": second,
        }),
    ))
}
