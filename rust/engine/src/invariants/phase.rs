use std::collections::HashSet;

use serde_json::json;

use super::{InvariantCheck, InvariantKind, TableSnapshot, Violation};
use crate::game::GamePhase;

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseConsistency;

impl InvariantCheck for PhaseConsistency {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PhaseConsistency
    }

    fn check(&self, s: &TableSnapshot) -> Vec<Violation> {
        let mut found = Vec::new();
        let kind = self.kind();

        let board = s.community_cards.len();
        let expected = s.phase.community_cards();
        // A hand won without a contest stops dealing at the street where it
        // ended. Once finished, seating changes make the count meaningless.
        let uncontested = match s.phase {
            GamePhase::Showdown => s.players_in_hand() <= 1,
            GamePhase::Finished => true,
            _ => false,
        };
        let board_ok = if uncontested {
            matches!(board, 0 | 3 | 4 | 5)
        } else {
            board == expected
        };
        if !board_ok {
            found.push(Violation::critical(
                kind,
                format!(
                    "{:?} expects {} community cards, found {}",
                    s.phase, expected, board
                ),
                json!({ "phase": s.phase, "expected": expected, "found": board }),
            ));
        }

        let mut seen = HashSet::new();
        let all_cards = s
            .community_cards
            .iter()
            .chain(s.players.iter().flat_map(|p| p.hole_cards()));
        for card in all_cards {
            if !seen.insert(*card) {
                found.push(Violation::critical(
                    kind,
                    format!("card {} appears more than once", card),
                    json!({ "card": card.to_string() }),
                ));
            }
        }

        // Players seated between hands hold no cards yet.
        if !matches!(s.phase, GamePhase::Init | GamePhase::Finished) {
            for p in s.players.iter().filter(|p| p.in_hand()) {
                if p.hole_cards().len() != 2 {
                    found.push(Violation::critical(
                        kind,
                        format!(
                            "seat {} is in the hand with {} hole cards",
                            p.seat_id(),
                            p.hole_cards().len()
                        ),
                        json!({ "seat": p.seat_id(), "hole_cards": p.hole_cards().len() }),
                    ));
                }
            }
        }

        if s.phase.is_betting() {
            let anyone_can_act = s.players.iter().any(|p| p.can_act());
            let active_ok = match s.active_player {
                Some(seat) => s
                    .players
                    .iter()
                    .any(|p| p.seat_id() == seat && p.can_act()),
                None => !anyone_can_act,
            };
            if !active_ok {
                found.push(Violation::critical(
                    kind,
                    format!("active player {:?} cannot act", s.active_player),
                    json!({ "active_player": s.active_player, "anyone_can_act": anyone_can_act }),
                ));
            }
        }
        found
    }
}
