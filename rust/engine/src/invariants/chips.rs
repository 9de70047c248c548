use serde_json::json;

use super::{InvariantCheck, InvariantKind, TableSnapshot, Violation};
use crate::game::GamePhase;

/// No chip is created or destroyed: stacks plus pot always add up to what the
/// table started the hand with, and the pot holds exactly what was bet.
#[derive(Debug, Clone, Copy)]
pub struct ChipConservation {
    initial_total: u64,
}

impl ChipConservation {
    pub fn new(initial_total: u64) -> Self {
        Self { initial_total }
    }

    pub fn initial_total(&self) -> u64 {
        self.initial_total
    }
}

impl InvariantCheck for ChipConservation {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ChipConservation
    }

    fn check(&self, s: &TableSnapshot) -> Vec<Violation> {
        let mut found = Vec::new();
        let stacks: u64 = s.players.iter().map(|p| u64::from(p.chips())).sum();
        let total = stacks + u64::from(s.pot_total);
        if total != self.initial_total {
            found.push(Violation::critical(
                self.kind(),
                format!(
                    "chips not conserved: {} at the table, expected {}",
                    total, self.initial_total
                ),
                json!({
                    "stacks": stacks,
                    "pot_total": s.pot_total,
                    "expected": self.initial_total,
                    "difference": total as i64 - self.initial_total as i64,
                }),
            ));
        }

        // Payout leaves contributions in place while the pot empties.
        if !matches!(
            s.phase,
            GamePhase::Init | GamePhase::Showdown | GamePhase::Finished
        ) {
            let contributed: u64 = s
                .players
                .iter()
                .map(|p| u64::from(p.total_bet_this_hand()))
                .sum();
            if contributed != u64::from(s.pot_total) {
                found.push(Violation::critical(
                    self.kind(),
                    format!(
                        "pot holds {} but players contributed {}",
                        s.pot_total, contributed
                    ),
                    json!({
                        "pot_total": s.pot_total,
                        "contributed": contributed,
                        "phase": s.phase,
                    }),
                ));
            }
        }
        found
    }
}
