//! Post-condition checks over an immutable snapshot of the table.
//!
//! Checks run at phase boundaries. Each checker reports [`Violation`]s; what
//! happens to them is decided by the [`CheckMode`] of the
//! [`InvariantChecker`].

mod betting;
mod chips;
mod phase;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::game::{GamePhase, GameState};
use crate::player::{Chips, Player, Seat};
use crate::pot::Pot;

pub use betting::BettingRules;
pub use chips::ChipConservation;
pub use phase::PhaseConsistency;

/// Which checker reported a violation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum InvariantKind {
    /// Chips neither created nor lost
    ChipConservation,
    /// Bets, blinds and raise sizes
    BettingRules,
    /// Board size, card uniqueness and whose turn it is
    PhaseConsistency,
}

/// How bad a violation is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Noted only
    Info,
    /// Suspicious but playable
    Warning,
    /// The state is wrong; fails the transition in [`CheckMode::Enforce`]
    Critical,
}

/// One broken rule, with the values that broke it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: InvariantKind,
    pub severity: Severity,
    /// Human readable summary
    pub description: String,
    /// The figures involved, as a JSON object
    pub context: serde_json::Value,
}

impl Violation {
    pub fn critical(
        kind: InvariantKind,
        description: impl Into<String>,
        context: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            severity: Severity::Critical,
            description: description.into(),
            context,
        }
    }

    pub fn warning(
        kind: InvariantKind,
        description: impl Into<String>,
        context: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            description: description.into(),
            context,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// What the checker does with what it finds.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Critical violations fail the transition
    #[default]
    Enforce,
    /// Violations are only logged
    Log,
    /// Nothing is checked
    Off,
}

/// Frozen copy of everything the checks look at.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub phase: GamePhase,
    /// Sorted by seat
    pub players: Vec<Player>,
    pub community_cards: Vec<Card>,
    pub pot: Pot,
    /// Collected pot plus live bets
    pub pot_total: Chips,
    pub current_bet: Chips,
    /// Size of the last full bet or raise this round
    pub last_raise_increment: Chips,
    /// Actions taken on the current street; 0 right after a street starts
    pub street_action_count: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub dealer_position: Seat,
    pub active_player: Option<Seat>,
}

impl TableSnapshot {
    pub fn of(state: &GameState) -> Self {
        Self {
            phase: state.phase(),
            players: state.players().to_vec(),
            community_cards: state.community_cards().to_vec(),
            pot: state.pot().clone(),
            pot_total: state.pot_total(),
            current_bet: state.current_bet(),
            last_raise_increment: state.last_raise_increment(),
            street_action_count: state.street_action_count(),
            small_blind: state.small_blind(),
            big_blind: state.big_blind(),
            dealer_position: state.dealer_position(),
            active_player: state.active_player(),
        }
    }

    pub(crate) fn players_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }
}

impl GameState {
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot::of(self)
    }
}

pub trait InvariantCheck {
    fn kind(&self) -> InvariantKind;

    fn check(&self, snapshot: &TableSnapshot) -> Vec<Violation>;
}

/// Violations found by one pass of the checker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvariantReport {
    pub violations: Vec<Violation>,
}

impl InvariantReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_critical(&self) -> bool {
        self.violations.iter().any(Violation::is_critical)
    }

    pub fn critical(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_critical())
    }

    pub fn of_kind(&self, kind: InvariantKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }
}

/// Runs chip conservation, betting rule and phase consistency checks.
#[derive(Debug, Clone)]
pub struct InvariantChecker {
    mode: CheckMode,
    chips: ChipConservation,
    betting: BettingRules,
    phase: PhaseConsistency,
}

impl InvariantChecker {
    /// `initial_total_chips` is every chip at the table when the hand began.
    pub fn new(initial_total_chips: u64, mode: CheckMode) -> Self {
        Self {
            mode,
            chips: ChipConservation::new(initial_total_chips),
            betting: BettingRules,
            phase: PhaseConsistency,
        }
    }

    pub fn mode(&self) -> CheckMode {
        self.mode
    }

    pub fn initial_total(&self) -> u64 {
        self.chips.initial_total()
    }

    /// Runs every check regardless of mode.
    pub fn check(&self, snapshot: &TableSnapshot) -> InvariantReport {
        let checks: [&dyn InvariantCheck; 3] = [&self.chips, &self.betting, &self.phase];
        InvariantReport {
            violations: checks.iter().flat_map(|c| c.check(snapshot)).collect(),
        }
    }

    /// Checks `state` according to the mode, logging whatever is found.
    ///
    /// # Errors
    ///
    /// [`GameError::InvariantViolation`] in [`CheckMode::Enforce`] when any
    /// violation is critical.
    pub fn enforce(&self, state: &GameState) -> Result<InvariantReport, GameError> {
        if self.mode == CheckMode::Off {
            return Ok(InvariantReport::default());
        }
        let report = self.check(&state.snapshot());
        for v in &report.violations {
            match v.severity {
                Severity::Critical => {
                    tracing::error!(kind = ?v.kind, phase = ?state.phase(), context = %v.context, "{}", v.description)
                }
                Severity::Warning => {
                    tracing::warn!(kind = ?v.kind, phase = ?state.phase(), context = %v.context, "{}", v.description)
                }
                Severity::Info => {
                    tracing::info!(kind = ?v.kind, phase = ?state.phase(), "{}", v.description)
                }
            }
        }
        if self.mode == CheckMode::Enforce && report.has_critical() {
            return Err(GameError::InvariantViolation {
                violations: report.violations,
            });
        }
        Ok(report)
    }
}
