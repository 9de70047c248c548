use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::GamePhase;
use crate::phases::showdown::PotAward;
use crate::player::{ActionType, Chips, Seat};

/// Which forced bet a [`GameEvent::BlindPosted`] records.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum BlindKind {
    /// Posted left of the dealer, or by the dealer heads-up
    Small,
    /// Posted left of the small blind
    Big,
}

/// A single applied action together with the money it moved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Street the action was taken on
    pub phase: GamePhase,
    /// Position of the action within its street, starting at 1
    pub sequence: u32,
    /// Who acted
    pub seat: Seat,
    /// The action as applied, after any conversion
    pub action: ActionType,
    /// Chips moved by the action (raise-to total for raises)
    pub amount: Chips,
    /// Pot including live bets, before the action
    pub pot_before: Chips,
    /// Pot including live bets, after the action
    pub pot_after: Chips,
    /// Actor's stack before the action
    pub chips_before: Chips,
    /// Actor's stack after the action
    pub chips_after: Chips,
    /// RFC3339 timestamp
    pub ts: String,
}

/// Everything that happens to a table, in order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new hand began; always the first event of a hand's log
    HandStarted {
        /// Counts from 1 per table
        hand_number: u64,
        /// Button seat for this hand
        dealer: Seat,
        /// Seats dealt in, clockwise by seat number
        seats: Vec<Seat>,
        /// RFC3339 timestamp
        ts: String,
    },
    /// A blind went in; `amount` is short of the blind for a short stack
    BlindPosted {
        seat: Seat,
        kind: BlindKind,
        amount: Chips,
    },
    /// Both hole cards for one seat
    HoleCardsDealt { seat: Seat, cards: Vec<Card> },
    /// Board cards added on entering `phase` (burns are not recorded)
    StreetDealt { phase: GamePhase, cards: Vec<Card> },
    /// A validated action was applied
    Action(ActionRecord),
    /// Live bets were swept into the pot at the end of a street
    BetsCollected {
        phase: GamePhase,
        /// Pot after the sweep
        pot_total: Chips,
    },
    /// The hand moved from one phase to the next
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// The uncalled top of a bet went back to its owner
    UncalledReturned { seat: Seat, amount: Chips },
    /// One pot tier was paid out
    PotAwarded(PotAward),
    /// The hand is over and every chip is back in the stacks
    HandFinished {
        hand_number: u64,
        /// RFC3339 timestamp
        ts: String,
    },
}

impl GameEvent {
    /// The seat an event is about, if it concerns a single seat.
    pub fn seat(&self) -> Option<Seat> {
        match self {
            GameEvent::BlindPosted { seat, .. }
            | GameEvent::HoleCardsDealt { seat, .. }
            | GameEvent::UncalledReturned { seat, .. } => Some(*seat),
            GameEvent::Action(record) => Some(record.seat),
            _ => None,
        }
    }
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Append-only history of a table. Rolled back together with the rest of the
/// state when a transition fails.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionRecord> {
        self.events.iter().filter_map(|e| match e {
            GameEvent::Action(record) => Some(record),
            _ => None,
        })
    }

    pub fn actions_by_seat(&self, seat: Seat) -> Vec<&ActionRecord> {
        self.actions().filter(|r| r.seat == seat).collect()
    }

    pub fn actions_in_phase(&self, phase: GamePhase) -> Vec<&ActionRecord> {
        self.actions().filter(|r| r.phase == phase).collect()
    }

    pub fn actions_of_type(&self, action: ActionType) -> Vec<&ActionRecord> {
        self.actions().filter(|r| r.action == action).collect()
    }

    pub fn events_for_seat(&self, seat: Seat) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.seat() == Some(seat)).collect()
    }

    /// The last `n` events, oldest first.
    pub fn recent(&self, n: usize) -> &[GameEvent] {
        &self.events[self.events.len().saturating_sub(n)..]
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    /// One JSON object per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn write_jsonl<W: Write>(&self, mut w: W) -> io::Result<()> {
        for event in &self.events {
            let line = serde_json::to_string(event).map_err(io::Error::other)?;
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()
    }
}
