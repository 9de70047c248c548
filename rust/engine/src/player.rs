use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::{ActionError, GameError};

/// Chip amounts. A table refuses seats and rebuys that would put more than
/// `Chips::MAX` chips in play, so every sum over one table fits.
pub type Chips = u32;
/// Seat number at the table; clockwise is ascending, wrapping around.
pub type Seat = usize;

/// Seat status within the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SeatStatus {
    /// Still in the hand and able to act while holding chips
    Active,
    /// Gave up the hand
    Folded,
    /// Committed every chip; stays eligible up to the amount contributed
    AllIn,
    /// Busted: no chips and no cards
    Out,
}

/// Kinds of player actions, shared by requests, validated results and logs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Gave up the hand
    Fold,
    /// Passed with nothing owed
    Check,
    /// Matched the bet to call
    Call,
    /// Opened a round that had no bet
    Bet,
    /// Increased an open bet
    Raise,
    /// Put the whole stack in
    AllIn,
}

/// An action requested by a player (or by whatever drives the seat).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid if nothing is owed)
    Check,
    /// Match the current bet
    Call,
    /// Open the betting round with the given amount
    Bet(Chips),
    /// Raise so this round's total bet becomes the given amount
    Raise(Chips),
    /// Commit all remaining chips
    AllIn,
}

impl Action {
    pub fn action_type(self) -> ActionType {
        match self {
            Action::Fold => ActionType::Fold,
            Action::Check => ActionType::Check,
            Action::Call => ActionType::Call,
            Action::Bet(_) => ActionType::Bet,
            Action::Raise(_) => ActionType::Raise,
            Action::AllIn => ActionType::AllIn,
        }
    }
}

/// One seat at the table. Chips are owned here exclusively; the pot only ever
/// receives them through [`Player::bet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat the player occupies; unique at the table
    seat_id: Seat,
    /// Stack behind, not counting anything bet
    chips: Chips,
    /// Bet in the current betting round, not yet swept into the pot
    current_bet: Chips,
    /// Everything put in this hand, blinds included
    total_bet_this_hand: Chips,
    /// Zero to two cards
    hole_cards: Vec<Card>,
    status: SeatStatus,
    pub(crate) is_dealer: bool,
    pub(crate) is_small_blind: bool,
    pub(crate) is_big_blind: bool,
    /// Most recent action this hand
    last_action: Option<ActionType>,
    /// Cleared whenever a full bet or raise reopens the action
    acted_this_round: bool,
}

impl Player {
    pub fn new(seat_id: Seat, chips: Chips) -> Self {
        Self {
            seat_id,
            chips,
            current_bet: 0,
            total_bet_this_hand: 0,
            hole_cards: Vec::with_capacity(2),
            status: if chips > 0 {
                SeatStatus::Active
            } else {
                SeatStatus::Out
            },
            is_dealer: false,
            is_small_blind: false,
            is_big_blind: false,
            last_action: None,
            acted_this_round: false,
        }
    }

    pub fn seat_id(&self) -> Seat {
        self.seat_id
    }
    /// Stack behind.
    pub fn chips(&self) -> Chips {
        self.chips
    }
    /// Bet in the current round.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    /// Contribution to the pot this hand.
    pub fn total_bet_this_hand(&self) -> Chips {
        self.total_bet_this_hand
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hole_cards
    }
    pub fn status(&self) -> SeatStatus {
        self.status
    }
    /// Holds the button this hand.
    pub fn is_dealer(&self) -> bool {
        self.is_dealer
    }
    /// Posted the small blind this hand.
    pub fn is_small_blind(&self) -> bool {
        self.is_small_blind
    }
    /// Posted the big blind this hand.
    pub fn is_big_blind(&self) -> bool {
        self.is_big_blind
    }
    /// `None` until the player acts in the hand. Blinds do not count.
    pub fn last_action(&self) -> Option<ActionType> {
        self.last_action
    }

    /// Whether the player has acted since the last bet or raise that reopened
    /// the action.
    pub fn acted_this_round(&self) -> bool {
        self.acted_this_round
    }

    /// Active with chips behind.
    pub fn can_act(&self) -> bool {
        self.status == SeatStatus::Active && self.chips > 0
    }

    /// Still contesting the pot: active or all-in.
    pub fn in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }

    /// Chips behind plus chips already committed this round.
    pub fn commitment(&self) -> Chips {
        self.chips + self.current_bet
    }

    /// What it costs to match `current_bet`.
    pub fn to_call(&self, current_bet: Chips) -> Chips {
        current_bet.saturating_sub(self.current_bet)
    }

    /// Moves `amount` chips from the stack into this round's bet.
    pub fn bet(&mut self, amount: Chips) -> Result<Chips, GameError> {
        if amount == 0 {
            return Ok(0);
        }
        if amount > self.chips {
            return Err(GameError::InsufficientChips {
                seat: self.seat_id,
                required: amount,
                available: self.chips,
            });
        }
        self.chips -= amount;
        self.current_bet += amount;
        self.total_bet_this_hand += amount;
        if self.chips == 0 {
            self.status = SeatStatus::AllIn;
        }
        Ok(amount)
    }

    /// Only a player who can act may fold.
    pub fn fold(&mut self) -> Result<(), GameError> {
        if !self.can_act() {
            return Err(ActionError::CannotAct {
                seat: self.seat_id,
                status: self.status,
            }
            .into());
        }
        self.status = SeatStatus::Folded;
        Ok(())
    }

    /// Adds to the stack, bringing a busted player back in.
    pub fn add_chips(&mut self, amount: Chips) {
        self.chips = self.chips.saturating_add(amount);
        if self.chips > 0 && self.status == SeatStatus::Out {
            self.status = SeatStatus::Active;
        }
    }

    /// Deals one hole card. A third card is an error.
    pub fn give_card(&mut self, c: Card) -> Result<(), GameError> {
        if self.hole_cards.len() >= 2 {
            return Err(GameError::InvalidCard(format!(
                "seat {} already holds two cards",
                self.seat_id
            )));
        }
        self.hole_cards.push(c);
        Ok(())
    }

    pub(crate) fn record_action(&mut self, action: ActionType) {
        self.last_action = Some(action);
        self.acted_this_round = true;
    }

    /// Gives the player a fresh decision after someone reopened the betting.
    pub(crate) fn reopen_action(&mut self) {
        self.acted_this_round = false;
    }

    /// Zeroes this round's bet after it has been swept into the pot.
    pub(crate) fn collect_bet(&mut self) -> Chips {
        std::mem::take(&mut self.current_bet)
    }

    pub(crate) fn reset_round(&mut self) {
        self.current_bet = 0;
        self.acted_this_round = false;
    }

    /// Keeps chips, clears everything tied to the previous hand. Position
    /// flags are left to the blind assignment.
    pub fn reset_for_new_hand(&mut self) {
        self.hole_cards.clear();
        self.current_bet = 0;
        self.total_bet_this_hand = 0;
        self.last_action = None;
        self.acted_this_round = false;
        self.status = if self.chips > 0 {
            SeatStatus::Active
        } else {
            SeatStatus::Out
        };
    }

    pub(crate) fn clear_positions(&mut self) {
        self.is_dealer = false;
        self.is_small_blind = false;
        self.is_big_blind = false;
    }
}
