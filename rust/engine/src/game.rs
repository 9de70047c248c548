use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::events::{BlindKind, EventLog, GameEvent};
use crate::phases::showdown::ShowdownSummary;
use crate::player::{Chips, Player, Seat, SeatStatus};
use crate::pot::Pot;

/// Phases of a hand. `Init` sits between hands, `Finished` after the payout.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum GamePhase {
    /// No hand dealt yet
    Init,
    /// Hole cards dealt, blinds posted
    PreFlop,
    /// Three board cards
    Flop,
    /// Fourth board card
    Turn,
    /// Fifth board card
    River,
    /// Pots being paid
    Showdown,
    /// Hand over; seating changes are allowed again
    Finished,
}

impl GamePhase {
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            GamePhase::PreFlop | GamePhase::Flop | GamePhase::Turn | GamePhase::River
        )
    }

    /// Board size once this phase has been entered.
    pub fn community_cards(self) -> usize {
        match self {
            GamePhase::Init | GamePhase::PreFlop => 0,
            GamePhase::Flop => 3,
            GamePhase::Turn => 4,
            GamePhase::River | GamePhase::Showdown | GamePhase::Finished => 5,
        }
    }

    /// The street dealt after this one.
    pub fn next_street(self) -> Option<GamePhase> {
        match self {
            GamePhase::PreFlop => Some(GamePhase::Flop),
            GamePhase::Flop => Some(GamePhase::Turn),
            GamePhase::Turn => Some(GamePhase::River),
            GamePhase::River => Some(GamePhase::Showdown),
            _ => None,
        }
    }
}

/// Authoritative state of one table.
///
/// Players live in an arena sorted by seat id and are always addressed by
/// seat. Clockwise order is ascending seat id, wrapping around.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) phase: GamePhase,
    pub(crate) players: Vec<Player>,
    pub(crate) community_cards: Vec<Card>,
    pub(crate) pot: Pot,
    pub(crate) current_bet: Chips,
    pub(crate) last_raise_increment: Chips,
    pub(crate) last_raiser: Option<Seat>,
    pub(crate) street_action_count: u32,
    pub(crate) dealer_position: Seat,
    pub(crate) active_player: Option<Seat>,
    pub(crate) small_blind: Chips,
    pub(crate) big_blind: Chips,
    pub(crate) hand_number: u64,
    pub(crate) events: EventLog,
    pub(crate) last_showdown: Option<ShowdownSummary>,
}

impl GameState {
    pub fn new(small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            phase: GamePhase::Init,
            players: Vec::new(),
            community_cards: Vec::with_capacity(5),
            pot: Pot::new(),
            current_bet: 0,
            last_raise_increment: big_blind,
            last_raiser: None,
            street_action_count: 0,
            dealer_position: 0,
            active_player: None,
            small_blind,
            big_blind,
            hand_number: 0,
            events: EventLog::new(),
            last_showdown: None,
        }
    }

    /// A state with the given players already seated, dealer at `dealer`.
    pub fn with_players(
        players: Vec<Player>,
        dealer: Seat,
        small_blind: Chips,
        big_blind: Chips,
    ) -> Self {
        let mut state = Self::new(small_blind, big_blind);
        state.players = players;
        state.players.sort_by_key(Player::seat_id);
        state.dealer_position = dealer;
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }
    pub fn pot(&self) -> &Pot {
        &self.pot
    }
    /// Highest bet in the current round; what everyone must match.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    /// Size of the last full bet or raise, the big blind at the start of a
    /// round.
    pub fn last_raise_increment(&self) -> Chips {
        self.last_raise_increment
    }
    /// Seat of the last full bet or raise this round.
    pub fn last_raiser(&self) -> Option<Seat> {
        self.last_raiser
    }
    pub fn street_action_count(&self) -> u32 {
        self.street_action_count
    }
    pub fn dealer_position(&self) -> Seat {
        self.dealer_position
    }
    /// Next seat to act, even once the round is complete; see
    /// [`crate::table::Table::current_player`] for the seat the hand waits on.
    pub fn active_player(&self) -> Option<Seat> {
        self.active_player
    }
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    /// Events of the current hand.
    pub fn events(&self) -> &EventLog {
        &self.events
    }
    /// Payout of the most recently finished hand.
    pub fn last_showdown(&self) -> Option<&ShowdownSummary> {
        self.last_showdown.as_ref()
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.index_of(seat).map(|i| &self.players[i])
    }

    pub(crate) fn player_mut(&mut self, seat: Seat) -> Result<&mut Player, GameError> {
        let i = self.index_of(seat).ok_or(GameError::UnknownSeat(seat))?;
        Ok(&mut self.players[i])
    }

    fn index_of(&self, seat: Seat) -> Option<usize> {
        self.players.binary_search_by_key(&seat, Player::seat_id).ok()
    }

    pub(crate) fn insert_player(&mut self, player: Player) -> Result<(), GameError> {
        match self
            .players
            .binary_search_by_key(&player.seat_id(), Player::seat_id)
        {
            Ok(_) => Err(GameError::SeatTaken(player.seat_id())),
            Err(i) => {
                self.players.insert(i, player);
                Ok(())
            }
        }
    }

    pub(crate) fn remove_player(&mut self, seat: Seat) -> Result<Player, GameError> {
        let i = self.index_of(seat).ok_or(GameError::UnknownSeat(seat))?;
        Ok(self.players.remove(i))
    }

    /// Collected pot plus the bets still in front of the players.
    pub fn pot_total(&self) -> Chips {
        self.pot.total() + self.players.iter().map(Player::current_bet).sum::<Chips>()
    }

    /// Every chip at the table, in stacks or in the pot.
    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.chips())).sum::<u64>() + u64::from(self.pot_total())
    }

    pub fn players_in_hand(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.in_hand())
    }

    pub fn actionable_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.can_act())
    }

    /// First seat strictly clockwise of `from` matching `pred`, wrapping
    /// around the table. `from` itself is considered last.
    pub fn next_seat_after<F>(&self, from: Seat, pred: F) -> Option<Seat>
    where
        F: Fn(&Player) -> bool,
    {
        let after = self.players.iter().filter(|p| p.seat_id() > from);
        let before = self.players.iter().filter(|p| p.seat_id() <= from);
        after.chain(before).find(|&p| pred(p)).map(Player::seat_id)
    }

    /// Seats in clockwise order starting left of the dealer.
    pub fn seats_from_dealer(&self) -> Vec<Seat> {
        let d = self.dealer_position;
        let after = self.players.iter().filter(|p| p.seat_id() > d);
        let before = self.players.iter().filter(|p| p.seat_id() <= d);
        after.chain(before).map(Player::seat_id).collect()
    }

    pub fn small_blind_seat(&self) -> Option<Seat> {
        self.players
            .iter()
            .find(|p| p.is_small_blind())
            .map(Player::seat_id)
    }

    pub fn big_blind_seat(&self) -> Option<Seat> {
        self.players
            .iter()
            .find(|p| p.is_big_blind())
            .map(Player::seat_id)
    }

    /// Marks dealer and blinds and posts the blinds.
    ///
    /// Heads-up the dealer posts the small blind; otherwise the small blind is
    /// the first seat with chips left of the dealer and the big blind the next
    /// one. A short stack posts what it has and is all-in.
    pub fn set_blinds(&mut self) -> Result<(), GameError> {
        let dealer = self.dealer_position;
        for p in &mut self.players {
            p.clear_positions();
        }
        self.player_mut(dealer)?.is_dealer = true;

        let dealt_in = |p: &Player| p.status() != SeatStatus::Out;
        let seated = self.players.iter().filter(|&p| dealt_in(p)).count();
        if seated < 2 {
            return Err(GameError::NotEnoughPlayers {
                min: 2,
                found: seated,
            });
        }
        let sb_seat = if seated == 2 {
            dealer
        } else {
            self.next_seat_after(dealer, dealt_in)
                .ok_or(GameError::UnknownSeat(dealer))?
        };
        let bb_seat = self
            .next_seat_after(sb_seat, dealt_in)
            .ok_or(GameError::UnknownSeat(sb_seat))?;

        let (sb, bb) = (self.small_blind, self.big_blind);
        let small = self.post_blind(sb_seat, sb, BlindKind::Small)?;
        let big = self.post_blind(bb_seat, bb, BlindKind::Big)?;
        self.current_bet = small.max(big);
        self.last_raise_increment = bb;
        self.last_raiser = None;
        Ok(())
    }

    fn post_blind(&mut self, seat: Seat, blind: Chips, kind: BlindKind) -> Result<Chips, GameError> {
        let player = self.player_mut(seat)?;
        match kind {
            BlindKind::Small => player.is_small_blind = true,
            BlindKind::Big => player.is_big_blind = true,
        }
        let amount = blind.min(player.chips());
        player.bet(amount)?;
        tracing::debug!(seat, ?kind, amount, "blind posted");
        self.events.push(GameEvent::BlindPosted { seat, kind, amount });
        Ok(amount)
    }

    /// Fresh betting round: no bet, minimum raise back to the big blind.
    pub(crate) fn start_betting_round(&mut self) {
        for p in &mut self.players {
            p.reset_round();
        }
        self.current_bet = 0;
        self.last_raise_increment = self.big_blind;
        self.last_raiser = None;
        self.street_action_count = 0;
    }

    /// Whether the current betting round needs no further action.
    pub fn is_betting_round_complete(&self) -> bool {
        if self.players_in_hand().count() <= 1 {
            return true;
        }
        let actionable: Vec<&Player> = self.actionable_players().collect();
        match actionable.as_slice() {
            [] => true,
            // Everyone else is all-in; the last player only has to match.
            [only] if only.current_bet() >= self.current_bet => true,
            players => players
                .iter()
                .all(|p| p.acted_this_round() && p.current_bet() == self.current_bet),
        }
    }

    /// Seat ids of players that folded this hand.
    pub fn folded_seats(&self) -> BTreeSet<Seat> {
        self.players
            .iter()
            .filter(|p| p.status() == SeatStatus::Folded)
            .map(Player::seat_id)
            .collect()
    }

    /// Everything each seat has put in this hand.
    pub fn contributions(&self) -> BTreeMap<Seat, Chips> {
        self.players
            .iter()
            .filter(|p| p.total_bet_this_hand() > 0)
            .map(|p| (p.seat_id(), p.total_bet_this_hand()))
            .collect()
    }

    /// Sweeps the live bets into the pot and rebuilds its tiers.
    pub(crate) fn collect_bets(&mut self) {
        for p in &mut self.players {
            p.collect_bet();
        }
        self.pot = Pot::rebuild(&self.contributions(), &self.folded_seats());
        self.current_bet = 0;
        self.events.push(GameEvent::BetsCollected {
            phase: self.phase,
            pot_total: self.pot.total(),
        });
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
