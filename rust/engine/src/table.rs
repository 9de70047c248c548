use crate::config::TableConfig;
use crate::deck::{CardSource, Deck};
use crate::errors::GameError;
use crate::events::{timestamp, GameEvent};
use crate::game::{GamePhase, GameState};
use crate::hand::{HandEvaluator, StandardEvaluator};
use crate::invariants::{InvariantChecker, InvariantReport, TableSnapshot};
use crate::phases::{self, Phase, PhaseContext, PhaseHandler, PreFlop};
use crate::player::{Action, ActionType, Chips, Player, Seat};
use crate::pot::Pot;
use crate::rules::{ActionValidator, ValidatedAction};
use crate::transition::transactional;

/// One table: seats, a deck, an evaluator and the hand in progress.
///
/// Actions go through [`Table::act`], which validates, applies and then runs
/// every transition that needs no player decision. Each transition is
/// transactional and checked against the table's invariants.
///
/// # Examples
///
/// ```
/// use holdem_engine::config::TableConfig;
/// use holdem_engine::player::Action;
/// use holdem_engine::table::Table;
///
/// let mut table = Table::new(TableConfig { seed: Some(7), ..TableConfig::default() }).unwrap();
/// table.seat_player(0).unwrap();
/// table.seat_player(1).unwrap();
/// table.start_hand().unwrap();
///
/// // Heads-up the dealer posts the small blind and acts first.
/// assert_eq!(table.current_player(), Some(0));
/// table.act(0, Action::Fold).unwrap();
///
/// assert!(table.is_hand_over());
/// assert_eq!(table.state().player(1).unwrap().chips(), 1001);
/// ```
#[derive(Debug)]
pub struct Table<D = Deck, E = StandardEvaluator>
where
    D: CardSource + Clone,
    E: HandEvaluator,
{
    config: TableConfig,
    state: GameState,
    deck: D,
    evaluator: E,
    checker: InvariantChecker,
}

impl Table<Deck, StandardEvaluator> {
    /// A table with the default deck and evaluator. Without a configured seed
    /// the deck is seeded at random.
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_parts(config, Deck::new_with_seed(seed), StandardEvaluator)
    }
}

impl<D, E> Table<D, E>
where
    D: CardSource + Clone,
    E: HandEvaluator,
{
    pub fn with_parts(config: TableConfig, deck: D, evaluator: E) -> Result<Self, GameError> {
        config.validate()?;
        let mut state = GameState::new(config.small_blind, config.big_blind);
        state.dealer_position = config.dealer_seat;
        let checker = InvariantChecker::new(0, config.invariant_mode);
        Ok(Self {
            config,
            state,
            deck,
            evaluator,
            checker,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn state(&self) -> &GameState {
        &self.state
    }
    pub fn deck(&self) -> &D {
        &self.deck
    }
    pub fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.state.snapshot()
    }

    /// Seats a player with the configured starting stack.
    pub fn seat_player(&mut self, seat: Seat) -> Result<(), GameError> {
        self.seat_player_with_chips(seat, self.config.starting_chips)
    }

    /// Seats a player with `chips`.
    ///
    /// # Errors
    ///
    /// [`GameError::ChipLimit`] if the table's chips would no longer fit in
    /// [`Chips`], besides the seating errors.
    pub fn seat_player_with_chips(&mut self, seat: Seat, chips: Chips) -> Result<(), GameError> {
        self.between_hands()?;
        if self.state.players().len() >= self.config.max_players {
            return Err(GameError::TableFull {
                max: self.config.max_players,
            });
        }
        self.ensure_chip_room(chips)?;
        self.state.insert_player(Player::new(seat, chips))?;
        self.recount_chips();
        tracing::info!(seat, chips, "player seated");
        Ok(())
    }

    /// Removes a player between hands, returning them with their chips.
    pub fn leave(&mut self, seat: Seat) -> Result<Player, GameError> {
        self.between_hands()?;
        let player = self.state.remove_player(seat)?;
        self.recount_chips();
        tracing::info!(seat, chips = player.chips(), "player left");
        Ok(player)
    }

    /// Tops up a stack between hands.
    pub fn rebuy(&mut self, seat: Seat, amount: Chips) -> Result<(), GameError> {
        self.between_hands()?;
        self.state.player(seat).ok_or(GameError::UnknownSeat(seat))?;
        self.ensure_chip_room(amount)?;
        self.state.player_mut(seat)?.add_chips(amount);
        self.recount_chips();
        tracing::info!(seat, amount, "player rebought");
        Ok(())
    }

    fn between_hands(&self) -> Result<(), GameError> {
        match self.state.phase() {
            GamePhase::Init | GamePhase::Finished => Ok(()),
            _ => Err(GameError::HandInProgress),
        }
    }

    /// Pot sums are kept in [`Chips`], so the whole table has to fit in one.
    fn ensure_chip_room(&self, extra: Chips) -> Result<(), GameError> {
        let total = self.state.total_chips() + u64::from(extra);
        let limit = u64::from(Chips::MAX);
        if total > limit {
            return Err(GameError::ChipLimit { total, limit });
        }
        Ok(())
    }

    /// Chips only enter or leave between hands; the checker's total follows.
    fn recount_chips(&mut self) {
        self.checker = InvariantChecker::new(self.state.total_chips(), self.config.invariant_mode);
    }

    /// Moves the button, shuffles and deals a new hand, then runs it forward
    /// to the first decision.
    ///
    /// The first hand uses the configured dealer seat (or the next seat with
    /// chips); later hands pass the button to the next seat with chips.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        self.between_hands()?;
        let funded = self.state.players().iter().filter(|p| p.chips() > 0).count();
        if funded < self.config.min_players {
            return Err(GameError::NotEnoughPlayers {
                min: self.config.min_players,
                found: funded,
            });
        }
        let dealer = self.next_dealer().ok_or(GameError::NotEnoughPlayers {
            min: self.config.min_players,
            found: funded,
        })?;
        self.recount_chips();

        let deck_backup = self.deck.clone();
        let Self {
            state,
            deck,
            evaluator,
            checker,
            ..
        } = self;
        let result = transactional(state, checker, |s| {
            let from = s.phase;
            s.hand_number += 1;
            s.dealer_position = dealer;
            s.community_cards.clear();
            s.pot = Pot::new();
            s.last_showdown = None;
            s.active_player = None;
            s.events.clear();
            for p in &mut s.players {
                p.reset_for_new_hand();
            }
            deck.shuffle(None);
            s.phase = GamePhase::PreFlop;
            s.push_event(GameEvent::HandStarted {
                hand_number: s.hand_number,
                dealer,
                seats: s.players.iter().filter(|p| p.chips() > 0).map(Player::seat_id).collect(),
                ts: timestamp(),
            });
            s.push_event(GameEvent::PhaseChanged {
                from,
                to: GamePhase::PreFlop,
            });
            let mut ctx = PhaseContext {
                deck: &mut *deck,
                evaluator: &*evaluator,
            };
            PreFlop.enter(s, &mut ctx)
        });
        if let Err(e) = result {
            *deck = deck_backup;
            return Err(e);
        }
        tracing::info!(
            hand = self.state.hand_number(),
            dealer,
            players = funded,
            "hand started"
        );
        self.settle()
    }

    fn next_dealer(&self) -> Option<Seat> {
        let funded = |p: &Player| p.chips() > 0;
        let current = self.state.dealer_position();
        if self.state.hand_number() == 0 && self.state.player(current).is_some_and(funded) {
            return Some(current);
        }
        self.state.next_seat_after(current, funded)
    }

    /// The seat whose decision the hand is waiting on.
    pub fn current_player(&self) -> Option<Seat> {
        if self.state.phase().is_betting() && !self.state.is_betting_round_complete() {
            self.state.active_player()
        } else {
            None
        }
    }

    pub fn legal_actions(&self, seat: Seat) -> Vec<ActionType> {
        ActionValidator::legal_actions(&self.state, seat)
    }

    pub fn validate(&self, seat: Seat, action: Action) -> Result<ValidatedAction, GameError> {
        ActionValidator::validate(&self.state, seat, action)
    }

    /// Validates and applies one action without moving to the next phase.
    /// Returns `true` while the betting round continues.
    pub fn execute(&mut self, seat: Seat, action: Action) -> Result<bool, GameError> {
        self.apply(seat, action).map(|(_, continues)| continues)
    }

    fn apply(&mut self, seat: Seat, action: Action) -> Result<(ValidatedAction, bool), GameError> {
        let validated = ActionValidator::validate(&self.state, seat, action)?;
        let handler = Phase::for_phase(self.state.phase()).ok_or(GameError::NoHandInProgress)?;
        let continues = handler.execute(&mut self.state, &validated)?;
        Ok((validated, continues))
    }

    /// Runs a single transition out of the current phase. On failure the
    /// state and the deck are exactly as before the call.
    ///
    /// # Errors
    ///
    /// [`ActionError::RoundOpen`](crate::errors::ActionError::RoundOpen) while
    /// a player still has to act in the current betting round.
    pub fn advance(&mut self) -> Result<GamePhase, GameError> {
        phases::ensure_round_closed(&self.state)?;
        let deck_backup = self.deck.clone();
        let Self {
            state,
            deck,
            evaluator,
            checker,
            ..
        } = self;
        let result = transactional(state, checker, |s| {
            let mut ctx = PhaseContext {
                deck: &mut *deck,
                evaluator: &*evaluator,
            };
            phases::advance(s, &mut ctx)
        });
        if result.is_err() {
            *deck = deck_backup;
        }
        result
    }

    /// Applies an action and then every transition that follows without a
    /// decision, up to the next player to act or the end of the hand.
    pub fn act(&mut self, seat: Seat, action: Action) -> Result<ValidatedAction, GameError> {
        let (validated, _) = self.apply(seat, action)?;
        self.settle()?;
        Ok(validated)
    }

    fn settle(&mut self) -> Result<(), GameError> {
        while self.needs_advance() {
            self.advance()?;
        }
        Ok(())
    }

    fn needs_advance(&self) -> bool {
        match self.state.phase() {
            GamePhase::Showdown => true,
            phase => phase.is_betting() && self.state.is_betting_round_complete(),
        }
    }

    pub fn is_betting_round_complete(&self) -> bool {
        self.state.is_betting_round_complete()
    }

    pub fn is_hand_over(&self) -> bool {
        self.state.phase() == GamePhase::Finished
    }

    /// Runs the checks against the current state in the configured mode.
    pub fn check_invariants(&self) -> Result<InvariantReport, GameError> {
        self.checker.enforce(&self.state)
    }
}
