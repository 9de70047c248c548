//! # holdem-engine: No-Limit Texas Hold'em Rules Engine
//!
//! Authoritative state and rules for a single No-Limit Hold'em table: legal
//! actions, blinds and positions, side pots under all-in, and the hand's
//! progress from the deal to the payout. Chip accounting is checked at every
//! phase boundary and a failed transition leaves no trace.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - The [`deck::CardSource`] seam and a seeded ChaCha20 deck
//! - [`hand`] - The [`hand::HandEvaluator`] seam and the default evaluator
//! - [`player`] - Seats, stacks and the actions a player can request
//! - [`game`] - Game phases and the authoritative [`game::GameState`]
//! - [`rules`] - [`rules::ActionValidator`]: requested action in, validated action out
//! - [`pot`] - Main pot, side pots and uncalled bets
//! - [`phases`] - Enter/execute/exit for each phase of a hand
//! - [`transition`] - Rollback-on-failure wrapper for phase transitions
//! - [`invariants`] - Chip conservation, betting and phase consistency checks
//! - [`table`] - [`table::Table`], the entry point tying it all together
//! - [`events`] - Hand event log with JSON lines export
//! - [`config`] - Table configuration from defaults, TOML and environment
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::config::TableConfig;
//! use holdem_engine::player::Action;
//! use holdem_engine::table::Table;
//!
//! let config = TableConfig { seed: Some(42), ..TableConfig::default() };
//! let mut table = Table::new(config).unwrap();
//! for seat in 0..3 {
//!     table.seat_player(seat).unwrap();
//! }
//! table.start_hand().unwrap();
//!
//! // Everyone calls or checks until the hand is over.
//! while let Some(seat) = table.current_player() {
//!     table.act(seat, Action::Call).unwrap();
//! }
//! assert!(table.is_hand_over());
//! assert_eq!(table.state().total_chips(), 3000);
//! ```
//!
//! ## Side Pots
//!
//! ```rust
//! use std::collections::{BTreeMap, BTreeSet};
//! use holdem_engine::pot::calculate_pots;
//!
//! let contributions = BTreeMap::from([(0, 50), (1, 100), (2, 200)]);
//! let pots = calculate_pots(&contributions, &BTreeSet::new());
//! assert_eq!(pots.main_pot.unwrap().amount, 150);
//! assert_eq!(pots.side_pots[0].amount, 100);
//! assert_eq!(pots.refund.unwrap().amount, 50);
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod errors;
pub mod events;
pub mod game;
pub mod hand;
pub mod invariants;
pub mod phases;
pub mod player;
pub mod pot;
pub mod rules;
pub mod table;
pub mod transition;

pub use errors::{ActionError, GameError};
pub use game::{GamePhase, GameState};
pub use player::{Action, ActionType, Chips, Seat};
pub use table::Table;
