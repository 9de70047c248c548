use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Source of unique cards for one hand.
///
/// The engine only ever deals, burns and reshuffles; it never looks at how the
/// order was produced.
pub trait CardSource {
    /// Hands out the next card, failing with [`GameError::EmptyDeck`] once
    /// exhausted.
    fn deal_card(&mut self) -> Result<Card, GameError>;

    /// Restores all cards and shuffles. `Some(seed)` reseeds first so the
    /// resulting order is reproducible.
    fn shuffle(&mut self, seed: Option<u64>);

    fn remaining(&self) -> usize;

    fn burn_card(&mut self) -> Result<(), GameError> {
        self.deal_card().map(|_| ())
    }
}

/// Default 52-card deck driven by a seeded ChaCha20 stream.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
    stacked: bool,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
            stacked: false,
        }
    }

    /// A deck that deals `cards` in exactly the given order. Shuffling only
    /// rewinds it, which keeps scripted hands deterministic.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            cards,
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(0),
            stacked: true,
        }
    }

    pub fn reset(&mut self) {
        if !self.stacked {
            self.cards = full_deck();
        }
        self.position = 0;
    }
}

impl CardSource for Deck {
    fn deal_card(&mut self) -> Result<Card, GameError> {
        let card = self
            .cards
            .get(self.position)
            .copied()
            .ok_or(GameError::EmptyDeck)?;
        self.position += 1;
        Ok(card)
    }

    fn shuffle(&mut self, seed: Option<u64>) {
        self.reset();
        if self.stacked {
            return;
        }
        if let Some(seed) = seed {
            self.rng = ChaCha20Rng::seed_from_u64(seed);
        }
        self.cards.shuffle(&mut self.rng);
    }

    fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}
