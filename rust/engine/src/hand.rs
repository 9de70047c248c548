use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};

/// Ranks a player's best hand. The engine relies only on the ordering of
/// [`HandEvaluator::Rank`]: greater wins, equal splits.
pub trait HandEvaluator {
    type Rank: Ord + Clone + Debug;

    fn evaluate(&self, hole: &[Card], board: &[Card]) -> Self::Rank;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Category first, then tiebreak ranks high to low. Unused slots are zero, so
/// the derived ordering is the poker ordering.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    pub kickers: [u8; 5],
}

/// Default evaluator: best five of whatever hole and board cards are given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    type Rank = HandStrength;

    fn evaluate(&self, hole: &[Card], board: &[Card]) -> HandStrength {
        let cards: Vec<Card> = hole.iter().chain(board).copied().collect();
        evaluate_cards(&cards)
    }
}

/// Evaluates the best five-card hand among `cards` (normally 5 to 7 cards).
///
/// ```
/// use holdem_engine::hand::{evaluate_cards, Category};
///
/// let cards: Vec<_> = ["Ah", "Kh", "Qh", "Jh", "Th", "2c", "3d"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// assert_eq!(evaluate_cards(&cards).category, Category::StraightFlush);
/// ```
pub fn evaluate_cards(cards: &[Card]) -> HandStrength {
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: u16 = 0;
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        let s = suit_index(c.suit);
        suit_counts[s] += 1;
        suit_masks[s] |= 1 << r;
    }

    let flush_mask = suit_counts
        .iter()
        .position(|&n| n >= 5)
        .map(|s| suit_masks[s]);

    if let Some(high) = flush_mask.and_then(straight_high) {
        return strength(Category::StraightFlush, &[high]);
    }

    // Ranks grouped by multiplicity, each list high to low.
    let mut quads = Vec::new();
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    let mut singles = Vec::new();
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            4 => quads.push(r),
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }

    if let Some(&quad) = quads.first() {
        let kicker = (2..=14u8)
            .rev()
            .find(|&r| r != quad && rank_counts[r as usize] > 0)
            .unwrap_or(0);
        return strength(Category::FourOfAKind, &[quad, kicker]);
    }

    if let Some(&trip) = trips.first() {
        // A second set of trips plays as the pair.
        if let Some(pair) = trips.get(1).into_iter().chain(pairs.first()).max().copied() {
            return strength(Category::FullHouse, &[trip, pair]);
        }
    }

    if let Some(mask) = flush_mask {
        let top: Vec<u8> = ranks_high_to_low(mask).take(5).collect();
        return strength(Category::Flush, &top);
    }

    if let Some(high) = straight_high(rank_mask) {
        return strength(Category::Straight, &[high]);
    }

    if let Some(&trip) = trips.first() {
        let mut ranks = vec![trip];
        ranks.extend(ranks_high_to_low(rank_mask).filter(|&r| r != trip).take(2));
        return strength(Category::ThreeOfAKind, &ranks);
    }

    if let [high, low, ..] = pairs[..] {
        let kicker = ranks_high_to_low(rank_mask)
            .find(|&r| r != high && r != low)
            .unwrap_or(0);
        return strength(Category::TwoPair, &[high, low, kicker]);
    }

    if let Some(&pair) = pairs.first() {
        let mut ranks = vec![pair];
        ranks.extend(singles.iter().take(3));
        return strength(Category::OnePair, &ranks);
    }

    strength(Category::HighCard, &singles[..singles.len().min(5)])
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

fn ranks_high_to_low(mask: u16) -> impl Iterator<Item = u8> {
    (2..=14u8).rev().filter(move |&r| mask & (1 << r) != 0)
}

/// Highest card of the best straight in `mask`; the wheel (A-2-3-4-5) is 5.
fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    if m & (1 << 14) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        m & window == window
    })
}
