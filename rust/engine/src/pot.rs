use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::player::{Chips, Seat};

/// One contestable layer of the pot and the seats allowed to win it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotTier {
    /// Chips in this layer
    pub amount: Chips,
    /// Seats still in the hand that reached this layer, ascending
    pub eligible: Vec<Seat>,
}

/// Chips above every other contribution, owed back to the only seat that put
/// them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// The only seat that bet this much
    pub seat: Seat,
    /// Chips nobody called
    pub amount: Chips,
}

/// Output of [`calculate_pots`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotBreakdown {
    /// Lowest tier; `None` when nothing was contested
    pub main_pot: Option<PotTier>,
    /// Higher tiers, lowest first
    pub side_pots: Vec<PotTier>,
    /// Uncalled surplus of the largest contribution
    pub refund: Option<Refund>,
}

impl PotBreakdown {
    pub fn tiers(&self) -> impl Iterator<Item = &PotTier> {
        self.main_pot.iter().chain(self.side_pots.iter())
    }

    pub fn contested(&self) -> u64 {
        self.tiers().map(|t| u64::from(t.amount)).sum()
    }

    pub fn refunded(&self) -> u64 {
        self.refund.map_or(0, |r| u64::from(r.amount))
    }
}

/// Splits per-seat contributions for the hand into a main pot, side pots and
/// at most one refund.
///
/// Distinct contribution levels are walked in ascending order. Each level
/// forms a tier worth `(level - previous level) * contributors at or above
/// level`, contestable by the contributors that have not folded. A level
/// reached by a single contributor is not a pot at all: it is the uncalled
/// part of that seat's bet and goes back to it. Zero contributions are
/// ignored.
///
/// The result always satisfies
/// `sum(tiers) + refund == sum(contributions)`.
///
/// # Examples
///
/// ```
/// use std::collections::{BTreeMap, BTreeSet};
/// use holdem_engine::pot::calculate_pots;
///
/// let contributions = BTreeMap::from([(0, 50), (1, 100), (2, 200)]);
/// let pots = calculate_pots(&contributions, &BTreeSet::new());
///
/// let main = pots.main_pot.unwrap();
/// assert_eq!(main.amount, 150);
/// assert_eq!(main.eligible, vec![0, 1, 2]);
/// assert_eq!(pots.side_pots[0].amount, 100);
/// assert_eq!(pots.side_pots[0].eligible, vec![1, 2]);
/// assert_eq!(pots.refund.unwrap().amount, 50);
/// ```
pub fn calculate_pots(
    contributions: &BTreeMap<Seat, Chips>,
    folded: &BTreeSet<Seat>,
) -> PotBreakdown {
    let mut levels: Vec<Chips> = contributions.values().copied().filter(|&c| c > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut tiers: Vec<PotTier> = Vec::with_capacity(levels.len());
    let mut refund = None;
    let mut previous = 0;
    for level in levels {
        let contributors: Vec<Seat> = contributions
            .iter()
            .filter(|&(_, &c)| c >= level)
            .map(|(&seat, _)| seat)
            .collect();
        let increment = level - previous;
        previous = level;

        if let [only] = contributors.as_slice() {
            // Only the top level can have a single contributor.
            refund = Some(Refund {
                seat: *only,
                amount: increment,
            });
            break;
        }

        let amount = increment * contributors.len() as Chips;
        let eligible: Vec<Seat> = contributors
            .into_iter()
            .filter(|seat| !folded.contains(seat))
            .collect();
        match tiers.last_mut() {
            // Nobody left to win this layer on its own; it joins the layer below.
            Some(last) if eligible.is_empty() => last.amount += amount,
            _ => tiers.push(PotTier { amount, eligible }),
        }
    }

    let mut tiers = tiers.into_iter();
    PotBreakdown {
        main_pot: tiers.next(),
        side_pots: tiers.collect(),
        refund,
    }
}

/// Divides `amount` evenly among `winners`, handing out the remainder one chip
/// at a time in the order given (callers pass winners clockwise from the
/// dealer).
pub fn split_amount(amount: Chips, winners: &[Seat]) -> Vec<(Seat, Chips)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as Chips;
    let share = amount / n;
    let remainder = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| (seat, share + Chips::from(i < remainder)))
        .collect()
}

/// Chips collected from finished betting rounds, kept already split into
/// tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    main_pot: Option<PotTier>,
    side_pots: Vec<PotTier>,
    uncalled: Option<Refund>,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the tiers from the hand's cumulative contributions.
    pub fn rebuild(contributions: &BTreeMap<Seat, Chips>, folded: &BTreeSet<Seat>) -> Self {
        let PotBreakdown {
            main_pot,
            side_pots,
            refund,
        } = calculate_pots(contributions, folded);
        Self {
            main_pot,
            side_pots,
            uncalled: refund,
        }
    }

    pub fn main_pot(&self) -> Chips {
        self.main_pot.as_ref().map_or(0, |t| t.amount)
    }

    pub fn main_tier(&self) -> Option<&PotTier> {
        self.main_pot.as_ref()
    }

    pub fn side_pots(&self) -> &[PotTier] {
        &self.side_pots
    }

    pub fn uncalled(&self) -> Option<Refund> {
        self.uncalled
    }

    /// Every chip held by the pot, including the uncalled surplus awaiting
    /// return.
    pub fn total(&self) -> Chips {
        self.main_pot() + self.side_pots.iter().map(|t| t.amount).sum::<Chips>()
            + self.uncalled.map_or(0, |r| r.amount)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Empties the pot, handing back the tiers and refund for payout.
    pub(crate) fn drain(&mut self) -> PotBreakdown {
        let taken = std::mem::take(self);
        PotBreakdown {
            main_pot: taken.main_pot,
            side_pots: taken.side_pots,
            refund: taken.uncalled,
        }
    }
}
