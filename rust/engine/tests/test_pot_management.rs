use std::collections::{BTreeMap, BTreeSet};

use holdem_engine::pot::{calculate_pots, split_amount, Pot, PotTier, Refund};
use proptest::prelude::*;

fn folded(seats: &[usize]) -> BTreeSet<usize> {
    seats.iter().copied().collect()
}

#[test]
fn three_way_all_in_builds_main_side_and_refund() {
    let contributions = BTreeMap::from([(0, 50), (1, 100), (2, 200)]);
    let pots = calculate_pots(&contributions, &BTreeSet::new());

    assert_eq!(
        pots.main_pot,
        Some(PotTier {
            amount: 150,
            eligible: vec![0, 1, 2]
        })
    );
    assert_eq!(
        pots.side_pots,
        vec![PotTier {
            amount: 100,
            eligible: vec![1, 2]
        }]
    );
    assert_eq!(pots.refund, Some(Refund { seat: 2, amount: 50 }));
}

#[test]
fn heads_up_uneven_stacks_refund_the_difference() {
    let contributions = BTreeMap::from([(0, 500), (1, 1000)]);
    let pots = calculate_pots(&contributions, &BTreeSet::new());
    assert_eq!(pots.main_pot.as_ref().map(|t| t.amount), Some(1000));
    assert!(pots.side_pots.is_empty());
    assert_eq!(pots.refund, Some(Refund { seat: 1, amount: 500 }));
}

#[test]
fn equal_contributions_make_a_single_pot() {
    let contributions = BTreeMap::from([(0, 1000), (1, 1000), (2, 1000)]);
    let pots = calculate_pots(&contributions, &BTreeSet::new());
    assert_eq!(pots.main_pot.unwrap().amount, 3000);
    assert!(pots.side_pots.is_empty());
    assert!(pots.refund.is_none());
}

#[test]
fn folded_chips_stay_in_the_pot_without_eligibility() {
    let contributions = BTreeMap::from([(0, 40), (1, 100), (2, 100)]);
    let pots = calculate_pots(&contributions, &folded(&[0]));
    let main = pots.main_pot.unwrap();
    assert_eq!(main.amount, 120);
    assert_eq!(main.eligible, vec![1, 2]);
    assert_eq!(pots.side_pots[0].amount, 120);
    assert_eq!(pots.side_pots[0].eligible, vec![1, 2]);
}

#[test]
fn tier_with_only_folded_contributors_joins_the_tier_below() {
    // Seat 2 is all-in for 50; seats 0 and 1 bet more and then folded.
    let contributions = BTreeMap::from([(0, 100), (1, 100), (2, 50)]);
    let pots = calculate_pots(&contributions, &folded(&[0, 1]));
    let main = pots.main_pot.unwrap();
    assert_eq!(main.amount, 250);
    assert_eq!(main.eligible, vec![2]);
    assert!(pots.side_pots.is_empty());
    assert!(pots.refund.is_none());
}

#[test]
fn zero_contributions_are_ignored() {
    let contributions = BTreeMap::from([(0, 0), (1, 20), (2, 20)]);
    let pots = calculate_pots(&contributions, &BTreeSet::new());
    assert_eq!(pots.main_pot.unwrap().eligible, vec![1, 2]);

    let empty = calculate_pots(&BTreeMap::new(), &BTreeSet::new());
    assert!(empty.main_pot.is_none());
    assert_eq!(empty.contested(), 0);
}

#[test]
fn single_contributor_is_refunded_entirely() {
    let contributions = BTreeMap::from([(3, 75)]);
    let pots = calculate_pots(&contributions, &BTreeSet::new());
    assert!(pots.main_pot.is_none());
    assert_eq!(pots.refund, Some(Refund { seat: 3, amount: 75 }));
}

#[test]
fn split_gives_odd_chips_in_the_order_given() {
    assert_eq!(split_amount(10, &[4, 1, 2]), vec![(4, 4), (1, 3), (2, 3)]);
    assert_eq!(split_amount(9, &[0, 1, 2]), vec![(0, 3), (1, 3), (2, 3)]);
    assert!(split_amount(9, &[]).is_empty());
}

#[test]
fn pot_total_counts_the_uncalled_surplus() {
    let contributions = BTreeMap::from([(0, 50), (1, 100), (2, 200)]);
    let mut pot = Pot::rebuild(&contributions, &BTreeSet::new());
    assert_eq!(pot.main_pot(), 150);
    assert_eq!(pot.side_pots().len(), 1);
    assert_eq!(pot.total(), 350);
    assert_eq!(pot.uncalled(), Some(Refund { seat: 2, amount: 50 }));
    assert!(!pot.is_empty());

    pot = Pot::new();
    assert!(pot.is_empty());
}

proptest! {
    #[test]
    fn tiers_and_refund_partition_the_contributions(
        bets in proptest::collection::btree_map(0usize..9, 0u32..5_000, 1..9),
        fold_mask in any::<u16>(),
    ) {
        let folded: BTreeSet<usize> = bets
            .keys()
            .copied()
            .filter(|seat| fold_mask & (1 << seat) != 0)
            .collect();
        let pots = calculate_pots(&bets, &folded);

        let contributed: u64 = bets.values().map(|&c| u64::from(c)).sum();
        prop_assert_eq!(pots.contested() + pots.refunded(), contributed);

        for tier in pots.tiers() {
            prop_assert!(tier.amount > 0);
            for seat in &tier.eligible {
                prop_assert!(!folded.contains(seat));
            }
        }
        if let Some(refund) = pots.refund {
            let top = bets.values().copied().max().unwrap_or(0);
            prop_assert_eq!(bets[&refund.seat], top);
            prop_assert_eq!(bets.values().filter(|&&c| c == top).count(), 1);
        }
    }
}
