use holdem_engine::config::TableConfig;
use holdem_engine::game::{GamePhase, GameState};
use holdem_engine::invariants::{
    BettingRules, ChipConservation, InvariantCheck, InvariantKind, PhaseConsistency, Severity,
    TableSnapshot,
};
use holdem_engine::player::{Action, Player};
use holdem_engine::table::Table;

/// Three players, blinds 1/2, button on seat 0, seat 0 to act.
fn preflop() -> Table {
    let mut t = Table::new(TableConfig {
        seed: Some(21),
        ..TableConfig::default()
    })
    .unwrap();
    for seat in 0..3 {
        t.seat_player(seat).unwrap();
    }
    t.start_hand().unwrap();
    t
}

fn flop() -> Table {
    let mut t = preflop();
    t.act(0, Action::Call).unwrap();
    t.act(1, Action::Call).unwrap();
    t.act(2, Action::Check).unwrap();
    assert_eq!(t.phase(), GamePhase::Flop);
    t
}

#[test]
fn a_legal_hand_is_clean_at_every_step() {
    let mut t = preflop();
    assert!(t.checker().check(&t.snapshot()).is_clean());
    assert_eq!(t.checker().initial_total(), 3000);

    while let Some(seat) = t.current_player() {
        t.act(seat, Action::Call).unwrap();
        let report = t.check_invariants().unwrap();
        assert!(!report.has_critical(), "{:?}", report);
    }
    assert!(t.is_hand_over());
    assert!(t.check_invariants().unwrap().is_clean());
}

#[test]
fn missing_chips_are_critical() {
    let t = preflop();
    let mut snap = t.snapshot();
    snap.pot_total -= 1;

    let found = ChipConservation::new(3000).check(&snap);
    assert_eq!(found.len(), 2, "total and contribution checks both fail");
    assert!(found.iter().all(|v| v.severity == Severity::Critical));
    assert_eq!(found[0].context["difference"], -1);
}

#[test]
fn contributions_are_not_compared_after_the_payout() {
    let mut snap = flop().snapshot();
    snap.phase = GamePhase::Showdown;
    snap.community_cards.clear();
    // Board size alone is wrong here; chips still add up.
    assert!(ChipConservation::new(3000).check(&snap).is_empty());
}

#[test]
fn current_bet_must_match_the_highest_bet() {
    let mut snap = preflop().snapshot();
    snap.current_bet = 10;
    let found = BettingRules.check(&snap);
    assert!(found
        .iter()
        .any(|v| v.is_critical() && v.context["max_player_bet"] == 2));
}

#[test]
fn blinds_must_be_ordered() {
    let mut snap = preflop().snapshot();
    snap.small_blind = 2;
    let found = BettingRules.check(&snap);
    assert!(found.iter().any(|v| v.description.contains("must exceed")));
}

#[test]
fn folded_bet_left_behind_at_street_start_is_critical() {
    let mut folded = Player::new(4, 100);
    folded.bet(10).unwrap();
    folded.fold().unwrap();

    let mut snap = flop().snapshot();
    snap.players.push(folded.clone());
    snap.current_bet = 10;
    assert_eq!(snap.street_action_count, 0);
    let found = BettingRules.check(&snap);
    assert!(found.iter().any(|v| v.context["seat"] == 4 && v.is_critical()));

    // Mid-street the bet is simply waiting to be collected.
    snap.street_action_count = 2;
    let found = BettingRules.check(&snap);
    assert!(!found.iter().any(|v| v.context["seat"] == 4));
}

#[test]
fn small_raise_is_only_a_warning() {
    let mut t = flop();
    t.act(1, Action::Bet(10)).unwrap();
    let mut snap = t.snapshot();
    // Pretend seat 2 raised by a single chip.
    let mut raiser = snap.players[2].clone();
    raiser.bet(11).unwrap();
    snap.players[2] = raiser;
    snap.current_bet = 11;

    let found = BettingRules.check(&snap);
    assert_eq!(found.len(), 1, "{:?}", found);
    assert_eq!(found[0].severity, Severity::Warning);
    assert_eq!(found[0].context["raise"], 1);
}

#[test]
fn raise_size_is_measured_against_the_last_raise() {
    let mut t = flop();
    t.act(1, Action::Bet(10)).unwrap();
    t.act(2, Action::Raise(40)).unwrap();
    assert_eq!(t.state().last_raise_increment(), 30);
    // Mid-street, after a real raise, the table is clean.
    assert!(t.check_invariants().unwrap().is_clean());

    // A re-raise of 20 clears the big blind but not the last raise of 30.
    let mut snap = t.snapshot();
    let mut raiser = snap.players[0].clone();
    raiser.bet(60).unwrap();
    snap.players[0] = raiser;
    snap.current_bet = 60;

    let found = BettingRules.check(&snap);
    assert_eq!(found.len(), 1, "{:?}", found);
    assert_eq!(found[0].severity, Severity::Warning);
    assert_eq!(found[0].context["raise"], 20);
    assert_eq!(found[0].context["minimum"], 30);
}

#[test]
fn short_big_blind_is_not_a_small_raise() {
    // Seat 0 posts 5, seat 1 can only post 3 of the 10.
    let players = vec![Player::new(0, 100), Player::new(1, 3)];
    let mut state = GameState::with_players(players, 0, 5, 10);
    state.set_blinds().unwrap();
    let mut snap = state.snapshot();
    snap.phase = GamePhase::PreFlop;
    assert_eq!(snap.current_bet, 5);
    assert!(BettingRules.check(&snap).is_empty());
}

#[test]
fn seating_changes_between_hands_move_the_expected_total() {
    let mut t = Table::new(TableConfig {
        seed: Some(6),
        ..TableConfig::default()
    })
    .unwrap();
    t.seat_player(0).unwrap();
    t.seat_player(1).unwrap();
    t.start_hand().unwrap();
    t.act(0, Action::Fold).unwrap();
    assert!(t.is_hand_over());
    assert_eq!(t.checker().initial_total(), 2000);

    t.rebuy(0, 50).unwrap();
    assert_eq!(t.checker().initial_total(), 2050);
    assert!(t.check_invariants().unwrap().is_clean());

    t.leave(1).unwrap();
    assert_eq!(t.checker().initial_total(), 1049);
    assert!(t.check_invariants().unwrap().is_clean());

    t.seat_player(2).unwrap();
    t.seat_player(3).unwrap();
    assert_eq!(t.checker().initial_total(), 3049);
    assert!(t.check_invariants().unwrap().is_clean());

    t.start_hand().unwrap();
    assert_eq!(t.state().total_chips(), 3049);
    assert!(!t.check_invariants().unwrap().has_critical());
}

#[test]
fn board_size_follows_the_phase() {
    let mut snap = flop().snapshot();
    snap.phase = GamePhase::Turn;
    let found = PhaseConsistency.check(&snap);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context["expected"], 4);
    assert_eq!(found[0].context["found"], 3);
}

#[test]
fn duplicate_cards_are_caught() {
    let mut snap = flop().snapshot();
    let hole = snap.players[0].hole_cards()[0];
    snap.community_cards[1] = hole;
    let found = PhaseConsistency.check(&snap);
    assert!(found
        .iter()
        .any(|v| v.context["card"] == hole.to_string().as_str()));
}

#[test]
fn active_player_must_be_able_to_act() {
    let mut t = flop();
    t.act(1, Action::Fold).unwrap();
    let mut snap = t.snapshot();
    snap.active_player = Some(1);
    let found = PhaseConsistency.check(&snap);
    assert!(found.iter().any(|v| v.description.contains("cannot act")));

    snap.active_player = None;
    assert!(!PhaseConsistency.check(&snap).is_empty());
}

#[test]
fn checker_bundles_every_check() {
    let t = preflop();
    let mut snap: TableSnapshot = t.snapshot();
    snap.pot_total += 5;
    snap.current_bet = 0;
    let report = t.checker().check(&snap);
    assert!(report.has_critical());
    assert!(report.of_kind(InvariantKind::ChipConservation).count() >= 1);
    assert!(report.of_kind(InvariantKind::BettingRules).count() >= 1);
    assert_eq!(report.of_kind(InvariantKind::PhaseConsistency).count(), 0);
}

#[test]
fn violations_serialize_for_logs() {
    let mut snap = preflop().snapshot();
    snap.current_bet = 9;
    let found = BettingRules.check(&snap);
    let json = serde_json::to_value(&found[0]).unwrap();
    assert_eq!(json["kind"], "BettingRules");
    assert_eq!(json["severity"], "Critical");
}
