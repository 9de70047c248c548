use holdem_engine::config::TableConfig;
use holdem_engine::deck::CardSource;
use holdem_engine::errors::{ActionError, GameError};
use holdem_engine::game::GamePhase;
use holdem_engine::player::{Action, ActionType, Chips};
use holdem_engine::rules::ActionValidator;
use holdem_engine::table::Table;

/// Blinds 5/10 with the button on seat 0.
fn table(stacks: &[Chips]) -> Table {
    let config = TableConfig {
        small_blind: 5,
        big_blind: 10,
        seed: Some(11),
        ..TableConfig::default()
    };
    let mut t = Table::new(config).unwrap();
    for (seat, &chips) in stacks.iter().enumerate() {
        t.seat_player_with_chips(seat, chips).unwrap();
    }
    t.start_hand().unwrap();
    t
}

#[test]
fn big_blind_keeps_the_option_after_limps() {
    let mut t = table(&[200, 200, 200]);
    t.act(0, Action::Call).unwrap();
    t.act(1, Action::Call).unwrap();

    // Every bet matches but the big blind has not acted yet.
    assert!(!t.is_betting_round_complete());
    assert_eq!(t.current_player(), Some(2));
    assert!(t.legal_actions(2).contains(&ActionType::Check));
    assert!(t.legal_actions(2).contains(&ActionType::Raise));

    t.act(2, Action::Raise(30)).unwrap();
    assert_eq!(t.phase(), GamePhase::PreFlop);
    assert_eq!(t.current_player(), Some(0));
    assert_eq!(t.state().last_raiser(), Some(2));
}

#[test]
fn heads_up_big_blind_gets_the_option() {
    let mut t = table(&[200, 200]);
    t.act(0, Action::Call).unwrap();
    assert_eq!(t.phase(), GamePhase::PreFlop);
    assert_eq!(t.current_player(), Some(1));
    t.act(1, Action::Check).unwrap();
    assert_eq!(t.phase(), GamePhase::Flop);
}

#[test]
fn a_raise_sends_the_action_back_around() {
    let mut t = table(&[200, 200, 200, 200]);
    // Seat 3 opens, seat 0 re-raises, the blinds follow.
    t.act(3, Action::Raise(30)).unwrap();
    t.act(0, Action::Raise(60)).unwrap();
    t.act(1, Action::Fold).unwrap();
    t.act(2, Action::Call).unwrap();

    assert!(!t.is_betting_round_complete());
    assert_eq!(t.current_player(), Some(3));
    assert!(!t.state().player(3).unwrap().acted_this_round());

    t.act(3, Action::Call).unwrap();
    assert_eq!(t.phase(), GamePhase::Flop);
    assert_eq!(t.state().pot().total(), 5 + 60 * 3);
}

#[test]
fn short_all_in_does_not_reopen_the_betting() {
    let mut t = table(&[200, 200, 35]);
    t.act(0, Action::Raise(30)).unwrap();
    t.act(1, Action::Call).unwrap();
    // Big blind shoves for 35, five more than the bet.
    let v = t.act(2, Action::AllIn).unwrap();
    assert_eq!(v.actual_amount(), 25);

    let s = t.state();
    assert_eq!(s.current_bet(), 35);
    assert_eq!(s.last_raiser(), Some(0));
    assert_eq!(s.last_raise_increment(), 20);
    assert!(s.player(0).unwrap().acted_this_round());
    assert_eq!(t.current_player(), Some(0));

    // Seat 0 already acted and only faces the short shove: no re-raise.
    assert_eq!(
        t.legal_actions(0),
        vec![ActionType::Fold, ActionType::Call, ActionType::AllIn]
    );
    assert!(matches!(
        t.validate(0, Action::Raise(100)),
        Err(GameError::InvalidAction(ActionError::ActionNotReopened { seat: 0 }))
    ));
    assert!(t.act(0, Action::Raise(100)).is_err());
    assert_eq!(t.state().player(0).unwrap().current_bet(), 30);

    t.act(0, Action::Call).unwrap();
    t.act(1, Action::Call).unwrap();
    assert_eq!(t.phase(), GamePhase::Flop);
    assert_eq!(t.state().pot().total(), 105);
}

#[test]
fn full_all_in_raise_reopens_the_betting() {
    let mut t = table(&[200, 200, 60]);
    t.act(0, Action::Raise(30)).unwrap();
    t.act(1, Action::Call).unwrap();
    t.act(2, Action::AllIn).unwrap();

    let s = t.state();
    assert_eq!(s.current_bet(), 60);
    assert_eq!(s.last_raiser(), Some(2));
    assert_eq!(s.last_raise_increment(), 30);
    assert!(!s.player(0).unwrap().acted_this_round());
    assert_eq!(ActionValidator::min_raise_to(s), 90);
    assert!(t.legal_actions(0).contains(&ActionType::Raise));
    assert!(t.validate(0, Action::Raise(90)).is_ok());
}

#[test]
fn raise_is_offered_when_the_stack_exactly_reaches_the_minimum() {
    // Seat 0 holds 20 and the minimum raise pre-flop is to 20.
    let t = table(&[20, 200, 200]);
    assert_eq!(ActionValidator::min_raise_to(t.state()), 20);
    assert_eq!(
        t.legal_actions(0),
        vec![
            ActionType::Fold,
            ActionType::Call,
            ActionType::Raise,
            ActionType::AllIn
        ]
    );
    let v = t.validate(0, Action::Raise(20)).unwrap();
    assert!(v.is_converted());
    assert_eq!(v.actual_type(), ActionType::AllIn);
    assert_eq!(v.actual_amount(), 20);

    // One chip short of the minimum: raising is no longer on offer.
    let t = table(&[19, 200, 200]);
    assert!(!t.legal_actions(0).contains(&ActionType::Raise));
}

#[test]
fn round_stays_open_while_any_bet_is_unmatched() {
    let mut t = table(&[200, 200, 200]);
    let mut seen = Vec::new();
    for (seat, action) in [
        (0, Action::Raise(40)),
        (1, Action::Call),
        (2, Action::Raise(100)),
        (0, Action::Call),
    ] {
        t.execute(seat, action).unwrap();
        seen.push(t.is_betting_round_complete());
        let unmatched = t
            .state()
            .actionable_players()
            .any(|p| p.current_bet() != t.state().current_bet());
        if unmatched {
            assert!(!t.is_betting_round_complete());
        }
    }
    assert_eq!(seen, vec![false, false, false, false]);

    // Seat 1 closes the round; execute reports it but does not advance.
    assert!(!t.execute(1, Action::Call).unwrap());
    assert!(t.is_betting_round_complete());
    assert_eq!(t.phase(), GamePhase::PreFlop);
    assert_eq!(t.current_player(), None);
    assert!(matches!(
        t.validate(2, Action::Check),
        Err(GameError::InvalidAction(ActionError::RoundComplete))
    ));

    assert_eq!(t.advance().unwrap(), GamePhase::Flop);
    assert_eq!(t.state().community_cards().len(), 3);
    assert_eq!(t.current_player(), Some(1));
}

#[test]
fn advance_is_refused_while_the_round_is_open() {
    let mut t = table(&[200, 200, 200]);
    let before = t.state().clone();
    let remaining = t.deck().remaining();

    // Nobody has acted yet; the blinds must not be swept into the pot.
    assert!(matches!(
        t.advance(),
        Err(GameError::InvalidAction(ActionError::RoundOpen {
            waiting_on: Some(0)
        }))
    ));
    assert_eq!(t.state(), &before);
    assert_eq!(t.deck().remaining(), remaining);
    assert_eq!(t.state().pot().total(), 0);
    assert_eq!(t.state().pot_total(), 15);

    t.execute(0, Action::Call).unwrap();
    t.execute(1, Action::Call).unwrap();
    assert!(matches!(
        t.advance(),
        Err(GameError::InvalidAction(ActionError::RoundOpen {
            waiting_on: Some(2)
        }))
    ));
    assert_eq!(t.phase(), GamePhase::PreFlop);
    assert_eq!(t.current_player(), Some(2), "the big blind keeps the option");

    assert!(!t.execute(2, Action::Check).unwrap());
    assert_eq!(t.advance().unwrap(), GamePhase::Flop);
    assert_eq!(t.state().pot().total(), 30);
}

#[test]
fn checks_around_end_the_street() {
    let mut t = table(&[200, 200, 200]);
    t.act(0, Action::Call).unwrap();
    t.act(1, Action::Call).unwrap();
    t.act(2, Action::Check).unwrap();
    assert_eq!(t.phase(), GamePhase::Flop);

    t.act(1, Action::Check).unwrap();
    t.act(2, Action::Check).unwrap();
    assert_eq!(t.phase(), GamePhase::Flop);
    t.act(0, Action::Check).unwrap();
    assert_eq!(t.phase(), GamePhase::Turn);
    assert_eq!(t.state().street_action_count(), 0);
    assert_eq!(t.state().current_bet(), 0);
}

#[test]
fn a_bet_after_checks_needs_an_answer_from_everyone() {
    let mut t = table(&[200, 200, 200]);
    t.act(0, Action::Call).unwrap();
    t.act(1, Action::Call).unwrap();
    t.act(2, Action::Check).unwrap();

    t.act(1, Action::Check).unwrap();
    t.act(2, Action::Bet(20)).unwrap();
    assert_eq!(t.current_player(), Some(0));
    t.act(0, Action::Call).unwrap();
    assert_eq!(t.current_player(), Some(1), "the earlier check must answer the bet");
    t.act(1, Action::Fold).unwrap();
    assert_eq!(t.phase(), GamePhase::Turn);
}
