use holdem_engine::cards::{Card, Rank, Suit};
use holdem_engine::errors::{ActionError, GameError};
use holdem_engine::game::{GamePhase, GameState};
use holdem_engine::player::{Player, SeatStatus};

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

#[test]
fn new_player_is_active_only_with_chips() {
    let p = Player::new(3, 500);
    assert_eq!(p.seat_id(), 3);
    assert_eq!(p.chips(), 500);
    assert_eq!(p.status(), SeatStatus::Active);
    assert!(p.can_act() && p.in_hand());
    assert!(p.hole_cards().is_empty());
    assert_eq!(p.last_action(), None);

    let broke = Player::new(4, 0);
    assert_eq!(broke.status(), SeatStatus::Out);
    assert!(!broke.can_act() && !broke.in_hand());
}

#[test]
fn player_holds_at_most_two_cards() {
    let mut p = Player::new(0, 100);
    p.give_card(card(Rank::Ace, Suit::Spades)).unwrap();
    p.give_card(card(Rank::King, Suit::Spades)).unwrap();
    assert_eq!(
        p.hole_cards(),
        &[card(Rank::Ace, Suit::Spades), card(Rank::King, Suit::Spades)]
    );
    assert!(matches!(
        p.give_card(card(Rank::Two, Suit::Clubs)),
        Err(GameError::InvalidCard(_))
    ));
}

#[test]
fn betting_moves_chips_and_cannot_overbet() {
    let mut p = Player::new(0, 100);
    assert_eq!(p.bet(30).unwrap(), 30);
    assert_eq!(p.chips(), 70);
    assert_eq!(p.current_bet(), 30);
    assert_eq!(p.total_bet_this_hand(), 30);
    assert_eq!(p.commitment(), 100);
    assert_eq!(p.to_call(50), 20);
    assert_eq!(p.to_call(10), 0);

    let err = p.bet(71).unwrap_err();
    assert_eq!(
        err,
        GameError::InsufficientChips {
            seat: 0,
            required: 71,
            available: 70
        }
    );
    assert_eq!(p.chips(), 70, "failed bet moves nothing");

    p.bet(70).unwrap();
    assert_eq!(p.status(), SeatStatus::AllIn);
    assert!(p.in_hand() && !p.can_act());
}

#[test]
fn folding_needs_an_active_player() {
    let mut p = Player::new(0, 100);
    p.fold().unwrap();
    assert_eq!(p.status(), SeatStatus::Folded);
    assert!(!p.in_hand());
    assert_eq!(
        p.fold().unwrap_err(),
        GameError::InvalidAction(ActionError::CannotAct {
            seat: 0,
            status: SeatStatus::Folded
        })
    );
}

#[test]
fn reset_keeps_chips_and_revives_funded_players() {
    let mut p = Player::new(0, 100);
    p.give_card(card(Rank::Two, Suit::Hearts)).unwrap();
    p.bet(100).unwrap();
    assert_eq!(p.status(), SeatStatus::AllIn);

    p.reset_for_new_hand();
    assert_eq!(p.status(), SeatStatus::Out);
    assert_eq!(p.total_bet_this_hand(), 0);
    assert!(p.hole_cards().is_empty());

    p.add_chips(40);
    assert_eq!(p.status(), SeatStatus::Active);
    p.reset_for_new_hand();
    assert_eq!(p.chips(), 40);
    assert_eq!(p.status(), SeatStatus::Active);
}

#[test]
fn state_keeps_seats_sorted_and_walks_clockwise() {
    let players = vec![Player::new(7, 100), Player::new(2, 100), Player::new(4, 0)];
    let state = GameState::with_players(players, 7, 1, 2);

    let seats: Vec<usize> = state.players().iter().map(|p| p.seat_id()).collect();
    assert_eq!(seats, vec![2, 4, 7]);
    assert_eq!(state.phase(), GamePhase::Init);
    assert_eq!(state.seats_from_dealer(), vec![2, 4, 7]);
    assert_eq!(state.next_seat_after(7, |p| p.chips() > 0), Some(2));
    assert_eq!(state.next_seat_after(2, |p| p.chips() > 0), Some(7));
    assert_eq!(state.next_seat_after(2, |_| false), None);
    assert_eq!(state.total_chips(), 200);
    assert_eq!(state.pot_total(), 0);
}

#[test]
fn heads_up_blinds_skip_the_busted_seat() {
    let players = vec![Player::new(0, 100), Player::new(1, 0), Player::new(2, 100)];
    let mut state = GameState::with_players(players, 2, 5, 10);
    state.set_blinds().unwrap();

    assert_eq!(state.small_blind_seat(), Some(2), "heads-up dealer posts the small blind");
    assert_eq!(state.big_blind_seat(), Some(0));
    assert_eq!(state.current_bet(), 10);
    assert_eq!(state.pot_total(), 15);
    assert_eq!(state.contributions().into_iter().collect::<Vec<_>>(), vec![(0, 10), (2, 5)]);
    assert!(state.folded_seats().is_empty());
}

#[test]
fn blinds_need_two_funded_players() {
    let players = vec![Player::new(0, 100), Player::new(1, 0)];
    let mut state = GameState::with_players(players, 0, 1, 2);
    assert_eq!(
        state.set_blinds().unwrap_err(),
        GameError::NotEnoughPlayers { min: 2, found: 1 }
    );
}
