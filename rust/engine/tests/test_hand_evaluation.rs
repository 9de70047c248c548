use holdem_engine::cards::Card;
use holdem_engine::hand::{evaluate_cards, Category, HandEvaluator, HandStrength, StandardEvaluator};

fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace().map(|c| c.parse().unwrap()).collect()
}

fn eval(s: &str) -> HandStrength {
    evaluate_cards(&cards(s))
}

#[test]
fn detects_royal_flush() {
    let hs = eval("Th Jh Qh Kh Ah 2c 3d");
    assert_eq!(hs.category, Category::StraightFlush);
    assert_eq!(hs.kickers[0], 14);
}

#[test]
fn detects_every_category() {
    let cases = [
        ("9s 9h 9d 9c Kd 2h 3c", Category::FourOfAKind),
        ("Ks Kh Kd Qc Qd 2h 3s", Category::FullHouse),
        ("2h 7h Jh Qh 9h 3c 4d", Category::Flush),
        ("5c 6h 7c 8h 9d 2s 3c", Category::Straight),
        ("Qc Qh Qd 2s 3c 4h 9d", Category::ThreeOfAKind),
        ("Jc Jh 4d 4s Ac 2h 8d", Category::TwoPair),
        ("Tc Th 4d 7s Ac 2h 8d", Category::OnePair),
        ("Kc Th 4d 7s Ac 2h 8d", Category::HighCard),
    ];
    for (hand, expected) in cases {
        assert_eq!(eval(hand).category, expected, "{}", hand);
    }
}

#[test]
fn category_ordering_is_correct() {
    let quads = eval("Ac Ad Ah As Kc Qd 2h");
    let full_house = eval("Kc Kd Kh Qc Qd 2h 3s");
    let straight = eval("5c 6h 7c 8h 9d 2s 3c");
    let trips = eval("Qc Qh Qd 2s 3c 4h 5d");
    assert!(quads > full_house);
    assert!(full_house > straight);
    assert!(straight > trips);
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = eval("Ac 2d 3h 4s 5c Kd 9h");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.kickers[0], 5);
    let six_high = eval("2d 3h 4s 5c 6d Kd 9h");
    assert!(six_high > wheel);
}

#[test]
fn two_trips_make_a_full_house_with_the_higher_set() {
    let hs = eval("8c 8d 8h 3c 3d 3h Ks");
    assert_eq!(hs.category, Category::FullHouse);
    assert_eq!(&hs.kickers[..2], &[8, 3]);
}

#[test]
fn three_pairs_play_the_best_two_and_best_kicker() {
    let hs = eval("Ac Ad 9h 9c 4d 4h 2s");
    assert_eq!(hs.category, Category::TwoPair);
    assert_eq!(&hs.kickers[..3], &[14, 9, 4]);
}

#[test]
fn kickers_break_ties_and_equal_hands_tie() {
    let a = eval("Ac Ad Kh 9c 4d 3h 2s");
    let b = eval("As Ah Qh 9d 4c 3s 2c");
    assert!(a > b);

    // Both play the board.
    let board = cards("Ac Kd Qh Js Tc");
    let e = StandardEvaluator;
    let p1 = e.evaluate(&cards("2c 3d"), &board);
    let p2 = e.evaluate(&cards("4h 5s"), &board);
    assert_eq!(p1, p2);
}

#[test]
fn flush_uses_top_five_of_suit() {
    let hs = eval("2h 7h Jh Qh 9h 3h Ac");
    assert_eq!(hs.category, Category::Flush);
    assert_eq!(hs.kickers, [12, 11, 9, 7, 3]);
}

#[test]
fn evaluates_five_and_six_card_hands() {
    assert_eq!(eval("2c 2d 5h 9s Kc").category, Category::OnePair);
    assert_eq!(eval("2c 3d 4h 5s 6c Kd").category, Category::Straight);
}
