//! Showdown payouts: ties, odd chips, the wheel, and playing the board.

use dealer_rs::cards::parse_cards;
use dealer_rs::deck::Deck;
use dealer_rs::engine::DealerEngine;
use dealer_rs::player::PlayerState;
use dealer_rs::table::GamePhase;
use dealer_rs::validator::ActionType;

fn stacked_deck(cards: &str) -> Deck {
    let mut cards = parse_cards(cards).unwrap();
    let mut rest = Deck::standard();
    while let Some(c) = rest.draw() {
        if !cards.contains(&c) {
            cards.push(c);
        }
    }
    Deck::stacked(cards)
}

fn engine(stacks: &[u64]) -> DealerEngine {
    let players = stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| PlayerState::new(format!("p{i}"), i, s).unwrap())
        .collect();
    let mut e = DealerEngine::new("showdown", players, 5, 10, 0).unwrap();
    e.start_game().unwrap();
    e
}

fn check_down(e: &mut DealerEngine) {
    while e.phase() != GamePhase::HandComplete {
        let req = e.action_request().unwrap();
        let (action, amount) = if req.current_bet_to_call == 0 {
            (ActionType::Check, 0)
        } else if req.current_bet_to_call >= req.your_stack {
            (ActionType::AllIn, req.your_stack)
        } else {
            (ActionType::Call, req.current_bet_to_call)
        };
        e.process_action(&req.player_id, action, amount).unwrap();
    }
}

#[test]
fn split_pot_gives_the_odd_chip_to_the_lowest_seat() {
    let mut e = engine(&[151, 150]);
    // Both hands play the broadway board and tie; pot is 301.
    let deck = stacked_deck("2c, 3c, 2d, 3d, 10s, Jh, Qd, Kc, Ah");
    e.start_hand(deck).unwrap();
    e.process_action("p1", ActionType::AllIn, 145).unwrap();
    e.process_action("p0", ActionType::AllIn, 141).unwrap();

    assert_eq!(e.phase(), GamePhase::HandComplete);
    // Main pot of 300 splits 150/150; p0's one uncalled chip comes back.
    let payouts = e.last_payouts().unwrap();
    assert_eq!(payouts.get("p0"), Some(&151));
    assert_eq!(payouts.get("p1"), Some(&150));
}

#[test]
fn wheel_wins_against_two_pair() {
    let mut e = engine(&[100, 100]);
    // p0: A2 makes the five-high straight; p1: K9 makes two pair.
    let deck = stacked_deck("Ah, 2s, Kd, 9c, 3c, 4h, 5s, Kh, 9d");
    e.start_hand(deck).unwrap();
    check_down(&mut e);

    assert_eq!(e.last_payouts().unwrap().get("p0"), Some(&20));
}

#[test]
fn steel_wheel_loses_to_a_higher_straight_flush() {
    let mut e = engine(&[100, 100]);
    // p0: steel wheel (A-5 in hearts); p1: six-high straight flush.
    let deck = stacked_deck("Ah, 8s, 6h, 8d, 3h, 4h, 5h, 2h, Kd");
    e.start_hand(deck).unwrap();
    check_down(&mut e);

    assert_eq!(e.last_payouts().unwrap().get("p1"), Some(&20));
}

#[test]
fn everyone_playing_the_board_splits_evenly() {
    let mut e = engine(&[100, 100, 100, 100]);
    // Board is a royal flush; nobody's hole cards improve on it.
    let deck = stacked_deck("2c, 3c, 2d, 3d, 2h, 3h, 2s, 3s, 10c, Jc, Qc, Kc, Ac");
    e.start_hand(deck).unwrap();
    check_down(&mut e);

    let payouts = e.last_payouts().unwrap();
    assert_eq!(payouts.len(), 4);
    for id in ["p0", "p1", "p2", "p3"] {
        assert_eq!(payouts.get(id), Some(&10), "{id} gets a quarter of the pot");
    }
}

#[test]
fn kicker_decides_between_equal_pairs() {
    let mut e = engine(&[100, 100]);
    // Both pair the board aces; p0's king kicker beats p1's queen.
    let deck = stacked_deck("Ks, 4d, Qs, 4c, Ah, Ad, 8c, 9d, 2s");
    e.start_hand(deck).unwrap();
    check_down(&mut e);

    assert_eq!(e.last_payouts().unwrap().get("p0"), Some(&20));
}
