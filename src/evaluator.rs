//! 5-card hand ranking.
//!
//! `evaluate_five` is the core contract: exactly five cards in, a category
//! plus ordered tiebreak ranks out, with a packed `HandValue` that sorts
//! identically to lexicographic (category, kickers) comparison.

use crate::cards::{Card, Rank};
use crate::hand::{validate_no_overlap, Board, HandError, HoleCards};
use core::cmp::Ordering;

/// Hand categories from weakest to strongest. The discriminant is the
/// category rank used as the primary comparison key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// Compact, comparable hand strength. Higher is better.
///
/// Layout (most significant first): category in the high byte, then five
/// 8-bit tiebreak slots. For grouped categories the slots are the five card
/// ranks in grouped-first order; for straights only the top rank is encoded
/// (the wheel's top is the Five); a royal flush carries no tiebreaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

impl HandValue {
    pub const fn raw(self) -> u64 {
        self.0
    }

    fn pack(category: Category, slots: [u8; 5]) -> Self {
        let mut v = (category as u64) << 40;
        for (i, s) in slots.iter().enumerate() {
            v |= (*s as u64) << (32 - 8 * i as u32);
        }
        HandValue(v)
    }
}

/// Result of evaluating exactly five cards.
///
/// `kickers` lists all five ranks in tiebreak order (grouped ranks first,
/// then remaining ranks descending); for the wheel the Ace appears last,
/// playing low.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Evaluation {
    pub category: Category,
    pub kickers: [Rank; 5],
    value: HandValue,
}

impl Evaluation {
    /// The packed comparable value, suitable for caching and sorting.
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    /// Caller contract violation: the 5-card evaluator was handed a
    /// different number of cards.
    #[error("expected exactly 5 cards, got {0}")]
    CardCount(usize),
    #[error("need at least 5 cards to pick a best hand, got {0}")]
    NotEnoughCards(usize),
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
}

/// Evaluate exactly five cards.
///
/// ```
/// use dealer_rs::cards::parse_cards;
/// use dealer_rs::evaluator::{evaluate_five, Category};
///
/// let cards = parse_cards("Ah, 2s, 3d, 4c, 5h").unwrap();
/// let eval = evaluate_five(&cards).unwrap();
/// assert_eq!(eval.category, Category::Straight);
/// ```
pub fn evaluate_five(cards: &[Card]) -> Result<Evaluation, EvalError> {
    let five: [Card; 5] =
        cards.try_into().map_err(|_| EvalError::CardCount(cards.len()))?;
    Ok(rank_five(&five))
}

fn rank_five(cards: &[Card; 5]) -> Evaluation {
    // Ranks descending; grouped categories re-order below.
    let mut ranks = [cards[0].rank(), cards[1].rank(), cards[2].rank(), cards[3].rank(), cards[4].rank()];
    ranks.sort_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());

    // Multiset of rank orders, ascending, for straight detection.
    let mut orders: Vec<u8> = ranks.iter().map(|r| r.order()).collect();
    orders.sort_unstable();
    orders.dedup();
    let is_wheel = orders == [0, 1, 2, 3, 12];
    let is_run = orders.len() == 5 && orders.windows(2).all(|w| w[1] == w[0] + 1);
    let is_straight = is_wheel || is_run;

    if is_straight {
        let (top, kickers) = if is_wheel {
            // Ace plays low: its comparison value is the Five's.
            (Rank::Five, [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace])
        } else {
            (ranks[0], ranks)
        };
        if is_flush {
            if top == Rank::Ace {
                return Evaluation {
                    category: Category::RoyalFlush,
                    kickers,
                    value: HandValue::pack(Category::RoyalFlush, [0; 5]),
                };
            }
            return Evaluation {
                category: Category::StraightFlush,
                kickers,
                value: HandValue::pack(Category::StraightFlush, [top.value(), 0, 0, 0, 0]),
            };
        }
        return Evaluation {
            category: Category::Straight,
            kickers,
            value: HandValue::pack(Category::Straight, [top.value(), 0, 0, 0, 0]),
        };
    }

    // Group ranks by multiplicity: (rank, count) sorted count-desc, rank-desc.
    let mut groups: Vec<(Rank, u8)> = Vec::with_capacity(5);
    for &r in ranks.iter() {
        match groups.iter_mut().find(|(g, _)| *g == r) {
            Some((_, c)) => *c += 1,
            None => groups.push((r, 1)),
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    // Lay the five ranks out grouped-first; this is both the kicker order
    // and the packed tiebreak.
    let mut grouped = [Rank::Two; 5];
    let mut i = 0;
    for &(r, c) in &groups {
        for _ in 0..c {
            grouped[i] = r;
            i += 1;
        }
    }
    let slots = grouped.map(Rank::value);

    let counts: Vec<u8> = groups.iter().map(|&(_, c)| c).collect();
    let category = if counts[0] == 4 {
        Category::FourOfAKind
    } else if counts[0] == 3 && counts.get(1) == Some(&2) {
        Category::FullHouse
    } else if is_flush {
        Category::Flush
    } else if counts[0] == 3 {
        Category::ThreeOfAKind
    } else if counts[0] == 2 && counts.get(1) == Some(&2) {
        Category::TwoPair
    } else if counts[0] == 2 {
        Category::Pair
    } else {
        Category::HighCard
    };

    Evaluation { category, kickers: grouped, value: HandValue::pack(category, slots) }
}

/// Pick the best five-card hand out of `n >= 5` cards. The caller decides
/// which cards participate; this function only searches combinations.
pub fn best_five(cards: &[Card]) -> Result<Evaluation, EvalError> {
    if cards.len() < 5 {
        return Err(EvalError::NotEnoughCards(cards.len()));
    }
    let n = cards.len();
    let mut idx = [0usize, 1, 2, 3, 4];
    let mut best: Option<Evaluation> = None;
    loop {
        let hand = [cards[idx[0]], cards[idx[1]], cards[idx[2]], cards[idx[3]], cards[idx[4]]];
        let eval = rank_five(&hand);
        if best.map_or(true, |b| eval > b) {
            best = Some(eval);
        }
        // Next 5-combination in lexicographic index order.
        let mut pos = 5;
        while pos > 0 {
            pos -= 1;
            if idx[pos] < n - (5 - pos) {
                idx[pos] += 1;
                for j in pos + 1..5 {
                    idx[j] = idx[j - 1] + 1;
                }
                break;
            }
            if pos == 0 {
                // best is Some: the first combination always evaluated.
                return Ok(best.unwrap_or_else(|| rank_five(&hand)));
            }
        }
    }
}

/// Evaluate a Hold'em hand: two hole cards against a complete 5-card board.
///
/// ```
/// use dealer_rs::cards::parse_cards;
/// use dealer_rs::evaluator::{evaluate_holdem, Category};
/// use dealer_rs::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As, Ah".parse().unwrap();
/// let board: Board = "Kc, Qd, Jh, 3s, 2c".parse().unwrap();
/// let eval = evaluate_holdem(&hole, &board).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_no_overlap(hole, board)?;
    if board.len() < 5 {
        return Err(EvalError::NotEnoughCards(board.len() + 2));
    }
    let mut seven = Vec::with_capacity(7);
    seven.extend_from_slice(&hole.as_array());
    seven.extend_from_slice(board.as_slice());
    best_five(&seven)
}

/// Compare two Hold'em hands on a shared board.
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let va = evaluate_holdem(a, board)?;
    let vb = evaluate_holdem(b, board)?;
    Ok(va.cmp(&vb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> Evaluation {
        evaluate_five(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn wrong_card_count_is_rejected() {
        let four = parse_cards("As, Ks, Qs, Js").unwrap();
        assert!(matches!(evaluate_five(&four), Err(EvalError::CardCount(4))));
        let six = parse_cards("As, Ks, Qs, Js, 10s, 9s").unwrap();
        assert!(matches!(evaluate_five(&six), Err(EvalError::CardCount(6))));
    }

    #[test]
    fn all_ten_categories_detected() {
        assert_eq!(eval("As, Ks, Qs, Js, 10s").category, Category::RoyalFlush);
        assert_eq!(eval("9s, 8s, 7s, 6s, 5s").category, Category::StraightFlush);
        assert_eq!(eval("Kc, Kd, Kh, Ks, 2s").category, Category::FourOfAKind);
        assert_eq!(eval("10c, 10d, 10h, 2s, 2h").category, Category::FullHouse);
        assert_eq!(eval("Ah, 9h, 7h, 3h, 2h").category, Category::Flush);
        assert_eq!(eval("9c, 8d, 7h, 6s, 5c").category, Category::Straight);
        assert_eq!(eval("Qc, Qd, Qh, 9s, 2c").category, Category::ThreeOfAKind);
        assert_eq!(eval("Jc, Jd, 9c, 9h, 2s").category, Category::TwoPair);
        assert_eq!(eval("Ah, Ad, 10s, 9c, 2d").category, Category::Pair);
        assert_eq!(eval("Ah, Kd, 7s, 5c, 2d").category, Category::HighCard);
    }

    #[test]
    fn wheel_is_a_straight_below_six_high() {
        let wheel = eval("Ah, 2s, 3d, 4c, 5h");
        assert_eq!(wheel.category, Category::Straight);
        assert_eq!(wheel.kickers[0], Rank::Five);

        let six_high = eval("2c, 3h, 4s, 5d, 6c");
        assert!(wheel < six_high);

        // ...but above any no-pair hand of the same cards' calibre.
        let ace_high = eval("Ah, Kd, 7s, 5c, 2d");
        assert!(wheel > ace_high);
    }

    #[test]
    fn steel_wheel_is_straight_flush_not_royal() {
        let e = eval("Ah, 2h, 3h, 4h, 5h");
        assert_eq!(e.category, Category::StraightFlush);
        let royal = eval("As, Ks, Qs, Js, 10s");
        assert!(e < royal);
    }

    #[test]
    fn two_pair_kicker_order_is_high_pair_low_pair_kicker() {
        let e = eval("Jc, 9h, Jd, Ad, 9c");
        assert_eq!(
            e.kickers,
            [Rank::Jack, Rank::Jack, Rank::Nine, Rank::Nine, Rank::Ace]
        );
    }

    #[test]
    fn kickers_break_ties_within_category() {
        let aces_king = eval("Ah, Ad, Ks, 9c, 2d");
        let aces_queen = eval("As, Ac, Qs, 9h, 2h");
        assert!(aces_king > aces_queen);

        let exact_tie = eval("Ac, Ah, Kd, 9s, 2c");
        assert_eq!(aces_king, exact_tie);
    }

    #[test]
    fn re_evaluation_is_deterministic() {
        let cards = parse_cards("Qc, 8d, Qh, 8s, 2c").unwrap();
        let a = evaluate_five(&cards).unwrap();
        let b = evaluate_five(&cards).unwrap();
        assert_eq!(a.category, b.category);
        assert_eq!(a.value(), b.value());
        assert_eq!(a.kickers, b.kickers);
    }

    #[test]
    fn best_five_finds_hidden_straight_in_seven() {
        let seven = parse_cards("2c, Ah, 9d, 8s, 7h, 6c, 5d").unwrap();
        let e = best_five(&seven).unwrap();
        assert_eq!(e.category, Category::Straight);
        assert_eq!(e.kickers[0], Rank::Nine);
    }

    #[test]
    fn holdem_requires_full_board() {
        let hole: HoleCards = "As, Ks".parse().unwrap();
        let board: Board = "2c".parse().unwrap();
        assert!(matches!(evaluate_holdem(&hole, &board), Err(EvalError::NotEnoughCards(_))));
    }

    #[test]
    fn compare_holdem_orders_pairs() {
        let board: Board = "Qc, Jd, 9h, 3s, 2c".parse().unwrap();
        let a: HoleCards = "As, Ah".parse().unwrap();
        let b: HoleCards = "Ks, Kh".parse().unwrap();
        assert_eq!(compare_holdem(&a, &b, &board).unwrap(), Ordering::Greater);
    }
}
