use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate hole cards")]
    DuplicateHoleCards,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("too many community cards: {0}")]
    TooManyCommunityCards(usize),
    #[error("duplicate community cards")]
    DuplicateCommunityCards,
    #[error("hole cards overlap with community cards")]
    Overlap,
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private hole cards. Guaranteed distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(cards: &[Card]) -> Result<Self, HandError> {
        if cards.len() != 2 {
            return Err(HandError::HoleCount(cards.len()));
        }
        Self::try_new(cards[0], cards[1])
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards shared by the table. Holds 0..=5 cards as the flop, turn,
/// and river are revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(5) }
    }

    pub fn try_from_cards(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > 5 {
            return Err(HandError::TooManyCommunityCards(cards.len()));
        }
        let distinct: HashSet<Card> = cards.iter().copied().collect();
        if distinct.len() != cards.len() {
            return Err(HandError::DuplicateCommunityCards);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Reveal one more community card. Errors past five.
    pub fn reveal(&mut self, card: Card) -> Result<(), HandError> {
        if self.cards.len() >= 5 {
            return Err(HandError::TooManyCommunityCards(self.cards.len() + 1));
        }
        if self.cards.contains(&card) {
            return Err(HandError::DuplicateCommunityCards);
        }
        self.cards.push(card);
        Ok(())
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_from_cards(cards)
    }
}

/// Check that hole cards and board together contain no repeated card.
pub fn validate_no_overlap(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    let seen: HashSet<Card> = board.as_slice().iter().copied().collect();
    if seen.len() != board.len() {
        return Err(HandError::DuplicateCommunityCards);
    }
    if seen.contains(&hole.first()) || seen.contains(&hole.second()) {
        return Err(HandError::Overlap);
    }
    Ok(())
}
