use crate::cards::Card;
use crate::hand::HoleCards;

/// Hand-lifetime status of a seated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerStatus {
    /// Still in the hand and may act.
    Active,
    /// Folded; no longer eligible to win any pot.
    Folded,
    /// Entire stack wagered; cannot act but still contests pots.
    AllIn,
    /// Not participating this hand (busted or sitting out).
    OutOfHand,
}

/// Betting-round-lifetime status, reset every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundStatus {
    WaitingForAction,
    Acted,
    SittingOut,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerError {
    #[error("seat number must be 0-7, got {0}")]
    SeatOutOfRange(usize),
    #[error("starting stack must be positive")]
    EmptyStartingStack,
    #[error("bet {amount} exceeds stack {stack}")]
    BetExceedsStack { amount: u64, stack: u64 },
}

/// Per-seat mutable record. Created once per seating and reset, not
/// recreated, at the start of each hand.
///
/// Chip conservation holds per player at all times within a hand:
/// `stack + total_contributed == starting stack at hand start`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PlayerState {
    pub(crate) player_id: String,
    pub(crate) seat_number: usize,
    pub(crate) stack: u64,
    pub(crate) current_bet: u64,
    pub(crate) total_contributed: u64,
    pub(crate) hole_cards: Option<HoleCards>,
    pub(crate) status: PlayerStatus,
    pub(crate) round_status: RoundStatus,
}

impl PlayerState {
    pub fn new(
        player_id: impl Into<String>,
        seat_number: usize,
        starting_stack: u64,
    ) -> Result<Self, PlayerError> {
        if seat_number > 7 {
            return Err(PlayerError::SeatOutOfRange(seat_number));
        }
        if starting_stack == 0 {
            return Err(PlayerError::EmptyStartingStack);
        }
        Ok(Self {
            player_id: player_id.into(),
            seat_number,
            stack: starting_stack,
            current_bet: 0,
            total_contributed: 0,
            hole_cards: None,
            status: PlayerStatus::Active,
            round_status: RoundStatus::SittingOut,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn seat_number(&self) -> usize {
        self.seat_number
    }

    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Chips bet so far in the current betting round.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    /// Chips contributed across all rounds of the current hand.
    pub fn total_contributed(&self) -> u64 {
        self.total_contributed
    }

    pub fn hole_cards(&self) -> Option<HoleCards> {
        self.hole_cards
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn round_status(&self) -> RoundStatus {
        self.round_status
    }

    /// Still contesting the hand (may yet win a pot).
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Able to take a betting action right now.
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Active)
    }

    /// Move chips from the stack into the current round's bet.
    pub(crate) fn post_bet(&mut self, amount: u64) -> Result<(), PlayerError> {
        if amount > self.stack {
            return Err(PlayerError::BetExceedsStack { amount, stack: self.stack });
        }
        self.stack -= amount;
        self.current_bet += amount;
        self.total_contributed += amount;
        Ok(())
    }

    pub(crate) fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
        self.round_status = RoundStatus::SittingOut;
    }

    pub(crate) fn go_all_in(&mut self) {
        self.status = PlayerStatus::AllIn;
        self.round_status = RoundStatus::SittingOut;
    }

    pub(crate) fn deal_hole_cards(&mut self, a: Card, b: Card) -> Result<(), crate::hand::HandError> {
        self.hole_cards = Some(HoleCards::try_new(a, b)?);
        Ok(())
    }

    /// Clear round-scoped state at the start of a betting round. Players who
    /// can still act wait for their turn; everyone else sits the round out.
    pub(crate) fn begin_round(&mut self) {
        self.current_bet = 0;
        self.round_status = if self.can_act() {
            RoundStatus::WaitingForAction
        } else {
            RoundStatus::SittingOut
        };
    }

    /// Reset for a fresh hand: bets, round status, and hole cards cleared;
    /// stack preserved. Active again only with chips behind.
    pub(crate) fn reset_for_new_hand(&mut self) {
        self.current_bet = 0;
        self.total_contributed = 0;
        self.hole_cards = None;
        self.round_status = RoundStatus::SittingOut;
        self.status =
            if self.stack > 0 { PlayerStatus::Active } else { PlayerStatus::OutOfHand };
    }
}
