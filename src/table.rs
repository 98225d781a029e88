use crate::hand::Board;
use crate::player::PlayerState;

/// Phases of a hand, strictly forward. `HandComplete` loops back to
/// `BlindsPosted` when the next hand starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GamePhase {
    WaitingForPlayers,
    GameStarted,
    BlindsPosted,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    PotDistribution,
    HandComplete,
}

impl GamePhase {
    /// True for the four phases in which betting actions are accepted.
    pub const fn is_betting_round(self) -> bool {
        matches!(self, GamePhase::PreFlop | GamePhase::Flop | GamePhase::Turn | GamePhase::River)
    }

    /// External label used in snapshots and exports.
    pub const fn label(self) -> &'static str {
        match self {
            GamePhase::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            GamePhase::GameStarted => "GAME_STARTED",
            GamePhase::BlindsPosted => "BLINDS_POSTED",
            GamePhase::PreFlop => "PRE_FLOP",
            GamePhase::Flop => "FLOP",
            GamePhase::Turn => "TURN",
            GamePhase::River => "RIVER",
            GamePhase::Showdown => "SHOWDOWN",
            GamePhase::PotDistribution => "POT_DISTRIBUTION",
            GamePhase::HandComplete => "HAND_COMPLETE",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error("table requires 2-8 players, got {0}")]
    PlayerCount(usize),
    #[error("duplicate seat number {0}")]
    DuplicateSeat(usize),
    #[error("duplicate player id '{0}'")]
    DuplicatePlayerId(String),
    #[error("blinds must satisfy big > small > 0, got small={small} big={big}")]
    InvalidBlinds { small: u64, big: u64 },
    #[error("dealer button {button} out of range for {players} players")]
    ButtonOutOfRange { button: usize, players: usize },
}

/// Authoritative mutable root of a single table: player records, phase,
/// button, community cards, and blind structure. Exclusively owned by one
/// `DealerEngine`; pots are tracked by the engine's `PotManager`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TableState {
    pub(crate) game_id: String,
    pub(crate) players: Vec<PlayerState>,
    pub(crate) phase: GamePhase,
    pub(crate) action_seat: Option<usize>,
    pub(crate) community_cards: Board,
    pub(crate) dealer_button: usize,
    pub(crate) small_blind: u64,
    pub(crate) big_blind: u64,
}

impl TableState {
    pub fn new(
        game_id: impl Into<String>,
        players: Vec<PlayerState>,
        small_blind: u64,
        big_blind: u64,
        dealer_button: usize,
    ) -> Result<Self, TableError> {
        if !(2..=8).contains(&players.len()) {
            return Err(TableError::PlayerCount(players.len()));
        }
        let mut seats_seen = [false; 8];
        for p in &players {
            if seats_seen[p.seat_number()] {
                return Err(TableError::DuplicateSeat(p.seat_number()));
            }
            seats_seen[p.seat_number()] = true;
            if players.iter().filter(|q| q.player_id() == p.player_id()).count() > 1 {
                return Err(TableError::DuplicatePlayerId(p.player_id().to_string()));
            }
        }
        if small_blind == 0 || big_blind <= small_blind {
            return Err(TableError::InvalidBlinds { small: small_blind, big: big_blind });
        }
        if dealer_button >= players.len() {
            return Err(TableError::ButtonOutOfRange { button: dealer_button, players: players.len() });
        }
        let mut players = players;
        players.sort_by_key(|p| p.seat_number());
        Ok(Self {
            game_id: game_id.into(),
            players,
            phase: GamePhase::WaitingForPlayers,
            action_seat: None,
            community_cards: Board::new(),
            dealer_button,
            small_blind,
            big_blind,
        })
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn action_seat(&self) -> Option<usize> {
        self.action_seat
    }

    pub fn community_cards(&self) -> &Board {
        &self.community_cards
    }

    pub fn dealer_button(&self) -> usize {
        self.dealer_button
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn player_by_id(&self, player_id: &str) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.player_id() == player_id)
    }

    pub(crate) fn player_by_id_mut(&mut self, player_id: &str) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.player_id() == player_id)
    }

    pub fn player_at_seat(&self, seat: usize) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.seat_number() == seat)
    }

    /// Index into `players` for a seat. Seats are sorted at construction so
    /// this is the same as the seat's position among occupied seats.
    pub(crate) fn index_of_seat(&self, seat: usize) -> Option<usize> {
        self.players.iter().position(|p| p.seat_number() == seat)
    }

    /// Highest `current_bet` among players still in the hand. This is the
    /// amount every acting player must match this round.
    pub fn max_round_bet(&self) -> u64 {
        self.players
            .iter()
            .filter(|p| p.is_in_hand())
            .map(|p| p.current_bet())
            .max()
            .unwrap_or(0)
    }

    /// Players still contesting the hand (active or all-in).
    pub fn players_in_hand(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(|p| p.is_in_hand())
    }

    pub fn count_in_hand(&self) -> usize {
        self.players_in_hand().count()
    }

    pub fn count_can_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Next seat clockwise from `from` whose player can still act; skips
    /// folded, all-in, and out-of-hand seats. `None` when nobody can act.
    pub fn next_acting_seat(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        let start = self.index_of_seat(from)?;
        (1..=n)
            .map(|offset| &self.players[(start + offset) % n])
            .find(|p| p.can_act())
            .map(|p| p.seat_number())
    }

    /// The seat `offset` positions clockwise of the button, adjusted onto
    /// the first seat that can act (used for blind and first-to-act math).
    pub(crate) fn seat_clockwise_of_button(&self, offset: usize) -> Option<usize> {
        let n = self.players.len();
        let start = (self.dealer_button + offset) % n;
        if self.players[start].can_act() {
            return Some(self.players[start].seat_number());
        }
        self.next_acting_seat(self.players[start].seat_number())
    }

    /// Begin a betting round: zero per-round bets, active players wait.
    pub(crate) fn begin_round(&mut self) {
        for p in &mut self.players {
            p.begin_round();
        }
    }

    /// Reset for a new hand: community cards cleared, players reset, button
    /// advanced one seat (wrapping) when requested.
    pub(crate) fn reset_for_new_hand(&mut self, advance_button: bool) {
        for p in &mut self.players {
            p.reset_for_new_hand();
        }
        self.community_cards.clear();
        self.action_seat = None;
        if advance_button {
            self.dealer_button = (self.dealer_button + 1) % self.players.len();
        }
    }

    /// Sum of every stack plus every contribution; constant across a hand.
    pub fn total_chips(&self, pot_total: u64) -> u64 {
        self.players.iter().map(|p| p.stack()).sum::<u64>() + pot_total
    }

}
