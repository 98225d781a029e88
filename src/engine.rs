//! The dealer state machine. Owns the table, enforces the phase order,
//! applies validated actions, runs the board out, and settles pots.
//!
//! The engine never shuffles: each hand is started from a caller-provided
//! [`Deck`], which keeps every hand reproducible and keeps randomness at
//! the edge of the system.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::deck::Deck;
use crate::hand::HandError;
use crate::player::{PlayerError, PlayerState, RoundStatus};
use crate::pot::{PotError, PotManager, PotStructure};
use crate::table::{GamePhase, TableError, TableState};
use crate::validator::{validate, ActionError, ActionType, ValidAction};
use crate::view::{ActionRequest, TableExport};
use crate::winner::{determine_winners, ShowdownError};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error("expected phase {expected}, found {}", .found.label())]
    InvalidPhase { expected: &'static str, found: GamePhase },
    #[error("need at least 2 players with chips, have {0}")]
    NotEnoughPlayers(usize),
    #[error("deck ran out of cards")]
    DeckExhausted,
    #[error("no action is pending")]
    NoActionPending,
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Player(#[from] PlayerError),
    #[error(transparent)]
    Pot(#[from] PotError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Showdown(#[from] ShowdownError),
}

/// Single-table no-limit hold'em dealer.
#[derive(Debug)]
pub struct DealerEngine {
    table: TableState,
    pots: PotManager,
    deck: Option<Deck>,
    min_raise: u64,
    hands_played: u64,
    last_payouts: Option<BTreeMap<String, u64>>,
}

impl DealerEngine {
    pub fn new(
        game_id: impl Into<String>,
        players: Vec<PlayerState>,
        small_blind: u64,
        big_blind: u64,
        dealer_button: usize,
    ) -> Result<Self, EngineError> {
        let table = TableState::new(game_id, players, small_blind, big_blind, dealer_button)?;
        let pots = PotManager::new(table.players().iter().map(|p| p.player_id().to_string()));
        Ok(Self { table, pots, deck: None, min_raise: big_blind, hands_played: 0, last_payouts: None })
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn phase(&self) -> GamePhase {
        self.table.phase()
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Payouts from the most recently completed hand.
    pub fn last_payouts(&self) -> Option<&BTreeMap<String, u64>> {
        self.last_payouts.as_ref()
    }

    /// Fewer than two players still hold chips.
    pub fn is_game_over(&self) -> bool {
        self.table.players().iter().filter(|p| p.stack() > 0).count() < 2
    }

    /// Open the game. Legal exactly once, before the first hand.
    pub fn start_game(&mut self) -> Result<(), EngineError> {
        if self.table.phase() != GamePhase::WaitingForPlayers {
            return Err(EngineError::InvalidPhase {
                expected: "WAITING_FOR_PLAYERS",
                found: self.table.phase(),
            });
        }
        let funded = self.table.players().iter().filter(|p| p.stack() > 0).count();
        if funded < 2 {
            return Err(EngineError::NotEnoughPlayers(funded));
        }
        self.table.phase = GamePhase::GameStarted;
        info!(
            "game {} started with {} players",
            self.table.game_id(),
            self.table.players().len()
        );
        Ok(())
    }

    /// Deal a new hand from an already-shuffled deck: reset seats, post
    /// blinds, deal hole cards, and open pre-flop action. The button stays
    /// put for the first hand and advances one live seat afterwards.
    pub fn start_hand(&mut self, deck: Deck) -> Result<(), EngineError> {
        let first_hand = match self.table.phase() {
            GamePhase::GameStarted => true,
            GamePhase::HandComplete => false,
            found => {
                return Err(EngineError::InvalidPhase {
                    expected: "GAME_STARTED or HAND_COMPLETE",
                    found,
                })
            }
        };

        self.table.reset_for_new_hand(!first_hand);
        let dealt_in = self.table.count_in_hand();
        if dealt_in < 2 {
            return Err(EngineError::NotEnoughPlayers(dealt_in));
        }

        self.pots = PotManager::new(
            self.table
                .players_in_hand()
                .map(|p| p.player_id().to_string()),
        );
        self.deck = Some(deck);
        self.last_payouts = None;
        self.table.begin_round();

        self.post_blinds()?;
        self.table.phase = GamePhase::BlindsPosted;
        self.deal_hole_cards()?;

        self.table.phase = GamePhase::PreFlop;
        self.min_raise = self.table.big_blind();
        // First to act pre-flop sits three seats past the button (past the
        // blinds), skipping seats that cannot act.
        self.table.action_seat = self.first_waiting_from_offset(3);
        self.hands_played += 1;
        info!(
            "hand {} of game {}: button at seat {}, {} players dealt in",
            self.hands_played,
            self.table.game_id(),
            self.table.dealer_button(),
            dealt_in
        );

        if self.table.action_seat.is_none() {
            // Blinds put everyone all-in; run the hand out immediately.
            self.advance_round()?;
        }
        Ok(())
    }

    fn post_blinds(&mut self) -> Result<(), EngineError> {
        let small = self.table.small_blind();
        let big = self.table.big_blind();
        let sb_seat = self
            .table
            .seat_clockwise_of_button(1)
            .ok_or(EngineError::NotEnoughPlayers(0))?;
        self.post_blind(sb_seat, small)?;
        let bb_seat = self
            .table
            .next_acting_seat(sb_seat)
            .ok_or(EngineError::NotEnoughPlayers(1))?;
        self.post_blind(bb_seat, big)?;
        debug!("blinds posted: seat {sb_seat} posts {small}, seat {bb_seat} posts {big}");
        Ok(())
    }

    /// A short stack posts what it can and is all-in.
    fn post_blind(&mut self, seat: usize, blind: u64) -> Result<(), EngineError> {
        let idx = self
            .table
            .index_of_seat(seat)
            .ok_or(EngineError::NoActionPending)?;
        let player = &mut self.table.players[idx];
        let amount = blind.min(player.stack());
        player.post_bet(amount)?;
        let id = player.player_id().to_string();
        let depleted = player.stack() == 0;
        if depleted {
            player.go_all_in();
        }
        self.pots.add_contribution(&id, amount)?;
        if depleted {
            self.pots.mark_all_in(&id)?;
        }
        Ok(())
    }

    fn deal_hole_cards(&mut self) -> Result<(), EngineError> {
        let seats: Vec<usize> = self
            .table
            .players_in_hand()
            .map(|p| p.seat_number())
            .collect();
        for seat in seats {
            let deck = self.deck.as_mut().ok_or(EngineError::DeckExhausted)?;
            let a = deck.draw().ok_or(EngineError::DeckExhausted)?;
            let b = deck.draw().ok_or(EngineError::DeckExhausted)?;
            let idx = self
                .table
                .index_of_seat(seat)
                .ok_or(EngineError::NoActionPending)?;
            self.table.players[idx].deal_hole_cards(a, b)?;
        }
        Ok(())
    }

    /// The request for whichever player must act next.
    pub fn action_request(&self) -> Result<ActionRequest, EngineError> {
        let seat = self.table.action_seat().ok_or(EngineError::NoActionPending)?;
        let player = self
            .table
            .player_at_seat(seat)
            .ok_or(EngineError::NoActionPending)?;
        Ok(ActionRequest::build(&self.table, player, self.pots.total(), self.min_raise))
    }

    /// Validate and apply one betting action, then move the hand forward:
    /// pass the action on, close the round, or settle the hand. Rejected
    /// actions leave all state untouched.
    pub fn process_action(
        &mut self,
        player_id: &str,
        action: ActionType,
        amount: u64,
    ) -> Result<(), EngineError> {
        let vetted = validate(&self.table, player_id, action, amount, self.min_raise)?;
        let acting_seat = self.table.action_seat().ok_or(EngineError::NoActionPending)?;
        self.apply(player_id, &vetted)?;
        debug!(
            "seat {acting_seat}: {} moves {} chips ({})",
            player_id,
            vetted.chips,
            vetted.action.label()
        );

        if self.table.count_in_hand() == 1 {
            return self.settle_uncontested();
        }
        if self.round_complete() {
            self.advance_round()
        } else {
            self.table.action_seat = self.next_waiting_seat(acting_seat);
            if self.table.action_seat.is_none() {
                // Everyone left to speak is all-in; close the round.
                self.advance_round()
            } else {
                Ok(())
            }
        }
    }

    fn apply(&mut self, player_id: &str, vetted: &ValidAction) -> Result<(), EngineError> {
        // Validation already vetted everything; mutations here cannot fail
        // except through ledger bookkeeping errors.
        let raises = vetted.raise_increment > 0 && vetted.chips > 0;
        {
            let player = self
                .table
                .player_by_id_mut(player_id)
                .ok_or_else(|| ActionError::UnknownPlayer(player_id.to_string()))?;
            match vetted.action {
                ActionType::Fold => player.fold(),
                _ => {
                    if vetted.chips > 0 {
                        player.post_bet(vetted.chips)?;
                    }
                    if vetted.is_all_in {
                        player.go_all_in();
                    } else {
                        player.round_status = RoundStatus::Acted;
                    }
                }
            }
        }
        if vetted.action == ActionType::Fold {
            self.pots.mark_folded(player_id)?;
        }
        if vetted.chips > 0 {
            self.pots.add_contribution(player_id, vetted.chips)?;
        }
        if vetted.is_all_in {
            self.pots.mark_all_in(player_id)?;
        }

        if raises {
            // Only a full raise resets the minimum; a short all-in leaves
            // it where it was.
            if vetted.raise_increment >= self.min_raise {
                self.min_raise = vetted.raise_increment;
            }
            // Anyone matched below the new high bet must act again, even
            // when the increase was a short all-in.
            let max_bet = self.table.max_round_bet();
            for p in &mut self.table.players {
                if p.player_id() != player_id && p.can_act() && p.current_bet() < max_bet {
                    p.round_status = RoundStatus::WaitingForAction;
                }
            }
        }
        Ok(())
    }

    /// A betting round ends when nobody who can act is still waiting.
    fn round_complete(&self) -> bool {
        !self
            .table
            .players()
            .iter()
            .any(|p| p.can_act() && p.round_status() == RoundStatus::WaitingForAction)
    }

    /// Next waiting seat clockwise of `from`, or `None`.
    fn next_waiting_seat(&self, from: usize) -> Option<usize> {
        let n = self.table.players().len();
        let start = self.table.index_of_seat(from)?;
        (1..=n)
            .map(|offset| &self.table.players()[(start + offset) % n])
            .find(|p| p.can_act() && p.round_status() == RoundStatus::WaitingForAction)
            .map(|p| p.seat_number())
    }

    fn first_waiting_from_offset(&self, offset: usize) -> Option<usize> {
        let seat = self.table.seat_clockwise_of_button(offset)?;
        let player = self.table.player_at_seat(seat)?;
        if player.round_status() == RoundStatus::WaitingForAction {
            Some(seat)
        } else {
            self.next_waiting_seat(seat)
        }
    }

    /// Close the current betting round and open the next street. When no
    /// further betting is possible the remaining streets run out
    /// automatically into the showdown.
    fn advance_round(&mut self) -> Result<(), EngineError> {
        loop {
            let next = match self.table.phase() {
                GamePhase::PreFlop => {
                    self.reveal(3)?;
                    GamePhase::Flop
                }
                GamePhase::Flop => {
                    self.reveal(1)?;
                    GamePhase::Turn
                }
                GamePhase::Turn => {
                    self.reveal(1)?;
                    GamePhase::River
                }
                GamePhase::River => return self.settle_showdown(),
                found => {
                    return Err(EngineError::InvalidPhase { expected: "a betting round", found })
                }
            };
            self.table.phase = next;
            info!(
                "{}: board [{}]",
                next.label(),
                self.table
                    .community_cards()
                    .as_slice()
                    .iter()
                    .map(|c| c.short())
                    .collect::<Vec<_>>()
                    .join(" ")
            );

            // Two players able to act means a real betting round; otherwise
            // keep dealing.
            if self.table.count_can_act() >= 2 {
                self.table.begin_round();
                self.min_raise = self.table.big_blind();
                self.table.action_seat = self.first_waiting_from_offset(1);
                if self.table.action_seat.is_some() {
                    return Ok(());
                }
            }
        }
    }

    fn reveal(&mut self, n: usize) -> Result<(), EngineError> {
        for _ in 0..n {
            let card = self
                .deck
                .as_mut()
                .and_then(Deck::draw)
                .ok_or(EngineError::DeckExhausted)?;
            self.table.community_cards.reveal(card)?;
        }
        Ok(())
    }

    /// Everyone else folded: the last player standing takes the pot
    /// without showing a hand.
    fn settle_uncontested(&mut self) -> Result<(), EngineError> {
        self.table.phase = GamePhase::PotDistribution;
        let structure = self.pots.finalize();
        let payouts = determine_winners(self.table.players(), self.table.community_cards(), &structure)?;
        self.credit(&payouts)?;
        self.finish_hand(payouts);
        Ok(())
    }

    fn settle_showdown(&mut self) -> Result<(), EngineError> {
        self.table.phase = GamePhase::Showdown;
        let structure = self.pots.finalize();
        info!(
            "showdown: main pot {}, {} side pot(s)",
            structure.main.amount,
            structure.side_pots.len()
        );
        let payouts = determine_winners(self.table.players(), self.table.community_cards(), &structure)?;
        self.table.phase = GamePhase::PotDistribution;
        self.credit(&payouts)?;
        self.finish_hand(payouts);
        Ok(())
    }

    fn credit(&mut self, payouts: &BTreeMap<String, u64>) -> Result<(), EngineError> {
        for (id, amount) in payouts {
            let player = self
                .table
                .player_by_id_mut(id)
                .ok_or_else(|| ActionError::UnknownPlayer(id.clone()))?;
            player.stack += amount;
        }
        Ok(())
    }

    fn finish_hand(&mut self, payouts: BTreeMap<String, u64>) {
        for (id, amount) in &payouts {
            info!("{id} wins {amount}");
        }
        self.table.action_seat = None;
        self.table.phase = GamePhase::HandComplete;
        self.last_payouts = Some(payouts);
        // Chips are back in stacks; open a fresh ledger so exports taken
        // between hands show an empty pot.
        self.pots = PotManager::new(self.table.players().iter().map(|p| p.player_id().to_string()));
    }

    /// Derive the pot structure from the live ledger.
    pub fn pot_structure(&self) -> PotStructure {
        self.pots.finalize()
    }

    pub fn pot_total(&self) -> u64 {
        self.pots.total()
    }

    /// Omniscient snapshot of the table for logging and audits.
    pub fn export(&self) -> TableExport {
        TableExport::build(&self.table, &self.pots.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn engine(stacks: &[u64]) -> DealerEngine {
        let players = stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| PlayerState::new(format!("p{i}"), i, s).unwrap())
            .collect();
        let mut e = DealerEngine::new("g", players, 5, 10, 0).unwrap();
        e.start_game().unwrap();
        e
    }

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

    #[test]
    fn start_game_requires_waiting_phase() {
        let mut e = engine(&[100, 100]);
        assert!(matches!(e.start_game(), Err(EngineError::InvalidPhase { .. })));
    }

    #[test]
    fn blinds_are_posted_and_first_actor_is_left_of_big_blind() {
        let mut e = engine(&[100, 100, 100, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(1);
        e.start_hand(deck).unwrap();

        assert_eq!(e.phase(), GamePhase::PreFlop);
        assert_eq!(e.table().player_at_seat(1).unwrap().current_bet(), 5);
        assert_eq!(e.table().player_at_seat(2).unwrap().current_bet(), 10);
        assert_eq!(e.table().action_seat(), Some(3));
        assert_eq!(e.pot_total(), 15);
        for p in e.table().players_in_hand() {
            assert!(p.hole_cards().is_some());
        }
    }

    #[test]
    fn short_blind_posts_all_in() {
        let mut e = engine(&[100, 3, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(2);
        e.start_hand(deck).unwrap();
        let sb = e.table().player_at_seat(1).unwrap();
        assert_eq!(sb.current_bet(), 3);
        assert_eq!(sb.stack(), 0);
        assert!(!sb.can_act());
    }

    #[test]
    fn folding_to_one_player_ends_the_hand_without_showdown() {
        let mut e = engine(&[100, 100, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(3);
        e.start_hand(deck).unwrap();

        // Seat 0 (button) acts first behind the blinds.
        e.process_action("p0", ActionType::Fold, 0).unwrap();
        e.process_action("p1", ActionType::Fold, 0).unwrap();

        assert_eq!(e.phase(), GamePhase::HandComplete);
        let payouts = e.last_payouts().unwrap();
        assert_eq!(payouts.get("p2"), Some(&15));
        // Big blind keeps their own 10 and wins the small blind's 5.
        assert_eq!(e.table().player_by_id("p2").unwrap().stack(), 105);
    }

    #[test]
    fn calls_and_checks_advance_the_streets() {
        let mut e = engine(&[100, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(4);
        e.start_hand(deck).unwrap();

        // Heads-up: seat 1 posts small blind, seat 0 (button) the big blind.
        assert_eq!(e.table().action_seat(), Some(1));
        e.process_action("p1", ActionType::Call, 5).unwrap();
        e.process_action("p0", ActionType::Check, 0).unwrap();
        assert_eq!(e.phase(), GamePhase::Flop);
        assert_eq!(e.table().community_cards().len(), 3);

        for _ in 0..2 {
            let first = e.action_request().unwrap().player_id.clone();
            e.process_action(&first, ActionType::Check, 0).unwrap();
            let second = e.action_request().unwrap().player_id.clone();
            e.process_action(&second, ActionType::Check, 0).unwrap();
        }
        assert_eq!(e.phase(), GamePhase::River);
        assert_eq!(e.table().community_cards().len(), 5);
    }

    #[test]
    fn raise_reopens_action_for_earlier_callers() {
        let mut e = engine(&[200, 200, 200]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(5);
        e.start_hand(deck).unwrap();

        e.process_action("p0", ActionType::Call, 10).unwrap();
        e.process_action("p1", ActionType::Call, 5).unwrap();
        e.process_action("p2", ActionType::Raise, 30).unwrap(); // to 40
        // Round is not over: p0 and p1 face the raise.
        assert_eq!(e.phase(), GamePhase::PreFlop);
        assert_eq!(e.table().action_seat(), Some(0));
        e.process_action("p0", ActionType::Call, 30).unwrap();
        e.process_action("p1", ActionType::Fold, 0).unwrap();
        assert_eq!(e.phase(), GamePhase::Flop);
        assert_eq!(e.pot_total(), 90);
    }

    #[test]
    fn all_in_confrontation_runs_the_board_out() {
        let mut e = engine(&[100, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(6);
        e.start_hand(deck).unwrap();

        e.process_action("p1", ActionType::AllIn, 95).unwrap();
        e.process_action("p0", ActionType::Call, 90).unwrap();

        assert_eq!(e.phase(), GamePhase::HandComplete);
        assert_eq!(e.table().community_cards().len(), 5);
        let total: u64 = e.table().players().iter().map(|p| p.stack()).sum();
        assert_eq!(total, 200, "chips conserved through the all-in runout");
    }

    #[test]
    fn button_advances_between_hands_but_not_before_the_first() {
        let mut e = engine(&[100, 100, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(7);
        e.start_hand(deck).unwrap();
        assert_eq!(e.table().dealer_button(), 0);

        e.process_action("p0", ActionType::Fold, 0).unwrap();
        e.process_action("p1", ActionType::Fold, 0).unwrap();
        assert_eq!(e.phase(), GamePhase::HandComplete);

        let mut deck = Deck::standard();
        deck.shuffle_seeded(8);
        e.start_hand(deck).unwrap();
        assert_eq!(e.table().dealer_button(), 1);
        assert_eq!(e.hands_played(), 2);
    }

    #[test]
    fn stacked_deck_reaches_a_predictable_showdown() {
        let mut e = engine(&[100, 100]);
        // Deal order with button at 0, heads-up: seat 0 first, then seat 1.
        // p0 gets aces, p1 gets kings, board bricks out.
        let deck = stacked_deck("As, Ad, Ks, Kd, 2h, 7c, 9d, Jh, 3s");
        e.start_hand(deck).unwrap();

        e.process_action("p1", ActionType::Call, 5).unwrap();
        e.process_action("p0", ActionType::Check, 0).unwrap();
        for _ in 0..3 {
            let first = e.action_request().unwrap().player_id.clone();
            e.process_action(&first, ActionType::Check, 0).unwrap();
            let second = e.action_request().unwrap().player_id.clone();
            e.process_action(&second, ActionType::Check, 0).unwrap();
        }

        assert_eq!(e.phase(), GamePhase::HandComplete);
        assert_eq!(e.last_payouts().unwrap().get("p0"), Some(&20));
        assert_eq!(e.table().player_by_id("p0").unwrap().stack(), 110);
        assert_eq!(e.table().player_by_id("p1").unwrap().stack(), 90);
    }

    #[test]
    fn export_reflects_live_state() {
        let mut e = engine(&[100, 100]);
        let mut deck = Deck::standard();
        deck.shuffle_seeded(9);
        e.start_hand(deck).unwrap();
        let export = e.export();
        assert_eq!(export.phase, "PRE_FLOP");
        assert_eq!(export.total_pot, 15);
        assert_eq!(export.players.len(), 2);
    }
}
