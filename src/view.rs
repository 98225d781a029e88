//! Serializable projections of table state: the per-player action request
//! and the full table export. These are plain data, built on demand and
//! safe to hand to transports, logs, or bots.

use serde::Serialize;

use crate::cards::Card;
use crate::player::{PlayerState, PlayerStatus, RoundStatus};
use crate::pot::PotStructure;
use crate::table::TableState;

fn card_strings(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|c| c.to_string()).collect()
}

const fn status_label(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Active => "ACTIVE",
        PlayerStatus::Folded => "FOLDED",
        PlayerStatus::AllIn => "ALL_IN",
        PlayerStatus::OutOfHand => "OUT_OF_HAND",
    }
}

const fn round_status_label(status: RoundStatus) -> &'static str {
    match status {
        RoundStatus::WaitingForAction => "WAITING_FOR_ACTION",
        RoundStatus::Acted => "ACTED",
        RoundStatus::SittingOut => "SITTING_OUT",
    }
}

/// Public view of one opponent's seat, as shown inside an [`ActionRequest`].
/// Never carries hole cards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeatView {
    pub player_id: String,
    pub seat_number: usize,
    pub stack: u64,
    pub current_bet: u64,
    pub status: &'static str,
}

impl SeatView {
    fn of(p: &PlayerState) -> Self {
        Self {
            player_id: p.player_id().to_string(),
            seat_number: p.seat_number(),
            stack: p.stack(),
            current_bet: p.current_bet(),
            status: status_label(p.status()),
        }
    }
}

/// Everything a player needs to choose an action. Contains that player's
/// own hole cards and only public information about everyone else.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionRequest {
    pub player_id: String,
    pub game_phase: &'static str,
    pub your_cards: Vec<String>,
    pub your_stack: u64,
    pub your_bet_this_round: u64,
    pub community_cards: Vec<String>,
    /// Chips this player must add to match the current bet.
    pub current_bet_to_call: u64,
    /// Minimum chips a raise must add on top of the call.
    pub min_raise: u64,
    pub pot_total: u64,
    pub active_players: Vec<SeatView>,
}

impl ActionRequest {
    pub(crate) fn build(
        table: &TableState,
        player: &PlayerState,
        pot_total: u64,
        min_raise: u64,
    ) -> Self {
        let your_cards = player
            .hole_cards()
            .map(|h| card_strings(&h.as_array()))
            .unwrap_or_default();
        Self {
            player_id: player.player_id().to_string(),
            game_phase: table.phase().label(),
            your_cards,
            your_stack: player.stack(),
            your_bet_this_round: player.current_bet(),
            community_cards: card_strings(table.community_cards().as_slice()),
            current_bet_to_call: table.max_round_bet().saturating_sub(player.current_bet()),
            min_raise,
            pot_total,
            active_players: table
                .players()
                .iter()
                .filter(|p| p.is_in_hand())
                .map(SeatView::of)
                .collect(),
        }
    }
}

/// One pot in a [`TableExport`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PotView {
    pub amount: u64,
    pub eligible: Vec<String>,
}

/// Full seat record in a [`TableExport`], hole cards included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlayerExport {
    pub player_id: String,
    pub seat_number: usize,
    pub stack: u64,
    pub current_bet: u64,
    pub total_contributed: u64,
    pub hole_cards: Option<Vec<String>>,
    pub status: &'static str,
    pub round_status: &'static str,
}

/// Omniscient snapshot of the whole table, for logs, audits, and replay.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableExport {
    pub game_id: String,
    pub phase: &'static str,
    pub current_action_player: Option<String>,
    pub community_cards: Vec<String>,
    pub dealer_button: usize,
    pub small_blind: u64,
    pub big_blind: u64,
    pub main_pot: u64,
    pub side_pots: Vec<PotView>,
    pub total_pot: u64,
    pub players: Vec<PlayerExport>,
}

impl TableExport {
    pub(crate) fn build(table: &TableState, pots: &PotStructure) -> Self {
        Self {
            game_id: table.game_id().to_string(),
            phase: table.phase().label(),
            current_action_player: table
                .action_seat()
                .and_then(|s| table.player_at_seat(s))
                .map(|p| p.player_id().to_string()),
            community_cards: card_strings(table.community_cards().as_slice()),
            dealer_button: table.dealer_button(),
            small_blind: table.small_blind(),
            big_blind: table.big_blind(),
            main_pot: pots.main.amount,
            side_pots: pots
                .side_pots
                .iter()
                .map(|p| PotView { amount: p.amount, eligible: p.eligible.clone() })
                .collect(),
            total_pot: pots.total(),
            players: table
                .players()
                .iter()
                .map(|p| PlayerExport {
                    player_id: p.player_id().to_string(),
                    seat_number: p.seat_number(),
                    stack: p.stack(),
                    current_bet: p.current_bet(),
                    total_contributed: p.total_contributed(),
                    hole_cards: p.hole_cards().map(|h| card_strings(&h.as_array())),
                    status: status_label(p.status()),
                    round_status: round_status_label(p.round_status()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerState;
    use crate::pot::PotManager;
    use crate::table::{GamePhase, TableState};

    fn table() -> TableState {
        let players = vec![
            PlayerState::new("alice", 0, 100).unwrap(),
            PlayerState::new("bob", 1, 100).unwrap(),
        ];
        let mut t = TableState::new("g-1", players, 5, 10, 0).unwrap();
        t.phase = GamePhase::PreFlop;
        t.begin_round();
        t
    }

    #[test]
    fn action_request_shows_outstanding_amount() {
        let mut t = table();
        t.players[1].post_bet(10).unwrap();
        t.players[0].post_bet(5).unwrap();
        let req = ActionRequest::build(&t, &t.players()[0], 15, 10);
        assert_eq!(req.current_bet_to_call, 5);
        assert_eq!(req.your_bet_this_round, 5);
        assert_eq!(req.pot_total, 15);
        assert_eq!(req.game_phase, "PRE_FLOP");
    }

    #[test]
    fn action_request_never_leaks_opponent_cards() {
        let mut t = table();
        t.players[1]
            .deal_hole_cards("As".parse().unwrap(), "Ks".parse().unwrap())
            .unwrap();
        let req = ActionRequest::build(&t, &t.players()[0], 0, 10);
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("A of spades"));
        assert!(!json.contains("hole_cards"));
    }

    #[test]
    fn export_serializes_full_state() {
        let mut t = table();
        t.players[0]
            .deal_hole_cards("Qh".parse().unwrap(), "Qd".parse().unwrap())
            .unwrap();
        let mut pm = PotManager::new(["alice", "bob"]);
        pm.add_contribution("alice", 10).unwrap();
        pm.add_contribution("bob", 10).unwrap();
        let export = TableExport::build(&t, &pm.finalize());
        assert_eq!(export.total_pot, 20);
        assert_eq!(export.main_pot, 20);
        assert_eq!(export.players.len(), 2);
        assert_eq!(
            export.players[0].hole_cards.as_deref(),
            Some(&["Q of hearts".to_string(), "Q of diamonds".to_string()][..])
        );
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"phase\":\"PRE_FLOP\""));
    }
}
