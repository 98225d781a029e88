//! dealer-rs: a no-limit Texas Hold'em dealer engine
//!
//! Goals:
//! - Deterministic hand flow: the engine never shuffles; every hand is
//!   dealt from a caller-provided [`deck::Deck`]
//! - Strict chip custody: every chip is in exactly one stack or pot, with
//!   side pots derived from an explicit contribution ledger
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: play a heads-up hand
//! ```
//! use dealer_rs::deck::Deck;
//! use dealer_rs::engine::DealerEngine;
//! use dealer_rs::player::PlayerState;
//! use dealer_rs::table::GamePhase;
//! use dealer_rs::validator::ActionType;
//!
//! let players = vec![
//!     PlayerState::new("alice", 0, 1000).unwrap(),
//!     PlayerState::new("bob", 1, 1000).unwrap(),
//! ];
//! let mut engine = DealerEngine::new("table-1", players, 5, 10, 0).unwrap();
//! engine.start_game().unwrap();
//!
//! let mut deck = Deck::standard();
//! deck.shuffle_seeded(42);
//! engine.start_hand(deck).unwrap();
//!
//! // The small blind acts first heads-up; folding ends the hand.
//! let turn = engine.action_request().unwrap();
//! engine.process_action(&turn.player_id, ActionType::Fold, 0).unwrap();
//! assert_eq!(engine.phase(), GamePhase::HandComplete);
//! ```

pub mod bots;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod hand;
pub mod player;
pub mod pot;
pub mod table;
pub mod validator;
pub mod view;
pub mod winner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
