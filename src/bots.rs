//! Scripted opponents. Each strategy maps an [`ActionRequest`] to an
//! action, which still goes through the validator like any other input.
//! Useful for driving full games in tests and simulations.
//!
//! Amounts follow the submission contract: zero for check/fold, the exact
//! outstanding amount for a call, chips added for bet/raise, and the full
//! stack for all-in.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cards::{Card, Rank};
use crate::validator::ActionType;
use crate::view::ActionRequest;

/// A decision procedure for one seat.
pub trait Strategy {
    fn name(&self) -> &str;

    /// Choose an action for the request. Takes `&mut self` so strategies
    /// may keep internal state such as an RNG.
    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64);
}

fn call_or_shove(request: &ActionRequest) -> (ActionType, u64) {
    if request.current_bet_to_call >= request.your_stack {
        (ActionType::AllIn, request.your_stack)
    } else {
        (ActionType::Call, request.current_bet_to_call)
    }
}

/// Folds everything except holdings with an ace, king, or queen; with a
/// premium card it checks or calls, never raises.
#[derive(Debug, Default)]
pub struct Folder;

impl Folder {
    fn has_premium(request: &ActionRequest) -> bool {
        request
            .your_cards
            .iter()
            .filter_map(|s| s.parse::<Card>().ok())
            .any(|c| c.rank() >= Rank::Queen)
    }
}

impl Strategy for Folder {
    fn name(&self) -> &str {
        "folder"
    }

    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64) {
        if !Self::has_premium(request) {
            if request.current_bet_to_call == 0 {
                return (ActionType::Check, 0);
            }
            return (ActionType::Fold, 0);
        }
        if request.current_bet_to_call == 0 {
            (ActionType::Check, 0)
        } else {
            call_or_shove(request)
        }
    }
}

/// Calls any bet regardless of size; checks when there is nothing to call.
/// Never folds, never raises.
#[derive(Debug, Default)]
pub struct CallingStation;

impl Strategy for CallingStation {
    fn name(&self) -> &str {
        "calling-station"
    }

    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64) {
        if request.current_bet_to_call == 0 {
            (ActionType::Check, 0)
        } else {
            call_or_shove(request)
        }
    }
}

/// Checks when possible, calls bets up to 30% of the remaining stack, and
/// folds to anything larger. Never opens the betting.
#[derive(Debug, Default)]
pub struct Passive;

impl Strategy for Passive {
    fn name(&self) -> &str {
        "passive"
    }

    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64) {
        let to_call = request.current_bet_to_call;
        let stack = request.your_stack;
        if to_call == 0 {
            return (ActionType::Check, 0);
        }
        // Fold when the call costs more than 30% of what is behind.
        if stack > 0 && to_call * 10 > stack * 3 {
            return (ActionType::Fold, 0);
        }
        call_or_shove(request)
    }
}

/// Bets when nobody has, raises the minimum when facing a bet, and shoves
/// when the stack is too short for a full raise.
#[derive(Debug)]
pub struct Aggressor {
    /// Opening bet size when no bet is live.
    pub open_bet: u64,
}

impl Aggressor {
    pub fn new(open_bet: u64) -> Self {
        Self { open_bet }
    }
}

impl Strategy for Aggressor {
    fn name(&self) -> &str {
        "aggressor"
    }

    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64) {
        let to_call = request.current_bet_to_call;
        let stack = request.your_stack;
        if stack == 0 {
            return (ActionType::Check, 0);
        }
        if to_call > 0 {
            let raise = to_call + request.min_raise;
            if raise >= stack {
                return (ActionType::AllIn, stack);
            }
            return (ActionType::Raise, raise);
        }
        if request.your_bet_this_round > 0 {
            // Big-blind option: the round has a live bet we already match,
            // so opening again must be a raise.
            let raise = self.open_bet.max(request.min_raise);
            if raise >= stack {
                return (ActionType::AllIn, stack);
            }
            return (ActionType::Raise, raise);
        }
        let bet = self.open_bet.min(stack);
        if bet == stack {
            (ActionType::AllIn, stack)
        } else {
            (ActionType::Bet, bet)
        }
    }
}

/// Shoves the whole stack at every decision point.
#[derive(Debug, Default)]
pub struct AllInEveryHand;

impl Strategy for AllInEveryHand {
    fn name(&self) -> &str {
        "all-in"
    }

    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64) {
        if request.your_stack == 0 {
            if request.current_bet_to_call == 0 {
                return (ActionType::Check, 0);
            }
            return (ActionType::Fold, 0);
        }
        (ActionType::AllIn, request.your_stack)
    }
}

/// Picks a random legal-shaped action from a seeded RNG, for shaking out
/// unusual action sequences.
#[derive(Debug)]
pub struct RandomPlay {
    rng: ChaCha8Rng,
    /// Fixed bet size when the coin lands on betting.
    pub open_bet: u64,
}

impl RandomPlay {
    pub fn seeded(seed: u64, open_bet: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), open_bet }
    }
}

impl Strategy for RandomPlay {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, request: &ActionRequest) -> (ActionType, u64) {
        let to_call = request.current_bet_to_call;
        let stack = request.your_stack;
        if stack == 0 {
            return if to_call == 0 { (ActionType::Check, 0) } else { (ActionType::Fold, 0) };
        }
        if to_call == 0 {
            match self.rng.random_range(0..3) {
                0 => (ActionType::Check, 0),
                1 => {
                    // With chips already in this round (big-blind option)
                    // the round has a live bet, so opening means raising.
                    if request.your_bet_this_round > 0 {
                        if request.min_raise >= stack {
                            return (ActionType::AllIn, stack);
                        }
                        return (ActionType::Raise, request.min_raise);
                    }
                    let bet = self.open_bet.min(stack);
                    if bet == stack {
                        (ActionType::AllIn, stack)
                    } else {
                        (ActionType::Bet, bet)
                    }
                }
                _ => (ActionType::AllIn, stack),
            }
        } else {
            match self.rng.random_range(0..3) {
                0 => (ActionType::Fold, 0),
                1 => call_or_shove(request),
                _ => (ActionType::AllIn, stack),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cards: &[&str], to_call: u64, stack: u64, my_bet: u64) -> ActionRequest {
        ActionRequest {
            player_id: "bot".into(),
            game_phase: "FLOP",
            your_cards: cards.iter().map(|s| s.to_string()).collect(),
            your_stack: stack,
            your_bet_this_round: my_bet,
            community_cards: Vec::new(),
            current_bet_to_call: to_call,
            min_raise: 10,
            pot_total: 30,
            active_players: Vec::new(),
        }
    }

    #[test]
    fn folder_plays_premium_cards_only() {
        let mut bot = Folder;
        let junk = request(&["7 of clubs", "2 of hearts"], 20, 100, 0);
        assert_eq!(bot.decide(&junk), (ActionType::Fold, 0));

        let premium = request(&["A of spades", "2 of hearts"], 20, 100, 0);
        assert_eq!(bot.decide(&premium), (ActionType::Call, 20));

        let free = request(&["7 of clubs", "2 of hearts"], 0, 100, 0);
        assert_eq!(bot.decide(&free), (ActionType::Check, 0));
    }

    #[test]
    fn calling_station_never_folds() {
        let mut bot = CallingStation;
        assert_eq!(bot.decide(&request(&[], 50, 100, 0)), (ActionType::Call, 50));
        assert_eq!(bot.decide(&request(&[], 150, 100, 0)), (ActionType::AllIn, 100));
        assert_eq!(bot.decide(&request(&[], 0, 100, 0)), (ActionType::Check, 0));
    }

    #[test]
    fn passive_folds_to_large_bets() {
        let mut bot = Passive;
        assert_eq!(bot.decide(&request(&[], 30, 100, 0)), (ActionType::Call, 30));
        assert_eq!(bot.decide(&request(&[], 31, 100, 0)), (ActionType::Fold, 0));
        assert_eq!(bot.decide(&request(&[], 0, 100, 0)), (ActionType::Check, 0));
    }

    #[test]
    fn aggressor_bets_raises_or_shoves() {
        let mut bot = Aggressor::new(40);
        assert_eq!(bot.decide(&request(&[], 0, 200, 0)), (ActionType::Bet, 40));
        assert_eq!(bot.decide(&request(&[], 30, 200, 0)), (ActionType::Raise, 40));
        assert_eq!(bot.decide(&request(&[], 30, 35, 0)), (ActionType::AllIn, 35));
        // Big-blind option: live bet already matched, so open via raise.
        assert_eq!(bot.decide(&request(&[], 0, 200, 10)), (ActionType::Raise, 40));
    }

    #[test]
    fn all_in_bot_shoves_its_stack() {
        let mut bot = AllInEveryHand;
        assert_eq!(bot.decide(&request(&[], 0, 75, 0)), (ActionType::AllIn, 75));
        assert_eq!(bot.decide(&request(&[], 10, 0, 0)), (ActionType::Fold, 0));
    }

    #[test]
    fn random_play_is_reproducible_for_a_seed() {
        let req = request(&[], 0, 200, 0);
        let mut a = RandomPlay::seeded(11, 40);
        let mut b = RandomPlay::seeded(11, 40);
        for _ in 0..20 {
            assert_eq!(a.decide(&req), b.decide(&req));
        }
    }
}
