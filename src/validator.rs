//! Pure legality checks for betting actions. Nothing in here mutates
//! state; the engine applies a [`ValidAction`] only after it comes back
//! from [`validate`].

use crate::table::{GamePhase, TableState};

/// The six actions a player may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionType {
    Check,
    Fold,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl ActionType {
    pub const fn label(self) -> &'static str {
        match self {
            ActionType::Check => "CHECK",
            ActionType::Fold => "FOLD",
            ActionType::Call => "CALL",
            ActionType::Bet => "BET",
            ActionType::Raise => "RAISE",
            ActionType::AllIn => "ALL_IN",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("player '{0}' is not seated at this table")]
    UnknownPlayer(String),
    #[error("it is not '{0}'s turn to act")]
    NotPlayersTurn(String),
    #[error("no betting actions accepted during {}", .0.label())]
    NotBettingPhase(GamePhase),
    #[error("player '{0}' cannot act (folded, all-in, or out of the hand)")]
    CannotAct(String),
    #[error("cannot check facing a bet of {outstanding}")]
    CheckFacingBet { outstanding: u64 },
    #[error("nothing to call")]
    NothingToCall,
    #[error("call amount must be {expected}, got {amount}")]
    CallAmountMismatch { expected: u64, amount: u64 },
    #[error("cannot bet when a bet of {max_bet} is already live; raise instead")]
    BetAlreadyMade { max_bet: u64 },
    #[error("bet amount must be positive")]
    ZeroBet,
    #[error("no live bet to raise; bet instead")]
    RaiseWithoutBet,
    #[error("raise must bring the bet to at least {required}, got {total}")]
    RaiseBelowMinimum { required: u64, total: u64 },
    #[error("all-in amount must be the full stack {expected}, got {amount}")]
    AllInAmountMismatch { expected: u64, amount: u64 },
    #[error("action needs {amount} chips but only {stack} remain")]
    InsufficientChips { amount: u64, stack: u64 },
    #[error("amount must be zero for {}", .0.label())]
    UnexpectedAmount(ActionType),
}

/// A vetted action, ready to apply. `chips` is the exact number of chips
/// that will move from the player's stack this action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidAction {
    pub action: ActionType,
    pub chips: u64,
    pub is_all_in: bool,
    /// For actions that push the live bet higher: how far above the old
    /// maximum the new bet sits. The engine uses it to track the minimum
    /// raise and to reopen the betting.
    pub raise_increment: u64,
}

/// Check an action against the table without touching any state.
///
/// Amount semantics follow the submission contract: zero for `Check` and
/// `Fold`, the exact outstanding amount for `Call`, the bet size for `Bet`,
/// the chips added on top of the player's round bet for `Raise`, and the
/// full remaining stack for `AllIn`. `min_raise` is the live minimum raise
/// increment maintained by the engine (the big blind at round start).
pub fn validate(
    table: &TableState,
    player_id: &str,
    action: ActionType,
    amount: u64,
    min_raise: u64,
) -> Result<ValidAction, ActionError> {
    if !table.phase().is_betting_round() {
        return Err(ActionError::NotBettingPhase(table.phase()));
    }
    let player = table
        .player_by_id(player_id)
        .ok_or_else(|| ActionError::UnknownPlayer(player_id.to_string()))?;
    if table.action_seat() != Some(player.seat_number()) {
        return Err(ActionError::NotPlayersTurn(player_id.to_string()));
    }
    if !player.can_act() {
        return Err(ActionError::CannotAct(player_id.to_string()));
    }

    let max_bet = table.max_round_bet();
    let outstanding = max_bet.saturating_sub(player.current_bet());
    let stack = player.stack();

    match action {
        ActionType::Fold => {
            if amount != 0 {
                return Err(ActionError::UnexpectedAmount(action));
            }
            Ok(ValidAction { action, chips: 0, is_all_in: false, raise_increment: 0 })
        }
        ActionType::Check => {
            if amount != 0 {
                return Err(ActionError::UnexpectedAmount(action));
            }
            if outstanding > 0 {
                return Err(ActionError::CheckFacingBet { outstanding });
            }
            Ok(ValidAction { action, chips: 0, is_all_in: false, raise_increment: 0 })
        }
        ActionType::Call => {
            if outstanding == 0 {
                return Err(ActionError::NothingToCall);
            }
            if amount != outstanding {
                return Err(ActionError::CallAmountMismatch { expected: outstanding, amount });
            }
            // A call that cannot be covered must come in as an all-in.
            if outstanding > stack {
                return Err(ActionError::InsufficientChips { amount: outstanding, stack });
            }
            Ok(ValidAction {
                action,
                chips: outstanding,
                is_all_in: outstanding == stack,
                raise_increment: 0,
            })
        }
        ActionType::Bet => {
            if max_bet > 0 {
                return Err(ActionError::BetAlreadyMade { max_bet });
            }
            if amount == 0 {
                return Err(ActionError::ZeroBet);
            }
            if amount > stack {
                return Err(ActionError::InsufficientChips { amount, stack });
            }
            Ok(ValidAction {
                action,
                chips: amount,
                is_all_in: amount == stack,
                raise_increment: amount,
            })
        }
        ActionType::Raise => {
            if max_bet == 0 {
                return Err(ActionError::RaiseWithoutBet);
            }
            if amount > stack {
                return Err(ActionError::InsufficientChips { amount, stack });
            }
            let total = player.current_bet() + amount;
            let required = max_bet + min_raise;
            if total < required {
                return Err(ActionError::RaiseBelowMinimum { required, total });
            }
            Ok(ValidAction {
                action,
                chips: amount,
                is_all_in: amount == stack,
                raise_increment: total - max_bet,
            })
        }
        ActionType::AllIn => {
            if stack == 0 {
                return Err(ActionError::CannotAct(player_id.to_string()));
            }
            if amount != stack {
                return Err(ActionError::AllInAmountMismatch { expected: stack, amount });
            }
            let total = player.current_bet() + stack;
            Ok(ValidAction {
                action,
                chips: stack,
                is_all_in: true,
                raise_increment: total.saturating_sub(max_bet),
            })
        }
    }
}
