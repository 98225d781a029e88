//! Showdown resolution: rank the live hands and pay out every pot.

use std::collections::BTreeMap;

use crate::evaluator::{evaluate_holdem, EvalError, Evaluation};
use crate::hand::Board;
use crate::player::PlayerState;
use crate::pot::{Pot, PotStructure};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShowdownError {
    #[error("showdown requires 5 community cards, got {0}")]
    IncompleteBoard(usize),
    #[error("player '{0}' reached showdown without hole cards")]
    MissingHoleCards(String),
    #[error("pot of {0} has no eligible winner")]
    NoEligibleWinner(u64),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// One contender's evaluated holding at showdown.
#[derive(Debug, Clone)]
struct Contender {
    player_id: String,
    seat_number: usize,
    evaluation: Evaluation,
}

/// Resolve every pot and return the payout per player.
///
/// With only one player still contesting the hand, everything is theirs
/// and no cards are evaluated (the board may be short of five cards when
/// everyone else folded early). Otherwise each live hand is ranked and
/// every pot goes to the strongest eligible holdings, split evenly, with
/// any odd chips going to the winners in ascending seat order.
pub fn determine_winners(
    players: &[PlayerState],
    board: &Board,
    structure: &PotStructure,
) -> Result<BTreeMap<String, u64>, ShowdownError> {
    let live: Vec<&PlayerState> = players.iter().filter(|p| p.is_in_hand()).collect();

    let mut payouts: BTreeMap<String, u64> = BTreeMap::new();

    if live.len() == 1 {
        payouts.insert(live[0].player_id().to_string(), structure.total());
        return Ok(payouts);
    }

    if board.len() != 5 {
        return Err(ShowdownError::IncompleteBoard(board.len()));
    }

    let mut contenders = Vec::with_capacity(live.len());
    for p in live {
        let hole = p
            .hole_cards()
            .ok_or_else(|| ShowdownError::MissingHoleCards(p.player_id().to_string()))?;
        contenders.push(Contender {
            player_id: p.player_id().to_string(),
            seat_number: p.seat_number(),
            evaluation: evaluate_holdem(&hole, board)?,
        });
    }

    for pot in structure.all_pots() {
        if pot.amount == 0 {
            continue;
        }
        award_pot(pot, &contenders, players, &mut payouts)?;
    }
    Ok(payouts)
}

fn award_pot(
    pot: &Pot,
    contenders: &[Contender],
    players: &[PlayerState],
    payouts: &mut BTreeMap<String, u64>,
) -> Result<(), ShowdownError> {
    let eligible: Vec<&Contender> = contenders
        .iter()
        .filter(|c| pot.eligible.iter().any(|id| id == &c.player_id))
        .collect();

    let mut winners: Vec<(String, usize)> = if let Some(best) =
        eligible.iter().map(|c| c.evaluation.value()).max()
    {
        eligible
            .iter()
            .filter(|c| c.evaluation.value() == best)
            .map(|c| (c.player_id.clone(), c.seat_number))
            .collect()
    } else {
        // Every eligible player mucked before showdown. Should not happen
        // through normal play; split the chips back rather than burn them.
        pot.eligible
            .iter()
            .map(|id| {
                let seat = players
                    .iter()
                    .find(|p| p.player_id() == *id)
                    .map(|p| p.seat_number())
                    .unwrap_or(usize::MAX);
                (id.clone(), seat)
            })
            .collect()
    };

    if winners.is_empty() {
        return Err(ShowdownError::NoEligibleWinner(pot.amount));
    }

    winners.sort_by_key(|&(_, seat)| seat);
    let share = pot.amount / winners.len() as u64;
    let mut remainder = pot.amount % winners.len() as u64;
    for (id, _) in winners {
        let extra = if remainder > 0 {
            remainder -= 1;
            1
        } else {
            0
        };
        *payouts.entry(id).or_insert(0) += share + extra;
    }
    Ok(())
}
