//! Chip custody: per-player contribution ledger and the main/side pot
//! layering computed from it.
//!
//! Pots are not built incrementally. Every chip a player commits is
//! recorded against their ledger entry, and the main/side structure is
//! derived in one pass when betting ends. All-in contribution totals
//! define the side-pot thresholds.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PotError {
    #[error("player '{0}' is not in the pot ledger")]
    UnknownPlayer(String),
}

/// A single pot with the players who can win it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: u64,
    pub eligible: Vec<String>,
}

/// Finalized pot layering: the main pot plus zero or more side pots,
/// ordered from lowest all-in threshold upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotStructure {
    pub main: Pot,
    pub side_pots: Vec<Pot>,
}

impl PotStructure {
    pub fn total(&self) -> u64 {
        self.main.amount + self.side_pots.iter().map(|p| p.amount).sum::<u64>()
    }

    /// Main pot followed by side pots, in award order.
    pub fn all_pots(&self) -> impl Iterator<Item = &Pot> {
        std::iter::once(&self.main).chain(self.side_pots.iter())
    }
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    player_id: String,
    contributed: u64,
    all_in: bool,
    folded: bool,
}

/// Tracks every contribution for one hand and derives the pot structure.
#[derive(Debug, Clone)]
pub struct PotManager {
    entries: Vec<LedgerEntry>,
}

impl PotManager {
    /// Open a ledger for the players dealt into the hand, in seat order.
    pub fn new<I, S>(player_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: player_ids
                .into_iter()
                .map(|id| LedgerEntry {
                    player_id: id.into(),
                    contributed: 0,
                    all_in: false,
                    folded: false,
                })
                .collect(),
        }
    }

    fn entry_mut(&mut self, player_id: &str) -> Result<&mut LedgerEntry, PotError> {
        self.entries
            .iter_mut()
            .find(|e| e.player_id == player_id)
            .ok_or_else(|| PotError::UnknownPlayer(player_id.to_string()))
    }

    /// Record chips the player just committed (blind, call, bet, raise).
    pub fn add_contribution(&mut self, player_id: &str, amount: u64) -> Result<(), PotError> {
        self.entry_mut(player_id)?.contributed += amount;
        Ok(())
    }

    /// Mark the player's contribution as capped at its current total.
    pub fn mark_all_in(&mut self, player_id: &str) -> Result<(), PotError> {
        self.entry_mut(player_id)?.all_in = true;
        Ok(())
    }

    /// Folded players keep their chips in the pot but win nothing.
    pub fn mark_folded(&mut self, player_id: &str) -> Result<(), PotError> {
        self.entry_mut(player_id)?.folded = true;
        Ok(())
    }

    pub fn contributed(&self, player_id: &str) -> u64 {
        self.entries
            .iter()
            .find(|e| e.player_id == player_id)
            .map(|e| e.contributed)
            .unwrap_or(0)
    }

    /// Every chip committed this hand.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.contributed).sum()
    }

    /// Derive the main/side pot layering.
    ///
    /// Thresholds are the distinct all-in contribution totals in ascending
    /// order, then the overall maximum contribution. Each layer collects,
    /// from every contributor, the slice of their contribution between the
    /// previous threshold and this one; a player is eligible for a layer
    /// only if they are not folded and contributed at least its threshold.
    ///
    /// Conservation: the layer amounts always sum to [`total`](Self::total).
    pub fn finalize(&self) -> PotStructure {
        let mut thresholds: Vec<u64> = self
            .entries
            .iter()
            .filter(|e| e.all_in && e.contributed > 0)
            .map(|e| e.contributed)
            .collect();
        if let Some(max) = self.entries.iter().map(|e| e.contributed).max() {
            if max > 0 {
                thresholds.push(max);
            }
        }
        thresholds.sort_unstable();
        thresholds.dedup();

        let mut pots = Vec::new();
        let mut prev = 0u64;
        for level in thresholds {
            let amount: u64 = self
                .entries
                .iter()
                .map(|e| e.contributed.min(level) - e.contributed.min(prev))
                .sum();
            let eligible: Vec<String> = self
                .entries
                .iter()
                .filter(|e| !e.folded && e.contributed >= level)
                .map(|e| e.player_id.clone())
                .collect();
            if amount > 0 {
                pots.push(Pot { amount, eligible });
            }
            prev = level;
        }

        let mut iter = pots.into_iter();
        let main = iter.next().unwrap_or(Pot { amount: 0, eligible: Vec::new() });
        PotStructure { main, side_pots: iter.collect() }
    }
}
