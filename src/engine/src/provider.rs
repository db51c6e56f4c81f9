use crate::player::{CandidatePlayer, Position};
use serde::{Deserialize, Serialize};

/// One row of the squad's transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub player_id: u32,
    /// +1 bought, -1 sold
    pub bought_or_sold: i8,
    pub price: i32,
    pub gameweek: u32,
    pub season: String,
    /// Made while a free hit was active; never part of the persistent squad
    #[serde(default)]
    pub free_hit: bool,
}

impl Transaction {
    pub fn is_purchase(&self) -> bool {
        self.bought_or_sold > 0
    }
}

/// A purchasable player plus the points ranking it was sorted by.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub player: CandidatePlayer,
    pub total_points: f64,
}

/// Upstream data the optimizer consumes. Implementations must be shareable
/// between search workers.
pub trait DataProvider: Send + Sync {
    /// Ordered transaction log of the current squad.
    fn transactions(&self) -> Vec<Transaction>;

    /// Players of `position` priced at the first of `gameweeks`, sorted by
    /// points summed over `gameweeks` (descending).
    fn ranked_candidates(
        &self,
        position: Position,
        gameweeks: &[u32],
        tag: &str,
        season: &str,
    ) -> Vec<RankedCandidate>;

    /// A single player priced at `gameweek`.
    fn candidate(&self, player_id: u32, season: &str, gameweek: u32) -> Option<CandidatePlayer>;

    /// Market price with nearest-gameweek interpolation.
    fn price(&self, player_id: u32, season: &str, gameweek: u32) -> Option<i32>;

    /// Free transfers available going into `gameweek`.
    fn free_transfers(&self, gameweek: u32) -> u8;
}
