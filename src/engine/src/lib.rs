pub mod error;
pub mod player;
pub mod provider;
pub mod search;
pub mod settings;
pub mod squad;
pub mod strategy;
pub mod suggestion;
pub mod transfers;

#[cfg(test)]
mod testing;

pub use error::{OptimizerError, Result};
pub use player::{CandidatePlayer, Position, Predictions};
pub use provider::{DataProvider, RankedCandidate, Transaction};
pub use search::{
    expected_leaf_count, FileLeafStore, LeafStore, MemoryLeafStore, ResultSelector, SearchSummary, Selection,
    StrategyTreeSearch,
};
pub use settings::{ChipSet, DiscountMode, DiscountSettings, OptimizationSettings};
pub use squad::{SquadState, DEFAULT_BUDGET};
pub use strategy::{Evaluation, StrategyEvaluator, StrategyRecord, TransferPlan};
pub use suggestion::{run_timestamp, TransferSuggestion};
pub use transfers::{Chip, SearchContext, TransferDirective};
