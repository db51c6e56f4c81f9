use crate::strategy::StrategyRecord;
use chrono::Local;
use serde::{Deserialize, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recommended purchase or sale, as handed to downstream storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSuggestion {
    pub player_id: u32,
    /// +1 buy, -1 sell
    pub in_or_out: i8,
    pub gameweek: u32,
    /// Best strategy score minus the do-nothing score; same for every row of a run
    pub points_gain: f64,
    pub tag: String,
    pub season: String,
    pub timestamp: String,
}

impl TransferSuggestion {
    pub fn is_purchase(&self) -> bool {
        self.in_or_out > 0
    }

    /// Flattens a strategy into rows: per gameweek in ascending order, sales
    /// before purchases.
    pub fn from_strategy(
        record: &StrategyRecord,
        points_gain: f64,
        tag: &str,
        season: &str,
        timestamp: &str,
    ) -> Vec<TransferSuggestion> {
        let row = |player_id: u32, in_or_out: i8, gameweek: u32| TransferSuggestion {
            player_id,
            in_or_out,
            gameweek,
            points_gain,
            tag: tag.to_string(),
            season: season.to_string(),
            timestamp: timestamp.to_string(),
        };

        let mut gameweeks: Vec<u32> = record
            .players_out
            .keys()
            .chain(record.players_in.keys())
            .copied()
            .collect();
        gameweeks.sort_unstable();
        gameweeks.dedup();

        let mut rows = Vec::new();
        for gameweek in gameweeks {
            if let Some(sold) = record.players_out.get(&gameweek) {
                rows.extend(sold.iter().map(|&id| row(id, -1, gameweek)));
            }
            if let Some(bought) = record.players_in.get(&gameweek) {
                rows.extend(bought.iter().map(|&id| row(id, 1, gameweek)));
            }
        }

        rows
    }
}

/// Timestamp shared by every suggestion row of one run.
pub fn run_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
