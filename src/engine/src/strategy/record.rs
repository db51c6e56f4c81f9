use crate::transfers::Chip;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one complete (or pruned) strategy, as persisted per leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub total_score: f64,
    /// Discounted points net of the points hit
    pub points_per_gw: BTreeMap<u32, f64>,
    pub players_in: BTreeMap<u32, Vec<u32>>,
    pub players_out: BTreeMap<u32, Vec<u32>>,
    pub cards_played: BTreeMap<u32, Option<Chip>>,
}

/// What happened in a single gameweek of a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct GameweekResult {
    pub gameweek: u32,
    pub score: f64,
    pub points_hit: f64,
    pub players_in: Vec<u32>,
    pub players_out: Vec<u32>,
    pub chip: Option<Chip>,
}

impl GameweekResult {
    pub fn net_score(&self) -> f64 {
        self.score - self.points_hit
    }
}

impl StrategyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gameweeks already processed.
    pub fn depth(&self) -> usize {
        self.points_per_gw.len()
    }

    pub fn record(&mut self, result: GameweekResult) {
        let net = result.net_score();

        self.total_score += net;
        self.points_per_gw.insert(result.gameweek, net);
        self.players_in.insert(result.gameweek, result.players_in);
        self.players_out.insert(result.gameweek, result.players_out);
        self.cards_played.insert(result.gameweek, result.chip);
    }

    pub fn transfer_count(&self) -> usize {
        self.players_in.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_json_shape() {
        let mut record = StrategyRecord::new();
        record.record(GameweekResult {
            gameweek: 5,
            score: 60.0,
            points_hit: 4.0,
            players_in: vec![16, 18],
            players_out: vec![15, 8],
            chip: None,
        });
        record.record(GameweekResult {
            gameweek: 6,
            score: 70.0,
            points_hit: 0.0,
            players_in: vec![],
            players_out: vec![],
            chip: Some(Chip::BenchBoost),
        });

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(json["total_score"], 126.0);
        assert_eq!(json["points_per_gw"]["5"], 56.0);
        assert_eq!(json["players_in"]["5"], serde_json::json!([16, 18]));
        assert_eq!(json["cards_played"]["5"], serde_json::Value::Null);
        assert_eq!(json["cards_played"]["6"], "bench_boost");

        let restored: StrategyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.depth(), 2);
        assert_eq!(restored.transfer_count(), 2);
    }
}
