use crate::error::{OptimizerError, Result};
use crate::squad::DEFAULT_BUDGET;
use crate::transfers::MAX_FREE_TRANSFERS;
use serde::{Deserialize, Serialize};

/// Chips the tree search may play once anywhere in the horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipSet {
    pub wildcard: bool,
    pub free_hit: bool,
    pub triple_captain: bool,
    pub bench_boost: bool,
}

impl ChipSet {
    pub fn none() -> Self {
        ChipSet::default()
    }

    pub fn any(&self) -> bool {
        self.wildcard || self.free_hit || self.triple_captain || self.bench_boost
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountMode {
    #[default]
    Exponential,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountSettings {
    pub mode: DiscountMode,
    pub rate: f64,
}

impl Default for DiscountSettings {
    fn default() -> Self {
        DiscountSettings {
            mode: DiscountMode::Exponential,
            rate: 14.0 / 15.0,
        }
    }
}

/// Run-level parameters of one optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    pub gameweeks: Vec<u32>,
    pub season: String,
    pub tag: String,
    pub chips: ChipSet,
    /// Overrides the count derived from the transaction log
    pub free_transfers: Option<u8>,
    pub num_iterations: usize,
    pub max_repair_attempts: usize,
    pub rebuild_max_retries: usize,
    pub workers: usize,
    pub discount: DiscountSettings,
    pub seed: u64,
    pub poll_interval_ms: u64,
    pub starting_budget: i32,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        OptimizationSettings {
            gameweeks: Vec::new(),
            season: String::new(),
            tag: String::new(),
            chips: ChipSet::none(),
            free_transfers: None,
            num_iterations: 100,
            max_repair_attempts: 100,
            rebuild_max_retries: 500,
            workers: 4,
            discount: DiscountSettings::default(),
            seed: 0,
            poll_interval_ms: 50,
            starting_budget: DEFAULT_BUDGET,
        }
    }
}

impl OptimizationSettings {
    pub fn validate(&self) -> Result<()> {
        if self.gameweeks.is_empty() {
            return Err(OptimizerError::InvalidSettings(
                "at least one gameweek is required".to_string(),
            ));
        }

        if self.gameweeks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OptimizerError::InvalidSettings(format!(
                "gameweeks must be strictly increasing: {:?}",
                self.gameweeks
            )));
        }

        if let Some(free) = self.free_transfers
            && !(1..=MAX_FREE_TRANSFERS).contains(&free)
        {
            return Err(OptimizerError::InvalidSettings(format!(
                "free transfers must be 1 or 2, got {}",
                free
            )));
        }

        if self.workers == 0 {
            return Err(OptimizerError::InvalidSettings(
                "at least one worker is required".to_string(),
            ));
        }

        if !(self.discount.rate > 0.0 && self.discount.rate <= 1.0) {
            return Err(OptimizerError::InvalidSettings(format!(
                "discount rate must be in (0, 1], got {}",
                self.discount.rate
            )));
        }

        if self.tag.is_empty() {
            return Err(OptimizerError::InvalidSettings(
                "prediction tag is required".to_string(),
            ));
        }

        Ok(())
    }

    pub fn first_gameweek(&self) -> u32 {
        self.gameweeks.first().copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> OptimizationSettings {
        OptimizationSettings {
            gameweeks: vec![10, 11, 12],
            tag: "v1".to_string(),
            season: "2425".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_valid_once_horizon_is_set() {
        assert!(settings().validate().is_ok());
        assert_eq!(settings().discount.mode, DiscountMode::Exponential);
        assert!(!settings().chips.any());
    }

    #[test]
    fn rejects_bad_horizon() {
        let mut s = settings();
        s.gameweeks = vec![];
        assert!(s.validate().is_err());

        s.gameweeks = vec![3, 3];
        assert!(s.validate().is_err());

        s.gameweeks = vec![5, 4];
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut s = settings();
        s.free_transfers = Some(3);
        assert!(matches!(s.validate(), Err(OptimizerError::InvalidSettings(_))));

        let mut s = settings();
        s.workers = 0;
        assert!(s.validate().is_err());

        let mut s = settings();
        s.discount.rate = 1.5;
        assert!(s.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let s: OptimizationSettings = serde_json::from_str(
            r#"{"gameweeks": [1, 2], "tag": "v1", "chips": {"wildcard": true}, "discount": {"mode": "constant"}}"#,
        )
        .unwrap();

        assert!(s.chips.wildcard);
        assert!(!s.chips.free_hit);
        assert_eq!(s.discount.mode, DiscountMode::Constant);
        assert_eq!(s.discount.rate, 14.0 / 15.0);
        assert_eq!(s.num_iterations, 100);
        assert_eq!(s.workers, 4);
    }
}
