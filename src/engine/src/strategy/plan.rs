use crate::error::{OptimizerError, Result};
use crate::transfers::{ChipSchedule, TransferDirective};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Gameweek to directive, walked in ascending gameweek order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferPlan {
    directives: BTreeMap<u32, TransferDirective>,
}

impl TransferPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// The do-nothing plan used as the baseline.
    pub fn zero(gameweeks: &[u32]) -> Self {
        gameweeks
            .iter()
            .map(|&gw| (gw, TransferDirective::None))
            .collect()
    }

    pub fn with(mut self, gameweek: u32, directive: TransferDirective) -> Self {
        self.directives.insert(gameweek, directive);
        self
    }

    pub fn gameweeks(&self) -> Vec<u32> {
        self.directives.keys().copied().collect()
    }

    pub fn directives(&self) -> Vec<TransferDirective> {
        self.directives.values().copied().collect()
    }

    pub fn get(&self, gameweek: u32) -> Option<TransferDirective> {
        self.directives.get(&gameweek).copied()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn path_id(&self) -> String {
        path_id(&self.directives())
    }

    /// Checks directives and that no chip is played twice.
    pub fn validate(&self) -> Result<()> {
        let mut seen = Vec::new();

        for directive in self.directives.values() {
            directive.validate()?;

            if let Some(chip) = directive.chip() {
                if seen.contains(&chip) {
                    return Err(OptimizerError::InvalidSettings(format!(
                        "chip {:?} played more than once in {}",
                        chip,
                        self.path_id()
                    )));
                }
                seen.push(chip);
            }
        }

        Ok(())
    }

    /// Where the plan plays bench boost and triple captain.
    pub fn chip_schedule(&self) -> ChipSchedule {
        let mut schedule = ChipSchedule::default();

        for (&gw, directive) in &self.directives {
            match directive {
                TransferDirective::BenchBoost(_) => schedule.bench_boost = Some(gw),
                TransferDirective::TripleCaptain(_) => schedule.triple_captain = Some(gw),
                _ => {}
            }
        }

        schedule
    }
}

impl FromIterator<(u32, TransferDirective)> for TransferPlan {
    fn from_iter<I: IntoIterator<Item = (u32, TransferDirective)>>(iter: I) -> Self {
        TransferPlan {
            directives: iter.into_iter().collect(),
        }
    }
}

/// Parses `gw:directive` pairs separated by commas, e.g. `12:1,13:T0,14:W`.
impl FromStr for TransferPlan {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| -> Result<(u32, TransferDirective)> {
                let (gw, directive) = part
                    .trim()
                    .split_once(':')
                    .ok_or_else(|| OptimizerError::UnrecognizedDirective(part.to_string()))?;
                let gw: u32 = gw
                    .parse()
                    .map_err(|_| OptimizerError::UnrecognizedDirective(part.to_string()))?;
                let directive: TransferDirective = directive.parse()?;
                Ok((gw, directive))
            })
            .collect()
    }
}

/// Dash-joined directive tokens naming a strategy path, e.g. `1-0-W`.
pub fn path_id(directives: &[TransferDirective]) -> String {
    directives
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("-")
}

/// Seed for the tree node at `path_id`; identical paths always draw the
/// same random numbers, whichever worker processes them.
pub fn node_seed(seed: u64, path_id: &str) -> u64 {
    path_id
        .bytes()
        .fold(seed, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_id_joins_tokens() {
        let plan = TransferPlan::new()
            .with(3, TransferDirective::Wildcard)
            .with(1, TransferDirective::Count(1))
            .with(2, TransferDirective::BenchBoost(0));

        assert_eq!(plan.path_id(), "1-B0-W");
        assert_eq!(plan.gameweeks(), vec![1, 2, 3]);
        assert_eq!(TransferPlan::zero(&[4, 5, 6]).path_id(), "0-0-0");
    }

    #[test]
    fn parses_plan_text() {
        let plan: TransferPlan = "12:1, 13:T0,14:W".parse().unwrap();

        assert_eq!(plan.get(12), Some(TransferDirective::Count(1)));
        assert_eq!(plan.get(13), Some(TransferDirective::TripleCaptain(0)));
        assert_eq!(plan.get(14), Some(TransferDirective::Wildcard));
        assert!("12-1".parse::<TransferPlan>().is_err());
        assert!("12:T2".parse::<TransferPlan>().is_err());
    }

    #[test]
    fn chip_schedule_and_validation() {
        let plan = TransferPlan::new()
            .with(1, TransferDirective::TripleCaptain(1))
            .with(2, TransferDirective::BenchBoost(0));

        assert!(plan.validate().is_ok());
        assert_eq!(
            plan.chip_schedule(),
            ChipSchedule {
                bench_boost: Some(2),
                triple_captain: Some(1),
            }
        );

        let twice = TransferPlan::new()
            .with(1, TransferDirective::Wildcard)
            .with(2, TransferDirective::Wildcard);
        assert!(matches!(twice.validate(), Err(OptimizerError::InvalidSettings(_))));
    }

    #[test]
    fn node_seed_depends_on_path() {
        assert_eq!(node_seed(7, "1-0"), node_seed(7, "1-0"));
        assert_ne!(node_seed(7, "1-0"), node_seed(7, "0-1"));
        assert_ne!(node_seed(7, "1-0"), node_seed(8, "1-0"));
    }
}
