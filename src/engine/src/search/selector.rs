use crate::error::{OptimizerError, Result};
use crate::search::LeafStore;
use crate::strategy::{path_id, StrategyRecord};
use crate::transfers::TransferDirective;
use log::{info, warn};
use rayon::prelude::*;
use std::cmp::Ordering;

/// The winning strategy of a run and how it compares to standing still.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub path_id: String,
    pub best: StrategyRecord,
    pub baseline_score: f64,
}

impl Selection {
    pub fn points_gain(&self) -> f64 {
        self.best.total_score - self.baseline_score
    }
}

pub struct ResultSelector;

impl ResultSelector {
    /// Picks the highest-scoring leaf for `tag` (the smallest path id on a
    /// tie) and looks up the all-zero baseline leaf.
    pub fn select(store: &dyn LeafStore, tag: &str, num_gameweeks: usize) -> Result<Selection> {
        let leaves = store.load_all(tag)?;

        let (best_id, best) = leaves
            .par_iter()
            .reduce_with(|a, b| match a.1.total_score.total_cmp(&b.1.total_score) {
                Ordering::Greater => a,
                Ordering::Less => b,
                Ordering::Equal if a.0 <= b.0 => a,
                Ordering::Equal => b,
            })
            .ok_or_else(|| OptimizerError::NoStrategies(tag.to_string()))?;

        let baseline_id = path_id(&vec![TransferDirective::None; num_gameweeks]);
        let baseline_score = match leaves.iter().find(|(id, _)| *id == baseline_id) {
            Some((_, record)) => record.total_score,
            None => {
                warn!("baseline strategy {} not found for tag {}, using 0", baseline_id, tag);
                0.0
            }
        };

        info!(
            "best strategy {} scores {:.2} ({:+.2} over baseline) out of {} strategies",
            best_id,
            best.total_score,
            best.total_score - baseline_score,
            leaves.len()
        );

        Ok(Selection {
            path_id: best_id.clone(),
            best: best.clone(),
            baseline_score,
        })
    }
}
