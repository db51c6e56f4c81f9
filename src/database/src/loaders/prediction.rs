use crate::error::Result;
use crate::loaders::read_json;
use serde::Deserialize;
use std::path::Path;

/// Predicted points for one fixture; a double gameweek has two rows.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionEntity {
    pub player_id: u32,
    pub tag: String,
    pub season: String,
    pub gameweek: u32,
    pub predicted_points: f64,
}

pub struct PredictionLoader;

impl PredictionLoader {
    pub fn load(dir: &Path) -> Result<Vec<PredictionEntity>> {
        read_json(dir, "predictions")
    }
}
