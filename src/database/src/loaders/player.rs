use crate::error::Result;
use crate::loaders::read_json;
use engine::Position;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEntity {
    pub player_id: u32,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<PlayerAttributesEntity>,
}

/// A player's team, position and price as recorded in one gameweek.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerAttributesEntity {
    pub season: String,
    pub gameweek: u32,
    pub team: String,
    pub position: Position,
    pub price: i32,
}

pub struct PlayerLoader;

impl PlayerLoader {
    pub fn load(dir: &Path) -> Result<Vec<PlayerEntity>> {
        read_json(dir, "players")
    }
}
