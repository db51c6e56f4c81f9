use crate::player::Position;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Predicted points keyed by prediction tag, then gameweek.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    by_tag: HashMap<String, BTreeMap<u32, f64>>,
}

impl Predictions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds points for a fixture; several fixtures in one gameweek accumulate.
    pub fn add(&mut self, tag: &str, gameweek: u32, points: f64) {
        *self
            .by_tag
            .entry(tag.to_string())
            .or_default()
            .entry(gameweek)
            .or_insert(0.0) += points;
    }

    pub fn with(mut self, tag: &str, gameweek: u32, points: f64) -> Self {
        self.add(tag, gameweek, points);
        self
    }

    /// Zero when the player has no fixture that gameweek.
    pub fn get(&self, tag: &str, gameweek: u32) -> f64 {
        self.by_tag
            .get(tag)
            .and_then(|gws| gws.get(&gameweek))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn sum(&self, tag: &str, gameweeks: &[u32]) -> f64 {
        gameweeks.iter().map(|&gw| self.get(tag, gw)).sum()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }
}

/// A player bound to a purchase price, as held in (or offered to) a squad.
#[derive(Debug, Clone)]
pub struct CandidatePlayer {
    pub player_id: u32,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub purchase_price: i32,
    pub predictions: Arc<Predictions>,

    pub is_starting: bool,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub sub_position: Option<usize>,
}

impl CandidatePlayer {
    pub fn new(
        player_id: u32,
        name: String,
        team: String,
        position: Position,
        purchase_price: i32,
        predictions: Arc<Predictions>,
    ) -> Self {
        CandidatePlayer {
            player_id,
            name,
            team,
            position,
            purchase_price,
            predictions,
            is_starting: false,
            is_captain: false,
            is_vice_captain: false,
            sub_position: None,
        }
    }

    pub fn predicted_points(&self, tag: &str, gameweek: u32) -> f64 {
        self.predictions.get(tag, gameweek)
    }

    pub fn with_price(mut self, price: i32) -> Self {
        self.purchase_price = price;
        self
    }
}

impl PartialEq for CandidatePlayer {
    fn eq(&self, other: &Self) -> bool {
        self.player_id == other.player_id
    }
}
