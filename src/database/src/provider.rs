use crate::loaders::{DatabaseEntity, FreeTransfersEntity, PlayerAttributesEntity, PlayerEntity};
use engine::{CandidatePlayer, DataProvider, Position, Predictions, RankedCandidate, Transaction, TransferDirective};
use log::warn;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

struct PlayerData {
    name: String,
    attributes: Vec<PlayerAttributesEntity>,
    predictions: Arc<Predictions>,
}

impl PlayerData {
    fn season_attributes<'a>(&'a self, season: &str) -> impl Iterator<Item = &'a PlayerAttributesEntity> {
        self.attributes.iter().filter(move |a| a.season == season)
    }

    /// Closest records strictly before and after `gameweek`, or the exact one.
    fn nearest(&self, season: &str, gameweek: u32) -> Nearest<'_> {
        let mut before: Option<&PlayerAttributesEntity> = None;
        let mut after: Option<&PlayerAttributesEntity> = None;

        for attr in self.season_attributes(season) {
            match attr.gameweek.cmp(&gameweek) {
                Ordering::Equal => return Nearest::Exact(attr),
                Ordering::Less if before.is_none_or(|b| attr.gameweek > b.gameweek) => before = Some(attr),
                Ordering::Greater if after.is_none_or(|a| attr.gameweek < a.gameweek) => after = Some(attr),
                _ => {}
            }
        }

        Nearest::Between(before, after)
    }

    fn position(&self, season: &str) -> Option<Position> {
        self.season_attributes(season).next().map(|a| a.position)
    }

    fn team(&self, season: &str, gameweek: u32) -> Option<&str> {
        match self.nearest(season, gameweek) {
            Nearest::Exact(attr) => Some(&attr.team),
            Nearest::Between(Some(before), Some(after)) => {
                // ties go to the earlier record
                if after.gameweek - gameweek >= gameweek - before.gameweek {
                    Some(&before.team)
                } else {
                    Some(&after.team)
                }
            }
            Nearest::Between(Some(only), None) | Nearest::Between(None, Some(only)) => Some(&only.team),
            Nearest::Between(None, None) => None,
        }
    }

    fn price(&self, season: &str, gameweek: u32) -> Option<i32> {
        match self.nearest(season, gameweek) {
            Nearest::Exact(attr) => Some(attr.price),
            Nearest::Between(Some(before), Some(after)) => Some(interpolate_price(
                (before.gameweek, before.price),
                (after.gameweek, after.price),
                gameweek,
            )),
            Nearest::Between(Some(only), None) | Nearest::Between(None, Some(only)) => Some(only.price),
            Nearest::Between(None, None) => None,
        }
    }
}

enum Nearest<'a> {
    Exact(&'a PlayerAttributesEntity),
    Between(Option<&'a PlayerAttributesEntity>, Option<&'a PlayerAttributesEntity>),
}

/// Linear interpolation between two price points, rounded to the nearest unit.
pub fn interpolate_price(before: (u32, i32), after: (u32, i32), gameweek: u32) -> i32 {
    let (gw_before, price_before) = (before.0 as f64, before.1 as f64);
    let (gw_after, price_after) = (after.0 as f64, after.1 as f64);

    let gradient = (price_after - price_before) / (gw_after - gw_before);
    (price_before + gradient * (gameweek as f64 - gw_before)).round() as i32
}

/// File-backed upstream data for one season.
pub struct DatabaseProvider {
    season: String,
    players: HashMap<u32, PlayerData>,
    transactions: Vec<Transaction>,
    free_transfers: Option<FreeTransfersEntity>,
}

impl DatabaseProvider {
    pub fn new(data: DatabaseEntity, season: &str) -> Self {
        let mut predictions: HashMap<u32, Predictions> = HashMap::new();
        for row in data.predictions.iter().filter(|p| p.season == season) {
            predictions
                .entry(row.player_id)
                .or_default()
                .add(&row.tag, row.gameweek, row.predicted_points);
        }

        let players = data
            .players
            .into_iter()
            .map(|PlayerEntity { player_id, name, attributes }| {
                let player_predictions = predictions.remove(&player_id).unwrap_or_default();
                (
                    player_id,
                    PlayerData {
                        name,
                        attributes,
                        predictions: Arc::new(player_predictions),
                    },
                )
            })
            .collect();

        let transactions = data
            .transactions
            .into_iter()
            .filter(|t| t.season == season)
            .collect();

        DatabaseProvider {
            season: season.to_string(),
            players,
            transactions,
            free_transfers: data.free_transfers,
        }
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn player_name(&self, player_id: u32) -> Option<&str> {
        self.players.get(&player_id).map(|p| p.name.as_str())
    }

    fn build_candidate(&self, player_id: u32, data: &PlayerData, season: &str, gameweek: u32) -> Option<CandidatePlayer> {
        let Some(position) = data.position(season) else {
            warn!("no position for {} in season {}", data.name, season);
            return None;
        };
        let Some(team) = data.team(season, gameweek) else {
            warn!("no team for {} in season {}", data.name, season);
            return None;
        };
        let Some(price) = data.price(season, gameweek) else {
            warn!("no price for {} in season {}", data.name, season);
            return None;
        };

        Some(CandidatePlayer::new(
            player_id,
            data.name.clone(),
            team.to_string(),
            position,
            price,
            Arc::clone(&data.predictions),
        ))
    }

    /// Replays the purchase history: one transfer accrues per gameweek, at
    /// most two carry over, and the gameweek the squad was picked is free.
    fn free_transfers_from_history(&self, gameweek: u32) -> u8 {
        let mut purchases: HashMap<u32, u8> = HashMap::new();
        for transaction in self.transactions.iter().filter(|t| t.is_purchase() && !t.free_hit) {
            let count = purchases.entry(transaction.gameweek).or_insert(0);
            *count = count.saturating_add(1);
        }

        let Some(&first) = purchases.keys().min() else {
            return 1;
        };

        let mut free_transfers = 1;
        for gw in (first + 1)..gameweek {
            let made = purchases.get(&gw).copied().unwrap_or(0);
            free_transfers = TransferDirective::from_count(made).free_transfers_next(free_transfers);
        }

        free_transfers
    }
}

impl DataProvider for DatabaseProvider {
    fn transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    fn ranked_candidates(&self, position: Position, gameweeks: &[u32], tag: &str, season: &str) -> Vec<RankedCandidate> {
        let Some(&price_gameweek) = gameweeks.first() else {
            return Vec::new();
        };

        let mut ranked: Vec<RankedCandidate> = self
            .players
            .iter()
            .filter(|(_, data)| data.predictions.has_tag(tag) && data.position(season) == Some(position))
            .filter_map(|(&id, data)| {
                let player = self.build_candidate(id, data, season, price_gameweek)?;
                let total_points = data.predictions.sum(tag, gameweeks);
                Some(RankedCandidate { player, total_points })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.total_points
                .total_cmp(&a.total_points)
                .then(a.player.player_id.cmp(&b.player.player_id))
        });

        ranked
    }

    fn candidate(&self, player_id: u32, season: &str, gameweek: u32) -> Option<CandidatePlayer> {
        let data = self.players.get(&player_id)?;
        self.build_candidate(player_id, data, season, gameweek)
    }

    fn price(&self, player_id: u32, season: &str, gameweek: u32) -> Option<i32> {
        let price = self.players.get(&player_id)?.price(season, gameweek);
        if price.is_none() {
            warn!("no price for player {} in season {}", player_id, season);
        }
        price
    }

    fn free_transfers(&self, gameweek: u32) -> u8 {
        if let Some(count) = self.free_transfers.as_ref().and_then(|ft| ft.get(&gameweek)) {
            return *count;
        }

        self.free_transfers_from_history(gameweek)
    }
}
