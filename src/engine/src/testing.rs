//! Fixture data shared by the engine's unit tests.
//!
//! The squad is small enough to score by hand: in gameweeks 1 and 2 every
//! player predicts the same points, the best lineup is 4-5-1 worth 52, and
//! the forward on 6 points captains for 58 in total.
//!
//! Under [`SWING_TAG`] two outsiders peak in different gameweeks: forward 16
//! scores 10 then nothing, defender 19 scores 4 then 12. Everyone else
//! predicts as under [`TAG`].

use crate::player::{CandidatePlayer, Position, Predictions};
use crate::provider::{DataProvider, RankedCandidate, Transaction};
use crate::squad::SquadState;
use std::cmp::Ordering;
use std::sync::Arc;

pub const TAG: &str = "v1";
pub const SWING_TAG: &str = "v2";
pub const SEASON: &str = "2425";
pub const MOCK_BUDGET: i32 = 975;

const GAMEWEEKS: [u32; 2] = [1, 2];

// id, points in each of GAMEWEEKS under SWING_TAG
const SWINGS: [(u32, [f64; 2]); 2] = [(16, [10.0, 0.0]), (19, [4.0, 12.0])];

// id, team, position, price, points per gameweek
const ROSTER: [(u32, &str, Position, i32, f64); 20] = [
    (1, "ARS", Position::Goalkeeper, 50, 5.0),
    (2, "BOU", Position::Goalkeeper, 40, 1.0),
    (3, "BRE", Position::Defender, 50, 4.0),
    (4, "BHA", Position::Defender, 50, 4.0),
    (5, "CHE", Position::Defender, 50, 4.0),
    (6, "CRY", Position::Defender, 50, 4.0),
    (7, "EVE", Position::Defender, 50, 4.0),
    (8, "FUL", Position::Midfielder, 70, 5.0),
    (9, "LIV", Position::Midfielder, 70, 5.0),
    (10, "MCI", Position::Midfielder, 70, 5.0),
    (11, "MUN", Position::Midfielder, 70, 5.0),
    (12, "NEW", Position::Midfielder, 70, 5.0),
    (13, "NFO", Position::Forward, 80, 6.0),
    (14, "TOT", Position::Forward, 60, 3.0),
    (15, "WHU", Position::Forward, 80, 2.0),
    // not in the starting squad
    (16, "WOL", Position::Forward, 145, 8.0),
    (17, "AVL", Position::Forward, 200, 10.0),
    (18, "LEI", Position::Midfielder, 140, 9.0),
    (19, "IPS", Position::Defender, 55, 4.5),
    (20, "SOU", Position::Goalkeeper, 45, 3.0),
];

pub fn candidate(player_id: u32, position: Position, team: &str, price: i32) -> CandidatePlayer {
    CandidatePlayer::new(
        player_id,
        format!("Player {}", player_id),
        team.to_string(),
        position,
        price,
        Arc::new(Predictions::new()),
    )
}

pub struct MockProvider {
    players: Vec<CandidatePlayer>,
}

impl MockProvider {
    pub fn new() -> Self {
        let players = ROSTER
            .iter()
            .map(|&(id, team, position, price, points)| {
                let mut predictions = Predictions::new();
                let swing = SWINGS.iter().find(|(swing_id, _)| *swing_id == id);
                for (index, gw) in GAMEWEEKS.into_iter().enumerate() {
                    predictions.add(TAG, gw, points);
                    predictions.add(SWING_TAG, gw, swing.map_or(points, |(_, by_gw)| by_gw[index]));
                }

                CandidatePlayer::new(
                    id,
                    format!("Player {}", id),
                    team.to_string(),
                    position,
                    price,
                    Arc::new(predictions),
                )
            })
            .collect();

        MockProvider { players }
    }
}

impl DataProvider for MockProvider {
    fn transactions(&self) -> Vec<Transaction> {
        self.players
            .iter()
            .filter(|p| p.player_id <= 15)
            .map(|p| Transaction {
                player_id: p.player_id,
                bought_or_sold: 1,
                price: p.purchase_price,
                gameweek: 1,
                season: SEASON.to_string(),
                free_hit: false,
            })
            .collect()
    }

    fn ranked_candidates(
        &self,
        position: Position,
        gameweeks: &[u32],
        tag: &str,
        _season: &str,
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = self
            .players
            .iter()
            .filter(|p| p.position == position)
            .map(|p| RankedCandidate {
                player: p.clone(),
                total_points: p.predictions.sum(tag, gameweeks),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.total_points
                .partial_cmp(&a.total_points)
                .unwrap_or(Ordering::Equal)
        });

        ranked
    }

    fn candidate(&self, player_id: u32, _season: &str, _gameweek: u32) -> Option<CandidatePlayer> {
        self.players.iter().find(|p| p.player_id == player_id).cloned()
    }

    fn price(&self, player_id: u32, _season: &str, _gameweek: u32) -> Option<i32> {
        self.players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| p.purchase_price)
    }

    fn free_transfers(&self, _gameweek: u32) -> u8 {
        1
    }
}

pub fn mock_squad() -> SquadState {
    let provider = MockProvider::new();
    let mut squad = SquadState::new(MOCK_BUDGET);

    for id in 1..=15 {
        let player = provider.candidate(id, SEASON, 1).expect("roster player");
        assert!(squad.add_player(player, None, true, true));
    }

    squad
}
