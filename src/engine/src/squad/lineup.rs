use crate::error::{OptimizerError, Result};
use crate::player::Position;
use crate::squad::SquadState;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Outfield split of a starting eleven (the goalkeeper is implied).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Formation {
    pub const fn new(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Formation {
            defenders,
            midfielders,
            forwards,
        }
    }

    pub fn starters(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => 1,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn formation_description(&self) -> String {
        format!("{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Every legal formation, in evaluation order.
pub const FORMATIONS: [Formation; 7] = [
    Formation::new(3, 4, 3),
    Formation::new(3, 5, 2),
    Formation::new(4, 3, 3),
    Formation::new(4, 4, 2),
    Formation::new(4, 5, 1),
    Formation::new(5, 4, 1),
    Formation::new(5, 3, 2),
];

impl SquadState {
    /// Picks the best starting eleven for `gameweek` and orders the bench.
    /// Returns the chosen formation and the starters' total (no captain bonus).
    pub fn optimize_lineup(&mut self, gameweek: u32, tag: &str) -> Result<(Formation, f64)> {
        if !self.is_complete() {
            return Err(OptimizerError::IncompleteSquad(self.len()));
        }

        let players = self.players();
        let points: Vec<f64> = players
            .iter()
            .map(|p| p.predicted_points(tag, gameweek))
            .collect();

        // per-position player indices, best first; stable so ties keep squad order
        let mut by_position: [Vec<usize>; 4] = Default::default();
        for (index, player) in players.iter().enumerate() {
            by_position[player.position.index()].push(index);
        }
        for indices in by_position.iter_mut() {
            indices.sort_by(|&a, &b| descending(points[a], points[b]));
        }

        let goalkeeper_points = points[by_position[Position::Goalkeeper.index()][0]];

        let mut best: Option<(Formation, f64)> = None;
        for formation in FORMATIONS {
            let outfield: f64 = [Position::Defender, Position::Midfielder, Position::Forward]
                .iter()
                .map(|&position| {
                    by_position[position.index()]
                        .iter()
                        .take(formation.starters(position))
                        .map(|&i| points[i])
                        .sum::<f64>()
                })
                .sum();

            let score = goalkeeper_points + outfield;

            // later formations win ties
            if best.is_none_or(|(_, best_score)| score >= best_score) {
                best = Some((formation, score));
            }
        }

        let Some((formation, score)) = best else {
            return Err(OptimizerError::IncompleteSquad(self.len()));
        };

        let mut starting = vec![false; points.len()];
        for position in Position::ALL {
            for &index in by_position[position.index()].iter().take(formation.starters(position)) {
                starting[index] = true;
            }
        }

        let mut bench: Vec<usize> = (0..points.len()).filter(|&i| !starting[i]).collect();
        bench.sort_by(|&a, &b| descending(points[a], points[b]));

        let players = self.players_mut();
        for (index, player) in players.iter_mut().enumerate() {
            player.is_starting = starting[index];
            player.sub_position = None;
        }
        for (sub_position, &index) in bench.iter().enumerate() {
            players[index].sub_position = Some(sub_position);
        }

        Ok((formation, score))
    }

    /// Highest predicted scorer captains, second highest is vice-captain.
    pub fn pick_captains(&mut self, gameweek: u32, tag: &str) {
        let mut ranked: Vec<(usize, f64)> = self
            .players()
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.predicted_points(tag, gameweek)))
            .collect();
        ranked.sort_by(|a, b| descending(a.1, b.1));

        let players = self.players_mut();
        for player in players.iter_mut() {
            player.is_captain = false;
            player.is_vice_captain = false;
        }

        if let Some(&(captain, _)) = ranked.first() {
            players[captain].is_captain = true;
        }
        if let Some(&(vice_captain, _)) = ranked.get(1) {
            players[vice_captain].is_vice_captain = true;
        }
    }

    /// Expected points for `gameweek` with an optimized lineup: starters plus
    /// the captain bonus, plus the bench when bench boost is active.
    pub fn get_expected_points(
        &mut self,
        gameweek: u32,
        tag: &str,
        bench_boost: bool,
        triple_captain: bool,
    ) -> Result<f64> {
        self.optimize_lineup(gameweek, tag)?;
        self.pick_captains(gameweek, tag);

        let mut total = 0.0;
        for player in self.players() {
            let points = player.predicted_points(tag, gameweek);

            if player.is_starting {
                total += points;
                if player.is_captain {
                    total += points;
                    if triple_captain {
                        total += points;
                    }
                }
            } else if bench_boost {
                total += points;
            }
        }

        Ok(total)
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl Display for SquadState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== starting 11 ===")?;
        for position in Position::ALL {
            writeln!(f, "== {} ==", position)?;
            for player in self.players().iter().filter(|p| p.position == position && p.is_starting) {
                let armband = if player.is_captain {
                    " (C)"
                } else if player.is_vice_captain {
                    " (VC)"
                } else {
                    ""
                };
                writeln!(f, "{} ({}){}", player.name, player.team, armband)?;
            }
        }

        writeln!(f, "=== subs ===")?;
        let mut subs: Vec<_> = self.players().iter().filter(|p| !p.is_starting).collect();
        subs.sort_by_key(|p| p.sub_position);
        for player in subs {
            writeln!(f, "{} ({})", player.name, player.team)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mock_squad, TAG};

    #[test]
    fn formations_respect_outfield_limits() {
        for formation in FORMATIONS {
            assert_eq!(formation.defenders + formation.midfielders + formation.forwards, 10);
            assert!((3..=5).contains(&formation.defenders));
            assert!((3..=5).contains(&formation.midfielders));
            assert!((1..=3).contains(&formation.forwards));
        }
    }

    #[test]
    fn lineup_picks_best_formation() {
        let mut squad = mock_squad();

        let (formation, score) = squad.optimize_lineup(1, TAG).unwrap();

        // 5 + 4*4 + 5*5 + 6
        assert_eq!(formation, Formation::new(4, 5, 1));
        assert_eq!(score, 52.0);
        assert_eq!(squad.players().iter().filter(|p| p.is_starting).count(), 11);
    }

    #[test]
    fn top_goalkeeper_starts_and_bench_is_ordered() {
        let mut squad = mock_squad();
        squad.optimize_lineup(1, TAG).unwrap();

        let starting_keepers: Vec<_> = squad
            .players()
            .iter()
            .filter(|p| p.position == Position::Goalkeeper && p.is_starting)
            .collect();
        assert_eq!(starting_keepers.len(), 1);
        assert_eq!(starting_keepers[0].player_id, 1);

        let mut bench: Vec<_> = squad.players().iter().filter(|p| !p.is_starting).collect();
        bench.sort_by_key(|p| p.sub_position);
        let bench_points: Vec<f64> = bench.iter().map(|p| p.predicted_points(TAG, 1)).collect();
        assert_eq!(bench_points, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn captain_and_vice_captain_follow_points() {
        let mut squad = mock_squad();
        squad.pick_captains(1, TAG);

        let captain = squad.players().iter().find(|p| p.is_captain).unwrap();
        let vice = squad.players().iter().find(|p| p.is_vice_captain).unwrap();

        assert_eq!(captain.player_id, 13);
        // the first 5-point player in squad order
        assert_eq!(vice.player_id, 1);
    }

    #[test]
    fn expected_points_with_chips() {
        let mut squad = mock_squad();

        assert_eq!(squad.get_expected_points(1, TAG, false, false).unwrap(), 58.0);
        assert_eq!(squad.get_expected_points(1, TAG, false, true).unwrap(), 64.0);
        // bench: 1 + 4 + 3 + 2
        assert_eq!(squad.get_expected_points(1, TAG, true, false).unwrap(), 68.0);
    }

    #[test]
    fn incomplete_squad_cannot_be_scored() {
        let mut squad = mock_squad();
        squad.remove_player(13, None, Some(80));

        assert!(matches!(
            squad.get_expected_points(1, TAG, false, false),
            Err(OptimizerError::IncompleteSquad(14))
        ));
    }
}
