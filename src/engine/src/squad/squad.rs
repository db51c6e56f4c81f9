use crate::player::{CandidatePlayer, Position};
use log::{debug, warn};

pub const SQUAD_SIZE: usize = 15;
pub const MAX_PLAYERS_PER_TEAM: usize = 2;
pub const DEFAULT_BUDGET: i32 = 1000;

/// A roster of at most 15 players with the money left to spend.
///
/// Constraint checks never panic; `add_player` and `remove_player` report
/// rejection through their return value so search code can move on to the
/// next candidate.
#[derive(Debug, Clone)]
pub struct SquadState {
    players: Vec<CandidatePlayer>,
    budget: i32,
    num_position: [usize; 4],
}

impl SquadState {
    pub fn new(budget: i32) -> Self {
        SquadState {
            players: Vec::with_capacity(SQUAD_SIZE),
            budget,
            num_position: [0; 4],
        }
    }

    pub fn players(&self) -> &[CandidatePlayer] {
        &self.players
    }

    pub(crate) fn players_mut(&mut self) -> &mut [CandidatePlayer] {
        &mut self.players
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    pub fn count(&self, position: Position) -> usize {
        self.num_position[position.index()]
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.num_position.iter().sum::<usize>() == SQUAD_SIZE
    }

    pub fn contains(&self, player_id: u32) -> bool {
        self.players.iter().any(|p| p.player_id == player_id)
    }

    pub fn player(&self, player_id: u32) -> Option<&CandidatePlayer> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn player_ids(&self) -> Vec<u32> {
        self.players.iter().map(|p| p.player_id).collect()
    }

    /// Adds a player, checking duplicates, position quota, then (optionally)
    /// budget and team quota. `price` overrides the candidate's purchase price.
    pub fn add_player(
        &mut self,
        mut player: CandidatePlayer,
        price: Option<i32>,
        check_budget: bool,
        check_team: bool,
    ) -> bool {
        if let Some(price) = price {
            player.purchase_price = price;
        }

        if self.contains(player.player_id) {
            debug!("already have {} in squad", player.name);
            return false;
        }

        if self.count(player.position) >= player.position.quota() {
            debug!(
                "unable to add {} - too many {}",
                player.name,
                player.position.get_short_name()
            );
            return false;
        }

        if check_budget && player.purchase_price > self.budget {
            debug!("cannot afford {} ({} > {})", player.name, player.purchase_price, self.budget);
            return false;
        }

        if check_team && self.team_count(&player.team) >= MAX_PLAYERS_PER_TEAM {
            debug!("cannot add {} - too many players from {}", player.name, player.team);
            return false;
        }

        self.num_position[player.position.index()] += 1;
        self.budget -= player.purchase_price;
        self.players.push(player);

        true
    }

    /// Removes a player and credits the budget. An explicit `price` wins;
    /// otherwise the sale price is derived from `market_price`.
    pub fn remove_player(
        &mut self,
        player_id: u32,
        price: Option<i32>,
        market_price: Option<i32>,
    ) -> bool {
        let Some(index) = self.players.iter().position(|p| p.player_id == player_id) else {
            return false;
        };

        let player = self.players.remove(index);

        let credit = match price {
            Some(price) => price,
            None => Self::sale_price_for(&player, market_price),
        };

        self.budget += credit;
        self.num_position[player.position.index()] -= 1;

        true
    }

    /// Sale price of a squad member given the current market price.
    pub fn sale_price_for(player: &CandidatePlayer, market_price: Option<i32>) -> i32 {
        match market_price {
            Some(current) => sale_price(player.purchase_price, current),
            None => {
                warn!(
                    "no market price for {} ({}), selling at purchase price",
                    player.name, player.player_id
                );
                player.purchase_price
            }
        }
    }

    fn team_count(&self, team: &str) -> usize {
        self.players.iter().filter(|p| p.team == team).count()
    }
}

/// Price drops are passed on in full; price rises only half (rounded down).
pub fn sale_price(purchase_price: i32, current_price: i32) -> i32 {
    if current_price > purchase_price {
        (current_price + purchase_price) / 2
    } else {
        current_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{candidate, mock_squad};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn mock_squad_is_complete() {
        let squad = mock_squad();

        assert!(squad.is_complete());
        assert_eq!(squad.len(), 15);
        assert_eq!(squad.budget(), 65);
    }

    #[test]
    fn add_rejects_duplicate() {
        let mut squad = SquadState::new(1000);
        let player = candidate(1, Position::Forward, "ARS", 80);

        assert!(squad.add_player(player.clone(), None, true, true));
        assert!(!squad.add_player(player, None, true, true));
        assert_eq!(squad.len(), 1);
        assert_eq!(squad.budget(), 920);
    }

    #[test]
    fn add_rejects_over_quota() {
        let mut squad = SquadState::new(1000);

        assert!(squad.add_player(candidate(1, Position::Goalkeeper, "A", 40), None, true, true));
        assert!(squad.add_player(candidate(2, Position::Goalkeeper, "B", 40), None, true, true));
        assert!(!squad.add_player(candidate(3, Position::Goalkeeper, "C", 40), None, true, true));
        assert_eq!(squad.count(Position::Goalkeeper), 2);
    }

    #[test]
    fn add_rejects_unaffordable_unless_unchecked() {
        let mut squad = SquadState::new(50);

        assert!(!squad.add_player(candidate(1, Position::Forward, "A", 80), None, true, true));
        assert!(squad.add_player(candidate(1, Position::Forward, "A", 80), None, false, true));
        assert_eq!(squad.budget(), -30);
    }

    #[test]
    fn add_rejects_third_player_from_team() {
        let mut squad = SquadState::new(1000);

        assert!(squad.add_player(candidate(1, Position::Defender, "LIV", 50), None, true, true));
        assert!(squad.add_player(candidate(2, Position::Midfielder, "LIV", 50), None, true, true));
        assert!(!squad.add_player(candidate(3, Position::Forward, "LIV", 50), None, true, true));
        assert!(squad.add_player(candidate(3, Position::Forward, "LIV", 50), None, true, false));
    }

    #[test]
    fn explicit_price_overrides_candidate_price() {
        let mut squad = SquadState::new(100);

        assert!(squad.add_player(candidate(1, Position::Forward, "A", 80), Some(55), true, true));
        assert_eq!(squad.budget(), 45);
        assert_eq!(squad.players()[0].purchase_price, 55);
    }

    #[test]
    fn remove_uses_sale_price_rules() {
        let mut squad = SquadState::new(1000);
        squad.add_player(candidate(1, Position::Forward, "A", 80), None, true, true);
        squad.add_player(candidate(2, Position::Forward, "B", 80), None, true, true);
        squad.add_player(candidate(3, Position::Forward, "C", 80), None, true, true);

        // price fell: full drop passed on
        assert!(squad.remove_player(1, None, Some(75)));
        assert_eq!(squad.budget(), 760 + 75);

        // price rose by 3: only 1 of it retained
        assert!(squad.remove_player(2, None, Some(83)));
        assert_eq!(squad.budget(), 835 + 81);

        // explicit price wins over market
        assert!(squad.remove_player(3, Some(90), Some(70)));
        assert_eq!(squad.budget(), 916 + 90);

        assert!(squad.is_empty());
        assert!(!squad.remove_player(3, None, None));
    }

    #[test]
    fn sale_price_midpoint_rounds_down() {
        assert_eq!(sale_price(50, 50), 50);
        assert_eq!(sale_price(50, 45), 45);
        assert_eq!(sale_price(50, 51), 50);
        assert_eq!(sale_price(50, 52), 51);
    }

    #[test]
    fn random_operations_never_break_constraints() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let teams = ["A", "B", "C", "D", "E", "F"];
        let mut squad = SquadState::new(600);

        for _ in 0..2000 {
            let id = rng.gen_range(1..40u32);

            if rng.gen_bool(0.6) {
                let position = Position::ALL[rng.gen_range(0..4)];
                let team = teams[rng.gen_range(0..teams.len())];
                let price = rng.gen_range(35..130);
                squad.add_player(candidate(id, position, team, price), None, true, true);
            } else {
                let market = rng.gen_range(30..140);
                squad.remove_player(id, None, Some(market));
            }

            assert!(squad.budget() >= 0);
            for position in Position::ALL {
                assert!(squad.count(position) <= position.quota());
            }
            for team in teams {
                assert!(squad.players().iter().filter(|p| p.team == team).count() <= MAX_PLAYERS_PER_TEAM);
            }
            let mut ids = squad.player_ids();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), squad.len());
        }
    }
}
