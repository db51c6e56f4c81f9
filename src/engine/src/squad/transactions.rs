use crate::provider::{DataProvider, Transaction};
use crate::squad::SquadState;
use log::{debug, warn};

impl SquadState {
    /// Rebuilds the current squad by replaying the transaction log in order.
    ///
    /// Free-hit transactions are skipped. Purchases bypass the budget and team
    /// checks: only the squad at the end of a gameweek has to be legal, not
    /// every intermediate step of a multi-player transfer.
    pub fn from_transactions(
        transactions: &[Transaction],
        provider: &dyn DataProvider,
        budget: i32,
    ) -> SquadState {
        let mut squad = SquadState::new(budget);

        for transaction in transactions.iter().filter(|t| !t.free_hit) {
            if transaction.is_purchase() {
                let Some(player) =
                    provider.candidate(transaction.player_id, &transaction.season, transaction.gameweek)
                else {
                    warn!(
                        "player {} bought in gw {} is unknown, skipping",
                        transaction.player_id, transaction.gameweek
                    );
                    continue;
                };

                if !squad.add_player(player, Some(transaction.price), false, false) {
                    warn!("could not replay purchase of player {}", transaction.player_id);
                }
            } else if !squad.remove_player(transaction.player_id, Some(transaction.price), None) {
                warn!(
                    "sold player {} in gw {} was not in the squad",
                    transaction.player_id, transaction.gameweek
                );
            }
        }

        debug!("replayed squad: {} players, budget {}", squad.len(), squad.budget());

        if !squad.is_complete() {
            warn!("replayed squad has only {} players", squad.len());
        }

        squad
    }
}
