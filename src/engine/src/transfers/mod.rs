mod directive;
mod discount;
mod double;
mod pool;
mod random;
mod rebuild;
mod scoring;
mod single;

pub use directive::*;
pub use discount::*;
pub use double::*;
pub use pool::{squad_value, CandidatePool};
pub use random::*;
pub use rebuild::*;
pub use scoring::*;
pub use single::*;

use crate::error::Result;
use crate::squad::SquadState;
use log::warn;
use rand::Rng;

/// A squad after one gameweek's transfers, with the moves that produced it.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub squad: SquadState,
    pub players_in: Vec<u32>,
    pub players_out: Vec<u32>,
}

impl TransferOutcome {
    pub fn unchanged(squad: &SquadState) -> Self {
        TransferOutcome {
            squad: squad.clone(),
            players_in: Vec::new(),
            players_out: Vec::new(),
        }
    }

    /// Moves are whatever differs between the two rosters.
    pub fn between(before: &SquadState, after: SquadState) -> Self {
        let players_out = before
            .players()
            .iter()
            .map(|p| p.player_id)
            .filter(|&id| !after.contains(id))
            .collect();

        let players_in = after
            .players()
            .iter()
            .map(|p| p.player_id)
            .filter(|&id| !before.contains(id))
            .collect();

        TransferOutcome {
            squad: after,
            players_in,
            players_out,
        }
    }
}

/// Applies `directive` to `squad` for the first of `gameweeks`, looking
/// ahead over all of them (only the first for a free hit).
pub fn make_best_transfers<R: Rng + ?Sized>(
    directive: TransferDirective,
    squad: &SquadState,
    gameweeks: &[u32],
    chips: &ChipSchedule,
    ctx: &SearchContext<'_>,
    rng: &mut R,
) -> Result<TransferOutcome> {
    let Some(&transfer_gw) = gameweeks.first() else {
        return Ok(TransferOutcome::unchanged(squad));
    };

    match directive {
        TransferDirective::Wildcard | TransferDirective::FreeHit => {
            let horizon = if directive == TransferDirective::FreeHit {
                &gameweeks[..1]
            } else {
                gameweeks
            };

            let budget = squad_value(squad, ctx, transfer_gw);
            match make_new_squad(budget, horizon, chips, ctx, rng)? {
                Some(new_squad) => Ok(TransferOutcome::between(squad, new_squad)),
                None => {
                    warn!(
                        "could not build a squad for {} in gw {} with budget {}, keeping current squad",
                        directive, transfer_gw, budget
                    );
                    Ok(TransferOutcome::unchanged(squad))
                }
            }
        }
        _ => match directive.transfer_count().unwrap_or_default() {
            0 => Ok(TransferOutcome::unchanged(squad)),
            1 => make_optimum_single_transfer(squad, gameweeks, chips, ctx),
            2 => make_optimum_double_transfer(squad, gameweeks, chips, ctx),
            n => make_random_transfers(squad, n as usize, gameweeks, chips, ctx, rng),
        },
    }
}
