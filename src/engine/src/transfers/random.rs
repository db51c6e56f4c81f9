use crate::error::{OptimizerError, Result};
use crate::player::Position;
use crate::squad::SquadState;
use crate::transfers::pool::{sell, triangular_index, CandidatePool};
use crate::transfers::{ChipSchedule, SearchContext, TransferOutcome};
use log::debug;
use rand::Rng;
use std::cmp::Ordering;

/// Makes `num_transfers` transfers by sampling, `num_iterations` times over.
///
/// Outgoing players are drawn with a bias towards the squad's weakest
/// predicted scorers for the transfer gameweek, incoming players with a bias
/// towards the top of each position's ranking. A trial that cannot complete
/// the squad within `max_repair_attempts` falls back to the input squad.
pub fn make_random_transfers<R: Rng + ?Sized>(
    squad: &SquadState,
    num_transfers: usize,
    gameweeks: &[u32],
    chips: &ChipSchedule,
    ctx: &SearchContext<'_>,
    rng: &mut R,
) -> Result<TransferOutcome> {
    if num_transfers > squad.len() {
        return Err(OptimizerError::UnrecognizedDirective(num_transfers.to_string()));
    }

    let Some(&transfer_gw) = gameweeks.first() else {
        return Ok(TransferOutcome::unchanged(squad));
    };

    let pool = CandidatePool::load(ctx, gameweeks);

    // weakest first
    let mut ranked: Vec<(u32, Position, f64)> = squad
        .players()
        .iter()
        .map(|p| (p.player_id, p.position, p.predicted_points(ctx.tag(), transfer_gw)))
        .collect();
    ranked.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));

    let mut best: Option<(SquadState, f64)> = None;

    for iteration in 0..ctx.settings.num_iterations {
        let mut chosen: Vec<usize> = Vec::with_capacity(num_transfers);
        while chosen.len() < num_transfers {
            let Some(index) = triangular_index(rng, ranked.len()) else {
                break;
            };
            if !chosen.contains(&index) {
                chosen.push(index);
            }
        }

        let mut trial = squad.clone();
        let mut removed_ids = Vec::with_capacity(num_transfers);
        let mut positions_needed = Vec::with_capacity(num_transfers);
        for &index in &chosen {
            let (player_id, position, _) = ranked[index];
            sell(&mut trial, player_id, ctx, transfer_gw);
            removed_ids.push(player_id);
            positions_needed.push(position);
        }

        let mut attempts = 0;
        loop {
            let mut added: Vec<(u32, i32)> = Vec::with_capacity(num_transfers);

            for &position in &positions_needed {
                let candidates = pool.ranked(position);
                let Some(index) = triangular_index(rng, candidates.len()) else {
                    continue;
                };

                let candidate = &candidates[index].player;
                if removed_ids.contains(&candidate.player_id) {
                    continue;
                }

                if trial.add_player(candidate.clone(), None, true, true) {
                    added.push((candidate.player_id, candidate.purchase_price));
                }
            }

            if trial.is_complete() {
                break;
            }

            attempts += 1;
            if attempts > ctx.settings.max_repair_attempts {
                debug!("random transfer trial {} gave up, reverting", iteration);
                trial = squad.clone();
                break;
            }

            // undo this attempt's purchases at the price paid
            for (player_id, price) in added {
                trial.remove_player(player_id, Some(price), None);
            }
        }

        let score = ctx.horizon_score(&trial, gameweeks, chips)?;
        if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
            best = Some((trial, score));
        }
    }

    Ok(match best {
        Some((best_squad, _)) => TransferOutcome::between(squad, best_squad),
        None => TransferOutcome::unchanged(squad),
    })
}
