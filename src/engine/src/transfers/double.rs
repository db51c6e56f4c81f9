use crate::error::Result;
use crate::player::CandidatePlayer;
use crate::squad::SquadState;
use crate::transfers::pool::{sell, CandidatePool};
use crate::transfers::{ChipSchedule, SearchContext, TransferOutcome};
use itertools::Itertools;
use rayon::prelude::*;

/// Tries every pair of squad members as the outgoing players.
///
/// For each first replacement (best-ranked first) only the first feasible
/// second replacement is scored before moving on, so this is a greedy
/// approximation of the best pair, not an exhaustive one.
pub fn make_optimum_double_transfer(
    squad: &SquadState,
    gameweeks: &[u32],
    chips: &ChipSchedule,
    ctx: &SearchContext<'_>,
) -> Result<TransferOutcome> {
    let Some(&transfer_gw) = gameweeks.first() else {
        return Ok(TransferOutcome::unchanged(squad));
    };

    let pool = CandidatePool::load(ctx, gameweeks);
    let pairs: Vec<(usize, usize)> = (0..squad.len()).tuple_combinations().collect();

    let results = pairs
        .par_iter()
        .map(|&(i, j)| {
            let out = (&squad.players()[i], &squad.players()[j]);
            best_for_pair(squad, out, &pool, transfer_gw, gameweeks, chips, ctx)
        })
        .collect::<Result<Vec<_>>>()?;

    // sequential reduce keeps the earliest pair on ties
    let mut best: Option<(SquadState, f64)> = None;
    for (candidate, score) in results.into_iter().flatten() {
        if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
            best = Some((candidate, score));
        }
    }

    Ok(match best {
        Some((best_squad, _)) => TransferOutcome::between(squad, best_squad),
        None => TransferOutcome::unchanged(squad),
    })
}

fn best_for_pair(
    squad: &SquadState,
    (out_1, out_2): (&CandidatePlayer, &CandidatePlayer),
    pool: &CandidatePool,
    transfer_gw: u32,
    gameweeks: &[u32],
    chips: &ChipSchedule,
    ctx: &SearchContext<'_>,
) -> Result<Option<(SquadState, f64)>> {
    let out_ids = [out_1.player_id, out_2.player_id];

    let mut removed = squad.clone();
    sell(&mut removed, out_1.player_id, ctx, transfer_gw);
    sell(&mut removed, out_2.player_id, ctx, transfer_gw);

    let mut best: Option<(SquadState, f64)> = None;

    for in_1 in pool.ranked(out_1.position) {
        if out_ids.contains(&in_1.player.player_id) {
            continue;
        }

        let mut added = removed.clone();
        if !added.add_player(in_1.player.clone(), None, true, true) {
            continue;
        }

        for in_2 in pool.ranked(out_2.position) {
            let id = in_2.player.player_id;
            if id == in_1.player.player_id || out_ids.contains(&id) {
                continue;
            }

            if added.add_player(in_2.player.clone(), None, true, true) {
                let score = ctx.horizon_score(&added, gameweeks, chips)?;
                if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                    best = Some((added.clone(), score));
                }
                break;
            }
        }
    }

    Ok(best)
}
