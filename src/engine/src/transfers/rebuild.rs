use crate::error::Result;
use crate::player::Position;
use crate::squad::SquadState;
use crate::transfers::pool::CandidatePool;
use crate::transfers::{ChipSchedule, SearchContext};
use log::debug;
use rand::Rng;

/// Chance of letting an evicted player back in during a repair.
const READMIT_PROBABILITY: f64 = 0.3;

/// Builds a squad from nothing with `budget` to spend, as for a wildcard or
/// free hit. Returns `None` when no trial produced a complete squad.
pub fn make_new_squad<R: Rng + ?Sized>(
    budget: i32,
    gameweeks: &[u32],
    chips: &ChipSchedule,
    ctx: &SearchContext<'_>,
    rng: &mut R,
) -> Result<Option<SquadState>> {
    if gameweeks.is_empty() {
        return Ok(None);
    }

    let pool = CandidatePool::load(ctx, gameweeks);
    let mut best: Option<(SquadState, f64)> = None;

    for iteration in 0..ctx.settings.num_iterations {
        let Some(squad) = build_trial(budget, &pool, ctx.settings.rebuild_max_retries, rng) else {
            debug!("squad rebuild trial {} abandoned", iteration);
            continue;
        };

        let score = ctx.horizon_score(&squad, gameweeks, chips)?;
        if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
            best = Some((squad, score));
        }
    }

    Ok(best.map(|(squad, _)| squad))
}

fn build_trial<R: Rng + ?Sized>(
    budget: i32,
    pool: &CandidatePool,
    max_retries: usize,
    rng: &mut R,
) -> Option<SquadState> {
    let mut squad = SquadState::new(budget);
    let mut evicted_ids: Vec<u32> = Vec::new();

    fill(&mut squad, pool, None);

    let mut retries = 0;
    while !squad.is_complete() {
        if retries >= max_retries || squad.is_empty() {
            return None;
        }
        retries += 1;

        // swap a random player for a cheaper one in the same position
        let evicted = squad.players()[rng.gen_range(0..squad.len())].clone();
        squad.remove_player(evicted.player_id, Some(evicted.purchase_price), None);
        evicted_ids.push(evicted.player_id);

        for candidate in pool.ranked(evicted.position) {
            if squad.count(evicted.position) >= evicted.position.quota() {
                break;
            }
            if evicted_ids.contains(&candidate.player.player_id) && !rng.gen_bool(READMIT_PROBABILITY) {
                continue;
            }
            if candidate.player.purchase_price >= evicted.purchase_price {
                continue;
            }
            squad.add_player(candidate.player.clone(), None, true, true);
        }

        // only the player just evicted is kept out, so every slot stays refillable
        fill(&mut squad, pool, Some(evicted.player_id));
    }

    Some(squad)
}

/// Tops up every position from the front, best-ranked first, skipping `barred`.
fn fill(squad: &mut SquadState, pool: &CandidatePool, barred: Option<u32>) {
    for position in Position::FRONT_TO_BACK {
        for candidate in pool.ranked(position) {
            if squad.count(position) >= position.quota() {
                break;
            }
            if barred == Some(candidate.player.player_id) {
                continue;
            }
            squad.add_player(candidate.player.clone(), None, true, true);
        }
    }
}
