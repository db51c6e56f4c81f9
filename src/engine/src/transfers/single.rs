use crate::error::Result;
use crate::squad::SquadState;
use crate::transfers::pool::{sell, CandidatePool};
use crate::transfers::{ChipSchedule, SearchContext, TransferOutcome};
use log::debug;

/// Tries every squad member as the outgoing player. Each is replaced by the
/// best-ranked same-position candidate that fits the budget and team quota;
/// the swap with the highest horizon score wins.
pub fn make_optimum_single_transfer(
    squad: &SquadState,
    gameweeks: &[u32],
    chips: &ChipSchedule,
    ctx: &SearchContext<'_>,
) -> Result<TransferOutcome> {
    let Some(&transfer_gw) = gameweeks.first() else {
        return Ok(TransferOutcome::unchanged(squad));
    };

    let pool = CandidatePool::load(ctx, gameweeks);
    let mut best: Option<(SquadState, f64)> = None;

    for player_out in squad.players() {
        let mut trial = squad.clone();
        sell(&mut trial, player_out.player_id, ctx, transfer_gw);

        let replaced = pool
            .ranked(player_out.position)
            .iter()
            .filter(|c| c.player.player_id != player_out.player_id)
            .any(|c| trial.add_player(c.player.clone(), None, true, true));

        if !replaced {
            debug!("no affordable replacement for {}", player_out.name);
            continue;
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
