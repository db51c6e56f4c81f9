use database::DatabaseProvider;
use engine::{DataProvider, Selection, SquadState, StrategyRecord};
use log::{info, warn};

fn name(provider: &DatabaseProvider, player_id: u32) -> String {
    provider
        .player_name(player_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", player_id))
}

fn names(provider: &DatabaseProvider, ids: Option<&Vec<u32>>) -> String {
    ids.map(|ids| ids.iter().map(|&id| name(provider, id)).collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

pub fn log_strategy(selection: &Selection, provider: &DatabaseProvider) {
    let best = &selection.best;

    info!("=== strategy {} ===", selection.path_id);
    info!("baseline score: {:.2}", selection.baseline_score);
    info!("best score: {:.2} ({:+.2})", best.total_score, selection.points_gain());

    for (gameweek, points) in &best.points_per_gw {
        let chip = best
            .cards_played
            .get(gameweek)
            .copied()
            .flatten()
            .map(|chip| format!(" [{:?}]", chip))
            .unwrap_or_default();

        info!("gw {}: {:.2} points{}", gameweek, points, chip);

        let sold = names(provider, best.players_out.get(gameweek));
        let bought = names(provider, best.players_in.get(gameweek));
        if !sold.is_empty() || !bought.is_empty() {
            info!("  out: {}", sold);
            info!("  in: {}", bought);
        }
    }
}

/// Applies the strategy's first gameweek to `squad` and logs the picked lineup.
pub fn log_next_lineup(
    squad: &SquadState,
    best: &StrategyRecord,
    provider: &DatabaseProvider,
    gameweek: u32,
    tag: &str,
) -> engine::Result<()> {
    let season = provider.season();
    let mut squad = squad.clone();

    for &player_id in best.players_out.get(&gameweek).into_iter().flatten() {
        let market_price = provider.price(player_id, season, gameweek);
        if !squad.remove_player(player_id, None, market_price) {
            warn!("{} is not in the squad", name(provider, player_id));
        }
    }

    for &player_id in best.players_in.get(&gameweek).into_iter().flatten() {
        let added = provider
            .candidate(player_id, season, gameweek)
            .is_some_and(|player| squad.add_player(player, None, true, true));
        if !added {
            warn!("could not add {} to the squad", name(provider, player_id));
        }
    }

    let chip = best.cards_played.get(&gameweek).copied().flatten();
    let points = squad.get_expected_points(
        gameweek,
        tag,
        chip == Some(engine::Chip::BenchBoost),
        chip == Some(engine::Chip::TripleCaptain),
    )?;

    info!("lineup for gw {} ({:.2} expected points):\n{}", gameweek, points, squad);

    Ok(())
}
