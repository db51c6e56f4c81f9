use crate::player::Position;
use crate::provider::RankedCandidate;
use crate::squad::SquadState;
use crate::transfers::SearchContext;
use rand::Rng;
use rand_distr::{Distribution, Triangular};

/// Replacement candidates for every position, best first.
pub struct CandidatePool {
    ranked: [Vec<RankedCandidate>; 4],
}

impl CandidatePool {
    pub fn load(ctx: &SearchContext<'_>, gameweeks: &[u32]) -> Self {
        let ranked = Position::ALL.map(|position| {
            ctx.provider
                .ranked_candidates(position, gameweeks, ctx.tag(), ctx.season())
        });

        CandidatePool { ranked }
    }

    pub fn ranked(&self, position: Position) -> &[RankedCandidate] {
        &self.ranked[position.index()]
    }
}

/// Sells `player_id` at its sale price for `gameweek`.
pub fn sell(squad: &mut SquadState, player_id: u32, ctx: &SearchContext<'_>, gameweek: u32) -> bool {
    let market_price = ctx.provider.price(player_id, ctx.season(), gameweek);
    squad.remove_player(player_id, None, market_price)
}

/// Money available if the whole squad were sold in `gameweek`.
pub fn squad_value(squad: &SquadState, ctx: &SearchContext<'_>, gameweek: u32) -> i32 {
    squad.budget()
        + squad
            .players()
            .iter()
            .map(|p| {
                let market_price = ctx.provider.price(p.player_id, ctx.season(), gameweek);
                SquadState::sale_price_for(p, market_price)
            })
            .sum::<i32>()
}

/// Index into a list of `len`, drawn from a triangular distribution with its
/// mode at the front.
pub fn triangular_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let distribution = Triangular::new(0.0, len as f64, 0.0).ok()?;
    let index = distribution.sample(rng) as usize;

    Some(index.min(len - 1))
}
