use crate::error::{OptimizerError, Result};
use crate::squad::SquadState;
use crate::strategy::plan::{node_seed, path_id};
use crate::strategy::{GameweekResult, StrategyRecord, TransferPlan};
use crate::transfers::{make_best_transfers, ChipSchedule, SearchContext, TransferDirective};
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// How far (in points) a strategy may trail the baseline before it is dropped.
pub const PRUNE_MARGIN: f64 = 5.0;

/// Squad and transfer bank carried along one strategy path.
#[derive(Debug, Clone)]
pub struct PathState {
    pub squad: SquadState,
    pub free_transfers: u8,
    /// Squad to restore after a free-hit gameweek
    pub free_hit_snapshot: Option<SquadState>,
}

impl PathState {
    pub fn new(squad: SquadState, free_transfers: u8) -> Self {
        PathState {
            squad,
            free_transfers,
            free_hit_snapshot: None,
        }
    }

    /// Plays `directive` in `gameweeks[index]`, looking ahead over the rest
    /// of the horizon, and scores the resulting squad for that gameweek
    /// discounted back to `gameweeks[0]`.
    pub(crate) fn apply_gameweek<R: Rng + ?Sized>(
        &mut self,
        directive: TransferDirective,
        index: usize,
        gameweeks: &[u32],
        chips: &ChipSchedule,
        ctx: &SearchContext<'_>,
        rng: &mut R,
    ) -> Result<GameweekResult> {
        let (Some(&anchor), Some(&gameweek)) = (gameweeks.first(), gameweeks.get(index)) else {
            return Err(OptimizerError::InvalidSettings(format!(
                "gameweek index {} is outside a {}-gameweek plan",
                index,
                gameweeks.len()
            )));
        };
        let remaining = &gameweeks[index..];

        if let Some(squad) = self.free_hit_snapshot.take() {
            self.squad = squad;
        }

        if directive == TransferDirective::FreeHit {
            self.free_hit_snapshot = Some(self.squad.clone());
        }

        let outcome = make_best_transfers(directive, &self.squad, remaining, chips, ctx, rng)?;
        self.squad = outcome.squad;

        let score = ctx.gameweek_score(&mut self.squad, gameweek, anchor, chips)?;
        let points_hit = directive.points_hit(self.free_transfers);
        self.free_transfers = directive.free_transfers_next(self.free_transfers);

        Ok(GameweekResult {
            gameweek,
            score,
            points_hit,
            players_in: outcome.players_in,
            players_out: outcome.players_out,
            chip: directive.chip(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Completed(StrategyRecord),
    /// Fell too far behind the baseline at `gameweek`
    Pruned { gameweek: u32, record: StrategyRecord },
}

impl Evaluation {
    pub fn record(&self) -> &StrategyRecord {
        match self {
            Evaluation::Completed(record) => record,
            Evaluation::Pruned { record, .. } => record,
        }
    }
}

/// Plays a whole transfer plan from the starting squad.
pub struct StrategyEvaluator<'a> {
    ctx: SearchContext<'a>,
    starting_squad: SquadState,
    free_transfers: u8,
}

impl<'a> StrategyEvaluator<'a> {
    pub fn new(ctx: SearchContext<'a>, starting_squad: SquadState, free_transfers: u8) -> Self {
        StrategyEvaluator {
            ctx,
            starting_squad,
            free_transfers,
        }
    }

    /// Cumulative score of keeping the starting squad, per gameweek,
    /// discounted back to `gameweeks[0]`.
    pub fn baseline_curve(&self, gameweeks: &[u32]) -> Result<BTreeMap<u32, f64>> {
        let mut squad = self.starting_squad.clone();
        let chips = ChipSchedule::default();
        let mut total = 0.0;
        let mut curve = BTreeMap::new();

        for &gameweek in gameweeks {
            total += self.ctx.gameweek_score(&mut squad, gameweek, gameweeks[0], &chips)?;
            curve.insert(gameweek, total);
        }

        Ok(curve)
    }

    /// Walks `plan` gameweek by gameweek. With a `baseline` curve, stops as
    /// soon as the running total trails it by more than [`PRUNE_MARGIN`].
    pub fn apply_strategy(&self, plan: &TransferPlan, baseline: Option<&BTreeMap<u32, f64>>) -> Result<Evaluation> {
        plan.validate()?;

        let gameweeks = plan.gameweeks();
        let directives = plan.directives();
        let chips = plan.chip_schedule();

        let mut state = PathState::new(self.starting_squad.clone(), self.free_transfers);
        let mut record = StrategyRecord::new();

        for (index, &directive) in directives.iter().enumerate() {
            let seed = node_seed(self.ctx.settings.seed, &path_id(&directives[..=index]));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let result = state.apply_gameweek(directive, index, &gameweeks, &chips, &self.ctx, &mut rng)?;
            let gameweek = result.gameweek;
            record.record(result);

            if let Some(&baseline_total) = baseline.and_then(|curve| curve.get(&gameweek))
                && baseline_total - record.total_score > PRUNE_MARGIN
            {
                debug!(
                    "pruning {} at gw {}: {:.2} vs baseline {:.2}",
                    plan.path_id(),
                    gameweek,
                    record.total_score,
                    baseline_total
                );
                return Ok(Evaluation::Pruned { gameweek, record });
            }
        }

        Ok(Evaluation::Completed(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::OptimizationSettings;
    use crate::testing::{mock_squad, MockProvider, SWING_TAG, TAG};

    const DISCOUNT: f64 = 14.0 / 15.0;

    fn settings() -> OptimizationSettings {
        OptimizationSettings {
            gameweeks: vec![1, 2],
            tag: TAG.to_string(),
            num_iterations: 10,
            ..Default::default()
        }
    }

    #[test]
    fn single_transfer_plan_matches_hand_computed_score() {
        let provider = MockProvider::new();
        let settings = settings();
        let ctx = SearchContext::new(&provider, &settings);
        let evaluator = StrategyEvaluator::new(ctx, mock_squad(), 1);
        let plan = TransferPlan::new()
            .with(1, TransferDirective::Count(1))
            .with(2, TransferDirective::None);

        let Evaluation::Completed(record) = evaluator.apply_strategy(&plan, None).unwrap() else {
            panic!("plan was pruned");
        };

        assert_eq!(record.players_out[&1], vec![15]);
        assert_eq!(record.players_in[&1], vec![16]);
        assert!(record.players_in[&2].is_empty());
        assert!((record.points_per_gw[&1] - 64.0).abs() < 1e-9);
        assert!((record.points_per_gw[&2] - 64.0 * DISCOUNT).abs() < 1e-9);
        assert!((record.total_score - (64.0 + 64.0 * DISCOUNT)).abs() < 1e-9);
        assert_eq!(record.cards_played[&1], None);
    }

    #[test]
    fn all_zero_plan_changes_nothing() {
        let provider = MockProvider::new();
        let settings = settings();
        let ctx = SearchContext::new(&provider, &settings);
        let evaluator = StrategyEvaluator::new(ctx, mock_squad(), 1);

        let record = evaluator
            .apply_strategy(&TransferPlan::zero(&[1, 2]), None)
            .unwrap()
            .record()
            .clone();

        assert_eq!(record.transfer_count(), 0);
        assert!(record.players_out.values().all(Vec::is_empty));

        let baseline = evaluator.baseline_curve(&[1, 2]).unwrap();
        assert!((record.total_score - baseline[&2]).abs() < 1e-9);
        assert!((baseline[&1] - 58.0).abs() < 1e-9);
    }

    #[test]
    fn paid_transfers_cost_points() {
        let provider = MockProvider::new();
        let settings = settings();
        let ctx = SearchContext::new(&provider, &settings);
        let evaluator = StrategyEvaluator::new(ctx, mock_squad(), 1);
        let plan = TransferPlan::new()
            .with(1, TransferDirective::Count(2))
            .with(2, TransferDirective::None);

        let record = evaluator.apply_strategy(&plan, None).unwrap().record().clone();

        // 63 after the double transfer, minus one hit
        assert!((record.points_per_gw[&1] - 59.0).abs() < 1e-9);
    }

    #[test]
    fn dominated_plan_is_pruned() {
        let provider = MockProvider::new();
        let settings = settings();
        let ctx = SearchContext::new(&provider, &settings);
        let evaluator = StrategyEvaluator::new(ctx, mock_squad(), 1);
        let baseline = evaluator.baseline_curve(&[1, 2]).unwrap();

        // five transfers with one free costs 16 points up front
        let plan = TransferPlan::new()
            .with(1, TransferDirective::Count(5))
            .with(2, TransferDirective::None);

        let evaluation = evaluator.apply_strategy(&plan, Some(&baseline)).unwrap();

        assert!(matches!(evaluation, Evaluation::Pruned { gameweek: 1, .. }));
    }

    #[test]
    fn free_hit_squad_reverts_next_gameweek() {
        let provider = MockProvider::new();
        let settings = settings();
        let ctx = SearchContext::new(&provider, &settings);
        let starting = mock_squad();
        let mut state = PathState::new(starting.clone(), 1);
        let chips = ChipSchedule::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        state
            .apply_gameweek(TransferDirective::FreeHit, 0, &[1, 2], &chips, &ctx, &mut rng)
            .unwrap();
        assert!(state.free_hit_snapshot.is_some());
        assert_eq!(state.free_transfers, 1);

        let result = state
            .apply_gameweek(TransferDirective::None, 1, &[1, 2], &chips, &ctx, &mut rng)
            .unwrap();

        assert_eq!(state.squad.player_ids(), starting.player_ids());
        assert_eq!(state.squad.budget(), starting.budget());
        assert!((result.score - 58.0 * DISCOUNT).abs() < 1e-9);
    }

    #[test]
    fn plan_is_discounted_from_its_own_first_gameweek() {
        let provider = MockProvider::new();
        let settings = OptimizationSettings {
            gameweeks: vec![2, 3],
            ..settings()
        };
        let ctx = SearchContext::new(&provider, &settings);
        let evaluator = StrategyEvaluator::new(ctx, mock_squad(), 1);

        let record = evaluator
            .apply_strategy(&TransferPlan::zero(&[1, 2]), None)
            .unwrap()
            .record()
            .clone();

        assert_eq!(record.points_per_gw[&1], 58.0);
        assert!((record.total_score - (58.0 + 58.0 * DISCOUNT)).abs() < 1e-9);

        let baseline = evaluator.baseline_curve(&[1, 2]).unwrap();
        assert_eq!(baseline[&1], 58.0);
    }

    #[test]
    fn plan_follows_late_peak_with_swing_predictions() {
        let provider = MockProvider::new();
        let settings = OptimizationSettings {
            tag: SWING_TAG.to_string(),
            ..settings()
        };
        let ctx = SearchContext::new(&provider, &settings);
        let evaluator = StrategyEvaluator::new(ctx, mock_squad(), 1);
        let plan = TransferPlan::new()
            .with(1, TransferDirective::Count(1))
            .with(2, TransferDirective::None);

        let record = evaluator.apply_strategy(&plan, None).unwrap().record().clone();

        // 19 is bought in gw 1 for its 12 points in gw 2
        assert_eq!(record.players_in[&1], vec![19]);
        assert_eq!(record.points_per_gw[&1], 58.0);
        assert!((record.points_per_gw[&2] - 72.0 * DISCOUNT).abs() < 1e-9);
        assert!((record.total_score - (58.0 + 72.0 * DISCOUNT)).abs() < 1e-9);
    }

    #[test]
    fn gameweek_index_past_plan_end_is_an_error() {
        let provider = MockProvider::new();
        let settings = settings();
        let ctx = SearchContext::new(&provider, &settings);
        let mut state = PathState::new(mock_squad(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = state.apply_gameweek(
            TransferDirective::None,
            2,
            &[1, 2],
            &ChipSchedule::default(),
            &ctx,
            &mut rng,
        );

        assert!(matches!(result, Err(OptimizerError::InvalidSettings(_))));
        assert_eq!(state.squad.player_ids(), mock_squad().player_ids());
    }
}
