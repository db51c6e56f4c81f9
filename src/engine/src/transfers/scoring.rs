use crate::error::Result;
use crate::provider::DataProvider;
use crate::settings::OptimizationSettings;
use crate::squad::SquadState;
use crate::transfers::TransferDirective;

/// Gameweeks in which a strategy plays its scoring chips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChipSchedule {
    pub bench_boost: Option<u32>,
    pub triple_captain: Option<u32>,
}

impl ChipSchedule {
    /// Chips played by `directive` alone in `gameweek`.
    pub fn for_directive(directive: TransferDirective, gameweek: u32) -> Self {
        match directive {
            TransferDirective::BenchBoost(_) => ChipSchedule {
                bench_boost: Some(gameweek),
                triple_captain: None,
            },
            TransferDirective::TripleCaptain(_) => ChipSchedule {
                bench_boost: None,
                triple_captain: Some(gameweek),
            },
            _ => ChipSchedule::default(),
        }
    }

    pub fn is_bench_boost(&self, gameweek: u32) -> bool {
        self.bench_boost == Some(gameweek)
    }

    pub fn is_triple_captain(&self, gameweek: u32) -> bool {
        self.triple_captain == Some(gameweek)
    }
}

/// Everything a transfer search needs besides the squad itself.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub provider: &'a dyn DataProvider,
    pub settings: &'a OptimizationSettings,
}

impl<'a> SearchContext<'a> {
    pub fn new(provider: &'a dyn DataProvider, settings: &'a OptimizationSettings) -> Self {
        SearchContext { provider, settings }
    }

    pub fn tag(&self) -> &str {
        &self.settings.tag
    }

    pub fn season(&self) -> &str {
        &self.settings.season
    }

    /// Expected points of `squad` in one gameweek, chips applied, discounted
    /// back to `anchor`, the first gameweek of the strategy being scored.
    pub fn gameweek_score(
        &self,
        squad: &mut SquadState,
        gameweek: u32,
        anchor: u32,
        chips: &ChipSchedule,
    ) -> Result<f64> {
        let points = squad.get_expected_points(
            gameweek,
            self.tag(),
            chips.is_bench_boost(gameweek),
            chips.is_triple_captain(gameweek),
        )?;

        Ok(points * self.settings.discount.factor(anchor, gameweek))
    }

    /// Discounted points over `gameweeks`, anchored at the first of them.
    /// Transfer searches rank their candidate squads by this.
    pub fn horizon_score(&self, squad: &SquadState, gameweeks: &[u32], chips: &ChipSchedule) -> Result<f64> {
        let Some(&anchor) = gameweeks.first() else {
            return Ok(0.0);
        };

        let mut squad = squad.clone();
        let mut total = 0.0;

        for &gameweek in gameweeks {
            let points = squad.get_expected_points(
                gameweek,
                self.tag(),
                chips.is_bench_boost(gameweek),
                chips.is_triple_captain(gameweek),
            )?;

            total += points * self.settings.discount.factor(anchor, gameweek);
        }

        Ok(total)
    }
}
