use crate::settings::ChipSet;
use crate::transfers::CHIP_TRANSFER_OPTIONS;

/// Plain transfer counts tried every gameweek (0, 1 and 2).
pub const TRANSFER_BRANCHES: u64 = 3;

/// Number of leaves the strategy tree has over `gameweeks` remaining
/// gameweeks, each enabled chip playable once along any path.
///
/// Triple captain and bench boost branch once per entry of
/// [`CHIP_TRANSFER_OPTIONS`]: with 0 or 1 transfers, never 2. A chip
/// gameweek therefore adds two branches rather than three, so with all four
/// chips a single gameweek has 9 leaves, not 11, and two gameweeks 71, not 101.
///
/// Doubles as the termination oracle and the completeness check of a run.
pub fn expected_leaf_count(gameweeks: usize, chips: ChipSet) -> u64 {
    if gameweeks == 0 {
        return 1;
    }

    let remaining = gameweeks - 1;
    let mut total = TRANSFER_BRANCHES * expected_leaf_count(remaining, chips);

    if chips.wildcard {
        total += expected_leaf_count(remaining, ChipSet { wildcard: false, ..chips });
    }
    if chips.free_hit {
        total += expected_leaf_count(remaining, ChipSet { free_hit: false, ..chips });
    }

    let chip_branches = CHIP_TRANSFER_OPTIONS.len() as u64;
    if chips.triple_captain {
        total += chip_branches * expected_leaf_count(remaining, ChipSet { triple_captain: false, ..chips });
    }
    if chips.bench_boost {
        total += chip_branches * expected_leaf_count(remaining, ChipSet { bench_boost: false, ..chips });
    }

    total
}
