use crate::error::{OptimizerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Points deducted for every transfer beyond the free allowance.
pub const POINTS_PER_HIT: i32 = 4;
pub const MAX_FREE_TRANSFERS: u8 = 2;

/// Transfers that may accompany a triple captain or bench boost. A chip
/// week with two transfers is deliberately not a tree branch.
pub const CHIP_TRANSFER_OPTIONS: [u8; 2] = [0, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chip {
    Wildcard,
    FreeHit,
    TripleCaptain,
    BenchBoost,
}

/// What to do in one gameweek of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferDirective {
    None,
    /// Plain transfers; 1 and 2 are searched exhaustively, more at random
    Count(u8),
    Wildcard,
    FreeHit,
    TripleCaptain(u8),
    BenchBoost(u8),
}

impl TransferDirective {
    pub fn from_count(count: u8) -> Self {
        if count == 0 {
            TransferDirective::None
        } else {
            TransferDirective::Count(count)
        }
    }

    /// Rejects chip directives carrying more transfers than allowed.
    pub fn validate(self) -> Result<Self> {
        match self {
            TransferDirective::Count(0) => Ok(TransferDirective::None),
            TransferDirective::TripleCaptain(n) | TransferDirective::BenchBoost(n)
                if !CHIP_TRANSFER_OPTIONS.contains(&n) =>
            {
                Err(OptimizerError::UnrecognizedDirective(self.to_string()))
            }
            _ => Ok(self),
        }
    }

    /// Transfers made, or `None` when the whole squad is rebuilt.
    pub fn transfer_count(self) -> Option<u8> {
        match self {
            TransferDirective::None => Some(0),
            TransferDirective::Count(n)
            | TransferDirective::TripleCaptain(n)
            | TransferDirective::BenchBoost(n) => Some(n),
            TransferDirective::Wildcard | TransferDirective::FreeHit => None,
        }
    }

    pub fn chip(self) -> Option<Chip> {
        match self {
            TransferDirective::Wildcard => Some(Chip::Wildcard),
            TransferDirective::FreeHit => Some(Chip::FreeHit),
            TransferDirective::TripleCaptain(_) => Some(Chip::TripleCaptain),
            TransferDirective::BenchBoost(_) => Some(Chip::BenchBoost),
            _ => None,
        }
    }

    pub fn points_hit(self, free_transfers: u8) -> f64 {
        match self.transfer_count() {
            Some(n) => (POINTS_PER_HIT * (n as i32 - free_transfers as i32)).max(0) as f64,
            None => 0.0,
        }
    }

    /// One transfer accrues per gameweek; at most two carry over.
    pub fn free_transfers_next(self, previous: u8) -> u8 {
        match self.transfer_count() {
            Some(n) => (1 + previous as i32 - n as i32).clamp(1, MAX_FREE_TRANSFERS as i32) as u8,
            None => 1,
        }
    }
}

impl Display for TransferDirective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferDirective::None => write!(f, "0"),
            TransferDirective::Count(n) => write!(f, "{}", n),
            TransferDirective::Wildcard => write!(f, "W"),
            TransferDirective::FreeHit => write!(f, "F"),
            TransferDirective::TripleCaptain(n) => write!(f, "T{}", n),
            TransferDirective::BenchBoost(n) => write!(f, "B{}", n),
        }
    }
}

impl FromStr for TransferDirective {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self> {
        let unrecognized = || OptimizerError::UnrecognizedDirective(s.to_string());

        let directive = match s {
            "W" => TransferDirective::Wildcard,
            "F" => TransferDirective::FreeHit,
            _ if s.starts_with('T') => {
                TransferDirective::TripleCaptain(s[1..].parse().map_err(|_| unrecognized())?)
            }
            _ if s.starts_with('B') => {
                TransferDirective::BenchBoost(s[1..].parse().map_err(|_| unrecognized())?)
            }
            _ => TransferDirective::from_count(s.parse().map_err(|_| unrecognized())?),
        };

        directive.validate()
    }
}
