use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Fill order used when building a squad from scratch
    pub const FRONT_TO_BACK: [Position; 4] = [
        Position::Forward,
        Position::Midfielder,
        Position::Defender,
        Position::Goalkeeper,
    ];

    /// Squad places per position (15 in total)
    pub fn quota(self) -> usize {
        match self {
            Position::Goalkeeper => 2,
            Position::Defender => 5,
            Position::Midfielder => 5,
            Position::Forward => 3,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }

    pub fn get_short_name(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.get_short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotas_add_up_to_full_squad() {
        let total: usize = Position::ALL.iter().map(|p| p.quota()).sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn position_serializes_as_short_name() {
        let json = serde_json::to_string(&Position::Midfielder).unwrap();
        assert_eq!(json, "\"MID\"");

        let parsed: Position = serde_json::from_str("\"GK\"").unwrap();
        assert_eq!(parsed, Position::Goalkeeper);
    }
}
