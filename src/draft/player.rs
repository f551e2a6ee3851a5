// Player records and football positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions used for roster slot requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Flex,
    Bench,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the abbreviations the stats API and roster configs use:
    /// - "QB", "RB", "WR", "TE", "K" ("PK" alias), "DST" ("DEF"/"D/ST" aliases)
    /// - "FLEX" ("W/R/T" alias), "BN"/"BE" for bench
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "DEF" | "D/ST" => Some(Position::Defense),
            "FLEX" | "W/R/T" => Some(Position::Flex),
            "BN" | "BE" => Some(Position::Bench),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
            Position::Flex => "FLEX",
            Position::Bench => "BN",
        }
    }

    /// Whether this is a meta-slot (a roster requirement, not a position a
    /// player can carry).
    pub fn is_meta_slot(&self) -> bool {
        matches!(self, Position::Flex | Position::Bench)
    }

    /// Whether a player at this position may fill a FLEX roster slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Deterministic ordering index for roster slot display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Flex => 4,
            Position::Kicker => 5,
            Position::Defense => 6,
            Position::Bench => 7,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Metadata recorded on a player at the moment it is drafted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedInfo {
    /// ID of the team that drafted the player.
    pub team_id: String,
    /// 1-based overall pick number.
    pub overall_pick: u32,
    /// 1-based round number.
    pub round: u32,
}

/// A canonical player record, normalized from the stats API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable player identifier (stringified API id).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Playing position.
    pub position: Position,
    /// Pro team abbreviation (e.g. "KC", "SF"). Empty if unknown.
    pub pro_team: String,
    /// Projected fantasy points for the season, if available.
    pub projected_points: Option<f64>,
    /// Average draft position rank, if available.
    pub adp: Option<f64>,
    /// Ranking tier, if available.
    pub tier: Option<u8>,
    /// Bye week, if available.
    pub bye_week: Option<u8>,
    /// Whether the player has been drafted.
    pub drafted: bool,
    /// Draft metadata, present exactly when `drafted` is true.
    pub drafted_info: Option<DraftedInfo>,
}

impl Player {
    /// Build an undrafted player with the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position,
            pro_team: String::new(),
            projected_points: None,
            adp: None,
            tier: None,
            bye_week: None,
            drafted: false,
            drafted_info: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("QB"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_str_pos("WR"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TightEnd));
        assert_eq!(Position::from_str_pos("K"), Some(Position::Kicker));
        assert_eq!(Position::from_str_pos("DST"), Some(Position::Defense));
    }

    #[test]
    fn from_str_pos_aliases() {
        assert_eq!(Position::from_str_pos("PK"), Some(Position::Kicker));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("W/R/T"), Some(Position::Flex));
        assert_eq!(Position::from_str_pos("BE"), Some(Position::Bench));
        assert_eq!(Position::from_str_pos("BN"), Some(Position::Bench));
    }

    #[test]
    fn from_str_pos_case_insensitive() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("Wr"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("flex"), Some(Position::Flex));
    }

    #[test]
    fn from_str_pos_invalid() {
        assert_eq!(Position::from_str_pos("XX"), None);
        assert_eq!(Position::from_str_pos(""), None);
        assert_eq!(Position::from_str_pos("QB1"), None);
    }

    #[test]
    fn display_str_roundtrip() {
        let positions = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
            Position::Flex,
            Position::Bench,
        ];
        for pos in positions {
            assert_eq!(
                Position::from_str_pos(pos.display_str()),
                Some(pos),
                "roundtrip failed for {}",
                pos
            );
        }
    }

    #[test]
    fn flex_eligibility() {
        assert!(Position::RunningBack.is_flex_eligible());
        assert!(Position::WideReceiver.is_flex_eligible());
        assert!(Position::TightEnd.is_flex_eligible());
        assert!(!Position::Quarterback.is_flex_eligible());
        assert!(!Position::Kicker.is_flex_eligible());
        assert!(!Position::Defense.is_flex_eligible());
    }

    #[test]
    fn meta_slots() {
        assert!(Position::Flex.is_meta_slot());
        assert!(Position::Bench.is_meta_slot());
        assert!(!Position::Quarterback.is_meta_slot());
        assert!(!Position::Defense.is_meta_slot());
    }

    #[test]
    fn new_player_is_undrafted() {
        let p = Player::new("4046", "Patrick Mahomes", Position::Quarterback);
        assert!(!p.drafted);
        assert!(p.drafted_info.is_none());
        assert!(p.projected_points.is_none());
        assert!(p.pro_team.is_empty());
    }
}
