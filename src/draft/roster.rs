// Roster rules and team records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::player::Position;

/// One roster requirement: a position and how many slots of it each team
/// must fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlotRule {
    pub position: Position,
    pub count: usize,
}

/// Per-team roster composition. The total slot count determines the number
/// of draft rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRules {
    /// Slot rules in deterministic display order.
    pub slots: Vec<RosterSlotRule>,
}

impl RosterRules {
    /// Build roster rules from a config mapping position strings to counts
    /// (the `[league.roster]` table, e.g. `{"QB": 1, "RB": 2, "BN": 7}`).
    ///
    /// Unknown position strings and zero counts are skipped with a warning.
    /// If nothing usable remains, the default shape is substituted instead
    /// of failing.
    pub fn from_config(roster_config: &HashMap<String, usize>) -> Self {
        let mut slots: Vec<RosterSlotRule> = Vec::new();

        for (pos_str, &count) in roster_config {
            match Position::from_str_pos(pos_str) {
                Some(position) if count > 0 => {
                    slots.push(RosterSlotRule { position, count });
                }
                Some(_) => {
                    warn!("ignoring roster entry '{pos_str}' with count 0");
                }
                None => {
                    warn!("ignoring unknown roster position '{pos_str}'");
                }
            }
        }

        if slots.is_empty() {
            warn!("roster config empty or invalid, substituting default shape");
            return Self::default_shape();
        }

        slots.sort_by_key(|s| s.position.sort_order());
        RosterRules { slots }
    }

    /// The documented default roster shape, used when configuration is
    /// absent or invalid: QB 1, RB 2, WR 2, TE 1, FLEX 1, K 1, DST 1, BN 7.
    /// 16 slots total, so 16 draft rounds.
    pub fn default_shape() -> Self {
        let shape = [
            (Position::Quarterback, 1),
            (Position::RunningBack, 2),
            (Position::WideReceiver, 2),
            (Position::TightEnd, 1),
            (Position::Flex, 1),
            (Position::Kicker, 1),
            (Position::Defense, 1),
            (Position::Bench, 7),
        ];
        RosterRules {
            slots: shape
                .iter()
                .map(|&(position, count)| RosterSlotRule { position, count })
                .collect(),
        }
    }

    /// Total roster size per team, which is also the number of draft rounds.
    pub fn total_slots(&self) -> usize {
        self.slots.iter().map(|s| s.count).sum()
    }

    /// Slot count required for a specific position.
    pub fn count_for(&self, position: Position) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position == position)
            .map(|s| s.count)
            .sum()
    }
}

/// A team participating in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier (e.g. "team_3").
    pub id: String,
    /// Display name ("Your Team" for the user, "Team k" otherwise).
    pub name: String,
    /// Owner label shown next to the name.
    pub owner: String,
    /// Whether this is the human user's team.
    pub is_user: bool,
    /// Drafted player ids, in pick order.
    pub roster: Vec<String>,
}

impl Team {
    /// Build the N teams for a draft, with the user's team at 1-based
    /// `user_slot`. Out-of-range slots fall back to slot 1.
    pub fn build_teams(num_teams: usize, user_slot: usize) -> Vec<Team> {
        let user_slot = if (1..=num_teams).contains(&user_slot) {
            user_slot
        } else {
            warn!("user_slot {user_slot} out of range for {num_teams} teams, using slot 1");
            1
        };

        (1..=num_teams)
            .map(|k| {
                let is_user = k == user_slot;
                Team {
                    id: format!("team_{k}"),
                    name: if is_user {
                        "Your Team".to_string()
                    } else {
                        format!("Team {k}")
                    },
                    owner: if is_user {
                        "You".to_string()
                    } else {
                        format!("Owner {k}")
                    },
                    is_user,
                    roster: Vec::new(),
                }
            })
            .collect()
    }
}
