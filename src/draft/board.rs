// Snake-order draft board: slot generation and turn derivation.

use serde::{Deserialize, Serialize};

/// One slot on the draft board.
///
/// The round, pick-within-round, overall pick, and owning team are fixed at
/// board generation; only `player_id` ever changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSlot {
    /// 1-based round number.
    pub round: u32,
    /// 1-based pick number within the round.
    pub pick_in_round: u32,
    /// 1-based overall pick number across the whole draft.
    pub overall: u32,
    /// Index into the team list of the team that picks at this slot.
    pub team_idx: usize,
    /// The drafted player occupying this slot, if any.
    pub player_id: Option<String>,
}

/// Generate the full draft board: `rounds` x `num_teams` slots in snake
/// order. Odd rounds ascend team index, even rounds descend.
pub fn build_board(num_teams: usize, rounds: usize) -> Vec<BoardSlot> {
    let mut board = Vec::with_capacity(num_teams * rounds);

    for round in 1..=rounds {
        for pick_in_round in 1..=num_teams {
            let team_idx = if round % 2 == 1 {
                pick_in_round - 1
            } else {
                num_teams - pick_in_round
            };
            board.push(BoardSlot {
                round: round as u32,
                pick_in_round: pick_in_round as u32,
                overall: ((round - 1) * num_teams + pick_in_round) as u32,
                team_idx,
                player_id: None,
            });
        }
    }

    board
}

/// Derived "whose turn is it" state for a given pick position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    /// 1-based round of the pick.
    pub round: u32,
    /// Team index owning the pick.
    pub team_idx: usize,
}

/// Pure turn lookup: the round and team owning the 1-based `overall_pick`,
/// or `None` once the pick index runs past the board.
pub fn turn_for(overall_pick: u32, board: &[BoardSlot]) -> Option<Turn> {
    if overall_pick == 0 {
        return None;
    }
    board
        .get(overall_pick as usize - 1)
        .map(|slot| Turn {
            round: slot.round,
            team_idx: slot.team_idx,
        })
}
