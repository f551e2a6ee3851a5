// Live draft state: teams, board, players, and the pick cursor.

use tracing::{debug, warn};

use super::board::{build_board, turn_for, BoardSlot};
use super::player::{DraftedInfo, Player};
use super::roster::{RosterRules, Team};

/// Complete in-memory draft state.
///
/// All mutation goes through `draft_player` and `undo_last`; both re-derive
/// the cursor from the board, so `current_pick == filled slots + 1` holds at
/// every return.
#[derive(Debug, Clone)]
pub struct DraftState {
    /// Teams in slot order (index 0 = pick slot 1 in odd rounds).
    pub teams: Vec<Team>,
    /// Roster requirements per team.
    pub roster_rules: RosterRules,
    /// Fixed rounds x teams board in snake order.
    pub board: Vec<BoardSlot>,
    /// All known players, in catalog order.
    pub players: Vec<Player>,
    /// 1-based overall pick the draft is waiting on. One past the board
    /// length once the draft is complete.
    pub current_pick: u32,
    /// Round of the current pick. Holds the final round after completion.
    pub current_round: u32,
    /// Team index on the clock, or `None` when the draft is complete.
    pub current_team_idx: Option<usize>,
    /// Whether the user's team is on the clock.
    pub is_user_turn: bool,
}

impl DraftState {
    /// Build a fresh draft: snake board from the roster's round count, cursor
    /// at overall pick 1.
    pub fn new(teams: Vec<Team>, roster_rules: RosterRules, players: Vec<Player>) -> Self {
        let rounds = roster_rules.total_slots();
        let board = build_board(teams.len(), rounds);

        let mut state = DraftState {
            teams,
            roster_rules,
            board,
            players,
            current_pick: 1,
            current_round: 1,
            current_team_idx: None,
            is_user_turn: false,
        };
        state.recompute_cursor();
        state
    }

    /// Total picks in the draft.
    pub fn total_picks(&self) -> u32 {
        self.board.len() as u32
    }

    /// Whether every slot is filled.
    pub fn is_complete(&self) -> bool {
        self.current_pick > self.total_picks()
    }

    /// The user's team, if one is flagged.
    pub fn user_team(&self) -> Option<&Team> {
        self.teams.iter().find(|t| t.is_user)
    }

    /// Undrafted players, in catalog order.
    pub fn available_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.drafted)
    }

    /// Look up a player by id.
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Filled board slots in pick order, with the drafted player id.
    pub fn pick_log(&self) -> impl Iterator<Item = (&BoardSlot, &str)> {
        self.board
            .iter()
            .filter_map(|s| s.player_id.as_deref().map(|pid| (s, pid)))
    }

    /// Draft `player_id` at the current pick.
    ///
    /// The player normally goes to the team owning the current slot; an
    /// explicit `team_override` (team id) redirects the roster assignment
    /// without touching the slot's own team. Returns false without changing
    /// anything if the player is unknown, already drafted, or the board is
    /// exhausted.
    pub fn draft_player(&mut self, player_id: &str, team_override: Option<&str>) -> bool {
        if self.is_complete() {
            debug!("draft ignored: board exhausted");
            return false;
        }
        let Some(p_idx) = self.players.iter().position(|p| p.id == player_id) else {
            debug!("draft ignored: unknown player '{player_id}'");
            return false;
        };
        if self.players[p_idx].drafted {
            debug!("draft ignored: '{player_id}' already drafted");
            return false;
        }

        let slot_idx = (self.current_pick - 1) as usize;
        let round = self.board[slot_idx].round;
        let slot_team_idx = self.board[slot_idx].team_idx;

        let team_idx = match team_override {
            Some(tid) => match self.teams.iter().position(|t| t.id == tid) {
                Some(i) => i,
                None => {
                    warn!("unknown team override '{tid}', assigning to slot team");
                    slot_team_idx
                }
            },
            None => slot_team_idx,
        };

        let team_id = self.teams[team_idx].id.clone();
        self.players[p_idx].drafted = true;
        self.players[p_idx].drafted_info = Some(DraftedInfo {
            team_id,
            overall_pick: self.current_pick,
            round,
        });
        self.teams[team_idx].roster.push(player_id.to_string());
        self.board[slot_idx].player_id = Some(player_id.to_string());

        self.current_pick += 1;
        self.recompute_cursor();
        true
    }

    /// Undo the most recent pick, restoring the player, roster, slot, and
    /// cursor to their pre-pick values. Returns false if no pick has been
    /// made. Single step only.
    pub fn undo_last(&mut self) -> bool {
        if self.current_pick == 1 {
            debug!("undo ignored: no picks made");
            return false;
        }

        let slot_idx = (self.current_pick - 2) as usize;
        let Some(player_id) = self.board[slot_idx].player_id.take() else {
            warn!("undo found empty slot at pick {}", slot_idx + 1);
            return false;
        };

        if let Some(p_idx) = self.players.iter().position(|p| p.id == player_id) {
            let team_id = self.players[p_idx]
                .drafted_info
                .as_ref()
                .map(|d| d.team_id.clone());
            self.players[p_idx].drafted = false;
            self.players[p_idx].drafted_info = None;

            if let Some(team_id) = team_id {
                if let Some(team) = self.teams.iter_mut().find(|t| t.id == team_id) {
                    if let Some(pos) = team.roster.iter().rposition(|id| *id == player_id) {
                        team.roster.remove(pos);
                    }
                }
            }
        }

        self.current_pick -= 1;
        self.recompute_cursor();
        true
    }

    /// Replay a logged pick sequence (player id, team id) against a fresh
    /// state. Returns how many picks applied; stops at the first failure so
    /// a corrupt log cannot scramble later slots.
    pub fn replay_picks(&mut self, picks: &[(String, String)]) -> usize {
        for (i, (player_id, team_id)) in picks.iter().enumerate() {
            if !self.draft_player(player_id, Some(team_id)) {
                warn!("pick replay stopped at entry {} ('{player_id}')", i + 1);
                return i;
            }
        }
        picks.len()
    }

    fn recompute_cursor(&mut self) {
        match turn_for(self.current_pick, &self.board) {
            Some(turn) => {
                self.current_round = turn.round;
                self.current_team_idx = Some(turn.team_idx);
                self.is_user_turn = self.teams[turn.team_idx].is_user;
            }
            None => {
                self.current_round = self.board.last().map(|s| s.round).unwrap_or(0);
                self.current_team_idx = None;
                self.is_user_turn = false;
            }
        }
    }
}
