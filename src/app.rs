// Application state and orchestration logic.
//
// The central event loop owns the draft engine. User commands from the TUI
// mutate it synchronously; remote saves and advice requests run in spawned
// tasks that report back over mpsc channels. The board may run ahead of the
// hosted store — `last_persisted_pick` records how far persistence got, and
// a failed save never rolls back local state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::advisor::{Advice, AdvicePayload, RecommendationClient};
use crate::config::Config;
use crate::db::{Database, LoggedPick};
use crate::draft::{DraftState, Player};
use crate::store::{encode_record, DocumentStore};

// ---------------------------------------------------------------------------
// Channel message types
// ---------------------------------------------------------------------------

/// Commands from the TUI input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Draft a player at the current pick, optionally assigning the roster
    /// spot to a different team than the slot's owner.
    DraftPlayer {
        player_id: String,
        team_override: Option<String>,
    },
    /// Undo the most recent pick.
    Undo,
    /// Request fresh advice for the current pick.
    RequestAdvice,
    /// Force a snapshot save to the hosted store.
    SaveNow,
    Quit,
}

/// Result of one fire-and-forget save task.
#[derive(Debug, Clone)]
pub struct SaveResult {
    /// Pick count the saved snapshot carried.
    pub pick_count: u32,
    pub ok: bool,
    /// Whether this save created the record (vs updating it).
    pub created: bool,
}

/// One row of the pick log as the TUI shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickLogEntry {
    pub overall: u32,
    pub round: u32,
    pub team_name: String,
    pub player_name: String,
    pub position: String,
}

/// One row of the user's roster panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub position: String,
    pub player_name: String,
}

/// Everything the TUI needs to redraw, captured in one shot.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub pick_log: Vec<PickLogEntry>,
    pub my_roster: Vec<RosterEntry>,
    pub available: Vec<Player>,
    pub current_pick: u32,
    pub current_round: u32,
    pub total_picks: u32,
    pub num_teams: usize,
    /// Name of the team on the clock, or a completion label.
    pub on_clock: String,
    pub is_user_turn: bool,
    pub last_persisted_pick: u32,
}

/// Updates pushed to the TUI render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    Advice { text: String, reasoning: String },
    Status(String),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub draft_state: DraftState,
    pub db: Database,
    /// Unique identifier for the current draft session. Picks are scoped to
    /// this ID so restarts don't replay picks from a different draft.
    pub draft_id: String,
    /// Hosted store, `None` when disabled in config.
    pub store: Option<Arc<dyn DocumentStore>>,
    /// Whether the hosted record exists yet (first save creates, later
    /// saves update).
    record_created: bool,
    /// Highest pick count confirmed saved to the hosted store. Trails
    /// `current_pick - 1` whenever saves fail or are still in flight.
    pub last_persisted_pick: u32,
    pub advisor: Arc<RecommendationClient>,
    /// Monotonically increasing counter identifying the current advice
    /// request. Responses carrying an older generation are discarded.
    pub advice_generation: u64,
    pub advice_text: String,
    pub advice_reasoning: String,
    advice_tx: mpsc::Sender<Advice>,
    save_tx: mpsc::Sender<SaveResult>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        draft_state: DraftState,
        db: Database,
        draft_id: String,
        store: Option<Arc<dyn DocumentStore>>,
        advisor: RecommendationClient,
        advice_tx: mpsc::Sender<Advice>,
        save_tx: mpsc::Sender<SaveResult>,
    ) -> Self {
        AppState {
            config,
            draft_state,
            db,
            draft_id,
            store,
            record_created: false,
            last_persisted_pick: 0,
            advisor: Arc::new(advisor),
            advice_generation: 0,
            advice_text: String::new(),
            advice_reasoning: String::new(),
            advice_tx,
            save_tx,
        }
    }

    /// Build a snapshot of everything the TUI renders.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let pick_log = self
            .draft_state
            .pick_log()
            .filter_map(|(slot, pid)| {
                let player = self.draft_state.player(pid)?;
                let team_id = &player.drafted_info.as_ref()?.team_id;
                let team_name = self
                    .draft_state
                    .teams
                    .iter()
                    .find(|t| &t.id == team_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                Some(PickLogEntry {
                    overall: slot.overall,
                    round: slot.round,
                    team_name,
                    player_name: player.name.clone(),
                    position: player.position.display_str().to_string(),
                })
            })
            .collect();

        let my_roster = self
            .draft_state
            .user_team()
            .map(|team| {
                team.roster
                    .iter()
                    .filter_map(|pid| self.draft_state.player(pid))
                    .map(|p| RosterEntry {
                        position: p.position.display_str().to_string(),
                        player_name: p.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let on_clock = match self.draft_state.current_team_idx {
            Some(idx) => self.draft_state.teams[idx].name.clone(),
            None => "Draft complete".to_string(),
        };

        AppSnapshot {
            pick_log,
            my_roster,
            available: self.draft_state.available_players().cloned().collect(),
            current_pick: self.draft_state.current_pick,
            current_round: self.draft_state.current_round,
            total_picks: self.draft_state.total_picks(),
            num_teams: self.draft_state.teams.len(),
            on_clock,
            is_user_turn: self.draft_state.is_user_turn,
            last_persisted_pick: self.last_persisted_pick,
        }
    }

    /// Apply a draft command: mutate the engine, append to the local pick
    /// log, and kick off a remote save. Returns whether the pick applied.
    pub fn apply_draft(&mut self, player_id: &str, team_override: Option<&str>) -> bool {
        // Capture the pick position before the cursor advances.
        let overall = self.draft_state.current_pick;
        if !self.draft_state.draft_player(player_id, team_override) {
            debug!("draft command ignored for '{player_id}'");
            return false;
        }

        if let Some(player) = self.draft_state.player(player_id) {
            if let Some(info) = &player.drafted_info {
                let logged = LoggedPick {
                    overall_pick: overall,
                    round: info.round,
                    team_id: info.team_id.clone(),
                    player_id: player.id.clone(),
                    player_name: player.name.clone(),
                    position: player.position.display_str().to_string(),
                };
                if let Err(e) = self.db.record_pick(&logged, &self.draft_id) {
                    warn!("failed to persist pick to local log: {e}");
                }
                info!(
                    "pick #{overall}: {} -> {}",
                    logged.player_name, logged.team_id
                );
            }
        }

        self.spawn_save();
        true
    }

    /// Apply an undo command: revert the engine and trim the local pick log,
    /// then save the shrunk snapshot. Returns whether anything was undone.
    pub fn apply_undo(&mut self) -> bool {
        if !self.draft_state.undo_last() {
            debug!("undo command ignored: nothing to undo");
            return false;
        }
        match self.db.delete_last_pick(&self.draft_id) {
            Ok(Some(overall)) => info!("undid pick #{overall}"),
            Ok(None) => warn!("local pick log was already empty on undo"),
            Err(e) => warn!("failed to trim local pick log: {e}"),
        }
        self.spawn_save();
        true
    }

    /// Kick off a fire-and-forget advice request for the current pick.
    pub fn request_advice(&mut self) {
        self.advice_generation += 1;
        let generation = self.advice_generation;

        let payload = AdvicePayload::from_state(&self.config, &self.draft_state);
        let advisor = Arc::clone(&self.advisor);
        let tx = self.advice_tx.clone();

        tokio::spawn(async move {
            let advice = advisor.fetch(&payload, generation).await;
            let _ = tx.send(advice).await;
        });
        debug!(generation, "advice request spawned");
    }

    /// Handle an advice response, discarding stale generations.
    pub fn handle_advice(&mut self, advice: Advice) -> Option<UiUpdate> {
        if advice.generation != self.advice_generation {
            debug!(
                "discarding stale advice (event gen {}, current gen {})",
                advice.generation, self.advice_generation
            );
            return None;
        }
        self.advice_text = advice.text.clone();
        self.advice_reasoning = advice.reasoning.clone();
        Some(UiUpdate::Advice {
            text: advice.text,
            reasoning: advice.reasoning,
        })
    }

    /// Spawn a fire-and-forget save of the current snapshot to the hosted
    /// store. No retries; the result comes back over the save channel.
    pub fn spawn_save(&mut self) {
        let Some(store) = &self.store else {
            return;
        };

        let record = match encode_record(
            &self.draft_id,
            &self.config.store.user_id,
            &self.config.league,
            &self.draft_state,
        ) {
            Ok(r) => r,
            Err(e) => {
                warn!("failed to encode draft record: {e}");
                return;
            }
        };

        let store = Arc::clone(store);
        let tx = self.save_tx.clone();
        let create = !self.record_created;
        // Optimistic: assume the create lands so concurrent saves go through
        // update. The store treats an update of a missing record as an error
        // which surfaces in the save result.
        self.record_created = true;

        tokio::spawn(async move {
            let pick_count = record.pick_count;
            let result = if create {
                store.create(&record).await
            } else {
                store.update(&record).await
            };
            let ok = match result {
                Ok(()) => true,
                Err(e) => {
                    warn!("remote save failed: {e}");
                    false
                }
            };
            let _ = tx
                .send(SaveResult {
                    pick_count,
                    ok,
                    created: create,
                })
                .await;
        });
    }

    /// Handle a completed save: advance the persistence watermark on
    /// success, surface a warning on failure. Local state is never touched.
    pub fn handle_save_result(&mut self, result: SaveResult) -> Option<UiUpdate> {
        if result.ok {
            if result.pick_count > self.last_persisted_pick {
                self.last_persisted_pick = result.pick_count;
            }
            debug!(
                pick_count = result.pick_count,
                "remote save confirmed"
            );
            None
        } else {
            if result.created {
                // The optimistic create flag was wrong; try create again next time.
                self.record_created = false;
            }
            Some(UiUpdate::Status(format!(
                "save failed (saved through pick {})",
                self.last_persisted_pick
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

/// Restore draft state from the local pick log after a crash/restart.
///
/// Replays every logged pick for the current draft session into the engine.
/// Returns the number of picks restored.
pub fn recover_from_db(state: &mut AppState) -> anyhow::Result<usize> {
    if !state.db.has_draft_in_progress(&state.draft_id)? {
        info!(
            "no draft in progress for draft_id={}, starting fresh",
            state.draft_id
        );
        return Ok(0);
    }

    let picks = state.db.load_picks(&state.draft_id)?;
    let entries: Vec<(String, String)> = picks
        .iter()
        .map(|p| (p.player_id.clone(), p.team_id.clone()))
        .collect();

    let applied = state.draft_state.replay_picks(&entries);
    if applied < entries.len() {
        warn!(
            "pick replay applied {applied} of {} logged picks",
            entries.len()
        );
    }
    info!(
        "crash recovery: restored {applied} picks for draft_id={}",
        state.draft_id
    );
    Ok(applied)
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on three channels using `tokio::select!`: user commands from the
/// TUI, advice responses, and save results. Pushes UI updates through
/// `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<AppCommand>,
    mut advice_rx: mpsc::Receiver<Advice>,
    mut save_rx: mpsc::Receiver<SaveResult>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("application event loop started");

    // Initial snapshot so the TUI has something to draw.
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(AppCommand::Quit) => {
                        info!("quit command received, shutting down");
                        break;
                    }
                    Some(AppCommand::DraftPlayer { player_id, team_override }) => {
                        if state.apply_draft(&player_id, team_override.as_deref()) {
                            let _ = ui_tx
                                .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
                                .await;
                        }
                    }
                    Some(AppCommand::Undo) => {
                        if state.apply_undo() {
                            let _ = ui_tx
                                .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
                                .await;
                        }
                    }
                    Some(AppCommand::RequestAdvice) => {
                        state.request_advice();
                    }
                    Some(AppCommand::SaveNow) => {
                        state.spawn_save();
                    }
                    None => {
                        info!("command channel closed, shutting down");
                        break;
                    }
                }
            }

            advice = advice_rx.recv() => {
                if let Some(advice) = advice {
                    if let Some(update) = state.handle_advice(advice) {
                        let _ = ui_tx.send(update).await;
                    }
                }
            }

            result = save_rx.recv() => {
                if let Some(result) = result {
                    if let Some(update) = state.handle_save_result(result) {
                        let _ = ui_tx.send(update).await;
                    }
                    // Keep the status bar's watermark fresh.
                    let _ = ui_tx
                        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
                        .await;
                }
            }
        }
    }

    info!("application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
