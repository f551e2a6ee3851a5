// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::app::{AppCommand, AppSnapshot, PickLogEntry, RosterEntry, UiUpdate};
use crate::draft::{Player, Position};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// TabId
// ---------------------------------------------------------------------------

/// Tabs for the main content panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    /// Round-by-round draft board grid.
    Board,
    /// Available (undrafted) players with search.
    Available,
    /// Chronological pick log.
    Log,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Picks made so far, in draft order.
    pub pick_log: Vec<PickLogEntry>,
    /// The user's roster entries.
    pub my_roster: Vec<RosterEntry>,
    /// All undrafted players in catalog order.
    pub available_players: Vec<Player>,
    /// Overall pick number currently on the clock (one past the board when
    /// the draft is complete).
    pub current_pick: u32,
    pub current_round: u32,
    pub total_picks: u32,
    pub num_teams: usize,
    /// Name of the team on the clock.
    pub on_clock: String,
    pub is_user_turn: bool,
    /// Highest pick count confirmed saved remotely.
    pub last_persisted_pick: u32,
    /// Latest advice text for the current pick.
    pub advice_text: String,
    pub advice_reasoning: String,
    /// Transient status line (e.g. save failures).
    pub status_message: String,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Current search text for the available players table.
    pub filter_text: String,
    /// Whether the search input is active.
    pub filter_mode: bool,
    /// Position filter for the available players table.
    pub position_filter: Option<Position>,
    /// Selected row in the filtered available players table.
    pub selected: usize,
    /// Whether the quit confirmation prompt is showing.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            pick_log: Vec::new(),
            my_roster: Vec::new(),
            available_players: Vec::new(),
            current_pick: 1,
            current_round: 1,
            total_picks: 0,
            num_teams: 0,
            on_clock: String::new(),
            is_user_turn: false,
            last_persisted_pick: 0,
            advice_text: String::new(),
            advice_reasoning: String::new(),
            status_message: String::new(),
            active_tab: TabId::Available,
            scroll_offset: HashMap::new(),
            filter_text: String::new(),
            filter_mode: false,
            position_filter: None,
            selected: 0,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Apply a full state snapshot from the app orchestrator.
    ///
    /// Fields the snapshot does not cover (advice text, scroll offsets,
    /// filters) are left unchanged. The table selection is clamped in case
    /// the available list shrank.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.pick_log = snapshot.pick_log;
        self.my_roster = snapshot.my_roster;
        self.available_players = snapshot.available;
        self.current_pick = snapshot.current_pick;
        self.current_round = snapshot.current_round;
        self.total_picks = snapshot.total_picks;
        self.num_teams = snapshot.num_teams;
        self.on_clock = snapshot.on_clock;
        self.is_user_turn = snapshot.is_user_turn;
        self.last_persisted_pick = snapshot.last_persisted_pick;
        self.clamp_selection();
    }

    /// The available players after position and text filters.
    pub fn filtered_available(&self) -> Vec<&Player> {
        widgets::available::filter_players(
            &self.available_players,
            self.position_filter,
            &self.filter_text,
        )
    }

    /// Keep the selection inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.filtered_available().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Number of picks recorded so far.
    pub fn picks_made(&self) -> u32 {
        self.current_pick.saturating_sub(1)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Advice { text, reasoning } => {
            state.advice_text = text;
            state.advice_reasoning = reasoning;
        }
        UiUpdate::Status(message) => {
            state.status_message = message;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::clock_banner::render(frame, layout.clock_banner, state);
    render_main_panel(frame, &layout, state);
    widgets::roster::render(frame, layout.roster, state);
    widgets::advice::render(frame, layout.advice, state);
    render_help_bar(frame, &layout, state);
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.active_tab {
        TabId::Board => widgets::board::render(frame, layout.main_panel, state),
        TabId::Available => widgets::available::render(frame, layout.main_panel, state),
        TabId::Log => widgets::pick_log::render(frame, layout.main_panel, state),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = if state.confirm_quit {
        " Quit? y/q:Yes | n/Esc:No"
    } else if state.filter_mode {
        " Search: type to filter | Enter:Keep | Esc:Clear"
    } else {
        " q:Quit | 1-3:Tabs | /:Search | p:Pos | Enter:Draft | u:Undo | a:Advice | s:Save"
    };
    let paragraph = ratatui::widgets::Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<AppCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal even if rendering panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            let quitting = command == AppCommand::Quit;
                            let _ = cmd_tx.send(command).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
