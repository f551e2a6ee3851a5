// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into AppCommand messages sent to the
// app orchestrator, or into local ViewState mutations (tab switching,
// selection, scrolling, search).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{TabId, ViewState};
use crate::app::AppCommand;
use crate::draft::Position;

/// The ordered list of positions for cycling with the `p` key.
///
/// None -> QB -> RB -> WR -> TE -> K -> DST -> None
const POSITION_CYCLE: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

/// Handle a keyboard event.
///
/// Returns `Some(AppCommand)` when the key press should be forwarded to the
/// app orchestrator (draft, undo, advice, save, quit). Returns `None` when
/// the key press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<AppCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(AppCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Search mode: capture printable characters and special keys
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        // Tab switching
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Board;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Available;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Log;
            None
        }

        // Selection on the players tab, scrolling elsewhere
        KeyCode::Up | KeyCode::Char('k') => {
            move_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_up(view_state, page_size());
            None
        }
        KeyCode::PageDown => {
            move_down(view_state, page_size());
            None
        }

        // Draft the selected player
        KeyCode::Enter => {
            if view_state.active_tab == TabId::Available {
                draft_selected(view_state)
            } else {
                None
            }
        }

        // Search mode entry: only available on the players tab where it is relevant
        KeyCode::Char('/') => {
            if view_state.active_tab == TabId::Available {
                view_state.filter_mode = true;
            }
            None
        }

        // Escape: clear filters
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.position_filter = None;
            view_state.clamp_selection();
            None
        }

        // Position filter cycling
        KeyCode::Char('p') => {
            cycle_position_filter(view_state);
            None
        }

        // Commands forwarded to the orchestrator
        KeyCode::Char('u') => Some(AppCommand::Undo),
        KeyCode::Char('a') => Some(AppCommand::RequestAdvice),
        KeyCode::Char('s') => Some(AppCommand::SaveNow),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit
/// - `n` or `Esc` cancels
/// - All other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<AppCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(AppCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while in search mode.
///
/// - Printable characters are appended to filter_text
/// - Backspace removes the last character
/// - Enter keeps the text and exits, Esc clears and exits
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<AppCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
            view_state.clamp_selection();
            None
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
            None
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            view_state.clamp_selection();
            None
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            // Restart selection as the match set narrows.
            view_state.selected = 0;
            None
        }
        _ => None,
    }
}

/// Build a DraftPlayer command for the currently selected row.
fn draft_selected(view_state: &mut ViewState) -> Option<AppCommand> {
    let filtered = view_state.filtered_available();
    let player = filtered.get(view_state.selected)?;
    Some(AppCommand::DraftPlayer {
        player_id: player.id.clone(),
        team_override: None,
    })
}

/// Cycle the position filter through the defined positions.
///
/// None -> QB -> RB -> WR -> TE -> K -> DST -> None
fn cycle_position_filter(view_state: &mut ViewState) {
    view_state.position_filter = match view_state.position_filter {
        None => Some(POSITION_CYCLE[0]),
        Some(current) => {
            let idx = POSITION_CYCLE.iter().position(|p| *p == current);
            match idx {
                Some(i) if i + 1 < POSITION_CYCLE.len() => Some(POSITION_CYCLE[i + 1]),
                _ => None, // Last position or not found -> wrap to None
            }
        }
    };
    view_state.selected = 0;
}

/// Get the widget key for scroll state based on the active tab.
fn active_widget_key(view_state: &ViewState) -> &'static str {
    match view_state.active_tab {
        TabId::Board => "board",
        TabId::Available => "available",
        TabId::Log => "pick_log",
    }
}

/// Move the selection (players tab) or scroll (other tabs) up.
fn move_up(view_state: &mut ViewState, lines: usize) {
    if view_state.active_tab == TabId::Available {
        view_state.selected = view_state.selected.saturating_sub(lines);
    } else {
        let key = active_widget_key(view_state);
        let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
        *offset = offset.saturating_sub(lines);
    }
}

/// Move the selection (players tab) or scroll (other tabs) down.
fn move_down(view_state: &mut ViewState, lines: usize) {
    if view_state.active_tab == TabId::Available {
        view_state.selected = view_state.selected.saturating_add(lines);
        view_state.clamp_selection();
    } else {
        let key = active_widget_key(view_state);
        let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
        *offset = offset.saturating_add(lines);
    }
}

/// Page size for PageUp/PageDown.
fn page_size() -> usize {
    20
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
