// Draft board widget: round-by-round grid of picks.
//
// One row per round, one column per pick slot in that round. Snake order
// means a round's columns run left-to-right in pick order, not team order.
// The cell on the clock is highlighted; empty slots show "--".

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::app::PickLogEntry;
use crate::tui::ViewState;

/// Render the draft board grid into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.num_teams == 0 || state.total_picks == 0 {
        let block = Block::default().borders(Borders::ALL).title("Draft Board");
        frame.render_widget(block, area);
        return;
    }

    let num_teams = state.num_teams as u32;
    let rounds = state.total_picks / num_teams;
    let scroll = state.scroll_offset.get("board").copied().unwrap_or(0);

    let mut header_cells = vec![Cell::from("Rd")];
    for k in 1..=num_teams {
        header_cells.push(Cell::from(format!("P{k}")));
    }
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = (1..=rounds)
        .skip(scroll)
        .map(|round| {
            let mut cells = vec![Cell::from(format!("{round}"))];
            for k in 1..=num_teams {
                let overall = (round - 1) * num_teams + k;
                let entry = entry_for_overall(&state.pick_log, overall);
                let cell = match entry {
                    Some(e) => Cell::from(cell_text(e)),
                    None if overall == state.current_pick => Cell::from("* on clock").style(
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    None => Cell::from("--"),
                };
                cells.push(cell);
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(3)];
    widths.extend(std::iter::repeat(Constraint::Min(10)).take(num_teams as usize));

    let title = format!("Draft Board (Round {}/{})", state.current_round, rounds);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn entry_for_overall(pick_log: &[PickLogEntry], overall: u32) -> Option<&PickLogEntry> {
    pick_log.iter().find(|e| e.overall == overall)
}

/// Compact cell label: last name plus position.
fn cell_text(entry: &PickLogEntry) -> String {
    let last = entry
        .player_name
        .rsplit(' ')
        .next()
        .unwrap_or(&entry.player_name);
    format!("{} {}", last, entry.position)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
