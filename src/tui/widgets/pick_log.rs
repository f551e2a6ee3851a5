// Pick log widget: chronological table of every pick made so far.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the pick log into the given area, newest picks first.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let scroll = state.scroll_offset.get("pick_log").copied().unwrap_or(0);

    let header = Row::new(vec![
        Cell::from("Pick"),
        Cell::from("Rd"),
        Cell::from("Team"),
        Cell::from("Player"),
        Cell::from("Pos"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .pick_log
        .iter()
        .rev()
        .skip(scroll)
        .map(|e| {
            Row::new(vec![
                Cell::from(format!("{}", e.overall)),
                Cell::from(format!("{}", e.round)),
                Cell::from(e.team_name.clone()),
                Cell::from(e.player_name.clone()),
                Cell::from(e.position.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Min(12),
        Constraint::Min(18),
        Constraint::Length(4),
    ];

    let title = format!("Pick Log ({})", state.pick_log.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
