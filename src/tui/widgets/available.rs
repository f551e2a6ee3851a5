// Available players widget: searchable table of undrafted players.
//
// Scrollable table: Rank, Name, Pos, Team, Proj, ADP, Bye
// Filter by position_filter and filter_text from ViewState
// Highlight the selected row
// Column headers bold

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::draft::{Player, Position};
use crate::tui::ViewState;

/// Render the available players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = filter_players(
        &state.available_players,
        state.position_filter,
        &state.filter_text,
    );

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Pos"),
        Cell::from("Team"),
        Cell::from("Proj"),
        Cell::from("ADP"),
        Cell::from("Bye"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(0);

    // Keep the selected row in view.
    let visible_rows = area.height.saturating_sub(3) as usize;
    let skip = if visible_rows > 0 && state.selected >= visible_rows {
        state.selected + 1 - visible_rows
    } else {
        0
    };

    let rows: Vec<Row> = filtered
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, p)| {
            let style = if i == state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.name.clone()),
                Cell::from(p.position.display_str().to_string()),
                Cell::from(p.pro_team.clone()),
                Cell::from(format_opt_f64(p.projected_points, 1)),
                Cell::from(format_opt_f64(p.adp, 1)),
                Cell::from(
                    p.bye_week
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "--".to_string()),
                ),
            ])
            .style(style)
        })
        .collect();

    let title = build_title(state, filtered.len());

    let widths = [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(4),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

/// Filter players by position and text search.
pub fn filter_players<'a>(
    players: &'a [Player],
    position_filter: Option<Position>,
    filter_text: &str,
) -> Vec<&'a Player> {
    let text_lower = filter_text.to_lowercase();

    players
        .iter()
        .filter(|p| {
            if let Some(pos) = position_filter {
                if p.position != pos {
                    return false;
                }
            }
            if !text_lower.is_empty() && !p.name.to_lowercase().contains(&text_lower) {
                return false;
            }
            true
        })
        .collect()
}

fn format_opt_f64(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "--".to_string(),
    }
}

/// Build the title with filter info and pre-computed count.
fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Available Players");
    if let Some(pos) = state.position_filter {
        title.push_str(&format!(" [{}]", pos.display_str()));
    }
    if !state.filter_text.is_empty() || state.filter_mode {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(" ({})", filtered_count));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
