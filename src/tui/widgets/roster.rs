// My roster widget: the user's drafted players in pick order.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the user's roster into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines: Vec<Line> = if state.my_roster.is_empty() {
        vec![Line::from(Span::styled(
            "No players drafted yet.",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        state
            .my_roster
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<4}", entry.position),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(entry.player_name.clone()),
                ])
            })
            .collect()
    };

    let title = format!("My Roster ({})", state.my_roster.len());
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
