// Advice widget: recommendation text for the current pick.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the advice panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines: Vec<Line> = Vec::new();
    if state.advice_text.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press 'a' for a recommendation.",
            Style::default().add_modifier(Modifier::DIM),
        )));
    } else {
        lines.push(Line::from(state.advice_text.clone()));
        if !state.advice_reasoning.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                state.advice_reasoning.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Advice"));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
