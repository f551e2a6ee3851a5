// On-the-clock banner: round, pick, and the team currently drafting.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the on-the-clock banner into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = banner_line(state);
    let paragraph =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("On the Clock"));
    frame.render_widget(paragraph, area);
}

/// Build the banner content for the current cursor position.
pub fn banner_line(state: &ViewState) -> Line<'static> {
    if state.total_picks > 0 && state.current_pick > state.total_picks {
        return Line::from(Span::styled(
            "Draft complete",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let mut spans = vec![Span::raw(format!(
        "Round {}, Pick {} - ",
        state.current_round, state.current_pick
    ))];

    if state.is_user_turn {
        spans.push(Span::styled(
            format!("{} (YOUR PICK)", state.on_clock),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            state.on_clock.clone(),
            Style::default().fg(Color::White),
        ));
    }

    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
