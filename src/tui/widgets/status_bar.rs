// Status bar widget: draft progress, save watermark, tab indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{TabId, ViewState};

/// Render the status bar into the given area.
///
/// Layout: [save indicator] [pick counter] [tab bar] [status message]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    // Save indicator: green when everything made it to the hosted store.
    let (dot, dot_color) = save_indicator(state.picks_made(), state.last_persisted_pick);
    spans.push(Span::styled(
        format!(" {} ", dot),
        Style::default().fg(dot_color),
    ));

    // Pick counter
    spans.push(Span::styled(
        format!("Pick {}/{}", state.picks_made(), state.total_picks),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));

    spans.extend(tab_spans(state.active_tab));

    if !state.status_message.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            state.status_message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the save dot character and its color.
///
/// Green when the hosted store has every pick, yellow while it trails.
pub fn save_indicator(picks_made: u32, last_persisted: u32) -> (&'static str, Color) {
    if last_persisted >= picks_made {
        ("●", Color::Green)
    } else {
        ("●", Color::Yellow)
    }
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Board] [2:Players] [3:Log]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Board, "1:Board"),
        (TabId::Available, "2:Players"),
        (TabId::Log, "3:Log"),
    ];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_indicator_green_when_caught_up() {
        assert_eq!(save_indicator(5, 5), ("●", Color::Green));
        assert_eq!(save_indicator(0, 0), ("●", Color::Green));
    }

    #[test]
    fn save_indicator_yellow_when_behind() {
        assert_eq!(save_indicator(7, 5), ("●", Color::Yellow));
    }

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(TabId::Available);
        // 0=[1:Board], 1=" ", 2=[2:Players]
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn tab_spans_contain_descriptive_labels() {
        let spans = tab_spans(TabId::Board);
        let labels: Vec<&str> = spans
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 0)
            .map(|(_, s)| s.content.as_ref())
            .collect();
        assert_eq!(labels, vec!["[1:Board]", "[2:Players]", "[3:Log]"]);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.status_message = "save failed (saved through pick 3)".to_string();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
