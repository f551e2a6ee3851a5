// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the draft dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | On-the-Clock Banner (3 rows)                      |
// +-------------------------+------------------------+
// | Main Panel (65%)         | Sidebar (35%)          |
// |                          | +- My Roster (55%) ---+|
// |                          | +- Advice (45%) ------+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: draft progress, save watermark, tab indicator.
    pub status_bar: Rect,
    /// Second row: round/pick and the team on the clock.
    pub clock_banner: Rect,
    /// Left side of the middle section: tab-switched content area.
    pub main_panel: Rect,
    /// Right sidebar top: user's roster.
    pub roster: Rect,
    /// Right sidebar bottom: pick advice.
    pub advice: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
///
/// Fixed heights for the status bar, clock banner, and help bar, with the
/// remaining space split between the main panel and a sidebar column.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | banner(3) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let clock_banner = vertical[1];
    let middle = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: main panel (65%) | sidebar (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    let main_panel = horizontal[0];
    let sidebar = horizontal[1];

    // Sidebar vertical: roster (55%) | advice (45%)
    let sidebar_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(sidebar);

    AppLayout {
        status_bar,
        clock_banner,
        main_panel,
        roster: sidebar_sections[0],
        advice: sidebar_sections[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A reasonable terminal size for testing.
    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("clock_banner", layout.clock_banner),
            ("main_panel", layout.main_panel),
            ("roster", layout.roster),
            ("advice", layout.advice),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_row_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.clock_banner.height, 3);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn layout_main_panel_wider_than_sidebar() {
        let layout = build_layout(test_area());
        assert!(
            layout.main_panel.width > layout.roster.width,
            "Main panel ({}) should be wider than sidebar ({})",
            layout.main_panel.width,
            layout.roster.width
        );
    }

    #[test]
    fn layout_sidebar_sections_stack_vertically() {
        let layout = build_layout(test_area());
        assert!(
            layout.roster.y < layout.advice.y,
            "Roster should be above advice"
        );
        assert_eq!(layout.roster.width, layout.advice.width);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        let all_rects = [
            layout.status_bar,
            layout.clock_banner,
            layout.main_panel,
            layout.roster,
            layout.advice,
            layout.help_bar,
        ];
        for rect in &all_rects {
            assert!(
                rect.x + rect.width <= area.width,
                "Rect {:?} exceeds area width {}",
                rect,
                area.width
            );
            assert!(
                rect.y + rect.height <= area.height,
                "Rect {:?} exceeds area height {}",
                rect,
                area.height
            );
        }
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        // Minimum viable terminal size
        let area = Rect::new(0, 0, 40, 16);
        let layout = build_layout(area);
        let rects = [
            layout.status_bar,
            layout.clock_banner,
            layout.main_panel,
            layout.roster,
            layout.advice,
            layout.help_bar,
        ];
        for rect in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "Small terminal: rect {:?} has zero area",
                rect
            );
        }
    }
}
