// TUI widget modules for each dashboard panel.

pub mod advice;
pub mod available;
pub mod board;
pub mod clock_banner;
pub mod pick_log;
pub mod roster;
pub mod status_bar;
