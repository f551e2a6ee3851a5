// Draft engine: players, rosters, the snake board, and live state.

pub mod board;
pub mod player;
pub mod roster;
pub mod state;

pub use board::{build_board, turn_for, BoardSlot, Turn};
pub use player::{DraftedInfo, Player, Position};
pub use roster::{RosterRules, RosterSlotRule, Team};
pub use state::DraftState;
