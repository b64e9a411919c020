//! Board simulation: the action state machine, gravity, line clearing and
//! scoring.
//!
//! - [`Board`] - Settled grid, falling piece, upcoming piece and counters
//! - [`Action`] - Discrete player actions and their outcomes
//! - [`GameStats`] - Score, lines, level and placement statistics
//! - [`PieceSource`] - Where new pieces come from ([`RandomPieces`] or
//!   [`SequencePieces`])
//!
//! # Game Flow
//!
//! 1. Create a [`Board`] and call [`Board::spawn_piece`]
//! 2. Apply any number of [`Action`]s with [`Board::apply_action`]
//! 3. Advance gravity with [`Board::tick`]; a piece that cannot fall further
//!    is locked, full rows are cleared and the next piece spawns
//! 4. Repeat until a new piece collides at spawn (game over)
//!
//! The board never schedules gravity by itself; the caller decides how many
//! actions happen between two ticks.

pub use self::{action::*, board::*, game_stats::*, piece_source::*};

mod action;
mod board;
mod game_stats;
mod piece_source;
