pub use self::{grid::*, piece::*};

mod grid;
mod piece;

pub(crate) const BOARD_WIDTH: usize = 10;
pub(crate) const BOARD_HEIGHT: usize = 20;
