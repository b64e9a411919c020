use blockfall_engine::{Cell, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// One board cell, two terminal columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const EMPTY: Self = Self::new(style::EMPTY, "");
    pub const EMPTY_DOT: Self = Self::new(style::EMPTY_DOT, ".");
    pub const GHOST: Self = Self::new(style::GHOST, "[]");

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn from_kind(kind: PieceKind) -> Self {
        let style = match kind {
            PieceKind::I => style::I_PIECE,
            PieceKind::O => style::O_PIECE,
            PieceKind::T => style::T_PIECE,
            PieceKind::S => style::S_PIECE,
            PieceKind::Z => style::Z_PIECE,
            PieceKind::J => style::J_PIECE,
            PieceKind::L => style::L_PIECE,
        };
        Self::new(style, "")
    }

    pub const fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            Cell::Filled(kind) => Self::from_kind(kind),
            Cell::Empty if show_dots => Self::EMPTY_DOT,
            Cell::Empty => Self::EMPTY,
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // a paragraph paints the whole area, including cells without a symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        (*self).render(area, buf);
    }
}
