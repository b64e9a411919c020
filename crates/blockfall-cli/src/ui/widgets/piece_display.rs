use blockfall_engine::{PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::CellDisplay;

/// Preview of a piece in its spawn orientation, e.g. the next piece.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    kind: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(kind: Option<PieceKind>) -> Self {
        Self { kind, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Fits every kind: spawn orientations are at most 4 wide and 2 tall.
    pub fn width(&self) -> u16 {
        4 * CellDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Offsets of the occupied cells relative to their bounding box, and the box
/// size.
fn trimmed_cells(kind: PieceKind) -> (Vec<(u16, u16)>, (u16, u16)) {
    let offsets: Vec<(i64, i64)> = kind.occupied_offsets(PieceRotation::SPAWN).collect();
    let min_x = offsets.iter().map(|(x, _)| *x).min().unwrap_or(0);
    let min_y = offsets.iter().map(|(_, y)| *y).min().unwrap_or(0);
    let cells: Vec<(u16, u16)> = offsets
        .iter()
        .filter_map(|(x, y)| {
            let x = u16::try_from(x - min_x).ok()?;
            let y = u16::try_from(y - min_y).ok()?;
            Some((x, y))
        })
        .collect();
    let width = cells.iter().map(|(x, _)| x + 1).max().unwrap_or(0);
    let height = cells.iter().map(|(_, y)| y + 1).max().unwrap_or(0);
    (cells, (width, height))
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(kind) = self.kind else {
            return;
        };
        let (cells, (width, height)) = trimmed_cells(kind);
        let piece_area = area.centered(
            Constraint::Length(width * CellDisplay::WIDTH),
            Constraint::Length(height * CellDisplay::HEIGHT),
        );
        let rows = piece_area.layout_vec(&Layout::vertical(
            (0..height).map(|_| Constraint::Length(CellDisplay::HEIGHT)),
        ));
        let columns =
            Layout::horizontal((0..width).map(|_| Constraint::Length(CellDisplay::WIDTH)));

        let display = CellDisplay::from_kind(kind);
        for (y, row) in rows.into_iter().enumerate() {
            for (x, cell_area) in row.layout_vec(&columns).into_iter().enumerate() {
                let occupied = cells
                    .iter()
                    .any(|&(cx, cy)| usize::from(cx) == x && usize::from(cy) == y);
                if occupied {
                    display.render(cell_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_cells() {
        let (cells, size) = trimmed_cells(PieceKind::I);
        assert_eq!(size, (4, 1));
        assert_eq!(cells, [(0, 0), (1, 0), (2, 0), (3, 0)]);

        let (cells, size) = trimmed_cells(PieceKind::T);
        assert_eq!(size, (3, 2));
        assert!(cells.contains(&(1, 0)));
        assert!(!cells.contains(&(0, 0)));

        for kind in PieceKind::ALL {
            let (cells, (width, height)) = trimmed_cells(kind);
            assert_eq!(cells.len(), 4, "{kind:?}");
            assert!(width <= 4 && height <= 2, "{kind:?}");
        }
    }
}
