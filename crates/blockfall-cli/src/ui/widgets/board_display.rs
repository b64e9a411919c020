use std::iter;

use blockfall_engine::{Cell, Grid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use super::CellDisplay;

/// The playfield: settled cells, the falling piece and optionally its ghost.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    cells: &'a Grid,
    falling_piece: Option<Piece>,
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(cells: &'a Grid) -> Self {
        Self {
            cells,
            falling_piece: None,
            ghost: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        let margin = super::block_horizontal_margin(self.block.as_ref());
        Grid::WIDTH as u16 * CellDisplay::WIDTH + margin
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        let margin = super::block_vertical_margin(self.block.as_ref());
        Grid::HEIGHT as u16 * CellDisplay::HEIGHT + margin
    }

    fn cell_displays(&self) -> [[CellDisplay; Grid::WIDTH]; Grid::HEIGHT] {
        let mut cells = self.cells.clone();
        if let Some(piece) = &self.falling_piece {
            cells.fill_piece(piece);
        }

        let mut displays = [[CellDisplay::EMPTY_DOT; Grid::WIDTH]; Grid::HEIGHT];
        for (display_row, row) in iter::zip(&mut displays, cells.rows()) {
            for (display, cell) in iter::zip(display_row, row) {
                *display = CellDisplay::from_cell(*cell, true);
            }
        }

        // the ghost only shows through empty cells
        if let Some(ghost) = &self.ghost {
            for (x, y) in ghost.occupied_cells() {
                if cells.get(x, y).is_some_and(Cell::is_empty)
                    && let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                {
                    displays[y][x] = CellDisplay::GHOST;
                }
            }
        }
        displays
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let horizontal = Layout::horizontal(
            (0..Grid::WIDTH).map(|_| Constraint::Length(CellDisplay::WIDTH)),
        )
        .flex(Flex::Center);
        let vertical =
            Layout::vertical((0..Grid::HEIGHT).map(|_| Constraint::Length(CellDisplay::HEIGHT)));

        let grid_areas = area
            .layout::<{ Grid::HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ Grid::WIDTH }>(&horizontal));

        for (row_areas, row) in iter::zip(grid_areas, self.cell_displays()) {
            for (cell_area, display) in iter::zip(row_areas, row) {
                display.render(cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceKind, PieceRotation};

    use super::*;

    fn is_ghost(display: &CellDisplay) -> bool {
        *display == CellDisplay::GHOST
    }

    #[test]
    fn test_ghost_marks_drop_position() {
        let grid = Grid::EMPTY;
        let piece = Piece::spawned(PieceKind::O);
        let ghost = grid.drop_position(piece);
        let displays = BoardDisplay::new(&grid)
            .falling_piece(Some(piece))
            .ghost(Some(ghost))
            .cell_displays();

        let ghosts: Vec<(usize, usize)> = (0..Grid::HEIGHT)
            .flat_map(|y| (0..Grid::WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| is_ghost(&displays[y][x]))
            .collect();
        assert_eq!(ghosts, [(4, 18), (5, 18), (4, 19), (5, 19)]);
        assert_eq!(displays[2][4], CellDisplay::from_kind(PieceKind::O));
        assert_eq!(displays[0][4], CellDisplay::EMPTY_DOT);
    }

    #[test]
    fn test_ghost_hidden_behind_falling_piece() {
        let art = format!("{}{}", "..........\n".repeat(19), "IIII......\n");
        let grid = Grid::from_ascii(&art);
        // resting on the stack, so ghost and piece coincide
        let piece = Piece::new(PieceKind::T, 0, 16, PieceRotation::SPAWN);
        let displays = BoardDisplay::new(&grid)
            .falling_piece(Some(piece))
            .ghost(Some(grid.drop_position(piece)))
            .cell_displays();
        assert!(displays.iter().flatten().all(|display| !is_ghost(display)));
    }

    #[test]
    fn test_size_includes_border() {
        let grid = Grid::EMPTY;
        let board = BoardDisplay::new(&grid).block(BlockWidget::bordered());
        assert_eq!((board.width(), board.height()), (22, 22));
    }
}
