use std::fmt;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind},
};

#[expect(clippy::cast_possible_wrap)]
const WIDTH_I64: i64 = BOARD_WIDTH as i64;
#[expect(clippy::cast_possible_wrap)]
const HEIGHT_I64: i64 = BOARD_HEIGHT as i64;

/// A single cell of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Settled block (or, in an overlay, the falling piece) of a given kind.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        !self.is_empty()
    }

    /// Returns the snapshot code of the cell: `0` for empty, `1..=7` for a kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.code(),
        }
    }

    #[must_use]
    pub const fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }
}

/// One row of the playfield, leftmost column first.
pub type Row = [Cell; BOARD_WIDTH];

/// Grid snapshot as raw cell codes, indexed `[y][x]`.
pub type CellCodes = [[u8; BOARD_WIDTH]; BOARD_HEIGHT];

/// The 10×20 playfield of settled cells.
///
/// Row `0` is the top of the board. Coordinates outside the grid are never
/// stored; pieces hanging above the top edge (`y < 0`) simply have their
/// off-board cells ignored.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Cell, Grid, PieceKind};
///
/// let grid = Grid::from_ascii(
///     "
///     ..........
///     IIIIIIIII.
///     ",
/// );
/// assert_eq!(grid.cell(0, Grid::HEIGHT - 1), Cell::Filled(PieceKind::I));
/// assert!(grid.cell(9, Grid::HEIGHT - 1).is_empty());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{")?;
        fmt::Display::fmt(self, f)?;
        write!(f, "}}")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                let c = cell.kind().map_or('.', PieceKind::as_char);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Grid {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [[Cell::Empty; Self::WIDTH]; Self::HEIGHT],
    };

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Returns the cell at signed coordinates, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    /// Checks whether `piece` can occupy its position.
    ///
    /// A cell is rejected when its column is outside the board, when it lies
    /// below the bottom row, or when it overlaps a settled cell. Cells above
    /// the top row (`y < 0`) only have their column checked.
    #[must_use]
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.occupied_cells().all(|(x, y)| {
            if !(0..WIDTH_I64).contains(&x) || y >= HEIGHT_I64 {
                return false;
            }
            if y < 0 {
                return true;
            }
            self.get(x, y).is_some_and(Cell::is_empty)
        })
    }

    /// Returns the lowest position `piece` can fall to by repeated one-row steps.
    ///
    /// A piece that does not fit is returned unchanged.
    #[must_use]
    pub fn drop_position(&self, piece: Piece) -> Piece {
        let mut dropped = piece;
        if !self.fits(&dropped) {
            return dropped;
        }
        loop {
            let below = dropped.moved(0, 1);
            if below.y() < dropped.y() || !self.fits(&below) {
                return dropped;
            }
            dropped = below;
        }
    }

    /// Writes the piece's kind into every occupied cell that lies on the board.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let cell = Cell::Filled(piece.kind());
        for (x, y) in piece.occupied_cells() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < Self::WIDTH
                && y < Self::HEIGHT
            {
                self.rows[y][x] = cell;
            }
        }
    }

    /// Removes every completely filled row and returns how many were removed.
    ///
    /// Surviving rows are compacted downward in a single bottom-up pass and the
    /// vacated rows at the top are reset to empty.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;

        for y in (0..Self::HEIGHT).rev() {
            if self.rows[y].iter().all(|cell| cell.is_filled()) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }

        self.rows[..count].fill([Cell::Empty; Self::WIDTH]);
        count
    }

    /// Returns the grid as raw cell codes.
    #[must_use]
    pub fn to_codes(&self) -> CellCodes {
        self.rows.map(|row| row.map(Cell::code))
    }

    /// Creates a grid from ASCII art, for tests and fixtures.
    ///
    /// `.` is an empty cell and a piece letter (`I`, `O`, `T`, `S`, `Z`, `J`,
    /// `L`) is a settled cell of that kind. Blank lines and whitespace are
    /// ignored. The given rows are aligned to the bottom of the board, so a
    /// fixture only needs to describe the rows it cares about.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly 10 cells, if there are more than
    /// 20 rows, or if an unknown character is used.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= Self::HEIGHT,
            "At most {} rows are allowed, got {}",
            Self::HEIGHT,
            lines.len()
        );

        let mut grid = Self::EMPTY;
        let offset = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(
                cells.len(),
                Self::WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                Self::WIDTH,
                cells.len(),
                i
            );
            for (x, &ch) in cells.iter().enumerate() {
                grid.rows[offset + i][x] = match ch {
                    '.' => Cell::Empty,
                    _ => Cell::Filled(
                        PieceKind::from_char(ch)
                            .unwrap_or_else(|| panic!("unknown cell character {ch:?}")),
                    ),
                };
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceRotation;

    #[test]
    fn test_empty_grid() {
        let grid = Grid::EMPTY;
        assert!(grid.is_empty());
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.to_codes(), [[0; Grid::WIDTH]; Grid::HEIGHT]);
    }

    #[test]
    fn test_from_ascii_aligns_to_bottom() {
        let grid = Grid::from_ascii(
            "
            T.........
            IIIIIIIIII
            ",
        );
        assert_eq!(grid.cell(0, 18), Cell::Filled(PieceKind::T));
        assert!(grid.cell(1, 18).is_empty());
        assert_eq!(grid.row(19), &[Cell::Filled(PieceKind::I); Grid::WIDTH]);
        assert_eq!(grid.filled_count(), 11);
    }

    #[test]
    fn test_get_outside_grid() {
        let grid = Grid::EMPTY;
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(10, 0), None);
        assert_eq!(grid.get(0, 20), None);
        assert_eq!(grid.get(i64::MAX, i64::MIN), None);
        assert_eq!(grid.get(9, 19), Some(Cell::Empty));
    }

    #[test]
    fn test_fits_walls_and_floor() {
        let grid = Grid::EMPTY;
        let i = Piece::new(PieceKind::I, 0, 0, PieceRotation::SPAWN);
        assert!(grid.fits(&i));
        assert!(!grid.fits(&i.moved(-1, 0)));
        assert!(grid.fits(&i.moved(6, 0)));
        assert!(!grid.fits(&i.moved(7, 0)));
        // I occupies row 1 of its box
        assert!(grid.fits(&i.moved(0, 18)));
        assert!(!grid.fits(&i.moved(0, 19)));
    }

    #[test]
    fn test_fits_allows_overhang_above_top() {
        let grid = Grid::EMPTY;
        let t = Piece::new(PieceKind::T, 3, -2, PieceRotation::SPAWN);
        assert!(grid.fits(&t));
        let far_above = Piece::new(PieceKind::T, 3, -1000, PieceRotation::SPAWN);
        assert!(grid.fits(&far_above));
        // column bounds still apply above the board
        assert!(!grid.fits(&far_above.moved(-4, 0)));
    }

    #[test]
    fn test_fits_rejects_overlap() {
        let grid = Grid::from_ascii("....O.....");
        let o = Piece::new(PieceKind::O, 3, 16, PieceRotation::SPAWN);
        // O occupies columns 4..=5, rows 17..=18
        assert!(grid.fits(&o));
        assert!(!grid.fits(&o.moved(0, 1)));
    }

    #[test]
    fn test_fits_is_total_for_extreme_coordinates() {
        let grid = Grid::EMPTY;
        for (x, y) in [
            (i32::MIN, 0),
            (i32::MAX, 0),
            (0, i32::MAX),
            (i32::MAX, i32::MAX),
        ] {
            let piece = Piece::new(PieceKind::L, x, y, PieceRotation::SPAWN);
            assert!(!grid.fits(&piece));
        }
    }

    #[test]
    fn test_drop_position_lands_on_stack() {
        let grid = Grid::from_ascii(
            "
            ..........
            ...ZZ.....
            ",
        );
        let o = Piece::spawned(PieceKind::O);
        let dropped = grid.drop_position(o);
        // O occupies rows 1..=2 of its box; stack top is row 19 at column 4
        assert_eq!(dropped.y(), 16);
        assert!(grid.fits(&dropped));
        assert!(!grid.fits(&dropped.moved(0, 1)));
    }

    #[test]
    fn test_fill_piece_skips_off_board_cells() {
        let mut grid = Grid::EMPTY;
        let piece = Piece::new(PieceKind::T, 0, -2, PieceRotation::SPAWN);
        // T occupies (1,-1) and (0..=2, 0)
        grid.fill_piece(&piece);
        assert_eq!(grid.filled_count(), 3);
        assert_eq!(grid.cell(1, 0), Cell::Filled(PieceKind::T));
    }

    #[test]
    fn test_clear_lines_single_line() {
        let mut grid = Grid::from_ascii(
            "
            ..L.......
            IIIIIIIIII
            ",
        );
        assert_eq!(grid.clear_lines(), 1);
        assert_eq!(grid.filled_count(), 1);
        assert_eq!(grid.cell(2, 19), Cell::Filled(PieceKind::L));
    }

    #[test]
    fn test_clear_lines_non_adjacent_rows() {
        let mut grid = Grid::from_ascii(
            "
            J.........
            OOOOOOOOOO
            .S........
            TTTTTTTTTT
            ..Z.......
            ",
        );
        assert_eq!(grid.clear_lines(), 2);
        let expected = Grid::from_ascii(
            "
            J.........
            .S........
            ..Z.......
            ",
        );
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut grid = Grid::from_ascii(
            "
            IIIIIIIII.
            .IIIIIIIII
            ",
        );
        let before = grid.clone();
        assert_eq!(grid.clear_lines(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let full = "IIIIIIIIII\n".repeat(Grid::HEIGHT);
        let mut grid = Grid::from_ascii(&full);
        assert_eq!(grid.clear_lines(), Grid::HEIGHT);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_display_round_trips_through_from_ascii() {
        let grid = Grid::from_ascii(
            "
            ....S.....
            LJ..SS..OO
            ",
        );
        assert_eq!(Grid::from_ascii(&grid.to_string()), grid);
    }
}
