use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// A falling piece (tetromino) with position, rotation, and kind.
///
/// Pieces are immutable values: [`Piece::moved`] and [`Piece::rotated`] return
/// new pieces, so a candidate can be checked against the board before the
/// board commits to it.
///
/// # Coordinate System
///
/// - `(x, y)` is the top-left corner of the piece's 4×4 bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - Coordinates are signed; a piece may hang above the board (`y < 0`)
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawned(PieceKind::T);
/// let candidate = piece.moved(1, 0).rotated();
/// assert_eq!(piece.x() + 1, candidate.x());
/// assert_eq!(candidate.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    x: i32,
    y: i32,
    rotation: PieceRotation,
}

impl fmt::Display for Piece {
    // Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.index(),
            self.x,
            self.y
        )
    }
}

impl Piece {
    /// Column of the bounding box for a freshly spawned piece.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN_X: i32 = (Grid::WIDTH / 2) as i32 - 2;
    /// Row of the bounding box for a freshly spawned piece.
    pub const SPAWN_Y: i32 = 0;

    #[must_use]
    pub const fn new(kind: PieceKind, x: i32, y: i32, rotation: PieceRotation) -> Self {
        Self {
            kind,
            x,
            y,
            rotation,
        }
    }

    /// Creates a piece at the spawn position in its spawn orientation.
    #[must_use]
    pub const fn spawned(kind: PieceKind) -> Self {
        Self::new(kind, Self::SPAWN_X, Self::SPAWN_Y, PieceRotation::SPAWN)
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    /// Returns the 4×4 occupancy mask of the current rotation.
    #[must_use]
    pub fn shape(&self) -> &'static PieceShape {
        self.kind.shape(self.rotation)
    }

    /// Returns a copy shifted by `(dx, dy)`.
    ///
    /// Arithmetic wraps, so the function is total over all `i32` inputs and
    /// `moved(dx, dy).moved(-dx, -dy)` always restores the original position.
    #[must_use]
    pub const fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            ..*self
        }
    }

    /// Returns a copy rotated 90° clockwise in place (no wall kick).
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    /// Returns the absolute coordinates of the four occupied cells.
    ///
    /// Coordinates are widened to `i64` so callers can bounds-check pieces
    /// placed anywhere in the `i32` range.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let (x0, y0) = (i64::from(self.x), i64::from(self.y));
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (x0 + dx, y0 + dy))
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct PieceRotation(u8);

impl From<u8> for PieceRotation {
    fn from(value: u8) -> Self {
        Self(value % 4)
    }
}

impl From<PieceRotation> for u8 {
    fn from(value: PieceRotation) -> Self {
        value.0
    }
}

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven tetromino kinds.
///
/// The discriminant is the cell code used in grid snapshots (`0` is reserved
/// for an empty cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    O = 2,
    T = 3,
    S = 4,
    Z = 5,
    J = 6,
    L = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the grid cell code of this kind (`1..=7`).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a grid cell code; `0` and codes above `7` yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=7 => Some(Self::ALL[code as usize - 1]),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }

    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> &'static PieceShape {
        &PIECE_SHAPES[self.code() as usize - 1][rotation.as_usize()]
    }

    /// Returns the `(dx, dy)` offsets of occupied cells within the 4×4 box.
    #[expect(clippy::cast_possible_wrap)]
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i64, i64)> {
        let shape = self.shape(rotation);
        (0..4usize).flat_map(move |dy| {
            (0..4usize)
                .filter(move |&dx| shape[dy][dx])
                .map(move |dx| (dx as i64, dy as i64))
        })
    }
}

/// Occupancy mask of a piece within its 4×4 bounding box, indexed `[row][col]`.
pub type PieceShape = [[bool; 4]; 4];

/// Rotates a 4×4 mask 90° clockwise: `new[r][c] = old[3 - c][r]`.
const fn rotated_clockwise(shape: &PieceShape) -> PieceShape {
    let mut rotated = [[false; 4]; 4];
    let mut r = 0;
    while r < 4 {
        let mut c = 0;
        while c < 4 {
            rotated[r][c] = shape[3 - c][r];
            c += 1;
        }
        r += 1;
    }
    rotated
}

/// Generates all 4 rotation states of a spawn-orientation mask.
const fn shape_rotations(shape: PieceShape) -> [PieceShape; 4] {
    let mut rotations = [shape; 4];
    let mut i = 1;
    while i < 4 {
        rotations[i] = rotated_clockwise(&rotations[i - 1]);
        i += 1;
    }
    rotations
}

/// Rotation tables, indexed by `[kind code - 1][rotation]`.
static PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // I-piece
        shape_rotations([EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations([EEEE, [E, C, C, E], [E, C, C, E], EEEE]),
        // T-piece
        shape_rotations([EEEE, [E, C, E, E], [C, C, C, E], EEEE]),
        // S-piece
        shape_rotations([EEEE, [E, C, C, E], [C, C, E, E], EEEE]),
        // Z-piece
        shape_rotations([EEEE, [C, C, E, E], [E, C, C, E], EEEE]),
        // J-piece
        shape_rotations([EEEE, [C, E, E, E], [C, C, C, E], EEEE]),
        // L-piece
        shape_rotations([EEEE, [E, E, C, E], [C, C, C, E], EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn count_cells(shape: &PieceShape) -> usize {
        shape.iter().flatten().filter(|c| **c).count()
    }

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let shape = kind.shape(PieceRotation::from(r));
                assert_eq!(count_cells(shape), 4, "{kind:?} rotation {r}");
            }
        }
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let base = PieceKind::O.shape(PieceRotation::SPAWN);
        for r in 1..4 {
            assert_eq!(PieceKind::O.shape(PieceRotation::from(r)), base);
        }
    }

    #[test]
    fn test_other_pieces_have_four_distinct_rotations() {
        for kind in PieceKind::ALL.into_iter().filter(|k| *k != PieceKind::O) {
            for a in 0..4u8 {
                for b in (a + 1)..4 {
                    assert_ne!(
                        kind.shape(PieceRotation::from(a)),
                        kind.shape(PieceRotation::from(b)),
                        "{kind:?} rotations {a} and {b} should differ"
                    );
                }
            }
        }
    }

    #[test]
    fn test_i_piece_rotates_to_vertical_column() {
        let vertical = PieceKind::I.shape(PieceRotation::from(1));
        for row in vertical {
            assert_eq!(*row, [false, false, true, false]);
        }
    }

    #[test]
    fn test_t_piece_clockwise_rotation() {
        // .#..      .#..
        // ###.  ->  .##.
        // ....      .#..
        // ....      ....
        let shape = PieceKind::T.shape(PieceRotation::from(1));
        let expected = [
            [false, true, false, false],
            [false, true, true, false],
            [false, true, false, false],
            [false, false, false, false],
        ];
        assert_eq!(*shape, expected);
    }

    #[test]
    fn test_rotated_does_not_mutate_original() {
        let piece = Piece::spawned(PieceKind::L);
        let rotated = piece.rotated();
        assert_eq!(piece.rotation(), PieceRotation::SPAWN);
        assert_eq!(rotated.rotation().index(), 1);
        assert_eq!((rotated.x(), rotated.y()), (piece.x(), piece.y()));
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawned(PieceKind::S);
        assert_eq!((piece.x(), piece.y()), (3, 0));
        assert_eq!(piece.rotation(), PieceRotation::SPAWN);
    }

    #[test]
    fn test_occupied_cells_are_absolute() {
        let piece = Piece::new(PieceKind::I, -1, 5, PieceRotation::SPAWN);
        let cells: Vec<_> = piece.occupied_cells().collect();
        assert_eq!(cells, vec![(-1, 6), (0, 6), (1, 6), (2, 6)]);
    }

    #[test]
    fn test_moved_wraps_instead_of_overflowing() {
        let piece = Piece::new(PieceKind::T, i32::MAX, i32::MIN, PieceRotation::SPAWN);
        let moved = piece.moved(1, -1);
        assert_eq!(moved.moved(-1, 1), piece);
    }

    #[test]
    fn test_piece_kind_code_conversion() {
        for (i, kind) in PieceKind::ALL.into_iter().enumerate() {
            let code = u8::try_from(i + 1).unwrap();
            assert_eq!(kind.code(), code);
            assert_eq!(PieceKind::from_code(code), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
    }

    #[test]
    fn test_piece_display() {
        let piece = Piece::new(PieceKind::S, 4, 18, PieceRotation::from(1));
        assert_eq!(piece.to_string(), "S#1@4,18");
    }

    #[test]
    fn test_rotation_deserialization_wraps() {
        let rotation: PieceRotation = serde_json::from_str("5").unwrap();
        assert_eq!(rotation.index(), 1);
        assert_eq!(serde_json::to_string(&PieceRotation::from(3)).unwrap(), "3");
    }
}
