use serde::Serialize;
use tracing::debug;

use crate::core::{CellCodes, Grid, Piece};

use super::{
    action::{
        Action, ActionOutcome, BoardState, HARD_DROP_REWARD_PER_ROW, SOFT_DROP_REWARD, TickOutcome,
    },
    game_stats::GameStats,
    piece_source::{PieceSeed, PieceSource, RandomPieces},
};

/// The playfield together with the falling piece, the upcoming piece and the
/// progress counters.
///
/// The board is the only owner of its grid: every mutation goes through
/// [`Board::apply_action`], [`Board::tick`], [`Board::spawn_piece`] or
/// [`Board::place_piece`]. Once the game is over none of them changes the
/// grid, the counters or the falling piece until [`Board::reset`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Action, Board, PieceSeed};
///
/// let mut board = Board::with_seed(PieceSeed::from(3));
/// assert!(board.spawn_piece());
///
/// let outcome = board.apply_action(Action::HardDrop);
/// assert!(outcome.moved);
/// assert_eq!(board.cells().filled_count(), 0);
///
/// // A hard-dropped piece locks on the next gravity tick.
/// board.tick();
/// assert_eq!(board.cells().filled_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Board<S = RandomPieces> {
    cells: Grid,
    current: Option<Piece>,
    next: Option<Piece>,
    stats: GameStats,
    game_over: bool,
    pieces: S,
}

impl Default for Board<RandomPieces> {
    fn default() -> Self {
        Self::new()
    }
}

impl Board<RandomPieces> {
    /// Creates an empty board with a randomly seeded piece source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RandomPieces::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(RandomPieces::with_seed(seed))
    }
}

impl<S> Board<S>
where
    S: PieceSource,
{
    /// Creates an empty board without a falling piece.
    #[must_use]
    pub fn with_source(pieces: S) -> Self {
        Self::with_grid(Grid::EMPTY, pieces)
    }

    /// Creates a board whose settled cells are `cells`.
    ///
    /// Counters start from zero; mostly useful for fixtures.
    #[must_use]
    pub fn with_grid(cells: Grid, pieces: S) -> Self {
        Self {
            cells,
            current: None,
            next: None,
            stats: GameStats::new(),
            game_over: false,
            pieces,
        }
    }

    /// Clears the grid, both pieces and every counter.
    ///
    /// The piece source keeps its position; use [`Self::reseed`] to restart it.
    pub fn reset(&mut self) {
        self.cells = Grid::EMPTY;
        self.current = None;
        self.next = None;
        self.stats = GameStats::new();
        self.game_over = false;
    }

    pub fn reseed(&mut self, seed: PieceSeed) {
        self.pieces.reseed(seed);
    }

    fn draw_piece(&mut self) -> Piece {
        Piece::spawned(self.pieces.next_kind())
    }

    /// Promotes the upcoming piece to the falling piece and draws a new
    /// upcoming piece.
    ///
    /// Returns `false` and ends the game when the promoted piece collides with
    /// the stack. The colliding piece stays as the falling piece so that it
    /// can be rendered. Does nothing once the game is over.
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let current = match self.next.take() {
            Some(piece) => piece,
            None => self.draw_piece(),
        };
        self.next = Some(self.draw_piece());
        self.current = Some(current);

        if !self.is_valid_position(&current) {
            self.game_over = true;
            debug!(
                piece = %current,
                score = self.stats.score(),
                lines = self.stats.lines_cleared(),
                "game over"
            );
            return false;
        }
        true
    }

    /// Applies `action` to the falling piece.
    ///
    /// A rejected action, [`Action::Nothing`], a missing falling piece and a
    /// finished game all yield [`ActionOutcome::REJECTED`].
    pub fn apply_action(&mut self, action: Action) -> ActionOutcome {
        let Some(current) = self.current.filter(|_| !self.game_over) else {
            return ActionOutcome::REJECTED;
        };

        let (candidate, reward) = match action {
            Action::Nothing => return ActionOutcome::REJECTED,
            Action::MoveLeft => (current.moved(-1, 0), 0),
            Action::MoveRight => (current.moved(1, 0), 0),
            Action::Rotate => (current.rotated(), 0),
            Action::SoftDrop => (current.moved(0, 1), SOFT_DROP_REWARD),
            Action::HardDrop => return self.hard_drop(current),
        };

        if !self.is_valid_position(&candidate) {
            return ActionOutcome::REJECTED;
        }
        self.current = Some(candidate);
        ActionOutcome::accepted(reward)
    }

    fn hard_drop(&mut self, current: Piece) -> ActionOutcome {
        let landed = self.cells.drop_position(current);
        let distance = landed.y().abs_diff(current.y());
        if distance == 0 {
            return ActionOutcome::REJECTED;
        }
        self.current = Some(landed);
        ActionOutcome::accepted(HARD_DROP_REWARD_PER_ROW.saturating_mul(distance))
    }

    /// Advances gravity by one row.
    ///
    /// When the falling piece cannot move down it is locked into the grid,
    /// completed lines are cleared and the next piece spawns.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::STALLED;
        }
        let Some(current) = self.current else {
            return TickOutcome::STALLED;
        };

        let below = current.moved(0, 1);
        if self.is_valid_position(&below) {
            self.current = Some(below);
            return TickOutcome::ADVANCED;
        }

        self.place_piece(&current);
        self.current = None;
        if self.spawn_piece() {
            TickOutcome::ADVANCED
        } else {
            TickOutcome::STALLED
        }
    }

    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        self.cells.fits(piece)
    }

    /// Writes `piece` into the grid and clears completed lines.
    ///
    /// Cells outside the grid are dropped. Returns the number of rows cleared.
    pub fn place_piece(&mut self, piece: &Piece) -> usize {
        if self.game_over {
            return 0;
        }
        self.cells.fill_piece(piece);
        let rows = self.clear_completed_lines();
        self.stats.record_piece_locked(rows);
        rows
    }

    /// Removes every full row and applies the scoring rules.
    pub fn clear_completed_lines(&mut self) -> usize {
        if self.game_over {
            return 0;
        }
        let rows = self.cells.clear_lines();
        if rows > 0 {
            let gained = self.stats.record_line_clear(rows);
            debug!(
                rows,
                gained,
                score = self.stats.score(),
                level = self.stats.level(),
                "cleared lines"
            );
        }
        rows
    }

    /// Returns where the falling piece would come to rest if dropped.
    #[must_use]
    pub fn drop_position(&self) -> Option<Piece> {
        self.current.map(|piece| self.cells.drop_position(piece))
    }

    /// Returns a copy of the grid with the falling piece burned in.
    #[must_use]
    pub fn board_with_piece_overlay(&self) -> Grid {
        let mut overlay = self.cells.clone();
        if let Some(piece) = &self.current {
            overlay.fill_piece(piece);
        }
        overlay
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let current = self.current.as_ref();
        BoardSnapshot {
            board: self.cells.to_codes(),
            board_with_piece: self.board_with_piece_overlay().to_codes(),
            current_piece_type: current.map_or(0, |p| p.kind().code()),
            current_piece_x: current.map_or(0, Piece::x),
            current_piece_y: current.map_or(0, Piece::y),
            current_piece_rotation: current.map_or(0, |p| p.rotation().index()),
            next_piece_type: self.next.map_or(0, |p| p.kind().code()),
            score: self.stats.score(),
            lines_cleared: self.stats.lines_cleared(),
            level: self.stats.level(),
            game_over: self.game_over,
        }
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u64 {
        self.stats.lines_cleared()
    }

    #[must_use]
    pub fn level(&self) -> u64 {
        self.stats.level()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn state(&self) -> BoardState {
        if self.game_over {
            BoardState::GameOver
        } else {
            BoardState::Active
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        Grid::WIDTH
    }

    #[must_use]
    pub fn height(&self) -> usize {
        Grid::HEIGHT
    }

    #[must_use]
    pub fn cells(&self) -> &Grid {
        &self.cells
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<Piece> {
        self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<Piece> {
        self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn piece_source(&self) -> &S {
        &self.pieces
    }
}

/// Plain-data view of a [`Board`], with absent pieces encoded as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub board: CellCodes,
    pub board_with_piece: CellCodes,
    pub current_piece_type: u8,
    pub current_piece_x: i32,
    pub current_piece_y: i32,
    pub current_piece_rotation: u8,
    pub next_piece_type: u8,
    pub score: u64,
    pub lines_cleared: u64,
    pub level: u64,
    pub game_over: bool,
}
