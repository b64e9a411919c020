use serde::Serialize;

/// Base points for clearing `n` rows at once, indexed by `min(n, 4)`.
///
/// The awarded score is `LINE_CLEAR_SCORES[n] * (level + 1)`, using the level
/// in effect before the clear.
pub const LINE_CLEAR_SCORES: [u64; 5] = [0, 40, 100, 300, 1200];

/// Number of cleared rows needed to advance one level.
pub const LINES_PER_LEVEL: u64 = 10;

/// Returns the level reached after clearing `lines` rows in total.
///
/// ```
/// use blockfall_engine::level_for_lines;
///
/// assert_eq!(level_for_lines(0), 1);
/// assert_eq!(level_for_lines(9), 1);
/// assert_eq!(level_for_lines(10), 2);
/// ```
#[must_use]
pub const fn level_for_lines(lines: u64) -> u64 {
    lines / LINES_PER_LEVEL + 1
}

/// Returns the points awarded for clearing `rows` rows at `level`.
#[must_use]
pub const fn line_clear_score(rows: usize, level: u64) -> u64 {
    let index = if rows < LINE_CLEAR_SCORES.len() {
        rows
    } else {
        LINE_CLEAR_SCORES.len() - 1
    };
    LINE_CLEAR_SCORES[index] * (level + 1)
}

/// Game progress counters.
///
/// - **Score**: points earned from line clears
/// - **Lines cleared**: total rows removed
/// - **Level**: always `lines_cleared / 10 + 1`
/// - **Completed pieces**: pieces locked into the grid
/// - **Line clear distribution**: locks by number of rows they cleared
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let gained = stats.record_line_clear(4);
///
/// assert_eq!(gained, 2400);
/// assert_eq!(stats.score(), 2400);
/// assert_eq!(stats.lines_cleared(), 4);
/// assert_eq!(stats.level(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    lines_cleared: u64,
    level: u64,
    completed_pieces: u64,
    line_clear_counter: [u64; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a tracker with all counters at zero and level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            level: 1,
            completed_pieces: 0,
            line_clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    #[must_use]
    pub const fn level(&self) -> u64 {
        self.level
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns a histogram of locked pieces by number of rows they cleared.
    ///
    /// Index `0` counts locks that cleared nothing, index `4` counts
    /// four-row clears.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[u64; 5] {
        &self.line_clear_counter
    }

    /// Applies the scoring rules for `rows` simultaneously cleared rows and
    /// returns the points awarded.
    pub fn record_line_clear(&mut self, rows: usize) -> u64 {
        if rows == 0 {
            return 0;
        }
        let gained = line_clear_score(rows, self.level);
        self.score += gained;
        self.lines_cleared += rows as u64;
        self.level = level_for_lines(self.lines_cleared);
        gained
    }

    /// Records that a piece was locked, clearing `rows` rows.
    pub fn record_piece_locked(&mut self, rows: usize) {
        self.completed_pieces += 1;
        self.line_clear_counter[rows.min(4)] += 1;
    }
}
