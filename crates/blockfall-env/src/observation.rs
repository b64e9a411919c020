use blockfall_engine::{BoardSnapshot, CellCodes};
use serde::Serialize;

/// What an agent sees after `reset` and every `step`.
///
/// Absent pieces are encoded as kind `0` at position `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Settled cells only, without the falling piece.
    pub board: CellCodes,
    pub current_piece_type: u8,
    pub current_piece_x: i32,
    pub current_piece_y: i32,
    pub current_piece_rotation: u8,
    pub next_piece_type: u8,
    pub score: u64,
    pub lines_cleared: u64,
    pub level: u64,
}

impl From<&BoardSnapshot> for Observation {
    fn from(snapshot: &BoardSnapshot) -> Self {
        Self {
            board: snapshot.board,
            current_piece_type: snapshot.current_piece_type,
            current_piece_x: snapshot.current_piece_x,
            current_piece_y: snapshot.current_piece_y,
            current_piece_rotation: snapshot.current_piece_rotation,
            next_piece_type: snapshot.next_piece_type,
            score: snapshot.score,
            lines_cleared: snapshot.lines_cleared,
            level: snapshot.level,
        }
    }
}

/// Auxiliary data that is not part of the observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    /// Steps taken before the one this info describes.
    pub step_count: u64,
    pub fall_speed: u64,
    /// Settled cells with the falling piece burned in.
    pub board_with_piece: CellCodes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: i64,
    /// The game ended.
    pub terminated: bool,
    /// The step limit was reached before the game ended.
    pub truncated: bool,
    pub info: StepInfo,
}

impl StepResult {
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}
