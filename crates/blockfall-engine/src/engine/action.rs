use serde::{Deserialize, Serialize};

/// Reward for a successful one-row soft drop.
pub const SOFT_DROP_REWARD: u32 = 1;
/// Reward per row travelled by a hard drop.
pub const HARD_DROP_REWARD_PER_ROW: u32 = 2;

/// A discrete player action applied to the falling piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Action {
    #[display("nothing")]
    Nothing,
    #[display("move left")]
    MoveLeft,
    #[display("move right")]
    MoveRight,
    #[display("rotate")]
    Rotate,
    #[display("soft drop")]
    SoftDrop,
    #[display("hard drop")]
    HardDrop,
}

impl Action {
    pub const ALL: [Self; 6] = [
        Self::Nothing,
        Self::MoveLeft,
        Self::MoveRight,
        Self::Rotate,
        Self::SoftDrop,
        Self::HardDrop,
    ];
}

/// Result of [`Board::apply_action`](crate::Board::apply_action).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Whether the falling piece changed position or rotation.
    pub moved: bool,
    /// Movement reward earned by the action.
    pub reward: u32,
}

impl ActionOutcome {
    /// Outcome of an action that left the board untouched.
    pub const REJECTED: Self = Self {
        moved: false,
        reward: 0,
    };

    #[must_use]
    pub const fn accepted(reward: u32) -> Self {
        Self {
            moved: true,
            reward,
        }
    }
}

/// Result of [`Board::tick`](crate::Board::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickOutcome {
    /// `false` when the board was already over, had no falling piece, or the
    /// next piece could not spawn.
    pub advanced: bool,
    pub reward: u32,
}

impl TickOutcome {
    pub const ADVANCED: Self = Self {
        advanced: true,
        reward: 0,
    };
    pub const STALLED: Self = Self {
        advanced: false,
        reward: 0,
    };
}

/// Lifecycle state of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
pub enum BoardState {
    Active,
    GameOver,
}
