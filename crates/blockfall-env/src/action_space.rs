use blockfall_engine::Action;

/// Number of discrete actions.
pub const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid action id {id} (expected 0..=5)")]
pub struct InvalidActionError {
    pub id: usize,
}

/// Decodes an integer action.
///
/// | id | action |
/// |----|--------|
/// | 0 | [`Action::Nothing`] |
/// | 1 | [`Action::MoveLeft`] |
/// | 2 | [`Action::MoveRight`] |
/// | 3 | [`Action::Rotate`] |
/// | 4 | [`Action::SoftDrop`] |
/// | 5 | [`Action::HardDrop`] |
pub fn action_from_id(id: usize) -> Result<Action, InvalidActionError> {
    let action = match id {
        0 => Action::Nothing,
        1 => Action::MoveLeft,
        2 => Action::MoveRight,
        3 => Action::Rotate,
        4 => Action::SoftDrop,
        5 => Action::HardDrop,
        _ => return Err(InvalidActionError { id }),
    };
    Ok(action)
}

/// Encodes an action as its integer id.
#[must_use]
pub const fn action_id(action: Action) -> usize {
    match action {
        Action::Nothing => 0,
        Action::MoveLeft => 1,
        Action::MoveRight => 2,
        Action::Rotate => 3,
        Action::SoftDrop => 4,
        Action::HardDrop => 5,
    }
}
