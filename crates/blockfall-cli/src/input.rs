//! Keyboard input for human play.
//!
//! Keys map either to a game [`Action`] or to a [`Command`] that controls the
//! session. Game actions are rate limited by [`ActionDebounce`]; commands are
//! always accepted.

use std::time::{Duration, Instant};

use blockfall_engine::Action;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Restart,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum Input {
    Action(Action),
    Command(Command),
}

/// Translates a terminal event into an [`Input`].
///
/// Only key presses count; repeats and releases are ignored.
pub fn input_from_event(event: &Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => input_from_key(*key),
        _ => None,
    }
}

fn input_from_key(key: KeyEvent) -> Option<Input> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit.into());
    }
    let input = match key.code {
        KeyCode::Char('a' | 'A') | KeyCode::Left => Action::MoveLeft.into(),
        KeyCode::Char('d' | 'D') | KeyCode::Right => Action::MoveRight.into(),
        KeyCode::Char('w' | 'W') | KeyCode::Up => Action::Rotate.into(),
        KeyCode::Char('s' | 'S') | KeyCode::Down => Action::SoftDrop.into(),
        KeyCode::Char(' ') => Action::HardDrop.into(),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Quit.into(),
        KeyCode::Char('r' | 'R') => Command::Restart.into(),
        KeyCode::Char('p' | 'P') => Command::Pause.into(),
        _ => return None,
    };
    Some(input)
}

/// Accepts at most one game action per `delay`.
#[derive(Debug, Clone)]
pub struct ActionDebounce {
    delay: Duration,
    last_accepted: Option<Instant>,
}

impl ActionDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_accepted: None,
        }
    }

    /// Returns whether an action arriving at `now` is accepted, and records it
    /// if so.
    pub fn accept(&mut self, now: Instant) -> bool {
        let ready = self
            .last_accepted
            .is_none_or(|last| now.saturating_duration_since(last) >= self.delay);
        if ready {
            self.last_accepted = Some(now);
        }
        ready
    }

    pub fn clear(&mut self) {
        self.last_accepted = None;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Option<Input> {
        input_from_event(&key(code, KeyEventKind::Press))
    }

    #[test]
    fn test_movement_keys() {
        for code in [KeyCode::Char('a'), KeyCode::Char('A'), KeyCode::Left] {
            assert_eq!(press(code), Some(Input::Action(Action::MoveLeft)));
        }
        for code in [KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Right] {
            assert_eq!(press(code), Some(Input::Action(Action::MoveRight)));
        }
        for code in [KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Up] {
            assert_eq!(press(code), Some(Input::Action(Action::Rotate)));
        }
        for code in [KeyCode::Char('s'), KeyCode::Char('S'), KeyCode::Down] {
            assert_eq!(press(code), Some(Input::Action(Action::SoftDrop)));
        }
        assert_eq!(
            press(KeyCode::Char(' ')),
            Some(Input::Action(Action::HardDrop))
        );
    }

    #[test]
    fn test_command_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            assert_eq!(press(code), Some(Input::Command(Command::Quit)));
        }
        for code in [KeyCode::Char('r'), KeyCode::Char('R')] {
            assert_eq!(press(code), Some(Input::Command(Command::Restart)));
        }
        assert_eq!(
            press(KeyCode::Char('p')),
            Some(Input::Command(Command::Pause))
        );
        assert_eq!(press(KeyCode::Char('x')), None);
        assert_eq!(press(KeyCode::Enter), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(
            input_from_event(&event),
            Some(Input::Command(Command::Quit))
        );
    }

    #[test]
    fn test_only_presses_count() {
        assert_eq!(
            input_from_event(&key(KeyCode::Left, KeyEventKind::Repeat)),
            None
        );
        assert_eq!(
            input_from_event(&key(KeyCode::Left, KeyEventKind::Release)),
            None
        );
        assert_eq!(input_from_event(&Event::FocusGained), None);
    }

    #[test]
    fn test_debounce_rejects_actions_inside_delay() {
        let mut debounce = ActionDebounce::new(Duration::from_millis(100));
        let start = Instant::now();
        assert!(debounce.accept(start));
        assert!(!debounce.accept(start + Duration::from_millis(50)));
        assert!(!debounce.accept(start + Duration::from_millis(99)));
        assert!(debounce.accept(start + Duration::from_millis(100)));
        // the delay restarts from the last accepted action
        assert!(!debounce.accept(start + Duration::from_millis(150)));
    }

    #[test]
    fn test_debounce_clear() {
        let mut debounce = ActionDebounce::new(Duration::from_secs(1));
        let now = Instant::now();
        assert!(debounce.accept(now));
        debounce.clear();
        assert!(debounce.accept(now));
    }
}
