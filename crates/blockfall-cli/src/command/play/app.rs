use std::time::Instant;

use blockfall_engine::{Action, PieceSeed};
use blockfall_env::{EnvConfig, TetrisEnv};
use crossterm::event::{Event, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tracing::{debug, info};

use crate::{
    input::{ActionDebounce, Command, Input, input_from_event},
    tui::{App, RenderMode, Runtime},
    ui::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay, Overlay},
};

const FPS: f64 = 60.0;

const START_KEYS: &[KeyBinding] = &[(&["any key"], "Start"), (&["Q", "Esc"], "Quit")];
const PLAYING_KEYS: &[KeyBinding] = &[
    (&["A", "D", "←", "→"], "Move"),
    (&["W", "↑"], "Rotate"),
    (&["S", "↓"], "Soft drop"),
    (&["Space"], "Hard drop"),
    (&["P"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["R"], "Restart"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
enum PlayState {
    Start,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug)]
pub(super) struct PlayApp {
    env: TetrisEnv,
    state: PlayState,
    debounce: ActionDebounce,
    pending_action: Option<Action>,
    show_ghost: bool,
    games_played: u64,
    best_score: u64,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(
        config: EnvConfig,
        seed: Option<PieceSeed>,
        debounce: ActionDebounce,
    ) -> Self {
        let mut env = TetrisEnv::new(config);
        env.reset(seed);
        Self {
            env,
            state: PlayState::Start,
            debounce,
            pending_action: None,
            show_ghost: true,
            games_played: 0,
            best_score: 0,
            is_exiting: false,
        }
    }

    pub(super) fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub(super) fn games_played(&self) -> u64 {
        self.games_played
    }

    pub(super) fn best_score(&self) -> u64 {
        self.best_score
    }

    fn set_state(&mut self, runtime: &mut Runtime, state: PlayState) {
        debug!(from = ?self.state, to = ?state, "play state changed");
        self.state = state;
        Self::configure(runtime, state);
    }

    /// Only a running game ticks; the other screens redraw on input.
    fn configure(runtime: &mut Runtime, state: PlayState) {
        if state.is_playing() {
            runtime.set_tick_rate(Some(FPS));
            runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        } else {
            runtime.set_tick_rate(None);
            runtime.set_render_mode(RenderMode::OnDirty);
        }
    }

    fn start_game(&mut self, runtime: &mut Runtime, reset: bool) {
        if reset {
            self.env.reset(None);
        }
        self.games_played += 1;
        self.pending_action = None;
        self.debounce.clear();
        info!(game = self.games_played, "game started");
        self.set_state(runtime, PlayState::Playing);
    }

    fn finish_game(&mut self, runtime: &mut Runtime) {
        let board = self.env.board();
        self.best_score = self.best_score.max(board.score());
        info!(
            game = self.games_played,
            score = board.score(),
            lines = board.lines_cleared(),
            level = board.level(),
            steps = self.env.step_count(),
            "game over"
        );
        self.set_state(runtime, PlayState::GameOver);
    }

    fn handle_input(&mut self, runtime: &mut Runtime, input: Input) {
        let now = Instant::now();
        match (self.state, input) {
            (_, Input::Command(Command::Quit)) => self.is_exiting = true,
            (PlayState::Playing, Input::Action(action)) if self.debounce.accept(now) => {
                self.pending_action = Some(action);
            }
            (PlayState::Playing, Input::Command(Command::Pause)) => {
                self.set_state(runtime, PlayState::Paused);
            }
            (PlayState::Paused, Input::Command(Command::Pause)) => {
                self.set_state(runtime, PlayState::Playing);
            }
            (_, Input::Command(Command::Restart)) => self.start_game(runtime, true),
            _ => {}
        }
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        match self.state {
            PlayState::Start => START_KEYS,
            PlayState::Playing => PLAYING_KEYS,
            PlayState::Paused => PAUSED_KEYS,
            PlayState::GameOver => GAME_OVER_KEYS,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        Self::configure(runtime, self.state);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        let input = input_from_event(&event);
        if self.state.is_start() {
            let is_press = matches!(&event, Event::Key(key) if key.kind == KeyEventKind::Press);
            match input {
                Some(Input::Command(Command::Quit)) => self.is_exiting = true,
                _ if is_press => self.start_game(runtime, false),
                _ => {}
            }
            return;
        }
        if let Some(input) = input {
            self.handle_input(runtime, input);
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if !self.state.is_playing() {
            return;
        }
        let action = self.pending_action.take().unwrap_or(Action::Nothing);
        // human play ignores the step limit, only the game ending stops it
        let result = self.env.step(action);
        if result.terminated {
            self.finish_game(runtime);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let overlay = match self.state {
            PlayState::Start => Some(Overlay::Start),
            PlayState::Playing => None,
            PlayState::Paused => Some(Overlay::Paused),
            PlayState::GameOver => Some(Overlay::GameOver),
        };
        let game = GameDisplay::new(self.env.board(), self.env.fall_speed())
            .show_ghost(self.show_ghost)
            .overlay(overlay);
        let help = KeyBindingDisplay::new(self.key_bindings());

        let [game_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(game, game_area);
        frame.render_widget(help, help_area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> PlayApp {
        let config = EnvConfig {
            base_fall_frames: 1,
            ..EnvConfig::default()
        };
        PlayApp::new(
            config,
            Some(PieceSeed::from(7)),
            ActionDebounce::new(Duration::ZERO),
        )
    }

    #[test]
    fn test_any_key_starts() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, press(KeyCode::Enter));
        assert!(app.state.is_playing());
        assert_eq!(app.games_played(), 1);
    }

    #[test]
    fn test_quit_from_start_screen() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, press(KeyCode::Char('q')));
        assert!(app.should_exit());
        assert_eq!(app.games_played(), 0);
    }

    #[test]
    fn test_pause_stops_updates() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, press(KeyCode::Char(' ')));
        app.handle_event(&mut runtime, press(KeyCode::Char('p')));
        assert!(app.state.is_paused());

        let before = app.env.step_count();
        app.update(&mut runtime);
        assert_eq!(app.env.step_count(), before);

        app.handle_event(&mut runtime, press(KeyCode::Char('p')));
        app.update(&mut runtime);
        assert_eq!(app.env.step_count(), before + 1);
    }

    #[test]
    fn test_pending_action_is_applied_once() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, press(KeyCode::Enter));
        app.handle_event(&mut runtime, press(KeyCode::Char(' ')));
        app.update(&mut runtime);
        assert!(app.pending_action.is_none());
        assert_eq!(app.env.board().stats().completed_pieces(), 1);
    }

    #[test]
    fn test_actions_inside_debounce_delay_are_dropped() {
        let mut app = PlayApp::new(
            EnvConfig::default(),
            Some(PieceSeed::from(7)),
            ActionDebounce::new(Duration::from_secs(3600)),
        );
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, press(KeyCode::Enter));
        app.handle_event(&mut runtime, press(KeyCode::Left));
        app.handle_event(&mut runtime, press(KeyCode::Right));
        assert_eq!(app.pending_action, Some(Action::MoveLeft));

        // commands bypass the debounce
        app.handle_event(&mut runtime, press(KeyCode::Char('p')));
        assert!(app.state.is_paused());
    }

    #[test]
    fn test_hard_drops_end_the_game_and_restart() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, press(KeyCode::Enter));
        for _ in 0..200 {
            if app.state.is_game_over() {
                break;
            }
            app.handle_event(&mut runtime, press(KeyCode::Char(' ')));
            app.update(&mut runtime);
        }
        assert!(app.state.is_game_over());

        // actions are ignored after game over
        app.handle_event(&mut runtime, press(KeyCode::Left));
        assert!(app.pending_action.is_none());

        app.handle_event(&mut runtime, press(KeyCode::Char('r')));
        assert!(app.state.is_playing());
        assert_eq!(app.games_played(), 2);
        assert!(!app.env.board().is_game_over());
        assert_eq!(app.env.board().score(), 0);
    }
}
