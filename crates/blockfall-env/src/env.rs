use blockfall_engine::{Action, Board, PieceSeed, PieceSource, RandomPieces};
use tracing::{debug, trace};

use crate::{
    action_space::{InvalidActionError, action_from_id},
    config::EnvConfig,
    observation::{Observation, StepInfo, StepResult},
    render::render_text,
};

/// A board driven one step at a time.
///
/// Each [`step`](Self::step) applies one action, advances the gravity frame
/// counter and ticks the board once the counter reaches
/// [`fall_speed`](Self::fall_speed). Call [`reset`](Self::reset) before the
/// first step; until then the board has no falling piece and every step is a
/// no-op.
#[derive(Debug, Clone)]
pub struct TetrisEnv<S = RandomPieces> {
    board: Board<S>,
    config: EnvConfig,
    step_count: u64,
    fall_time: u64,
    fall_speed: u64,
}

impl TetrisEnv<RandomPieces> {
    #[must_use]
    pub fn new(config: EnvConfig) -> Self {
        Self::with_source(config, RandomPieces::new())
    }
}

impl<S> TetrisEnv<S>
where
    S: PieceSource,
{
    #[must_use]
    pub fn with_source(config: EnvConfig, pieces: S) -> Self {
        let fall_speed = config.fall_speed(1);
        Self {
            board: Board::with_source(pieces),
            config,
            step_count: 0,
            fall_time: 0,
            fall_speed,
        }
    }

    /// Starts a new episode.
    ///
    /// With `Some(seed)` the piece source restarts from that seed, so the
    /// episode is reproducible. With `None` the source continues where it
    /// left off.
    pub fn reset(&mut self, seed: Option<PieceSeed>) -> (Observation, StepInfo) {
        if let Some(seed) = seed {
            self.board.reseed(seed);
        }
        self.board.reset();
        self.board.spawn_piece();

        self.step_count = 0;
        self.fall_time = 0;
        self.update_fall_speed();
        debug!(seed = ?seed.map(|s| s.to_string()), "environment reset");

        (self.observation(), self.info())
    }

    pub fn step(&mut self, action: Action) -> StepResult {
        let score_before = self.board.score();
        let was_over = self.board.is_game_over();

        let outcome = self.board.apply_action(action);

        self.fall_time += 1;
        if self.fall_time >= self.fall_speed {
            self.fall_time = 0;
            self.board.tick();
        }
        self.update_fall_speed();

        let score_delta = i64::try_from(self.board.score() - score_before).unwrap_or(i64::MAX);
        let mut reward = i64::from(outcome.reward).saturating_add(score_delta);
        let terminated = self.board.is_game_over();
        if terminated && !was_over {
            reward = reward.saturating_sub(self.config.game_over_penalty);
        }
        let truncated = !terminated
            && self
                .config
                .max_episode_steps
                .is_some_and(|max| self.step_count + 1 >= max);

        let result = StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info: self.info(),
        };
        self.step_count += 1;

        trace!(
            step = self.step_count,
            %action,
            moved = outcome.moved,
            reward,
            "step"
        );
        if terminated && !was_over {
            debug!(
                steps = self.step_count,
                score = self.board.score(),
                lines = self.board.lines_cleared(),
                "episode terminated"
            );
        } else if truncated {
            debug!(steps = self.step_count, "episode truncated");
        }

        result
    }

    /// Decodes an integer action and applies it.
    pub fn step_id(&mut self, id: usize) -> Result<StepResult, InvalidActionError> {
        Ok(self.step(action_from_id(id)?))
    }

    /// Plain-text rendering of the board, score and controls.
    #[must_use]
    pub fn render(&self) -> String {
        render_text(&self.board)
    }

    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::from(&self.board.snapshot())
    }

    #[must_use]
    pub fn info(&self) -> StepInfo {
        StepInfo {
            step_count: self.step_count,
            fall_speed: self.fall_speed,
            board_with_piece: self.board.board_with_piece_overlay().to_codes(),
        }
    }

    fn update_fall_speed(&mut self) {
        self.fall_speed = self.config.fall_speed(self.board.level());
    }

    #[must_use]
    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Steps between gravity ticks at the current level.
    #[must_use]
    pub fn fall_speed(&self) -> u64 {
        self.fall_speed
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}
