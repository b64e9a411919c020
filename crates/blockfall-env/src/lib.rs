//! Reinforcement-learning style environment around a [`blockfall_engine::Board`].
//!
//! [`TetrisEnv`] owns a board and drives it with the classic
//! `reset` / `step` / `render` loop:
//!
//! - actions are encoded as integers `0..6` ([`action_from_id`], [`action_id`])
//! - gravity runs every [`TetrisEnv::fall_speed`] steps, faster at higher levels
//! - the reward is the movement reward plus the score gained, with a penalty
//!   on the step that ends the game
//! - episodes are truncated after [`EnvConfig::max_episode_steps`] steps
//!
//! # Example
//!
//! ```
//! use blockfall_engine::PieceSeed;
//! use blockfall_env::{EnvConfig, TetrisEnv};
//!
//! let mut env = TetrisEnv::new(EnvConfig::default());
//! let (observation, _info) = env.reset(Some(PieceSeed::from(1)));
//! assert_eq!(observation.level, 1);
//!
//! let result = env.step_id(5).unwrap();
//! assert!(result.reward > 0);
//! assert!(!result.terminated);
//! ```

pub use self::{action_space::*, config::*, env::*, observation::*};

mod action_space;
mod config;
mod env;
mod observation;
mod render;
