use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Tunable parameters of [`TetrisEnv`](crate::TetrisEnv).
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides:
///
/// ```
/// use blockfall_env::EnvConfig;
///
/// let config = EnvConfig::from_json_str(r#"{ "max_episode_steps": null }"#).unwrap();
/// assert_eq!(config.max_episode_steps, None);
/// assert_eq!(config.base_fall_frames, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    /// Steps between gravity ticks at level 1.
    pub base_fall_frames: u64,
    /// How many steps faster gravity becomes per level.
    pub fall_frames_per_level: u64,
    /// Subtracted from the reward of the step that ends the game.
    pub game_over_penalty: i64,
    /// Truncate episodes after this many steps; `None` never truncates.
    pub max_episode_steps: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            base_fall_frames: 60,
            fall_frames_per_level: 5,
            game_over_penalty: 100,
            max_episode_steps: Some(10_000),
        }
    }
}

impl EnvConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Steps between gravity ticks at `level`, never below 1.
    #[must_use]
    pub fn fall_speed(&self, level: u64) -> u64 {
        let speedup = level
            .saturating_sub(1)
            .saturating_mul(self.fall_frames_per_level);
        self.base_fall_frames.saturating_sub(speedup).max(1)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("failed to read config file {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("invalid config: {_0}")]
    Parse(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_speed_by_level() {
        let config = EnvConfig::default();
        assert_eq!(config.fall_speed(1), 60);
        assert_eq!(config.fall_speed(2), 55);
        assert_eq!(config.fall_speed(12), 5);
        assert_eq!(config.fall_speed(13), 1);
        assert_eq!(config.fall_speed(u64::MAX), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EnvConfig::from_json_str(r#"{ "game_over_penalty": 5 }"#).unwrap();
        assert_eq!(
            config,
            EnvConfig {
                game_over_penalty: 5,
                ..EnvConfig::default()
            }
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = EnvConfig::from_json_str(r#"{ "fall_speed": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config:"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EnvConfig::from_json_file("/nonexistent/blockfall.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/blockfall.json"));
    }
}
