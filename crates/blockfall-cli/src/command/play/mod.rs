use std::time::Duration;

use blockfall_engine::PieceSeed;
use blockfall_env::EnvConfig;
use tracing::info;

use crate::{input::ActionDebounce, tui::Runtime};

use self::app::PlayApp;

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Minimum delay between two accepted moves, in milliseconds
    #[clap(long, default_value_t = 100)]
    action_delay: u64,
    /// Seed of the first game's piece sequence (32 hex digits or an integer)
    #[clap(long, value_parser = parse_seed)]
    seed: Option<PieceSeed>,
    /// Hide the drop preview
    #[clap(long)]
    no_ghost: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            action_delay: 100,
            seed: None,
            no_ghost: false,
        }
    }
}

pub(crate) fn parse_seed(s: &str) -> Result<PieceSeed, String> {
    let seed = if s.len() == 32 {
        s.parse::<PieceSeed>().ok()
    } else {
        s.parse::<u64>().ok().map(PieceSeed::from)
    };
    seed.ok_or_else(|| format!("invalid seed `{s}`: expected an integer or 32 hex digits"))
}

pub(crate) fn run(arg: &PlayArg, config: EnvConfig) -> anyhow::Result<()> {
    let PlayArg {
        action_delay,
        seed,
        no_ghost,
    } = arg;

    let debounce = ActionDebounce::new(Duration::from_millis(*action_delay));
    let mut app = PlayApp::new(config, *seed, debounce).show_ghost(!*no_ghost);

    info!(seed = ?seed.map(|s| s.to_string()), "play session started");
    Runtime::new().run(&mut app)?;
    info!(
        games = app.games_played(),
        best_score = app.best_score(),
        "play session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42"), Ok(PieceSeed::from(42)));
        assert_eq!(
            parse_seed("0000000000000000000000000000002a"),
            Ok(PieceSeed::from(42))
        );
        assert!(parse_seed("2a").is_err());
        assert!(parse_seed("not a seed").is_err());
    }
}
