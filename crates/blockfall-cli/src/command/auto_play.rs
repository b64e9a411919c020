use std::io::{self, Write as _};

use anyhow::Context as _;
use blockfall_engine::{PieceSeed, PieceSource};
use blockfall_env::{ACTION_COUNT, EnvConfig, InvalidActionError, TetrisEnv, action_from_id};
use rand::{Rng, SeedableRng as _, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of episodes to run
    #[clap(long, default_value_t = 1)]
    episodes: u64,
    /// Seed for the agent and the piece sequences; random when omitted
    #[clap(long)]
    seed: Option<u64>,
    /// Print one JSON object per episode instead of plain text
    #[clap(long)]
    json: bool,
    /// Print the final board of each episode
    #[clap(long)]
    render: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct EpisodeSummary {
    episode: u64,
    seed: PieceSeed,
    steps: u64,
    #[serde(rename = "return")]
    total_reward: i64,
    score: u64,
    lines: u64,
    level: u64,
    terminated: bool,
    truncated: bool,
}

pub(crate) fn run(arg: &AutoPlayArg, config: EnvConfig) -> anyhow::Result<()> {
    let AutoPlayArg {
        episodes,
        seed,
        json,
        render,
    } = arg;

    if config.max_episode_steps.is_none() {
        // a random agent usually tops out, but nothing guarantees it
        info!("running without a step limit");
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };
    let mut env = TetrisEnv::new(config);
    let mut stdout = io::stdout().lock();

    let mut total_score = 0;
    for episode in 0..*episodes {
        let summary = run_episode(&mut env, &mut rng, episode)?;
        total_score += summary.score;

        if *json {
            let line = serde_json::to_string(&summary).context("Failed to encode summary")?;
            writeln!(stdout, "{line}")?;
        } else {
            writeln!(
                stdout,
                "episode {}: steps={} return={} score={} lines={} level={}{}",
                summary.episode,
                summary.steps,
                summary.total_reward,
                summary.score,
                summary.lines,
                summary.level,
                if summary.truncated {
                    " (truncated)"
                } else {
                    ""
                },
            )?;
        }
        if *render {
            writeln!(stdout, "{}", env.render())?;
        }
    }

    #[expect(clippy::cast_precision_loss)]
    let mean_score = if *episodes == 0 {
        0.0
    } else {
        total_score as f64 / *episodes as f64
    };
    info!(episodes, mean_score, "auto-play finished");
    Ok(())
}

/// Plays one episode with uniformly random actions until it terminates or
/// is truncated.
fn run_episode<S, R>(
    env: &mut TetrisEnv<S>,
    rng: &mut R,
    episode: u64,
) -> Result<EpisodeSummary, InvalidActionError>
where
    S: PieceSource,
    R: Rng,
{
    let seed: PieceSeed = rng.random();
    env.reset(Some(seed));

    let mut total_reward = 0i64;
    let (terminated, truncated) = loop {
        let action = action_from_id(rng.random_range(0..ACTION_COUNT))?;
        let result = env.step(action);
        total_reward = total_reward.saturating_add(result.reward);
        if result.is_done() {
            break (result.terminated, result.truncated);
        }
    };

    let board = env.board();
    let summary = EpisodeSummary {
        episode,
        seed,
        steps: env.step_count(),
        total_reward,
        score: board.score(),
        lines: board.lines_cleared(),
        level: board.level(),
        terminated,
        truncated,
    };
    debug!(?summary, "episode finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> EnvConfig {
        EnvConfig {
            max_episode_steps: Some(500),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn test_episode_ends_by_termination_or_truncation() {
        let mut env = TetrisEnv::new(short_config());
        let mut rng = StdRng::seed_from_u64(1);
        let summary = run_episode(&mut env, &mut rng, 0).unwrap();
        assert!(summary.terminated != summary.truncated);
        assert!(summary.steps <= 500);
        if summary.truncated {
            assert_eq!(summary.steps, 500);
        }
    }

    #[test]
    fn test_same_seed_gives_same_summaries() {
        let play = || {
            let mut env = TetrisEnv::new(short_config());
            let mut rng = StdRng::seed_from_u64(99);
            (0..3)
                .map(|episode| run_episode(&mut env, &mut rng, episode).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_summary_json_fields() {
        let mut env = TetrisEnv::new(short_config());
        let mut rng = StdRng::seed_from_u64(3);
        let summary = run_episode(&mut env, &mut rng, 4).unwrap();
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["episode"], 4);
        assert_eq!(value["return"], summary.total_reward);
        assert_eq!(value["seed"].as_str().map(str::len), Some(32));
    }
}
