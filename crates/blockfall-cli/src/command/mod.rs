use std::path::{Path, PathBuf};

use anyhow::Context as _;
use blockfall_env::EnvConfig;
use clap::{Parser, Subcommand};

use crate::logging::{self, LogTarget};

use self::{auto_play::AutoPlayArg, play::PlayArg};

mod auto_play;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write logs to this file (the log level is read from `RUST_LOG`)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Environment config file (JSON format)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Override the step limit of one episode (0 disables the limit)
    #[clap(long, global = true)]
    max_steps: Option<u64>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play with the keyboard
    #[command(name = "play")]
    Play(#[clap(flatten)] PlayArg),
    /// Run episodes with a random agent, without a terminal UI
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));

    // the TUI owns the terminal, so play only logs to a file
    let target = match (&args.log_file, &mode) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, Mode::AutoPlay(_)) => LogTarget::Stderr,
        (None, Mode::Play(_)) => LogTarget::Disabled,
    };
    logging::init(&target)?;

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EnvConfig::default(),
    };
    if let Some(max_steps) = args.max_steps {
        config.max_episode_steps = (max_steps > 0).then_some(max_steps);
    }

    match mode {
        Mode::Play(arg) => play::run(&arg, config)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg, config)?,
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<EnvConfig> {
    let config = EnvConfig::from_json_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
