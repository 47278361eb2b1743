use anyhow::Context;
use openchat_core::config::Config;
use openchat_core::journal::{ActionRecorder, Replay, ReplayLoader};
use openchat_core::receptionist::JsonReceptionist;
use std::fs::File;
use std::path::Path;

pub type Session = ActionRecorder<JsonReceptionist, File>;

/// Rebuild the project's state from its action log and return a receptionist
/// that appends every further mutation to the same log.
pub fn open(root: &Path) -> anyhow::Result<Session> {
    let config = Config::load(root).context("failed to load config")?;
    let log_path = config.log_path(root);
    let replay = replay(&config, &log_path)?;
    ActionRecorder::appending_to(replay.receptionist, &log_path)
        .with_context(|| format!("failed to open action log {}", log_path.display()))
}

pub fn replay(config: &Config, log_path: &Path) -> anyhow::Result<Replay> {
    let loader = ReplayLoader::new(config.moderation.clone());
    if !log_path.exists() {
        tracing::info!(path = %log_path.display(), "no action log yet, starting empty");
        return Ok(loader.replay(std::io::empty())?);
    }
    loader
        .replay_file(log_path)
        .with_context(|| format!("failed to replay action log {}", log_path.display()))
}
