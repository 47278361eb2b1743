use anyhow::Context;
use openchat_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing openchat in: {}", root.display());

    let dir = paths::openchat_dir(root);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config = if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    } else {
        let cfg = Config::new();
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        cfg
    };

    let log_path = config.log_path(root);
    let created = io::touch(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;
    let verb = if created { "created:" } else { "exists: " };
    println!("  {verb} {}", log_path.display());

    Ok(())
}
