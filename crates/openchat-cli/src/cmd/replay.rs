use crate::output::print_json;
use crate::session;
use anyhow::Context;
use openchat_core::config::Config;
use std::path::Path;

/// Replay the action log from scratch and report what it rebuilds.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let log_path = config.log_path(root);
    let replay = session::replay(&config, &log_path)?;
    let records = replay.records;
    let system = replay.receptionist.system();

    if json {
        print_json(&serde_json::json!({
            "log": log_path,
            "records": records,
            "users": system.number_of_users(),
            "publications": system.number_of_publications(),
        }))?;
    } else {
        println!("Replayed {records} record(s) from {}", log_path.display());
        println!("  users:        {}", system.number_of_users());
        println!("  publications: {}", system.number_of_publications());
    }
    Ok(())
}
