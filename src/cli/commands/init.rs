use std::{env, fs};

use anyhow::{Context, Result, bail};

use super::{CommandKind, CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init() -> Result<CommandResult> {
    let root = env::current_dir().context("Failed to read current directory")?;
    let config_path = root.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(&config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    Ok(CommandResult::new(
        CommandKind::Init,
        CommandSummary::Init(InitSummary {
            path: config_path,
        }),
        &root,
    ))
}
