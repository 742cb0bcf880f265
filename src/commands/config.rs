use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use bloom::defaults::{self, BloomConfig};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display effective configuration (bloom.json over built-in defaults)
    Show,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    path: String,
    exists: bool,
    config: BloomConfig,
}

pub fn run(args: ConfigArgs, _global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show => show(),
    }
}

fn show() -> CmdResult<ConfigOutput> {
    let path = defaults::config_path()?;
    let exists = Path::new(&path).exists();
    let config = defaults::load_config()?;

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            path,
            exists,
            config,
        },
        0,
    ))
}
