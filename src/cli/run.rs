//! Dispatch a parsed command line to its command handler.

use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult,
        backends::backends,
        init::init,
        language::{add_language, remove_language},
        scan::scan,
        stats::stats,
    },
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Scan(args)) => scan(args),
        Some(Command::Stats(args)) => stats(args),
        Some(Command::AddLanguage(args)) => add_language(args),
        Some(Command::RemoveLanguage(args)) => remove_language(args),
        Some(Command::Backends) => Ok(backends()),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
