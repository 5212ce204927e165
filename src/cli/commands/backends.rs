use std::path::Path;

use super::{BackendInfo, CommandKind, CommandResult, CommandSummary};
use crate::core::backend::factory;

pub fn backends() -> CommandResult {
    let infos = factory::registry()
        .iter()
        .map(|d| BackendInfo {
            name: d.name,
            aliases: d.aliases,
            description: d.description,
            extensions: d.extensions,
        })
        .collect();

    CommandResult::new(
        CommandKind::Backends,
        CommandSummary::Backends(infos),
        Path::new("."),
    )
}
