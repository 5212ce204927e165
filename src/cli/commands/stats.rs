use anyhow::Result;

use super::super::args::StatsArgs;
use super::{
    CatalogStats, CommandKind, CommandResult, CommandSummary, LanguageStats, StatsSummary,
    context::{ProjectContext, select_catalog},
};
use crate::core::Catalog;

pub fn stats(args: StatsArgs) -> Result<CommandResult> {
    let ctx = ProjectContext::new(&args.common)?;
    let load = ctx.load_catalogs()?;

    let catalogs: Vec<&Catalog> = match args.base.as_deref() {
        Some(base) => vec![select_catalog(&load, Some(base))?],
        None => load.catalogs.iter().collect(),
    };

    let catalogs = catalogs
        .into_iter()
        .map(|catalog| CatalogStats {
            name: catalog.display_name(),
            directory: ctx.display_path(catalog.directory()).to_path_buf(),
            languages: catalog
                .files()
                .iter()
                .map(|file| LanguageStats {
                    culture: file.language().culture().to_string(),
                    display_name: file.language().display_name().map(str::to_string),
                    total: file.len(),
                    completed: file.completed_count(),
                    percentage: file.completion_percentage(),
                })
                .collect(),
        })
        .collect();

    let mut result = CommandResult::new(
        CommandKind::Stats,
        CommandSummary::Stats(StatsSummary { catalogs }),
        &ctx.root_dir,
    );
    result.warning_count = load.failures.len();
    result.load_failures = load.failures;
    Ok(result)
}
