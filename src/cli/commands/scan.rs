use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Result;
use log::info;

use super::super::args::ScanArgs;
use super::{
    CommandKind, CommandResult, CommandSummary, ScanSummary,
    context::{ProjectContext, select_catalog},
};
use crate::core::{CancellationToken, Catalog, ScanReport, Scanner};

pub fn scan(args: ScanArgs) -> Result<CommandResult> {
    let ctx = ProjectContext::new(&args.common)?;
    let load = ctx.load_catalogs()?;
    let catalog = select_catalog(&load, args.base.as_deref())?;

    let sources = ctx.source_files();
    let files: Vec<PathBuf> = sources.files.into_iter().collect();
    info!(
        "scanning {} source file(s) against catalog {}",
        files.len(),
        catalog.display_name()
    );

    let parallelism = args.parallelism.unwrap_or(ctx.config.parallelism);
    let scanner = Scanner::new(ctx.config.accessors(), parallelism);
    let mut report = scanner.scan(catalog, &files, &CancellationToken::new());
    relativize(&mut report, &ctx);

    let declared_in = declaring_files(catalog, &report.unused, &ctx);
    let error_count = report.missing.len();
    let warning_count = report.unused.len() + report.needs_review.len();

    let mut result = CommandResult::new(
        CommandKind::Scan,
        CommandSummary::Scan(ScanSummary {
            report,
            format: args.format,
            source_files: files.len(),
            declared_in,
            skipped_count: sources.skipped_count,
        }),
        &ctx.root_dir,
    );
    result.error_count = error_count;
    result.warning_count = warning_count;
    result.load_failures = load.failures;
    Ok(result)
}

/// Rewrite every path of `report` relative to the project root.
fn relativize(report: &mut ScanReport, ctx: &ProjectContext) {
    let relative = |path: &mut PathBuf| *path = ctx.display_path(path).to_path_buf();

    for file in &mut report.files {
        relative(&mut file.path);
        for reference in &mut file.references {
            relative(&mut reference.file_path);
        }
    }
    for reference in &mut report.needs_review {
        relative(&mut reference.file_path);
    }
    for warning in &mut report.warnings {
        relative(&mut warning.path);
    }
    report.partially_scanned.iter_mut().for_each(relative);
}

/// First language file, in culture order, declaring each of `keys`.
fn declaring_files(
    catalog: &Catalog,
    keys: &[String],
    ctx: &ProjectContext,
) -> BTreeMap<String, PathBuf> {
    keys.iter()
        .filter_map(|key| {
            let file = catalog.files().iter().find(|f| f.contains_key(key))?;
            Some((
                key.clone(),
                ctx.display_path(file.language().path()).to_path_buf(),
            ))
        })
        .collect()
}
