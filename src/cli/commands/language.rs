use std::fs;

use anyhow::{Context, Result, bail};

use super::super::args::{AddLanguageArgs, RemoveLanguageArgs};
use super::{
    CommandKind, CommandResult, CommandSummary, LanguageChange,
    context::{ProjectContext, select_catalog},
    helper::block_on,
};
use crate::core::{
    CancellationToken, Catalog, CatalogLoad, ResourceWriter, catalog::is_culture_code,
    writer::CreateLanguage,
};

pub fn add_language(args: AddLanguageArgs) -> Result<CommandResult> {
    if !is_culture_code(&args.culture) {
        bail!("Invalid culture code '{}'", args.culture);
    }

    let ctx = ProjectContext::new(&args.common)?;
    if !ctx.catalog_dir.exists() && args.base.is_some() {
        fs::create_dir_all(&ctx.catalog_dir).with_context(|| {
            format!("Failed to create catalog directory {:?}", ctx.catalog_dir)
        })?;
    }
    let load = ctx.load_catalogs()?;

    let new_catalog;
    let catalog = match args.base.as_deref() {
        Some(base) if load.catalog(base).is_none() => {
            new_catalog = Catalog::new(base, &ctx.catalog_dir);
            &new_catalog
        }
        base => select_catalog(&load, base)?,
    };

    let source = match args.from.as_deref() {
        Some(from) => Some(catalog.file(from).with_context(|| {
            format!(
                "Language '{}' not found in catalog '{}'",
                from,
                catalog.display_name()
            )
        })?),
        None => catalog.file("").or_else(|| catalog.files().first()),
    };

    let request = CreateLanguage {
        base_name: catalog.base_name().to_string(),
        culture: args.culture.clone(),
        target_dir: catalog.directory().to_path_buf(),
        source: source.cloned(),
        copy_entries: args.copy,
    };
    let writer = ResourceWriter::new(ctx.backend.clone());
    let file = block_on(writer.create_language_file_async(request, &CancellationToken::new()))?
        .with_context(|| format!("Failed to add language '{}'", args.culture))?;

    let change = LanguageChange {
        catalog: catalog.display_name(),
        culture: args.culture,
        path: ctx.display_path(file.language().path()).to_path_buf(),
        entry_count: file.len(),
    };
    Ok(finish(
        CommandKind::AddLanguage,
        CommandSummary::AddLanguage(change),
        &ctx,
        load,
    ))
}

pub fn remove_language(args: RemoveLanguageArgs) -> Result<CommandResult> {
    let ctx = ProjectContext::new(&args.common)?;
    let load = ctx.load_catalogs()?;
    let catalog = select_catalog(&load, args.base.as_deref())?;

    let file = catalog.file(&args.culture).with_context(|| {
        format!(
            "Language '{}' not found in catalog '{}'",
            args.culture,
            catalog.display_name()
        )
    })?;

    let writer = ResourceWriter::new(ctx.backend.clone());
    block_on(writer.delete_language_file_async(file.language(), &CancellationToken::new()))?
        .with_context(|| format!("Failed to remove language '{}'", args.culture))?;

    let change = LanguageChange {
        catalog: catalog.display_name(),
        culture: args.culture.clone(),
        path: ctx.display_path(file.language().path()).to_path_buf(),
        entry_count: file.len(),
    };
    Ok(finish(
        CommandKind::RemoveLanguage,
        CommandSummary::RemoveLanguage(change),
        &ctx,
        load,
    ))
}

fn finish(
    kind: CommandKind,
    summary: CommandSummary,
    ctx: &ProjectContext,
    load: CatalogLoad,
) -> CommandResult {
    let mut result = CommandResult::new(kind, summary, &ctx.root_dir);
    result.warning_count = load.failures.len();
    result.load_failures = load.failures;
    result
}
