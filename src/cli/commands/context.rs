use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, bail};
use log::debug;

use super::super::args::CommonArgs;
use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        Backend, BackendImpl, Catalog, CatalogLoad,
        backend::factory,
        scanner::{SourceFiles, collect_source_files},
    },
};

/// Configuration and backend resolved for one command invocation.
///
/// Precedence for every setting is CLI flag, then config file, then default.
pub struct ProjectContext {
    pub config: Config,
    /// Directory holding the config file, or the project root without one.
    pub root_dir: PathBuf,
    pub source_dir: PathBuf,
    pub catalog_dir: PathBuf,
    pub backend: BackendImpl,
    pub verbose: bool,
}

impl ProjectContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let root_dir = match &args.root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Failed to read current directory")?,
        };

        let config_result = load_config(&root_dir)?;

        // In verbose mode, inform user if using default config
        if args.verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let config = config_result.config;
        let base_dir = config_result.base_dir;

        let catalog_dir = match &args.catalog_root {
            Some(dir) => root_dir.join(dir),
            None => base_dir.join(&config.catalog_root),
        };

        let backend = match &args.backend {
            Some(name) => factory::resolve(name, &config.backend_options)?,
            None => factory::resolve_from_path(
                &catalog_dir,
                Some(&config.default_backend),
                &config.backend_options,
            )?,
        };
        debug!(
            "catalog directory {} uses the {} backend",
            catalog_dir.display(),
            backend.name()
        );

        let source_dir = base_dir.join(&config.source_root);

        Ok(Self {
            config,
            root_dir: base_dir,
            source_dir,
            catalog_dir,
            backend,
            verbose: args.verbose,
        })
    }

    /// Load every catalog of the catalog directory.
    pub fn load_catalogs(&self) -> Result<CatalogLoad> {
        Catalog::discover(&self.catalog_dir, &self.backend)
            .with_context(|| format!("Failed to load catalogs from {:?}", self.catalog_dir))
    }

    pub fn source_files(&self) -> SourceFiles {
        collect_source_files(&self.source_dir, &self.config.source_selection())
    }

    /// Path as shown to the user: relative to the project root when inside it.
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root_dir).unwrap_or(path)
    }
}

/// Pick the catalog a command works on.
///
/// With `base`, the catalog of that name. Without it, the only catalog of
/// the directory.
pub fn select_catalog<'a>(load: &'a CatalogLoad, base: Option<&str>) -> Result<&'a Catalog> {
    if let Some(base) = base {
        return load.catalog(base).with_context(|| {
            format!(
                "Catalog '{}' not found (available: {})",
                base,
                catalog_names(load)
            )
        });
    }

    match load.catalogs.as_slice() {
        [] => bail!("No catalogs found"),
        [catalog] => Ok(catalog),
        _ => bail!(
            "Several catalogs found ({}), choose one with --base",
            catalog_names(load)
        ),
    }
}

fn catalog_names(load: &CatalogLoad) -> String {
    load.catalogs
        .iter()
        .map(|c| c.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn args(root: &Path) -> CommonArgs {
        CommonArgs {
            root: Some(root.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_detects_json_catalog() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir(dir.path().join("Resources")).unwrap();
        fs::write(dir.path().join("Resources/Strings.json"), "{}").unwrap();

        let ctx = ProjectContext::new(&args(dir.path())).unwrap();

        assert_eq!(ctx.backend.name(), "json");
        assert_eq!(ctx.catalog_dir, dir.path().join("./Resources"));
    }

    #[test]
    fn test_context_flags_override_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "catalogRoot": "./i18n", "defaultBackend": "xml" }"#,
        )
        .unwrap();

        let ctx = ProjectContext::new(&CommonArgs {
            catalog_root: Some(PathBuf::from("lang")),
            backend: Some("json".to_string()),
            ..args(dir.path())
        })
        .unwrap();

        assert_eq!(ctx.catalog_dir, dir.path().join("lang"));
        assert_eq!(ctx.backend.name(), "json");
    }

    #[test]
    fn test_context_rejects_unknown_backend() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = ProjectContext::new(&CommonArgs {
            backend: Some("yaml".to_string()),
            ..args(dir.path())
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_select_catalog() {
        let mut load = CatalogLoad::default();
        assert!(select_catalog(&load, None).is_err());

        load.catalogs.push(Catalog::new("Errors", "Resources"));
        assert_eq!(select_catalog(&load, None).unwrap().base_name(), "Errors");

        load.catalogs.push(Catalog::new("Strings", "Resources"));
        let err = select_catalog(&load, None).unwrap_err().to_string();
        assert!(err.contains("--base"));
        assert_eq!(
            select_catalog(&load, Some("Strings")).unwrap().base_name(),
            "Strings"
        );
        assert!(select_catalog(&load, Some("Menu")).is_err());
    }
}
