use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    cli::args::OutputFormat,
    core::{ScanReport, catalog::LoadFailure},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Scan,
    Stats,
    AddLanguage,
    RemoveLanguage,
    Backends,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Scan(ScanSummary),
    Stats(StatsSummary),
    AddLanguage(LanguageChange),
    RemoveLanguage(LanguageChange),
    Backends(Vec<BackendInfo>),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ScanSummary {
    pub report: ScanReport,
    pub format: OutputFormat,
    /// Number of source files handed to the scanner.
    pub source_files: usize,
    /// Catalog file declaring each unused key, for locations in the report.
    pub declared_in: BTreeMap<String, PathBuf>,
    /// Entries the source walk could not read.
    pub skipped_count: usize,
}

#[derive(Debug)]
pub struct StatsSummary {
    pub catalogs: Vec<CatalogStats>,
}

#[derive(Debug)]
pub struct CatalogStats {
    pub name: String,
    pub directory: PathBuf,
    pub languages: Vec<LanguageStats>,
}

#[derive(Debug)]
pub struct LanguageStats {
    /// Culture code, empty for the invariant language.
    pub culture: String,
    pub display_name: Option<String>,
    pub total: usize,
    pub completed: usize,
    pub percentage: f64,
}

#[derive(Debug)]
pub struct LanguageChange {
    pub catalog: String,
    pub culture: String,
    pub path: PathBuf,
    pub entry_count: usize,
}

#[derive(Debug)]
pub struct BackendInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub extensions: &'static [&'static str],
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

/// Result of running rescat commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
    /// Language files that failed to load and were left out.
    pub load_failures: Vec<LoadFailure>,
    /// Project root; reported paths are shown relative to it.
    pub root: PathBuf,
}

impl CommandResult {
    pub fn new(kind: CommandKind, summary: CommandSummary, root: &Path) -> Self {
        Self {
            kind,
            summary,
            error_count: 0,
            warning_count: 0,
            exit_on_errors: true,
            load_failures: Vec::new(),
            root: root.to_path_buf(),
        }
    }
}
