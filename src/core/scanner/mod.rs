//! Usage scanner.
//!
//! Finds resource key references in source text without compiling it:
//!
//! 1. `sources` walks the source tree
//! 2. `lexer` splits each file into code tokens, dropping comments and
//!    keeping string literals opaque
//! 3. `classify` recognizes accessor shapes and grades their confidence
//! 4. `report` reconciles the references with a catalog
//!
//! Files are scanned in parallel on a bounded thread pool. Per-file results
//! are sorted before merging, so the report does not depend on scheduling.

pub mod classify;
pub mod lexer;
pub mod reference;
pub mod report;
pub mod sources;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use rayon::prelude::*;

pub use classify::Accessors;
pub use reference::{AccessPattern, Confidence, FileScan, ScanWarning, UsageReference};
pub use report::{Reconciliation, ScanReport, reconcile};
pub use sources::{SourceFiles, SourceSelection, collect_source_files};

use crate::core::{cancel::CancellationToken, catalog::Catalog};

/// References found across a set of source files.
#[derive(Debug, Clone, Default)]
pub struct SourceScan {
    /// Sorted by path.
    pub files: Vec<FileScan>,
    pub warnings: Vec<ScanWarning>,
    /// Cancellation was observed; `files` holds what finished before.
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    accessors: Accessors,
    /// Worker threads; 0 uses one per CPU.
    parallelism: usize,
}

impl Scanner {
    pub fn new(accessors: Accessors, parallelism: usize) -> Self {
        Self {
            accessors,
            parallelism,
        }
    }

    pub fn accessors(&self) -> &Accessors {
        &self.accessors
    }

    /// Scan one source text.
    pub fn scan_source(&self, path: &Path, text: &str) -> FileScan {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lexed = lexer::tokenize(text);
        let mut references = classify::classify(path, &lexed.tokens, &self.accessors);
        references.sort_by_key(|r| (r.line, r.column));
        FileScan {
            path: path.to_path_buf(),
            references,
            partial: lexed.partial,
        }
    }

    /// Read and scan one file. Unreadable or non-UTF-8 files become warnings.
    pub fn scan_file(&self, path: &Path) -> Result<FileScan, ScanWarning> {
        let bytes = fs::read(path).map_err(|e| ScanWarning {
            path: path.to_path_buf(),
            message: format!("cannot read file: {}", e),
        })?;
        let text = String::from_utf8(bytes).map_err(|e| ScanWarning {
            path: path.to_path_buf(),
            message: format!(
                "not valid UTF-8 (byte {}), skipped",
                e.utf8_error().valid_up_to()
            ),
        })?;
        Ok(self.scan_source(path, &text))
    }

    /// Scan `files` in parallel, checking `token` before each file.
    pub fn scan_files(&self, files: &[PathBuf], token: &CancellationToken) -> SourceScan {
        let scan_all = || {
            files
                .par_iter()
                .map(|path| {
                    if token.is_cancelled() {
                        return None;
                    }
                    debug!("scanning {}", path.display());
                    Some(self.scan_file(path))
                })
                .collect::<Vec<_>>()
        };

        let outcomes = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .build()
        {
            Ok(pool) => pool.install(scan_all),
            Err(e) => {
                warn!("cannot build scan thread pool, using the global one: {}", e);
                scan_all()
            }
        };

        let mut scan = SourceScan::default();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(file) => scan.files.push(file),
                Err(warning) => scan.warnings.push(warning),
            }
        }
        scan.files.sort_by(|a, b| a.path.cmp(&b.path));
        scan.warnings.sort_by(|a, b| a.path.cmp(&b.path));
        scan.cancelled = token.is_cancelled();
        scan
    }

    /// Scan `files` and reconcile the references with `catalog`.
    pub fn scan(
        &self,
        catalog: &Catalog,
        files: &[PathBuf],
        token: &CancellationToken,
    ) -> ScanReport {
        ScanReport::new(catalog, self.scan_files(files, token))
    }
}
