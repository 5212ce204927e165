//! Source file discovery.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use log::warn;
use walkdir::{DirEntry, WalkDir};

/// Build output and dependency directories never worth scanning.
const ALWAYS_SKIPPED_DIRS: &[&str] = &["bin", "obj", "node_modules", ".git"];

/// File stem suffix of code generated from `.resx` catalogs (`Resources.Designer.cs`).
/// Such files look up every key through `ResourceManager.GetString`.
const DESIGNER_SUFFIX: &str = ".designer";

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of walking the source tree.
#[derive(Debug, Default)]
pub struct SourceFiles {
    /// Sorted, without duplicates from overlapping includes.
    pub files: BTreeSet<PathBuf>,
    /// Entries that could not be read while walking.
    pub skipped_count: usize,
}

/// Where to look for source files.
#[derive(Debug, Clone, Default)]
pub struct SourceSelection {
    /// Directories or glob patterns relative to the root. Empty means the root.
    pub includes: Vec<String>,
    /// Glob patterns, or literal path prefixes relative to the root.
    pub ignores: Vec<String>,
    /// File extensions without the dot, compared case-insensitively.
    pub extensions: Vec<String>,
}

pub fn collect_source_files(root: &Path, selection: &SourceSelection) -> SourceFiles {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in &selection.ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!("invalid ignore pattern '{}': {}", p, e),
            }
        } else {
            literal_ignore_paths.push(root.join(p));
        }
    }

    for dir in include_roots(root, &selection.includes) {
        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn!("cannot access path: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if entry.file_type().is_file()
                && has_extension(path, &selection.extensions)
                && !is_designer_file(path)
            {
                files.insert(path.to_path_buf());
            }
        }
    }

    SourceFiles {
        files,
        skipped_count,
    }
}

fn include_roots(root: &Path, includes: &[String]) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![root.to_path_buf()];
    }

    let mut paths = Vec::new();
    for inc in includes {
        if is_glob_pattern(inc) {
            let full_pattern = root.join(inc);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => paths.extend(entries.flatten().filter(|p| p.is_dir())),
                Err(e) => warn!("invalid include pattern '{}': {}", inc, e),
            }
        } else {
            let path = root.join(inc);
            if path.exists() {
                paths.push(path);
            } else {
                warn!("include path does not exist: {}", path.display());
            }
        }
    }
    paths
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| ALWAYS_SKIPPED_DIRS.contains(&name))
}

fn is_designer_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.to_ascii_lowercase().ends_with(DESIGNER_SUFFIX))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
