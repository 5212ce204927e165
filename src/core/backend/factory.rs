//! Backend registry.
//!
//! Each format registers a descriptor (name, extensions, content detector,
//! constructor). The registry is built once per process and only read
//! afterwards; resolution is a linear scan over the descriptors.

use std::{fs, path::Path, sync::OnceLock};

use log::debug;

use super::{BackendImpl, BackendOptions, JsonBackend, XmlBackend};
use crate::core::error::{CatalogError, CatalogResult};

/// Registration record for one backend.
pub struct BackendDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub extensions: &'static [&'static str],
    /// Content sniffing for files whose extension no backend claims.
    detect: fn(&str) -> bool,
    construct: fn(&BackendOptions) -> BackendImpl,
}

impl BackendDescriptor {
    fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    fn claims_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    pub fn create(&self, options: &BackendOptions) -> BackendImpl {
        (self.construct)(options)
    }
}

static REGISTRY: OnceLock<Vec<BackendDescriptor>> = OnceLock::new();

/// Registered backends in resolution order.
pub fn registry() -> &'static [BackendDescriptor] {
    REGISTRY.get_or_init(|| {
        vec![
            BackendDescriptor {
                name: XmlBackend::NAME,
                aliases: &["resx"],
                description: "XML name/value/comment triples (.resx, .xml)",
                extensions: XmlBackend::EXTENSIONS,
                detect: XmlBackend::detect,
                construct: |options| XmlBackend::new(options.xml.clone()).into(),
            },
            BackendDescriptor {
                name: JsonBackend::NAME,
                aliases: &[],
                description: "JSON objects with flat or nested keys (.json)",
                extensions: JsonBackend::EXTENSIONS,
                detect: JsonBackend::detect,
                construct: |options| JsonBackend::new(options.json.clone()).into(),
            },
        ]
    })
}

/// Names of all registered backends.
pub fn available_backends() -> Vec<&'static str> {
    registry().iter().map(|d| d.name).collect()
}

pub fn is_backend_available(name: &str) -> bool {
    registry().iter().any(|d| d.matches_name(name))
}

/// Resolve a backend by name or alias (case-insensitive).
pub fn resolve(name: &str, options: &BackendOptions) -> CatalogResult<BackendImpl> {
    registry()
        .iter()
        .find(|d| d.matches_name(name))
        .map(|d| d.create(options))
        .ok_or_else(|| {
            CatalogError::not_found(format!(
                "Backend '{}' (available: {})",
                name,
                available_backends().join(", ")
            ))
        })
}

/// Resolve the backend whose extensions include that of `path`.
pub fn resolve_for_file(path: &Path, options: &BackendOptions) -> CatalogResult<BackendImpl> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    registry()
        .iter()
        .find(|d| d.claims_extension(extension))
        .map(|d| d.create(options))
        .ok_or_else(|| CatalogError::unsupported(format!("'{}'", path.display())))
}

/// Guess the backend of a catalog directory from the files it holds.
///
/// Each regular file votes for the first descriptor claiming its extension,
/// or, failing that, for the first descriptor whose detector accepts its
/// content. The backend with most votes wins; ties go to registry order.
/// Files are visited in name order, so the same directory contents always
/// resolve to the same backend. Without any vote, `default` is used.
pub fn resolve_from_path(
    dir: &Path,
    default: Option<&str>,
    options: &BackendOptions,
) -> CatalogResult<BackendImpl> {
    let descriptors = registry();
    let mut votes = vec![0usize; descriptors.len()];

    if dir.is_dir() {
        let mut paths: Vec<_> = fs::read_dir(dir)
            .map_err(|e| CatalogError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            if let Some(index) = vote_for(descriptors, &path) {
                votes[index] += 1;
            }
        }
    } else if default.is_none() {
        return Err(CatalogError::not_found(format!(
            "Catalog directory '{}'",
            dir.display()
        )));
    }

    // max_by_key keeps the last maximum, so search in reverse for the first
    let winner = votes
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, count)| **count > 0)
        .max_by_key(|(_, count)| **count)
        .map(|(index, _)| index);

    match (winner, default) {
        (Some(index), _) => {
            debug!(
                "resolved backend '{}' for {} ({:?} votes)",
                descriptors[index].name,
                dir.display(),
                votes
            );
            Ok(descriptors[index].create(options))
        }
        (None, Some(name)) => {
            debug!(
                "no catalog files in {}, using default backend '{}'",
                dir.display(),
                name
            );
            resolve(name, options)
        }
        (None, None) => Err(CatalogError::unsupported(format!(
            "no backend recognizes the files in '{}'",
            dir.display()
        ))),
    }
}

fn vote_for(descriptors: &[BackendDescriptor], path: &Path) -> Option<usize> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') {
        return None;
    }
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if let Some(index) = descriptors
        .iter()
        .position(|d| d.claims_extension(extension))
    {
        return Some(index);
    }

    // Only sniff small extension-less or unknown files.
    let metadata = fs::metadata(path).ok()?;
    if metadata.len() > 1024 * 1024 {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    descriptors.iter().position(|d| (d.detect)(&content))
}
