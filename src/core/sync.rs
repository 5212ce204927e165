//! Plain records exchanged with a remote synchronization service.
//!
//! Persistence and transport live outside this crate; these types only
//! carry data and the comparisons a sync client needs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{catalog::Catalog, data::ResourceEntry};

/// A term that must be translated consistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub source_term: String,
    pub source_language: String,
    /// Culture code -> translated term.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl GlossaryTerm {
    pub fn new(source_term: impl Into<String>, source_language: impl Into<String>) -> Self {
        Self {
            source_term: source_term.into(),
            source_language: source_language.into(),
            translations: BTreeMap::new(),
            case_sensitive: false,
        }
    }

    pub fn with_translation(mut self, culture: impl Into<String>, term: impl Into<String>) -> Self {
        self.translations.insert(culture.into(), term.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Whether `text` contains the source term.
    pub fn matches(&self, text: &str) -> bool {
        if self.source_term.is_empty() {
            return false;
        }
        if self.case_sensitive {
            text.contains(&self.source_term)
        } else {
            text.to_lowercase()
                .contains(&self.source_term.to_lowercase())
        }
    }

    /// Translation for `culture`, falling back to its neutral culture
    /// ("fr-CA" -> "fr").
    pub fn translation_for(&self, culture: &str) -> Option<&str> {
        self.translations
            .get(culture)
            .or_else(|| {
                let (neutral, _) = culture.split_once('-')?;
                self.translations.get(neutral)
            })
            .map(String::as_str)
    }
}

/// Immutable copy of one language file inside a [`CatalogSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    /// Culture code; empty for the invariant language.
    pub culture: String,
    pub entries: Vec<ResourceEntry>,
}

/// Point-in-time copy of every file of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub base_name: String,
    /// Sorted by culture code.
    files: Vec<SnapshotFile>,
}

/// File-level differences between two snapshots, by culture code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

impl CatalogSnapshot {
    pub fn capture(catalog: &Catalog) -> Self {
        let files = catalog
            .files()
            .iter()
            .map(|file| SnapshotFile {
                culture: file.language().culture().to_string(),
                entries: file.entries().to_vec(),
            })
            .collect();
        Self {
            base_name: catalog.base_name().to_string(),
            files,
        }
    }

    pub fn files(&self) -> &[SnapshotFile] {
        &self.files
    }

    pub fn file(&self, culture: &str) -> Option<&SnapshotFile> {
        self.files.iter().find(|f| f.culture == culture)
    }

    /// Files added, removed, or with different entries in `newer`.
    pub fn diff(&self, newer: &CatalogSnapshot) -> SnapshotDiff {
        let old: BTreeSet<&str> = self.files.iter().map(|f| f.culture.as_str()).collect();
        let new: BTreeSet<&str> = newer.files.iter().map(|f| f.culture.as_str()).collect();

        SnapshotDiff {
            added: new.difference(&old).map(|c| c.to_string()).collect(),
            removed: old.difference(&new).map(|c| c.to_string()).collect(),
            changed: old
                .intersection(&new)
                .filter(|c| self.file(c) != newer.file(c))
                .map(|c| c.to_string())
                .collect(),
        }
    }
}
