use std::collections::HashMap;

use super::{entry::ResourceEntry, language::LanguageInfo};
use crate::core::error::{CatalogError, CatalogResult};

/// Action taken on a key by [`ResourceFile::set_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
}

impl KeyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::Added => "added",
            KeyAction::Updated => "updated",
        }
    }
}

/// All entries of one catalog file in one language.
///
/// Entries keep their insertion order so that a load/write cycle reproduces
/// the file. Keys are unique within a file.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    language: LanguageInfo,
    entries: Vec<ResourceEntry>,
    /// Key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl ResourceFile {
    /// Create an empty file for a language.
    pub fn new(language: LanguageInfo) -> Self {
        Self {
            language,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a file from loaded entries.
    ///
    /// Duplicate or empty keys fail with [`CatalogError::Parse`]; nothing is
    /// merged or dropped.
    pub fn from_entries(
        language: LanguageInfo,
        entries: impl IntoIterator<Item = ResourceEntry>,
    ) -> CatalogResult<Self> {
        let mut file = Self::new(language);
        for entry in entries {
            if entry.key.is_empty() {
                return Err(CatalogError::parse(
                    file.language.path(),
                    "entry with an empty key",
                ));
            }
            if file.index.contains_key(&entry.key) {
                return Err(CatalogError::parse(
                    file.language.path(),
                    format!("duplicate key '{}'", entry.key),
                ));
            }
            file.push(entry);
        }
        Ok(file)
    }

    /// Create a file for `language` seeded from `source`.
    ///
    /// With `copy_entries`, every key and comment of `source` is copied with
    /// an empty value. Otherwise only the language shell is created.
    pub fn seeded_from(language: LanguageInfo, source: &ResourceFile, copy_entries: bool) -> Self {
        let mut file = Self::new(language);
        if copy_entries {
            for entry in &source.entries {
                file.push(entry.untranslated());
            }
        }
        file
    }

    fn push(&mut self, entry: ResourceEntry) {
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key.clone(), i))
            .collect();
    }

    pub fn language(&self) -> &LanguageInfo {
        &self.language
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ResourceEntry> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a non-blank value.
    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_empty()).count()
    }

    /// `completed / total * 100`, or 0 for an empty file.
    pub fn completion_percentage(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.entries.len() as f64 * 100.0
    }

    /// Append a new entry. Fails if the key is empty or already present.
    pub fn add_entry(&mut self, entry: ResourceEntry) -> CatalogResult<()> {
        if entry.key.is_empty() {
            return Err(CatalogError::InvalidKey {
                key: entry.key,
                reason: "keys must not be empty".to_string(),
            });
        }
        if self.contains_key(&entry.key) {
            return Err(CatalogError::DuplicateKey {
                key: entry.key,
                culture: self.language.culture().to_string(),
            });
        }
        self.push(entry);
        Ok(())
    }

    /// Set the value of `key`, appending a new entry when absent.
    pub fn set_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> CatalogResult<KeyAction> {
        let key = key.into();
        if let Some(entry) = self.get_mut(&key) {
            entry.value = value.into();
            return Ok(KeyAction::Updated);
        }
        self.add_entry(ResourceEntry::new(key, value))?;
        Ok(KeyAction::Added)
    }

    /// Remove `key`, preserving the order of the remaining entries.
    pub fn remove_entry(&mut self, key: &str) -> CatalogResult<ResourceEntry> {
        let Some(position) = self.index.get(key).copied() else {
            return Err(CatalogError::not_found(format!(
                "Key '{}' in '{}'",
                key,
                self.language.path().display()
            )));
        };
        let removed = self.entries.remove(position);
        self.reindex();
        Ok(removed)
    }
}
