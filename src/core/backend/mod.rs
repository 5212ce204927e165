//! Format-specific catalog drivers.
//!
//! Every backend only knows how to `parse` and `render` its format. Loading,
//! atomic writing, and creating or deleting language files are shared by all
//! backends through the provided methods of [`Backend`].
//!
//! ## Module Structure
//!
//! - `json`: flat or nested JSON catalogs (`en.json`, `Strings.fr.json`)
//! - `xml`: name/value/comment triples (`Resources.fr.resx`)
//! - `factory`: process-wide registry, resolution by name or directory contents
//! - `staging`: stage-then-rename file replacement

pub mod factory;
pub mod json;
mod staging;
pub mod xml;

use std::{fs, path::Path};

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

pub use json::{JsonBackend, JsonOptions};
pub use xml::{XmlBackend, XmlOptions};

use crate::core::{
    cancel::CancellationToken,
    catalog::{language_file_name, parse_file_name},
    data::{LanguageInfo, ResourceFile},
    error::{CatalogError, CatalogResult},
};

/// Format-specific settings handed to backend constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendOptions {
    #[serde(default)]
    pub json: JsonOptions,
    #[serde(default)]
    pub xml: XmlOptions,
}

#[enum_dispatch]
pub trait Backend {
    /// Registry name, e.g. "json".
    fn name(&self) -> &'static str;

    /// Handled file extensions without the dot. The first one is used for new files.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse file content. Never returns a partially populated file.
    fn parse(&self, content: &str, language: LanguageInfo) -> CatalogResult<ResourceFile>;

    /// Full on-disk representation of `file`.
    fn render(&self, file: &ResourceFile) -> CatalogResult<String>;

    fn handles_extension(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Load a language file. The culture is taken from the file name.
    fn load(&self, path: &Path) -> CatalogResult<ResourceFile> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::from_io(path, e))?;
        let culture = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| parse_file_name(n, self.extensions()))
            .map(|parsed| parsed.culture)
            .unwrap_or_default();
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        self.parse(content, LanguageInfo::new(culture, path))
    }

    /// Replace the file on disk with exactly the in-memory entries.
    fn write(&self, file: &ResourceFile) -> CatalogResult<()> {
        self.write_cancellable(file, None)
    }

    /// Like [`Backend::write`], giving up before the swap once `token` is cancelled.
    fn write_cancellable(
        &self,
        file: &ResourceFile,
        token: Option<&CancellationToken>,
    ) -> CatalogResult<()> {
        if let Some(token) = token {
            token.check()?;
        }
        let content = self.render(file)?;
        staging::replace(file.language().path(), &content, token)
    }

    /// Create the file of `culture` in `target_dir`.
    ///
    /// An empty `base_name` names the file after the culture only (`fr.json`).
    fn create_language_file(
        &self,
        base_name: &str,
        culture: &str,
        target_dir: &Path,
        source: Option<&ResourceFile>,
        copy_entries: bool,
    ) -> CatalogResult<ResourceFile> {
        self.create_language_file_cancellable(
            base_name,
            culture,
            target_dir,
            source,
            copy_entries,
            None,
        )
    }

    fn create_language_file_cancellable(
        &self,
        base_name: &str,
        culture: &str,
        target_dir: &Path,
        source: Option<&ResourceFile>,
        copy_entries: bool,
        token: Option<&CancellationToken>,
    ) -> CatalogResult<ResourceFile> {
        if let Some(token) = token {
            token.check()?;
        }
        let path = target_dir.join(language_file_name(base_name, culture, self.extensions()[0]));
        if path.exists() {
            return Err(CatalogError::AlreadyExists { path });
        }

        let language = LanguageInfo::new(culture, &path);
        let file = match source {
            Some(source) => ResourceFile::seeded_from(language, source, copy_entries),
            None => ResourceFile::new(language),
        };
        let content = self.render(&file)?;
        staging::create_new(&path, &content, token)?;
        Ok(file)
    }

    /// Remove the file of `language`. Fails with `NotFound` when it is absent.
    fn delete_language_file(&self, language: &LanguageInfo) -> CatalogResult<()> {
        fs::remove_file(language.path()).map_err(|e| CatalogError::from_io(language.path(), e))
    }
}

/// All built-in backends.
#[enum_dispatch(Backend)]
#[derive(Debug, Clone)]
pub enum BackendImpl {
    XmlBackend,
    JsonBackend,
}

/// First non-whitespace character of `content`, ignoring a BOM.
pub(crate) fn first_significant_char(content: &str) -> Option<char> {
    content
        .trim_start_matches('\u{feff}')
        .chars()
        .find(|c| !c.is_whitespace())
}
