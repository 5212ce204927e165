//! Catalogs: every language file sharing one base name.
//!
//! Two naming layouts are recognized:
//!
//! - suffixed: `Resources.resx` (invariant), `Resources.fr.resx`, `Strings.en-US.json`
//! - culture only: `en.json`, `zh-Hans.json` (base name is empty)

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use log::debug;
use regex::Regex;

use super::{
    backend::{Backend, BackendImpl},
    data::{LanguageInfo, ResourceFile},
    error::{CatalogError, CatalogResult},
};

static CULTURE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(?:-[A-Z][a-z]{3})?(?:-(?:[A-Z]{2}|[0-9]{3}))?$")
        .expect("culture code pattern is valid")
});

/// ISO 639-1 language codes, plus the ISO 639-2/3 codes used by cultures that
/// have no two-letter code.
const LANGUAGE_CODES: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg", "bh",
    "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv", "cy", "da",
    "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr",
    "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht", "hu", "hy", "hz",
    "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja", "jv", "ka", "kg", "ki", "kj",
    "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln",
    "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my", "na", "nb",
    "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny", "oc", "oj", "om", "or", "os", "pa", "pi",
    "pl", "ps", "pt", "qu", "rm", "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk",
    "sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti",
    "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo",
    "wa", "wo", "xh", "yi", "yo", "za", "zh", "zu",
    "arn", "ast", "ceb", "chr", "ckb", "dsb", "fil", "fur", "gsw", "haw", "hsb", "kab", "kok",
    "ksh", "mni", "moh", "nds", "nso", "prs", "quz", "sah", "sat", "sma", "smj", "smn", "sms",
    "syr", "tzm", "vai", "yue", "zgh",
];

/// Whether `code` is a culture code ("fr", "en-US", "zh-Hans-CN").
///
/// The language part must be a known ISO 639 code, so stems such as `app`
/// or `ui` are not mistaken for cultures.
pub fn is_culture_code(code: &str) -> bool {
    let language = code.split('-').next().unwrap_or_default();
    CULTURE_CODE.is_match(code) && LANGUAGE_CODES.contains(&language)
}

/// Base name and culture parsed from a catalog file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub base_name: String,
    pub culture: String,
}

/// Split `file_name` into base name and culture.
///
/// Returns `None` when the extension is not one of `extensions`.
pub fn parse_file_name(file_name: &str, extensions: &[&str]) -> Option<ParsedFileName> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || !extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)) {
        return None;
    }

    if let Some((base, culture)) = stem.rsplit_once('.')
        && !base.is_empty()
        && is_culture_code(culture)
    {
        return Some(ParsedFileName {
            base_name: base.to_string(),
            culture: culture.to_string(),
        });
    }

    if is_culture_code(stem) {
        return Some(ParsedFileName {
            base_name: String::new(),
            culture: stem.to_string(),
        });
    }

    Some(ParsedFileName {
        base_name: stem.to_string(),
        culture: String::new(),
    })
}

/// File name of `culture` in a catalog called `base_name`.
pub fn language_file_name(base_name: &str, culture: &str, extension: &str) -> String {
    match (base_name.is_empty(), culture.is_empty()) {
        (true, _) => format!("{}.{}", culture, extension),
        (false, true) => format!("{}.{}", base_name, extension),
        (false, false) => format!("{}.{}.{}", base_name, culture, extension),
    }
}

/// All language files of one base name in one directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    base_name: String,
    directory: PathBuf,
    /// Sorted by culture code, invariant first.
    files: Vec<ResourceFile>,
}

impl Catalog {
    pub fn new(base_name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            base_name: base_name.into(),
            directory: directory.into(),
            files: Vec::new(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Base name, or the directory name for culture-only layouts.
    pub fn display_name(&self) -> String {
        if !self.base_name.is_empty() {
            return self.base_name.clone();
        }
        self.directory
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.directory.display().to_string())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &[ResourceFile] {
        &self.files
    }

    pub fn file(&self, culture: &str) -> Option<&ResourceFile> {
        self.files.iter().find(|f| f.language().culture() == culture)
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageInfo> {
        self.files.iter().map(|f| f.language())
    }

    /// Add or replace the file of its culture.
    pub fn insert(&mut self, file: ResourceFile) {
        match self
            .files
            .binary_search_by(|f| f.language().culture().cmp(file.language().culture()))
        {
            Ok(index) => self.files[index] = file,
            Err(index) => self.files.insert(index, file),
        }
    }

    pub fn remove(&mut self, culture: &str) -> Option<ResourceFile> {
        let index = self
            .files
            .iter()
            .position(|f| f.language().culture() == culture)?;
        Some(self.files.remove(index))
    }

    /// Union of the keys of every language file.
    ///
    /// A key present in any one language counts as declared.
    pub fn declared_keys(&self) -> BTreeSet<String> {
        self.files
            .iter()
            .flat_map(|f| f.keys())
            .map(str::to_string)
            .collect()
    }

    /// Load every catalog found in `dir`.
    ///
    /// Files that fail to load do not produce partial catalogs; they are
    /// returned in [`CatalogLoad::failures`] so the caller decides whether to
    /// skip the language or abort.
    pub fn discover(dir: &Path, backend: &BackendImpl) -> CatalogResult<CatalogLoad> {
        if !dir.is_dir() {
            return Err(CatalogError::not_found(format!(
                "Catalog directory '{}'",
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| CatalogError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut catalogs: BTreeMap<String, Catalog> = BTreeMap::new();
        let mut failures = Vec::new();

        for path in paths {
            let Some(parsed) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| parse_file_name(n, backend.extensions()))
            else {
                continue;
            };

            match backend.load(&path) {
                Ok(file) => {
                    debug!(
                        "loaded {} ({} entries)",
                        path.display(),
                        file.len()
                    );
                    catalogs
                        .entry(parsed.base_name.clone())
                        .or_insert_with(|| Catalog::new(parsed.base_name, dir))
                        .insert(file);
                }
                Err(error) => failures.push(LoadFailure { path, error }),
            }
        }

        Ok(CatalogLoad {
            catalogs: catalogs.into_values().collect(),
            failures,
        })
    }

    /// Path the file of `culture` has (or would have) in this catalog.
    pub fn language_path(&self, culture: &str, backend: &BackendImpl) -> PathBuf {
        self.directory.join(language_file_name(
            &self.base_name,
            culture,
            backend.extensions()[0],
        ))
    }
}

/// A language file that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: CatalogError,
}

/// Result of [`Catalog::discover`].
#[derive(Debug, Default)]
pub struct CatalogLoad {
    /// Catalogs sorted by base name.
    pub catalogs: Vec<Catalog>,
    pub failures: Vec<LoadFailure>,
}

impl CatalogLoad {
    pub fn catalog(&self, base_name: &str) -> Option<&Catalog> {
        self.catalogs.iter().find(|c| c.base_name() == base_name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::backend::{JsonBackend, JsonOptions, XmlBackend, XmlOptions};

    fn parsed(base: &str, culture: &str) -> Option<ParsedFileName> {
        Some(ParsedFileName {
            base_name: base.to_string(),
            culture: culture.to_string(),
        })
    }

    #[test]
    fn test_culture_codes() {
        for code in ["fr", "en-US", "zh-Hans", "zh-Hans-CN", "es-419", "fil"] {
            assert!(is_culture_code(code), "{}", code);
        }
        for code in ["Resources", "en_US", "EN", "english", ""] {
            assert!(!is_culture_code(code), "{}", code);
        }
        for code in ["app", "api", "ui", "web", "xx-US"] {
            assert!(!is_culture_code(code), "{}", code);
        }
    }

    #[test]
    fn test_short_stems_are_invariant_files() {
        let ext = &["json"];
        assert_eq!(parse_file_name("app.json", ext), parsed("app", ""));
        assert_eq!(parse_file_name("ui.de.json", ext), parsed("ui", "de"));
        assert_eq!(parse_file_name("api.json", ext), parsed("api", ""));
        assert_eq!(parse_file_name("de.json", ext), parsed("", "de"));
    }

    #[test]
    fn test_parse_file_name() {
        let ext = &["resx", "xml"];
        assert_eq!(parse_file_name("Resources.resx", ext), parsed("Resources", ""));
        assert_eq!(parse_file_name("Resources.fr.resx", ext), parsed("Resources", "fr"));
        assert_eq!(
            parse_file_name("Shared.Errors.en-US.xml", ext),
            parsed("Shared.Errors", "en-US")
        );
        assert_eq!(parse_file_name("My.Strings.resx", ext), parsed("My.Strings", ""));
        assert_eq!(parse_file_name("fr.resx", ext), parsed("", "fr"));
        assert_eq!(parse_file_name("Resources.json", ext), None);
        assert_eq!(parse_file_name(".resx", ext), None);
    }

    #[test]
    fn test_language_file_name() {
        assert_eq!(language_file_name("Resources", "fr", "resx"), "Resources.fr.resx");
        assert_eq!(language_file_name("Resources", "", "resx"), "Resources.resx");
        assert_eq!(language_file_name("", "de", "json"), "de.json");
    }

    #[test]
    fn test_discover_groups_by_base_name() {
        let dir = tempdir().unwrap();
        let backend: BackendImpl = XmlBackend::new(XmlOptions::default()).into();
        let data = |k: &str| format!("<root><data name=\"{}\"><value>x</value></data></root>", k);
        fs::write(dir.path().join("Resources.resx"), data("Hello")).unwrap();
        fs::write(dir.path().join("Resources.fr.resx"), data("Bye")).unwrap();
        fs::write(dir.path().join("Errors.de.resx"), data("E1")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let load = Catalog::discover(dir.path(), &backend).unwrap();

        assert!(load.failures.is_empty());
        assert_eq!(
            load.catalogs.iter().map(|c| c.base_name()).collect::<Vec<_>>(),
            vec!["Errors", "Resources"]
        );
        let resources = load.catalog("Resources").unwrap();
        assert_eq!(
            resources.languages().map(|l| l.culture()).collect::<Vec<_>>(),
            vec!["", "fr"]
        );
        assert_eq!(
            resources.declared_keys().into_iter().collect::<Vec<_>>(),
            vec!["Bye", "Hello"]
        );
    }

    #[test]
    fn test_discover_reports_failures_without_partial_files() {
        let dir = tempdir().unwrap();
        let backend: BackendImpl = JsonBackend::new(JsonOptions::default()).into();
        fs::write(dir.path().join("en.json"), r#"{"a": "A"}"#).unwrap();
        fs::write(dir.path().join("fr.json"), r#"{"a": "A", "a": "B"}"#).unwrap();

        let load = Catalog::discover(dir.path(), &backend).unwrap();

        let catalog = load.catalog("").unwrap();
        assert!(catalog.file("en").is_some());
        assert!(catalog.file("fr").is_none());
        assert_eq!(load.failures.len(), 1);
        assert!(load.failures[0].path.ends_with("fr.json"));
        assert!(matches!(load.failures[0].error, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempdir().unwrap();
        let backend: BackendImpl = JsonBackend::new(JsonOptions::default()).into();
        let err = Catalog::discover(&dir.path().join("nope"), &backend).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_name_and_language_path() {
        let backend: BackendImpl = JsonBackend::new(JsonOptions::default()).into();
        let catalog = Catalog::new("", "/app/messages");
        assert_eq!(catalog.display_name(), "messages");
        assert_eq!(
            catalog.language_path("fr", &backend),
            PathBuf::from("/app/messages/fr.json")
        );

        let catalog = Catalog::new("Strings", "/app/i18n");
        assert_eq!(catalog.display_name(), "Strings");
        assert_eq!(
            catalog.language_path("fr", &backend),
            PathBuf::from("/app/i18n/Strings.fr.json")
        );
    }
}
