use std::{
    fmt,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// One language variant of a catalog.
///
/// Equality and hashing only consider the culture code: two `LanguageInfo`
/// values pointing at different files for "fr" are the same language.
/// An empty culture code denotes the invariant (neutral) language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    culture: String,
    display_name: Option<String>,
    path: PathBuf,
}

impl LanguageInfo {
    pub fn new(culture: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            culture: culture.into(),
            display_name: None,
            path: path.into(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Culture code, e.g. "fr" or "en-US". Empty for the invariant language.
    pub fn culture(&self) -> &str {
        &self.culture
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Storage path of the language file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_invariant(&self) -> bool {
        self.culture.is_empty()
    }
}

impl PartialEq for LanguageInfo {
    fn eq(&self, other: &Self) -> bool {
        self.culture == other.culture
    }
}

impl Eq for LanguageInfo {}

impl Hash for LanguageInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.culture.hash(state);
    }
}

impl fmt::Display for LanguageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.display_name, self.is_invariant()) {
            (Some(name), _) => write!(f, "{} ({})", name, self.culture),
            (None, true) => write!(f, "(invariant)"),
            (None, false) => write!(f, "{}", self.culture),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_equality_is_by_culture() {
        let a = LanguageInfo::new("fr", "a/Resources.fr.resx");
        let b = LanguageInfo::new("fr", "b/fr.json").with_display_name("French");
        let c = LanguageInfo::new("de", "a/Resources.fr.resx");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(LanguageInfo::new("fr", "x").to_string(), "fr");
        assert_eq!(LanguageInfo::new("", "x").to_string(), "(invariant)");
        assert_eq!(
            LanguageInfo::new("de", "x")
                .with_display_name("German")
                .to_string(),
            "German (de)"
        );
    }
}
