use serde::{Deserialize, Serialize};

/// One translatable unit of a resource file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Unique, case-sensitive, non-empty key.
    pub key: String,
    /// Translated text. May be empty (untranslated).
    pub value: String,
    /// Optional note for translators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ResourceEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// True when the value is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Copy of this entry with the value cleared, as seeded into a new language.
    pub fn untranslated(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: String::new(),
            comment: self.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(ResourceEntry::new("a", "").is_empty());
        assert!(ResourceEntry::new("a", "  \t\n").is_empty());
        assert!(!ResourceEntry::new("a", " x ").is_empty());
    }

    #[test]
    fn test_untranslated_keeps_key_and_comment() {
        let entry = ResourceEntry::new("Save", "Enregistrer").with_comment("Toolbar button");
        let copy = entry.untranslated();
        assert_eq!(copy.key, "Save");
        assert_eq!(copy.value, "");
        assert_eq!(copy.comment.as_deref(), Some("Toolbar button"));
    }
}
