use std::{fmt, path::PathBuf};

use serde::Serialize;

/// Syntactic shape of a key reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccessPattern {
    /// `Resources.Hello`
    StaticMember,
    /// `_localizer["Hello"]`
    Indexer,
    /// `GetString("Hello")`
    WrapperCall,
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessPattern::StaticMember => "static member",
            AccessPattern::Indexer => "indexer",
            AccessPattern::WrapperCall => "wrapper call",
        };
        f.write_str(name)
    }
}

/// How certain the scanner is that a reference names a catalog key.
///
/// Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Confidence {
    /// Key is computed at runtime.
    Low,
    /// Literal key through an accessor whose binding is ambiguous.
    Medium,
    /// Literal key through a configured accessor.
    High,
}

impl Confidence {
    /// Whether references of this confidence take part in reconciliation.
    pub fn is_reconciled(self) -> bool {
        self >= Confidence::Medium
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(name)
    }
}

/// One site in source code that looks up a resource key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReference {
    pub file_path: PathBuf,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub column: usize,
    /// Literal key, or for dynamic keys the literal fragments with `*` in
    /// place of computed parts (`Status_*`). `None` when nothing is literal.
    pub key: Option<String>,
    pub pattern: AccessPattern,
    pub confidence: Confidence,
    pub is_dynamic: bool,
}

impl UsageReference {
    /// Key used for reconciliation; `None` for dynamic or low-confidence sites.
    pub fn reconciled_key(&self) -> Option<&str> {
        if self.is_dynamic || !self.confidence.is_reconciled() {
            return None;
        }
        self.key.as_deref()
    }
}

/// References found in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileScan {
    pub path: PathBuf,
    /// Sorted by line, then column.
    pub references: Vec<UsageReference>,
    /// An unterminated string or comment ran to end of file.
    pub partial: bool,
}

/// A source file that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(confidence: Confidence, is_dynamic: bool) -> UsageReference {
        UsageReference {
            file_path: PathBuf::from("a.cs"),
            line: 1,
            column: 1,
            key: Some("Hello".to_string()),
            pattern: AccessPattern::Indexer,
            confidence,
            is_dynamic,
        }
    }

    #[test]
    fn test_confidence_order() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert!(!Confidence::Low.is_reconciled());
        assert!(Confidence::Medium.is_reconciled());
    }

    #[test]
    fn test_reconciled_key() {
        assert_eq!(reference(Confidence::High, false).reconciled_key(), Some("Hello"));
        assert_eq!(reference(Confidence::Medium, false).reconciled_key(), Some("Hello"));
        assert_eq!(reference(Confidence::Low, true).reconciled_key(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(reference(Confidence::Low, true)).unwrap();
        assert_eq!(json["isDynamic"], true);
        assert_eq!(json["confidence"], "Low");
        assert_eq!(json["pattern"], "Indexer");
        assert_eq!(json["filePath"], "a.cs");
    }
}
