use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by catalog loading, writing and backend resolution.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed catalog content.
    ///
    /// `line` and `position` are 1-based and only present when the fault can
    /// be located in the source text.
    #[error(
        "Failed to parse {}{}: {message}",
        .file_path.display(),
        location_suffix(.line, .position)
    )]
    Parse {
        message: String,
        file_path: PathBuf,
        line: Option<usize>,
        position: Option<usize>,
    },

    /// A backend, language file or key is absent.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Target of a create operation already exists.
    #[error("'{}' already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    /// Key already present in an in-memory resource file.
    #[error("Key '{key}' already exists in '{culture}'")]
    DuplicateKey { key: String, culture: String },

    /// Key rejected by resource file validation.
    #[error("Invalid resource key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// No backend can handle the given name or path.
    #[error("Unsupported format: {what}")]
    UnsupportedFormat { what: String },

    /// Cooperative cancellation was honored.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn location_suffix(line: &Option<usize>, position: &Option<usize>) -> String {
    match (line, position) {
        (Some(line), Some(position)) => format!(":{}:{}", line, position),
        (Some(line), None) => format!(":{}", line),
        _ => String::new(),
    }
}

impl CatalogError {
    pub fn parse(file_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            file_path: file_path.into(),
            line: None,
            position: None,
        }
    }

    /// Parse error located at a 1-based line and column.
    pub fn parse_at(
        file_path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        position: usize,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            file_path: file_path.into(),
            line: Some(line),
            position: Some(position),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedFormat { what: what.into() }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Map an IO error, turning `ErrorKind::NotFound` into [`CatalogError::NotFound`].
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(format!("Language file '{}'", path.display()))
        } else {
            Self::io(path, source)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_with_location() {
        let err = CatalogError::parse_at("Resources.fr.resx", "unexpected end of document", 7, 3);
        let msg = err.to_string();
        assert!(msg.contains("Resources.fr.resx:7:3"));
        assert!(msg.contains("unexpected end of document"));
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = CatalogError::parse("en.json", "duplicate key 'ok'");
        assert_eq!(
            err.to_string(),
            "Failed to parse en.json: duplicate key 'ok'"
        );
    }

    #[test]
    fn test_io_not_found_is_mapped() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CatalogError::from_io(Path::new("fr.json"), io);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("fr.json"));
    }

    #[test]
    fn test_io_other_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CatalogError::from_io(Path::new("fr.json"), io);
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("denied"));
    }
}
