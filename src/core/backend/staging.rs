use std::{
    fs,
    io::{ErrorKind, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::core::{
    cancel::CancellationToken,
    error::{CatalogError, CatalogResult},
};

/// Replace `path` with `content`.
///
/// The content is written to a temporary file next to the target and renamed
/// over it only after it is fully on disk. Readers see the old file or the
/// new one, never a truncated mix.
pub(super) fn replace(
    path: &Path,
    content: &str,
    token: Option<&CancellationToken>,
) -> CatalogResult<()> {
    let staged = stage(path, content)?;
    if let Some(token) = token {
        token.check()?;
    }
    staged
        .persist(path)
        .map_err(|e| CatalogError::io(path, e.error))?;
    Ok(())
}

/// Like [`replace`] but refuses to overwrite an existing file.
pub(super) fn create_new(
    path: &Path,
    content: &str,
    token: Option<&CancellationToken>,
) -> CatalogResult<()> {
    let staged = stage(path, content)?;
    if let Some(token) = token {
        token.check()?;
    }
    staged.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            CatalogError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            CatalogError::io(path, e.error)
        }
    })?;
    Ok(())
}

fn stage(path: &Path, content: &str) -> CatalogResult<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;

    let mut staged = tempfile::Builder::new()
        .prefix(".rescat-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CatalogError::io(dir, e))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| CatalogError::io(path, e))?;
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_replace_creates_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("en.json");

        replace(&path, "one", None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");

        replace(&path, "two", None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_create_new_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fr.json");
        fs::write(&path, "old").unwrap();

        let err = create_new(&path, "new", None).unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
