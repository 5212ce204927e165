//! Async catalog persistence.
//!
//! Backend I/O is synchronous; these wrappers move it onto tokio's blocking
//! pool. The token is checked before the work starts and again right before
//! the staged file is swapped in, so a cancelled operation never touches
//! the catalog on disk. Callers serialize operations on the same language
//! file.

use std::path::{Path, PathBuf};

use tokio::task;

use super::{
    backend::{Backend, BackendImpl},
    cancel::CancellationToken,
    data::{LanguageInfo, ResourceFile},
    error::{CatalogError, CatalogResult},
};

#[derive(Debug, Clone)]
pub struct ResourceWriter {
    backend: BackendImpl,
}

impl ResourceWriter {
    pub fn new(backend: BackendImpl) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &BackendImpl {
        &self.backend
    }

    pub fn write(&self, file: &ResourceFile) -> CatalogResult<()> {
        self.backend.write(file)
    }

    pub async fn load_async(
        &self,
        path: &Path,
        token: &CancellationToken,
    ) -> CatalogResult<ResourceFile> {
        token.check()?;
        let backend = self.backend.clone();
        let path = path.to_path_buf();
        run_blocking(move || backend.load(&path)).await
    }

    pub async fn write_async(
        &self,
        file: &ResourceFile,
        token: &CancellationToken,
    ) -> CatalogResult<()> {
        token.check()?;
        let backend = self.backend.clone();
        let file = file.clone();
        let token = token.clone();
        run_blocking(move || backend.write_cancellable(&file, Some(&token))).await
    }

    pub async fn create_language_file_async(
        &self,
        request: CreateLanguage,
        token: &CancellationToken,
    ) -> CatalogResult<ResourceFile> {
        token.check()?;
        let backend = self.backend.clone();
        let token = token.clone();
        run_blocking(move || {
            backend.create_language_file_cancellable(
                &request.base_name,
                &request.culture,
                &request.target_dir,
                request.source.as_ref(),
                request.copy_entries,
                Some(&token),
            )
        })
        .await
    }

    pub async fn delete_language_file_async(
        &self,
        language: &LanguageInfo,
        token: &CancellationToken,
    ) -> CatalogResult<()> {
        token.check()?;
        let backend = self.backend.clone();
        let language = language.clone();
        run_blocking(move || backend.delete_language_file(&language)).await
    }
}

/// Arguments of [`ResourceWriter::create_language_file_async`].
#[derive(Debug, Clone)]
pub struct CreateLanguage {
    pub base_name: String,
    pub culture: String,
    pub target_dir: PathBuf,
    /// Seed file; with `copy_entries` its keys and comments are copied.
    pub source: Option<ResourceFile>,
    pub copy_entries: bool,
}

async fn run_blocking<T, F>(work: F) -> CatalogResult<T>
where
    F: FnOnce() -> CatalogResult<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(work).await.map_err(|e| CatalogError::Io {
        path: PathBuf::new(),
        source: std::io::Error::other(format!("catalog worker failed: {}", e)),
    })?
}
