use std::future::Future;

use anyhow::{Context, Result};

/// Run `future` to completion on a single-threaded runtime.
///
/// Catalog I/O happens on the runtime's blocking pool, so one thread is
/// enough to drive it.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
