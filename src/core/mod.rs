//! Catalog model, storage backends and the usage scanner.
//!
//! ## Module Structure
//!
//! - `data`: LanguageInfo, ResourceEntry, ResourceFile
//! - `catalog`: file naming and catalog discovery
//! - `backend`: format drivers (XML, JSON) and the backend registry
//! - `writer`: async persistence on the blocking pool
//! - `scanner`: lexical key-usage scanner and reconciliation
//! - `translation`: requests for external translation providers
//! - `sync`: glossary and snapshot records for remote synchronization
//! - `error`, `cancel`: error taxonomy and cooperative cancellation
//! - `utils`: shared helpers

pub mod backend;
pub mod cancel;
pub mod catalog;
pub mod data;
pub mod error;
pub mod scanner;
pub mod sync;
pub mod translation;
pub mod utils;
pub mod writer;

pub use backend::{Backend, BackendImpl, BackendOptions};
pub use cancel::CancellationToken;
pub use catalog::{Catalog, CatalogLoad};
pub use data::{KeyAction, LanguageInfo, ResourceEntry, ResourceFile};
pub use error::{CatalogError, CatalogResult};
pub use scanner::{ScanReport, Scanner};
pub use writer::ResourceWriter;
