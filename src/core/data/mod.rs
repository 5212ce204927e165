//! Catalog data model.
//!
//! ## Module Structure
//!
//! - `language`: LanguageInfo (culture code, display name, file path)
//! - `entry`: ResourceEntry (key, value, comment)
//! - `resource_file`: ResourceFile (ordered entries of one language file)

pub mod entry;
pub mod language;
pub mod resource_file;

pub use entry::ResourceEntry;
pub use language::LanguageInfo;
pub use resource_file::{KeyAction, ResourceFile};
