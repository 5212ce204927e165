//! Shared helpers for the catalog and scanner modules.
//!
//! ## Module Structure
//!
//! - `line_index`: byte offset to line/column lookups

pub mod line_index;

pub use line_index::LineIndex;
