//! rescat - localization resource catalogs and key usage scanner
//!
//! rescat is a CLI tool and library for managing localization resource
//! catalogs (XML `.resx` and JSON) and for checking that the keys used in
//! source code match the keys the catalogs declare.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and report output)
//! - `config`: Configuration file loading and parsing
//! - `core`: Catalog model, storage backends and the usage scanner

pub mod cli;
pub mod config;
pub mod core;
