//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: Find resource key usages and reconcile them with a catalog
//! - `stats`: Show per-language completion of catalogs
//! - `add-language`: Create a language file, optionally seeded from another
//! - `remove-language`: Delete a language file
//! - `backends`: List the available catalog formats
//! - `init`: Initialize rescat configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(args)) => args.common.verbose,
            Some(Command::Stats(args)) => args.common.verbose,
            Some(Command::AddLanguage(args)) => args.common.verbose,
            Some(Command::RemoveLanguage(args)) => args.common.verbose,
            Some(Command::Backends) | Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all catalog commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root directory (default: current directory)
    #[arg(long, env = "RESCAT_ROOT")]
    pub root: Option<PathBuf>,

    /// Catalog directory (overrides config file)
    #[arg(long)]
    pub catalog_root: Option<PathBuf>,

    /// Catalog format, e.g. "xml" or "json" (default: detected from files)
    #[arg(long)]
    pub backend: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Catalog base name; required when the catalog directory holds several
    #[arg(long)]
    pub base: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Scanner worker threads, 0 for one per CPU (overrides config file)
    #[arg(long)]
    pub parallelism: Option<usize>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only show this catalog
    #[arg(long)]
    pub base: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddLanguageArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Culture code of the new language, e.g. "fr" or "pt-BR"
    pub culture: String,

    /// Catalog base name; a new catalog is started if none has this name
    #[arg(long)]
    pub base: Option<String>,

    /// Culture to seed from (default: the invariant file)
    #[arg(long)]
    pub from: Option<String>,

    /// Copy keys and comments from the seed file, with empty values
    #[arg(long)]
    pub copy: bool,
}

#[derive(Debug, Args)]
pub struct RemoveLanguageArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Culture code of the language to delete
    pub culture: String,

    /// Catalog base name; required when the catalog directory holds several
    #[arg(long)]
    pub base: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan source code for resource key usages (missing keys, unused keys, dynamic keys)
    Scan(ScanArgs),
    /// Show translation completion per language
    Stats(StatsArgs),
    /// Create a language file in a catalog
    AddLanguage(AddLanguageArgs),
    /// Delete a language file from a catalog
    RemoveLanguage(RemoveLanguageArgs),
    /// List the available catalog backends
    Backends,
    /// Initialize a new .rescatrc.json configuration file
    Init,
}
