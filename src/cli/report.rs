//! Report formatting and printing utilities.
//!
//! Scan findings are displayed in cargo-style format. Kept apart from the
//! commands so rescat can be used as a library.

use std::{
    cmp::Ordering,
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::{
    args::OutputFormat,
    commands::{
        BackendInfo, CatalogStats, CommandResult, CommandSummary, InitSummary, LanguageChange,
        LanguageStats, ScanSummary, StatsSummary,
    },
};
use crate::core::scanner::UsageReference;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of usages to display per issue.
const MAX_USAGES_DISPLAY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Error,
    Warning,
}

/// One finding of a scan, ready to print.
struct ReportItem<'a> {
    severity: Severity,
    message: String,
    rule: &'static str,
    path: &'a Path,
    /// Line and column; `None` for findings about a whole file.
    position: Option<(usize, usize)>,
    notes: Vec<(&'static str, String)>,
}

pub fn print(result: &CommandResult, verbose: bool) {
    print_load_failures_to(result, &mut io::stderr().lock());

    match &result.summary {
        CommandSummary::Scan(summary) => {
            match summary.format {
                OutputFormat::Text => report_scan(summary),
                OutputFormat::Json => print_json(summary),
            }
            print_scan_warnings_to(summary, verbose, &mut io::stderr().lock());
        }
        CommandSummary::Stats(summary) => print_stats_to(summary, &mut io::stdout().lock()),
        CommandSummary::AddLanguage(change) => print_added(change),
        CommandSummary::RemoveLanguage(change) => print_removed(change),
        CommandSummary::Backends(infos) => print_backends_to(infos, &mut io::stdout().lock()),
        CommandSummary::Init(summary) => print_init(summary, &result.root),
    }
}

/// Print scan findings in cargo-style format to stdout.
pub fn report_scan(summary: &ScanSummary) {
    report_scan_to(summary, &mut io::stdout().lock());
}

/// Print scan findings to a custom writer.
///
/// Findings are sorted by location. Without findings a success line is
/// printed instead of the summary.
pub fn report_scan_to<W: Write>(summary: &ScanSummary, writer: &mut W) {
    let mut items = scan_items(summary);
    items.sort_by(compare_items);

    for item in &items {
        print_item(item, writer);
    }

    if items.is_empty() {
        print_success_to(summary, writer);
    } else {
        print_summary(&items, writer);
    }
}

/// Print a success message when no issues are found.
pub fn print_success_to<W: Write>(summary: &ScanSummary, writer: &mut W) {
    let files = summary.source_files;
    let keys = summary.report.declared_count;
    let msg = format!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Scanned {} source {} against \"{}\" ({} {}) - no issues found",
            files,
            if files == 1 { "file" } else { "files" },
            summary.report.catalog,
            keys,
            if keys == 1 { "key" } else { "keys" }
        )
        .green()
    );
    let _ = writeln!(writer, "{}", msg);
}

/// Print warnings about files the scan could not fully read.
pub fn print_scan_warnings_to<W: Write>(summary: &ScanSummary, verbose: bool, writer: &mut W) {
    let report = &summary.report;

    if verbose {
        for warning in &report.warnings {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "warning:".bold().yellow(),
                warning.path.display(),
                warning.message
            );
        }
        for path in &report.partially_scanned {
            let _ = writeln!(
                writer,
                "{} {}: unterminated string or comment, scanned up to end of file",
                "warning:".bold().yellow(),
                path.display()
            );
        }
    } else {
        let count = report.warnings.len() + report.partially_scanned.len();
        if count > 0 {
            let _ = writeln!(
                writer,
                "{} {} file(s) could not be fully scanned (use {} for details)",
                "warning:".bold().yellow(),
                count,
                "-v".cyan()
            );
        }
    }

    if summary.skipped_count > 0 {
        let _ = writeln!(
            writer,
            "{} {} path(s) skipped due to access errors",
            "warning:".bold().yellow(),
            summary.skipped_count
        );
    }

    if report.cancelled {
        let _ = writeln!(
            writer,
            "{} scan cancelled, results are partial",
            "warning:".bold().yellow()
        );
    }
}

/// Print language files that failed to load.
pub fn print_load_failures_to<W: Write>(result: &CommandResult, writer: &mut W) {
    for failure in &result.load_failures {
        let path = failure
            .path
            .strip_prefix(&result.root)
            .unwrap_or(&failure.path);
        let _ = writeln!(
            writer,
            "{} skipped {}: {}",
            "warning:".bold().yellow(),
            path.display(),
            failure.error
        );
    }
}

pub fn print_stats_to<W: Write>(summary: &StatsSummary, writer: &mut W) {
    if summary.catalogs.is_empty() {
        let _ = writeln!(writer, "No catalogs found");
        return;
    }

    for (i, catalog) in summary.catalogs.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(writer);
        }
        print_catalog_stats(catalog, writer);
    }
}

pub fn print_backends_to<W: Write>(infos: &[BackendInfo], writer: &mut W) {
    let width = infos.iter().map(|i| i.name.len()).max().unwrap_or(0);

    for info in infos {
        let aliases = if info.aliases.is_empty() {
            String::new()
        } else {
            format!(" (alias: {})", info.aliases.join(", "))
        };
        let _ = writeln!(
            writer,
            "{}  {}{}",
            pad(info.name, width).bold(),
            info.description,
            aliases.dimmed()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_json(summary: &ScanSummary) {
    match serde_json::to_string_pretty(&summary.report) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Error: failed to serialize scan report: {}", err),
    }
}

fn scan_items(summary: &ScanSummary) -> Vec<ReportItem<'_>> {
    let report = &summary.report;
    let mut items = Vec::new();

    for key in &report.missing {
        let usages: Vec<&UsageReference> = report.references_to(key).collect();
        let Some((first, rest)) = usages.split_first() else {
            continue;
        };
        items.push(ReportItem {
            severity: Severity::Error,
            message: key.clone(),
            rule: "missing-key",
            path: &first.file_path,
            position: Some((first.line, first.column)),
            notes: usage_notes(rest),
        });
    }

    for key in &report.unused {
        let path = summary
            .declared_in
            .get(key)
            .map(|p| p.as_path())
            .unwrap_or_else(|| Path::new(report.catalog.as_str()));
        items.push(ReportItem {
            severity: Severity::Warning,
            message: key.clone(),
            rule: "unused-key",
            path,
            position: None,
            notes: Vec::new(),
        });
    }

    for reference in &report.needs_review {
        items.push(ReportItem {
            severity: Severity::Warning,
            message: reference
                .key
                .clone()
                .unwrap_or_else(|| "<dynamic>".to_string()),
            rule: if reference.is_dynamic {
                "dynamic-key"
            } else {
                "low-confidence"
            },
            path: &reference.file_path,
            position: Some((reference.line, reference.column)),
            notes: vec![(
                "note:",
                format!(
                    "{} with {} confidence, not checked against the catalog",
                    reference.pattern, reference.confidence
                ),
            )],
        });
    }

    items
}

fn usage_notes(usages: &[&UsageReference]) -> Vec<(&'static str, String)> {
    let total = usages.len();
    let display_count = total.min(MAX_USAGES_DISPLAY);
    let remaining = total - display_count;

    usages
        .iter()
        .take(display_count)
        .enumerate()
        .map(|(i, usage)| {
            let suffix = if i + 1 == display_count && remaining > 0 {
                format!(" (and {} more)", remaining)
            } else {
                String::new()
            };
            (
                "used:",
                format!(
                    "{}:{}:{}{}",
                    usage.file_path.display(),
                    usage.line,
                    usage.column,
                    suffix
                ),
            )
        })
        .collect()
}

fn print_item<W: Write>(item: &ReportItem, writer: &mut W) {
    let severity_str = match item.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        item.message,
        item.rule.dimmed().cyan()
    );

    // Print clickable location: --> path:line:col
    match item.position {
        Some((line, col)) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                item.path.display(),
                line,
                col
            );
        }
        None => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), item.path.display());
        }
    }

    for (label, text) in &item.notes {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), label.bold(), text);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(items: &[ReportItem], writer: &mut W) {
    let total_errors = items
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let total_warnings = items.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        items.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn compare_items(a: &ReportItem, b: &ReportItem) -> Ordering {
    a.path
        .cmp(b.path)
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| a.message.cmp(&b.message))
}

fn print_catalog_stats<W: Write>(catalog: &CatalogStats, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} ({})",
        catalog.name.bold(),
        catalog.directory.display()
    );

    let labels: Vec<String> = catalog.languages.iter().map(language_label).collect();
    let width = labels
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()))
        .chain(std::iter::once("Language".len()))
        .max()
        .unwrap_or(0);

    let header = format!(
        "  {}  {:>6}  {:>10}  {:>8}",
        pad("Language", width),
        "Keys",
        "Translated",
        "Complete"
    );
    let _ = writeln!(writer, "{}", header.dimmed());

    for (language, label) in catalog.languages.iter().zip(&labels) {
        let percentage = format!("{:>7.1}%", language.percentage);
        let percentage = if language.completed == language.total {
            percentage.green()
        } else {
            percentage.yellow()
        };
        let _ = writeln!(
            writer,
            "  {}  {:>6}  {:>10}  {}",
            pad(label, width),
            language.total,
            language.completed,
            percentage
        );
    }
}

fn language_label(language: &LanguageStats) -> String {
    let culture = if language.culture.is_empty() {
        "(invariant)"
    } else {
        language.culture.as_str()
    };
    match &language.display_name {
        Some(name) => format!("{} ({})", culture, name),
        None => culture.to_string(),
    }
}

/// Left-align `text` to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn print_added(change: &LanguageChange) {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Added language {} to {}: {} ({} {})",
            change.culture,
            change.catalog,
            change.path.display(),
            change.entry_count,
            if change.entry_count == 1 { "key" } else { "keys" }
        )
        .green()
    );
}

fn print_removed(change: &LanguageChange) {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Removed language {} from {}: {}",
            change.culture,
            change.catalog,
            change.path.display()
        )
        .green()
    );
}

fn print_init(summary: &InitSummary, root: &Path) {
    let path = summary.path.strip_prefix(root).unwrap_or(&summary.path);
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", path.display()).green()
    );
}

// ============================================================
// Tests
// ============================================================
