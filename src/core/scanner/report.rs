use std::{collections::BTreeSet, path::PathBuf};

use serde::Serialize;

use super::{
    SourceScan,
    reference::{FileScan, ScanWarning, UsageReference},
};
use crate::core::catalog::Catalog;

/// Keys referenced in code but declared nowhere, and declared keys never
/// referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub missing: BTreeSet<String>,
    pub unused: BTreeSet<String>,
}

/// Compare references against the declared keys.
///
/// Only High and Medium confidence literal keys count as referenced. Low
/// confidence references never make a key missing nor keep it used.
pub fn reconcile<'a>(
    declared: &BTreeSet<String>,
    references: impl IntoIterator<Item = &'a UsageReference>,
) -> Reconciliation {
    let referenced: BTreeSet<String> = references
        .into_iter()
        .filter_map(|r| r.reconciled_key())
        .map(str::to_string)
        .collect();

    Reconciliation {
        missing: referenced.difference(declared).cloned().collect(),
        unused: declared.difference(&referenced).cloned().collect(),
    }
}

/// Result of scanning sources against one catalog.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Catalog display name.
    pub catalog: String,
    pub declared_count: usize,
    /// Sorted by path; references sorted by line and column.
    pub files: Vec<FileScan>,
    pub missing: Vec<String>,
    pub unused: Vec<String>,
    /// Low confidence references, for manual review.
    pub needs_review: Vec<UsageReference>,
    pub warnings: Vec<ScanWarning>,
    pub partially_scanned: Vec<PathBuf>,
    pub cancelled: bool,
}

impl ScanReport {
    pub fn new(catalog: &Catalog, scan: SourceScan) -> Self {
        let declared = catalog.declared_keys();
        let Reconciliation { missing, unused } =
            reconcile(&declared, scan.files.iter().flat_map(|f| &f.references));

        let needs_review = scan
            .files
            .iter()
            .flat_map(|f| &f.references)
            .filter(|r| r.reconciled_key().is_none())
            .cloned()
            .collect();
        let partially_scanned = scan
            .files
            .iter()
            .filter(|f| f.partial)
            .map(|f| f.path.clone())
            .collect();

        Self {
            catalog: catalog.display_name(),
            declared_count: declared.len(),
            files: scan.files,
            missing: missing.into_iter().collect(),
            unused: unused.into_iter().collect(),
            needs_review,
            warnings: scan.warnings,
            partially_scanned,
            cancelled: scan.cancelled,
        }
    }

    pub fn references(&self) -> impl Iterator<Item = &UsageReference> {
        self.files.iter().flat_map(|f| &f.references)
    }

    /// Sites referencing `key` with High or Medium confidence.
    pub fn references_to<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a UsageReference> {
        self.references()
            .filter(move |r| r.reconciled_key() == Some(key))
    }

    pub fn has_missing_keys(&self) -> bool {
        !self.missing.is_empty()
    }
}
