//! Catalog snapshot: the JSON document a validation run leaves behind.
//!
//! Field names are camelCase because presentation code reads this file
//! directly.

use std::path::Path;

use pricecat_core::{Catalog, CatalogRecord, CandidateId, RunSummary};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// An id whose validation errored, kept for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedId {
    pub id: CandidateId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    /// RFC 3339 time the validation run finished.
    pub timestamp: String,
    #[serde(rename = "validIds")]
    pub records: Vec<CatalogRecord>,
    pub total_valid: u64,
    pub total_invalid: u64,
    pub total_errors: u64,
    #[serde(default)]
    pub total_processed: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FailedId>,
}

impl CatalogSnapshot {
    /// Snapshot a finished validation run, stamped with the current time.
    pub fn new(catalog: &Catalog, summary: &RunSummary, errors: Vec<FailedId>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            records: catalog.records().to_vec(),
            total_valid: summary.valid_count,
            total_invalid: summary.invalid_count,
            total_errors: summary.error_count,
            total_processed: summary.total_processed,
            errors,
        }
    }

    /// Records as a catalog (id-unique, snapshot order).
    pub fn catalog(&self) -> Catalog {
        self.records.iter().cloned().collect()
    }
}

/// Write the snapshot atomically, creating parent directories.
pub fn write_snapshot(path: &Path, snapshot: &CatalogSnapshot) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(snapshot).map_err(|e| CatalogError::json(path, e))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| CatalogError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| CatalogError::io(path, e))?;

    log::debug!(
        "Wrote snapshot with {} records to {}",
        snapshot.records.len(),
        path.display()
    );
    Ok(())
}

/// Read a snapshot, dropping records that break the catalog invariant.
///
/// Blank names, zero prices and repeated ids are discarded with a warning;
/// for repeated ids the first occurrence wins.
pub fn load_snapshot(path: &Path) -> Result<CatalogSnapshot, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let mut snapshot: CatalogSnapshot =
        serde_json::from_str(&contents).map_err(|e| CatalogError::json(path, e))?;

    let mut catalog = Catalog::new();
    for record in snapshot.records.drain(..) {
        if !record.is_well_formed() {
            log::warn!("Dropping malformed record for id {} in {}", record.id, path.display());
            continue;
        }
        let id = record.id;
        if !catalog.insert(record) {
            log::warn!("Dropping duplicate record for id {} in {}", id, path.display());
        }
    }
    snapshot.records = catalog.into_records();

    Ok(snapshot)
}
