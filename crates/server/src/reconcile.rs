//! Reconciliation of file records against blob storage.
//!
//! Records can outlive their bytes when a file is removed out-of-band. A
//! reconciliation pass finds every record whose file is gone and deletes the
//! record. It only ever checks existence in storage; files are never created
//! or repaired, and files without a record are left alone.

use filedrop_metadata::{MetadataResult, MetadataStore};
use filedrop_storage::BlobStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reconciliation statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Number of records examined.
    pub records_scanned: u64,
    /// Number of orphaned records deleted.
    pub records_removed: u64,
    /// Records skipped because they could not be checked or deleted.
    pub errors: u64,
}

/// Delete every record whose file no longer exists.
///
/// Fails only if the records cannot be listed. A record whose existence check
/// or delete fails is logged, counted in `errors` and skipped; the rest of the
/// pass still runs.
pub async fn reconcile_orphans(
    metadata: &dyn MetadataStore,
    storage: &dyn BlobStore,
) -> MetadataResult<ReconcileStats> {
    let records = metadata.list_file_records().await?;
    let mut stats = ReconcileStats {
        records_scanned: records.len() as u64,
        ..Default::default()
    };

    tracing::info!(
        records = records.len(),
        backend = storage.backend_name(),
        "Starting reconciliation"
    );

    let mut orphaned = Vec::new();
    for record in &records {
        match storage.exists(Path::new(&record.filepath)).await {
            Ok(true) => {}
            Ok(false) => orphaned.push(record),
            Err(e) => {
                stats.errors += 1;
                tracing::warn!(
                    file_id = %record.id,
                    filepath = %record.filepath,
                    error = %e,
                    "Could not check file existence, skipping record"
                );
            }
        }
    }

    for record in orphaned {
        match metadata.delete_file(record.id).await {
            Ok(true) => {
                stats.records_removed += 1;
                tracing::info!(
                    file_id = %record.id,
                    filename = %record.filename,
                    filepath = %record.filepath,
                    "Removed orphaned file record"
                );
            }
            // Already gone, e.g. deleted through the API mid-pass
            Ok(false) => {}
            Err(e) => {
                stats.errors += 1;
                tracing::warn!(
                    file_id = %record.id,
                    error = %e,
                    "Failed to delete orphaned file record"
                );
            }
        }
    }

    crate::metrics::ORPHANED_RECORDS_REMOVED.inc_by(stats.records_removed);

    tracing::info!(
        records_scanned = stats.records_scanned,
        records_removed = stats.records_removed,
        errors = stats.errors,
        "Reconciliation finished"
    );

    Ok(stats)
}
