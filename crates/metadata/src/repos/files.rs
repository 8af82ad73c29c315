//! File record repository trait.

use crate::error::MetadataResult;
use async_trait::async_trait;
use filedrop_core::{FileId, FileRecord, FileSummary};

/// Repository for file records.
#[async_trait]
pub trait FileRepo: Send + Sync {
    /// Insert a new record and return the id assigned to it.
    async fn insert_file(&self, filename: &str, filepath: &str) -> MetadataResult<FileId>;

    /// Get a record by id.
    async fn get_file(&self, id: FileId) -> MetadataResult<Option<FileRecord>>;

    /// List `(id, filename)` for every record, in ascending id order.
    async fn list_files(&self) -> MetadataResult<Vec<FileSummary>>;

    /// List every record including its storage path.
    async fn list_file_records(&self) -> MetadataResult<Vec<FileRecord>>;

    /// Delete a record. Returns whether a row was removed; an absent id is a no-op.
    async fn delete_file(&self, id: FileId) -> MetadataResult<bool>;
}
