//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// A boxed stream of bytes for streaming reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// An opened file ready to be streamed to a client.
pub struct BlobStream {
    /// File size in bytes at the time it was opened.
    pub size: u64,
    /// The file contents.
    pub stream: ByteStream,
}

/// Blob storage for uploaded files.
///
/// Files are written under a fixed root and afterwards addressed by the path
/// returned from [`BlobStore::save`], which is what the metadata store records.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Compute where a file with this client-supplied name is stored.
    ///
    /// Fails with `InvalidFilename` if the name is not a single plain path
    /// component.
    fn path_for(&self, filename: &str) -> StorageResult<PathBuf>;

    /// Write `data` under the upload root and return its path.
    ///
    /// An existing file with the same name is overwritten.
    async fn save(&self, filename: &str, data: Bytes) -> StorageResult<PathBuf>;

    /// Check whether a file exists at `path`.
    async fn exists(&self, path: &Path) -> StorageResult<bool>;

    /// Read a whole file into memory.
    async fn read(&self, path: &Path) -> StorageResult<Bytes>;

    /// Open a file for streaming.
    async fn read_stream(&self, path: &Path) -> StorageResult<BlobStream>;

    /// Remove a file.
    ///
    /// Returns `NotFound` if there is nothing at `path`; permission or lock
    /// failures are returned as `Io` and never retried.
    async fn remove(&self, path: &Path) -> StorageResult<()>;

    /// Get the name of this storage backend, used in logs.
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is usable before accepting requests.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
