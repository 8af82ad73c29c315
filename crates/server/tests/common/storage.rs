//! Storage test utilities.

use async_trait::async_trait;
use bytes::Bytes;
use filedrop_storage::{BlobStore, BlobStream, StorageError, StorageResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A blob store that delegates to another one but can be told to fail
/// existence checks or removals for specific paths.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct FaultyStore {
    inner: Arc<dyn BlobStore>,
    fail_exists: Mutex<HashSet<PathBuf>>,
    fail_remove: Mutex<HashSet<PathBuf>>,
}

#[allow(dead_code)]
impl FaultyStore {
    pub fn new(inner: Arc<dyn BlobStore>) -> Self {
        Self {
            inner,
            fail_exists: Mutex::new(HashSet::new()),
            fail_remove: Mutex::new(HashSet::new()),
        }
    }

    /// Make `exists` return an I/O error for `path`.
    pub fn fail_exists_for(&self, path: impl Into<PathBuf>) {
        self.fail_exists.lock().unwrap().insert(path.into());
    }

    /// Make `remove` return an I/O error for `path`.
    pub fn fail_remove_for(&self, path: impl Into<PathBuf>) {
        self.fail_remove.lock().unwrap().insert(path.into());
    }

    fn injected(path: &Path) -> StorageError {
        StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("injected failure for {}", path.display()),
        ))
    }
}

#[async_trait]
impl BlobStore for FaultyStore {
    fn path_for(&self, filename: &str) -> StorageResult<PathBuf> {
        self.inner.path_for(filename)
    }

    async fn save(&self, filename: &str, data: Bytes) -> StorageResult<PathBuf> {
        self.inner.save(filename, data).await
    }

    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        if self.fail_exists.lock().unwrap().contains(path) {
            return Err(Self::injected(path));
        }
        self.inner.exists(path).await
    }

    async fn read(&self, path: &Path) -> StorageResult<Bytes> {
        self.inner.read(path).await
    }

    async fn read_stream(&self, path: &Path) -> StorageResult<BlobStream> {
        self.inner.read_stream(path).await
    }

    async fn remove(&self, path: &Path) -> StorageResult<()> {
        if self.fail_remove.lock().unwrap().contains(path) {
            return Err(Self::injected(path));
        }
        self.inner.remove(path).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }
}
