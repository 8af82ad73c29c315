//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::{BlobStore, BlobStream};
use async_trait::async_trait;
use bytes::Bytes;
use filedrop_core::validate_filename;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Default chunk size for streaming reads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Prefix of in-flight upload files, followed by a simple uuid. Fixed length,
/// independent of the client filename.
const TEMP_PREFIX: &str = ".upload.tmp.";

/// Local filesystem blob store rooted at the upload directory.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the root directory if needed.
    ///
    /// Temp files left behind by an interrupted save are removed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        let backend = Self { root };
        backend.sweep_temp_files().await?;
        Ok(backend)
    }

    /// The upload root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(format!("{TEMP_PREFIX}{}", Uuid::new_v4().simple()))
    }

    async fn sweep_temp_files(&self) -> StorageResult<()> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut removed = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if !name.to_str().is_some_and(is_temp_name) {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Failed to remove stale temp file"
                ),
            }
        }

        if removed > 0 {
            tracing::warn!(removed, root = %self.root.display(), "Removed stale temp files");
        }
        Ok(())
    }
}

/// Whether `name` is a temp file written by [`FilesystemBackend::save`].
fn is_temp_name(name: &str) -> bool {
    name.strip_prefix(TEMP_PREFIX)
        .is_some_and(|id| id.len() == 32 && id.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn not_found_or_io(path: &Path, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(e)
    }
}

#[async_trait]
impl BlobStore for FilesystemBackend {
    fn path_for(&self, filename: &str) -> StorageResult<PathBuf> {
        validate_filename(filename).map_err(|e| StorageError::InvalidFilename(e.to_string()))?;
        Ok(self.root.join(filename))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn save(&self, filename: &str, data: Bytes) -> StorageResult<PathBuf> {
        let path = self.path_for(filename)?;

        // Write to a uniquely named sibling, fsync, then rename over the target
        let temp_path = self.temp_path();
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(e));
        }

        Ok(path)
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        fs::try_exists(path).await.map_err(StorageError::Io)
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn read(&self, path: &Path) -> StorageResult<Bytes> {
        let data = fs::read(path).await.map_err(|e| not_found_or_io(path, e))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn read_stream(&self, path: &Path) -> StorageResult<BlobStream> {
        use tokio::io::AsyncReadExt;

        let file = fs::File::open(path)
            .await
            .map_err(|e| not_found_or_io(path, e))?;
        let size = file.metadata().await?.len();

        // Stream the file in chunks instead of loading it into memory
        let stream = async_stream::try_stream! {
            let mut file = file;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok(BlobStream {
            size,
            stream: Box::pin(stream),
        })
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn remove(&self, path: &Path) -> StorageResult<()> {
        fs::remove_file(path)
            .await
            .map_err(|e| not_found_or_io(path, e))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.root).await?;
        if !meta.is_dir() {
            return Err(StorageError::Config(format!(
                "upload root is not a directory: {}",
                self.root.display()
            )));
        }
        Ok(())
    }
}
