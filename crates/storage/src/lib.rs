//! Blob storage for uploaded file bytes.
//!
//! This crate provides:
//! - The `BlobStore` abstraction addressed by server-side paths
//! - A local filesystem backend that writes files beneath a single upload root

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::{BlobStore, BlobStream, ByteStream};

use filedrop_core::config::StorageConfig;
use std::sync::Arc;

/// Create a blob store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    config.validate().map_err(StorageError::Config)?;
    let backend = FilesystemBackend::new(&config.path).await?;
    Ok(Arc::new(backend))
}
