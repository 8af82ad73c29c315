//! Metadata store for uploaded files.
//!
//! This crate tracks one record per stored file: the assigned id, the
//! client-supplied filename and the server-side path of its bytes.

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use repos::FileRepo;
pub use store::{MetadataStore, SqliteStore};

use filedrop_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    config.validate().map_err(MetadataError::Config)?;
    let store = SqliteStore::new(&config.path).await?;
    tracing::info!(path = %config.path.display(), "Metadata store opened");
    Ok(Arc::new(store) as Arc<dyn MetadataStore>)
}
