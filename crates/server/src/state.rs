//! Application state shared across handlers.

use filedrop_core::config::AppConfig;
use filedrop_metadata::MetadataStore;
use filedrop_storage::BlobStore;
use std::sync::Arc;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Blob storage for file bytes.
    pub storage: Arc<dyn BlobStore>,
    /// Metadata store for file records.
    pub metadata: Arc<dyn MetadataStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn BlobStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            metadata,
        }
    }
}
