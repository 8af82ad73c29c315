//! Process-wide startup: storage root, schema, health checks.

use crate::state::AppState;
use anyhow::{Context, Result};
use filedrop_core::config::AppConfig;

/// Initialize storage and metadata from configuration.
///
/// Creates the upload directory, opens the metadata store (creating the
/// schema if needed) and verifies both are reachable. Run once at startup.
pub async fn initialize(config: AppConfig) -> Result<AppState> {
    let storage = filedrop_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage")?;
    storage
        .health_check()
        .await
        .context("storage health check failed")?;
    tracing::info!(
        path = %config.storage.path.display(),
        backend = storage.backend_name(),
        "Storage initialized"
    );

    let metadata = filedrop_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata health check failed")?;
    tracing::info!("Metadata store initialized");

    Ok(AppState::new(config, storage, metadata))
}
