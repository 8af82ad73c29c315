//! Server test utilities.

use super::storage::FaultyStore;
use filedrop_core::config::AppConfig;
use filedrop_metadata::{MetadataStore, SqliteStore};
use filedrop_server::bootstrap::initialize;
use filedrop_server::{AppState, create_router};
use filedrop_storage::{BlobStore, FilesystemBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let mut config = AppConfig::for_testing(temp_dir.path());
        modifier(&mut config);

        let state = initialize(config)
            .await
            .expect("Failed to initialize test server");
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Create a test server whose storage can be told to fail.
    ///
    /// Returns the server and a handle to the faulty store for injecting
    /// failures.
    pub async fn with_faulty_storage() -> (Self, Arc<FaultyStore>) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config = AppConfig::for_testing(temp_dir.path());

        let backend = FilesystemBackend::new(&config.storage.path)
            .await
            .expect("Failed to create storage backend");
        let faulty = Arc::new(FaultyStore::new(Arc::new(backend)));
        let storage: Arc<dyn BlobStore> = faulty.clone();

        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&config.metadata.path)
                .await
                .expect("Failed to create metadata store"),
        );

        let state = AppState::new(config, storage, metadata);
        let router = create_router(state.clone());

        let server = Self {
            router,
            state,
            _temp_dir: temp_dir,
        };
        (server, faulty)
    }

    /// Get access to the underlying metadata.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    /// Get access to the underlying storage.
    pub fn storage(&self) -> Arc<dyn BlobStore> {
        self.state.storage.clone()
    }

    /// The upload root directory.
    pub fn upload_dir(&self) -> PathBuf {
        self.state.config.storage.path.clone()
    }

    /// Number of entries directly under the upload root.
    pub fn upload_dir_len(&self) -> usize {
        std::fs::read_dir(self.upload_dir())
            .expect("Failed to read upload directory")
            .count()
    }
}
