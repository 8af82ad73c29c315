//! Metadata store trait and the SQLite implementation.

use crate::error::MetadataResult;
use crate::models::{FileRow, FileSummaryRow};
use crate::repos::FileRepo;
use async_trait::async_trait;
use filedrop_core::{FileId, FileRecord, FileSummary};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::Connection;
use std::path::Path;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: FileRepo + Send + Sync {
    /// Create the schema if it does not exist yet.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
///
/// Holds connection options only: every operation opens its own connection
/// and closes it before returning, so a failure is confined to the call that
/// hit it.
pub struct SqliteStore {
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and ensure the schema.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            // Prevent transient "database is locked" errors when two requests overlap.
            .busy_timeout(Duration::from_secs(5));

        let store = Self { options };
        store.migrate().await?;
        Ok(store)
    }

    async fn connect(&self) -> MetadataResult<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(SCHEMA_SQL).execute(&mut conn).await;
        conn.close().await?;
        result?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1").execute(&mut conn).await;
        conn.close().await?;
        result?;
        Ok(())
    }
}

#[async_trait]
impl FileRepo for SqliteStore {
    async fn insert_file(&self, filename: &str, filepath: &str) -> MetadataResult<FileId> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("INSERT INTO files (filename, filepath) VALUES (?, ?)")
            .bind(filename)
            .bind(filepath)
            .execute(&mut conn)
            .await;
        conn.close().await?;
        Ok(FileId::new(result?.last_insert_rowid()))
    }

    async fn get_file(&self, id: FileId) -> MetadataResult<Option<FileRecord>> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT id, filename, filepath FROM files WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&mut conn)
        .await;
        conn.close().await?;
        Ok(row?.map(FileRecord::from))
    }

    async fn list_files(&self) -> MetadataResult<Vec<FileSummary>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, FileSummaryRow>("SELECT id, filename FROM files ORDER BY id")
            .fetch_all(&mut conn)
            .await;
        conn.close().await?;
        Ok(rows?.into_iter().map(FileSummary::from).collect())
    }

    async fn list_file_records(&self) -> MetadataResult<Vec<FileRecord>> {
        let mut conn = self.connect().await?;
        let rows =
            sqlx::query_as::<_, FileRow>("SELECT id, filename, filepath FROM files ORDER BY id")
                .fetch_all(&mut conn)
                .await;
        conn.close().await?;
        Ok(rows?.into_iter().map(FileRecord::from).collect())
    }

    async fn delete_file(&self, id: FileId) -> MetadataResult<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id.get())
            .execute(&mut conn)
            .await;
        conn.close().await?;
        Ok(result?.rows_affected() > 0)
    }
}

/// SQL schema for SQLite.
///
/// AUTOINCREMENT keeps ids monotonic across deletions: SQLite never reissues
/// a rowid recorded in `sqlite_sequence`.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    filepath TEXT NOT NULL
);
"#;
