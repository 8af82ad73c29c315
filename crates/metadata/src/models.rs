//! Database models mapping to the metadata schema.

use filedrop_core::{FileId, FileRecord, FileSummary};
use sqlx::FromRow;

/// Row of the `files` table.
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: i64,
    pub filename: String,
    pub filepath: String,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        Self {
            id: FileId::new(row.id),
            filename: row.filename,
            filepath: row.filepath,
        }
    }
}

/// `(id, filename)` projection used by listings.
#[derive(Debug, Clone, FromRow)]
pub struct FileSummaryRow {
    pub id: i64,
    pub filename: String,
}

impl From<FileSummaryRow> for FileSummary {
    fn from(row: FileSummaryRow) -> Self {
        Self {
            id: FileId::new(row.id),
            filename: row.filename,
        }
    }
}
