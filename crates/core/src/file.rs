//! File record types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Identifier assigned to a file record by the metadata store.
///
/// Ids are handed out monotonically and are never reissued, even after the
/// record they named has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(i64);

impl FileId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for FileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored file: the client-supplied name and where its bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub filename: String,
    pub filepath: String,
}

/// The `(id, filename)` projection returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: FileId,
    pub filename: String,
}

/// Validate a client-supplied filename before it is used as a path component.
///
/// The name must be exactly one normal path component: no separators, no
/// `.` or `..`, no root or drive prefix.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::InvalidFilename("filename is empty".to_string()));
    }

    if filename.contains('/') || filename.contains('\\') || filename.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "filename must not contain path separators: {filename}"
        )));
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::InvalidFilename(format!(
            "filename is not a plain file name: {filename}"
        ))),
    }
}
