//! Core domain types shared across filedrop crates.
//!
//! This crate defines:
//! - File record identifiers and rows
//! - Client filename validation
//! - Configuration types for the server, storage and metadata store

pub mod config;
pub mod error;
pub mod file;

pub use error::{Error, Result};
pub use file::{FileId, FileRecord, FileSummary, validate_filename};
