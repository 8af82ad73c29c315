//! HTTP request handlers.

pub mod admin;
pub mod files;

pub use admin::*;
pub use files::*;
