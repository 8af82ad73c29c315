//! HTTP file upload service.
//!
//! This crate provides the HTTP surface over blob storage and the metadata
//! store:
//! - File upload, listing, download and delete
//! - Reconciliation of records whose files went missing
//! - Health and Prometheus endpoints

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod reconcile;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use reconcile::{ReconcileStats, reconcile_orphans};
pub use routes::create_router;
pub use state::AppState;
